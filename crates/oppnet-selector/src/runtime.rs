//! Serialized event worker and the public selector handle.
//!
//! All asynchronous inputs — candidate updates, usable-profile change
//! notifications, scan observations and switch confirmations — are turned
//! into [`SelectorEvent`]s and pushed through one bounded channel to a
//! single worker thread, so they are always processed one at a time in
//! arrival order. Each event locks the session state, computes the
//! transition, releases the lock and only then performs the requested
//! external calls (scan start/stop, switch request, completion callback).
//!
//! Synchronous entry points (`stop`, direct selection, queries) run on the
//! caller's thread under the same lock, which is why the lock exists at
//! all despite the serialized worker.
//!
//! Dropping the runtime triggers a graceful shutdown of the worker thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::warn;

use crate::config::SelectorConfig;
use crate::profile::{CandidateProfile, ScanObservation, SubId, UsableProfile};
use crate::registry::{ScanDriver, SubscriptionRegistry};
use crate::selector::{Action, SelectorState};

/// Events consumed by the worker, in arrival order.
#[derive(Debug)]
enum SelectorEvent {
    CandidatesUpdated,
    SnapshotChanged,
    ObservationsReceived(Vec<ScanObservation>),
    ScanFailed(i32),
    ConfirmationReceived { token: u32, sub_id: SubId },
    Shutdown,
}

/// Callback invoked exactly once per successful selection cycle.
pub type CompletionCallback = Arc<dyn Fn() + Send + Sync>;

/// Thread-safe handle to the profile selection engine.
pub struct SelectorRuntime {
    state: Arc<Mutex<SelectorState>>,
    registry: Arc<dyn SubscriptionRegistry>,
    scanner: Arc<dyn ScanDriver>,
    on_complete: CompletionCallback,
    event_tx: Sender<SelectorEvent>,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SelectorRuntime {
    /// Creates the runtime, primes the usable-profile snapshot from the
    /// registry and spawns the event worker.
    pub fn new(
        config: SelectorConfig,
        registry: Arc<dyn SubscriptionRegistry>,
        scanner: Arc<dyn ScanDriver>,
        on_complete: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let mut state = SelectorState::new(config.start_token);
        state.refresh_snapshot(&*registry);
        let state = Arc::new(Mutex::new(state));

        let (event_tx, event_rx) = bounded(config.channel_capacity);
        let shutdown = Arc::new(AtomicBool::new(false));
        let on_complete: CompletionCallback = Arc::new(on_complete);

        let worker_state = state.clone();
        let worker_registry = registry.clone();
        let worker_scanner = scanner.clone();
        let worker_complete = on_complete.clone();
        let worker_shutdown = shutdown.clone();
        let handle = thread::Builder::new()
            .name("oppnet-selector".into())
            .spawn(move || {
                selector_worker(
                    worker_state,
                    worker_registry,
                    worker_scanner,
                    worker_complete,
                    event_rx,
                    worker_shutdown,
                )
            })
            .expect("failed to spawn selector worker");

        SelectorRuntime {
            state,
            registry,
            scanner,
            on_complete,
            event_tx,
            shutdown,
            handle: Some(handle),
        }
    }

    // ─── Session control ────────────────────────────────────────────────

    /// Starts profile selection over `candidates`.
    ///
    /// Empty lists and lists set-equal to the one already being selected
    /// over are ignored. Otherwise any previous session is torn down and
    /// an evaluation is queued to the worker.
    pub fn start(&self, candidates: Vec<CandidateProfile>) -> anyhow::Result<()> {
        let actions = self.lock_state().start(candidates);
        let Some(actions) = actions else {
            return Ok(());
        };
        self.run_actions(actions);
        self.event_tx
            .send(SelectorEvent::CandidatesUpdated)
            .map_err(|e| anyhow::anyhow!("failed to queue evaluation: {}", e))
    }

    /// Stops any in-flight selection session. Idempotent.
    pub fn stop(&self) {
        let actions = self.lock_state().stop();
        self.run_actions(actions);
    }

    /// Directly selects `target` for data, bypassing the scan path.
    /// `None` deselects any previous preference and always succeeds.
    pub fn select_profile_for_data(&self, target: Option<SubId>) -> bool {
        let (ok, actions) = self
            .lock_state()
            .select_profile_for_data(target, &*self.registry);
        self.run_actions(actions);
        ok
    }

    /// Routes data back to the platform's default subscription.
    pub fn select_default_for_data(&self) {
        let actions = self.lock_state().select_default_for_data(&*self.registry);
        self.run_actions(actions);
    }

    // ─── Inbound notifications ──────────────────────────────────────────

    /// The registry's set of usable profiles changed; queue a snapshot
    /// refresh (and re-evaluation if a session is active).
    pub fn notify_subscriptions_changed(&self) -> anyhow::Result<()> {
        self.send(SelectorEvent::SnapshotChanged)
    }

    /// A batch of scan observations arrived from the scan driver.
    pub fn notify_observations(&self, observations: Vec<ScanObservation>) -> anyhow::Result<()> {
        self.send(SelectorEvent::ObservationsReceived(observations))
    }

    /// The scan driver reported an error. Logged, never escalated.
    pub fn notify_scan_error(&self, code: i32) -> anyhow::Result<()> {
        self.send(SelectorEvent::ScanFailed(code))
    }

    /// An asynchronous switch confirmation arrived from the platform.
    pub fn notify_confirmation(&self, token: u32, sub_id: SubId) -> anyhow::Result<()> {
        self.send(SelectorEvent::ConfirmationReceived { token, sub_id })
    }

    // ─── Queries ────────────────────────────────────────────────────────

    /// The subscription currently selected for data via the direct path,
    /// if any.
    pub fn active_data_sub_id(&self) -> Option<SubId> {
        self.lock_state().active_data_sub()
    }

    /// Whether any of the given candidates is usable on this device.
    pub fn has_eligible_profiles(&self, candidates: &[CandidateProfile]) -> bool {
        self.lock_state().has_eligible_profiles(candidates)
    }

    /// Whether any usable profile is currently active.
    pub fn is_any_eligible_profile_active(&self) -> bool {
        self.lock_state()
            .is_any_eligible_profile_active(&*self.registry)
    }

    pub fn is_eligible_sub(&self, sub_id: SubId) -> bool {
        self.lock_state().is_eligible_sub(sub_id)
    }

    pub fn eligible_profile(&self, sub_id: SubId) -> Option<UsableProfile> {
        self.lock_state().eligible_profile(sub_id)
    }

    /// Gracefully shuts down the worker thread. Idempotent.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.event_tx.send(SelectorEvent::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    // ─── Internal ───────────────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn send(&self, event: SelectorEvent) -> anyhow::Result<()> {
        if self.shutdown.load(Ordering::Relaxed) {
            anyhow::bail!("selector worker is shut down");
        }
        self.event_tx
            .send(event)
            .map_err(|e| anyhow::anyhow!("selector worker unavailable: {}", e))
    }

    fn run_actions(&self, actions: Vec<Action>) {
        run_actions(
            actions,
            &*self.registry,
            &*self.scanner,
            self.on_complete.as_ref(),
        );
    }
}

impl Drop for SelectorRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn selector_worker(
    state: Arc<Mutex<SelectorState>>,
    registry: Arc<dyn SubscriptionRegistry>,
    scanner: Arc<dyn ScanDriver>,
    on_complete: CompletionCallback,
    event_rx: Receiver<SelectorEvent>,
    shutdown: Arc<AtomicBool>,
) {
    while let Ok(event) = event_rx.recv() {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        let actions = {
            let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
            match event {
                SelectorEvent::CandidatesUpdated => state.evaluate(&*registry),
                SelectorEvent::SnapshotChanged => state.refresh_snapshot(&*registry),
                SelectorEvent::ObservationsReceived(observations) => {
                    state.on_observations(&observations, &*registry)
                }
                SelectorEvent::ScanFailed(code) => {
                    warn!(code, "network scan failed");
                    Vec::new()
                }
                SelectorEvent::ConfirmationReceived { token, sub_id } => {
                    state.on_confirmation(token, sub_id)
                }
                SelectorEvent::Shutdown => break,
            }
        };
        run_actions(actions, &*registry, &*scanner, on_complete.as_ref());
    }
}

/// Executes the external calls requested by a state transition. Always
/// called with no lock held.
fn run_actions(
    actions: Vec<Action>,
    registry: &dyn SubscriptionRegistry,
    scanner: &dyn ScanDriver,
    on_complete: &(dyn Fn() + Send + Sync),
) {
    for action in actions {
        match action {
            Action::StartScan(network_ids) => scanner.start_scan(&network_ids),
            Action::StopScan => scanner.stop_scan(),
            Action::SwitchTo { target, token } => registry.switch_to(target, token),
            Action::SetPreferredData(sub_id) => registry.set_preferred_data(sub_id),
            Action::Complete => on_complete(),
        }
    }
}
