//! Session state machine.
//!
//! [`SelectorState`] owns every mutable field of one selection session:
//! the enabled flag, the priority-sorted candidate list, the usable-profile
//! snapshot, the active data subscription and the switch coordinator. All
//! transitions are computed while the caller holds the session lock and
//! return a list of [`Action`]s describing the external calls to make —
//! the caller executes them only after releasing the lock, so no external
//! call can re-enter the state machine while it is mid-transition.

use tracing::{debug, info};

use crate::evaluator;
use crate::matcher;
use crate::profile::{
    same_candidate_set, CandidateProfile, ScanObservation, SubId, UsableProfile,
};
use crate::registry::SubscriptionRegistry;
use crate::switchover::SwitchCoordinator;

/// An external call requested by a state transition, executed by the
/// caller after the session lock has been released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start (or restart) a scan restricted to these network identifiers.
    StartScan(Vec<String>),
    /// Stop any in-flight scan.
    StopScan,
    /// Ask the registry to switch to `target`, tagged with `token`.
    SwitchTo { target: SubId, token: u32 },
    /// Set the platform's preferred data subscription.
    SetPreferredData(Option<SubId>),
    /// Invoke the selection-complete callback.
    Complete,
}

/// All session state, guarded by one lock owned by the runtime.
#[derive(Debug)]
pub struct SelectorState {
    enabled: bool,
    candidates: Vec<CandidateProfile>,
    usable: Option<Vec<UsableProfile>>,
    active_data_sub: Option<SubId>,
    coordinator: SwitchCoordinator,
}

impl SelectorState {
    pub fn new(start_token: u32) -> Self {
        SelectorState {
            enabled: false,
            candidates: Vec::new(),
            usable: None,
            active_data_sub: None,
            coordinator: SwitchCoordinator::new(start_token),
        }
    }

    // ─── Session control ────────────────────────────────────────────────

    /// Begins a selection session over `candidates`.
    ///
    /// Returns `None` when the call is a no-op (empty list, or set-equal
    /// to the list already being selected over); otherwise the session is
    /// replaced and the returned actions tear down the previous one. The
    /// caller is expected to trigger evaluation afterwards.
    pub fn start(&mut self, mut candidates: Vec<CandidateProfile>) -> Option<Vec<Action>> {
        if candidates.is_empty() {
            debug!("ignoring start with empty candidate list");
            return None;
        }
        if self.enabled && same_candidate_set(&candidates, &self.candidates) {
            debug!("candidate set unchanged, keeping current session");
            return None;
        }

        let actions = self.stop();
        // Descending preference order: lower priority number first.
        candidates.sort_by_key(|c| c.priority);
        self.candidates = candidates;
        self.enabled = true;
        Some(actions)
    }

    /// Ends the current session. Idempotent; always stops scanning.
    pub fn stop(&mut self) -> Vec<Action> {
        self.candidates.clear();
        self.enabled = false;
        vec![Action::StopScan]
    }

    // ─── Evaluation ─────────────────────────────────────────────────────

    /// Runs one evaluation step over the current candidates and snapshot.
    pub fn evaluate(&mut self, registry: &dyn SubscriptionRegistry) -> Vec<Action> {
        if !self.enabled {
            return Vec::new();
        }
        let Some(usable) = self.usable.as_deref() else {
            debug!("no usable-profile snapshot yet, deferring evaluation");
            return Vec::new();
        };
        if usable.is_empty() {
            debug!("no usable profiles, stopping scan");
            return vec![Action::StopScan];
        }

        let filtered = matcher::filter_usable(&self.candidates, usable);
        if filtered.len() == 1 && filtered[0].any_network() {
            // A single candidate with no network filter is an immediate
            // target; a scan would have nothing to restrict against.
            let target = filtered[0].sub_id;
            if registry.is_active(target) {
                vec![Action::Complete]
            } else {
                let token = self.coordinator.request_switch(target);
                vec![Action::SwitchTo { target, token }]
            }
        } else if !filtered.is_empty() {
            vec![Action::StartScan(scan_network_ids(&filtered))]
        } else {
            debug!("no eligible candidates after filtering, stopping scan");
            vec![Action::StopScan]
        }
    }

    /// Handles a batch of scan observations.
    pub fn on_observations(
        &mut self,
        observations: &[ScanObservation],
        registry: &dyn SubscriptionRegistry,
    ) -> Vec<Action> {
        if !self.enabled {
            return Vec::new();
        }
        match evaluator::best_candidate(observations, &self.candidates) {
            None => Vec::new(),
            Some(target) if registry.is_active(target) => vec![Action::Complete],
            Some(target) => {
                let token = self.coordinator.request_switch(target);
                vec![Action::SwitchTo { target, token }]
            }
        }
    }

    /// Handles an asynchronous switch confirmation. Deliveries while the
    /// session is disabled, or carrying a token other than the pending
    /// one, are discarded.
    pub fn on_confirmation(&mut self, token: u32, sub_id: SubId) -> Vec<Action> {
        if !self.enabled {
            debug!(token, sub_id, "confirmation received while disabled");
            return Vec::new();
        }
        if self.coordinator.confirm(token, sub_id) {
            vec![Action::Complete]
        } else {
            Vec::new()
        }
    }

    /// Refreshes the usable-profile snapshot and, when a session is
    /// active, re-runs evaluation against it.
    pub fn refresh_snapshot(&mut self, registry: &dyn SubscriptionRegistry) -> Vec<Action> {
        let usable = registry.usable_profiles();
        debug!(count = usable.len(), "usable-profile snapshot refreshed");
        self.usable = Some(usable);
        if self.enabled {
            self.evaluate(registry)
        } else {
            Vec::new()
        }
    }

    // ─── Direct selection ───────────────────────────────────────────────

    /// Directly selects an opportunistic profile for data, bypassing the
    /// scan path. `None` deselects any previous preference and always
    /// succeeds; `Some(id)` succeeds only when `id` is a known usable
    /// profile that is currently active. On failure no state changes.
    pub fn select_profile_for_data(
        &mut self,
        target: Option<SubId>,
        registry: &dyn SubscriptionRegistry,
    ) -> (bool, Vec<Action>) {
        match target {
            None => {
                self.active_data_sub = None;
                (true, vec![Action::SetPreferredData(None)])
            }
            Some(sub_id) if self.is_eligible_sub(sub_id) && registry.is_active(sub_id) => {
                self.active_data_sub = Some(sub_id);
                (
                    true,
                    vec![Action::SetPreferredData(Some(sub_id)), Action::Complete],
                )
            }
            Some(sub_id) => {
                info!(sub_id, "inactive or unknown sub passed for preferred data");
                (false, Vec::new())
            }
        }
    }

    /// Routes data back to the platform's default subscription.
    pub fn select_default_for_data(&mut self, registry: &dyn SubscriptionRegistry) -> Vec<Action> {
        self.active_data_sub = Some(registry.default_sub_id());
        vec![Action::SetPreferredData(None)]
    }

    // ─── Queries ────────────────────────────────────────────────────────

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn active_data_sub(&self) -> Option<SubId> {
        self.active_data_sub
    }

    /// Whether any of the given candidates is usable on this device.
    pub fn has_eligible_profiles(&self, candidates: &[CandidateProfile]) -> bool {
        let Some(usable) = self.usable.as_deref() else {
            debug!("no usable-profile snapshot yet");
            return false;
        };
        !matcher::filter_usable(candidates, usable).is_empty()
    }

    /// Whether any usable profile is currently active.
    pub fn is_any_eligible_profile_active(&self, registry: &dyn SubscriptionRegistry) -> bool {
        self.usable
            .as_deref()
            .is_some_and(|usable| usable.iter().any(|p| registry.is_active(p.sub_id)))
    }

    pub fn is_eligible_sub(&self, sub_id: SubId) -> bool {
        self.eligible_profile(sub_id).is_some()
    }

    pub fn eligible_profile(&self, sub_id: SubId) -> Option<UsableProfile> {
        self.usable
            .as_deref()
            .and_then(|usable| usable.iter().find(|p| p.sub_id == sub_id).copied())
    }
}

/// Union of the network identifiers declared by the filtered candidates,
/// sorted and deduplicated for the scan driver.
fn scan_network_ids(candidates: &[CandidateProfile]) -> Vec<String> {
    let mut ids: Vec<String> = candidates
        .iter()
        .flat_map(|c| c.network_ids.iter().cloned())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
