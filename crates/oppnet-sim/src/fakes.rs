//! Scriptable in-memory collaborators.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use oppnet_selector::profile::{SubId, UsableProfile};
use oppnet_selector::registry::{ScanDriver, SubscriptionRegistry};

/// In-memory subscription registry. Usable and active sets are scripted
/// by the test; every switch request and preferred-data call is recorded.
#[derive(Default)]
pub struct FakeRegistry {
    inner: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    usable: Vec<UsableProfile>,
    active: BTreeSet<SubId>,
    default_sub: SubId,
    switch_requests: Vec<(SubId, u32)>,
    preferred_data_calls: Vec<Option<SubId>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        FakeRegistry::default()
    }

    pub fn set_usable(&self, subs: &[SubId]) {
        self.inner.lock().unwrap().usable = subs.iter().map(|&s| UsableProfile::new(s)).collect();
    }

    pub fn set_active(&self, subs: &[SubId]) {
        self.inner.lock().unwrap().active = subs.iter().copied().collect();
    }

    pub fn set_default_sub(&self, sub_id: SubId) {
        self.inner.lock().unwrap().default_sub = sub_id;
    }

    /// All `(target, token)` switch requests received so far.
    pub fn switch_requests(&self) -> Vec<(SubId, u32)> {
        self.inner.lock().unwrap().switch_requests.clone()
    }

    pub fn last_switch_request(&self) -> Option<(SubId, u32)> {
        self.inner.lock().unwrap().switch_requests.last().copied()
    }

    /// All `set_preferred_data` arguments received so far.
    pub fn preferred_data_calls(&self) -> Vec<Option<SubId>> {
        self.inner.lock().unwrap().preferred_data_calls.clone()
    }
}

impl SubscriptionRegistry for FakeRegistry {
    fn usable_profiles(&self) -> Vec<UsableProfile> {
        self.inner.lock().unwrap().usable.clone()
    }

    fn active_profiles(&self) -> Vec<UsableProfile> {
        self.inner
            .lock()
            .unwrap()
            .active
            .iter()
            .map(|&s| UsableProfile::new(s))
            .collect()
    }

    fn is_active(&self, sub_id: SubId) -> bool {
        self.inner.lock().unwrap().active.contains(&sub_id)
    }

    fn switch_to(&self, sub_id: SubId, token: u32) {
        debug!(sub_id, token, "fake registry received switch request");
        self.inner.lock().unwrap().switch_requests.push((sub_id, token));
    }

    fn set_preferred_data(&self, sub_id: Option<SubId>) {
        self.inner.lock().unwrap().preferred_data_calls.push(sub_id);
    }

    fn default_sub_id(&self) -> SubId {
        self.inner.lock().unwrap().default_sub
    }
}

/// Scan driver that records every start/stop call instead of scanning.
#[derive(Default)]
pub struct FakeScanDriver {
    inner: Mutex<ScanLog>,
}

#[derive(Default)]
struct ScanLog {
    starts: Vec<Vec<String>>,
    stops: usize,
    scanning: bool,
}

impl FakeScanDriver {
    pub fn new() -> Self {
        FakeScanDriver::default()
    }

    /// The restricted network-id lists of every scan started so far.
    pub fn scan_starts(&self) -> Vec<Vec<String>> {
        self.inner.lock().unwrap().starts.clone()
    }

    pub fn stop_count(&self) -> usize {
        self.inner.lock().unwrap().stops
    }

    pub fn is_scanning(&self) -> bool {
        self.inner.lock().unwrap().scanning
    }
}

impl ScanDriver for FakeScanDriver {
    fn start_scan(&self, network_ids: &[String]) {
        debug!(?network_ids, "fake scan driver started");
        let mut log = self.inner.lock().unwrap();
        log.starts.push(network_ids.to_vec());
        log.scanning = true;
    }

    fn stop_scan(&self) {
        let mut log = self.inner.lock().unwrap();
        log.stops += 1;
        log.scanning = false;
    }
}

/// Counts completion-callback invocations across threads.
#[derive(Clone, Default)]
pub struct CompletionCounter {
    count: Arc<AtomicUsize>,
}

impl CompletionCounter {
    pub fn new() -> Self {
        CompletionCounter::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// A callback suitable for `SelectorRuntime::new`.
    pub fn hook(&self) -> impl Fn() + Send + Sync + 'static {
        let count = self.count.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_records_switch_requests() {
        let registry = FakeRegistry::new();
        registry.switch_to(5, 1);
        registry.switch_to(7, 2);
        assert_eq!(registry.switch_requests(), vec![(5, 1), (7, 2)]);
        assert_eq!(registry.last_switch_request(), Some((7, 2)));
    }

    #[test]
    fn registry_active_set_is_scriptable() {
        let registry = FakeRegistry::new();
        registry.set_usable(&[5, 8]);
        registry.set_active(&[8]);
        assert!(registry.is_active(8));
        assert!(!registry.is_active(5));
        assert_eq!(registry.usable_profiles().len(), 2);
        assert_eq!(registry.active_profiles(), vec![UsableProfile::new(8)]);
    }

    #[test]
    fn scan_driver_records_lifecycle() {
        let driver = FakeScanDriver::new();
        driver.start_scan(&["310210".to_string()]);
        assert!(driver.is_scanning());
        driver.stop_scan();
        assert!(!driver.is_scanning());
        assert_eq!(driver.scan_starts(), vec![vec!["310210".to_string()]]);
        assert_eq!(driver.stop_count(), 1);
    }

    #[test]
    fn completion_counter_counts() {
        let counter = CompletionCounter::new();
        let hook = counter.hook();
        hook();
        hook();
        assert_eq!(counter.count(), 2);
    }
}
