//! Collaborator traits at the platform boundary.
//!
//! The engine never talks to radio hardware or the platform subscription
//! database directly; it consumes these traits. Implementations are
//! expected to be cheap to query — the selector calls the read methods
//! while holding its session lock, but every mutating call
//! ([`SubscriptionRegistry::switch_to`], [`ScanDriver::start_scan`],
//! [`ScanDriver::stop_scan`]) is issued only after the lock is released.

use crate::profile::{SubId, UsableProfile};

/// The platform subscription registry: reports which profiles exist and
/// are active, and performs the actual data switch.
pub trait SubscriptionRegistry: Send + Sync {
    /// Profiles currently exposed as candidates for opportunistic use.
    fn usable_profiles(&self) -> Vec<UsableProfile>;

    /// Profiles that are currently active.
    fn active_profiles(&self) -> Vec<UsableProfile>;

    /// Whether the given subscription is currently active.
    fn is_active(&self, sub_id: SubId) -> bool;

    /// Asks the platform to switch to `sub_id`. The eventual confirmation
    /// must be delivered back carrying the same `token` so it can be
    /// correlated with this request.
    fn switch_to(&self, sub_id: SubId, token: u32);

    /// Sets the preferred data subscription; `None` clears the preference
    /// back to the platform default.
    fn set_preferred_data(&self, sub_id: Option<SubId>);

    /// The platform's default data subscription id.
    fn default_sub_id(&self) -> SubId;
}

/// The radio scan driver. Observations and errors are delivered back into
/// the engine through the runtime handle's `notify_*` methods.
pub trait ScanDriver: Send + Sync {
    /// Starts (or restarts) a scan restricted to the given network
    /// identifiers.
    fn start_scan(&self, network_ids: &[String]);

    /// Stops any in-flight scan. Must be safe to call when idle.
    fn stop_scan(&self);
}
