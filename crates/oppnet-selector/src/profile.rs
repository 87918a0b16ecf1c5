//! Profile and observation types shared across the selection engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Platform subscription identifier.
pub type SubId = i32;

/// A caller-declared data-capable profile, with a priority and the set of
/// network identifiers it may be matched against.
///
/// `priority` is ordered with lower numbers meaning higher preference.
/// An empty `network_ids` set means "match by subscription identity alone,
/// no network filtering" — such a profile is never matched by the scan
/// evaluator, only by the direct any-network path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub sub_id: SubId,
    pub priority: i32,
    pub network_ids: BTreeSet<String>,
}

impl CandidateProfile {
    pub fn new<I, S>(sub_id: SubId, priority: i32, network_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CandidateProfile {
            sub_id,
            priority,
            network_ids: network_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this candidate declares no network filter at all.
    pub fn any_network(&self) -> bool {
        self.network_ids.is_empty()
    }
}

/// A profile the platform currently exposes as usable for opportunistic
/// activation. Supplied by the external subscription registry; the
/// selector only ever holds a read-only snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UsableProfile {
    pub sub_id: SubId,
}

impl UsableProfile {
    pub fn new(sub_id: SubId) -> Self {
        UsableProfile { sub_id }
    }
}

/// A single radio scan result: a network identifier and the observed
/// signal level (higher = stronger). Ephemeral — produced per scan batch
/// and discarded after evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanObservation {
    pub network_id: String,
    pub signal_level: i32,
}

impl ScanObservation {
    pub fn new(network_id: impl Into<String>, signal_level: i32) -> Self {
        ScanObservation {
            network_id: network_id.into(),
            signal_level,
        }
    }
}

/// An outstanding switch request. Single-use: retired on a matching
/// confirmation or superseded when a newer token is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchRequest {
    pub token: u32,
    pub target: SubId,
}

/// Set-equality over candidate lists, ignoring order. Used to make
/// repeated `start` calls with a permuted but identical list a no-op.
pub fn same_candidate_set(a: &[CandidateProfile], b: &[CandidateProfile]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let left: std::collections::HashSet<&CandidateProfile> = a.iter().collect();
    let right: std::collections::HashSet<&CandidateProfile> = b.iter().collect();
    left == right
}
