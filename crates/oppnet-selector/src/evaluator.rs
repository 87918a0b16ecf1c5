//! Best-candidate ranking over a batch of scan observations.
//!
//! Priority is the dominant ranking key: every observation is tried at the
//! highest-preference (numerically lowest) priority level before any
//! lower level is considered. Within one priority level, observations are
//! visited strongest-signal first, so signal strength breaks ties.

use crate::profile::{CandidateProfile, ScanObservation, SubId};

/// Picks the subscription id of the best candidate matched by the given
/// observations, or `None` when no observation matches any candidate at
/// any priority level.
pub fn best_candidate(
    observations: &[ScanObservation],
    candidates: &[CandidateProfile],
) -> Option<SubId> {
    if observations.is_empty() || candidates.is_empty() {
        return None;
    }

    let mut ranked: Vec<&ScanObservation> = observations.iter().collect();
    // Strongest signal first; stable sort keeps batch order for equal levels.
    ranked.sort_by(|a, b| b.signal_level.cmp(&a.signal_level));

    let mut levels: Vec<i32> = candidates.iter().map(|c| c.priority).collect();
    levels.sort_unstable();
    levels.dedup();

    for level in levels {
        for obs in &ranked {
            let hit = candidates
                .iter()
                .find(|c| c.priority == level && c.network_ids.contains(&obs.network_id));
            if let Some(candidate) = hit {
                return Some(candidate.sub_id);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(network_id: &str, signal_level: i32) -> ScanObservation {
        ScanObservation::new(network_id, signal_level)
    }

    // ─── Boundaries ─────────────────────────────────────────────────────

    #[test]
    fn empty_observations_yield_none() {
        let candidates = vec![CandidateProfile::new(1, 1, ["310210"])];
        assert_eq!(best_candidate(&[], &candidates), None);
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert_eq!(best_candidate(&[obs("310210", 3)], &[]), None);
    }

    #[test]
    fn no_matching_network_yields_none() {
        let candidates = vec![CandidateProfile::new(1, 1, ["310210"])];
        assert_eq!(best_candidate(&[obs("26201", 4)], &candidates), None);
    }

    #[test]
    fn any_network_candidate_never_matches_observations() {
        // A candidate with no declared networks is handled by the direct
        // path, not by scan evaluation.
        let candidates = vec![CandidateProfile::new(1, 1, Vec::<String>::new())];
        assert_eq!(best_candidate(&[obs("310210", 4)], &candidates), None);
    }

    // ─── Ranking ────────────────────────────────────────────────────────

    #[test]
    fn single_match_returns_its_sub() {
        let candidates = vec![CandidateProfile::new(5, 1, ["310210"])];
        assert_eq!(best_candidate(&[obs("310210", 3)], &candidates), Some(5));
    }

    #[test]
    fn priority_dominates_signal_strength() {
        let candidates = vec![
            CandidateProfile::new(5, 1, ["310210"]),
            CandidateProfile::new(8, 2, ["310211"]),
        ];
        // The lower-priority candidate's network is observed much stronger,
        // but priority 1 must still win.
        let observations = vec![obs("310211", 4), obs("310210", 1)];
        assert_eq!(best_candidate(&observations, &candidates), Some(5));
    }

    #[test]
    fn signal_breaks_ties_within_a_priority_level() {
        let candidates = vec![
            CandidateProfile::new(5, 1, ["310210"]),
            CandidateProfile::new(8, 1, ["310211"]),
        ];
        let observations = vec![obs("310210", 2), obs("310211", 4)];
        assert_eq!(best_candidate(&observations, &candidates), Some(8));
    }

    #[test]
    fn weaker_observation_used_when_stronger_has_no_candidate() {
        let candidates = vec![CandidateProfile::new(5, 2, ["310210"])];
        let observations = vec![obs("99999", 5), obs("310210", 1)];
        assert_eq!(best_candidate(&observations, &candidates), Some(5));
    }

    #[test]
    fn multi_network_candidate_matches_any_declared_network() {
        let candidates = vec![CandidateProfile::new(7, 1, ["310210", "310211"])];
        assert_eq!(best_candidate(&[obs("310211", 2)], &candidates), Some(7));
    }
}
