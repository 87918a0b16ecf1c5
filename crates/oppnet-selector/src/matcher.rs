//! Candidate × usable-profile intersection.
//!
//! Instead of checking each candidate against every usable profile, both
//! inputs are sorted by subscription id and walked with two cursors in a
//! single pass — O(n log n + m log m) rather than O(n·m). The function is
//! pure: it sorts copies and never mutates the caller's data.

use std::cmp::Ordering;

use crate::profile::{CandidateProfile, SubId, UsableProfile};

/// Returns the candidates whose subscription id appears in the usable set.
///
/// Result order follows ascending subscription id. Either input being
/// empty yields an empty result.
pub fn filter_usable(
    candidates: &[CandidateProfile],
    usable: &[UsableProfile],
) -> Vec<CandidateProfile> {
    if candidates.is_empty() || usable.is_empty() {
        return Vec::new();
    }

    let mut by_sub: Vec<CandidateProfile> = candidates.to_vec();
    by_sub.sort_by_key(|c| c.sub_id);
    let mut usable_ids: Vec<SubId> = usable.iter().map(|u| u.sub_id).collect();
    usable_ids.sort_unstable();

    let mut filtered = Vec::new();
    let mut ci = 0;
    let mut ui = 0;
    // Both cursors strictly bounded; the merge terminates as soon as
    // either side is exhausted.
    while ci < by_sub.len() && ui < usable_ids.len() {
        match by_sub[ci].sub_id.cmp(&usable_ids[ui]) {
            Ordering::Equal => {
                filtered.push(by_sub[ci].clone());
                ci += 1;
            }
            Ordering::Less => ci += 1,
            Ordering::Greater => ui += 1,
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(sub_id: SubId) -> CandidateProfile {
        CandidateProfile::new(sub_id, 1, ["310210"])
    }

    // ─── Boundaries ─────────────────────────────────────────────────────

    #[test]
    fn empty_candidates_yield_empty() {
        assert!(filter_usable(&[], &[UsableProfile::new(1)]).is_empty());
    }

    #[test]
    fn empty_usable_yields_empty() {
        assert!(filter_usable(&[cand(1)], &[]).is_empty());
    }

    // ─── Intersection ───────────────────────────────────────────────────

    #[test]
    fn intersection_by_sub_id() {
        let candidates = vec![cand(1), cand(3), cand(5)];
        let usable = vec![
            UsableProfile::new(2),
            UsableProfile::new(3),
            UsableProfile::new(5),
        ];
        let filtered = filter_usable(&candidates, &usable);
        let ids: Vec<SubId> = filtered.iter().map(|c| c.sub_id).collect();
        assert_eq!(ids, vec![3, 5]);
    }

    #[test]
    fn disjoint_sets_yield_empty() {
        let candidates = vec![cand(1), cand(2)];
        let usable = vec![UsableProfile::new(7), UsableProfile::new(9)];
        assert!(filter_usable(&candidates, &usable).is_empty());
    }

    #[test]
    fn unsorted_inputs_are_handled() {
        let candidates = vec![cand(9), cand(2), cand(5)];
        let usable = vec![UsableProfile::new(5), UsableProfile::new(9)];
        let ids: Vec<SubId> = filter_usable(&candidates, &usable)
            .iter()
            .map(|c| c.sub_id)
            .collect();
        assert_eq!(ids, vec![5, 9]);
    }

    #[test]
    fn shorter_side_exhaustion_terminates() {
        // Usable runs out first while candidates still have larger ids.
        let candidates = vec![cand(1), cand(50), cand(60), cand(70)];
        let usable = vec![UsableProfile::new(1)];
        let filtered = filter_usable(&candidates, &usable);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sub_id, 1);
    }

    #[test]
    fn duplicate_usable_entries_emit_candidate_once() {
        let candidates = vec![cand(4)];
        let usable = vec![UsableProfile::new(4), UsableProfile::new(4)];
        assert_eq!(filter_usable(&candidates, &usable).len(), 1);
    }

    // ─── Purity ─────────────────────────────────────────────────────────

    #[test]
    fn caller_inputs_are_not_mutated() {
        let candidates = vec![cand(9), cand(2)];
        let usable = vec![UsableProfile::new(9), UsableProfile::new(2)];
        let candidates_before = candidates.clone();
        let usable_before = usable.clone();
        let _ = filter_usable(&candidates, &usable);
        assert_eq!(candidates, candidates_before);
        assert_eq!(usable, usable_before);
    }
}
