//! Rank exception groups by frequency.

use super::groups::{AggregateState, ExceptionGroup};
use log::debug;

/// One ranked report entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedException<'a> {
    /// Trace body (grouping key)
    pub body: &'a str,

    pub group: &'a ExceptionGroup,
}

/// Rank groups by descending occurrence count
///
/// **Public** - used by every report writer
///
/// Groups with equal counts keep their first-encounter order.
pub fn rank(state: &AggregateState) -> Vec<RankedException<'_>> {
    let mut ranked: Vec<RankedException<'_>> = state
        .iter()
        .map(|(body, group)| RankedException { body, group })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.group.count.cmp(&a.group.count));

    debug!("Ranked {} exception groups", ranked.len());

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(state: &mut AggregateState, body: &str, times: usize) {
        let group = state.group_mut(body.to_string());
        group.count += times;
    }

    #[test]
    fn test_rank_descending() {
        let mut state = AggregateState::new();
        bump(&mut state, "rare", 1);
        bump(&mut state, "common", 5);
        bump(&mut state, "medium", 3);

        let bodies: Vec<&str> = rank(&state).iter().map(|r| r.body).collect();

        assert_eq!(bodies, vec!["common", "medium", "rare"]);
    }

    #[test]
    fn test_rank_ties_keep_encounter_order() {
        let mut state = AggregateState::new();
        bump(&mut state, "b", 2);
        bump(&mut state, "a", 2);
        bump(&mut state, "c", 4);
        bump(&mut state, "d", 2);

        let bodies: Vec<&str> = rank(&state).iter().map(|r| r.body).collect();

        assert_eq!(bodies, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&AggregateState::new()).is_empty());
    }
}
