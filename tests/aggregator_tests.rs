use trace_digest::aggregator::{rank, AggregateState};
use trace_digest::parser::TraceBlock;

fn block(header: &str, frames: &[&str], timestamp: &str) -> TraceBlock {
    let mut lines = vec![header.to_string()];
    lines.extend(frames.iter().map(|f| f.to_string()));
    TraceBlock::new(lines, Some(timestamp.to_string()))
}

#[test]
fn test_register_splits_header_from_body() {
    let mut state = AggregateState::new();
    state
        .register(&block(
            "2016-04-20 10:00:00 ERROR boom",
            &["\tat a.B.c(B.java:1)", "\tat a.B.d(B.java:2)"],
            "2016-04-20 10:00:00",
        ))
        .unwrap();

    let group = state
        .get("\tat a.B.c(B.java:1)\n\tat a.B.d(B.java:2)")
        .unwrap();
    assert_eq!(group.count, 1);
    assert_eq!(group.headers, vec!["2016-04-20 10:00:00 ERROR boom"]);
    assert_eq!(group.timestamps, vec!["10:00:00"]);
}

#[test]
fn test_different_bodies_make_different_groups() {
    let mut state = AggregateState::new();
    state
        .register(&block("h", &["\tat a.B.c(B.java:1)"], "2016-04-20 10:00:00"))
        .unwrap();
    state
        .register(&block("h", &["\tat a.B.c(B.java:2)"], "2016-04-20 10:00:00"))
        .unwrap();

    assert_eq!(state.len(), 2);
    assert_eq!(state.total_occurrences(), 2);
}

#[test]
fn test_rank_by_count_then_encounter_order() {
    let mut state = AggregateState::new();
    let blocks = [
        block("h1", &["\tat first"], "2016-04-20 10:00:00"),
        block("h2", &["\tat second"], "2016-04-20 10:00:01"),
        block("h3", &["\tat third"], "2016-04-20 10:00:02"),
        block("h4", &["\tat third"], "2016-04-20 10:00:03"),
        block("h5", &["\tat second"], "2016-04-20 10:00:04"),
        block("h6", &["\tat fourth"], "2016-04-20 10:00:05"),
    ];
    state.register_all(&blocks).unwrap();

    let ranked = rank(&state);
    let order: Vec<(&str, usize)> = ranked.iter().map(|r| (r.body, r.group.count)).collect();

    assert_eq!(
        order,
        vec![
            ("\tat second", 2),
            ("\tat third", 2),
            ("\tat first", 1),
            ("\tat fourth", 1),
        ]
    );
    assert_eq!(ranked[0].group.first_header(), Some("h2"));
}

#[test]
fn test_state_accumulates_until_cleared() {
    let mut state = AggregateState::new();
    let b = block("h", &["\tat a"], "2016-04-20 10:00:00");

    state.register(&b).unwrap();
    state.register(&b).unwrap();
    assert_eq!(state.get("\tat a").unwrap().count, 2);

    state.clear();
    state.register(&b).unwrap();
    assert_eq!(state.get("\tat a").unwrap().count, 1);
}
