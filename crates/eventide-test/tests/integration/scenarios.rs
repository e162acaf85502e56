use eventide_core::types::Repeat;
use eventide_query::{Event, Occurring, QuerySet};
use eventide_rule::error::RuleViolation;
use eventide_rule::{OccurrenceRule, Timing, combine_occurrences};
use eventide_test::{at, date, day, rule, sample_calendar};

#[test_log::test]
fn weekly_rule_in_a_window() {
    let weekly = rule(
        at(2021, 1, 1, 9),
        1,
        Some(Repeat::Weekly),
        Some(date(2021, 1, 22)),
        (),
    );

    let spans: Vec<_> = weekly
        .expand(day(2021, 1, 10), day(2021, 1, 31))
        .map(|occ| (occ.start, occ.end))
        .collect();

    assert_eq!(
        spans,
        vec![
            (at(2021, 1, 15, 9), at(2021, 1, 15, 10)),
            (at(2021, 1, 22, 9), at(2021, 1, 22, 10)),
        ]
    );
}

#[test_log::test]
fn merge_orders_single_rules_by_start() {
    let a = rule(at(2021, 2, 1, 8), 1, None, None, "A");
    let b = rule(at(2021, 2, 1, 7), 1, None, None, "B");

    let merged: Vec<_> = combine_occurrences([a.expand(None, None), b.expand(None, None)], None)
        .map(|occ| *occ.payload)
        .collect();

    assert_eq!(merged, vec!["B", "A"]);
}

#[test]
fn repeat_until_without_repeat_is_rejected() {
    let timing = Timing::new(at(2021, 1, 1, 9), at(2021, 1, 1, 10)).with_repeat_until(date(2021, 1, 22));

    let err = OccurrenceRule::new(timing, ()).expect_err("repeat_until needs a repeat interval");
    assert_eq!(err.violation(), Some(RuleViolation::RepeatIntervalRequired));
    assert!(err.to_string().contains("Repeat interval required"));
}

#[test_log::test]
fn calendar_window_across_events() {
    let events = sample_calendar();
    let qs = QuerySet::new(&events);

    let listed: Vec<_> = qs
        .all_occurrences(day(2021, 1, 18), day(2021, 1, 19), None)
        .map(|occ| (occ.start, *occ.payload))
        .collect();

    assert_eq!(
        listed,
        vec![
            // The Jan 17 night shift runs until 04:00 on the 18th.
            (at(2021, 1, 17, 22), "night"),
            (at(2021, 1, 18, 9), "standup"),
            (at(2021, 1, 18, 22), "night"),
            (at(2021, 1, 19, 22), "night"),
        ]
    );
}

fn titles(qs: &QuerySet<'_, Event<&'static str>>) -> Vec<String> {
    qs.iter().map(|event| event.title().to_string()).collect()
}

#[test]
fn calendar_events_for_period() {
    let events = sample_calendar();

    let approx = titles(&QuerySet::new(&events).for_period(day(2021, 2, 14), day(2021, 2, 16), false));
    assert_eq!(approx, vec!["Standup", "Board", "Anniversary", "Heartbeat"]);

    // Neither the yearly anniversary nor the capped heartbeat reach February 2021.
    let exact = titles(&QuerySet::new(&events).for_period(day(2021, 2, 14), day(2021, 2, 16), true));
    assert_eq!(exact, vec!["Standup", "Board"]);
}

#[test]
fn event_with_several_rules_merges_them() {
    let events = sample_calendar();
    let board = events
        .iter()
        .find(|event| event.title() == "Board")
        .expect("board event");

    let starts: Vec<_> = board
        .all_occurrences(day(2021, 2, 1), day(2021, 3, 31), None)
        .map(|occ| (occ.start, *occ.payload))
        .collect();

    assert_eq!(
        starts,
        vec![
            (at(2021, 2, 2, 14), "board"),
            (at(2021, 2, 15, 9), "board-offsite"),
            (at(2021, 3, 2, 14), "board"),
        ]
    );
}

#[test]
fn agenda_orders_by_next_occurrence() {
    let events = sample_calendar();
    let agenda: Vec<_> = QuerySet::new(&events)
        .sort_by_next(day(2021, 3, 20))
        .into_iter()
        .map(Event::title)
        .collect();

    assert_eq!(agenda, vec!["Standup", "Board", "Anniversary"]);

    let next = QuerySet::new(&events)
        .next_occurrence(day(2021, 3, 20), None)
        .expect("something is scheduled");
    assert_eq!((next.start, *next.payload), (at(2021, 3, 22, 9), "standup"));
}

#[test]
fn empty_results_are_not_errors() {
    let events = sample_calendar();
    let qs = QuerySet::new(&events);

    // Every open-ended repeat has used up its generated starts by 2250.
    assert_eq!(qs.all_occurrences(day(2250, 1, 1), day(2250, 1, 2), None).count(), 0);
    assert!(qs.next_occurrence(day(2250, 1, 1), None).is_none());
    assert!(qs.sort_by_next(day(2250, 1, 1)).is_empty());

    let empty = events.last().expect("empty event");
    assert!(empty.next_occurrence(None, None).is_none());
}
