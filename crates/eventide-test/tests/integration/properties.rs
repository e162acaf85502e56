use chrono::{DateTime, Utc};
use eventide_core::boundary::DateBound;
use eventide_core::constants::REPEAT_MAX;
use eventide_query::{Event, Occurring, QuerySet};
use eventide_rule::{Occurrence, combine_occurrences};
use eventide_test::{at, day, instant, rule, sample_calendar};

type Window = (Option<DateBound>, Option<DateBound>);

fn windows() -> Vec<Window> {
    vec![
        (None, None),
        (day(2021, 1, 1), None),
        (None, day(2021, 1, 31)),
        (day(2021, 1, 18), day(2021, 1, 19)),
        (day(2021, 2, 14), day(2021, 2, 16)),
        (day(2021, 3, 1), day(2021, 6, 30)),
        (instant(at(2021, 1, 10, 2)), instant(at(2021, 1, 10, 3))),
        (day(2019, 5, 5), day(2019, 5, 5)),
        (day(2040, 1, 1), None),
    ]
}

fn keys(qs: &QuerySet<'_, Event<&'static str>>) -> Vec<usize> {
    qs.keys().to_vec()
}

fn spans<'a, P: 'a>(occurrences: impl Iterator<Item = Occurrence<'a, P>>) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    occurrences.map(|occ| (occ.start, occ.end)).collect()
}

#[test]
fn single_rule_yields_itself_only_inside_the_window() {
    let single = rule(at(2021, 1, 10, 12), 2, None, None, ());

    let cases = [
        (None, None, 1),
        (day(2021, 1, 10), day(2021, 1, 10), 1),
        (instant(at(2021, 1, 10, 12)), instant(at(2021, 1, 10, 12)), 1),
        (day(2021, 1, 11), None, 0),
        (None, day(2021, 1, 9), 0),
        // Overlapping the window is not enough for a single rule.
        (instant(at(2021, 1, 10, 13)), None, 0),
        (None, instant(at(2021, 1, 10, 11)), 0),
    ];

    for (index, (from, to, expected)) in cases.into_iter().enumerate() {
        assert_eq!(
            single.expand(from, to).count(),
            expected,
            "case {index}: from {from:?} to {to:?}"
        );
    }
}

#[test_log::test]
fn every_instance_keeps_its_rule_duration() {
    for event in sample_calendar() {
        for rule in event.rules() {
            for (from, to) in windows() {
                for occ in rule.expand(from, to) {
                    assert_eq!(occ.end - occ.start, rule.duration(), "{}", event.title());
                }
            }
        }
    }
}

#[test]
fn expansion_never_exceeds_the_cap() {
    for event in sample_calendar() {
        for rule in event.rules() {
            for (from, to) in windows() {
                assert!(rule.expand(from, to).count() <= usize::from(REPEAT_MAX));
            }
        }
    }

    let heartbeat = sample_calendar()
        .into_iter()
        .find(|event| event.title() == "Heartbeat")
        .expect("heartbeat event");
    assert_eq!(
        heartbeat.all_occurrences(None, None, None).count(),
        usize::from(REPEAT_MAX)
    );
}

#[test_log::test]
fn merge_is_ordered_and_count_conserving() {
    let events = sample_calendar();
    let rules: Vec<_> = events.iter().flat_map(Occurring::rules).collect();

    for (from, to) in windows() {
        let mut expected: Vec<_> = rules
            .iter()
            .flat_map(|rule| rule.expand(from, to))
            .map(|occ| (occ.start, *occ.payload))
            .collect();
        // Stable, so equal starts keep source order.
        expected.sort_by_key(|(start, _)| *start);

        let merged: Vec<_> = combine_occurrences(rules.iter().map(|rule| rule.expand(from, to)), None)
            .map(|occ| (occ.start, *occ.payload))
            .collect();
        assert_eq!(merged, expected);

        for limit in [0, 1, 5, expected.len() + 3] {
            let capped: Vec<_> =
                combine_occurrences(rules.iter().map(|rule| rule.expand(from, to)), Some(limit))
                    .map(|occ| (occ.start, *occ.payload))
                    .collect();
            assert_eq!(capped, expected[..limit.min(expected.len())]);
        }
    }
}

#[test_log::test]
fn approximate_filter_contains_exact_filter() {
    let events = sample_calendar();

    for (from, to) in windows() {
        let approx = keys(&QuerySet::new(&events).for_period(from, to, false));
        let exact = keys(&QuerySet::new(&events).for_period(from, to, true));

        let occurring: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.occurrences(from, to).next().is_some())
            .map(|(key, _)| key)
            .collect();

        assert!(
            exact.iter().all(|key| approx.contains(key)),
            "exact {exact:?} not within approximate {approx:?} for {from:?}..{to:?}"
        );
        assert_eq!(exact, occurring, "window {from:?}..{to:?}");
    }
}

#[test]
fn next_occurrence_is_the_earliest_from_the_window() {
    let events = sample_calendar();

    for from in [day(2021, 1, 1), day(2021, 1, 18), day(2021, 3, 20), day(2040, 1, 1)] {
        let bound = from.map(DateBound::lower);

        for event in &events {
            let next = event.next_occurrence(from, None);
            let earliest = event.all_occurrences(from, None, None).min_by_key(|occ| occ.start);
            assert_eq!(next.map(|occ| occ.start), earliest.map(|occ| occ.start));

            if let (Some(occ), Some(bound)) = (next, bound) {
                assert!(occ.end >= bound, "{} ends before {bound}", event.title());
            }
        }
    }
}

#[test]
fn all_occurrences_is_repeatable() {
    let events = sample_calendar();
    let qs = QuerySet::new(&events);

    for (from, to) in windows() {
        let first = spans(qs.all_occurrences(from, to, Some(50)));
        let second = spans(qs.all_occurrences(from, to, Some(50)));
        assert_eq!(first, second);
    }
}
