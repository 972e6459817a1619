//! Recurrence expansion
//!
//! Expands an activity's recurrence set into concrete occurrence starts.
//! The set is the activity's own start, every date produced by its `rrules`,
//! and its `rdates`; dates produced by `exrules` and listed in `exdates` are
//! removed. Every occurrence keeps the time of day of the activity's start.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};

use crate::models::{Activity, Frequency, RecurrenceRule};

/// Dates produced by one rule, anchored at `anchor`, up to `limit` inclusive
///
/// The anchor is the first occurrence and counts toward `count`. Monthly
/// rules landing on a day the month lacks fall back to its last day.
pub fn rule_dates(rule: &RecurrenceRule, anchor: NaiveDate, limit: NaiveDate) -> Vec<NaiveDate> {
    let interval = rule.interval.max(1);
    let last = match rule.until {
        Some(until) if until < limit => until,
        _ => limit,
    };

    let mut dates = Vec::new();
    let mut step: u32 = 0;
    loop {
        if rule.count.is_some_and(|count| step >= count) {
            break;
        }

        let Some(offset) = step.checked_mul(interval) else {
            break;
        };
        let Some(date) = nth_date(rule.frequency, anchor, offset) else {
            break;
        };
        if date > last {
            break;
        }

        dates.push(date);
        step += 1;
    }
    dates
}

fn nth_date(frequency: Frequency, anchor: NaiveDate, offset: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => anchor.checked_add_signed(Duration::days(i64::from(offset))),
        Frequency::Weekly => anchor.checked_add_signed(Duration::weeks(i64::from(offset))),
        Frequency::Monthly => anchor.checked_add_months(Months::new(offset)),
    }
}

/// Occurrence dates of a recurring activity up to `limit` inclusive, sorted
pub fn occurrence_dates(activity: &Activity, limit: NaiveDate) -> Vec<NaiveDate> {
    let anchor = activity.start.date_naive();
    let recurrence = &activity.recurrence;

    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    if anchor <= limit {
        dates.insert(anchor);
    }
    for rule in &recurrence.rrules {
        dates.extend(rule_dates(rule, anchor, limit));
    }
    dates.extend(recurrence.rdates.iter().copied().filter(|d| *d <= limit));

    for rule in &recurrence.exrules {
        for date in rule_dates(rule, anchor, limit) {
            dates.remove(&date);
        }
    }
    for date in &recurrence.exdates {
        dates.remove(date);
    }

    dates.into_iter().collect()
}

/// Occurrence starts of a recurring activity inside `[from, to]`
pub fn occurrences_between(
    activity: &Activity,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let start_time = activity.start.time();
    occurrence_dates(activity, to.date_naive())
        .into_iter()
        .map(|date| date.and_time(start_time).and_utc())
        .filter(|start| *start >= from && *start <= to)
        .collect()
}
