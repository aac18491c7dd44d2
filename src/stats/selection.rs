use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::cumulative::CumulativePoint;
use super::daily::DailyPoint;
use crate::calendar::JournalCalendar;

/// The graph point picked by a tap or cursor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphSelection {
    pub day: NaiveDate,
    pub daily_profit: f64,
    pub cumulative_profit: f64,
}

/// Nearest daily point to an arbitrary instant, with its cumulative value
pub fn resolve_selection(
    query: DateTime<Utc>,
    daily: &[DailyPoint],
    cumulative: &[CumulativePoint],
    calendar: &JournalCalendar,
) -> Option<GraphSelection> {
    resolve_selection_on_day(calendar.day_of(query), daily, cumulative, calendar)
}

/// Nearest daily point to `target`.
///
/// Distance is the time between the two days' starts in the calendar zone, so
/// a 23-hour DST day counts as closer than a 24-hour one. On a tie the point
/// met first wins. The cumulative value comes from the same day when present,
/// otherwise from the nearest cumulative point, otherwise 0.
pub fn resolve_selection_on_day(
    target: NaiveDate,
    daily: &[DailyPoint],
    cumulative: &[CumulativePoint],
    calendar: &JournalCalendar,
) -> Option<GraphSelection> {
    let nearest = nearest_by_day(daily, target, calendar, |p| p.day)?;

    let cumulative_profit = cumulative
        .iter()
        .find(|c| c.day == nearest.day)
        .or_else(|| nearest_by_day(cumulative, nearest.day, calendar, |c| c.day))
        .map(|c| c.cumulative_profit)
        .unwrap_or(0.0);

    Some(GraphSelection {
        day: nearest.day,
        daily_profit: nearest.profit,
        cumulative_profit,
    })
}

/// Keep a selection only while its day is still on the graph, refreshing its values
pub fn retain_selection(
    selection: Option<GraphSelection>,
    daily: &[DailyPoint],
    cumulative: &[CumulativePoint],
    calendar: &JournalCalendar,
) -> Option<GraphSelection> {
    let selected = selection?;
    if !daily.iter().any(|p| p.day == selected.day) {
        return None;
    }
    resolve_selection_on_day(selected.day, daily, cumulative, calendar)
}

fn nearest_by_day<'a, T>(
    items: &'a [T],
    target: NaiveDate,
    calendar: &JournalCalendar,
    day: impl Fn(&T) -> NaiveDate,
) -> Option<&'a T> {
    let target_start = calendar.start_of_day(target);
    let mut best: Option<(&T, i64)> = None;

    for item in items {
        let distance = (calendar.start_of_day(day(item)) - target_start).num_seconds().abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((item, distance)),
        }
    }

    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::cumulative::cumulative_points;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc() -> JournalCalendar {
        JournalCalendar::utc()
    }

    fn daily(points: &[(u32, f64)]) -> Vec<DailyPoint> {
        points
            .iter()
            .map(|&(d, profit)| DailyPoint { day: ymd(2024, 3, d), profit, trade_count: 1 })
            .collect()
    }

    #[test]
    fn test_exact_day_selected() {
        let daily = daily(&[(1, 100.0), (5, -40.0), (9, 25.0)]);
        let cumulative = cumulative_points(&daily);
        let query = Utc.with_ymd_and_hms(2024, 3, 5, 18, 45, 0).unwrap();

        let selection = resolve_selection(query, &daily, &cumulative, &JournalCalendar::utc()).unwrap();

        assert_eq!(selection.day, ymd(2024, 3, 5));
        assert_eq!(selection.daily_profit, -40.0);
        assert_eq!(selection.cumulative_profit, 60.0);
    }

    #[test]
    fn test_nearest_day_selected() {
        let daily = daily(&[(1, 100.0), (5, -40.0), (9, 25.0)]);
        let cumulative = cumulative_points(&daily);

        let selection = resolve_selection_on_day(ymd(2024, 3, 8), &daily, &cumulative, &utc()).unwrap();
        assert_eq!(selection.day, ymd(2024, 3, 9));
        assert_eq!(selection.cumulative_profit, 85.0);

        // Past the last point
        let selection = resolve_selection_on_day(ymd(2024, 4, 30), &daily, &cumulative, &utc()).unwrap();
        assert_eq!(selection.day, ymd(2024, 3, 9));
    }

    #[test]
    fn test_tie_goes_to_first_point() {
        let daily = daily(&[(1, 10.0), (5, 20.0)]);
        let cumulative = cumulative_points(&daily);

        let selection = resolve_selection_on_day(ymd(2024, 3, 3), &daily, &cumulative, &utc()).unwrap();
        assert_eq!(selection.day, ymd(2024, 3, 1));
    }

    #[test]
    fn test_cumulative_fallbacks() {
        let daily = daily(&[(4, 10.0)]);
        let cumulative = vec![
            CumulativePoint { day: ymd(2024, 3, 1), cumulative_profit: 1.0 },
            CumulativePoint { day: ymd(2024, 3, 6), cumulative_profit: 6.0 },
        ];

        let selection = resolve_selection_on_day(ymd(2024, 3, 4), &daily, &cumulative, &utc()).unwrap();
        assert_eq!(selection.cumulative_profit, 6.0);

        let selection = resolve_selection_on_day(ymd(2024, 3, 4), &daily, &[], &utc()).unwrap();
        assert_eq!(selection.cumulative_profit, 0.0);
    }

    #[test]
    fn test_no_points_no_selection() {
        assert_eq!(resolve_selection_on_day(ymd(2024, 3, 4), &[], &[], &utc()), None);
    }

    #[test]
    fn test_retain_selection() {
        let old = daily(&[(1, 10.0), (5, 20.0)]);
        let selection = resolve_selection_on_day(ymd(2024, 3, 5), &old, &cumulative_points(&old), &utc());

        let updated = daily(&[(1, 10.0), (5, 35.0)]);
        let kept = retain_selection(selection, &updated, &cumulative_points(&updated), &utc()).unwrap();
        assert_eq!(kept.daily_profit, 35.0);
        assert_eq!(kept.cumulative_profit, 45.0);

        let shrunk = daily(&[(1, 10.0)]);
        assert_eq!(retain_selection(selection, &shrunk, &cumulative_points(&shrunk), &utc()), None);
    }

    #[test]
    fn test_distance_follows_dst_day_length() {
        // New York springs forward on 2024-03-10: the 10th is only 23 hours long,
        // so the 11th starts closer to the 10th than the 9th does
        let new_york = JournalCalendar::from_name("America/New_York").unwrap();
        let daily = daily(&[(9, 10.0), (11, 20.0)]);
        let cumulative = cumulative_points(&daily);
        let query = Utc.with_ymd_and_hms(2024, 3, 10, 17, 0, 0).unwrap();

        let selection = resolve_selection(query, &daily, &cumulative, &new_york).unwrap();
        assert_eq!(selection.day, ymd(2024, 3, 11));
        assert_eq!(selection.cumulative_profit, 30.0);

        // Without DST both neighbours are a day away and the first one wins
        let selection = resolve_selection(query, &daily, &cumulative, &utc()).unwrap();
        assert_eq!(selection.day, ymd(2024, 3, 9));
    }
}
