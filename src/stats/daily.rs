use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::JournalCalendar;
use crate::models::Trade;

/// Net profit of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: NaiveDate,
    pub profit: f64,
    pub trade_count: u32,
}

/// Day-indexed profit totals.
///
/// Built in one pass over the trades and then only read. Lookups by day are
/// O(1); `points()` is ascending by day with one entry per day. There is no
/// incremental update: a changed trade set means a new index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyIndex {
    points: Vec<DailyPoint>,
    by_day: HashMap<NaiveDate, usize>,
}

impl DailyIndex {
    pub fn build<'a, I>(trades: I, calendar: &JournalCalendar) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut daily_map: HashMap<NaiveDate, (f64, u32)> = HashMap::new();
        let mut undated = 0usize;

        for trade in trades {
            let Some(date) = trade.date else {
                undated += 1;
                continue;
            };

            let entry = daily_map.entry(calendar.day_of(date)).or_insert((0.0, 0));
            entry.0 += trade.profit();
            entry.1 += 1;
        }

        if undated > 0 {
            log::warn!("Skipped {} trades without a date", undated);
        }

        let mut points: Vec<DailyPoint> = daily_map
            .into_iter()
            .map(|(day, (profit, trade_count))| DailyPoint { day, profit, trade_count })
            .collect();
        points.sort_by_key(|p| p.day);

        Self::from_sorted(points)
    }

    fn from_sorted(points: Vec<DailyPoint>) -> Self {
        let by_day = points.iter().enumerate().map(|(i, p)| (p.day, i)).collect();
        Self { points, by_day }
    }

    pub fn get(&self, day: NaiveDate) -> Option<&DailyPoint> {
        self.by_day.get(&day).map(|&i| &self.points[i])
    }

    /// Net profit of a day, 0 for days without trades
    pub fn profit_on(&self, day: NaiveDate) -> f64 {
        self.get(day).map(|p| p.profit).unwrap_or(0.0)
    }

    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.profit).sum()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.day)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.day)
    }
}

/// Trades that fall on `day`, in the order given
pub fn trades_on<'a>(trades: &'a [Trade], calendar: &JournalCalendar, day: NaiveDate) -> Vec<&'a Trade> {
    trades
        .iter()
        .filter(|t| t.date.is_some_and(|d| calendar.day_of(d) == day))
        .collect()
}
