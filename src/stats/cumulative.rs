use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::daily::{DailyIndex, DailyPoint};
use super::period::{DateInterval, trades_in};
use crate::calendar::{JournalCalendar, next_day};
use crate::models::Trade;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub day: NaiveDate,
    pub cumulative_profit: f64,
}

/// Inclusive day range of the graph's x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDomain {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Daily and cumulative profit over one period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitSeries {
    pub daily: Vec<DailyPoint>,
    pub cumulative: Vec<CumulativePoint>,
    pub x_domain: Option<DayDomain>,
}

impl ProfitSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Series for the trades inside `interval`; empty when there is no interval
    pub fn build(trades: &[Trade], interval: Option<&DateInterval>, calendar: &JournalCalendar) -> Self {
        let Some(interval) = interval else {
            return Self::empty();
        };

        let in_period = trades_in(trades, interval);
        let index = DailyIndex::build(in_period, calendar);
        Self::from_daily(index.points().to_vec())
    }

    /// Running total with a period-local baseline of 0
    pub fn from_daily(daily: Vec<DailyPoint>) -> Self {
        let cumulative = cumulative_points(&daily);
        let x_domain = x_domain(&daily);

        Self { daily, cumulative, x_domain }
    }

    /// Cumulative profit at the end of the period
    pub fn total(&self) -> f64 {
        self.cumulative.last().map(|p| p.cumulative_profit).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }
}

pub fn cumulative_points(daily: &[DailyPoint]) -> Vec<CumulativePoint> {
    let mut running = 0.0;
    daily
        .iter()
        .map(|p| {
            running += p.profit;
            CumulativePoint { day: p.day, cumulative_profit: running }
        })
        .collect()
}

/// `[first, last + 1 day]` so the latest point is not drawn on the right edge
pub fn x_domain(daily: &[DailyPoint]) -> Option<DayDomain> {
    let first = daily.first()?.day;
    let last = daily.last()?.day;

    Some(DayDomain { start: first, end: next_day(last) })
}
