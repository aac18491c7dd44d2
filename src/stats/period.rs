use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::{JournalCalendar, first_of_month, months_before};
use crate::models::Trade;

/// Selectable window of the profit graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProfitGraphRange {
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "ALL")]
    All,
}

impl ProfitGraphRange {
    pub const ALL_RANGES: [ProfitGraphRange; 3] = [Self::OneMonth, Self::ThreeMonths, Self::All];

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for ProfitGraphRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProfitGraphRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "ALL" => Ok(Self::All),
            other => Err(format!("Unknown range '{}', expected 1M, 3M or ALL", other)),
        }
    }
}

/// Half-open interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateInterval {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Earliest dated trade of the whole, unfiltered set
pub fn earliest_trade_date(trades: &[Trade]) -> Option<DateTime<Utc>> {
    trades.iter().filter_map(|t| t.date).min()
}

/// Concrete interval for a range, ending at `now`.
///
/// `All` starts at the month of `earliest` and yields `None` when there is no
/// dated trade at all; callers show an empty graph in that case.
pub fn period_interval(
    range: ProfitGraphRange,
    now: DateTime<Utc>,
    calendar: &JournalCalendar,
    earliest: Option<DateTime<Utc>>,
) -> Option<DateInterval> {
    let this_month = first_of_month(calendar.day_of(now));

    let start = match range {
        ProfitGraphRange::OneMonth => calendar.start_of_day(this_month),
        ProfitGraphRange::ThreeMonths => calendar.start_of_day(months_before(this_month, 2)),
        ProfitGraphRange::All => calendar.start_of_month(earliest?),
    };

    log::debug!("Range {} resolved to [{}, {})", range, start, now);

    Some(DateInterval { start, end: now })
}

/// Dated trades inside the interval
pub fn trades_in<'a>(trades: &'a [Trade], interval: &DateInterval) -> Vec<&'a Trade> {
    trades
        .iter()
        .filter(|t| t.date.is_some_and(|d| interval.contains(d)))
        .collect()
}
