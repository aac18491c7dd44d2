use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::daily::DailyIndex;
use crate::models::Trade;

/// Headline statistics over a set of trades
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub total_trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub breakevens: u32,
    /// Share of trades with strictly positive profit, 0.0..=1.0
    pub win_rate: f64,
    pub total_profit: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
}

impl TradeSummary {
    /// Undated trades are ignored, like everywhere else in the journal
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut summary = Self::default();
        let mut best: Option<f64> = None;
        let mut worst: Option<f64> = None;

        for trade in trades.into_iter().filter(|t| t.date.is_some()) {
            let profit = trade.profit();
            summary.total_trades += 1;
            summary.total_profit += profit;

            if profit > 0.0 {
                summary.wins += 1;
                summary.gross_profit += profit;
            } else if profit < 0.0 {
                summary.losses += 1;
                summary.gross_loss += profit.abs();
            } else {
                summary.breakevens += 1;
            }

            best = Some(best.map_or(profit, |b| b.max(profit)));
            worst = Some(worst.map_or(profit, |w| w.min(profit)));
        }

        summary.win_rate = if summary.total_trades > 0 {
            summary.wins as f64 / summary.total_trades as f64
        } else {
            0.0
        };

        summary.profit_factor = if summary.gross_loss > 0.0 {
            summary.gross_profit / summary.gross_loss
        } else if summary.gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        summary.best_trade = best.unwrap_or(0.0);
        summary.worst_trade = worst.unwrap_or(0.0);
        summary
    }
}

/// Profit of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProfit {
    pub year: i32,
    pub month: u32,
    pub profit: f64,
    pub trading_days: u32,
}

/// Net profit of the month containing `day`
pub fn month_total(index: &DailyIndex, day: NaiveDate) -> f64 {
    index
        .points()
        .iter()
        .filter(|p| p.day.year() == day.year() && p.day.month() == day.month())
        .map(|p| p.profit)
        .sum()
}

/// Per-month totals, ascending
pub fn monthly_breakdown(index: &DailyIndex) -> Vec<MonthlyProfit> {
    let mut months: Vec<MonthlyProfit> = Vec::new();

    for point in index.points() {
        let (year, month) = (point.day.year(), point.day.month());
        match months.last_mut() {
            Some(m) if m.year == year && m.month == month => {
                m.profit += point.profit;
                m.trading_days += 1;
            }
            _ => months.push(MonthlyProfit {
                year,
                month,
                profit: point.profit,
                trading_days: 1,
            }),
        }
    }

    months
}

/// Balance after the most recent dated trade, 0 without one.
///
/// Among trades sharing the latest date the last one given wins.
pub fn latest_balance(trades: &[Trade]) -> f64 {
    trades
        .iter()
        .filter_map(|t| t.date.map(|d| (d, t.balance_after)))
        .fold(None, |latest: Option<(DateTime<Utc>, f64)>, (date, balance)| match latest {
            Some((latest_date, _)) if date < latest_date => latest,
            _ => Some((date, balance)),
        })
        .map(|(_, balance)| balance)
        .unwrap_or(0.0)
}
