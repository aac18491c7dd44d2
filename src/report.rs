use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::Result;
use crate::journal::{Clock, Journal, TradeStore};
use crate::risk::RiskTargets;
use crate::stats::{
    DateInterval, DrawdownResult, MonthlyProfit, ProfitGraphRange, ProfitSeries, TradeSummary, monthly_breakdown,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawdownReport {
    #[serde(flatten)]
    pub result: DrawdownResult,
    pub drawdown: f64,
}

impl From<DrawdownResult> for DrawdownReport {
    fn from(result: DrawdownResult) -> Self {
        Self { drawdown: result.drawdown(), result }
    }
}

/// Everything the dashboard shows, as plain numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub range: ProfitGraphRange,
    pub interval: Option<DateInterval>,
    pub summary: TradeSummary,
    pub period_summary: TradeSummary,
    pub current_month_total: f64,
    pub monthly: Vec<MonthlyProfit>,
    pub series: ProfitSeries,
    pub max_drawdown: Option<DrawdownReport>,
    pub latest_balance: f64,
    /// 1R/2R/3R against the latest balance
    pub risk: Option<RiskTargets>,
}

impl DashboardReport {
    pub fn from_journal<S: TradeStore, C: Clock>(journal: &Journal<S, C>) -> Self {
        let book = journal.snapshot();
        let graph = journal.graph();
        let latest_balance = journal.latest_balance();

        Self {
            generated_at: journal.now(),
            timezone: journal.calendar().timezone().name().to_string(),
            range: graph.range,
            interval: graph.interval,
            summary: journal.summary(),
            period_summary: journal.period_summary(),
            current_month_total: journal.current_month_total(),
            monthly: monthly_breakdown(&book.daily),
            series: graph.series.clone(),
            max_drawdown: graph.max_drawdown.map(DrawdownReport::from),
            latest_balance,
            risk: journal.risk_targets(latest_balance),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One row of the exported equity curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    pub date: String,
    pub daily_pnl: f64,
    pub cumulative_pnl: f64,
    pub trade_count: u32,
}

pub fn equity_curve(series: &ProfitSeries) -> Vec<EquityCurvePoint> {
    series
        .daily
        .iter()
        .zip(series.cumulative.iter())
        .map(|(daily, cumulative)| EquityCurvePoint {
            date: daily.day.format("%Y-%m-%d").to_string(),
            daily_pnl: daily.profit,
            cumulative_pnl: cumulative.cumulative_profit,
            trade_count: daily.trade_count,
        })
        .collect()
}

/// Write the equity curve as CSV with a header row
pub fn write_equity_csv<W: Write>(writer: W, series: &ProfitSeries) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in equity_curve(series) {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}
