use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cumulative::CumulativePoint;

/// Worst peak-to-trough decline of a cumulative series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownResult {
    pub peak_day: NaiveDate,
    pub trough_day: NaiveDate,
    pub peak_value: f64,
    pub trough_value: f64,
}

impl DrawdownResult {
    /// Always <= 0
    pub fn drawdown(&self) -> f64 {
        self.trough_value - self.peak_value
    }
}

/// Maximum drawdown in one forward pass.
///
/// A new high moves the running peak and is never a trough candidate. A
/// candidate only replaces the current best when strictly deeper, so the
/// earliest of several equally deep troughs is reported.
pub fn max_drawdown(points: &[CumulativePoint]) -> Option<DrawdownResult> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut peak_value = first.cumulative_profit;
    let mut peak_day = first.day;
    let mut best: Option<DrawdownResult> = None;

    for p in rest {
        if p.cumulative_profit > peak_value {
            peak_value = p.cumulative_profit;
            peak_day = p.day;
            continue;
        }

        let dd = p.cumulative_profit - peak_value;
        let deeper = match &best {
            Some(current) => dd < current.drawdown(),
            None => dd < 0.0,
        };

        if deeper {
            best = Some(DrawdownResult {
                peak_day,
                trough_day: p.day,
                peak_value,
                trough_value: p.cumulative_profit,
            });
        }
    }

    best
}
