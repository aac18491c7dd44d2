//! Risk and position sizing.
//!
//! Every 1R/2R/3R figure shown anywhere in the journal comes from this module.

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};

/// Risk percentage per trade (5.0 = 5%).
///
/// Serialized as the bare percentage; deserializing goes through `validated`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RiskRate {
    percent: f64,
}

impl RiskRate {
    /// Wrap a percentage without validation.
    ///
    /// Callers that take user input go through `validated` or `parse`.
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }

    /// Accept only `0 < percent <= 100`
    pub fn validated(percent: f64) -> Result<Self> {
        if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
            return Err(JournalError::RiskRateOutOfRange(percent));
        }
        Ok(Self::new(percent))
    }

    /// Parse user text such as "2.5"
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(JournalError::InvalidRiskRate("risk rate is required".to_string()));
        }
        let percent = trimmed
            .parse::<f64>()
            .map_err(|_| JournalError::InvalidRiskRate(format!("'{}' is not a number", trimmed)))?;
        Self::validated(percent)
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn fraction(&self) -> f64 {
        self.percent / 100.0
    }
}

impl TryFrom<f64> for RiskRate {
    type Error = JournalError;

    fn try_from(percent: f64) -> Result<Self> {
        Self::validated(percent)
    }
}

impl From<RiskRate> for f64 {
    fn from(rate: RiskRate) -> Self {
        rate.percent
    }
}

/// Allowed loss for one trade (1R)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAmount {
    pub value: f64,
}

/// A multiple of 1R (2R, 3R, ...)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetAmount {
    pub value: f64,
}

/// The figures the risk screen shows for one balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskTargets {
    pub one_r: RiskAmount,
    pub two_r: TargetAmount,
    pub three_r: TargetAmount,
}

/// 1R. Negative balances carry no exposure.
pub fn one_r(balance: f64, rate: RiskRate) -> RiskAmount {
    RiskAmount {
        value: balance.max(0.0) * rate.fraction(),
    }
}

/// nR. Negative multiples clamp to zero.
pub fn n_r(balance: f64, rate: RiskRate, multiple: f64) -> TargetAmount {
    TargetAmount {
        value: one_r(balance, rate).value * multiple.max(0.0),
    }
}

/// Profit of a trade from the account balance before and after it
pub fn profit(balance_before: f64, balance_after: f64) -> f64 {
    balance_after - balance_before
}

/// Allowed loss for a balance, or `None` when either input is not positive
pub fn allowed_loss(balance: f64, risk_percent: f64) -> Option<f64> {
    if balance <= 0.0 || risk_percent <= 0.0 {
        return None;
    }
    Some(balance * risk_percent / 100.0)
}

pub fn risk_targets(balance: f64, rate: RiskRate) -> Option<RiskTargets> {
    allowed_loss(balance, rate.percent())?;

    Some(RiskTargets {
        one_r: one_r(balance, rate),
        two_r: n_r(balance, rate, 2.0),
        three_r: n_r(balance, rate, 3.0),
    })
}

/// Lot size: allowed loss spread over the stop distance in pips
pub fn lot_size(capital: f64, rate: RiskRate, stop_loss_pips: f64) -> f64 {
    if stop_loss_pips <= 0.0 {
        return 0.0;
    }
    one_r(capital, rate).value / stop_loss_pips
}
