use serde::{Deserialize, Serialize};

use crate::calendar::JournalCalendar;
use crate::error::Result;
use crate::risk::RiskRate;
use crate::stats::ProfitGraphRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_risk_rate_percent")]
    pub risk_rate_percent: f64,
    /// IANA zone used for every day boundary
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub default_range: ProfitGraphRange,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            risk_rate_percent: default_risk_rate_percent(),
            timezone: default_timezone(),
            default_range: ProfitGraphRange::default(),
            currency: default_currency(),
        }
    }
}

impl Settings {
    pub fn risk_rate(&self) -> Result<RiskRate> {
        RiskRate::validated(self.risk_rate_percent)
    }

    pub fn calendar(&self) -> Result<JournalCalendar> {
        JournalCalendar::from_name(&self.timezone)
    }

    /// Apply a partial update. Nothing changes unless every provided field is valid.
    pub fn apply(&mut self, input: UpdateSettingsInput) -> Result<()> {
        if let Some(val) = input.risk_rate_percent {
            RiskRate::validated(val)?;
        }
        if let Some(val) = &input.timezone {
            JournalCalendar::from_name(val)?;
        }

        if let Some(val) = input.risk_rate_percent {
            self.risk_rate_percent = val;
        }
        if let Some(val) = input.timezone {
            self.timezone = val.trim().to_string();
        }
        if let Some(val) = input.default_range {
            self.default_range = val;
        }
        if let Some(val) = input.currency {
            self.currency = val;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsInput {
    pub risk_rate_percent: Option<f64>,
    pub timezone: Option<String>,
    pub default_range: Option<ProfitGraphRange>,
    pub currency: Option<String>,
}

fn default_risk_rate_percent() -> f64 {
    5.0
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_currency() -> String {
    "JPY".to_string()
}
