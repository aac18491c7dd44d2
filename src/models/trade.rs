use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{JournalError, Result};
use crate::risk;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    /// Missing or unreadable on malformed records; such trades are left out of every aggregate
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
    pub pair: String,
    pub balance_before: f64,
    pub balance_after: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Trade {
    /// Create a trade with a fresh journal id
    pub fn from_input(input: TradeInput, now: DateTime<Utc>) -> Self {
        let id = format!("TRADE-{}-{}", now.timestamp_millis(), uuid::Uuid::new_v4());
        Self::with_id(id, input)
    }

    pub fn with_id(id: String, input: TradeInput) -> Self {
        Self {
            id,
            date: Some(input.date),
            pair: input.pair,
            balance_before: input.balance_before,
            balance_after: input.balance_after,
            memo: normalize_memo(input.memo),
        }
    }

    /// Always derived from the balances, never stored
    pub fn profit(&self) -> f64 {
        risk::profit(self.balance_before, self.balance_after)
    }
}

/// Fields a user supplies when adding or editing a trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInput {
    pub pair: String,
    pub balance_before: f64,
    pub balance_after: f64,
    pub date: DateTime<Utc>,
    pub memo: Option<String>,
}

impl TradeInput {
    /// Reject what the add/edit form would not accept
    pub fn validate(&self) -> Result<()> {
        if self.pair.trim().is_empty() {
            return Err(JournalError::InvalidTrade("pair is required".to_string()));
        }
        if !self.balance_before.is_finite() || !self.balance_after.is_finite() {
            return Err(JournalError::InvalidTrade(format!(
                "balances must be numbers, got {} -> {}",
                self.balance_before, self.balance_after
            )));
        }
        Ok(())
    }
}

/// Read a trade date, turning an empty or unparsable value into `None`
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        log::warn!("Trade has an empty date, leaving it out of aggregates");
        return Ok(None);
    }

    match trimmed.parse::<DateTime<Utc>>() {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            log::warn!("Unreadable trade date '{}' ({}), leaving it out of aggregates", trimmed, e);
            Ok(None)
        }
    }
}

fn normalize_memo(memo: Option<String>) -> Option<String> {
    memo.map(|m| m.trim().to_string()).filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input() -> TradeInput {
        TradeInput {
            pair: "USD/JPY".to_string(),
            balance_before: 100_000.0,
            balance_after: 103_500.0,
            date: Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
            memo: Some("  breakout  ".to_string()),
        }
    }

    #[test]
    fn test_profit_follows_balances() {
        let mut trade = Trade::with_id("TRADE-1".to_string(), input());
        assert_eq!(trade.profit(), 3500.0);

        trade.balance_after = 99_000.0;
        assert_eq!(trade.profit(), trade.balance_after - trade.balance_before);
    }

    #[test]
    fn test_from_input_generates_id_and_trims_memo() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let trade = Trade::from_input(input(), now);

        assert!(trade.id.starts_with(&format!("TRADE-{}-", now.timestamp_millis())));
        assert_eq!(trade.memo.as_deref(), Some("breakout"));
    }

    #[test]
    fn test_blank_memo_dropped() {
        let mut blank = input();
        blank.memo = Some("   ".to_string());

        let trade = Trade::with_id("TRADE-2".to_string(), blank);
        assert_eq!(trade.memo, None);
    }

    #[test]
    fn test_validate_input() {
        assert!(input().validate().is_ok());

        let mut no_pair = input();
        no_pair.pair = "  ".to_string();
        assert!(matches!(no_pair.validate(), Err(JournalError::InvalidTrade(_))));

        let mut bad_balance = input();
        bad_balance.balance_after = f64::NAN;
        assert!(matches!(bad_balance.validate(), Err(JournalError::InvalidTrade(_))));
    }

    #[test]
    fn test_deserialize_without_date() {
        // Records exported before a date was set must still load
        let json = r#"{
            "id": "TRADE-9",
            "pair": "EUR/USD",
            "balance_before": 5000.0,
            "balance_after": 4900.0
        }"#;

        let result: std::result::Result<Trade, _> = serde_json::from_str(json);
        assert!(result.is_ok(), "Failed to deserialize trade: {:?}", result.err());

        let trade = result.unwrap();
        assert_eq!(trade.date, None);
        assert_eq!(trade.profit(), -100.0);
    }

    #[test]
    fn test_unreadable_date_becomes_undated() {
        let json = r#"[
            {"id": "ok", "date": "2024-03-15T09:00:00Z", "pair": "USD/JPY", "balance_before": 1.0, "balance_after": 2.0},
            {"id": "bad", "date": "not-a-date", "pair": "USD/JPY", "balance_before": 1.0, "balance_after": 2.0},
            {"id": "empty", "date": "", "pair": "USD/JPY", "balance_before": 1.0, "balance_after": 2.0},
            {"id": "null", "date": null, "pair": "USD/JPY", "balance_before": 1.0, "balance_after": 2.0},
            {"id": "missing", "pair": "USD/JPY", "balance_before": 1.0, "balance_after": 2.0}
        ]"#;

        let trades: Vec<Trade> = serde_json::from_str(json).unwrap();

        assert_eq!(trades[0].date, Some(Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()));
        assert!(trades[1..].iter().all(|t| t.date.is_none()), "Bad dates must load as undated");
    }
}
