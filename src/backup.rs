use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{Settings, Trade};

pub const BACKUP_VERSION: &str = "1.0.0";

/// Settings plus every trade, as written by `export_backup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub settings: Settings,
    pub trades: Vec<Trade>,
    pub export_date: String,
    pub version: String,
}

impl Backup {
    pub fn new(settings: Settings, trades: Vec<Trade>, now: DateTime<Utc>) -> Self {
        Self {
            settings,
            trades,
            export_date: now.to_rfc3339(),
            version: BACKUP_VERSION.to_string(),
        }
    }
}

/// Export settings and trades to pretty JSON
pub fn export_backup(settings: &Settings, trades: &[Trade], now: DateTime<Utc>) -> Result<String> {
    let backup = Backup::new(settings.clone(), trades.to_vec(), now);
    Ok(serde_json::to_string_pretty(&backup)?)
}

pub fn import_backup(json: &str) -> Result<Backup> {
    let backup: Backup = serde_json::from_str(json)?;

    if backup.version != BACKUP_VERSION {
        log::warn!("Backup version {} differs from {}", backup.version, BACKUP_VERSION);
    }
    let undated = backup.trades.iter().filter(|t| t.date.is_none()).count();
    log::info!(
        "Loaded backup from {}: {} trades ({} without a date)",
        backup.export_date,
        backup.trades.len(),
        undated
    );

    Ok(backup)
}

pub fn read_backup_file(path: &Path) -> Result<Backup> {
    let json = fs::read_to_string(path)?;
    import_backup(&json)
}

pub fn write_backup_file(path: &Path, settings: &Settings, trades: &[Trade], now: DateTime<Utc>) -> Result<()> {
    let json = export_backup(settings, trades, now)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::JournalCalendar;
    use crate::error::JournalError;
    use crate::stats::DailyIndex;
    use chrono::TimeZone;

    fn trades() -> Vec<Trade> {
        vec![
            Trade {
                id: "TRADE-1".to_string(),
                date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
                pair: "USD/JPY".to_string(),
                balance_before: 100_000.0,
                balance_after: 102_000.0,
                memo: Some("london open".to_string()),
            },
            Trade {
                id: "TRADE-2".to_string(),
                date: None,
                pair: "EUR/USD".to_string(),
                balance_before: 102_000.0,
                balance_after: 101_500.0,
                memo: None,
            },
        ]
    }

    #[test]
    fn test_export_then_import() {
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let settings = Settings { risk_rate_percent: 1.5, ..Settings::default() };

        let json = export_backup(&settings, &trades(), now).unwrap();
        let backup = import_backup(&json).unwrap();

        assert_eq!(backup.version, BACKUP_VERSION);
        assert_eq!(backup.settings, settings);
        assert_eq!(backup.trades, trades());
        assert_eq!(backup.export_date, now.to_rfc3339());
    }

    #[test]
    fn test_import_without_settings_uses_defaults() {
        let json = r#"{
            "trades": [],
            "export_date": "2024-03-02T00:00:00+00:00",
            "version": "1.0.0"
        }"#;

        let backup = import_backup(json).unwrap();
        assert_eq!(backup.settings, Settings::default());
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(import_backup("{not json"), Err(JournalError::Serialization(_))));
    }

    #[test]
    fn test_backup_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();

        write_backup_file(&path, &Settings::default(), &trades(), now).unwrap();
        let backup = read_backup_file(&path).unwrap();

        assert_eq!(backup.trades.len(), 2);
        assert!(matches!(
            read_backup_file(&dir.path().join("missing.json")),
            Err(JournalError::Io(_))
        ));
    }

    #[test]
    fn test_import_keeps_going_past_a_bad_date() {
        let json = r#"{
            "trades": [
                {"id": "good", "date": "2024-03-01T09:00:00Z", "pair": "USD/JPY", "balance_before": 1000.0, "balance_after": 1100.0},
                {"id": "corrupt", "date": "not-a-date", "pair": "USD/JPY", "balance_before": 1100.0, "balance_after": 9000.0}
            ],
            "export_date": "2024-03-02T00:00:00+00:00",
            "version": "1.0.0"
        }"#;

        let backup = import_backup(json).unwrap();
        assert_eq!(backup.trades.len(), 2);
        assert_eq!(backup.trades[1].date, None);

        let index = DailyIndex::build(&backup.trades, &JournalCalendar::utc());
        assert_eq!(index.len(), 1);
        assert_eq!(index.total(), 100.0, "Only the dated trade aggregates");
    }
}
