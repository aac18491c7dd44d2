use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{JournalError, Result};

/// The one calendar every day/month computation goes through.
///
/// Trades are stored as UTC instants; which calendar day an instant belongs to
/// depends on the zone configured here. A journal holds exactly one of these
/// for its whole lifetime so calendar cells, monthly totals and the profit
/// graph always agree on day boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalCalendar {
    tz: Tz,
}

impl Default for JournalCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl JournalCalendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self::new(chrono_tz::UTC)
    }

    /// Build from an IANA zone name such as "Asia/Tokyo"
    pub fn from_name(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|_| JournalError::InvalidTimezone(name.to_string()))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Calendar day of an instant
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// First instant of a calendar day.
    ///
    /// Falls back to 01:00 local when midnight is skipped by a DST change.
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let midnight = day.and_time(NaiveTime::MIN);
        self.tz
            .from_local_datetime(&midnight)
            .earliest()
            .or_else(|| self.tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    }

    /// First instant of the month containing `instant`
    pub fn start_of_month(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.start_of_day(first_of_month(self.day_of(instant)))
    }

    pub fn same_month(&self, a: NaiveDate, b: NaiveDate) -> bool {
        a.year() == b.year() && a.month() == b.month()
    }
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), day.month(), 1).unwrap_or(day)
}

/// The next calendar day (saturates at the end of chrono's range)
pub fn next_day(day: NaiveDate) -> NaiveDate {
    day.checked_add_days(Days::new(1)).unwrap_or(day)
}

pub fn months_before(day: NaiveDate, months: u32) -> NaiveDate {
    day.checked_sub_months(Months::new(months)).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_of_respects_timezone() {
        // 2024-03-14 20:00 UTC is already the 15th in Tokyo
        let instant = Utc.with_ymd_and_hms(2024, 3, 14, 20, 0, 0).unwrap();

        assert_eq!(JournalCalendar::utc().day_of(instant), ymd(2024, 3, 14));
        let tokyo = JournalCalendar::from_name("Asia/Tokyo").unwrap();
        assert_eq!(tokyo.day_of(instant), ymd(2024, 3, 15));
    }

    #[test]
    fn test_start_of_day_in_zone() {
        let tokyo = JournalCalendar::from_name("Asia/Tokyo").unwrap();
        let start = tokyo.start_of_day(ymd(2024, 3, 15));

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_start_of_month() {
        let cal = JournalCalendar::utc();
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();

        assert_eq!(
            cal.start_of_month(instant),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let result = JournalCalendar::from_name("Mars/Olympus_Mons");
        assert!(matches!(result, Err(JournalError::InvalidTimezone(_))));
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(months_before(ymd(2024, 3, 1), 2), ymd(2024, 1, 1));
        assert_eq!(months_before(ymd(2024, 1, 1), 2), ymd(2023, 11, 1));
        assert_eq!(next_day(ymd(2024, 2, 28)), ymd(2024, 2, 29));
        assert_eq!(first_of_month(ymd(2024, 2, 29)), ymd(2024, 2, 1));
    }
}
