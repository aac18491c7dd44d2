pub mod backup;
pub mod calendar;
pub mod error;
pub mod journal;
pub mod models;
pub mod report;
pub mod risk;
pub mod stats;

pub use calendar::JournalCalendar;
pub use error::{JournalError, Result};
pub use journal::{Clock, FixedClock, Journal, MemoryTradeStore, SystemClock, TradeStore};
pub use models::{Settings, Trade, TradeInput, UpdateSettingsInput};
