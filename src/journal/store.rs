use crate::error::{JournalError, Result};
use crate::models::Trade;

/// Where trades live between refreshes.
///
/// The journal never keeps references into the store: it fetches a full copy
/// on every refresh and derives everything from that copy.
pub trait TradeStore {
    /// Every stored trade, in no particular order
    fn fetch_all(&self) -> Result<Vec<Trade>>;

    /// Add a new trade; ids must be unique
    fn insert(&mut self, trade: Trade) -> Result<()>;

    /// Replace the trade with the same id
    fn update(&mut self, trade: Trade) -> Result<()>;

    /// Remove a trade by id
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Trades held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTradeStore {
    trades: Vec<Trade>,
}

impl MemoryTradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        Self { trades }
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.trades.iter().position(|t| t.id == id)
    }
}

impl TradeStore for MemoryTradeStore {
    fn fetch_all(&self) -> Result<Vec<Trade>> {
        Ok(self.trades.clone())
    }

    fn insert(&mut self, trade: Trade) -> Result<()> {
        if self.position(&trade.id).is_some() {
            return Err(JournalError::Store(format!("Duplicate trade id: {}", trade.id)));
        }
        self.trades.push(trade);
        Ok(())
    }

    fn update(&mut self, trade: Trade) -> Result<()> {
        let index = self
            .position(&trade.id)
            .ok_or_else(|| JournalError::TradeNotFound(trade.id.clone()))?;
        self.trades[index] = trade;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| JournalError::TradeNotFound(id.to_string()))?;
        self.trades.remove(index);
        Ok(())
    }
}
