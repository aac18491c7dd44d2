//! The journal: trades in, every derived view out.
//!
//! Nothing here is reactive. Each mutation, fetch or range change calls one
//! rebuild that recomputes every aggregate from the full trade set and swaps
//! the results in, so no view can lag behind another.

pub mod clock;
pub mod snapshot;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use snapshot::SnapshotCell;
pub use store::{MemoryTradeStore, TradeStore};

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

use crate::calendar::JournalCalendar;
use crate::error::Result;
use crate::models::{Settings, Trade, TradeInput, UpdateSettingsInput};
use crate::risk::{self, RiskTargets};
use crate::stats::{
    self, DailyIndex, DateInterval, DrawdownResult, GraphSelection, ProfitGraphRange, ProfitSeries,
    TradeSummary,
};

/// Everything the calendar screen reads
#[derive(Debug, Clone, Default)]
pub struct CalendarSnapshot {
    pub trades: Vec<Trade>,
    pub daily: DailyIndex,
}

/// Everything the profit graph reads
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub range: ProfitGraphRange,
    pub interval: Option<DateInterval>,
    pub series: ProfitSeries,
    pub max_drawdown: Option<DrawdownResult>,
}

impl GraphSnapshot {
    pub fn build(trades: &[Trade], range: ProfitGraphRange, now: DateTime<Utc>, calendar: &JournalCalendar) -> Self {
        let earliest = stats::earliest_trade_date(trades);
        let interval = stats::period_interval(range, now, calendar, earliest);
        let series = ProfitSeries::build(trades, interval.as_ref(), calendar);
        let max_drawdown = stats::max_drawdown(&series.cumulative);

        Self { range, interval, series, max_drawdown }
    }
}

pub struct Journal<S: TradeStore, C: Clock> {
    store: S,
    clock: C,
    calendar: JournalCalendar,
    settings: Settings,
    range: ProfitGraphRange,
    book: SnapshotCell<CalendarSnapshot>,
    graph: SnapshotCell<GraphSnapshot>,
    selection: Option<GraphSelection>,
}

impl<S: TradeStore, C: Clock> Journal<S, C> {
    /// Validate settings and perform the first fetch.
    ///
    /// The calendar zone is fixed from here on; a later timezone change in the
    /// settings applies the next time a journal is opened.
    pub fn open(store: S, clock: C, settings: Settings) -> Result<Self> {
        let calendar = settings.calendar()?;
        settings.risk_rate()?;
        let range = settings.default_range;

        log::info!("Opening journal (timezone: {}, range: {})", calendar.timezone(), range);

        let mut journal = Self {
            store,
            clock,
            calendar,
            settings,
            range,
            book: SnapshotCell::default(),
            graph: SnapshotCell::default(),
            selection: None,
        };
        journal.refresh();
        Ok(journal)
    }

    /// Fetch every trade and rebuild all views.
    ///
    /// A failing store leaves the journal empty rather than showing the
    /// previous, possibly stale, aggregates.
    pub fn refresh(&mut self) {
        let trades = match self.store.fetch_all() {
            Ok(trades) => trades,
            Err(e) => {
                log::warn!("Failed to fetch trades, showing an empty journal: {}", e);
                Vec::new()
            }
        };
        self.rebuild(trades);
    }

    fn rebuild(&mut self, trades: Vec<Trade>) {
        let daily = DailyIndex::build(&trades, &self.calendar);
        let graph = GraphSnapshot::build(&trades, self.range, self.clock.now(), &self.calendar);

        log::info!(
            "Rebuilt journal: {} trades, {} trading days, {} days in {} graph",
            trades.len(),
            daily.len(),
            graph.series.daily.len(),
            self.range
        );

        self.book.replace(CalendarSnapshot { trades, daily });
        self.replace_graph(graph);
    }

    fn replace_graph(&mut self, graph: GraphSnapshot) {
        self.selection = stats::retain_selection(
            self.selection,
            &graph.series.daily,
            &graph.series.cumulative,
            &self.calendar,
        );
        self.graph.replace(graph);
    }

    pub fn add_trade(&mut self, input: TradeInput) -> Result<Trade> {
        input.validate()?;
        let trade = Trade::from_input(input, self.clock.now());
        self.store.insert(trade.clone())?;

        log::info!("Added trade {} ({}, {:+})", trade.id, trade.pair, trade.profit());
        self.refresh();
        Ok(trade)
    }

    pub fn update_trade(&mut self, id: &str, input: TradeInput) -> Result<Trade> {
        input.validate()?;
        let trade = Trade::with_id(id.to_string(), input);
        self.store.update(trade.clone())?;

        log::info!("Updated trade {}", id);
        self.refresh();
        Ok(trade)
    }

    pub fn delete_trade(&mut self, id: &str) -> Result<()> {
        self.store.delete(id)?;

        log::info!("Deleted trade {}", id);
        self.refresh();
        Ok(())
    }

    pub fn range(&self) -> ProfitGraphRange {
        self.range
    }

    /// Switch the graph period; the selection survives only if its day is still shown
    pub fn set_range(&mut self, range: ProfitGraphRange) {
        self.range = range;
        let book = self.book.load();
        let graph = GraphSnapshot::build(&book.trades, range, self.clock.now(), &self.calendar);
        self.replace_graph(graph);
    }

    pub fn select_nearest(&mut self, query: DateTime<Utc>) -> Option<GraphSelection> {
        let graph = self.graph.load();
        self.selection = stats::resolve_selection(query, &graph.series.daily, &graph.series.cumulative, &self.calendar);
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<GraphSelection> {
        self.selection
    }

    pub fn calendar(&self) -> &JournalCalendar {
        &self.calendar
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn snapshot(&self) -> Arc<CalendarSnapshot> {
        self.book.load()
    }

    pub fn graph(&self) -> Arc<GraphSnapshot> {
        self.graph.load()
    }

    pub fn max_drawdown(&self) -> Option<DrawdownResult> {
        self.graph.load().max_drawdown
    }

    pub fn daily_total(&self, day: NaiveDate) -> f64 {
        self.book.load().daily.profit_on(day)
    }

    pub fn trades_on(&self, day: NaiveDate) -> Vec<Trade> {
        let book = self.book.load();
        stats::trades_on(&book.trades, &self.calendar, day)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Net profit of the month we are in
    pub fn current_month_total(&self) -> f64 {
        let today = self.calendar.day_of(self.clock.now());
        stats::month_total(&self.book.load().daily, today)
    }

    pub fn latest_balance(&self) -> f64 {
        stats::latest_balance(&self.book.load().trades)
    }

    /// Statistics over every dated trade
    pub fn summary(&self) -> TradeSummary {
        TradeSummary::from_trades(&self.book.load().trades)
    }

    /// Statistics over the graph's current period
    pub fn period_summary(&self) -> TradeSummary {
        let Some(interval) = self.graph.load().interval else {
            return TradeSummary::default();
        };
        let book = self.book.load();
        TradeSummary::from_trades(stats::trades_in(&book.trades, &interval))
    }

    /// 1R/2R/3R for `balance` at the configured risk rate
    pub fn risk_targets(&self, balance: f64) -> Option<RiskTargets> {
        let rate = self.settings.risk_rate().ok()?;
        risk::risk_targets(balance, rate)
    }

    pub fn lot_size(&self, capital: f64, stop_loss_pips: f64) -> f64 {
        match self.settings.risk_rate() {
            Ok(rate) => risk::lot_size(capital, rate, stop_loss_pips),
            Err(_) => 0.0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, input: UpdateSettingsInput) -> Result<&Settings> {
        let previous_timezone = self.settings.timezone.clone();
        self.settings.apply(input)?;

        if self.settings.timezone != previous_timezone {
            log::warn!(
                "Timezone changed to {}; it takes effect when the journal is reopened",
                self.settings.timezone
            );
        }
        Ok(&self.settings)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
