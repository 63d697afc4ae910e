//! Simulation observer trait for progress reporting and data collection.

use ct_core::Tick;

use crate::{Snapshot, TickEvent, TickSummary};

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers only ever see shared references;
/// nothing they do can change the outcome of a run.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} moved, {} still driving", summary.moved, summary.active_vehicles);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before congestion watches run.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every event as it happens.
    fn on_event(&mut self, _tick: Tick, _event: &TickEvent) {}

    /// Called once every agent has taken its turn.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks), after `on_tick_end`.
    fn on_snapshot(&mut self, _tick: Tick, _snapshot: &Snapshot) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records every event and summary.  Handy in tests and for post-run
/// analysis of short runs.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events:    Vec<(Tick, TickEvent)>,
    pub summaries: Vec<TickSummary>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of one tick, in the order they happened.
    pub fn tick_events(&self, tick: Tick) -> impl Iterator<Item = &TickEvent> + '_ {
        self.events.iter().filter(move |(t, _)| *t == tick).map(|(_, e)| e)
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.summaries.clear();
    }
}

impl SimObserver for EventLog {
    fn on_event(&mut self, tick: Tick, event: &TickEvent) {
        self.events.push((tick, *event));
    }

    fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
        self.summaries.push(*summary);
    }
}
