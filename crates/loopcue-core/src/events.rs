use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Cue, Mode, TimerState, VisualState};

/// Every externally visible state change produces an Event.
/// The CLI renders them; any other front end subscribes the same way.
///
/// Events are emitted synchronously from the engine operation that caused
/// them, in the order the underlying transitions happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A run began (fresh start, or Normal pre-empting an Alternate run).
    Started {
        mode: Mode,
        profile_index: usize,
        loop_count: u32,
        duration_secs: f64,
        at: DateTime<Utc>,
    },
    /// The run was stopped and the engine returned to the idle display.
    Stopped {
        at: DateTime<Utc>,
    },
    /// An audio cue is due. The token is opaque to the engine.
    CueFired {
        cue: Cue,
        at: DateTime<Utc>,
    },
    /// The warning color state changed.
    VisualChanged {
        state: VisualState,
        at: DateTime<Utc>,
    },
    /// Remaining time for display. `progress_millis` is the remaining/initial
    /// ratio clamped to [0, 1000].
    DisplayTick {
        remaining_secs: f64,
        progress_millis: u32,
        at: DateTime<Utc>,
    },
    /// A loop expired and the next one started with `duration_secs`.
    LoopAdvanced {
        loop_count: u32,
        duration_secs: f64,
        at: DateTime<Utc>,
    },
    /// The armed profile changed while idle.
    ProfileSelected {
        profile_index: usize,
        at: DateTime<Utc>,
    },
    /// Full state snapshot for status queries.
    StateSnapshot {
        state: TimerState,
        mode: Mode,
        profile_index: usize,
        profile_label: String,
        loop_count: u32,
        remaining_secs: f64,
        initial_secs: f64,
        progress_millis: u32,
        visual: VisualState,
        at: DateTime<Utc>,
    },
}
