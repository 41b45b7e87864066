mod cue;
mod engine;
mod phase;

pub use cue::{
    warning_cue, Cue, VisualState, COUNT_1_TRIGGER_SECS, COUNT_2_TRIGGER_SECS,
    COUNT_3_TRIGGER_SECS, WARNING_TRIGGER_SECS,
};
pub use engine::{FiredFlags, Mode, TimerEngine, TimerState};
pub use phase::loop_duration;
