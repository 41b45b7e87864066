//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine. It does not keep an internal
//! clock or thread - the caller delivers fixed-size time steps via
//! `tick(dt)`, and cue scheduling falls out of the remaining-time
//! thresholds alone. Every operation returns the events it emitted;
//! rejected operations leave the state untouched and emit nothing.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running (Normal | Alternate) -> Idle
//! ```
//!
//! A Normal start may pre-empt a running Alternate countdown; nothing
//! pre-empts a Normal run except `stop()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(presets);
//! engine.start_normal(0)?;
//! // In a loop, every 10 ms:
//! for event in engine.tick(0.01) { /* render */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::events::Event;
use crate::preset::PresetConfig;

use super::cue::{self, Cue, VisualState};
use super::phase;

/// Tolerance when deciding whether an idle engine still shows the untouched
/// ready value (the fresh-start test).
const FRESH_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Normal,
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// One-shot threshold flags, reset at every loop rollover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FiredFlags {
    pub warning: bool,
    pub count_3: bool,
    pub count_2: bool,
    pub count_1: bool,
}

impl FiredFlags {
    fn clear(&mut self) {
        *self = Self::default();
    }

    /// Re-open every threshold no longer satisfied by `remaining`.
    /// Returns true when the warning flag was cleared, since the visual
    /// state resets with it.
    fn reopen_above(&mut self, remaining: f64) -> bool {
        let warning_cleared = self.warning && remaining > cue::WARNING_REOPEN_SECS;
        if warning_cleared {
            self.warning = false;
        }
        if remaining > cue::COUNT_3_REOPEN_SECS {
            self.count_3 = false;
        }
        if remaining > cue::COUNT_2_REOPEN_SECS {
            self.count_2 = false;
        }
        if remaining > cue::COUNT_1_REOPEN_SECS {
            self.count_1 = false;
        }
        warning_cleared
    }
}

/// The engine's mutable state. Owned exclusively by [`TimerEngine`] and
/// mutated only through its operations.
#[derive(Debug, Clone)]
struct RunState {
    running: bool,
    mode: Mode,
    profile_index: usize,
    /// 1-based; 1 is the first cycle of the current run.
    loop_count: u32,
    /// The duration this loop started from; basis for the progress ratio.
    initial_secs: f64,
    remaining_secs: f64,
    fired: FiredFlags,
    visual: VisualState,
}

impl RunState {
    fn idle(profile_index: usize, display_secs: f64) -> Self {
        Self {
            running: false,
            mode: Mode::Normal,
            profile_index,
            loop_count: 1,
            initial_secs: display_secs,
            remaining_secs: display_secs,
            fired: FiredFlags::default(),
            visual: VisualState::None,
        }
    }
}

/// Core countdown engine.
///
/// Binds an immutable [`PresetConfig`] snapshot to the run state. The
/// caller is responsible for delivering small, monotonic ticks; a single
/// tick completes at most one loop rollover.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    presets: PresetConfig,
    state: RunState,
}

impl TimerEngine {
    /// Create an idle engine showing the default profile's loop duration.
    pub fn new(presets: PresetConfig) -> Self {
        let profile_index = presets.default_profile_index();
        let display_secs = presets
            .profile(profile_index)
            .map(|p| p.loop_secs)
            .unwrap_or(0.0);
        Self {
            presets,
            state: RunState::idle(profile_index, display_secs),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer_state(&self) -> TimerState {
        if self.state.running {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn profile_index(&self) -> usize {
        self.state.profile_index
    }

    pub fn loop_count(&self) -> u32 {
        self.state.loop_count
    }

    /// Remaining seconds, clamped so it is never reported negative.
    pub fn remaining_secs(&self) -> f64 {
        self.state.remaining_secs.max(0.0)
    }

    /// The duration the current loop started from (the idle display value
    /// while stopped).
    pub fn initial_secs(&self) -> f64 {
        self.state.initial_secs
    }

    pub fn fired(&self) -> FiredFlags {
        self.state.fired
    }

    pub fn visual(&self) -> VisualState {
        self.state.visual
    }

    pub fn presets(&self) -> &PresetConfig {
        &self.presets
    }

    /// Remaining/initial ratio on a thousandths scale, clamped to
    /// `[0, 1000]`. A positive latency correction can push `remaining`
    /// past `initial`; the clamp happens here, at the reporting boundary.
    pub fn progress_millis(&self) -> u32 {
        if self.state.initial_secs <= 0.0 {
            return 0;
        }
        let ratio = (self.state.remaining_secs / self.state.initial_secs).clamp(0.0, 1.0);
        (ratio * 1000.0).round() as u32
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.timer_state(),
            mode: self.state.mode,
            profile_index: self.state.profile_index,
            profile_label: self
                .presets
                .profile(self.state.profile_index)
                .map(|p| p.label.clone())
                .unwrap_or_default(),
            loop_count: self.state.loop_count,
            remaining_secs: self.remaining_secs(),
            initial_secs: self.state.initial_secs,
            progress_millis: self.progress_millis(),
            visual: self.state.visual,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or restart) a Normal-mode run on `profile_index`.
    ///
    /// Accepted while idle or while an Alternate run is active (Normal
    /// pre-empts Alternate). A fresh start, a profile switch and a
    /// pre-emption all seed the run from the profile's first-cycle
    /// duration; an idle engine whose remaining time was left mid-loop
    /// keeps it and merely resumes counting.
    pub fn start_normal(&mut self, profile_index: usize) -> Result<Vec<Event>, EngineError> {
        if self.state.running && self.state.mode == Mode::Normal {
            return Err(EngineError::InvalidTransition {
                op: "start_normal",
                state: TimerState::Running,
            });
        }
        let profile = self
            .presets
            .profile(profile_index)
            .ok_or(EngineError::ProfileIndex {
                index: profile_index,
                len: self.presets.len(),
            })?;
        let idle_display = profile.loop_secs;
        let first_secs = profile.first_secs;

        let preempting = self.state.running;
        if profile_index != self.state.profile_index {
            // Switching profiles at start implies the same reset a
            // select_profile would have done.
            self.state.profile_index = profile_index;
            self.state.loop_count = 1;
            self.state.initial_secs = idle_display;
            self.state.remaining_secs = idle_display;
        }
        let fresh = self.state.loop_count == 1
            && (self.state.remaining_secs - idle_display).abs() < FRESH_EPSILON;

        let mut events = Vec::new();
        self.state.running = true;
        self.state.mode = Mode::Normal;
        if fresh || preempting {
            self.state.loop_count = 1;
            self.state.initial_secs = first_secs;
            self.state.remaining_secs = first_secs;
            self.state.fired.clear();
            self.set_visual(VisualState::None, &mut events);
        }
        events.push(Event::Started {
            mode: Mode::Normal,
            profile_index,
            loop_count: self.state.loop_count,
            duration_secs: self.state.initial_secs,
            at: Utc::now(),
        });
        events.push(self.display_tick());
        Ok(events)
    }

    /// Start an Alternate-mode run on the currently armed profile.
    ///
    /// Only accepted while idle with a non-zero remaining display; it never
    /// pre-empts anything.
    pub fn start_alternate(&mut self) -> Result<Vec<Event>, EngineError> {
        if self.state.running {
            return Err(EngineError::InvalidTransition {
                op: "start_alternate",
                state: TimerState::Running,
            });
        }
        if self.state.remaining_secs <= 0.0 {
            return Err(EngineError::InvalidTransition {
                op: "start_alternate",
                state: TimerState::Idle,
            });
        }

        let mut events = Vec::new();
        self.state.running = true;
        self.state.mode = Mode::Alternate;
        self.state.loop_count = 1;
        self.state.initial_secs = self.presets.alternate.first_secs;
        self.state.remaining_secs = self.presets.alternate.first_secs;
        self.state.fired.clear();
        self.set_visual(VisualState::None, &mut events);
        events.push(Event::Started {
            mode: Mode::Alternate,
            profile_index: self.state.profile_index,
            loop_count: 1,
            duration_secs: self.state.initial_secs,
            at: Utc::now(),
        });
        events.push(self.display_tick());
        Ok(events)
    }

    /// Stop any run and return to the idle display of the armed profile.
    /// Idempotent; stopping an idle engine just re-emits the ready shape.
    pub fn stop(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let display_secs = self
            .presets
            .profile(self.state.profile_index)
            .map(|p| p.loop_secs)
            .unwrap_or(0.0);
        self.state.running = false;
        self.state.mode = Mode::Normal;
        self.state.loop_count = 1;
        self.state.initial_secs = display_secs;
        self.state.remaining_secs = display_secs;
        self.state.fired.clear();
        self.set_visual(VisualState::None, &mut events);
        events.push(Event::Stopped { at: Utc::now() });
        events.push(self.display_tick());
        events
    }

    /// Advance the countdown by `dt` seconds.
    ///
    /// Threshold checks run in the fixed order warning, 3 s, 2 s, 1 s,
    /// expiry; a large `dt` cascades through all of them but never
    /// completes more than one rollover. Ticking an idle engine is a
    /// silent no-op.
    pub fn tick(&mut self, dt: f64) -> Vec<Event> {
        if !self.state.running {
            return Vec::new();
        }
        let mut events = Vec::new();
        self.state.remaining_secs -= dt;
        let remaining = self.state.remaining_secs;

        if remaining <= cue::WARNING_TRIGGER_SECS && !self.state.fired.warning {
            self.state.fired.warning = true;
            let special = self.presets.is_special(self.state.profile_index);
            let (warn_cue, visual) = cue::warning_cue(special, self.state.mode, self.state.loop_count);
            events.push(Event::CueFired {
                cue: warn_cue,
                at: Utc::now(),
            });
            self.set_visual(visual, &mut events);
        }
        if remaining <= cue::COUNT_3_TRIGGER_SECS && !self.state.fired.count_3 {
            self.state.fired.count_3 = true;
            events.push(Event::CueFired {
                cue: Cue::Count,
                at: Utc::now(),
            });
        }
        if remaining <= cue::COUNT_2_TRIGGER_SECS && !self.state.fired.count_2 {
            self.state.fired.count_2 = true;
            events.push(Event::CueFired {
                cue: Cue::Count,
                at: Utc::now(),
            });
        }
        if remaining <= cue::COUNT_1_TRIGGER_SECS && !self.state.fired.count_1 {
            self.state.fired.count_1 = true;
            events.push(Event::CueFired {
                cue: Cue::Count,
                at: Utc::now(),
            });
        }

        if self.state.remaining_secs <= 0.0 {
            self.state.remaining_secs = 0.0;
            events.push(Event::CueFired {
                cue: Cue::End,
                at: Utc::now(),
            });
            events.push(self.display_tick());
            self.roll_over(&mut events);
        } else {
            events.push(self.display_tick());
        }
        events
    }

    /// Apply a signed latency correction to the running countdown.
    ///
    /// The delta is applied unclamped; a positive correction re-opens every
    /// threshold the new remaining time no longer satisfies, so those cues
    /// fire again on the way back down. A negative correction needs no flag
    /// work - the next tick observes the lower value and fires naturally.
    pub fn adjust_latency(&mut self, delta: f64) -> Result<Vec<Event>, EngineError> {
        if !self.state.running {
            return Err(EngineError::InvalidTransition {
                op: "adjust_latency",
                state: TimerState::Idle,
            });
        }
        let mut events = Vec::new();
        if delta == 0.0 {
            return Ok(events);
        }
        self.state.remaining_secs += delta;
        if self.state.fired.reopen_above(self.state.remaining_secs) {
            self.set_visual(VisualState::None, &mut events);
        }
        events.push(self.display_tick());
        Ok(events)
    }

    /// Arm a different profile. Only valid while idle.
    pub fn select_profile(&mut self, profile_index: usize) -> Result<Vec<Event>, EngineError> {
        if self.state.running {
            return Err(EngineError::InvalidTransition {
                op: "select_profile",
                state: TimerState::Running,
            });
        }
        let profile = self
            .presets
            .profile(profile_index)
            .ok_or(EngineError::ProfileIndex {
                index: profile_index,
                len: self.presets.len(),
            })?;

        let mut events = Vec::new();
        self.state.profile_index = profile_index;
        self.state.loop_count = 1;
        self.state.initial_secs = profile.loop_secs;
        self.state.remaining_secs = profile.loop_secs;
        self.state.fired.clear();
        self.set_visual(VisualState::None, &mut events);
        events.push(Event::ProfileSelected {
            profile_index,
            at: Utc::now(),
        });
        events.push(self.display_tick());
        Ok(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn roll_over(&mut self, events: &mut Vec<Event>) {
        self.state.loop_count += 1;
        let next = phase::loop_duration(
            &self.presets,
            self.state.mode,
            self.state.profile_index,
            self.state.loop_count,
        );
        self.state.initial_secs = next;
        self.state.remaining_secs = next;
        self.state.fired.clear();
        self.set_visual(VisualState::None, events);
        events.push(Event::LoopAdvanced {
            loop_count: self.state.loop_count,
            duration_secs: next,
            at: Utc::now(),
        });
        events.push(self.display_tick());
    }

    fn set_visual(&mut self, visual: VisualState, events: &mut Vec<Event>) {
        if self.state.visual != visual {
            self.state.visual = visual;
            events.push(Event::VisualChanged {
                state: visual,
                at: Utc::now(),
            });
        }
    }

    fn display_tick(&self) -> Event {
        Event::DisplayTick {
            remaining_secs: self.remaining_secs(),
            progress_millis: self.progress_millis(),
            at: Utc::now(),
        }
    }
}
