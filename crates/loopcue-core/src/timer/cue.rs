//! Cue tokens, visual warning states and the fixed thresholds.
//!
//! Trigger thresholds sit a hundredth above their nominal boundary so that a
//! tick step slightly coarser than the nominal interval cannot step over a
//! crossing without firing it.

use serde::{Deserialize, Serialize};

use super::engine::Mode;

/// Remaining-time boundary that opens the warning band.
pub const WARNING_TRIGGER_SECS: f64 = 5.01;
pub const COUNT_3_TRIGGER_SECS: f64 = 3.01;
pub const COUNT_2_TRIGGER_SECS: f64 = 2.01;
pub const COUNT_1_TRIGGER_SECS: f64 = 1.01;

/// Nominal boundaries. A latency correction that lifts `remaining` back
/// above one of these re-opens the matching one-shot flag.
pub const WARNING_REOPEN_SECS: f64 = 5.0;
pub const COUNT_3_REOPEN_SECS: f64 = 3.0;
pub const COUNT_2_REOPEN_SECS: f64 = 2.0;
pub const COUNT_1_REOPEN_SECS: f64 = 1.0;

/// Opaque audio-trigger token. The engine only decides *which* cue is due;
/// rendering or playing it is the sink's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    WarnRed,
    WarnYellow,
    WarnAlternate,
    WarnSlow,
    WarnFast,
    Count,
    End,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::WarnRed => "warn_red",
            Cue::WarnYellow => "warn_yellow",
            Cue::WarnAlternate => "warn_alternate",
            Cue::WarnSlow => "warn_slow",
            Cue::WarnFast => "warn_fast",
            Cue::Count => "count",
            Cue::End => "end",
        }
    }

    /// True for the once-per-loop warning-band tokens.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Cue::WarnRed | Cue::WarnYellow | Cue::WarnAlternate | Cue::WarnSlow | Cue::WarnFast
        )
    }
}

/// Display styling that accompanies the warning band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualState {
    None,
    Red,
    Yellow,
}

impl VisualState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualState::None => "none",
            VisualState::Red => "red",
            VisualState::Yellow => "yellow",
        }
    }
}

/// Warning-band cue and visual for the loop numbered `loop_count` (1-based).
///
/// Ordinary profiles in Normal mode cycle red, red, yellow with period
/// three. The special profile alternates by loop parity from loop 2, with
/// loop 1 always the "red" opening cue of its mode.
pub fn warning_cue(special: bool, mode: Mode, loop_count: u32) -> (Cue, VisualState) {
    match (special, mode) {
        (true, Mode::Normal) => {
            if loop_count != 1 && loop_count % 2 == 0 {
                (Cue::WarnYellow, VisualState::Yellow)
            } else {
                (Cue::WarnRed, VisualState::Red)
            }
        }
        (true, Mode::Alternate) => {
            if loop_count == 1 {
                (Cue::WarnAlternate, VisualState::Red)
            } else if loop_count % 2 == 0 {
                (Cue::WarnSlow, VisualState::Yellow)
            } else {
                (Cue::WarnFast, VisualState::Red)
            }
        }
        (false, Mode::Alternate) => (Cue::WarnAlternate, VisualState::Red),
        (false, Mode::Normal) => match loop_count % 3 {
            0 => (Cue::WarnYellow, VisualState::Yellow),
            _ => (Cue::WarnRed, VisualState::Red),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_normal_cycles_red_red_yellow() {
        for base in [1u32, 4, 7, 28] {
            assert_eq!(warning_cue(false, Mode::Normal, base).0, Cue::WarnRed);
            assert_eq!(warning_cue(false, Mode::Normal, base + 1).0, Cue::WarnRed);
            assert_eq!(warning_cue(false, Mode::Normal, base + 2).0, Cue::WarnYellow);
        }
    }

    #[test]
    fn ordinary_normal_visual_follows_cue() {
        assert_eq!(warning_cue(false, Mode::Normal, 2).1, VisualState::Red);
        assert_eq!(warning_cue(false, Mode::Normal, 3).1, VisualState::Yellow);
    }

    #[test]
    fn ordinary_alternate_is_always_the_alternate_cue() {
        for loop_count in 1..=12 {
            let (cue, visual) = warning_cue(false, Mode::Alternate, loop_count);
            assert_eq!(cue, Cue::WarnAlternate);
            assert_eq!(visual, VisualState::Red);
        }
    }

    #[test]
    fn special_normal_parity_table() {
        assert_eq!(
            warning_cue(true, Mode::Normal, 1),
            (Cue::WarnRed, VisualState::Red)
        );
        assert_eq!(
            warning_cue(true, Mode::Normal, 2),
            (Cue::WarnYellow, VisualState::Yellow)
        );
        assert_eq!(
            warning_cue(true, Mode::Normal, 3),
            (Cue::WarnRed, VisualState::Red)
        );
        assert_eq!(
            warning_cue(true, Mode::Normal, 10),
            (Cue::WarnYellow, VisualState::Yellow)
        );
    }

    #[test]
    fn special_alternate_parity_table() {
        assert_eq!(
            warning_cue(true, Mode::Alternate, 1),
            (Cue::WarnAlternate, VisualState::Red)
        );
        assert_eq!(
            warning_cue(true, Mode::Alternate, 2),
            (Cue::WarnSlow, VisualState::Yellow)
        );
        assert_eq!(
            warning_cue(true, Mode::Alternate, 3),
            (Cue::WarnFast, VisualState::Red)
        );
        assert_eq!(
            warning_cue(true, Mode::Alternate, 11),
            (Cue::WarnFast, VisualState::Red)
        );
    }
}
