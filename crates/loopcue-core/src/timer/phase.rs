//! Loop-duration resolution at rollover.

use crate::preset::PresetConfig;

use super::engine::Mode;

/// Duration in seconds for the loop numbered `loop_count` (1-based) of a
/// run in `mode` with `profile_index` armed.
///
/// Alternate mode resolves against the global alternate times; the selected
/// profile only matters there when it is the special one, whose repetitions
/// alternate between the two `alt_phases` durations by loop parity. An
/// index outside the bank resolves to zero (the engine rejects such starts
/// before this is ever reached).
pub fn loop_duration(
    presets: &PresetConfig,
    mode: Mode,
    profile_index: usize,
    loop_count: u32,
) -> f64 {
    let special = presets.is_special(profile_index);
    match mode {
        Mode::Normal => {
            let Some(profile) = presets.profile(profile_index) else {
                return 0.0;
            };
            if loop_count == 1 {
                profile.first_secs
            } else if special {
                presets.start_phases.for_loop(loop_count)
            } else {
                profile.loop_secs
            }
        }
        Mode::Alternate => {
            if loop_count == 1 {
                presets.alternate.first_secs
            } else if special {
                presets.alt_phases.for_loop(loop_count)
            } else {
                presets.alternate.loop_secs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{AlternateTimes, PhasePair, PresetConfig, Profile};

    fn bank() -> PresetConfig {
        PresetConfig {
            profiles: vec![
                Profile::new("Ordinary", 30.0, 5.0),
                Profile::new("Special", 45.0, 6.5),
            ],
            special_index: 1,
            start_phases: PhasePair([20.0, 40.0]),
            alt_phases: PhasePair([15.0, 25.0]),
            alternate: AlternateTimes {
                loop_secs: 19.15,
                first_secs: 5.0,
            },
        }
    }

    #[test]
    fn ordinary_first_loop_uses_first_time() {
        assert_eq!(loop_duration(&bank(), Mode::Normal, 0, 1), 5.0);
    }

    #[test]
    fn ordinary_repetitions_use_loop_time() {
        for loop_count in 2..=10 {
            assert_eq!(loop_duration(&bank(), Mode::Normal, 0, loop_count), 30.0);
        }
    }

    #[test]
    fn special_normal_alternates_start_phases() {
        let presets = bank();
        for loop_count in 2..=21u32 {
            let expected = if loop_count % 2 == 0 { 20.0 } else { 40.0 };
            assert_eq!(
                loop_duration(&presets, Mode::Normal, 1, loop_count),
                expected,
                "loop {loop_count}"
            );
        }
    }

    #[test]
    fn special_alternate_alternates_alt_phases() {
        let presets = bank();
        for loop_count in 2..=21u32 {
            let expected = if loop_count % 2 == 0 { 15.0 } else { 25.0 };
            assert_eq!(
                loop_duration(&presets, Mode::Alternate, 1, loop_count),
                expected,
                "loop {loop_count}"
            );
        }
    }

    #[test]
    fn alternate_mode_ignores_ordinary_profile_times() {
        let presets = bank();
        assert_eq!(loop_duration(&presets, Mode::Alternate, 0, 1), 5.0);
        for loop_count in 2..=10 {
            assert_eq!(
                loop_duration(&presets, Mode::Alternate, 0, loop_count),
                19.15
            );
        }
    }

    #[test]
    fn missing_profile_resolves_to_zero() {
        assert_eq!(loop_duration(&bank(), Mode::Normal, 9, 1), 0.0);
    }
}
