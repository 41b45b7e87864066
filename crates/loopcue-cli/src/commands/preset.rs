//! Preset profile management.
//!
//! Edits go straight to the settings file; a separate `run` process reads
//! its snapshot at startup, so a live countdown never sees a mid-run edit.

use clap::Subcommand;
use loopcue_core::Settings;

#[derive(Subcommand)]
pub enum PresetAction {
    /// List the profile bank
    List,
    /// Show one profile as JSON
    Show { index: usize },
    /// Update a profile's label or durations
    Set {
        index: usize,
        /// New display label
        #[arg(long)]
        label: Option<String>,
        /// Repetition duration in seconds
        #[arg(long)]
        time: Option<f64>,
        /// First-cycle duration in seconds
        #[arg(long)]
        first_time: Option<f64>,
    },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load()?;

    match action {
        PresetAction::List => {
            let presets = settings.preset_config();
            let armed = presets.default_profile_index();
            for (i, profile) in presets.profiles.iter().enumerate() {
                let special = if presets.is_special(i) { " [phases]" } else { "" };
                let marker = if i == armed { "*" } else { " " };
                println!(
                    "{marker} {i}: {} ({:.2}s, first {:.2}s){special}",
                    profile.label, profile.loop_secs, profile.first_secs
                );
            }
        }
        PresetAction::Show { index } => {
            let profile = settings
                .profiles
                .get(index)
                .ok_or_else(|| format!("no profile at index {index}"))?;
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
        PresetAction::Set {
            index,
            label,
            time,
            first_time,
        } => {
            let profile = settings
                .profiles
                .get_mut(index)
                .ok_or_else(|| format!("no profile at index {index}"))?;
            if let Some(label) = label {
                profile.label = label;
            }
            if let Some(time) = time {
                profile.loop_secs = time;
            }
            if let Some(first_time) = first_time {
                profile.first_secs = first_time;
            }
            settings.save()?;
            println!("ok");
        }
    }
    Ok(())
}
