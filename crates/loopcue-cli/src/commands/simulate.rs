//! Deterministic batch driver for testing cue behavior.
//!
//! Feeds a fixed number of fixed-size ticks and prints every event as a
//! JSON line, optionally injecting one latency correction mid-run. Useful
//! for verifying threshold timing without waiting for real time to pass.

use clap::Args;
use loopcue_core::{Event, Settings, TimerEngine};

#[derive(Args)]
pub struct SimulateArgs {
    /// Profile index to arm before starting
    #[arg(long)]
    pub profile: Option<usize>,
    /// Start in alternate mode
    #[arg(long)]
    pub alternate: bool,
    /// Number of ticks to feed
    #[arg(long, default_value_t = 1000)]
    pub ticks: u32,
    /// Tick size in seconds
    #[arg(long, default_value_t = 0.01)]
    pub dt: f64,
    /// Inject a latency correction after this many ticks
    #[arg(long)]
    pub adjust_at: Option<u32>,
    /// Latency correction in seconds (with --adjust-at)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub adjust: f64,
    /// Print cue and loop events only, suppressing display ticks
    #[arg(long)]
    pub cues_only: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let mut engine = TimerEngine::new(settings.preset_config());
    if let Some(index) = args.profile {
        print_events(&engine.select_profile(index)?, args.cues_only)?;
    }

    let started = if args.alternate {
        engine.start_alternate()?
    } else {
        engine.start_normal(engine.profile_index())?
    };
    print_events(&started, args.cues_only)?;

    for tick in 0..args.ticks {
        if args.adjust_at == Some(tick) {
            print_events(&engine.adjust_latency(args.adjust)?, args.cues_only)?;
        }
        print_events(&engine.tick(args.dt), args.cues_only)?;
    }

    println!("{}", serde_json::to_string(&engine.snapshot())?);
    Ok(())
}

fn print_events(events: &[Event], cues_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if cues_only && matches!(event, Event::DisplayTick { .. }) {
            continue;
        }
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
