//! Foreground countdown driver.
//!
//! One tokio task owns the engine. A 10 ms interval feeds `tick(dt)` while
//! stdin commands arrive over an mpsc channel from a blocking reader
//! thread, so every engine mutation happens on a single logical timeline.
//! Ctrl-c stops the run cleanly.

use std::io::{BufRead, Write as _};
use std::time::Duration;

use clap::Args;
use loopcue_core::{Event, Settings, TimerEngine};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Args)]
pub struct RunArgs {
    /// Profile to arm (defaults to the configured selection)
    #[arg(long)]
    pub profile: Option<usize>,
    /// Start counting immediately instead of waiting for a `start` command
    #[arg(long)]
    pub start: bool,
    /// With --start, begin in alternate mode
    #[arg(long, requires = "start")]
    pub alternate: bool,
    /// Tick interval in milliseconds
    #[arg(long, default_value_t = 10)]
    pub tick_ms: u64,
}

enum Command {
    StartNormal(Option<usize>),
    StartAlternate,
    Stop,
    Adjust(f64),
    Quit,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default();
    let mut engine = TimerEngine::new(settings.preset_config());
    if let Some(index) = args.profile {
        engine.select_profile(index)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(engine, args))
}

async fn drive(mut engine: TimerEngine, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::channel::<Command>(16);
    std::thread::spawn(move || read_commands(tx));

    let mut renderer = Renderer::default();
    println!("commands: start [index] | alt | stop | adj <secs> | quit");
    renderer.show_snapshot(&engine);

    if args.start {
        let started = if args.alternate {
            engine.start_alternate()
        } else {
            engine.start_normal(engine.profile_index())
        };
        match started {
            Ok(events) => renderer.render(&events),
            Err(e) => eprintln!("rejected: {e}"),
        }
    }

    let dt = args.tick_ms as f64 / 1000.0;
    let mut interval = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let events = engine.tick(dt);
                renderer.render(&events);
            }
            command = rx.recv() => {
                let Some(command) = command else { break };
                if !apply(&mut engine, command, &mut renderer) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupt received, stopping");
                break;
            }
        }
    }

    renderer.finish(&engine.stop());
    Ok(())
}

/// Apply one marshaled command. Returns false when the loop should end.
fn apply(engine: &mut TimerEngine, command: Command, renderer: &mut Renderer) -> bool {
    let result = match command {
        Command::StartNormal(index) => {
            engine.start_normal(index.unwrap_or_else(|| engine.profile_index()))
        }
        Command::StartAlternate => engine.start_alternate(),
        Command::Stop => Ok(engine.stop()),
        Command::Adjust(delta) => engine.adjust_latency(delta),
        Command::Quit => return false,
    };
    match result {
        Ok(events) => renderer.render(&events),
        Err(e) => eprintln!("\nrejected: {e}"),
    }
    true
}

/// Blocking stdin reader; sends parsed commands to the engine task.
fn read_commands(tx: mpsc::Sender<Command>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(command) => {
                let quit = matches!(command, Command::Quit);
                if tx.blocking_send(command).is_err() || quit {
                    break;
                }
            }
            None => eprintln!("commands: start [index] | alt | stop | adj <secs> | quit"),
        }
    }
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "start" => Some(Command::StartNormal(
            parts.next().and_then(|s| s.parse().ok()),
        )),
        "alt" => Some(Command::StartAlternate),
        "stop" => Some(Command::Stop),
        "adj" => parts.next()?.parse().ok().map(Command::Adjust),
        "quit" | "q" => Some(Command::Quit),
        _ => None,
    }
}

/// Terminal renderer: cues and lifecycle on their own lines, the display
/// redrawn in place only when its text changes.
#[derive(Default)]
struct Renderer {
    last_line: String,
}

impl Renderer {
    fn render(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::DisplayTick {
                    remaining_secs,
                    progress_millis,
                    ..
                } => {
                    let line = format!("{remaining_secs:05.2}  [{progress_millis:>4}/1000]");
                    if line != self.last_line {
                        print!("\r{line}");
                        std::io::stdout().flush().ok();
                        self.last_line = line;
                    }
                }
                Event::CueFired { cue, .. } => println!("\ncue: {}", cue.as_str()),
                Event::VisualChanged { state, .. } => println!("\nvisual: {}", state.as_str()),
                Event::Started {
                    mode,
                    profile_index,
                    duration_secs,
                    ..
                } => {
                    println!("\nstarted {mode:?} on profile {profile_index} ({duration_secs:.2}s)")
                }
                Event::Stopped { .. } => println!("\nstopped"),
                Event::LoopAdvanced {
                    loop_count,
                    duration_secs,
                    ..
                } => println!("\nloop {loop_count} ({duration_secs:.2}s)"),
                Event::ProfileSelected { profile_index, .. } => {
                    println!("\nprofile {profile_index} armed")
                }
                Event::StateSnapshot { .. } => {}
            }
        }
    }

    fn show_snapshot(&mut self, engine: &TimerEngine) {
        if let Event::StateSnapshot {
            profile_index,
            profile_label,
            remaining_secs,
            ..
        } = engine.snapshot()
        {
            println!("armed: {profile_label} (profile {profile_index}, {remaining_secs:.2}s)");
        }
    }

    fn finish(&mut self, events: &[Event]) {
        self.render(events);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert!(matches!(
            parse_command("start 2"),
            Some(Command::StartNormal(Some(2)))
        ));
        assert!(matches!(
            parse_command("start"),
            Some(Command::StartNormal(None))
        ));
        assert!(matches!(parse_command("alt"), Some(Command::StartAlternate)));
        assert!(matches!(parse_command("stop"), Some(Command::Stop)));
        assert!(
            matches!(parse_command("adj -0.25"), Some(Command::Adjust(d)) if (d + 0.25).abs() < 1e-9)
        );
        assert!(matches!(parse_command("q"), Some(Command::Quit)));
        assert!(parse_command("bogus").is_none());
        assert!(parse_command("adj much").is_none());
    }
}
