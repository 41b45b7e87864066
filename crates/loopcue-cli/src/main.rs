use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "loopcue", version, about = "Repeating countdown with threshold cues")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the countdown in the foreground
    Run(commands::run::RunArgs),
    /// Feed deterministic ticks and print the event stream as JSON lines
    Simulate(commands::simulate::SimulateArgs),
    /// Preset profile management
    Preset {
        #[command(subcommand)]
        action: commands::preset::PresetAction,
    },
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Preset { action } => commands::preset::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "loopcue", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_tree_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simulate_args_parse() {
        let cli = Cli::parse_from([
            "loopcue", "simulate", "--profile", "1", "--ticks", "50", "--dt", "0.02",
        ]);
        assert!(matches!(cli.command, Commands::Simulate(_)));
    }
}
