use clap::Subcommand;
use loopcue_core::Settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full settings as TOML
    Show,
    /// Get a value by dot-separated key (e.g. "alternate_loop_time",
    /// "profiles.0.time")
    Get { key: String },
    /// Set a value by dot-separated key
    Set { key: String, value: String },
    /// Print the settings file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load_or_default();
            print!("{}", toml::to_string_pretty(&settings)?);
        }
        ConfigAction::Get { key } => {
            let settings = Settings::load_or_default();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load_or_default();
            settings.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::Path => {
            println!("{}", Settings::file_path()?.display());
        }
    }
    Ok(())
}
