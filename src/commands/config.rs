use clap::{Args, Subcommand};

use crate::config::{self, ConfigReport};
use crate::pharmacy::order::DEFAULT_RECIPIENT;

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand, Clone)]
enum ConfigSubcommand {
    #[command(about = "Validate the config file, its profiles and the [pharmacy] number")]
    Check {
        #[arg(long, help = "Only validate this profile")]
        profile: Option<String>,
    },
    #[command(about = "Show where the config file and the reminder list are read from")]
    Path,
}

fn describe(report: &ConfigReport) -> String {
    let profiles = if report.profiles.is_empty() {
        "none".to_string()
    } else {
        report.profiles.join(", ")
    };
    let recipient = report
        .whatsapp_number
        .as_deref()
        .unwrap_or(DEFAULT_RECIPIENT);

    format!(
        "config OK: {}\nprofiles: {profiles}\norders go to: {recipient}",
        report.path.display()
    )
}

pub fn run(args: ConfigArgs) -> Result<(), String> {
    match args.command {
        ConfigSubcommand::Check { profile } => {
            let report = config::validate_config(profile.as_deref())?;
            println!("{}", describe(&report));
        }
        ConfigSubcommand::Path => {
            let path = config::config_path()?;
            let state = if path.is_file() { "" } else { " (not created)" };
            println!("config: {}{state}", path.display());
            println!("data: {}", config::data_dir()?.display());
        }
    }
    Ok(())
}
