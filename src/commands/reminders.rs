use clap::{Args, Subcommand};

use crate::config;
use crate::pharmacy::reminders::ReminderStore;

#[derive(Debug, Args, Clone)]
pub struct RemindersArgs {
    #[command(subcommand)]
    command: RemindersSubcommand,
}

#[derive(Debug, Subcommand, Clone)]
enum RemindersSubcommand {
    #[command(about = "Show all reminders")]
    List {
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Schedule a new reminder")]
    Add {
        #[arg(long)]
        medicine: String,
        #[arg(long, help = "Dose time, e.g. 08:00")]
        time: String,
    },
    #[command(about = "Mark a reminder done, or not done again")]
    Toggle { id: String },
}

pub fn run(args: RemindersArgs) -> Result<(), String> {
    let store = ReminderStore::in_dir(&config::data_dir()?);

    match args.command {
        RemindersSubcommand::List { json } => {
            let reminders = store.load().map_err(|err| err.to_string())?;
            if json {
                let body = serde_json::to_string(&reminders)
                    .map_err(|err| format!("Failed to serialize reminders: {err}"))?;
                println!("{body}");
            } else if reminders.is_empty() {
                println!("No reminders scheduled.");
            } else {
                for reminder in reminders {
                    let mark = if reminder.completed { "x" } else { " " };
                    println!(
                        "[{mark}] {}  {}  {}",
                        reminder.id, reminder.time, reminder.medicine_id
                    );
                }
            }
        }
        RemindersSubcommand::Add { medicine, time } => {
            let reminder = store.add(medicine, time).map_err(|err| err.to_string())?;
            println!("added {}", reminder.id);
        }
        RemindersSubcommand::Toggle { id } => {
            let completed = store.toggle(&id).map_err(|err| err.to_string())?;
            let state = if completed { "done" } else { "pending" };
            println!("{id}: {state}");
        }
    }
    Ok(())
}
