use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, shells};
use medcenter::LONG_VERSION;
use medcenter::commands::ask::{self, AskArgs};
use medcenter::commands::config::{self, ConfigArgs};
use medcenter::commands::lookup::{self, LookupArgs};
use medcenter::commands::order::{self, OrderArgs};
use medcenter::commands::reminders::{self, RemindersArgs};
use medcenter::logging;

const ROOT_HELP_EXAMPLES: &str = "Examples:\n  medcenter ask \"Can I take paracetamol with tea?\"\n  echo \"What is ORS?\" | medcenter ask --lang hi\n  medcenter lookup Crocin --json\n  medcenter order --patient Rahul --medicine Paracetamol --units 2 --phone 9999999999 --address \"A-1, Sector 15\"\n  medcenter completion bash > ~/.local/share/bash-completion/completions/medcenter";

const ASK_HELP_EXAMPLES: &str = "Examples:\n  medcenter ask \"Can I take paracetamol with tea?\"\n  medcenter ask --history chat.json --json \"And for children?\"\n  medcenter ask --provider openai --dry-run \"Explain antibiotics\"";

const LOOKUP_HELP_EXAMPLES: &str = "Examples:\n  medcenter lookup Combiflam\n  medcenter lookup Insulin --lang hi --json";

#[derive(Debug, Parser)]
#[command(
    name = "medcenter",
    about = "MedCenter pharmacy assistant: AI chat, medicine explorer and WhatsApp orders",
    version = LONG_VERSION,
    after_help = ROOT_HELP_EXAMPLES
)]
struct Cli {
    #[arg(long, short, global = true, help = "Log debug details to stderr")]
    verbose: bool,
    #[arg(long, short, global = true, help = "Silence all logs; errors are still printed")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Ask the AI pharmacy assistant", after_help = ASK_HELP_EXAMPLES)]
    Ask(AskArgs),
    #[command(about = "Look up a medicine's composition, use and side effects", after_help = LOOKUP_HELP_EXAMPLES)]
    Lookup(LookupArgs),
    #[command(about = "Prepare a WhatsApp order link")]
    Order(OrderArgs),
    #[command(about = "Manage medication reminders")]
    Reminders(RemindersArgs),
    #[command(about = "Manage local config")]
    Config(ConfigArgs),
    #[command(about = "Generate shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

fn print_completion(shell: CompletionShell) {
    let mut cmd = Cli::command();
    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, "medcenter", &mut io::stdout()),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, "medcenter", &mut io::stdout()),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, "medcenter", &mut io::stdout()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Ask(args) => ask::run(args).await,
        Commands::Lookup(args) => lookup::run(args).await,
        Commands::Order(args) => order::run(args),
        Commands::Reminders(args) => reminders::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
