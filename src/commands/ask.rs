use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::json;

use crate::commands::query::{self, OutputMode, QueryArgs};
use crate::pharmacy::provider;
use crate::pharmacy::{ChatTurn, MedicalQueryClient};

#[derive(Debug, Args, Clone)]
pub struct AskArgs {
    #[arg(help = "Question for the assistant; read from stdin when omitted")]
    pub prompt: Option<String>,
    #[arg(long, help = "JSON file with earlier turns: [{\"role\":\"user\",\"text\":\"...\"}]")]
    pub history: Option<PathBuf>,
    #[command(flatten)]
    pub query: QueryArgs,
}

fn read_prompt(prompt: Option<String>) -> Result<String, String> {
    let prompt = match prompt {
        Some(prompt) => prompt,
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                String::new()
            } else {
                let mut buffer = String::new();
                stdin
                    .read_to_string(&mut buffer)
                    .map_err(|err| format!("Failed to read prompt from stdin: {err}"))?;
                buffer
            }
        }
    };

    let prompt = prompt.trim().to_string();
    if prompt.is_empty() {
        return Err("No prompt provided. Pass a question or pipe it on stdin.".to_string());
    }
    Ok(prompt)
}

fn load_history(path: Option<&Path>) -> Result<Vec<ChatTurn>, String> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read history file '{}': {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("Failed to parse history file '{}': {err}", path.display()))
}

pub async fn run(args: AskArgs) -> Result<(), String> {
    let prompt = read_prompt(args.prompt)?;
    let mut history = load_history(args.history.as_deref())?;
    let resolved = query::resolve(&args.query)?;
    let language = resolved.language;
    let client = MedicalQueryClient::new(resolved.client);

    if resolved.dry_run {
        let request = client.chat_request(&prompt, &history, language);
        let mut preview = provider::preview(client.config(), &request)?;
        preview["dry_run"] = json!(true);
        preview["language"] = json!(language.as_str());
        preview["output"] = json!(resolved.output.as_str());
        println!("{preview}");
        return Ok(());
    }

    let reply = client.converse(&prompt, &history, language).await;

    match resolved.output {
        OutputMode::Text => println!("{reply}"),
        OutputMode::Json => {
            history.push(ChatTurn::user(prompt));
            history.push(ChatTurn::assistant(reply.clone()));
            println!(
                "{}",
                json!({
                    "reply": reply,
                    "language": language.as_str(),
                    "history": history,
                })
            );
        }
    }
    Ok(())
}
