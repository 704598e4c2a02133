use clap::Args;
use serde_json::json;
use tracing::debug;

use crate::commands::query::{self, OutputMode, QueryArgs};
use crate::commands::render;
use crate::pharmacy::provider;
use crate::pharmacy::{MedicalQueryClient, QueryError};

#[derive(Debug, Args, Clone)]
pub struct LookupArgs {
    #[arg(help = "Medicine to look up, e.g. Crocin")]
    pub medicine: String,
    #[command(flatten)]
    pub query: QueryArgs,
}

pub async fn run(args: LookupArgs) -> Result<(), String> {
    let medicine = args.medicine.trim();
    if medicine.is_empty() {
        return Err("No medicine name provided.".to_string());
    }

    let resolved = query::resolve(&args.query)?;
    let language = resolved.language;
    let client = MedicalQueryClient::new(resolved.client);

    if resolved.dry_run {
        let request = client.lookup_request(medicine, language);
        let mut preview = provider::preview(client.config(), &request)?;
        preview["dry_run"] = json!(true);
        preview["language"] = json!(language.as_str());
        preview["output"] = json!(resolved.output.as_str());
        println!("{preview}");
        return Ok(());
    }

    match client.lookup(medicine, language).await {
        Ok(record) => {
            match resolved.output {
                OutputMode::Json => {
                    let body = serde_json::to_string_pretty(&record)
                        .map_err(|err| format!("Failed to serialize record: {err}"))?;
                    println!("{body}");
                }
                OutputMode::Text => {
                    let card =
                        render::medicine_card(&record, language, render::stdout_is_terminal());
                    println!("{card}");
                }
            }
            Ok(())
        }
        Err(err) => {
            debug!(kind = err.kind(), error = %err, "lookup failed");
            let message = match &err {
                QueryError::MissingCredential { key_env } => {
                    format!("{} ({key_env} is not set)", err.user_message(language))
                }
                _ => err.user_message(language).to_string(),
            };
            if resolved.output == OutputMode::Json {
                println!("{}", json!({ "error": err.kind(), "message": message }));
            }
            Err(message)
        }
    }
}
