use std::env;

use clap::Args;
use tracing::debug;

use crate::config;
use crate::pharmacy::order::{self, DEFAULT_RECIPIENT, OrderRequest, OrderStamp};

#[derive(Debug, Args, Clone)]
pub struct OrderArgs {
    #[arg(long, help = "Patient full name")]
    pub patient: String,
    #[arg(long, help = "Medicine required")]
    pub medicine: String,
    #[arg(long, help = "Quantity (strips/bottles)")]
    pub units: String,
    #[arg(long, help = "Contact number")]
    pub phone: String,
    #[arg(long, help = "Delivery address (default: [pharmacy] default_address)")]
    pub address: Option<String>,
    #[arg(long, help = "Special instructions")]
    pub notes: Option<String>,
    #[arg(long, help = "WhatsApp number receiving the order (env: MC_WHATSAPP_NUMBER)")]
    pub to: Option<String>,
    #[arg(long, help = "Print reference, message and link as JSON")]
    pub json: bool,
}

pub fn run(args: OrderArgs) -> Result<(), String> {
    let pharmacy = config::load_pharmacy()?;

    let address = args
        .address
        .or(pharmacy.default_address)
        .ok_or_else(|| {
            "No delivery address provided. Use --address or set [pharmacy] default_address."
                .to_string()
        })?;

    let recipient = args
        .to
        .or_else(|| {
            env::var("MC_WHATSAPP_NUMBER")
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .or(pharmacy.whatsapp_number)
        .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());

    let request = OrderRequest {
        patient_name: args.patient,
        medicine_name: args.medicine,
        units: args.units,
        address,
        phone: args.phone,
        notes: args.notes,
    };

    let prepared =
        order::prepare(&request, &recipient, OrderStamp::now()).map_err(|err| err.to_string())?;
    debug!(reference = %prepared.stamp.reference, "order prepared");

    if args.json {
        let body = serde_json::to_string_pretty(&prepared)
            .map_err(|err| format!("Failed to serialize order: {err}"))?;
        println!("{body}");
    } else {
        println!("{}", prepared.message);
        println!();
        println!("Open this link to send the order on WhatsApp:");
        println!("{}", prepared.url);
    }
    Ok(())
}
