//! WhatsApp order messages.
//!
//! An order is never sent anywhere by this crate: it becomes a pre-filled
//! `wa.me` link that the pharmacy's number receives once the user opens it.

use chrono::{DateTime, Local, TimeZone};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number that receives orders when nothing else is configured.
pub const DEFAULT_RECIPIENT: &str = "919616921617";

const WHATSAPP_BASE: &str = "https://wa.me";
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Order is missing the {0}.")]
    MissingField(&'static str),
    #[error("Invalid WhatsApp number '{0}': use digits with the country code, e.g. 919876543210.")]
    InvalidRecipient(String),
}

/// Order form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub patient_name: String,
    pub medicine_name: String,
    pub units: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderRequest {
    /// Fails on the first required field that is blank.
    pub fn validate(&self) -> Result<(), OrderError> {
        let required = [
            ("patient name", &self.patient_name),
            ("medicine name", &self.medicine_name),
            ("quantity", &self.units),
            ("delivery address", &self.address),
            ("contact number", &self.phone),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(OrderError::MissingField(*field)),
            None => Ok(()),
        }
    }

    fn instructions(&self) -> &str {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .unwrap_or("No special instructions")
    }
}

/// Reference and timestamp printed at the top of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStamp {
    pub reference: String,
    pub placed_at: String,
}

impl OrderStamp {
    /// Fresh stamp with a random `MED-NNNN` reference and the local time.
    pub fn now() -> Self {
        let number = rand::thread_rng().gen_range(1000..=9999);
        Self::at(number, Local::now())
    }

    pub fn at<Tz: TimeZone>(number: u16, time: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            reference: format!("MED-{number}"),
            placed_at: time.format("%d %b %Y, %I:%M %p").to_string(),
        }
    }
}

/// Builds the multi-line WhatsApp order text.
pub fn compose_message(order: &OrderRequest, stamp: &OrderStamp) -> String {
    let lines = [
        "🏥 *MEDCENTER OFFICIAL ORDER* 🏥".to_string(),
        RULE.to_string(),
        format!("🆔 *Order Ref:* #{}", stamp.reference),
        format!("🕒 *Date/Time:* {}", stamp.placed_at),
        String::new(),
        format!("👤 *PATIENT:* {}", order.patient_name.trim()),
        format!("💊 *MEDICINE:* {}", order.medicine_name.trim()),
        format!("📦 *QUANTITY:* {} Units", order.units.trim()),
        format!("📍 *ADDRESS:* {}", order.address.trim()),
        format!("📞 *CONTACT:* {}", order.phone.trim()),
        String::new(),
        format!("📝 *INSTRUCTIONS:* {}", order.instructions()),
        RULE.to_string(),
        "✅ *Source:* MedCenter Web Portal".to_string(),
        String::new(),
        "_Please confirm availability and dispatch time._".to_string(),
    ];
    lines.join("\n")
}

/// Strips `+`, spaces and dashes; what remains must be digits only.
pub fn normalize_recipient(recipient: &str) -> Result<String, OrderError> {
    let digits = recipient
        .chars()
        .filter(|c| !matches!(*c, '+' | ' ' | '-'))
        .collect::<String>();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(OrderError::InvalidRecipient(recipient.to_string()));
    }
    Ok(digits)
}

/// `https://wa.me/<number>?text=<percent-encoded message>`.
pub fn whatsapp_url(recipient: &str, message: &str) -> Result<String, OrderError> {
    let number = normalize_recipient(recipient)?;
    Ok(format!(
        "{WHATSAPP_BASE}/{number}?text={}",
        urlencoding::encode(message)
    ))
}

/// A composed order ready to be opened.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedOrder {
    #[serde(flatten)]
    pub stamp: OrderStamp,
    pub message: String,
    pub url: String,
}

/// Validates the order and builds both the message and the link.
pub fn prepare(
    order: &OrderRequest,
    recipient: &str,
    stamp: OrderStamp,
) -> Result<PreparedOrder, OrderError> {
    order.validate()?;
    let message = compose_message(order, &stamp);
    let url = whatsapp_url(recipient, &message)?;
    Ok(PreparedOrder {
        stamp,
        message,
        url,
    })
}
