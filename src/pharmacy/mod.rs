//! Pharmacy service layer.
//!
//! The AI chat assistant and medicine explorer talk to a generative-AI
//! provider through [`client::MedicalQueryClient`]; orders become WhatsApp
//! links; reminders live in a small JSON file.

/// Chat history types.
pub mod chat;
/// Medical query client: chat assistant and medicine lookup.
pub mod client;
/// Lookup failure taxonomy.
pub mod error;
pub(crate) mod gemini;
/// Response languages and localized notices.
pub mod language;
/// Medicine record type and its response schema.
pub mod medicine;
/// Fence stripping and JSON parsing of provider output.
pub mod normalize;
pub(crate) mod openai;
/// WhatsApp order message and link construction.
pub mod order;
/// Provider selection and provider-neutral requests.
pub mod provider;
/// Reminder list persistence.
pub mod reminders;
pub(crate) mod transport;

pub use chat::{ChatTurn, Role};
pub use client::{ClientConfig, MedicalQueryClient};
pub use error::QueryError;
pub use language::Language;
pub use medicine::MedicineRecord;
pub use order::{OrderRequest, OrderStamp};
pub use provider::{Provider, ProviderError};
