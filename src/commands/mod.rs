//! Subcommands of the `medcenter` binary.

pub mod ask;
pub mod config;
pub mod lookup;
pub mod order;
pub(crate) mod query;
pub mod reminders;
pub(crate) mod render;

pub use query::QueryArgs;
