//! MedCenter pharmacy tools: AI chat assistant, medicine explorer,
//! WhatsApp ordering and medication reminders.

pub mod commands;
pub mod config;
pub mod logging;
pub mod pharmacy;

/// Version string with the commit and build time baked in by `build.rs`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("MC_GIT_SHA"),
    "\nbuilt: ",
    env!("MC_BUILD_TS")
);
