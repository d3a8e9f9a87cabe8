#![deny(unsafe_code)]

/// Desktop shell for the Lawwise legal assistant.
///
/// Two persona pages share one chat surface implementation; replies come from
/// the simulator in `lawwise-chat`.
pub mod app;
/// Transcript, history and input components.
pub mod chat;
/// Settings persistence.
pub mod settings;
