//! stream-assist: creator-tools backend.
//!
//! Relays creative-text generation requests (stream titles, usernames,
//! channel bios) to an OpenAI-compatible chat-completion API, splits the
//! replies into lists, and serves two earnings calculators.

pub mod calculators;
pub mod config;
pub mod generation;
pub mod server;
