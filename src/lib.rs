//! Chatview
//!
//! Rendering core for a desktop AI chat client.
//!
//! Two independent engines plus the transforms around them, following a
//! Pure Core / Impure Shell architecture: this crate holds the pure
//! state and transition functions; the widget shell binds them to its
//! reactive-state primitives and owns all persistence and dispatch.
//!
//! - [`markdown`]: line-oriented markdown renderer for chat messages.
//! - [`avatar`]: pan/zoom view state and circular crop export for avatars.
//! - [`usage`]: aggregation of chat usage records for the analytics charts.

pub mod avatar;
pub mod config;
pub mod logging;
pub mod markdown;
pub mod usage;

#[cfg(test)]
mod tests;
