//! Adapters implementing the port traits.
//!
//! `live` talks to the real clock and hosting API, `recording` wraps live
//! adapters and captures every interaction, and `replaying` serves
//! interactions back from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;

#[cfg(test)]
pub(crate) mod fake;
