//! System clock for live audit runs.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Reads the system time once per call.
///
/// A run asks for the time once and derives both the issue title date and
/// the start of the staleness window from that answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
