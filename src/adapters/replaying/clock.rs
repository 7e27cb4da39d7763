//! Replaying adapter for the Clock port.

use chrono::{DateTime, Utc};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::CassetteError;
use crate::ports::clock::Clock;

/// Serves the time recorded in a cassette.
///
/// The recorded value is read once when the adapter is built, so every
/// `now()` call returns the same instant.
#[derive(Debug)]
pub struct ReplayingClock {
    now: DateTime<Utc>,
}

impl ReplayingClock {
    /// Reads the first recorded `clock::now` value from `replayer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette has no clock interaction or the
    /// recorded value is not a timestamp.
    pub fn new(replayer: &mut CassetteReplayer) -> Result<Self, CassetteError> {
        let output = replayer.next_interaction("clock", "now")?.output.clone();
        let now = serde_json::from_value(output).map_err(malformed)?;
        Ok(Self { now })
    }
}

fn malformed(e: serde_json::Error) -> CassetteError {
    CassetteError::Malformed {
        port: "clock".into(),
        method: "now".into(),
        message: e.to_string(),
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
