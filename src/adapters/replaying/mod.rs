//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod hosting;

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::HostingError;

pub use clock::ReplayingClock;
pub use hosting::{ReplayingIssueTracker, ReplayingRepositoryHost};

/// Take the next recorded output for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, HostingError> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output.clone())
        .map_err(|e| HostingError::Replay(e.to_string()))
}

/// Take and decode the next recorded result for `port::method`.
pub(crate) fn replay_next<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, HostingError> {
    let output = next_output(replayer, port, method)?;
    replay_result(output)
}

/// Decode an output recorded with the `{"Ok": v}` / `{"Err": msg}` convention.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, HostingError> {
    let serde_json::Value::Object(mut map) = output else {
        let message = format!("expected Ok/Err object, got {output}");
        return Err(HostingError::Replay(message));
    };
    if let Some(ok) = map.remove("Ok") {
        return serde_json::from_value(ok).map_err(|e| {
            let message = format!("undecodable recorded value: {e}");
            HostingError::Replay(message)
        });
    }
    match map.remove("Err") {
        Some(serde_json::Value::String(message)) => Err(HostingError::Replay(message)),
        Some(other) => Err(HostingError::Replay(other.to_string())),
        None => {
            let message = "recorded output has neither Ok nor Err";
            Err(HostingError::Replay(message.into()))
        }
    }
}
