//! Error types shared across ports, adapters, and the audit run.

use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the hosting service through a port.
///
/// Per-link checks treat every variant as "could not determine" and move on.
/// Issue tracker calls surface it as a fatal [`AuditError`].
#[derive(Debug, Error)]
pub enum HostingError {
    /// The request URL could not be built.
    #[error("invalid request url {url}: {message}")]
    Request {
        /// The URL that failed to build.
        url: String,
        /// Parser detail.
        message: String,
    },
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Target URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a status the caller cannot use.
    #[error("{url} returned status {status}")]
    Status {
        /// Target URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body did not have the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Target URL.
        url: String,
        /// Decoder detail.
        message: String,
    },
    /// A replayed interaction was missing or recorded as an error.
    #[error("replay: {0}")]
    Replay(String),
}

/// Failure loading or validating [`crate::config::AuditConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid YAML for the expected shape.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// YAML error.
        #[source]
        source: serde_yaml::Error,
    },
    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// A value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure reading, writing, or consuming a cassette.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read or written.
    #[error("cassette i/o on {path}: {source}")]
    Io {
        /// Cassette path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The cassette file is not valid YAML.
    #[error("failed to parse cassette {path}: {source}")]
    Parse {
        /// Cassette path.
        path: PathBuf,
        /// YAML error.
        #[source]
        source: serde_yaml::Error,
    },
    /// The cassette has nothing (left) for the requested port/method.
    #[error("cassette exhausted for {port}::{method}")]
    Exhausted {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
    },
    /// A recorded output does not have the shape the port expects.
    #[error("malformed recording for {port}::{method}: {message}")]
    Malformed {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// Decoder detail.
        message: String,
    },
    /// Recording adapters still hold the recorder.
    #[error("recorder is still shared by live adapters")]
    StillShared,
}

/// Fatal failure of an audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The source document could not be read.
    #[error("failed to read document {path}: {source}")]
    ReadDocument {
        /// Document path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP client could not be constructed.
    #[error("failed to build hosting client: {0}")]
    Client(#[source] reqwest::Error),
    /// Previously filed tracking issues could not be loaded.
    #[error("failed to load previously flagged repositories: {0}")]
    LoadFlagged(#[source] HostingError),
    /// The tracking issue could not be created.
    #[error("failed to submit tracking issue: {0}")]
    SubmitIssue(#[source] HostingError),
    /// A cassette could not be loaded or saved.
    #[error(transparent)]
    Cassette(#[from] CassetteError),
}
