//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the audit core and an external
//! system (time, repository metadata, issue tracking). Implementations live
//! in `src/adapters/`.

pub mod clock;
pub mod issues;
pub mod repos;

use std::future::Future;
use std::pin::Pin;

use crate::error::HostingError;

pub use clock::Clock;
pub use issues::{Issue, IssueTracker, TrackingRepo};
pub use repos::{Commit, RepoPath, RepoStatus, RepositoryHost};

/// Boxed future returned by hosting ports to keep the traits dyn-compatible.
pub type HostingFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, HostingError>> + Send + 'a>>;
