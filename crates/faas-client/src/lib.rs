//! # faas-client
//!
//! Client-side lifecycle orchestration for a single service function.
//!
//! A [`Client`] is bound to one function source directory. It drives the
//! function through its lifecycle by delegating every stage to a pluggable
//! strategy: scaffolding the source ([`Initializer`]), building an image
//! ([`Builder`]), pushing it ([`Pusher`]), deploying it ([`Deployer`]) and
//! provisioning its domain ([`DnsProvider`]). Local invocation ([`Runner`])
//! and teardown ([`Remover`]) are delegated the same way.
//!
//! When no explicit name is configured, the function's fully-qualified domain
//! name is derived from its directory. See [`name::derive_name`].
//!
//! ## Example
//!
//! ```no_run
//! use faas_client::{Client, ClientConfig};
//!
//! # fn main() -> faas_client::Result<()> {
//! let config = ClientConfig {
//!     root: "./example.com/admin".into(),
//!     ..Default::default()
//! };
//!
//! let client = Client::builder(config).build()?;
//! assert_eq!(client.name(), "admin.example.com");
//!
//! client.create("go")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

mod client;
mod config;
pub mod logging;
pub mod name;
mod strategy;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, DEFAULT_DOMAIN_SEARCH_LIMIT};
pub use strategy::{
    Builder, Deployer, DnsProvider, Initializer, Noop, Pusher, Remover, Runner, Stage,
};

use std::path::PathBuf;

/// Error types for lifecycle operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An argument passed to an operation was rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No explicit name was given and none could be derived from the path
    #[error("Unable to derive a function name from {} (search limit {limit}): {reason}", .root.display())]
    NameUnresolvable {
        /// Root the derivation started from
        root: PathBuf,
        /// Number of ancestor directories the derivation could consult
        limit: usize,
        /// Why derivation failed
        reason: String,
    },

    /// A bound strategy returned an error
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// Stage whose strategy failed
        stage: Stage,
        /// Error returned by the strategy, unaltered
        #[source]
        source: anyhow::Error,
    },

    /// Construction-time configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// The stage that failed, if this error came from a strategy
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
