//! Logging setup for programs embedding the client.
//!
//! The client itself only emits `tracing` events. Stage progress is logged
//! at info level when the configuration is verbose and at debug level
//! otherwise.

use tracing::Level;

/// Install a global fmt subscriber.
///
/// Verbose output lowers the maximum level to debug. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init(verbose: bool) -> bool {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(true);
        assert!(!init(false));
    }
}
