//! Strategy traits for the lifecycle stages.
//!
//! Each trait is one pluggable stage. The client depends only on these
//! contracts and never on a concrete implementation. Collaborators report
//! failures as [`anyhow::Error`]; the client wraps them with the failing
//! [`Stage`] without altering them.

use std::fmt;
use std::path::Path;

/// A step of the function lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Source scaffolding
    Initialize,
    /// Image build
    Build,
    /// Image push to a registry
    Push,
    /// Deployment of an image as a running service
    Deploy,
    /// Domain provisioning
    ProvideDns,
    /// Local invocation
    Run,
    /// Teardown of a deployed service
    Remove,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Initialize => "initialize",
            Stage::Build => "build",
            Stage::Push => "push",
            Stage::Deploy => "deploy",
            Stage::ProvideDns => "dns",
            Stage::Run => "run",
            Stage::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Scaffolds function source for a language runtime
pub trait Initializer: Send + Sync {
    /// Write the scaffold for `name` in `language` into the absolute `path`
    fn initialize(&self, name: &str, language: &str, path: &Path) -> anyhow::Result<()>;
}

/// Builds a deployable image from function source
pub trait Builder: Send + Sync {
    /// Build the function at the absolute `path`, returning the image reference
    fn build(&self, name: &str, path: &Path) -> anyhow::Result<String>;
}

/// Pushes images to a registry
pub trait Pusher: Send + Sync {
    /// Push the given image reference
    fn push(&self, image: &str) -> anyhow::Result<()>;
}

/// Deploys images as running services
pub trait Deployer: Send + Sync {
    /// Deploy `image` as the service `name`, returning its address
    fn deploy(&self, name: &str, image: &str) -> anyhow::Result<String>;
}

/// Tears down deployed services
pub trait Remover: Send + Sync {
    /// Remove the service `name`
    fn remove(&self, name: &str) -> anyhow::Result<()>;
}

/// Invokes function source locally
pub trait Runner: Send + Sync {
    /// Run the function at the absolute `path`
    fn run(&self, path: &Path) -> anyhow::Result<()>;
}

/// Provisions the domain of a deployed service
pub trait DnsProvider: Send + Sync {
    /// Make `name` resolvable
    fn provide(&self, name: &str) -> anyhow::Result<()>;
}

/// Strategy that accepts every call and does nothing.
///
/// Bound to every slot a caller leaves empty. The builder and deployer
/// return an empty image reference and address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Initializer for Noop {
    fn initialize(&self, _name: &str, _language: &str, _path: &Path) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Builder for Noop {
    fn build(&self, _name: &str, _path: &Path) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

impl Pusher for Noop {
    fn push(&self, _image: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Deployer for Noop {
    fn deploy(&self, _name: &str, _image: &str) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

impl Remover for Noop {
    fn remove(&self, _name: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Runner for Noop {
    fn run(&self, _path: &Path) -> anyhow::Result<()> {
        Ok(())
    }
}

impl DnsProvider for Noop {
    fn provide(&self, _name: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_accepts_everything() {
        let path = Path::new("/srv/example.com/admin");

        assert!(Initializer::initialize(&Noop, "admin.example.com", "cobol", path).is_ok());
        assert_eq!(Builder::build(&Noop, "admin.example.com", path).unwrap(), "");
        assert!(Pusher::push(&Noop, "").is_ok());
        assert_eq!(Deployer::deploy(&Noop, "admin.example.com", "").unwrap(), "");
        assert!(Remover::remove(&Noop, "www.example.com").is_ok());
        assert!(Runner::run(&Noop, path).is_ok());
        assert!(DnsProvider::provide(&Noop, "admin.example.com").is_ok());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Initialize.to_string(), "initialize");
        assert_eq!(Stage::ProvideDns.to_string(), "dns");
        assert_eq!(Stage::Remove.to_string(), "remove");
    }
}
