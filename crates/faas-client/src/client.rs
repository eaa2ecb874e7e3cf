//! The lifecycle client.

use crate::{
    Error, Result,
    config::ClientConfig,
    name::{derive_name, validate_name},
    strategy::{Builder, Deployer, DnsProvider, Initializer, Noop, Pusher, Remover, Runner, Stage},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Drives the lifecycle of the function rooted at one directory.
///
/// Every stage is delegated to a bound strategy. Stages run strictly in
/// order on the calling thread and the first failure ends the operation.
/// Nothing is rolled back or retried.
pub struct Client {
    config: ClientConfig,
    root: PathBuf,
    name: String,
    initializer: Box<dyn Initializer>,
    builder: Box<dyn Builder>,
    pusher: Box<dyn Pusher>,
    deployer: Box<dyn Deployer>,
    remover: Box<dyn Remover>,
    runner: Box<dyn Runner>,
    dns_provider: Box<dyn DnsProvider>,
}

impl Client {
    /// Create a client with every strategy left as [`Noop`]
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start binding strategies to a client for `config`
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    /// Fully-qualified name of the function this client manages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute root directory of the function source
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration the client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create the function: initialize, build and, unless local-only,
    /// push, deploy and provision its domain.
    pub fn create(&self, language: &str) -> Result<()> {
        if language.trim().is_empty() {
            return Err(Error::InvalidArgument("language must not be blank".to_string()));
        }

        info!(function = %self.name, language, "Creating function");

        self.progress(Stage::Initialize, "Initializing function source");
        run_stage(
            Stage::Initialize,
            self.initializer.initialize(&self.name, language, &self.root),
        )?;

        self.progress(Stage::Build, "Building image");
        let image = run_stage(Stage::Build, self.builder.build(&self.name, &self.root))?;

        if self.config.local {
            debug!(function = %self.name, image = %image, "Local-only mode, skipping remote stages");
            return Ok(());
        }

        self.progress(Stage::Push, "Pushing image");
        run_stage(Stage::Push, self.pusher.push(&image))?;

        self.progress(Stage::Deploy, "Deploying service");
        let address = run_stage(Stage::Deploy, self.deployer.deploy(&self.name, &image))?;

        self.progress(Stage::ProvideDns, "Provisioning domain");
        run_stage(Stage::ProvideDns, self.dns_provider.provide(&self.name))?;

        info!(function = %self.name, image = %image, address = %address, "Function created");
        Ok(())
    }

    /// Invoke the function locally from its source directory
    pub fn run(&self) -> Result<()> {
        self.progress(Stage::Run, "Running function");
        run_stage(Stage::Run, self.runner.run(&self.root))
    }

    /// Remove a deployed service.
    ///
    /// An empty `name` removes this client's own function. Any other name is
    /// passed through as given, even when it names an unrelated service.
    pub fn remove(&self, name: &str) -> Result<()> {
        let name = if name.is_empty() { self.name.as_str() } else { name };
        info!(function = %name, "Removing function");
        run_stage(Stage::Remove, self.remover.remove(name))
    }

    fn progress(&self, stage: Stage, message: &str) {
        if self.config.verbose {
            info!(function = %self.name, %stage, "{}", message);
        } else {
            debug!(function = %self.name, %stage, "{}", message);
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("local", &self.config.local)
            .finish_non_exhaustive()
    }
}

fn run_stage<T>(stage: Stage, result: anyhow::Result<T>) -> Result<T> {
    result.map_err(|source| {
        warn!(%stage, error = %source, "Stage failed");
        Error::Stage { stage, source }
    })
}

/// Builder for [`Client`].
///
/// Slots that are never bound keep the [`Noop`] strategy.
pub struct ClientBuilder {
    config: ClientConfig,
    initializer: Box<dyn Initializer>,
    builder: Box<dyn Builder>,
    pusher: Box<dyn Pusher>,
    deployer: Box<dyn Deployer>,
    remover: Box<dyn Remover>,
    runner: Box<dyn Runner>,
    dns_provider: Box<dyn DnsProvider>,
}

impl ClientBuilder {
    /// Create a new builder
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            initializer: Box::new(Noop),
            builder: Box::new(Noop),
            pusher: Box::new(Noop),
            deployer: Box::new(Noop),
            remover: Box::new(Noop),
            runner: Box::new(Noop),
            dns_provider: Box::new(Noop),
        }
    }

    /// Bind the source initializer
    pub fn with_initializer(mut self, initializer: impl Initializer + 'static) -> Self {
        self.initializer = Box::new(initializer);
        self
    }

    /// Bind the image builder
    pub fn with_builder(mut self, builder: impl Builder + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    /// Bind the image pusher
    pub fn with_pusher(mut self, pusher: impl Pusher + 'static) -> Self {
        self.pusher = Box::new(pusher);
        self
    }

    /// Bind the deployer
    pub fn with_deployer(mut self, deployer: impl Deployer + 'static) -> Self {
        self.deployer = Box::new(deployer);
        self
    }

    /// Bind the remover
    pub fn with_remover(mut self, remover: impl Remover + 'static) -> Self {
        self.remover = Box::new(remover);
        self
    }

    /// Bind the local runner
    pub fn with_runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Bind the DNS provider
    pub fn with_dns_provider(mut self, dns_provider: impl DnsProvider + 'static) -> Self {
        self.dns_provider = Box::new(dns_provider);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// Fails when the root is not an existing directory, when an explicit
    /// name is invalid, or when no name is given and none can be derived.
    pub fn build(self) -> Result<Client> {
        let root = self.config.absolute_root()?;
        if !root.is_dir() {
            return Err(Error::Configuration(format!(
                "Function root {} is not a directory",
                root.display()
            )));
        }

        let name = match self.config.explicit_name() {
            Some(name) => {
                validate_name(name)?;
                name.to_string()
            }
            None => derive_name(&root, self.config.domain_search_limit)?,
        };

        debug!(function = %name, root = %root.display(), local = self.config.local, "Client ready");

        Ok(Client {
            config: self.config,
            root,
            name,
            initializer: self.initializer,
            builder: self.builder,
            pusher: self.pusher,
            deployer: self.deployer,
            remover: self.remover,
            runner: self.runner,
            dns_provider: self.dns_provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CallLog, MockBuilder, MockInitializer, MockPusher};

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("example.com").join("admin");
        std::fs::create_dir_all(&root).unwrap();
        (dir, root)
    }

    fn config(root: &Path) -> ClientConfig {
        ClientConfig {
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_root_is_a_configuration_error() {
        let (_dir, root) = fixture();
        let result = Client::new(config(&root.join("missing")));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let (_dir, root) = fixture();
        let file = root.join("handler.go");
        std::fs::write(&file, "package function\n").unwrap();

        let result = Client::new(config(&file));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_invalid_explicit_name_is_rejected() {
        let (_dir, root) = fixture();
        let result = Client::new(ClientConfig {
            name: Some("not a domain".into()),
            ..config(&root)
        });
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_language_invokes_nothing() {
        let (_dir, root) = fixture();
        let log = CallLog::new();
        let initializer = MockInitializer::new().with_log(&log);
        let builder = MockBuilder::new().with_log(&log);

        let client = Client::builder(config(&root))
            .with_initializer(initializer.clone())
            .with_builder(builder.clone())
            .build()
            .unwrap();

        assert!(matches!(client.create(""), Err(Error::InvalidArgument(_))));
        assert!(matches!(client.create("  "), Err(Error::InvalidArgument(_))));
        assert!(log.stages().is_empty());
        assert!(!initializer.invoked());
        assert!(!builder.invoked());
    }

    #[test]
    fn test_build_failure_leaves_push_uninvoked() {
        let (_dir, root) = fixture();
        let builder = MockBuilder::new();
        builder.on_build(|_| anyhow::bail!("no buildpack for source"));
        let pusher = MockPusher::new();

        let client = Client::builder(config(&root))
            .with_builder(builder)
            .with_pusher(pusher.clone())
            .build()
            .unwrap();

        let err = client.create("go").unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Build));
        assert!(err.to_string().contains("no buildpack for source"));
        assert!(!pusher.invoked());
    }

    #[test]
    fn test_debug_shows_identity() {
        let (_dir, root) = fixture();
        let client = Client::new(config(&root)).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("admin.example.com"));
    }
}
