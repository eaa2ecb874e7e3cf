//! Recording test doubles for every strategy.
//!
//! Each mock is a cheap handle: clone it, bind one clone to the client and
//! keep the other to inspect the calls afterwards. Behaviour can be replaced
//! with the `on_*` methods. A shared [`CallLog`] records the order in which
//! stages were reached across mocks.

use crate::strategy::{
    Builder, Deployer, DnsProvider, Initializer, Pusher, Remover, Runner, Stage,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Languages the mock initializer accepts by default
pub const SUPPORTED_LANGUAGES: &[&str] = &["go"];

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered record of stage invocations shared between mocks
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    stages: Arc<Mutex<Vec<Stage>>>,
}

impl CallLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages reached so far, in invocation order
    pub fn stages(&self) -> Vec<Stage> {
        lock(&self.stages).clone()
    }

    fn record(&self, stage: Stage) {
        lock(&self.stages).push(stage);
    }
}

type Handler<A, T> = Arc<dyn Fn(&A) -> anyhow::Result<T> + Send + Sync>;

fn handler<A, T>(f: impl Fn(&A) -> anyhow::Result<T> + Send + Sync + 'static) -> Handler<A, T> {
    Arc::new(f)
}

/// Call recording and behaviour shared by all mocks
struct Recorder<A, T> {
    stage: Stage,
    calls: Mutex<Vec<A>>,
    handler: Mutex<Handler<A, T>>,
    log: Mutex<Option<CallLog>>,
}

impl<A: Clone, T> Recorder<A, T> {
    fn new(stage: Stage, handler: Handler<A, T>) -> Arc<Self> {
        Arc::new(Self {
            stage,
            calls: Mutex::new(Vec::new()),
            handler: Mutex::new(handler),
            log: Mutex::new(None),
        })
    }

    fn invoke(&self, call: A) -> anyhow::Result<T> {
        self.record(&call);
        self.respond(&call)
    }

    fn record(&self, call: &A) {
        if let Some(log) = lock(&self.log).as_ref() {
            log.record(self.stage);
        }
        lock(&self.calls).push(call.clone());
    }

    fn respond(&self, call: &A) -> anyhow::Result<T> {
        // Release the lock before running caller-supplied code
        let handler = lock(&self.handler).clone();
        handler(call)
    }

    fn set_handler(&self, handler: Handler<A, T>) {
        *lock(&self.handler) = handler;
    }

    fn set_log(&self, log: &CallLog) {
        *lock(&self.log) = Some(log.clone());
    }

    fn calls(&self) -> Vec<A> {
        lock(&self.calls).clone()
    }
}

/// Arguments received by [`MockInitializer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeCall {
    /// Function name
    pub name: String,
    /// Requested language
    pub language: String,
    /// Absolute function root
    pub path: PathBuf,
}

/// Arguments received by [`MockBuilder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCall {
    /// Function name
    pub name: String,
    /// Absolute function root
    pub path: PathBuf,
}

/// Arguments received by [`MockDeployer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployCall {
    /// Service name
    pub name: String,
    /// Image reference
    pub image: String,
}

/// Initializer that accepts [`SUPPORTED_LANGUAGES`] and rejects the rest
#[derive(Clone)]
pub struct MockInitializer {
    recorder: Arc<Recorder<InitializeCall, ()>>,
    supported: Arc<Mutex<Vec<String>>>,
}

impl MockInitializer {
    /// Create a mock that succeeds for every supported language
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(Stage::Initialize, handler(|_: &InitializeCall| Ok(()))),
            supported: Arc::new(Mutex::new(
                SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            )),
        }
    }

    /// Record stage order into `log`
    pub fn with_log(self, log: &CallLog) -> Self {
        self.recorder.set_log(log);
        self
    }

    /// Replace the languages the mock accepts
    pub fn set_supported_languages(&self, languages: &[&str]) {
        *lock(&self.supported) = languages.iter().map(|l| l.to_string()).collect();
    }

    /// Run `handler` for calls with a supported language
    pub fn on_initialize(
        &self,
        f: impl Fn(&InitializeCall) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.recorder.set_handler(handler(f));
    }

    /// Whether the mock was called
    pub fn invoked(&self) -> bool {
        !self.recorder.calls().is_empty()
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<InitializeCall> {
        self.recorder.calls()
    }
}

impl Default for MockInitializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer for MockInitializer {
    fn initialize(&self, name: &str, language: &str, path: &Path) -> anyhow::Result<()> {
        let call = InitializeCall {
            name: name.to_string(),
            language: language.to_string(),
            path: path.to_path_buf(),
        };
        self.recorder.record(&call);

        if !lock(&self.supported).iter().any(|l| l == language) {
            anyhow::bail!("unsupported language '{}'", language);
        }
        self.recorder.respond(&call)
    }
}

/// Builder returning `<name>:latest` unless told otherwise
#[derive(Clone)]
pub struct MockBuilder {
    recorder: Arc<Recorder<BuildCall, String>>,
}

impl MockBuilder {
    /// Create a mock that succeeds
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(
                Stage::Build,
                handler(|call: &BuildCall| Ok(format!("{}:latest", call.name))),
            ),
        }
    }

    /// Record stage order into `log`
    pub fn with_log(self, log: &CallLog) -> Self {
        self.recorder.set_log(log);
        self
    }

    /// Replace the mock's behaviour
    pub fn on_build(
        &self,
        f: impl Fn(&BuildCall) -> anyhow::Result<String> + Send + Sync + 'static,
    ) {
        self.recorder.set_handler(handler(f));
    }

    /// Whether the mock was called
    pub fn invoked(&self) -> bool {
        !self.recorder.calls().is_empty()
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<BuildCall> {
        self.recorder.calls()
    }
}

impl Default for MockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder for MockBuilder {
    fn build(&self, name: &str, path: &Path) -> anyhow::Result<String> {
        self.recorder.invoke(BuildCall {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Pusher that accepts every image unless told otherwise
#[derive(Clone)]
pub struct MockPusher {
    recorder: Arc<Recorder<String, ()>>,
}

impl MockPusher {
    /// Create a mock that succeeds
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(Stage::Push, handler(|_: &String| Ok(()))),
        }
    }

    /// Record stage order into `log`
    pub fn with_log(self, log: &CallLog) -> Self {
        self.recorder.set_log(log);
        self
    }

    /// Replace the mock's behaviour; the handler receives the image
    pub fn on_push(
        &self,
        f: impl Fn(&String) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.recorder.set_handler(handler(f));
    }

    /// Whether the mock was called
    pub fn invoked(&self) -> bool {
        !self.recorder.calls().is_empty()
    }

    /// Images received, in order
    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }
}

impl Default for MockPusher {
    fn default() -> Self {
        Self::new()
    }
}

impl Pusher for MockPusher {
    fn push(&self, image: &str) -> anyhow::Result<()> {
        self.recorder.invoke(image.to_string())
    }
}

/// Deployer returning `https://<name>/` unless told otherwise
#[derive(Clone)]
pub struct MockDeployer {
    recorder: Arc<Recorder<DeployCall, String>>,
}

impl MockDeployer {
    /// Create a mock that succeeds
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(
                Stage::Deploy,
                handler(|call: &DeployCall| Ok(format!("https://{}/", call.name))),
            ),
        }
    }

    /// Record stage order into `log`
    pub fn with_log(self, log: &CallLog) -> Self {
        self.recorder.set_log(log);
        self
    }

    /// Replace the mock's behaviour
    pub fn on_deploy(
        &self,
        f: impl Fn(&DeployCall) -> anyhow::Result<String> + Send + Sync + 'static,
    ) {
        self.recorder.set_handler(handler(f));
    }

    /// Whether the mock was called
    pub fn invoked(&self) -> bool {
        !self.recorder.calls().is_empty()
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<DeployCall> {
        self.recorder.calls()
    }
}

impl Default for MockDeployer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deployer for MockDeployer {
    fn deploy(&self, name: &str, image: &str) -> anyhow::Result<String> {
        self.recorder.invoke(DeployCall {
            name: name.to_string(),
            image: image.to_string(),
        })
    }
}

/// Remover that accepts every name unless told otherwise
#[derive(Clone)]
pub struct MockRemover {
    recorder: Arc<Recorder<String, ()>>,
}

impl MockRemover {
    /// Create a mock that succeeds
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(Stage::Remove, handler(|_: &String| Ok(()))),
        }
    }

    /// Record stage order into `log`
    pub fn with_log(self, log: &CallLog) -> Self {
        self.recorder.set_log(log);
        self
    }

    /// Replace the mock's behaviour; the handler receives the name
    pub fn on_remove(
        &self,
        f: impl Fn(&String) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.recorder.set_handler(handler(f));
    }

    /// Whether the mock was called
    pub fn invoked(&self) -> bool {
        !self.recorder.calls().is_empty()
    }

    /// Names received, in order
    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }
}

impl Default for MockRemover {
    fn default() -> Self {
        Self::new()
    }
}

impl Remover for MockRemover {
    fn remove(&self, name: &str) -> anyhow::Result<()> {
        self.recorder.invoke(name.to_string())
    }
}

/// Runner that succeeds unless told otherwise
#[derive(Clone)]
pub struct MockRunner {
    recorder: Arc<Recorder<PathBuf, ()>>,
}

impl MockRunner {
    /// Create a mock that succeeds
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(Stage::Run, handler(|_: &PathBuf| Ok(()))),
        }
    }

    /// Record stage order into `log`
    pub fn with_log(self, log: &CallLog) -> Self {
        self.recorder.set_log(log);
        self
    }

    /// Replace the mock's behaviour; the handler receives the root
    pub fn on_run(
        &self,
        f: impl Fn(&PathBuf) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.recorder.set_handler(handler(f));
    }

    /// Whether the mock was called
    pub fn invoked(&self) -> bool {
        !self.recorder.calls().is_empty()
    }

    /// Roots received, in order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.recorder.calls()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for MockRunner {
    fn run(&self, path: &Path) -> anyhow::Result<()> {
        self.recorder.invoke(path.to_path_buf())
    }
}

/// DNS provider that accepts every name unless told otherwise
#[derive(Clone)]
pub struct MockDnsProvider {
    recorder: Arc<Recorder<String, ()>>,
}

impl MockDnsProvider {
    /// Create a mock that succeeds
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(Stage::ProvideDns, handler(|_: &String| Ok(()))),
        }
    }

    /// Record stage order into `log`
    pub fn with_log(self, log: &CallLog) -> Self {
        self.recorder.set_log(log);
        self
    }

    /// Replace the mock's behaviour; the handler receives the name
    pub fn on_provide(
        &self,
        f: impl Fn(&String) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.recorder.set_handler(handler(f));
    }

    /// Whether the mock was called
    pub fn invoked(&self) -> bool {
        !self.recorder.calls().is_empty()
    }

    /// The most recently requested name
    pub fn name_requested(&self) -> Option<String> {
        self.recorder.calls().pop()
    }

    /// Names received, in order
    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }
}

impl Default for MockDnsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsProvider for MockDnsProvider {
    fn provide(&self, name: &str) -> anyhow::Result<()> {
        self.recorder.invoke(name.to_string())
    }
}
