//! Function config assembler: the single entry point of resolution.
//!
//! ```text
//! DeploymentConfig
//!   ├── entry        → effective entry path
//!   ├── network      → attachment + access-control groups
//!   ├── identity     → destination reference (if any)
//!   ├── concurrency  → alias pin / scalable target
//!   ├── observability→ log group + subscription
//!   └── merge        → ResolvedDescriptor
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info};

use fnplan_core::{
    BundledFile, BundlingDirectives, ConfigError, ConfigResult, DEFAULT_HANDLER, DEFAULT_RUNTIME,
    DeploymentConfig, FunctionSpec, ResolvedDescriptor,
};

use crate::concurrency::compose_concurrency;
use crate::entry::{EntryLocator, StaticEntryLocator, resolve_entry};
use crate::identity::{ParameterStore, Resolve, materialize};
use crate::network::resolve_network;
use crate::observability::compose_observability;

pub const STAGE_ENV: &str = "STAGE";
pub const EXTRA_CA_CERT_ENV: &str = "NODE_EXTRA_CA_CERTS";
/// Bundle-relative location of the extra CA certificate.
pub const EXTRA_CA_CERT_FILE: &str = "extra-ca.pub";
/// Where the bundle root lands inside the function runtime.
pub const RUNTIME_TASK_ROOT: &str = "/var/task";
pub const EXTRA_CA_CERT_PATH: &str = "/var/task/extra-ca.pub";
pub const NODE_OPTIONS_ENV: &str = "NODE_OPTIONS";
pub const SOURCE_MAPS_FLAG: &str = "--enable-source-maps";

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 900;
pub const MIN_MEMORY_MB: u32 = 128;
pub const MAX_MEMORY_MB: u32 = 10_240;

/// Resolves deployment configs for one function.
pub struct FunctionAssembler {
    function_id: String,
    locator: Box<dyn EntryLocator>,
    /// When set, deferred references are checked during assembly rather
    /// than left for the provisioning phase.
    parameters: Option<Box<dyn ParameterStore>>,
}

impl FunctionAssembler {
    /// Create an assembler with no known entries.
    ///
    /// Explicit entries resolve as-is; convention-derived entries fail with
    /// `EntryNotFound` until a locator is attached with `with_locator`
    /// (e.g. `FsEntryLocator` for a project root). Output never depends on
    /// the process working directory.
    pub fn new(function_id: impl Into<String>) -> Self {
        Self {
            function_id: function_id.into(),
            locator: Box::new(StaticEntryLocator::default()),
            parameters: None,
        }
    }

    /// Attach the locator used to confirm convention-derived entries.
    pub fn with_locator(mut self, locator: impl EntryLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn with_parameter_store(mut self, store: impl ParameterStore + 'static) -> Self {
        self.parameters = Some(Box::new(store));
        self
    }

    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    /// Resolve `config` into a descriptor. The first failing rule aborts.
    pub fn assemble(&self, config: &DeploymentConfig) -> ConfigResult<ResolvedDescriptor> {
        let id = self.function_id.as_str();

        if config.stage.trim().is_empty() {
            return Err(ConfigError::MissingRequiredField(
                "'stage' must not be empty".to_string(),
            ));
        }

        let entry = resolve_entry(
            id,
            config.entry.as_deref(),
            config.event_type,
            config.base_code_path.as_deref(),
            self.locator.as_ref(),
        )?;

        let network = resolve_network(
            id,
            config.network.as_ref(),
            config.security_groups.as_deref().unwrap_or_default(),
        )?;

        let destination = match &config.log_group_subscriber_lambda_arn {
            Some(identity) => {
                let reference = identity.resolve();
                if let Some(store) = &self.parameters {
                    materialize(&reference, store.as_ref())?;
                }
                Some(reference)
            }
            None => None,
        };

        let concurrency = compose_concurrency(
            id,
            config.reserved_concurrent_executions,
            config.provisioned_concurrent_executions.as_ref(),
        )?;

        let logs = compose_observability(id, config.log_group_retention, destination);

        validate_limits(config)?;
        let (environment, bundling) = merge_environment(config);

        let function = FunctionSpec {
            entry,
            handler: DEFAULT_HANDLER.to_string(),
            runtime: DEFAULT_RUNTIME.to_string(),
            timeout_secs: config.timeout_secs,
            memory_size_mb: config.memory_size_mb,
            reserved_concurrent_executions: concurrency.reserved,
            environment,
            bundling,
        };

        info!(
            function = %id,
            stage = %config.stage,
            entry = %function.entry,
            vpc = network.is_bound_to_vpc(),
            "assembled deployment"
        );

        Ok(ResolvedDescriptor {
            function_id: id.to_string(),
            stage: config.stage.clone(),
            function,
            network,
            logs,
            concurrency,
        })
    }
}

fn validate_limits(config: &DeploymentConfig) -> ConfigResult<()> {
    if let Some(timeout) = config.timeout_secs
        && !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout)
    {
        return Err(ConfigError::InvalidFunctionConfig(format!(
            "timeout_secs ({timeout}) must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS}"
        )));
    }
    if let Some(memory) = config.memory_size_mb
        && !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&memory)
    {
        return Err(ConfigError::InvalidFunctionConfig(format!(
            "memory_size_mb ({memory}) must be between {MIN_MEMORY_MB} and {MAX_MEMORY_MB}"
        )));
    }
    Ok(())
}

/// Build the environment and bundling directives.
///
/// Caller variables are applied last and win on collision.
fn merge_environment(
    config: &DeploymentConfig,
) -> (BTreeMap<String, String>, BundlingDirectives) {
    let mut env = BTreeMap::new();
    env.insert(STAGE_ENV.to_string(), config.stage.clone());

    let options = config.bundling.clone().unwrap_or_default();
    let mut bundling = BundlingDirectives {
        source_map: options.source_map,
        minify: options.minify,
        external_modules: options.external_modules,
        files: Vec::new(),
    };

    if let Some(cert) = &config.extra_ca_pub_cert {
        env.insert(EXTRA_CA_CERT_ENV.to_string(), EXTRA_CA_CERT_PATH.to_string());
        bundling.files.push(BundledFile {
            path: EXTRA_CA_CERT_FILE.to_string(),
            contents: cert.clone(),
        });
    }

    if bundling.source_map {
        env.insert(NODE_OPTIONS_ENV.to_string(), SOURCE_MAPS_FLAG.to_string());
    }

    if let Some(overrides) = &config.environment {
        for (key, value) in overrides {
            if env.insert(key.clone(), value.clone()).is_some() {
                debug!(key = %key, "caller environment overrides derived value");
            }
        }
    }

    (env, bundling)
}
