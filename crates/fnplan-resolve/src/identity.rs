//! Destination identity resolution.
//!
//! A literal ARN resolves to itself. A named lookup resolves to a
//! deferred pointer at a parameter-store value; the store is only
//! consulted when the reference is materialized.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use fnplan_core::ids::logical_id;
use fnplan_core::{ConfigError, ConfigResult, DestinationIdentity, ResolvedReference};

const PARAMETER_VALUE_PREFIX: &str = "SsmParameterValue";
const PARAMETER_VALUE_SUFFIX: &str = "Parameter";

/// Anything that resolves to a cross-resource reference.
pub trait Resolve {
    fn resolve(&self) -> ResolvedReference;
}

impl Resolve for DestinationIdentity {
    fn resolve(&self) -> ResolvedReference {
        match self {
            DestinationIdentity::Literal(value) => ResolvedReference::Literal {
                value: value.clone(),
            },
            DestinationIdentity::NamedLookup(name) => {
                let id = logical_id(&[PARAMETER_VALUE_PREFIX, name]);
                debug!(parameter = %name, logical_id = %id, "deferring destination lookup");
                ResolvedReference::Deferred {
                    parameter_name: name.clone(),
                    logical_id: format!("{id}{PARAMETER_VALUE_SUFFIX}"),
                }
            }
        }
    }
}

/// External named-value store queried for deferred references.
pub trait ParameterStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Parameter store backed by a map, loadable from a flat TOML table:
///
/// ```toml
/// log-forwarder-lambda-arn = "arn:aws:lambda:eu-west-1:012345678:function:fwd"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct InMemoryParameterStore {
    values: BTreeMap<String, String>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let store: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(store)
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Satisfy a reference against the store.
///
/// Literals never touch the store; deferred references fail with
/// `UnresolvedReference` when the name is missing.
pub fn materialize(reference: &ResolvedReference, store: &dyn ParameterStore) -> ConfigResult<String> {
    match reference {
        ResolvedReference::Literal { value } => Ok(value.clone()),
        ResolvedReference::Deferred { parameter_name, .. } => store
            .get(parameter_name)
            .ok_or_else(|| ConfigError::UnresolvedReference(parameter_name.clone())),
    }
}
