//! Resolved deployment descriptor handed to the provisioning layer.
//!
//! Every collection here is ordered (`Vec` or `BTreeMap`) so that two
//! resolutions of the same config serialize identically.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::SecurityGroupSpec;

pub const DEFAULT_RUNTIME: &str = "nodejs20.x";
pub const DEFAULT_HANDLER: &str = "index.handler";

/// Fully-resolved deployment for a single function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDescriptor {
    pub function_id: String,
    pub stage: String,
    pub function: FunctionSpec,
    pub network: NetworkAttachment,
    pub logs: LogPolicy,
    pub concurrency: ConcurrencyOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSpec {
    pub entry: String,
    pub handler: String,
    pub runtime: String,
    pub timeout_secs: Option<u64>,
    pub memory_size_mb: Option<u32>,
    pub reserved_concurrent_executions: Option<u32>,
    pub environment: BTreeMap<String, String>,
    pub bundling: BundlingDirectives,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BundlingDirectives {
    pub source_map: bool,
    pub minify: bool,
    pub external_modules: Vec<String>,
    /// Extra files copied next to the bundled handler.
    pub files: Vec<BundledFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundledFile {
    /// Path relative to the bundle root.
    pub path: String,
    pub contents: String,
}

// ── Network ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NetworkAttachment {
    Unattached,
    Attached(VpcAttachment),
}

impl NetworkAttachment {
    pub fn is_bound_to_vpc(&self) -> bool {
        matches!(self, NetworkAttachment::Attached(_))
    }

    pub fn security_groups(&self) -> &[SecurityGroupSpec] {
        match self {
            NetworkAttachment::Unattached => &[],
            NetworkAttachment::Attached(vpc) => &vpc.security_groups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VpcAttachment {
    pub vpc_id: String,
    pub availability_zones: Vec<String>,
    pub subnets: Vec<SubnetPlacement>,
    /// Default group first, then caller groups in input order.
    pub security_groups: Vec<SecurityGroupSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetPlacement {
    pub subnet_id: String,
    pub route_table_id: String,
    pub availability_zone: String,
}

// ── Logs ─────────────────────────────────────────────────────────

/// A cross-resource pointer to the subscription destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedReference {
    Literal { value: String },
    /// Satisfied by the parameter store at provisioning time.
    Deferred {
        parameter_name: String,
        logical_id: String,
    },
}

impl ResolvedReference {
    pub fn is_deferred(&self) -> bool {
        matches!(self, ResolvedReference::Deferred { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPolicy {
    pub log_group: LogGroupSpec,
    pub subscription: Option<SubscriptionFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogGroupSpec {
    pub logical_id: String,
    /// `None` means logs never expire.
    pub retention_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionFilter {
    pub filter_name: String,
    pub filter_pattern: String,
    pub log_group_logical_id: String,
    pub destination: ResolvedReference,
}

// ── Concurrency ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConcurrencyOutput {
    pub reserved: Option<u32>,
    pub provisioned: Option<ProvisionedConcurrency>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionedConcurrency {
    pub alias_name: String,
    pub provisioned_executions: u32,
    pub autoscaling: Option<ScalableTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalableTarget {
    pub resource_id: String,
    pub scalable_dimension: String,
    pub min_capacity: u32,
    pub max_capacity: u32,
    pub scheduled_actions: Vec<ScheduledAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledAction {
    pub min_capacity: u32,
    pub max_capacity: u32,
    pub schedule: String,
    pub name: Option<String>,
}
