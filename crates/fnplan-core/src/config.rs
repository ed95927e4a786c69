//! Deployment config: the declarative, partially-specified input.
//!
//! Loaded from TOML or built programmatically. Nothing here is validated
//! beyond what serde enforces; cross-field rules live in `fnplan-resolve`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::schedule::Schedule;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    pub stage: String,
    pub network: Option<NetworkDescriptor>,
    pub event_type: Option<EventType>,
    pub base_code_path: Option<String>,
    pub entry: Option<String>,
    pub environment: Option<HashMap<String, String>>,
    pub bundling: Option<BundlingOptions>,
    pub timeout_secs: Option<u64>,
    pub memory_size_mb: Option<u32>,
    pub reserved_concurrent_executions: Option<u32>,
    pub provisioned_concurrent_executions: Option<ConcurrencyPolicy>,
    /// PEM contents of an extra CA certificate bundled with the function.
    pub extra_ca_pub_cert: Option<String>,
    pub log_group_retention: Option<RetentionDays>,
    pub log_group_subscriber_lambda_arn: Option<DestinationIdentity>,
    pub security_groups: Option<Vec<SecurityGroupSpec>>,
}

/// Kind of event the function handles. Doubles as the directory name
/// used for convention-based entry discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Http,
    Sqs,
    Sns,
    S3,
    Dynamodb,
    Eventbridge,
    Schedule,
}

impl EventType {
    pub fn dir_name(&self) -> &'static str {
        match self {
            EventType::Http => "http",
            EventType::Sqs => "sqs",
            EventType::Sns => "sns",
            EventType::S3 => "s3",
            EventType::Dynamodb => "dynamodb",
            EventType::Eventbridge => "eventbridge",
            EventType::Schedule => "schedule",
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(EventType::Http),
            "sqs" => Ok(EventType::Sqs),
            "sns" => Ok(EventType::Sns),
            "s3" => Ok(EventType::S3),
            "dynamodb" => Ok(EventType::Dynamodb),
            "eventbridge" => Ok(EventType::Eventbridge),
            "schedule" => Ok(EventType::Schedule),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundlingOptions {
    pub source_map: bool,
    pub minify: bool,
    /// Modules left out of the bundle (provided by the runtime or a layer).
    pub external_modules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkDescriptor {
    pub vpc_id: String,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub private_subnet_ids: Vec<String>,
    #[serde(default)]
    pub private_subnet_route_table_ids: Vec<String>,
}

/// A caller-supplied access-control group attached next to the default one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityGroupSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub allow_all_outbound: bool,
    #[serde(default)]
    pub ingress: Vec<SecurityRule>,
    #[serde(default)]
    pub egress: Vec<SecurityRule>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityRule {
    /// CIDR block, e.g. `9.9.9.9/32`.
    pub peer: String,
    pub port: PortSpec,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortSpec {
    AllTraffic,
    Tcp(u16),
    Udp(u16),
    TcpRange { from: u16, to: u16 },
}

/// Where the log group's subscription filter forwards to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", deny_unknown_fields)]
pub enum DestinationIdentity {
    /// The destination ARN, used as-is.
    #[serde(rename = "arn", alias = "literal")]
    Literal(String),
    /// Name of a parameter holding the destination ARN.
    #[serde(rename = "ssm", alias = "named_lookup")]
    NamedLookup(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConcurrencyPolicy {
    pub min_capacity: u32,
    pub max_capacity: Option<u32>,
    pub schedules: Option<Vec<ScheduleOverride>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleOverride {
    pub min_capacity: u32,
    pub max_capacity: u32,
    pub schedule: Schedule,
    pub name: Option<String>,
}

/// Log retention, in the day counts the log service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionDays {
    OneDay,
    ThreeDays,
    FiveDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
    TwoMonths,
    ThreeMonths,
    FourMonths,
    FiveMonths,
    SixMonths,
    OneYear,
    ThirteenMonths,
    EighteenMonths,
    TwoYears,
    ThreeYears,
    FiveYears,
    SixYears,
    SevenYears,
    EightYears,
    NineYears,
    TenYears,
    Infinite,
}

impl RetentionDays {
    /// Retention in days, `None` for logs that never expire.
    pub fn days(&self) -> Option<u32> {
        let days = match self {
            RetentionDays::OneDay => 1,
            RetentionDays::ThreeDays => 3,
            RetentionDays::FiveDays => 5,
            RetentionDays::OneWeek => 7,
            RetentionDays::TwoWeeks => 14,
            RetentionDays::OneMonth => 30,
            RetentionDays::TwoMonths => 60,
            RetentionDays::ThreeMonths => 90,
            RetentionDays::FourMonths => 120,
            RetentionDays::FiveMonths => 150,
            RetentionDays::SixMonths => 180,
            RetentionDays::OneYear => 365,
            RetentionDays::ThirteenMonths => 400,
            RetentionDays::EighteenMonths => 545,
            RetentionDays::TwoYears => 731,
            RetentionDays::ThreeYears => 1096,
            RetentionDays::FiveYears => 1827,
            RetentionDays::SixYears => 2192,
            RetentionDays::SevenYears => 2557,
            RetentionDays::EightYears => 2922,
            RetentionDays::NineYears => 3288,
            RetentionDays::TenYears => 3653,
            RetentionDays::Infinite => return None,
        };
        Some(days)
    }
}

impl DeploymentConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a minimal convention-based config for the given stage.
    pub fn scaffold(stage: &str, event_type: EventType) -> Self {
        DeploymentConfig {
            stage: stage.to_string(),
            event_type: Some(event_type),
            base_code_path: Some("src/handlers".to_string()),
            timeout_secs: Some(30),
            log_group_retention: Some(RetentionDays::OneMonth),
            bundling: Some(BundlingOptions {
                source_map: true,
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let config = DeploymentConfig::from_toml_str(
            r#"
stage = "dev"
entry = "src/lambda/__tests__/http/test-lambda/index.ts"
"#,
        )
        .unwrap();
        assert_eq!(config.stage, "dev");
        assert!(config.network.is_none());
        assert!(config.event_type.is_none());
    }

    #[test]
    fn test_parse_full() {
        let config = DeploymentConfig::from_toml_str(
            r#"
stage = "dev"
event_type = "http"
base_code_path = "src/apigateway/__tests__"
extra_ca_pub_cert = "CERTIFICATE CONTENTS!"
log_group_retention = "five_days"
log_group_subscriber_lambda_arn = { type = "ssm", value = "log-forwarder-lambda-arn" }

[network]
vpc_id = "aaa"
availability_zones = ["a"]
private_subnet_ids = ["a"]
private_subnet_route_table_ids = ["a"]

[provisioned_concurrent_executions]
min_capacity = 4
max_capacity = 9

[[provisioned_concurrent_executions.schedules]]
min_capacity = 0
max_capacity = 3
schedule = { cron = { minute = "*/2" } }
name = "Run each other minute"

[[security_groups]]
name = "customsg"
description = "custom sg"
allow_all_outbound = false
ingress = [{ peer = "9.9.9.9/32", port = "all_traffic", description = "allow ingress" }]
egress = [{ peer = "1.2.3.4/32", port = { tcp = 8888 } }]
"#,
        )
        .unwrap();

        assert_eq!(config.event_type, Some(EventType::Http));
        assert_eq!(config.log_group_retention, Some(RetentionDays::FiveDays));
        assert_eq!(
            config.log_group_subscriber_lambda_arn,
            Some(DestinationIdentity::NamedLookup(
                "log-forwarder-lambda-arn".to_string()
            ))
        );
        let policy = config.provisioned_concurrent_executions.unwrap();
        assert_eq!(policy.max_capacity, Some(9));
        assert_eq!(policy.schedules.unwrap().len(), 1);
        let groups = config.security_groups.unwrap();
        assert!(!groups[0].allow_all_outbound);
        assert_eq!(groups[0].egress[0].port, PortSpec::Tcp(8888));
    }

    #[test]
    fn rejects_unknown_top_level_key() {
        let err = DeploymentConfig::from_toml_str(
            r#"
stage = "dev"
entry = "x"
logGroupRetention = "five_days"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("logGroupRetention"), "{err}");
    }

    #[test]
    fn rejects_unknown_nested_keys() {
        let misspelled = [
            "[network]\nvpc_id = \"aaa\"\nsubnet_ids = [\"a\"]",
            "[provisioned_concurrent_executions]\nmin_capacity = 1\nmaxCapacity = 2",
            "[bundling]\nsourceMap = true",
            "[[security_groups]]\nname = \"sg\"\negress = [{ peer = \"1.2.3.4/32\", port = \"all_traffic\", desc = \"x\" }]",
            "[provisioned_concurrent_executions]\nmin_capacity = 0\nmax_capacity = 1\n[[provisioned_concurrent_executions.schedules]]\nmin_capacity = 0\nmax_capacity = 1\nschedule = { rate = { seconds = 60 } }\nlabel = \"x\"",
        ];
        for body in misspelled {
            let toml_str = format!("stage = \"dev\"\nentry = \"x\"\n{body}\n");
            assert!(
                DeploymentConfig::from_toml_str(&toml_str).is_err(),
                "accepted unknown key in:\n{toml_str}"
            );
        }
    }

    #[test]
    fn literal_destination_uses_arn_tag() {
        let json = serde_json::to_string(&DestinationIdentity::Literal("arn:x".to_string())).unwrap();
        assert_eq!(json, r#"{"type":"arn","value":"arn:x"}"#);
    }

    #[test]
    fn retention_days() {
        assert_eq!(RetentionDays::FiveDays.days(), Some(5));
        assert_eq!(RetentionDays::TwoYears.days(), Some(731));
        assert_eq!(RetentionDays::Infinite.days(), None);
    }

    #[test]
    fn event_type_from_str() {
        assert_eq!("HTTP".parse::<EventType>(), Ok(EventType::Http));
        assert!("ftp".parse::<EventType>().is_err());
    }

    #[test]
    fn test_scaffold() {
        let config = DeploymentConfig::scaffold("dev", EventType::Sqs);
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("stage = \"dev\""));
        assert!(toml_str.contains("sqs"));
        let back = DeploymentConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }
}
