//! Human-readable descriptor formatting.

use fnplan_core::{NetworkAttachment, ResolvedDescriptor, ResolvedReference};

pub fn format_descriptor(descriptor: &ResolvedDescriptor) -> String {
    let mut out = String::new();
    let function = &descriptor.function;

    out.push_str(&format!("\nFunction {} ({})\n", descriptor.function_id, descriptor.stage));
    out.push_str(&format!("  Entry:    {}\n", function.entry));
    out.push_str(&format!("  Runtime:  {} / {}\n", function.runtime, function.handler));
    if let Some(timeout) = function.timeout_secs {
        out.push_str(&format!("  Timeout:  {timeout}s\n"));
    }
    if let Some(memory) = function.memory_size_mb {
        out.push_str(&format!("  Memory:   {memory} MB\n"));
    }

    out.push_str("\nEnvironment:\n");
    for (key, value) in &function.environment {
        out.push_str(&format!("  {key}={value}\n"));
    }
    for file in &function.bundling.files {
        out.push_str(&format!("  (bundled file: {})\n", file.path));
    }

    out.push_str("\nNetwork:\n");
    match &descriptor.network {
        NetworkAttachment::Unattached => out.push_str("  not attached to a VPC\n"),
        NetworkAttachment::Attached(vpc) => {
            out.push_str(&format!("  VPC {} ({} subnets)\n", vpc.vpc_id, vpc.subnets.len()));
            for group in &vpc.security_groups {
                out.push_str(&format!(
                    "  • {} ({} ingress, {} egress)\n",
                    group.name,
                    group.ingress.len(),
                    group.egress.len()
                ));
            }
        }
    }

    out.push_str("\nConcurrency:\n");
    let concurrency = &descriptor.concurrency;
    if let Some(reserved) = concurrency.reserved {
        out.push_str(&format!("  reserved: {reserved}\n"));
    }
    match &concurrency.provisioned {
        None => out.push_str("  no provisioned concurrency\n"),
        Some(provisioned) => {
            out.push_str(&format!(
                "  alias '{}' provisioned at {}\n",
                provisioned.alias_name, provisioned.provisioned_executions
            ));
            if let Some(target) = &provisioned.autoscaling {
                out.push_str(&format!(
                    "  autoscaling [{}, {}]\n",
                    target.min_capacity, target.max_capacity
                ));
                for (i, action) in target.scheduled_actions.iter().enumerate() {
                    let name = action.name.as_deref().unwrap_or("-");
                    out.push_str(&format!(
                        "    {}. {} [{}, {}] {name}\n",
                        i + 1,
                        action.schedule,
                        action.min_capacity,
                        action.max_capacity
                    ));
                }
            }
        }
    }

    out.push_str("\nLogs:\n");
    let logs = &descriptor.logs;
    match logs.log_group.retention_days {
        Some(days) => out.push_str(&format!("  retention: {days} days\n")),
        None => out.push_str("  retention: never expire\n"),
    }
    if let Some(filter) = &logs.subscription {
        let target = match &filter.destination {
            ResolvedReference::Literal { value } => value.clone(),
            ResolvedReference::Deferred { parameter_name, .. } => {
                format!("parameter '{parameter_name}' (deferred)")
            }
        };
        out.push_str(&format!("  subscription '{}' → {target}\n", filter.filter_name));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FunctionAssembler;
    use fnplan_core::{DeploymentConfig, DestinationIdentity};

    #[test]
    fn formats_deferred_subscription() {
        let config = DeploymentConfig {
            stage: "dev".to_string(),
            entry: Some("src/index.ts".to_string()),
            log_group_subscriber_lambda_arn: Some(DestinationIdentity::NamedLookup(
                "fwd-arn".to_string(),
            )),
            ..Default::default()
        };
        let descriptor = FunctionAssembler::new("api").assemble(&config).unwrap();
        let text = format_descriptor(&descriptor);
        assert!(text.contains("Function api (dev)"));
        assert!(text.contains("STAGE=dev"));
        assert!(text.contains("not attached to a VPC"));
        assert!(text.contains("parameter 'fwd-arn' (deferred)"));
        assert!(text.contains("retention: 731 days"));
    }
}
