//! Concurrency composition: reserved pass-through, provisioned alias pin,
//! and an optional scalable target with scheduled capacity windows.
//!
//! ```text
//! provisioned = { min }                  → alias pin at min
//! provisioned = { min, max }             → alias pin + target [min, max]
//! provisioned = { min, max, schedules }  → alias pin + target + one action per schedule
//! ```

use tracing::debug;

use fnplan_core::{
    ConcurrencyOutput, ConcurrencyPolicy, ConfigError, ConfigResult, ProvisionedConcurrency,
    ScalableTarget, ScheduleOverride, ScheduledAction,
};

pub const PROVISIONED_ALIAS_NAME: &str = "live";
pub const PROVISIONED_CONCURRENCY_DIMENSION: &str = "lambda:function:ProvisionedConcurrency";

pub fn compose_concurrency(
    function_id: &str,
    reserved: Option<u32>,
    provisioned: Option<&ConcurrencyPolicy>,
) -> ConfigResult<ConcurrencyOutput> {
    let Some(policy) = provisioned else {
        return Ok(ConcurrencyOutput {
            reserved,
            provisioned: None,
        });
    };

    validate_policy(policy)?;

    let schedules = policy.schedules.as_deref().unwrap_or_default();
    let autoscaling = match policy.max_capacity {
        Some(max_capacity) => {
            let scheduled_actions = schedules
                .iter()
                .map(scheduled_action)
                .collect::<ConfigResult<Vec<_>>>()?;
            Some(ScalableTarget {
                resource_id: format!("function:{function_id}:{PROVISIONED_ALIAS_NAME}"),
                scalable_dimension: PROVISIONED_CONCURRENCY_DIMENSION.to_string(),
                min_capacity: policy.min_capacity,
                max_capacity,
                scheduled_actions,
            })
        }
        None => None,
    };

    debug!(
        function = %function_id,
        min = policy.min_capacity,
        max = ?policy.max_capacity,
        actions = schedules.len(),
        "composed provisioned concurrency"
    );

    Ok(ConcurrencyOutput {
        reserved,
        provisioned: Some(ProvisionedConcurrency {
            alias_name: PROVISIONED_ALIAS_NAME.to_string(),
            provisioned_executions: policy.min_capacity,
            autoscaling,
        }),
    })
}

fn validate_policy(policy: &ConcurrencyPolicy) -> ConfigResult<()> {
    let has_schedules = policy.schedules.as_ref().is_some_and(|s| !s.is_empty());

    match policy.max_capacity {
        Some(max) if max < policy.min_capacity => {
            return Err(ConfigError::InvalidConcurrencyPolicy(format!(
                "max_capacity ({max}) must be greater than or equal to min_capacity ({})",
                policy.min_capacity
            )));
        }
        None if has_schedules => {
            return Err(ConfigError::InvalidConcurrencyPolicy(
                "'max_capacity' is required when 'schedules' are defined".to_string(),
            ));
        }
        _ => {}
    }

    for (i, window) in policy.schedules.iter().flatten().enumerate() {
        if window.max_capacity < window.min_capacity {
            return Err(ConfigError::InvalidConcurrencyPolicy(format!(
                "schedule {i}: max_capacity ({}) must be greater than or equal to min_capacity ({})",
                window.max_capacity, window.min_capacity
            )));
        }
    }
    Ok(())
}

fn scheduled_action(window: &ScheduleOverride) -> ConfigResult<ScheduledAction> {
    Ok(ScheduledAction {
        min_capacity: window.min_capacity,
        max_capacity: window.max_capacity,
        schedule: window.schedule.render()?,
        name: window.name.clone(),
    })
}
