//! Log group policy and subscription wiring.
//!
//! A subscription filter is emitted without an invoke permission toward
//! its destination. The destination's owner grants that out of band,
//! which keeps cross-account and cross-region destinations working.

use tracing::debug;

use fnplan_core::ids::logical_id;
use fnplan_core::{LogGroupSpec, LogPolicy, ResolvedReference, RetentionDays, SubscriptionFilter};

pub const DEFAULT_LOG_RETENTION: RetentionDays = RetentionDays::TwoYears;
pub const LOG_GROUP_CONSTRUCT: &str = "default-log-group";
pub const SUBSCRIPTION_FILTER_NAME: &str = "all";
/// Empty pattern matches every log event.
pub const MATCH_ALL_PATTERN: &str = "";

pub fn compose_observability(
    function_id: &str,
    retention: Option<RetentionDays>,
    destination: Option<ResolvedReference>,
) -> LogPolicy {
    let log_group = LogGroupSpec {
        logical_id: logical_id(&[function_id, LOG_GROUP_CONSTRUCT]),
        retention_days: retention.unwrap_or(DEFAULT_LOG_RETENTION).days(),
    };

    let subscription = destination.map(|destination| {
        debug!(
            function = %function_id,
            deferred = destination.is_deferred(),
            "subscribing log group"
        );
        SubscriptionFilter {
            filter_name: SUBSCRIPTION_FILTER_NAME.to_string(),
            filter_pattern: MATCH_ALL_PATTERN.to_string(),
            log_group_logical_id: log_group.logical_id.clone(),
            destination,
        }
    });

    LogPolicy {
        log_group,
        subscription,
    }
}
