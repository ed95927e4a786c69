//! Schedule expressions for scheduled capacity overrides.
//!
//! Three forms are accepted in a deployment config:
//!
//! ```toml
//! schedule = { cron = { minute = "*/2" } }     # cron(*/2 * * * ? *)
//! schedule = { rate = { seconds = 86400 } }    # rate(1 day)
//! schedule = { expression = "rate(5 minutes)" }
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// When a scheduled action fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    Cron(CronOptions),
    Rate {
        seconds: u64,
        /// Sub-second remainder; rates must be whole minutes, so any
        /// non-zero value fails to render.
        #[serde(default, skip_serializing_if = "is_zero")]
        nanos: u32,
    },
    /// A raw `cron(...)`, `rate(...)` or `at(...)` expression.
    Expression(String),
}

/// Cron fields. Unset fields default to `*`, except that exactly one of
/// `day` / `week_day` is rendered as `?`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CronOptions {
    pub minute: Option<String>,
    pub hour: Option<String>,
    pub day: Option<String>,
    pub month: Option<String>,
    pub week_day: Option<String>,
    pub year: Option<String>,
}

impl Schedule {
    pub fn cron(options: CronOptions) -> Self {
        Schedule::Cron(options)
    }

    pub fn rate(interval: Duration) -> Self {
        Schedule::Rate {
            seconds: interval.as_secs(),
            nanos: interval.subsec_nanos(),
        }
    }

    pub fn expression(raw: impl Into<String>) -> Self {
        Schedule::Expression(raw.into())
    }

    /// Render the schedule as a scheduler expression string.
    pub fn render(&self) -> ConfigResult<String> {
        match self {
            Schedule::Cron(options) => render_cron(options),
            Schedule::Rate { seconds, nanos } => render_rate(*seconds, *nanos),
            Schedule::Expression(raw) => render_expression(raw),
        }
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

fn render_expression(raw: &str) -> ConfigResult<String> {
    let raw = raw.trim();
    let body = ["cron(", "rate(", "at("]
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .and_then(|rest| rest.strip_suffix(')'));

    match body {
        Some(body) if !body.trim().is_empty() => Ok(raw.to_string()),
        _ => Err(ConfigError::InvalidConcurrencyPolicy(format!(
            "unsupported schedule expression: '{raw}'"
        ))),
    }
}

fn render_cron(options: &CronOptions) -> ConfigResult<String> {
    if options.day.is_some() && options.week_day.is_some() {
        return Err(ConfigError::InvalidConcurrencyPolicy(
            "cannot supply both 'day' and 'week_day' in a cron schedule, use at most one"
                .to_string(),
        ));
    }

    let minute = options.minute.as_deref().unwrap_or("*");
    let hour = options.hour.as_deref().unwrap_or("*");
    let day_default = if options.week_day.is_some() { "?" } else { "*" };
    let day = options.day.as_deref().unwrap_or(day_default);
    let month = options.month.as_deref().unwrap_or("*");
    let week_day = options.week_day.as_deref().unwrap_or("?");
    let year = options.year.as_deref().unwrap_or("*");

    Ok(format!(
        "cron({minute} {hour} {day} {month} {week_day} {year})"
    ))
}

fn render_rate(seconds: u64, nanos: u32) -> ConfigResult<String> {
    if nanos != 0 {
        return Err(ConfigError::InvalidConcurrencyPolicy(format!(
            "rate schedule of {seconds}.{nanos:09}s is not a whole number of minutes"
        )));
    }
    if seconds == 0 {
        return Err(ConfigError::InvalidConcurrencyPolicy(
            "rate schedule duration cannot be 0".to_string(),
        ));
    }

    let (count, unit) = if seconds % SECS_PER_DAY == 0 {
        (seconds / SECS_PER_DAY, "day")
    } else if seconds % SECS_PER_HOUR == 0 {
        (seconds / SECS_PER_HOUR, "hour")
    } else if seconds % SECS_PER_MINUTE == 0 {
        (seconds / SECS_PER_MINUTE, "minute")
    } else {
        return Err(ConfigError::InvalidConcurrencyPolicy(format!(
            "rate schedule of {seconds}s is not a whole number of minutes"
        )));
    };

    let plural = if count == 1 { "" } else { "s" };
    Ok(format!("rate({count} {unit}{plural})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cron_defaults() {
        let schedule = Schedule::cron(CronOptions {
            minute: Some("*/2".to_string()),
            ..Default::default()
        });
        assert_eq!(schedule.render().unwrap(), "cron(*/2 * * * ? *)");
    }

    #[test]
    fn cron_week_day_moves_question_mark() {
        let schedule = Schedule::cron(CronOptions {
            minute: Some("0".to_string()),
            hour: Some("8".to_string()),
            week_day: Some("MON-FRI".to_string()),
            ..Default::default()
        });
        assert_eq!(schedule.render().unwrap(), "cron(0 8 ? * MON-FRI *)");
    }

    #[test]
    fn cron_rejects_day_and_week_day() {
        let schedule = Schedule::cron(CronOptions {
            day: Some("1".to_string()),
            week_day: Some("MON".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            schedule.render(),
            Err(ConfigError::InvalidConcurrencyPolicy(_))
        ));
    }

    #[test]
    fn rate_picks_largest_whole_unit() {
        assert_eq!(
            Schedule::rate(Duration::from_secs(SECS_PER_DAY)).render().unwrap(),
            "rate(1 day)"
        );
        assert_eq!(
            Schedule::rate(Duration::from_secs(3 * SECS_PER_HOUR)).render().unwrap(),
            "rate(3 hours)"
        );
        assert_eq!(
            Schedule::rate(Duration::from_secs(90 * SECS_PER_MINUTE)).render().unwrap(),
            "rate(90 minutes)"
        );
    }

    #[test]
    fn rate_rejects_zero_and_sub_minute() {
        assert!(Schedule::rate(Duration::ZERO).render().is_err());
        assert!(Schedule::rate(Duration::from_secs(90)).render().is_err());
    }

    #[test]
    fn raw_expression_passthrough() {
        let schedule = Schedule::expression(" rate(5 minutes) ");
        assert_eq!(schedule.render().unwrap(), "rate(5 minutes)");
        assert!(Schedule::expression("every day").render().is_err());
    }

    #[test]
    fn raw_expression_requires_body() {
        for raw in ["cron()", "rate()", "at( )"] {
            assert!(
                matches!(
                    Schedule::expression(raw).render(),
                    Err(ConfigError::InvalidConcurrencyPolicy(_))
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rate_rejects_fractional_seconds() {
        let schedule = Schedule::rate(Duration::from_millis(60_500));
        assert!(matches!(
            schedule.render(),
            Err(ConfigError::InvalidConcurrencyPolicy(_))
        ));
        assert_eq!(
            Schedule::rate(Duration::from_millis(60_000)).render().unwrap(),
            "rate(1 minute)"
        );
    }

    #[test]
    fn cron_rejects_unknown_field() {
        #[derive(Debug, Deserialize)]
        struct Wrapper {
            #[allow(dead_code)]
            schedule: Schedule,
        }
        let parsed = toml::from_str::<Wrapper>(r#"schedule = { cron = { minutes = "*/2" } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            schedule: Schedule,
        }
        let w: Wrapper = toml::from_str(r#"schedule = { cron = { minute = "*/2" } }"#).unwrap();
        assert_eq!(w.schedule.render().unwrap(), "cron(*/2 * * * ? *)");
        let w: Wrapper = toml::from_str(r#"schedule = { rate = { seconds = 86400 } }"#).unwrap();
        assert_eq!(w.schedule.render().unwrap(), "rate(1 day)");
    }
}
