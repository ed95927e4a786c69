//! Entry resolution: explicit entry path, or discovery by convention.
//!
//! Convention: `{base_code_path}/{event_type}/{function_id}/index.ts`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use fnplan_core::{ConfigError, ConfigResult, EventType};

pub const CONVENTION_ENTRY_FILE: &str = "index.ts";

/// Answers whether a convention-derived entry file exists.
pub trait EntryLocator: Send + Sync {
    fn exists(&self, entry: &str) -> bool;
}

/// Looks entries up on disk, relative to a project root.
#[derive(Debug, Clone)]
pub struct FsEntryLocator {
    root: PathBuf,
}

impl FsEntryLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl EntryLocator for FsEntryLocator {
    fn exists(&self, entry: &str) -> bool {
        self.root.join(entry).is_file()
    }
}

/// A fixed set of known entry paths.
#[derive(Debug, Clone, Default)]
pub struct StaticEntryLocator {
    known: BTreeSet<String>,
}

impl StaticEntryLocator {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: entries.into_iter().map(Into::into).collect(),
        }
    }
}

impl EntryLocator for StaticEntryLocator {
    fn exists(&self, entry: &str) -> bool {
        self.known.contains(entry)
    }
}

/// Derive the convention entry path without checking it exists.
pub fn convention_entry(base_code_path: &str, event_type: EventType, function_id: &str) -> String {
    Path::new(base_code_path)
        .join(event_type.dir_name())
        .join(function_id)
        .join(CONVENTION_ENTRY_FILE)
        .to_string_lossy()
        .into_owned()
}

/// Resolve the effective entry path.
///
/// An explicit `entry` wins and is returned verbatim. Otherwise both
/// `event_type` and `base_code_path` are required and the derived path
/// must be known to `locator`.
pub fn resolve_entry(
    function_id: &str,
    entry: Option<&str>,
    event_type: Option<EventType>,
    base_code_path: Option<&str>,
    locator: &dyn EntryLocator,
) -> ConfigResult<String> {
    if let Some(entry) = entry {
        return Ok(entry.to_string());
    }

    let event_type = event_type.ok_or_else(|| {
        ConfigError::MissingRequiredField(
            "'event_type' is required if 'entry' is not defined".to_string(),
        )
    })?;
    let base_code_path = base_code_path.ok_or_else(|| {
        ConfigError::MissingRequiredField(
            "'base_code_path' is required if 'entry' is not defined".to_string(),
        )
    })?;

    let derived = convention_entry(base_code_path, event_type, function_id);
    if !locator.exists(&derived) {
        return Err(ConfigError::EntryNotFound(derived));
    }

    debug!(function = %function_id, entry = %derived, "derived entry by convention");
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ENTRY: &str = "src/lambda/__tests__/http/test-lambda/index.ts";

    fn locator() -> StaticEntryLocator {
        StaticEntryLocator::new([TEST_ENTRY])
    }

    #[test]
    fn explicit_entry_is_verbatim() {
        let entry = resolve_entry(
            "whatever",
            Some("some/where/main.ts"),
            Some(EventType::Sqs),
            Some("ignored"),
            &StaticEntryLocator::default(),
        )
        .unwrap();
        assert_eq!(entry, "some/where/main.ts");
    }

    #[test]
    fn derives_by_convention() {
        let entry = resolve_entry(
            "test-lambda",
            None,
            Some(EventType::Http),
            Some("src/lambda/__tests__"),
            &locator(),
        )
        .unwrap();
        assert_eq!(entry, TEST_ENTRY);
    }

    #[test]
    fn missing_event_type() {
        let err = resolve_entry(
            "test-lambda",
            None,
            None,
            Some("src/lambda/__tests__"),
            &locator(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequiredField(
                "'event_type' is required if 'entry' is not defined".to_string()
            )
        );
    }

    #[test]
    fn missing_base_code_path() {
        let err = resolve_entry("test-lambda", None, Some(EventType::Http), None, &locator())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredField(msg) if msg.contains("base_code_path")));
    }

    #[test]
    fn derived_entry_must_exist() {
        let err = resolve_entry(
            "test-lambda1",
            None,
            Some(EventType::Http),
            Some("src/lambda/__tests__"),
            &locator(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::EntryNotFound("src/lambda/__tests__/http/test-lambda1/index.ts".to_string())
        );
    }

    #[test]
    fn fs_locator_checks_files() {
        let dir = tempfile::tempdir().unwrap();
        let handler_dir = dir.path().join("src/handlers/sqs/worker");
        std::fs::create_dir_all(&handler_dir).unwrap();
        std::fs::write(handler_dir.join("index.ts"), "export const handler = async () => {};\n").unwrap();

        let locator = FsEntryLocator::new(dir.path());
        assert!(locator.exists("src/handlers/sqs/worker/index.ts"));
        assert!(!locator.exists("src/handlers/sqs/other/index.ts"));
        // Directories are not entries.
        assert!(!locator.exists("src/handlers/sqs/worker"));
    }
}
