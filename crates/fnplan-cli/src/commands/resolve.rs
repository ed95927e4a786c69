use std::path::Path;

use fnplan_core::{DeploymentConfig, ResolvedDescriptor};
use fnplan_resolve::{FsEntryLocator, FunctionAssembler, InMemoryParameterStore};

pub fn resolve(
    config: &str,
    id: &str,
    root: &str,
    parameters: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let descriptor = resolve_descriptor(Path::new(config), id, Path::new(root), parameters.map(Path::new))?;

    match format {
        "text" => {
            println!("{}", fnplan_resolve::report::format_descriptor(&descriptor));
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
    }

    Ok(())
}

fn resolve_descriptor(
    config: &Path,
    id: &str,
    root: &Path,
    parameters: Option<&Path>,
) -> anyhow::Result<ResolvedDescriptor> {
    let config = DeploymentConfig::from_file(config)?;
    let mut assembler = FunctionAssembler::new(id).with_locator(FsEntryLocator::new(root));
    if let Some(path) = parameters {
        assembler = assembler.with_parameter_store(InMemoryParameterStore::from_file(path)?);
    }

    match assembler.assemble(&config) {
        Ok(descriptor) => Ok(descriptor),
        Err(e) => {
            tracing::error!(function = %id, kind = e.kind(), "resolution failed");
            Err(e.into())
        }
    }
}
