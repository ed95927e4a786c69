use fnplan_core::{DeploymentConfig, EventType};

pub fn scaffold(stage: &str, event_type: &str) -> anyhow::Result<()> {
    let event_type: EventType = event_type.parse().map_err(anyhow::Error::msg)?;
    let config = DeploymentConfig::scaffold(stage, event_type);
    print!("{}", config.to_toml_string()?);
    Ok(())
}
