//! Network resolution: VPC attachment plus ordered access-control groups.

use std::net::IpAddr;

use tracing::debug;

use fnplan_core::{
    ConfigError, ConfigResult, NetworkAttachment, NetworkDescriptor, PortSpec, SecurityGroupSpec,
    SecurityRule, SubnetPlacement, VpcAttachment,
};

/// Suffix of the default group created for every attached function.
pub const DEFAULT_SECURITY_GROUP_SUFFIX: &str = "-sg";

/// The access-control group every VPC-bound function gets.
pub fn default_security_group(function_id: &str) -> SecurityGroupSpec {
    SecurityGroupSpec {
        name: format!("{function_id}{DEFAULT_SECURITY_GROUP_SUFFIX}"),
        description: format!("Default security group for {function_id}"),
        allow_all_outbound: true,
        ingress: Vec::new(),
        egress: Vec::new(),
    }
}

/// Resolve the network attachment for a function.
///
/// Without a network descriptor the function is unattached and any
/// caller groups are ignored.
pub fn resolve_network(
    function_id: &str,
    network: Option<&NetworkDescriptor>,
    security_groups: &[SecurityGroupSpec],
) -> ConfigResult<NetworkAttachment> {
    let Some(network) = network else {
        if !security_groups.is_empty() {
            debug!(
                function = %function_id,
                groups = security_groups.len(),
                "no network configured, ignoring security groups"
            );
        }
        return Ok(NetworkAttachment::Unattached);
    };

    validate_descriptor(network)?;
    for group in security_groups {
        validate_group(group)?;
    }

    // Subnets are spread over the AZs in order, as many per AZ as the
    // multiple allows.
    let per_az = network.private_subnet_ids.len() / network.availability_zones.len();
    let subnets = network
        .private_subnet_ids
        .iter()
        .zip(&network.private_subnet_route_table_ids)
        .enumerate()
        .map(|(i, (subnet, route_table))| SubnetPlacement {
            subnet_id: subnet.clone(),
            route_table_id: route_table.clone(),
            availability_zone: network.availability_zones[i / per_az].clone(),
        })
        .collect();

    let mut groups = Vec::with_capacity(security_groups.len() + 1);
    groups.push(default_security_group(function_id));
    groups.extend(security_groups.iter().cloned());

    debug!(
        function = %function_id,
        vpc = %network.vpc_id,
        groups = groups.len(),
        "resolved vpc attachment"
    );

    Ok(NetworkAttachment::Attached(VpcAttachment {
        vpc_id: network.vpc_id.clone(),
        availability_zones: network.availability_zones.clone(),
        subnets,
        security_groups: groups,
    }))
}

fn validate_descriptor(network: &NetworkDescriptor) -> ConfigResult<()> {
    if network.vpc_id.trim().is_empty() {
        return Err(invalid("'vpc_id' must not be empty"));
    }

    let azs = network.availability_zones.len();
    let subnets = network.private_subnet_ids.len();
    let route_tables = network.private_subnet_route_table_ids.len();

    let provided = [azs, subnets, route_tables].iter().filter(|n| **n > 0).count();
    if provided == 0 {
        return Err(invalid(
            "'availability_zones', 'private_subnet_ids' and 'private_subnet_route_table_ids' must not be empty",
        ));
    }
    if provided < 3 {
        return Err(invalid(
            "'availability_zones', 'private_subnet_ids' and 'private_subnet_route_table_ids' must be provided together",
        ));
    }
    if subnets % azs != 0 {
        return Err(invalid(&format!(
            "number of private_subnet_ids ({subnets}) must be a multiple of availability zones ({azs})"
        )));
    }
    if route_tables != subnets {
        return Err(invalid(&format!(
            "number of private_subnet_route_table_ids ({route_tables}) must equal number of private_subnet_ids ({subnets})"
        )));
    }
    Ok(())
}

fn validate_group(group: &SecurityGroupSpec) -> ConfigResult<()> {
    if group.name.trim().is_empty() {
        return Err(invalid("security group name must not be empty"));
    }
    for rule in group.ingress.iter().chain(&group.egress) {
        validate_rule(&group.name, rule)?;
    }
    Ok(())
}

fn validate_rule(group: &str, rule: &SecurityRule) -> ConfigResult<()> {
    if !is_cidr(&rule.peer) {
        return Err(invalid(&format!(
            "security group '{group}': peer '{}' is not a CIDR block",
            rule.peer
        )));
    }
    if let PortSpec::TcpRange { from, to } = rule.port
        && from > to
    {
        return Err(invalid(&format!(
            "security group '{group}': port range {from}-{to} is inverted"
        )));
    }
    Ok(())
}

fn is_cidr(peer: &str) -> bool {
    let Some((addr, prefix)) = peer.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => prefix <= 32,
        Ok(IpAddr::V6(_)) => prefix <= 128,
        Err(_) => false,
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::InvalidNetworkConfig(msg.to_string())
}
