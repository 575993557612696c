//! Process configuration for the dispatcher.
//!
//! Everything is read from environment-style key/value pairs so tests can
//! pass an explicit list instead of mutating the process environment.

use crate::error::DispatchError;
use crate::launch::LaunchTarget;
use crate::placement::{collect_subnets, DEFAULT_SECURITY_GROUP_NAME};

pub const VPC_ID_ENV: &str = "VPC_ID";
pub const SECURITY_GROUP_NAME_ENV: &str = "SECURITY_GROUP_NAME";
pub const CLUSTER_ENV: &str = "ECS_CLUSTER";
pub const TASK_DEFINITION_ENV: &str = "ECS_TASK_DEFINITION";
pub const CONTAINER_NAME_ENV: &str = "ECS_CONTAINER_NAME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub vpc_id: String,
    pub security_group_name: String,
    pub subnets: Vec<String>,
    pub target: LaunchTarget,
}

impl DispatcherConfig {
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        let lookup = |name: &str| {
            vars.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let vpc_id = lookup(VPC_ID_ENV).ok_or(DispatchError::MissingConfiguration(VPC_ID_ENV))?;
        let defaults = LaunchTarget::default();
        let target = LaunchTarget {
            cluster: lookup(CLUSTER_ENV).unwrap_or(defaults.cluster),
            task_definition: lookup(TASK_DEFINITION_ENV).unwrap_or(defaults.task_definition),
            container_name: lookup(CONTAINER_NAME_ENV).unwrap_or(defaults.container_name),
        };
        let security_group_name = lookup(SECURITY_GROUP_NAME_ENV)
            .unwrap_or_else(|| DEFAULT_SECURITY_GROUP_NAME.to_string());

        Ok(Self {
            vpc_id,
            security_group_name,
            subnets: collect_subnets(vars.iter().map(|(key, value)| (key, value.clone()))),
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn requires_vpc_id() {
        let error = DispatcherConfig::from_vars(vars(&[("SUBNET_ID_1", "s-1")]))
            .expect_err("config without VPC_ID should fail");
        assert_eq!(error, DispatchError::MissingConfiguration("VPC_ID"));
    }

    #[test]
    fn blank_vpc_id_counts_as_missing() {
        let error = DispatcherConfig::from_vars(vars(&[("VPC_ID", "  ")]))
            .expect_err("blank VPC_ID should fail");
        assert_eq!(error, DispatchError::MissingConfiguration("VPC_ID"));
    }

    #[test]
    fn applies_defaults() {
        let config = DispatcherConfig::from_vars(vars(&[("VPC_ID", "vpc-1")]))
            .expect("config should load");

        assert_eq!(config.vpc_id, "vpc-1");
        assert_eq!(config.security_group_name, "default");
        assert_eq!(config.target, LaunchTarget::default());
        assert!(config.subnets.is_empty());
    }

    #[test]
    fn from_env_reads_process_environment() {
        std::env::set_var("VPC_ID", "vpc-from-env");
        std::env::set_var("SUBNET_ID_CONFIG_FROM_ENV", "subnet-from-env");

        let config = DispatcherConfig::from_env().expect("config should load from env");

        std::env::remove_var("SUBNET_ID_CONFIG_FROM_ENV");
        std::env::remove_var("VPC_ID");

        assert_eq!(config.vpc_id, "vpc-from-env");
        assert!(config.subnets.contains(&"subnet-from-env".to_string()));
    }

    #[test]
    fn reads_overrides_and_subnets() {
        let config = DispatcherConfig::from_vars(vars(&[
            ("VPC_ID", "vpc-1"),
            ("SUBNET_ID_A", "s-1"),
            ("SECURITY_GROUP_NAME", "etl-tasks"),
            ("ECS_CLUSTER", "etl"),
            ("ECS_TASK_DEFINITION", "etl-family:3"),
            ("ECS_CONTAINER_NAME", "worker"),
            ("SUBNET_ID_B", "s-2"),
        ]))
        .expect("config should load");

        assert_eq!(config.security_group_name, "etl-tasks");
        assert_eq!(config.target.cluster, "etl");
        assert_eq!(config.target.task_definition, "etl-family:3");
        assert_eq!(config.target.container_name, "worker");
        assert_eq!(config.subnets, vec!["s-1".to_string(), "s-2".to_string()]);
    }
}
