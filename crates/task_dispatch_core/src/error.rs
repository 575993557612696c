use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("malformed trigger event: {0}")]
    MalformedTrigger(String),

    #[error("{0} must be configured")]
    MissingConfiguration(&'static str),

    #[error("no security group named '{group_name}' in vpc '{vpc_id}'")]
    SecurityGroupNotFound { vpc_id: String, group_name: String },

    #[error("security group lookup failed: {0}")]
    SecurityGroupLookup(String),

    #[error("task launch failed: {0}")]
    TaskLaunch(String),
}

impl DispatchError {
    /// Stable identifier used in structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedTrigger(_) => "malformed_trigger",
            Self::MissingConfiguration(_) => "misconfiguration",
            Self::SecurityGroupNotFound { .. } => "security_group_not_found",
            Self::SecurityGroupLookup(_) => "security_group_lookup_failed",
            Self::TaskLaunch(_) => "task_launch_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_names_the_key() {
        let error = DispatchError::MissingConfiguration("VPC_ID");
        assert_eq!(error.to_string(), "VPC_ID must be configured");
        assert_eq!(error.code(), "misconfiguration");
    }

    #[test]
    fn lookup_miss_reports_vpc_and_group() {
        let error = DispatchError::SecurityGroupNotFound {
            vpc_id: "vpc-1".to_string(),
            group_name: "default".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "no security group named 'default' in vpc 'vpc-1'"
        );
    }
}
