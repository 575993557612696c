use crate::error::DispatchError;

pub const SUBNET_ENV_PREFIX: &str = "SUBNET_ID";
pub const DEFAULT_SECURITY_GROUP_NAME: &str = "default";

/// Network settings for a launched task. Derived per invocation, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPlacement {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: bool,
}

impl NetworkPlacement {
    pub fn new(subnets: Vec<String>, security_group_id: String) -> Self {
        Self {
            subnets,
            security_groups: vec![security_group_id],
            assign_public_ip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupFilter {
    pub vpc_id: String,
    pub group_name: String,
}

impl SecurityGroupFilter {
    pub fn new(vpc_id: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            vpc_id: vpc_id.into(),
            group_name: group_name.into(),
        }
    }

    /// Name/values pairs in the shape the networking API filters on.
    pub fn api_filters(&self) -> [(&'static str, Vec<String>); 2] {
        [
            ("vpc-id", vec![self.vpc_id.clone()]),
            ("group-name", vec![self.group_name.clone()]),
        ]
    }
}

/// Values of every entry whose key starts with `SUBNET_ID`, in input order.
pub fn collect_subnets<I, K, V>(vars: I) -> Vec<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    vars.into_iter()
        .filter(|(key, _)| key.as_ref().starts_with(SUBNET_ENV_PREFIX))
        .map(|(_, value)| value.into())
        .collect()
}

/// Takes the first matching group; more than one match is not an error.
pub fn select_security_group(
    filter: &SecurityGroupFilter,
    ids: Vec<String>,
) -> Result<String, DispatchError> {
    ids.into_iter()
        .next()
        .ok_or_else(|| DispatchError::SecurityGroupNotFound {
            vpc_id: filter.vpc_id.clone(),
            group_name: filter.group_name.clone(),
        })
}
