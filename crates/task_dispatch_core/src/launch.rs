use crate::placement::NetworkPlacement;
use crate::trigger::TriggerObject;

pub const DEFAULT_CLUSTER: &str = "Cluster";
pub const DEFAULT_TASK_DEFINITION: &str = "ClusterFamily:1";
pub const DEFAULT_CONTAINER_NAME: &str = "etl-lambda";
pub const BUCKET_ENV_NAME: &str = "S3_BUCKET";
pub const KEY_ENV_NAME: &str = "S3_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// On-demand serverless compute.
    Fargate,
}

impl LaunchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fargate => "FARGATE",
        }
    }
}

/// Where launched tasks run and which container receives the overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    pub cluster: String,
    pub task_definition: String,
    pub container_name: String,
}

impl Default for LaunchTarget {
    fn default() -> Self {
        Self {
            cluster: DEFAULT_CLUSTER.to_string(),
            task_definition: DEFAULT_TASK_DEFINITION.to_string(),
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerOverride {
    pub name: String,
    pub environment: Vec<EnvironmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLaunchRequest {
    pub cluster: String,
    pub task_definition: String,
    pub launch_mode: LaunchMode,
    pub placement: NetworkPlacement,
    pub container_override: ContainerOverride,
}

pub fn build_launch_request(
    target: &LaunchTarget,
    placement: NetworkPlacement,
    trigger: &TriggerObject,
) -> TaskLaunchRequest {
    TaskLaunchRequest {
        cluster: target.cluster.clone(),
        task_definition: target.task_definition.clone(),
        launch_mode: LaunchMode::Fargate,
        placement,
        container_override: ContainerOverride {
            name: target.container_name.clone(),
            environment: vec![
                EnvironmentEntry {
                    name: BUCKET_ENV_NAME.to_string(),
                    value: trigger.bucket.clone(),
                },
                EnvironmentEntry {
                    name: KEY_ENV_NAME.to_string(),
                    value: trigger.key.clone(),
                },
            ],
        },
    }
}
