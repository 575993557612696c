use serde::Serialize;
use task_dispatch_core::launch::TaskLaunchRequest;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LaunchFailure {
    pub arn: Option<String>,
    pub reason: Option<String>,
}

/// What the orchestration API reported for a launch. Logged, never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchReceipt {
    pub task_arns: Vec<String>,
    pub failures: Vec<LaunchFailure>,
    pub raw_response: String,
}

pub trait TaskLauncher {
    fn run_task(&self, request: &TaskLaunchRequest) -> Result<LaunchReceipt, String>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn failures_serialize_for_the_launch_log_line() {
        let failures = vec![LaunchFailure {
            arn: None,
            reason: Some("RESOURCE:MEMORY".to_string()),
        }];

        let value = serde_json::to_value(&failures).expect("failures should serialize");
        assert_eq!(value, json!([{"arn": null, "reason": "RESOURCE:MEMORY"}]));
    }
}
