use serde::Serialize;

pub const TASK_STARTED_MESSAGE: &str = "ECS task started successfully";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DispatchResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl DispatchResponse {
    /// Returned once the launch call has been issued, whatever it reported.
    pub fn task_started() -> Self {
        Self {
            status_code: 200,
            body: serde_json::Value::from(TASK_STARTED_MESSAGE).to_string(),
        }
    }
}
