use serde_json::{json, Value};
use task_dispatch_core::config::DispatcherConfig;
use task_dispatch_core::error::DispatchError;
use task_dispatch_core::launch::build_launch_request;
use task_dispatch_core::placement::{select_security_group, NetworkPlacement, SecurityGroupFilter};
use task_dispatch_core::response::DispatchResponse;
use task_dispatch_core::trigger::parse_trigger;

use crate::adapters::network::SecurityGroupDirectory;
use crate::adapters::orchestrator::TaskLauncher;
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "dispatch_handler";

pub fn resolve_security_group_id(
    directory: &dyn SecurityGroupDirectory,
    vpc_id: &str,
    group_name: &str,
) -> Result<String, DispatchError> {
    let filter = SecurityGroupFilter::new(vpc_id, group_name);
    let ids = directory
        .security_group_ids(&filter)
        .map_err(DispatchError::SecurityGroupLookup)?;
    select_security_group(&filter, ids)
}

/// Launches one task for the first record of a storage notification.
///
/// Every failure is returned to the caller untouched; nothing is retried.
pub fn handle_trigger_event(
    event: Value,
    config: &DispatcherConfig,
    directory: &dyn SecurityGroupDirectory,
    launcher: &dyn TaskLauncher,
) -> Result<DispatchResponse, DispatchError> {
    log_info(COMPONENT, "trigger_received", event.clone());

    dispatch(&event, config, directory, launcher).inspect_err(|error| {
        log_error(
            COMPONENT,
            "dispatch_failed",
            json!({
                "error": error.code(),
                "message": error.to_string(),
            }),
        );
    })
}

fn dispatch(
    event: &Value,
    config: &DispatcherConfig,
    directory: &dyn SecurityGroupDirectory,
    launcher: &dyn TaskLauncher,
) -> Result<DispatchResponse, DispatchError> {
    let trigger = parse_trigger(event)?;

    let security_group_id =
        resolve_security_group_id(directory, &config.vpc_id, &config.security_group_name)?;
    log_info(
        COMPONENT,
        "security_group_resolved",
        json!({
            "vpc_id": config.vpc_id.clone(),
            "group_name": config.security_group_name.clone(),
            "security_group_id": security_group_id.clone(),
        }),
    );

    let placement = NetworkPlacement::new(config.subnets.clone(), security_group_id);
    let request = build_launch_request(&config.target, placement, &trigger);
    let receipt = launcher
        .run_task(&request)
        .map_err(DispatchError::TaskLaunch)?;

    log_info(
        COMPONENT,
        "task_launch_submitted",
        json!({
            "cluster": request.cluster,
            "task_definition": request.task_definition,
            "bucket": trigger.bucket,
            "key": trigger.key,
            "task_arns": receipt.task_arns,
            "failures": receipt.failures,
            "response": receipt.raw_response,
        }),
    );

    Ok(DispatchResponse::task_started())
}
