use aws_sdk_ec2::types::Filter;
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, KeyValuePair, LaunchType,
    NetworkConfiguration, TaskOverride,
};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use task_dispatch_core::config::DispatcherConfig;
use task_dispatch_core::launch::{LaunchMode, TaskLaunchRequest};
use task_dispatch_core::placement::SecurityGroupFilter;
use task_dispatch_core::response::DispatchResponse;
use task_dispatch_lambda::adapters::network::SecurityGroupDirectory;
use task_dispatch_lambda::adapters::orchestrator::{LaunchFailure, LaunchReceipt, TaskLauncher};
use task_dispatch_lambda::handlers::dispatch::handle_trigger_event;
use task_dispatch_lambda::logging::init_logging;

struct Ec2SecurityGroupDirectory {
    ec2_client: aws_sdk_ec2::Client,
}

impl SecurityGroupDirectory for Ec2SecurityGroupDirectory {
    fn security_group_ids(&self, filter: &SecurityGroupFilter) -> Result<Vec<String>, String> {
        let filters: Vec<Filter> = filter
            .api_filters()
            .into_iter()
            .map(|(name, values)| Filter::builder().name(name).set_values(Some(values)).build())
            .collect();
        let client = self.ec2_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .describe_security_groups()
                    .set_filters(Some(filters))
                    .send()
                    .await
                    .map(|output| {
                        output
                            .security_groups()
                            .iter()
                            .filter_map(|group| group.group_id().map(str::to_string))
                            .collect::<Vec<String>>()
                    })
                    .map_err(|error| format!("failed to describe security groups: {error}"))
            })
        })
    }
}

struct EcsTaskLauncher {
    ecs_client: aws_sdk_ecs::Client,
}

impl TaskLauncher for EcsTaskLauncher {
    fn run_task(&self, request: &TaskLaunchRequest) -> Result<LaunchReceipt, String> {
        let vpc_configuration = AwsVpcConfiguration::builder()
            .set_subnets(Some(request.placement.subnets.clone()))
            .set_security_groups(Some(request.placement.security_groups.clone()))
            .assign_public_ip(if request.placement.assign_public_ip {
                AssignPublicIp::Enabled
            } else {
                AssignPublicIp::Disabled
            })
            .build()
            .map_err(|error| format!("invalid awsvpc configuration: {error}"))?;

        let environment = request
            .container_override
            .environment
            .iter()
            .map(|entry| {
                KeyValuePair::builder()
                    .name(&entry.name)
                    .value(&entry.value)
                    .build()
            })
            .collect();
        let overrides = TaskOverride::builder()
            .container_overrides(
                ContainerOverride::builder()
                    .name(&request.container_override.name)
                    .set_environment(Some(environment))
                    .build(),
            )
            .build();

        let launch_type = match request.launch_mode {
            LaunchMode::Fargate => LaunchType::Fargate,
        };
        let cluster = request.cluster.clone();
        let task_definition = request.task_definition.clone();
        let client = self.ecs_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .run_task()
                    .cluster(cluster)
                    .task_definition(task_definition)
                    .launch_type(launch_type)
                    .network_configuration(
                        NetworkConfiguration::builder()
                            .awsvpc_configuration(vpc_configuration)
                            .build(),
                    )
                    .overrides(overrides)
                    .send()
                    .await
                    .map(|output| LaunchReceipt {
                        task_arns: output
                            .tasks()
                            .iter()
                            .filter_map(|task| task.task_arn().map(str::to_string))
                            .collect(),
                        failures: output
                            .failures()
                            .iter()
                            .map(|failure| LaunchFailure {
                                arn: failure.arn().map(str::to_string),
                                reason: failure.reason().map(str::to_string),
                            })
                            .collect(),
                        raw_response: format!("{output:?}"),
                    })
                    .map_err(|error| format!("failed to run ecs task: {error}"))
            })
        })
    }
}

/// Clients are built once per process and reused by every invocation.
struct RuntimeDependencies {
    directory: Ec2SecurityGroupDirectory,
    launcher: EcsTaskLauncher,
}

async fn handle_request(
    deps: &RuntimeDependencies,
    event: LambdaEvent<Value>,
) -> Result<DispatchResponse, Error> {
    let config = DispatcherConfig::from_env()?;
    let response = handle_trigger_event(event.payload, &config, &deps.directory, &deps.launcher)?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        directory: Ec2SecurityGroupDirectory {
            ec2_client: aws_sdk_ec2::Client::new(&aws_config),
        },
        launcher: EcsTaskLauncher {
            ecs_client: aws_sdk_ecs::Client::new(&aws_config),
        },
    };
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(deps, event).await
    }))
    .await
}
