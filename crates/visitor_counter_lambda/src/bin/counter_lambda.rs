use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;
use visitor_counter_core::config::CounterConfig;
use visitor_counter_core::contract::ApiGatewayResponse;
use visitor_counter_lambda::adapters::dynamodb::DynamoDbCounterStore;
use visitor_counter_lambda::handlers::counter::handle_counter_event;

fn init_tracing() {
    // CloudWatch stamps every line already.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &CounterConfig,
    store: &DynamoDbCounterStore,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_counter_event(event.payload, config, store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = CounterConfig::from_env();
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::disabled())
        .load()
        .await;
    let store =
        DynamoDbCounterStore::from_config(aws_sdk_dynamodb::Client::new(&aws_config), &config);
    info!(
        table = store.table_name(),
        region = %config.region,
        "visitor counter ready"
    );

    let config = &config;
    let store = &store;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, config, store).await
    }))
    .await
}
