use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use visitor_counter_core::config::CounterConfig;
use visitor_counter_core::error::StoreError;

use crate::adapters::counter_store::CounterStore;

pub const KEY_ATTRIBUTE: &str = "id";
pub const VISITS_ATTRIBUTE: &str = "visits";

const INCREMENT_EXPRESSION: &str = "SET #visits = if_not_exists(#visits, :zero) + :increment";
pub const UNKNOWN_ERROR_CODE: &str = "UnknownCode";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown DynamoDB error";

/// Counter store backed by a single DynamoDB item.
///
/// The client is expected to be built once per process and cloned in; the
/// SDK client is a cheap handle around shared connection state.
#[derive(Debug, Clone)]
pub struct DynamoDbCounterStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
    counter_key: String,
}

impl DynamoDbCounterStore {
    pub fn new(
        client: aws_sdk_dynamodb::Client,
        table_name: impl Into<String>,
        counter_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            counter_key: counter_key.into(),
        }
    }

    pub fn from_config(client: aws_sdk_dynamodb::Client, config: &CounterConfig) -> Self {
        Self::new(client, &config.table_name, &config.counter_key)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key(&self) -> AttributeValue {
        AttributeValue::S(self.counter_key.clone())
    }

    async fn increment_visits_async(&self) -> Result<u64, StoreError> {
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, self.key())
            .update_expression(INCREMENT_EXPRESSION)
            .expression_attribute_names("#visits", VISITS_ATTRIBUTE)
            .expression_attribute_values(":zero", AttributeValue::N("0".to_string()))
            .expression_attribute_values(":increment", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(store_error_from_sdk)?;

        visits_from_item(output.attributes())?.ok_or_else(|| {
            StoreError::unexpected(format!(
                "update on `{}` did not return the `{VISITS_ATTRIBUTE}` attribute",
                self.table_name
            ))
        })
    }

    async fn current_visits_async(&self) -> Result<Option<u64>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, self.key())
            .consistent_read(true)
            .send()
            .await
            .map_err(store_error_from_sdk)?;

        visits_from_item(output.item())
    }
}

impl CounterStore for DynamoDbCounterStore {
    fn increment_visits(&self) -> Result<u64, StoreError> {
        block_on_store(self.increment_visits_async())
    }

    fn current_visits(&self) -> Result<Option<u64>, StoreError> {
        block_on_store(self.current_visits_async())
    }
}

fn block_on_store<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits SDK failures into the two error tiers: anything the service itself
/// answered with becomes `Service`, everything else is `Unexpected`.
pub fn store_error_from_sdk<E, R>(error: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match error.as_service_error() {
        Some(service_error) => StoreError::service(
            service_error.code().unwrap_or(UNKNOWN_ERROR_CODE),
            service_error.message().unwrap_or(UNKNOWN_ERROR_MESSAGE),
        ),
        None => StoreError::unexpected(DisplayErrorContext(&error).to_string()),
    }
}

pub fn visits_from_item(
    item: Option<&HashMap<String, AttributeValue>>,
) -> Result<Option<u64>, StoreError> {
    let Some(value) = item.and_then(|attributes| attributes.get(VISITS_ATTRIBUTE)) else {
        return Ok(None);
    };

    let raw = value.as_n().map_err(|other| {
        StoreError::unexpected(format!(
            "`{VISITS_ATTRIBUTE}` attribute is not a number: {other:?}"
        ))
    })?;

    raw.parse::<u64>().map(Some).map_err(|error| {
        StoreError::unexpected(format!(
            "`{VISITS_ATTRIBUTE}` attribute `{raw}` is not a non-negative integer: {error}"
        ))
    })
}
