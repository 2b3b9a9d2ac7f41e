use serde_json::Value;
use tracing::{debug, error, info, warn};
use visitor_counter_core::config::CounterConfig;
use visitor_counter_core::contract::{ApiGatewayResponse, GatewayEvent, HttpMethod};
use visitor_counter_core::error::StoreError;

use crate::adapters::counter_store::CounterStore;

/// Answers one gateway invocation.
///
/// Never fails: decode and store errors are turned into 500 responses so the
/// caller always receives the CORS headers.
pub fn handle_counter_event(
    event: Value,
    config: &CounterConfig,
    store: &dyn CounterStore,
) -> ApiGatewayResponse {
    let origin = config.allowed_origin.as_str();
    debug!(%event, "received gateway event");

    let event = match serde_json::from_value::<GatewayEvent>(event) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "malformed gateway event");
            return ApiGatewayResponse::internal_failure(origin, &error.to_string());
        }
    };

    let method = event.method();
    let raw_method = event.method_token().unwrap_or_default();
    debug!(?method, raw_method, "dispatching visitor counter request");

    let outcome = match method {
        HttpMethod::Post => store.increment_visits(),
        HttpMethod::Get => store.current_visits().map(|visits| visits.unwrap_or(0)),
        HttpMethod::Other => return ApiGatewayResponse::preflight(origin),
    };
    debug!(raw_method, ?outcome, "store responded");

    match outcome {
        Ok(count) => {
            info!(raw_method, count, "served visitor count");
            ApiGatewayResponse::count(origin, count)
        }
        Err(StoreError::Service { code, message }) => {
            error!(raw_method, %code, %message, "store rejected visitor count request");
            ApiGatewayResponse::store_failure(origin, &message)
        }
        Err(StoreError::Unexpected(details)) => {
            error!(raw_method, %details, "visitor count request failed");
            ApiGatewayResponse::internal_failure(origin, &details)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    struct RecordingStore {
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("poisoned mutex").clone()
        }
    }

    impl CounterStore for RecordingStore {
        fn increment_visits(&self) -> Result<u64, StoreError> {
            self.calls.lock().expect("poisoned mutex").push("increment");
            Ok(7)
        }

        fn current_visits(&self) -> Result<Option<u64>, StoreError> {
            self.calls.lock().expect("poisoned mutex").push("read");
            Ok(None)
        }
    }

    #[test]
    fn post_increments_exactly_once() {
        let store = RecordingStore::new();
        let response = handle_counter_event(
            json!({"requestContext": {"http": {"method": "POST"}}}),
            &CounterConfig::default(),
            &store,
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "{\"count\":7}");
        assert_eq!(store.calls(), vec!["increment"]);
    }

    #[test]
    fn get_reads_without_incrementing() {
        let store = RecordingStore::new();
        let response = handle_counter_event(
            json!({"httpMethod": "GET"}),
            &CounterConfig::default(),
            &store,
        );

        assert_eq!(response.body, "{\"count\":0}");
        assert_eq!(store.calls(), vec!["read"]);
    }

    #[test]
    fn options_never_touches_the_store() {
        let store = RecordingStore::new();
        let response = handle_counter_event(
            json!({"requestContext": {"http": {"method": "OPTIONS"}}}),
            &CounterConfig::default(),
            &store,
        );

        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
        assert!(store.calls().is_empty());
    }

    #[test]
    fn non_string_method_gets_preflight_response() {
        let store = RecordingStore::new();

        for event in [json!({"httpMethod": 5}), json!({"httpMethod": ["GET"]})] {
            let response = handle_counter_event(event, &CounterConfig::default(), &store);

            assert_eq!(response.status_code, 200);
            assert!(response.body.is_empty());
        }
        assert!(store.calls().is_empty());
    }

    #[test]
    fn undecodable_event_is_an_internal_failure() {
        let store = RecordingStore::new();
        let response = handle_counter_event(
            json!("not an event"),
            &CounterConfig::default(),
            &store,
        );

        let body: Value = serde_json::from_str(&response.body).expect("body should parse");
        assert_eq!(response.status_code, 500);
        assert_eq!(body["error"], "An internal server error occurred");
        assert!(store.calls().is_empty());
    }
}
