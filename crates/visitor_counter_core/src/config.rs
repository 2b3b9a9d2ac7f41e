pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TABLE_NAME: &str = "ResumeVisitorCounter";
pub const ALLOWED_ORIGIN: &str = "https://resumejamesyoum.com";
pub const COUNTER_KEY: &str = "visitor_count";

pub const REGION_ENV: &str = "AWS_REGION";
pub const TABLE_NAME_ENV: &str = "DYNAMODB_TABLE_NAME";

/// Settings resolved once at process start.
///
/// Only the region and table name can be overridden from the environment;
/// the origin and record key are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterConfig {
    pub region: String,
    pub table_name: String,
    pub allowed_origin: String,
    pub counter_key: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            allowed_origin: ALLOWED_ORIGIN.to_string(),
            counter_key: COUNTER_KEY.to_string(),
        }
    }
}

impl CounterConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            region: non_blank(lookup(REGION_ENV)).unwrap_or(defaults.region),
            table_name: non_blank(lookup(TABLE_NAME_ENV)).unwrap_or(defaults.table_name),
            ..defaults
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
