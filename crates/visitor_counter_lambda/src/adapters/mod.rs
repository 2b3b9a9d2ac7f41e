pub mod counter_store;
pub mod dynamodb;
pub mod memory;
