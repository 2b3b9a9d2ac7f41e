use visitor_counter_core::error::StoreError;

/// Storage seam for the single counter record.
pub trait CounterStore {
    /// Atomically adds one to the stored count, creating the record at zero
    /// first when it does not exist, and returns the updated value.
    fn increment_visits(&self) -> Result<u64, StoreError>;

    /// Reads the stored count without mutating anything. `None` means the
    /// record or its count attribute is absent.
    fn current_visits(&self) -> Result<Option<u64>, StoreError>;
}
