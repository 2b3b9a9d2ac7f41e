use std::sync::{Mutex, MutexGuard};

use visitor_counter_core::error::StoreError;

use crate::adapters::counter_store::CounterStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Increment,
    Read,
}

/// Process-local counter store for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    visits: Mutex<Option<u64>>,
    failure: Mutex<Option<(StoreOperation, StoreError)>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visits(visits: u64) -> Self {
        Self {
            visits: Mutex::new(Some(visits)),
            failure: Mutex::new(None),
        }
    }

    /// Makes every later call of `operation` fail with `error`.
    pub fn fail_on(self, operation: StoreOperation, error: StoreError) -> Self {
        Self {
            failure: Mutex::new(Some((operation, error))),
            ..self
        }
    }

    /// Stored count, `None` while the record has never been created.
    pub fn visits(&self) -> Option<u64> {
        *lock_ignoring_poison(&self.visits)
    }

    fn injected_failure(&self, operation: StoreOperation) -> Result<(), StoreError> {
        match lock_ignoring_poison(&self.failure).as_ref() {
            Some((failing, error)) if *failing == operation => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl CounterStore for InMemoryCounterStore {
    fn increment_visits(&self) -> Result<u64, StoreError> {
        self.injected_failure(StoreOperation::Increment)?;

        let mut visits = lock_ignoring_poison(&self.visits);
        let current = visits.unwrap_or(0);
        let updated = current
            .checked_add(1)
            .ok_or_else(|| StoreError::unexpected("visit count overflowed"))?;
        *visits = Some(updated);
        Ok(updated)
    }

    fn current_visits(&self) -> Result<Option<u64>, StoreError> {
        self.injected_failure(StoreOperation::Read)?;
        Ok(*lock_ignoring_poison(&self.visits))
    }
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_from_absent_record() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.current_visits(), Ok(None));
        assert_eq!(store.increment_visits(), Ok(1));
        assert_eq!(store.increment_visits(), Ok(2));
        assert_eq!(store.visits(), Some(2));
    }

    #[test]
    fn injected_failure_only_hits_chosen_operation() {
        let store = InMemoryCounterStore::with_visits(5).fail_on(
            StoreOperation::Increment,
            StoreError::service("ConditionalCheckFailedException", "condition failed"),
        );

        assert!(store.increment_visits().is_err());
        assert_eq!(store.current_visits(), Ok(Some(5)));
    }
}
