//! Result type for operations whose failures are absorbed locally.

use crate::store::StoreError;

/// Outcome of a best-effort store operation.
///
/// `Degraded` carries the fallback value the caller should use together with
/// the error that was absorbed, so soft failures stay visible at call sites.
#[must_use]
#[derive(Debug)]
pub enum BestEffort<T> {
    Done(T),
    Degraded { value: T, error: StoreError },
}

impl<T> BestEffort<T> {
    /// Build from a store result, substituting `fallback` on failure.
    ///
    /// Logs the absorbed error at `warn` with the given operation name.
    pub fn from_result(result: Result<T, StoreError>, fallback: T, operation: &str) -> Self {
        match result {
            Ok(value) => Self::Done(value),
            Err(error) => {
                tracing::warn!("{} failed, continuing without it: {}", operation, error);
                Self::Degraded {
                    value: fallback,
                    error,
                }
            }
        }
    }

    /// Consume and return the value or its fallback.
    pub fn into_value(self) -> T {
        match self {
            Self::Done(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub const fn value(&self) -> &T {
        match self {
            Self::Done(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub const fn error(&self) -> Option<&StoreError> {
        match self {
            Self::Done(_) => None,
            Self::Degraded { error, .. } => Some(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BestEffort<U> {
        match self {
            Self::Done(value) => BestEffort::Done(f(value)),
            Self::Degraded { value, error } => BestEffort::Degraded {
                value: f(value),
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_keeps_fallback_and_error() {
        let outcome = BestEffort::from_result(
            Err(StoreError::Unavailable("offline".to_string())),
            false,
            "read",
        );
        assert!(outcome.is_degraded());
        assert!(outcome.error().is_some());
        assert!(!outcome.into_value());
    }

    #[test]
    fn map_preserves_degradation() {
        let outcome: BestEffort<Vec<i32>> = BestEffort::from_result(Ok(vec![1, 2]), vec![], "read");
        let mapped = outcome.map(|values| values.len());
        assert!(!mapped.is_degraded());
        assert_eq!(*mapped.value(), 2);
    }
}
