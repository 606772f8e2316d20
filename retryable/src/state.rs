/// Where an operation sits in `Idle -> Loading -> {Success, Failure}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// The mutable record behind one operation handle.
///
/// `data` survives later failures: after a success followed by a failed
/// invocation both `data` and `error` are set. `attempt` is only non-zero
/// while `loading` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T, E> {
    pub loading: bool,
    pub error: Option<E>,
    pub data: Option<T>,
    pub attempt: u32,
}

impl<T, E> Default for OperationState<T, E> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
            attempt: 0,
        }
    }
}

impl<T, E> OperationState<T, E> {
    pub fn phase(&self) -> OperationPhase {
        if self.loading {
            OperationPhase::Loading
        } else if self.error.is_some() {
            OperationPhase::Failure
        } else if self.data.is_some() {
            OperationPhase::Success
        } else {
            OperationPhase::Idle
        }
    }

    /// True while a failed attempt is waiting to be retried or is being
    /// retried.
    pub fn is_retrying(&self) -> bool {
        self.loading && self.attempt > 0
    }
}
