use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cooperative stop signal for a running fit.
///
/// Clones share the same flag, so one clone can be handed to the fit and
/// another kept to call [`CancellationToken::cancel`] from elsewhere. An
/// optional deadline makes the token cancel itself once it has passed.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing interrupt flag.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            cancelled: flag,
            deadline: None,
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Default::default(),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[test]
fn test_cancel_is_shared_between_clones() {
    let token = CancellationToken::new();
    let handle = token.clone();
    assert!(!token.is_cancelled());
    handle.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn test_deadline() {
    assert!(CancellationToken::with_deadline(Instant::now()).is_cancelled());
    assert!(!CancellationToken::with_timeout(Duration::from_secs(3600)).is_cancelled());
}

#[test]
fn test_from_flag() {
    let flag = Arc::new(AtomicBool::new(false));
    let token = CancellationToken::from_flag(flag.clone());
    flag.store(true, Ordering::Relaxed);
    assert!(token.is_cancelled());
}
