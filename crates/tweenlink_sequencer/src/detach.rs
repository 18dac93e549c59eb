// SPDX-License-Identifier: MIT OR Apache-2.0
//! Detach callbacks returned by attachments.

use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Zero-argument cleanup callback handed back to the host on attach.
///
/// Returns `Ok(true)` when it undid something and `Ok(false)` when there was
/// nothing left to undo, so calling it repeatedly is safe.
#[derive(Clone)]
pub struct Detach {
    callback: Arc<dyn Fn() -> Result<bool> + Send + Sync>,
}

impl Detach {
    /// Wrap a cleanup closure
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// A detach callback that does nothing
    pub fn noop() -> Self {
        Self::new(|| Ok(false))
    }

    /// Run every callback in order; stops at the first error
    pub fn combine(detaches: Vec<Detach>) -> Self {
        Self::new(move || {
            let mut any = false;
            for detach in &detaches {
                any |= detach.call()?;
            }
            Ok(any)
        })
    }

    /// Run the cleanup
    pub fn call(&self) -> Result<bool> {
        (self.callback)()
    }
}

impl fmt::Debug for Detach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detach").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, TweenError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_combine_runs_all() {
        let calls = Arc::new(AtomicUsize::new(0));
        let make = |result: bool| {
            let calls = calls.clone();
            Detach::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(result)
            })
        };

        let combined = Detach::combine(vec![make(false), make(true), Detach::noop()]);
        assert!(combined.call().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_combine_stops_at_first_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = || {
            let calls = calls.clone();
            Detach::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            })
        };
        let failing = Detach::new(|| {
            Err(TweenError::Engine(EngineError::Rejected("gone".into())))
        });

        let combined = Detach::combine(vec![counting(), failing, counting()]);
        let err = combined.call().unwrap_err();
        assert!(matches!(err, TweenError::Engine(EngineError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop() {
        assert!(!Detach::noop().call().unwrap());
        assert!(!Detach::combine(Vec::new()).call().unwrap());
    }
}
