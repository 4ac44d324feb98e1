//! Rejecting de-duplication of concurrent requests.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use beacon_core::Error;

/// Set of request targets currently being fetched.
///
/// A second caller for a target already in the set is rejected immediately;
/// nothing waits on or shares the first caller's result.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    targets: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `target`, or fail with `Error::DuplicateInFlight` if it is taken.
    ///
    /// The claim is released when the returned guard drops, whatever the outcome.
    pub fn begin(&self, target: &str) -> Result<InFlightGuard, Error> {
        if !self.targets.lock().insert(target.to_string()) {
            return Err(Error::DuplicateInFlight(target.to_string()));
        }
        Ok(InFlightGuard { targets: self.targets.clone(), target: target.to_string() })
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.lock().contains(target)
    }

    pub fn len(&self) -> usize {
        self.targets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its target from the in-flight set on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    targets: Arc<Mutex<HashSet<String>>>,
    target: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.targets.lock().remove(&self.target);
    }
}
