use std::collections::HashSet;
use std::sync::Mutex;

/// Set of case-folded titles accepted during one run.
///
/// Shared by every worker; the lock is only held for the check-and-insert,
/// never across a fetch.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen: Mutex<HashSet<String>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a title (ignoring case) is offered, false afterwards
    pub fn try_accept(&self, title: &str) -> bool {
        let key = title.to_lowercase();
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if seen.contains(&key) {
            ::log::trace!("Skipping duplicate title: {}", title);
            return false;
        }
        seen.insert(key);
        true
    }

    /// Number of distinct titles accepted so far
    pub fn len(&self) -> usize {
        match self.seen.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
