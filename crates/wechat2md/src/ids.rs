//! Identifier sources for conversion ids and image filenames.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out fresh, collision-free tokens. Shared by concurrent conversions.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... for reproducible output
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_uuid_source_is_unique() {
        let ids = UuidSource;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("img");
        assert_eq!(ids.next_id(), "img-1");
        assert_eq!(ids.next_id(), "img-2");
    }

    #[test]
    fn test_sequential_ids_across_threads() {
        let ids = Arc::new(SequentialIds::new("t"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..50).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let all: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(all.len(), 200);
    }
}
