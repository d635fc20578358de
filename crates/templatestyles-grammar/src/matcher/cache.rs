//! Memoization of named grammar productions.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::Matcher;

/// Build-once storage for matchers keyed by production name.
///
/// The lock is never held while a production is being built, so builders may
/// freely request other productions from the same cache. When two threads
/// build the same production concurrently, the first insert wins and both
/// callers receive that instance.
#[derive(Default)]
pub struct MatcherCache {
    entries: Mutex<HashMap<String, Matcher>>,
}

impl MatcherCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached matcher for `key`, building it with `build` on the
    /// first request.
    pub fn get_or_build<F>(&self, key: &str, build: F) -> Matcher
    where
        F: FnOnce() -> Matcher,
    {
        let cached = self.entries.lock().get(key).cloned();
        if let Some(matcher) = cached {
            return matcher;
        }

        let built = build();
        self.entries
            .lock()
            .entry(key.to_string())
            .or_insert(built)
            .clone()
    }

    /// Whether `key` has been built.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Number of cached productions.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for MatcherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn builds_once() {
        let cache = MatcherCache::new();
        let builds = AtomicUsize::new(0);
        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            Matcher::keyword(["a"])
        };

        let first = cache.get_or_build("a", build);
        let second = cache.get_or_build("a", build);

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Matcher::ptr_eq(&first, &second));
        assert!(cache.contains("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn nested_builds_do_not_deadlock() {
        let cache = MatcherCache::new();
        let outer = cache.get_or_build("outer", || {
            let inner = cache.get_or_build("inner", || Matcher::keyword(["b"]));
            Matcher::optional(inner)
        });

        assert!(cache.contains("inner"));
        assert!(Matcher::ptr_eq(&outer, &cache.get_or_build("outer", Matcher::nothing)));
    }

    #[test]
    fn concurrent_requests_converge() {
        let cache = Arc::new(MatcherCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_build("shared", || Matcher::keyword(["x"])))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for matcher in &results[1..] {
            assert!(Matcher::ptr_eq(&results[0], matcher));
        }
    }
}
