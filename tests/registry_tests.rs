//! Config registry tests
//!
//! Tests for name uniqueness, identity lookups and concurrent
//! create-if-absent behavior.

use kvconf::{ConfigRegistry, KvconfError, ValueStore};
use std::sync::{Arc, Barrier};

#[cfg(test)]
mod registry_lookup_tests {
    use super::*;

    #[test]
    fn test_get_or_create_returns_identical_store() {
        let registry = ConfigRegistry::new();
        let first = registry.get_or_create("x");
        first.put("k", "v").unwrap();

        let second = registry.get_or_create("x");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.get_string("k").unwrap(), "v");
    }

    #[test]
    fn test_register_on_existing_name_fails() {
        let registry = ConfigRegistry::new();
        registry.get_or_create("x");

        let result = registry.register(Arc::new(ValueStore::new("x")));
        assert!(matches!(result, Err(KvconfError::DuplicateName { ref name }) if name == "x"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registered_frozen_store_is_returned_by_lookup() {
        let registry = ConfigRegistry::new();
        let store = Arc::new(ValueStore::new("frozen"));
        store.put("a", 1).unwrap();
        let frozen = registry.register(store.freeze()).unwrap();

        let found = registry.get_or_create("frozen");
        assert!(Arc::ptr_eq(&frozen, &found));
        assert!(found.is_frozen());
        assert!(!registry.contains_store(&store));
    }

    #[test]
    fn test_independent_registries() {
        let a = ConfigRegistry::new();
        let b = ConfigRegistry::new();
        a.get_or_create("only-a");

        assert!(a.contains("only-a"));
        assert!(!b.contains("only-a"));
        assert!(b.get("only-a").is_none());
        assert!(b.is_empty());
    }

    #[test]
    fn test_names_sorted() {
        let registry = ConfigRegistry::new();
        for name in ["login", "app", "db"] {
            registry.get_or_create(name);
        }
        assert_eq!(registry.names(), vec!["app", "db", "login"]);
    }
}

#[cfg(test)]
mod registry_concurrency_tests {
    use super::*;

    #[test]
    fn test_concurrent_get_or_create_creates_one_store() {
        const THREADS: usize = 16;
        let registry = ConfigRegistry::new();
        let barrier = Barrier::new(THREADS);

        let stores: Vec<Arc<ValueStore>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|i| {
                    let registry = &registry;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        let store = registry.get_or_create("shared");
                        store.put(format!("writer-{i}"), true).unwrap();
                        store
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = &stores[0];
        assert!(stores.iter().all(|s| Arc::ptr_eq(s, first)));
        assert_eq!(first.len(), THREADS);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_register_admits_one() {
        const THREADS: usize = 8;
        let registry = ConfigRegistry::new();
        let barrier = Barrier::new(THREADS);

        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    let registry = &registry;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        registry.register(Arc::new(ValueStore::new("race"))).is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| usize::from(h.join().unwrap()))
                .sum()
        });

        assert_eq!(successes, 1);
    }
}
