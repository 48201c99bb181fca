//! Integration tests for load and search caching.
//!
//! A counting loader verifies how many times file content actually
//! reaches a parser, which is the observable effect of the caches.

mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::ConfigTree;
use figtree::{Loader, LoaderError, LoaderRegistry};
use serde_json::{json, Value};

struct CountingLoader(Arc<AtomicUsize>);

impl Loader for CountingLoader {
    fn load(&self, _path: &Path, content: &str) -> Result<Value, LoaderError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        serde_json::from_str(content).map_err(LoaderError::new)
    }
}

fn counting_registry() -> (LoaderRegistry, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let registry = LoaderRegistry::defaults()
        .with_loader("json", Arc::new(CountingLoader(Arc::clone(&count))));
    (registry, count)
}

#[test]
fn test_sync_load_is_cached() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"v": 1}"#);
    let (registry, count) = counting_registry();

    let explorer = tree
        .builder("app")
        .with_loaders(registry)
        .build_sync()
        .unwrap();

    for _ in 0..3 {
        let found = explorer.load(&file).unwrap().unwrap();
        assert_eq!(found.config, json!({"v": 1}));
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sync_load_cache_disabled() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"v": 1}"#);
    let (registry, count) = counting_registry();

    let explorer = tree
        .builder("app")
        .with_loaders(registry)
        .with_cache(false)
        .build_sync()
        .unwrap();

    explorer.load(&file).unwrap();
    explorer.load(&file).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_sync_search_caches_per_directory() {
    let tree = ConfigTree::new();
    tree.write("project/.apprc.json", r#"{"v": 1}"#);
    let project = tree.path("project");
    let (registry, count) = counting_registry();

    let explorer = tree
        .builder("app")
        .with_loaders(registry)
        .build_sync()
        .unwrap();

    explorer.search(&project).unwrap().unwrap();
    explorer.search(&project).unwrap().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sync_errors_are_cached_too() {
    let tree = ConfigTree::new();
    let file = tree.write("bad.json", "{oops");
    let (registry, count) = counting_registry();

    let explorer = tree
        .builder("app")
        .with_loaders(registry)
        .build_sync()
        .unwrap();

    assert!(explorer.load(&file).is_err());
    assert!(explorer.load(&file).is_err());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_load_cache_reparses() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"v": 1}"#);
    let (registry, count) = counting_registry();

    let explorer = tree
        .builder("app")
        .with_loaders(registry)
        .build_sync()
        .unwrap();

    explorer.load(&file).unwrap();
    explorer.clear_load_cache();
    explorer.load(&file).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_async_load_is_cached() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"v": 1}"#);
    let (registry, count) = counting_registry();

    let explorer = tree.builder("app").with_loaders(registry).build().unwrap();

    for _ in 0..3 {
        explorer.load(&file).await.unwrap().unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_async_concurrent_loads_coalesce() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"v": 1}"#);
    let (registry, count) = counting_registry();

    let explorer = tree.builder("app").with_loaders(registry).build().unwrap();

    let (a, b, c) = tokio::join!(
        explorer.load(&file),
        explorer.load(&file),
        explorer.load(&file),
    );
    assert_eq!(a.unwrap(), b.unwrap());
    assert!(c.is_ok());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_async_concurrent_searches_coalesce() {
    let tree = ConfigTree::new();
    tree.write("project/.apprc.json", r#"{"v": 1}"#);
    let project = tree.path("project");
    let (registry, count) = counting_registry();

    let explorer = tree.builder("app").with_loaders(registry).build().unwrap();

    let (a, b) = tokio::join!(explorer.search(&project), explorer.search(&project));
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_async_clear_caches_reparses() {
    let tree = ConfigTree::new();
    let file = tree.write("conf.json", r#"{"v": 1}"#);
    let (registry, count) = counting_registry();

    let explorer = tree.builder("app").with_loaders(registry).build().unwrap();

    explorer.load(&file).await.unwrap();
    explorer.clear_caches();
    explorer.load(&file).await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
