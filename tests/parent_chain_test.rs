//! 父容器链的集成测试

use inject::{implements, interface, InjectError, Injector, InjectorConfig, TypeKey};
use std::sync::Arc;
use std::thread;

trait Transport: Send + Sync {
    fn scheme(&self) -> &'static str;
}

interface!(Transport);

struct Http;
impl Transport for Http {
    fn scheme(&self) -> &'static str {
        "http"
    }
}

struct Grpc;
impl Transport for Grpc {
    fn scheme(&self) -> &'static str {
        "grpc"
    }
}

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
    implements!(Http => dyn Transport);
    implements!(Grpc => dyn Transport);
}

fn named(name: &str) -> Injector {
    Injector::with_config(InjectorConfig::named(name))
}

#[test]
fn test_child_shadows_parent() {
    init();
    let parent = Arc::new(named("root"));
    parent.map("parent value".to_string()).map(1u8);

    let child = Injector::child_of(parent.clone());
    child.map("child value".to_string());

    assert_eq!(child.resolve::<String>().unwrap(), "child value");
    assert_eq!(child.resolve::<u8>().unwrap(), 1);
    assert_eq!(parent.resolve::<String>().unwrap(), "parent value");
    assert_eq!(child.name(), "root/child");
}

#[test]
fn test_lookup_walks_several_levels() {
    init();
    let root = Arc::new(named("root"));
    root.map(99u64);
    let middle = Arc::new(Injector::child_of(root));
    let leaf = Injector::child_of(middle);

    assert_eq!(leaf.resolve::<u64>().unwrap(), 99);
    assert!(leaf.get(&TypeKey::of::<u32>()).unwrap().is_none());
    assert_eq!(leaf.stats().parent_hits, 1);
}

#[test]
fn test_ambiguity_in_ancestor_surfaces() {
    init();
    let root = Arc::new(named("root"));
    root.map(Http).map(Grpc);
    let child = Injector::child_of(root);

    let err = child.get(&TypeKey::interface::<dyn Transport>()).unwrap_err();
    match err {
        InjectError::Ambiguous { scope, candidates, .. } => {
            assert_eq!(scope, "root");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    let stats = child.stats();
    assert_eq!(stats.lookups, 1);
    assert_eq!(stats.ambiguities, 1);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_unique_local_implementor_wins_over_ambiguous_parent() {
    init();
    let root = Arc::new(named("root"));
    root.map(Http).map(Grpc);
    let child = Injector::child_of(root);
    child.map(Grpc);

    let transport = child.resolve::<Arc<dyn Transport>>().unwrap();
    assert_eq!(transport.scheme(), "grpc");
}

#[test]
fn test_unique_parent_implementor_wins_over_local_ambiguity() {
    init();
    let root = Arc::new(named("root"));
    root.map(Http);
    let child = Injector::child_of(root);
    child.map(Arc::new(Http)).map(Grpc);

    let transport = child.resolve::<Arc<dyn Transport>>().unwrap();
    assert_eq!(transport.scheme(), "http");
}

#[test]
fn test_set_parent_replaces_previous() {
    init();
    let first = Arc::new(named("first"));
    first.map(1i32);
    let second = Arc::new(named("second"));
    second.map(2i32);

    let child = named("child");
    child.set_parent(first);
    assert_eq!(child.resolve::<i32>().unwrap(), 1);

    child.set_parent(second);
    assert_eq!(child.resolve::<i32>().unwrap(), 2);
}

#[test]
fn test_shared_parent_across_threads() {
    init();
    let root = Arc::new(named("root"));
    root.map("shared".to_string());

    let handles: Vec<_> = (0..4u32)
        .map(|index| {
            let root = root.clone();
            thread::spawn(move || {
                let child = Injector::child_of(root);
                child.map(index);
                let (shared, own) = child.invoke(|s: String, n: u32| (s, n)).unwrap();
                assert_eq!(shared, "shared");
                own
            })
        })
        .collect();

    let mut seen: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    seen.sort();
    assert_eq!(seen, vec![0, 1, 2, 3]);
    assert_eq!(root.stats().local_hits, 4);
}
