use super::*;
use std::sync::Arc;

#[test]
fn get_or_load_dedups_by_name_while_a_handle_is_alive() {
    let mut cache: ResourceCache<String> = ResourceCache::new();
    let mut loads = 0;
    let a = cache.get_or_load("shader.vert", || { loads += 1; Ok("a".to_string()) }).unwrap();
    let b = cache.get_or_load("shader.vert", || { loads += 1; Ok("b".to_string()) }).unwrap();
    assert_eq!(loads, 1);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn dropping_every_handle_allows_a_fresh_load() {
    let mut cache: ResourceCache<String> = ResourceCache::new();
    let mut loads = 0;
    {
        let _a = cache.get_or_load("tex.png", || { loads += 1; Ok("a".to_string()) }).unwrap();
    }
    cache.sweep();
    assert!(cache.is_empty());
    let _b = cache.get_or_load("tex.png", || { loads += 1; Ok("b".to_string()) }).unwrap();
    assert_eq!(loads, 2);
}

#[test]
fn load_fresh_never_touches_the_cache() {
    let cache: ResourceCache<String> = ResourceCache::new();
    let a = cache.load_fresh(|| Ok("a".to_string())).unwrap();
    assert_eq!(*a, "a");
    assert!(cache.is_empty());
}
