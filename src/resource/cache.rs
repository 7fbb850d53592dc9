use crate::error::Result;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Weak};

/// A strong handle to a cached resource. Cloning bumps the reference count
/// (`Arc`'s own bookkeeping); the cache itself only ever holds a [`Weak`]
/// entry, so the last `SceneResource` drop frees the payload without the
/// cache's involvement.
pub type SceneResource<T> = Arc<T>;

/// Name-keyed, ref-counted dedup cache. `get_or_load` returns the existing
/// resource if a strong handle to it is still alive anywhere, otherwise
/// invokes `loader` and remembers a weak handle for future lookups.
/// `load_fresh` always invokes `loader` and never touches the cache,
/// returning a handle disjoint from whatever the cache is tracking under
/// that name — the `force` path in `Geometry::Load`.
pub struct ResourceCache<T> {
    entries: FxHashMap<String, Weak<T>>,
}

impl<T> ResourceCache<T> {
    pub fn new() -> Self {
        ResourceCache { entries: FxHashMap::default() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the live resource named `name`, if the cache has one that
    /// hasn't been fully dropped elsewhere.
    pub fn get(&self, name: &str) -> Option<SceneResource<T>> {
        self.entries.get(name).and_then(Weak::upgrade)
    }

    pub fn get_or_load(&mut self, name: &str, loader: impl FnOnce() -> Result<T>) -> Result<SceneResource<T>> {
        if let Some(existing) = self.get(name) {
            return Ok(existing);
        }
        let resource = Arc::new(loader()?);
        self.entries.insert(name.to_string(), Arc::downgrade(&resource));
        Ok(resource)
    }

    /// Bypasses the cache entirely: always loads, never stores.
    pub fn load_fresh(&self, loader: impl FnOnce() -> Result<T>) -> Result<SceneResource<T>> {
        Ok(Arc::new(loader()?))
    }

    /// Drops cache entries whose resource has no remaining strong handles —
    /// the weak-entry bookkeeping never does this on its own.
    pub fn sweep(&mut self) {
        self.entries.retain(|_, weak| weak.strong_count() > 0);
    }
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        ResourceCache::new()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
