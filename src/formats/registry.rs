//! Process-wide loader registry: `(type, extension, magic-number) →
//! loader callback`. Resolving by filename tries a magic-number match
//! first, then the extension, then an explicit type — the same order a
//! caller would hand-write if asset kinds were identified ad hoc. Dedup
//! by canonical name with ref-counting is the concern of
//! [`crate::resource::ResourceCache`]; this registry only answers "which
//! loader" for a given name and byte prefix.

use crate::engine_bail;
use crate::error::Result;
use std::any::{Any, TypeId};
use std::sync::{OnceLock, RwLock};

/// What every registered loader returns: the concrete asset type, erased.
pub type LoadedAsset = Box<dyn Any + Send + Sync>;

/// A loader callback: raw bytes in, an erased asset out.
pub type LoaderFn = fn(&[u8]) -> Result<LoadedAsset>;

#[derive(Clone, Copy)]
struct LoaderEntry {
    type_id: TypeId,
    extension: &'static str,
    magic: Option<[u8; 4]>,
    loader: LoaderFn,
}

#[derive(Default)]
struct LoaderRegistry {
    entries: Vec<LoaderEntry>,
}

static REGISTRY: OnceLock<RwLock<LoaderRegistry>> = OnceLock::new();

fn registry() -> &'static RwLock<LoaderRegistry> {
    REGISTRY.get_or_init(|| RwLock::new(LoaderRegistry::default()))
}

/// Registers a loader for asset type `T` under `extension`, optionally
/// also matched by a 4-byte magic prefix. Later registrations for the
/// same extension/magic take priority over earlier ones.
pub fn register_loader<T: Any + Send + Sync>(extension: &'static str, magic: Option<[u8; 4]>, loader: LoaderFn) {
    let entry = LoaderEntry { type_id: TypeId::of::<T>(), extension, magic, loader };
    registry().write().expect("loader registry poisoned").entries.push(entry);
}

/// Drops every registered loader. Test-only: the registry is process-wide
/// and tests that register loaders would otherwise leak into each other.
#[cfg(test)]
fn clear() {
    registry().write().expect("loader registry poisoned").entries.clear();
}

/// Resolves the loader for `name`/`bytes`/asset type `T`: a magic-number
/// match wins first, then an extension match, then a match on `T` alone
/// (the last registered loader for `T`, regardless of name).
pub fn resolve_loader<T: Any + Send + Sync>(name: &str, bytes: &[u8]) -> Result<LoaderFn> {
    let type_id = TypeId::of::<T>();
    let guard = registry().read().expect("loader registry poisoned");

    if let Some(entry) = guard.entries.iter().rev().find(|e| e.magic.is_some_and(|m| bytes.starts_with(&m))) {
        return Ok(entry.loader);
    }

    let ext = name.rsplit('.').next().unwrap_or("");
    if let Some(entry) = guard.entries.iter().rev().find(|e| e.extension.eq_ignore_ascii_case(ext)) {
        return Ok(entry.loader);
    }

    if let Some(entry) = guard.entries.iter().rev().find(|e| e.type_id == type_id) {
        return Ok(entry.loader);
    }

    engine_bail!(LookupMiss, "no registered loader for {:?}", name)
}

/// Resolves and invokes a loader for `name`/`bytes` in one step.
pub fn load<T: Any + Send + Sync>(name: &str, bytes: &[u8]) -> Result<LoadedAsset> {
    let loader = resolve_loader::<T>(name, bytes)?;
    loader(bytes)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
