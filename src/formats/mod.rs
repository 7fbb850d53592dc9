//! Persisted geometry container formats. `FFM` is fully specified (a fixed
//! binary layout) and implemented as an exact reader/writer. `WAR` and
//! `MD5` are specified only as data contracts — the structures their
//! loaders must produce — with a minimal conforming parser for each so the
//! contract is exercised end to end; their full grammars are out of scope.

pub mod ffm;
pub mod md5;
pub mod registry;
pub mod war;

pub use ffm::{FfmFile, FfmMesh};
pub use md5::{Md5Anim, Md5Mesh, Md5VertexWeights, Md5Weight};
pub use registry::{load, register_loader, resolve_loader, LoadedAsset, LoaderFn};
pub use war::{war_expand_vertices, war_generate_indices, WarMesh};
