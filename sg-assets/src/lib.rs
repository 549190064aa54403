//! sg-assets
//!
//! Turns SG model files into renderer-ready bundles:
//! - [`source`] - where bytes come from ([`FsSource`], [`MemorySource`])
//! - [`loader`] - SGM fetch, companion SGA resolution and static fallback
//! - [`assemble`] - merges decoded meshes, materials and skeleton
//! - [`config`] - `sg.toml` loader settings

pub mod assemble;
pub mod config;
pub mod loader;
pub mod source;

pub use assemble::{
    AssembleWarning, Geometry, ModelBundle, RenderMaterial, RenderMesh, Rig, RigBone,
    SkinAttributes, SkinBinding, Transform, assemble,
};
pub use config::{ConfigError, LoaderConfig};
pub use loader::{LoadError, LoadedModel, ModelLoader};
pub use source::{AssetSource, FsSource, MemorySource, SourceError};

// Re-export the codec so callers need a single dependency
pub use sg_common;
