//! Model loader
//!
//! Fetches `<model>.<mesh_extension>`, decodes it, follows the companion
//! animation reference when there is one, and assembles the result. A broken
//! or missing companion degrades to a static model unless
//! [`LoaderConfig::strict_animation`] is set.

use sg_common::{
    DecodeError, DecodeWarning, SgaAsset, companion_path, decode_sga, decode_sgm,
};
use thiserror::Error;

use crate::assemble::{ModelBundle, assemble};
use crate::config::LoaderConfig;
use crate::source::{AssetSource, FsSource, SourceError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: SourceError,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: DecodeError,
    },
}

/// A loaded and assembled model
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub bundle: ModelBundle,
    /// Path of the mesh file that was fetched
    pub mesh_path: String,
    /// Resolved companion path, if the mesh file referenced one
    pub animation_path: Option<String>,
    /// Recoverable problems from the companion decode. Assembly warnings
    /// live on [`ModelBundle::warnings`].
    pub warnings: Vec<DecodeWarning>,
}

impl LoadedModel {
    /// True when the companion animation was loaded and applied
    pub fn is_animated(&self) -> bool {
        self.bundle.rig.is_some()
    }
}

pub struct ModelLoader<S> {
    source: S,
    config: LoaderConfig,
}

impl ModelLoader<FsSource> {
    /// Loader reading from the configured root directory
    pub fn from_config(config: LoaderConfig) -> Self {
        Self::new(FsSource::new(config.root.clone()), config)
    }
}

impl<S: AssetSource> ModelLoader<S> {
    pub fn new(source: S, config: LoaderConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load a model by name (a path without the mesh extension)
    pub async fn load(&self, model: &str) -> Result<LoadedModel, LoadError> {
        let mesh_path = format!("{}.{}", model, self.config.mesh_extension);
        let data = self
            .source
            .fetch(&mesh_path)
            .await
            .map_err(|source| LoadError::Fetch {
                path: mesh_path.clone(),
                source,
            })?;
        let sgm = decode_sgm(&data).map_err(|source| LoadError::Decode {
            path: mesh_path.clone(),
            source,
        })?;

        let animation_path = sgm
            .animation_reference
            .as_deref()
            .map(|reference| companion_path(model, reference, &self.config.animation_token));

        let sga = match &animation_path {
            Some(path) => self.load_companion(path).await?,
            None => None,
        };

        let bundle = assemble(&sgm, sga.as_ref());

        tracing::info!(
            "Loaded {}: {} meshes, {}",
            mesh_path,
            bundle.meshes.len(),
            if bundle.rig.is_some() {
                "animated"
            } else {
                "static"
            }
        );

        Ok(LoadedModel {
            bundle,
            mesh_path,
            animation_path,
            warnings: sga.map(|sga| sga.warnings).unwrap_or_default(),
        })
    }

    /// Fetch and decode the companion. `Ok(None)` means "assemble statically".
    async fn load_companion(&self, path: &str) -> Result<Option<SgaAsset>, LoadError> {
        let result = match self.source.fetch(path).await {
            Ok(data) => decode_sga(&data).map_err(|source| LoadError::Decode {
                path: path.to_string(),
                source,
            }),
            Err(source) => Err(LoadError::Fetch {
                path: path.to_string(),
                source,
            }),
        };

        match result {
            Ok(sga) => Ok(Some(sga)),
            Err(e) if self.config.strict_animation => Err(e),
            Err(e) => {
                tracing::warn!("Animation unavailable, loading static model: {}", e);
                Ok(None)
            }
        }
    }
}
