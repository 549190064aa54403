//! Binary asset codec for SG model files
//!
//! This crate decodes the two custom formats shipped with the game client:
//! - `.sgm` - materials, meshes and an optional companion animation reference
//! - `.sga` - a named skeleton and its animation clips
//!
//! Decoders are pure functions over an immutable byte slice. They perform no
//! I/O and share no state, so independent assets can be decoded on any thread.
//! Loading, companion resolution and assembly live in `sg-assets`.
//!
//! # Modules
//!
//! - [`cursor`] - Bounds-checked little-endian reader ([`ByteCursor`])
//! - [`formats`] - SGM/SGA decoders, writers and the decoded data model
//! - [`error`] - Fatal [`DecodeError`]s and recoverable [`DecodeWarning`]s

pub mod cursor;
pub mod error;
pub mod formats;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cursor::ByteCursor;
pub use error::{DecodeError, DecodeResult, DecodeWarning};

// Re-export commonly used format items
pub use formats::{
    // Constants
    ANIMATION_TOKEN,
    CLIP_FRAME_RATE,
    FRAME_RECORD_SIZE,
    SGA_MAGIC,
    SGA_VERSION,
    TEXTURE_TOKEN,
    // Skeleton/animation types
    AnimationClip,
    Bone,
    Name,
    SgaAsset,
    Skeleton,
    Track,
    // Mesh/material types
    ColorSlot,
    IndexBuffer,
    Material,
    Mesh,
    SgmAsset,
    SgmVersion,
    SkinData,
    TextureRef,
    VertexLayout,
    VertexOffsets,
    // Entry points
    companion_path,
    decode_sga,
    decode_sgm,
    resolve_placeholder,
    write_sga,
    write_sgm,
};
