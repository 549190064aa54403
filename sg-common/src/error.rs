//! Decode error and warning types

use serde::Serialize;
use thiserror::Error;

/// Result alias used by every decoder in this crate.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Fatal decode failures.
///
/// Any of these aborts the decode call; no partial asset is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read needed more bytes than remain in the buffer
    #[error(
        "truncated buffer: {requested} bytes requested at offset {offset}, {available} available"
    )]
    Truncated {
        offset: usize,
        requested: usize,
        available: usize,
    },

    /// Magic number mismatch (SGA only)
    #[error("invalid SGA magic: 0x{found:08X}")]
    InvalidFormat { found: u32 },

    /// Version byte not recognized
    #[error("unsupported SGA version: {found}")]
    UnsupportedVersion { found: u8 },

    /// A bone declares a child index outside the bone table
    #[error("bone {bone} declares child {child}, but the skeleton has {bone_count} bones")]
    CorruptHierarchy {
        bone: usize,
        child: u16,
        bone_count: usize,
    },

    /// Bone indices are u16, so a skeleton holds at most 65535 bones
    #[error("skeleton has {count} bones (max 65535)")]
    TooManyBones { count: usize },
}

/// Recoverable conditions met while decoding.
///
/// Each warning is logged through `tracing` when it occurs and kept on the
/// decode result. Decoding of sibling records continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeWarning {
    /// An animation track targets a bone id outside the skeleton; its frames
    /// were skipped
    #[error(
        "animation '{animation}' references bone {bone_id} (skeleton has {bone_count}); skipped {frame_count} frames"
    )]
    InvalidBoneReference {
        animation: String,
        bone_id: u16,
        bone_count: usize,
        frame_count: u32,
    },

    /// An animation ended with no usable tracks and was dropped
    #[error("animation '{animation}' has no valid tracks and was dropped")]
    EmptyClip { animation: String },
}
