//! SGA binary format (.sga)
//!
//! Skeleton and animation clip container referenced by an SGM file.
//!
//! # Layout
//! ```text
//! Header (5 bytes):
//! 0x00: magic u32 LE         - 0x16DA4E5A
//! 0x04: version u8           - 1
//!
//! name_len u16, name[name_len]              - skeleton name
//!
//! bone_count u16, then per bone:
//!   name_len u16, name[name_len]
//!   position f32 × 3                        - first axis stored flipped
//!   is_root u8                              - 1 = root
//!   child_count u16, children u16[child_count]
//!
//! animation_count u16, then per animation:
//!   name_len u16, name[name_len]
//!   affected_bone_count u16, then per bone:
//!     bone_id u16, frame_count u32
//!     frame_count × 44-byte frame record:
//!       time f32 (frame number, 60 per second)
//!       position f32 × 3 (first axis negated on read)
//!       scale f32 × 3
//!       rotation f32 × 4 (x, y, z, w)
//! ```
//!
//! Bone positions are passed through as stored while track positions are
//! flipped on read. Both conventions come from the exporter and are kept as-is.

mod decode;
mod encode;
mod header;
mod types;


pub use decode::decode_sga;
pub use encode::write_sga;
pub use header::{SGA_MAGIC, SGA_VERSION, SgaHeader};
pub use types::{
    AnimationClip, Bone, CLIP_FRAME_RATE, FRAME_RECORD_SIZE, SgaAsset, Skeleton, Track,
};
