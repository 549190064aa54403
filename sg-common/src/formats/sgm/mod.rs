//! SGM binary format (.sgm)
//!
//! Static mesh/material container. POD format - no magic bytes, the caller
//! guarantees the type by file association.
//!
//! # Layout
//! ```text
//! Header:
//!   version_major u32, version_minor u8       (kept, never validated)
//!
//! material_count u8, then per material:
//!   id u8
//!   uv_slot_count u8, per slot:
//!     image_count u8, per image:
//!       usage_hint u8, name_len u16, name[name_len]   ('*' -> "png")
//!   color_count u8, per color:
//!     r f32, g f32, b f32, a f32, color_id u8
//!
//! mesh_count u8, then per mesh:
//!   id u8, material_id u8, vertex_count u32
//!   uv_layer_count u8, color_channels u8 (4 = RGBA present)
//!   has_tangents u8, has_bones u8
//!   vertex_count × interleaved vertex (see VertexLayout)
//!   index_count u32, index_width u8 (4 = u32, otherwise u16)
//!   index_count × index
//!
//! has_animation u8 (1 = present)
//!   name_len u16, name[name_len]              ('*' -> "sga", resolved by the loader)
//! ```
//!
//! Mesh `material_id` values and index ranges are not validated here; they
//! are checked by whoever assembles the decoded asset.

mod decode;
mod encode;
mod types;

#[cfg(test)]
mod tests;

pub use decode::decode_sgm;
pub use encode::write_sgm;
pub(crate) use encode::{invalid_input, write_f32s, write_string};
pub use types::{
    ColorSlot, IndexBuffer, Material, Mesh, SgmAsset, SgmVersion, SkinData, TextureRef,
    VertexLayout, VertexOffsets,
};
