//! SGM decoder

use super::types::{
    ColorSlot, IndexBuffer, Material, Mesh, SgmAsset, SgmVersion, SkinData, TextureRef,
    VertexLayout, VertexOffsets,
};
use crate::cursor::ByteCursor;
use crate::error::DecodeResult;
use crate::formats::reference::{TEXTURE_TOKEN, resolve_placeholder};

/// Index width byte that selects 32-bit indices
const WIDE_INDEX: u8 = 4;

/// Decode a complete SGM buffer.
///
/// Decoding is all-or-nothing: any truncation aborts with an error and no
/// partial asset. Bytes after the animation reference are ignored.
pub fn decode_sgm(data: &[u8]) -> DecodeResult<SgmAsset> {
    let mut cursor = ByteCursor::new(data);

    let version = SgmVersion {
        major: cursor.read_u32()?,
        minor: cursor.read_u8()?,
    };

    let material_count = cursor.read_u8()?;
    let mut materials = Vec::with_capacity(material_count as usize);
    for _ in 0..material_count {
        materials.push(read_material(&mut cursor)?);
    }

    let mesh_count = cursor.read_u8()?;
    let mut meshes = Vec::with_capacity(mesh_count as usize);
    for _ in 0..mesh_count {
        meshes.push(read_mesh(&mut cursor)?);
    }

    let animation_reference = if cursor.read_u8()? == 1 {
        Some(cursor.read_length_prefixed_string()?)
    } else {
        None
    };

    tracing::debug!(
        "Decoded SGM v{}.{}: {} materials, {} meshes, animation: {:?}",
        version.major,
        version.minor,
        materials.len(),
        meshes.len(),
        animation_reference
    );

    Ok(SgmAsset {
        version,
        materials,
        meshes,
        animation_reference,
    })
}

fn read_material(cursor: &mut ByteCursor<'_>) -> DecodeResult<Material> {
    let id = cursor.read_u8()?;

    let uv_slot_count = cursor.read_u8()?;
    let mut uv_slots = Vec::with_capacity(uv_slot_count as usize);
    for _ in 0..uv_slot_count {
        let image_count = cursor.read_u8()?;
        let mut images = Vec::with_capacity(image_count as usize);
        for _ in 0..image_count {
            let usage_hint = cursor.read_u8()?;
            let name = cursor.read_length_prefixed_string()?;
            images.push(TextureRef {
                path: resolve_placeholder(&name, TEXTURE_TOKEN),
                usage_hint,
            });
        }
        uv_slots.push(images);
    }

    let color_count = cursor.read_u8()?;
    let mut color_slots = Vec::with_capacity(color_count as usize);
    for _ in 0..color_count {
        let rgba = cursor.read_f32s::<4>()?;
        let color_id = cursor.read_u8()?;
        color_slots.push(ColorSlot { rgba, color_id });
    }

    Ok(Material {
        id,
        uv_slots,
        color_slots,
    })
}

fn read_mesh(cursor: &mut ByteCursor<'_>) -> DecodeResult<Mesh> {
    let id = cursor.read_u8()?;
    let material_id = cursor.read_u8()?;
    let vertex_count = cursor.read_u32()?;
    let uv_layers = cursor.read_u8()?;
    let color_channels = cursor.read_u8()?;
    let has_tangents = cursor.read_u8()?;
    let has_bones = cursor.read_u8()?;
    let layout = VertexLayout::from_header(uv_layers, color_channels, has_tangents, has_bones);

    let count = vertex_count as usize;
    let offsets = layout.offsets();
    let block = cursor.read_bytes(count.saturating_mul(offsets.stride))?;
    let vertices = VertexBlock {
        data: block,
        stride: offsets.stride,
    };

    // Each attribute is one strided pass; only layer 0 of the UVs is kept
    let positions = vertices.attribute::<3>(VertexOffsets::POSITION);
    let normals = vertices.attribute::<3>(VertexOffsets::NORMAL);
    let uvs = match offsets.uv {
        Some(offset) => vertices.attribute::<2>(offset),
        None => vec![[0.0; 2]; count],
    };
    let colors = offsets.color.map(|offset| vertices.attribute::<4>(offset));
    let tangents = offsets.tangent.map(|offset| vertices.attribute::<4>(offset));
    let skin = offsets.skin.map(|offset| SkinData {
        weights: vertices.attribute::<4>(offset),
        bone_indices: vertices.attribute::<4>(offset + 16),
    });

    let indices = read_indices(cursor)?;

    Ok(Mesh {
        id,
        material_id,
        vertex_count,
        positions,
        normals,
        uvs,
        colors,
        tangents,
        skin,
        indices,
    })
}

/// Interleaved vertex records, already bounds-checked as a whole
struct VertexBlock<'a> {
    data: &'a [u8],
    stride: usize,
}

impl VertexBlock<'_> {
    /// `N` consecutive f32 values at `offset` within every record
    fn attribute<const N: usize>(&self, offset: usize) -> Vec<[f32; N]> {
        self.data
            .chunks_exact(self.stride)
            .map(|vertex| {
                let mut out = [0.0f32; N];
                for (value, bytes) in out.iter_mut().zip(vertex[offset..].chunks_exact(4)) {
                    *value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                }
                out
            })
            .collect()
    }
}

fn read_indices(cursor: &mut ByteCursor<'_>) -> DecodeResult<IndexBuffer> {
    let count = cursor.read_u32()? as usize;
    let width = cursor.read_u8()?;

    if width == WIDE_INDEX {
        cursor.ensure(count.saturating_mul(4))?;
        let indices = (0..count)
            .map(|_| cursor.read_u32())
            .collect::<DecodeResult<Vec<_>>>()?;
        Ok(IndexBuffer::U32(indices))
    } else {
        cursor.ensure(count.saturating_mul(2))?;
        let indices = (0..count)
            .map(|_| cursor.read_u16())
            .collect::<DecodeResult<Vec<_>>>()?;
        Ok(IndexBuffer::U16(indices))
    }
}
