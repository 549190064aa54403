//! Canonical SGM writer
//!
//! Produces files the decoder reads back into an equal [`SgmAsset`]. The
//! output is canonical rather than a byte copy of the original: exactly one UV
//! layer per vertex, color channel count 4 or 0, flag bytes 0 or 1, and texture
//! paths written as already resolved.

use std::io::{self, Write};

use super::types::{IndexBuffer, Material, Mesh, SgmAsset, VertexLayout};

/// Write a complete SGM file
pub fn write_sgm<W: Write>(w: &mut W, asset: &SgmAsset) -> io::Result<()> {
    w.write_all(&asset.version.major.to_le_bytes())?;
    w.write_all(&[asset.version.minor])?;

    w.write_all(&[count_u8(asset.materials.len(), "materials")?])?;
    for material in &asset.materials {
        write_material(w, material)?;
    }

    w.write_all(&[count_u8(asset.meshes.len(), "meshes")?])?;
    for mesh in &asset.meshes {
        write_mesh(w, mesh)?;
    }

    match &asset.animation_reference {
        Some(name) => {
            w.write_all(&[1])?;
            write_string(w, name)?;
        }
        None => w.write_all(&[0])?,
    }

    Ok(())
}

fn write_material<W: Write>(w: &mut W, material: &Material) -> io::Result<()> {
    w.write_all(&[material.id])?;

    w.write_all(&[count_u8(material.uv_slots.len(), "UV slots")?])?;
    for slot in &material.uv_slots {
        w.write_all(&[count_u8(slot.len(), "images")?])?;
        for texture in slot {
            w.write_all(&[texture.usage_hint])?;
            write_string(w, &texture.path)?;
        }
    }

    w.write_all(&[count_u8(material.color_slots.len(), "color slots")?])?;
    for color in &material.color_slots {
        write_f32s(w, &color.rgba)?;
        w.write_all(&[color.color_id])?;
    }

    Ok(())
}

fn write_mesh<W: Write>(w: &mut W, mesh: &Mesh) -> io::Result<()> {
    let count = mesh.vertex_count as usize;
    check_len(mesh.positions.len(), count, "positions")?;
    check_len(mesh.normals.len(), count, "normals")?;
    check_len(mesh.uvs.len(), count, "uvs")?;
    if let Some(colors) = &mesh.colors {
        check_len(colors.len(), count, "colors")?;
    }
    if let Some(tangents) = &mesh.tangents {
        check_len(tangents.len(), count, "tangents")?;
    }
    if let Some(skin) = &mesh.skin {
        check_len(skin.weights.len(), count, "skin weights")?;
        check_len(skin.bone_indices.len(), count, "skin bone indices")?;
    }

    let layout = mesh.layout();
    w.write_all(&[mesh.id, mesh.material_id])?;
    w.write_all(&mesh.vertex_count.to_le_bytes())?;
    w.write_all(&[
        layout.uv_layers,
        if layout.colors {
            VertexLayout::RGBA_CHANNELS
        } else {
            0
        },
        layout.tangents as u8,
        layout.skinned as u8,
    ])?;

    for i in 0..count {
        write_f32s(w, &mesh.positions[i])?;
        write_f32s(w, &mesh.normals[i])?;
        write_f32s(w, &mesh.uvs[i])?;
        if let Some(colors) = &mesh.colors {
            write_f32s(w, &colors[i])?;
        }
        if let Some(tangents) = &mesh.tangents {
            write_f32s(w, &tangents[i])?;
        }
        if let Some(skin) = &mesh.skin {
            write_f32s(w, &skin.weights[i])?;
            write_f32s(w, &skin.bone_indices[i])?;
        }
    }

    let index_count = u32::try_from(mesh.indices.len())
        .map_err(|_| invalid_input("too many indices".to_string()))?;
    w.write_all(&index_count.to_le_bytes())?;
    w.write_all(&[mesh.indices.width()])?;
    match &mesh.indices {
        IndexBuffer::U16(indices) => {
            for i in indices {
                w.write_all(&i.to_le_bytes())?;
            }
        }
        IndexBuffer::U32(indices) => {
            for i in indices {
                w.write_all(&i.to_le_bytes())?;
            }
        }
    }

    Ok(())
}

/// Write a u16 length prefix followed by the UTF-8 bytes
pub(crate) fn write_string<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    let len = u16::try_from(s.len())
        .map_err(|_| invalid_input(format!("string of {} bytes exceeds u16 length", s.len())))?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(s.as_bytes())
}

pub(crate) fn write_f32s<W: Write>(w: &mut W, values: &[f32]) -> io::Result<()> {
    for v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn count_u8(len: usize, what: &str) -> io::Result<u8> {
    u8::try_from(len).map_err(|_| invalid_input(format!("{len} {what} (max 255)")))
}

fn check_len(actual: usize, expected: usize, what: &str) -> io::Result<()> {
    if actual != expected {
        return Err(invalid_input(format!(
            "mesh has {actual} {what}, expected {expected}"
        )));
    }
    Ok(())
}

pub(crate) fn invalid_input(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg)
}
