//! SGM data model

use serde::{Deserialize, Serialize};

/// Version tuple stored at the start of every SGM file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SgmVersion {
    pub major: u32,
    pub minor: u8,
}

/// A texture bound to a UV slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    /// Texture filename with the `*` placeholder already resolved
    pub path: String,
    /// Exporter-defined usage hint (diffuse, normal, ...)
    pub usage_hint: u8,
}

/// A constant color declared by a material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSlot {
    pub rgba: [f32; 4],
    pub color_id: u8,
}

/// Material table entry. Meshes reference it by `id`, not by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: u8,
    /// One list of textures per UV slot
    pub uv_slots: Vec<Vec<TextureRef>>,
    pub color_slots: Vec<ColorSlot>,
}

impl Material {
    /// Color of the first declared color slot, if any
    pub fn base_color(&self) -> Option<[f32; 4]> {
        self.color_slots.first().map(|slot| slot.rgba)
    }

    /// All texture references across every UV slot, in file order
    pub fn textures(&self) -> impl Iterator<Item = &TextureRef> {
        self.uv_slots.iter().flatten()
    }
}

/// Per-vertex record shape, resolved once from the mesh header.
///
/// Field order within a vertex is fixed:
/// position(3f) → normal(3f) → uv_layers × uv(2f) → [color(4f)] →
/// [tangent(4f)] → [weights(4f), bone_indices(4f)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VertexLayout {
    pub uv_layers: u8,
    pub colors: bool,
    pub tangents: bool,
    pub skinned: bool,
}

impl VertexLayout {
    /// Color channel count that marks RGBA vertex colors as present
    pub const RGBA_CHANNELS: u8 = 4;

    /// Resolve the layout from the raw header bytes
    pub fn from_header(uv_layers: u8, color_channels: u8, has_tangents: u8, has_bones: u8) -> Self {
        Self {
            uv_layers,
            colors: color_channels == Self::RGBA_CHANNELS,
            tangents: has_tangents != 0,
            skinned: has_bones != 0,
        }
    }

    /// Encoded size of one vertex in bytes
    pub fn stride(&self) -> usize {
        self.offsets().stride
    }

    /// Byte offset of every attribute within one vertex record
    pub fn offsets(&self) -> VertexOffsets {
        let mut next = VertexOffsets::UV + self.uv_layers as usize * 8;
        let mut place = |present: bool, size: usize| {
            present.then(|| {
                let offset = next;
                next += size;
                offset
            })
        };
        let color = place(self.colors, 16);
        let tangent = place(self.tangents, 16);
        let skin = place(self.skinned, 32);

        VertexOffsets {
            uv: (self.uv_layers > 0).then_some(VertexOffsets::UV),
            color,
            tangent,
            skin,
            stride: next,
        }
    }
}

/// Attribute offsets resolved from a [`VertexLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexOffsets {
    /// First UV layer
    pub uv: Option<usize>,
    pub color: Option<usize>,
    pub tangent: Option<usize>,
    /// Weights, with the bone indices 16 bytes later
    pub skin: Option<usize>,
    pub stride: usize,
}

impl VertexOffsets {
    pub const POSITION: usize = 0;
    pub const NORMAL: usize = 12;
    pub const UV: usize = 24;
}

/// Skin attributes, present only when the mesh header says so
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinData {
    pub weights: Vec<[f32; 4]>,
    /// Bone indices exactly as stored (floats)
    pub bone_indices: Vec<[f32; 4]>,
}

impl SkinData {
    /// Bone indices reinterpreted as integers.
    ///
    /// Fractions are truncated toward zero and the result wraps modulo 2^16,
    /// so -1.0 becomes 65535. NaN and infinities become 0.
    pub fn joint_indices(&self) -> Vec<[u16; 4]> {
        self.bone_indices
            .iter()
            .map(|idx| idx.map(wrap_u16))
            .collect()
    }
}

fn wrap_u16(v: f32) -> u16 {
    // f32 remainder is exact, and every value in (-65536, 65536) is representable
    let wrapped = v.trunc() % 65536.0;
    if wrapped < 0.0 {
        (wrapped + 65536.0) as u16
    } else {
        wrapped as u16
    }
}

/// Index buffer with the width chosen by the file, not by vertex count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored width of one index in bytes (2 or 4)
    pub fn width(&self) -> u8 {
        match self {
            IndexBuffer::U16(_) => 2,
            IndexBuffer::U32(_) => 4,
        }
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            IndexBuffer::U16(v) => v.get(i).map(|&x| x as u32),
            IndexBuffer::U32(v) => v.get(i).copied(),
        }
    }

    /// Widen every index to u32
    pub fn to_u32(&self) -> Vec<u32> {
        match self {
            IndexBuffer::U16(v) => v.iter().map(|&x| x as u32).collect(),
            IndexBuffer::U32(v) => v.clone(),
        }
    }
}

/// Mesh table entry. All attribute arrays have `vertex_count` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub id: u8,
    /// Foreign key into the material table (not validated by the decoder)
    pub material_id: u8,
    pub vertex_count: u32,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// First UV layer only; zeros when the mesh declares no UV layer
    pub uvs: Vec<[f32; 2]>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub tangents: Option<Vec<[f32; 4]>>,
    pub skin: Option<SkinData>,
    pub indices: IndexBuffer,
}

impl Mesh {
    pub fn is_skinned(&self) -> bool {
        self.skin.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Layout this mesh is written with (always one UV layer)
    pub fn layout(&self) -> VertexLayout {
        VertexLayout {
            uv_layers: 1,
            colors: self.colors.is_some(),
            tangents: self.tangents.is_some(),
            skinned: self.skin.is_some(),
        }
    }
}

/// Result of decoding one SGM buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgmAsset {
    pub version: SgmVersion,
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    /// Companion animation filename, placeholder still unresolved
    pub animation_reference: Option<String>,
}

impl SgmAsset {
    /// Find a material by its id
    pub fn find_material(&self, id: u8) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Serialize with the canonical writer
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut out = Vec::new();
        super::write_sgm(&mut out, self)?;
        Ok(out)
    }
}
