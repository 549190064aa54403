//! Asset assembly (SGM + optional SGA -> ModelBundle)
//!
//! This is the one place where mesh data and skeleton data meet. Meshes are
//! only bound to the skeleton when both sides agree: an SGA asset was supplied
//! and the mesh carries skin weights and indices. Everything else is emitted
//! as static geometry. A mesh naming an undeclared material is drawn with the
//! default material rather than rejected.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use sg_common::{AnimationClip, IndexBuffer, Mesh, SgaAsset, SgmAsset, Skeleton, TextureRef};
use thiserror::Error;

/// Recoverable problems met while assembling, kept on [`ModelBundle::warnings`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleWarning {
    #[error("mesh {mesh} references undeclared material {material}; using the default material")]
    UnknownMaterial { mesh: u8, material: u8 },
}

/// Presentation material handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMaterial {
    /// Declared material id; `None` for the default material
    pub id: Option<u8>,
    /// First declared color slot, or opaque white
    pub base_color: Vec4,
    /// Set when any mesh using this material has vertex colors
    pub vertex_colors: bool,
    pub textures: Vec<TextureRef>,
}

impl RenderMaterial {
    /// Untextured opaque white, used for meshes whose material is missing
    pub fn fallback() -> Self {
        Self {
            id: None,
            base_color: Vec4::ONE,
            vertex_colors: false,
            textures: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id.is_none()
    }
}

/// Skinning attributes, present only on meshes bound to a skeleton
#[derive(Debug, Clone, PartialEq)]
pub struct SkinAttributes {
    pub weights: Vec<Vec4>,
    /// Joint indices converted from their stored float form
    pub joints: Vec<[u16; 4]>,
}

/// Owned vertex and index data for one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Option<Vec<Vec4>>,
    pub tangents: Option<Vec<Vec4>>,
    pub skin: Option<SkinAttributes>,
    pub indices: IndexBuffer,
}

impl Geometry {
    fn from_mesh(mesh: &Mesh, skinned: bool) -> Self {
        let vec4s = |values: &Vec<[f32; 4]>| -> Vec<Vec4> {
            values.iter().copied().map(Vec4::from).collect()
        };

        let skin = mesh
            .skin
            .as_ref()
            .filter(|_| skinned)
            .map(|skin| SkinAttributes {
                weights: vec4s(&skin.weights),
                joints: skin.joint_indices(),
            });

        Self {
            positions: mesh.positions.iter().copied().map(Vec3::from).collect(),
            normals: mesh.normals.iter().copied().map(Vec3::from).collect(),
            uvs: mesh.uvs.iter().copied().map(Vec2::from).collect(),
            colors: mesh.colors.as_ref().map(vec4s),
            tangents: mesh.tangents.as_ref().map(vec4s),
            skin,
            indices: mesh.indices.clone(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn color_bytes(&self) -> Option<&[u8]> {
        self.colors.as_deref().map(bytemuck::cast_slice)
    }

    /// Index data at its stored width
    pub fn index_bytes(&self) -> &[u8] {
        match &self.indices {
            IndexBuffer::U16(indices) => bytemuck::cast_slice(indices),
            IndexBuffer::U32(indices) => bytemuck::cast_slice(indices),
        }
    }

    /// Indices that point past the vertex arrays.
    ///
    /// The codec does not range check indices; renderers that cannot
    /// tolerate bad indices should check this before upload.
    pub fn out_of_range_indices(&self) -> usize {
        let count = self.vertex_count() as u32;
        self.indices.to_u32().iter().filter(|&&i| i >= count).count()
    }
}

/// Binding between a skin-capable mesh and the rig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinBinding {
    /// Bones flagged as roots, attached to the mesh
    pub root_bones: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderMesh {
    pub mesh_id: u8,
    /// Index into [`ModelBundle::materials`]
    pub material: usize,
    pub geometry: Geometry,
    pub skin: Option<SkinBinding>,
}

/// Local bone transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigBone {
    pub name: String,
    /// Bind pose: stored position, identity rotation, unit scale
    pub local: Transform,
    pub parent: Option<usize>,
}

/// Bind-pose skeleton ready for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Rig {
    pub name: String,
    pub bones: Vec<RigBone>,
    pub roots: Vec<usize>,
}

impl Rig {
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        let bones = skeleton
            .bones()
            .iter()
            .enumerate()
            .map(|(i, bone)| RigBone {
                name: bone.name.to_string(),
                local: Transform::from_translation(Vec3::from(bone.position)),
                parent: skeleton.parent(i),
            })
            .collect();

        Self {
            name: skeleton.name.to_string(),
            bones,
            roots: skeleton.roots().collect(),
        }
    }

    /// World-space bind matrices, one per bone.
    ///
    /// Parent links may form cycles in files the codec accepts. The bone at
    /// which a cycle closes is treated as parentless.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let count = self.bones.len();
        let mut world: Vec<Option<Mat4>> = vec![None; count];
        let mut on_chain = vec![false; count];
        let mut chain = Vec::new();

        for start in 0..count {
            let mut current = Some(start);
            while let Some(bone) = current {
                if world[bone].is_some() || on_chain[bone] {
                    break;
                }
                on_chain[bone] = true;
                chain.push(bone);
                current = self.bones[bone].parent;
            }

            let mut parent = current.and_then(|bone| world[bone]).unwrap_or(Mat4::IDENTITY);
            while let Some(bone) = chain.pop() {
                parent *= self.bones[bone].local.to_matrix();
                world[bone] = Some(parent);
            }
        }

        world.into_iter().map(Option::unwrap_or_default).collect()
    }

    /// Inverse bind matrices matching [`Rig::world_matrices`]
    pub fn inverse_bind_matrices(&self) -> Vec<Mat4> {
        self.world_matrices().iter().map(Mat4::inverse).collect()
    }
}

/// Everything the renderer needs for one model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    pub materials: Vec<RenderMaterial>,
    pub meshes: Vec<RenderMesh>,
    /// Present whenever an SGA asset was supplied
    pub rig: Option<Rig>,
    pub clips: Vec<AnimationClip>,
    pub warnings: Vec<AssembleWarning>,
}

impl ModelBundle {
    pub fn skinned_meshes(&self) -> impl Iterator<Item = &RenderMesh> {
        self.meshes.iter().filter(|m| m.skin.is_some())
    }

    pub fn material_for(&self, mesh: &RenderMesh) -> &RenderMaterial {
        &self.materials[mesh.material]
    }
}

/// Merge a decoded SGM asset with an optional decoded SGA asset.
pub fn assemble(sgm: &SgmAsset, sga: Option<&SgaAsset>) -> ModelBundle {
    let mut materials: Vec<RenderMaterial> = sgm
        .materials
        .iter()
        .map(|material| RenderMaterial {
            id: Some(material.id),
            base_color: material.base_color().map_or(Vec4::ONE, Vec4::from),
            vertex_colors: false,
            textures: material.textures().cloned().collect(),
        })
        .collect();

    let rig = sga.map(|sga| Rig::from_skeleton(&sga.skeleton));

    let mut warnings = Vec::new();
    let mut fallback = None;
    let mut meshes = Vec::with_capacity(sgm.meshes.len());
    for mesh in &sgm.meshes {
        // Material ids may repeat; the last declaration wins
        let declared = materials
            .iter()
            .rposition(|m| m.id == Some(mesh.material_id));
        let material = match declared {
            Some(index) => index,
            None => {
                let warning = AssembleWarning::UnknownMaterial {
                    mesh: mesh.id,
                    material: mesh.material_id,
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                *fallback.get_or_insert_with(|| {
                    materials.push(RenderMaterial::fallback());
                    materials.len() - 1
                })
            }
        };

        if mesh.has_colors() {
            materials[material].vertex_colors = true;
        }

        let skin = match &rig {
            Some(rig) if mesh.is_skinned() => Some(SkinBinding {
                root_bones: rig.roots.clone(),
            }),
            _ => None,
        };

        meshes.push(RenderMesh {
            mesh_id: mesh.id,
            material,
            geometry: Geometry::from_mesh(mesh, skin.is_some()),
            skin,
        });
    }

    let bundle = ModelBundle {
        materials,
        meshes,
        rig,
        clips: sga.map(|sga| sga.clips.clone()).unwrap_or_default(),
        warnings,
    };

    tracing::debug!(
        "Assembled model: {} materials, {} meshes ({} skinned), {} clips",
        bundle.materials.len(),
        bundle.meshes.len(),
        bundle.skinned_meshes().count(),
        bundle.clips.len()
    );

    bundle
}
