//! Tests for SGM format

use super::*;
use crate::error::DecodeError;
use crate::test_utils::Bytes;

use proptest::prelude::*;

// ========================================================================
// Fixture Helpers
// ========================================================================

/// Version tuple (1, 0)
fn header() -> Bytes {
    Bytes::new().u32(1).u8(0)
}

/// Mesh header with id 0, material 0
fn mesh_header(
    b: Bytes,
    vertex_count: u32,
    uv_layers: u8,
    colors: u8,
    tangents: u8,
    bones: u8,
) -> Bytes {
    b.u8(0)
        .u8(0)
        .u32(vertex_count)
        .u8(uv_layers)
        .u8(colors)
        .u8(tangents)
        .u8(bones)
}

/// position + normal + one UV layer for vertex `i`
fn plain_vertex(b: Bytes, i: f32) -> Bytes {
    b.f32s(&[i, i + 0.5, i + 1.0])
        .f32s(&[0.0, 1.0, 0.0])
        .f32s(&[i * 0.1, 1.0 - i * 0.1])
}

/// One red material, one triangle with no optional attributes, 16-bit indices
fn triangle_sgm() -> Vec<u8> {
    let mut b = header()
        .u8(1) // material_count
        .u8(0) // id
        .u8(0) // uv_slot_count
        .u8(1) // color_count
        .f32s(&[1.0, 0.0, 0.0, 1.0])
        .u8(0) // color_id
        .u8(1); // mesh_count
    b = mesh_header(b, 3, 1, 0, 0, 0);
    for i in 0..3 {
        b = plain_vertex(b, i as f32);
    }
    b.u32(3).u8(2).u16(0).u16(1).u16(2).u8(0).build()
}

// ========================================================================
// Decode Tests
// ========================================================================

#[test]
fn test_decode_single_triangle() {
    let asset = decode_sgm(&triangle_sgm()).unwrap();

    assert_eq!(asset.version, SgmVersion { major: 1, minor: 0 });
    assert_eq!(asset.materials.len(), 1);
    assert_eq!(asset.materials[0].base_color(), Some([1.0, 0.0, 0.0, 1.0]));
    assert_eq!(asset.materials[0].color_slots[0].color_id, 0);

    assert_eq!(asset.meshes.len(), 1);
    let mesh = &asset.meshes[0];
    assert_eq!(mesh.vertex_count, 3);
    assert_eq!(mesh.positions.len(), 3);
    assert_eq!(mesh.positions[2], [2.0, 2.5, 3.0]);
    assert_eq!(mesh.normals[1], [0.0, 1.0, 0.0]);
    assert_eq!(mesh.uvs[1], [0.1, 0.9]);
    assert_eq!(mesh.indices, IndexBuffer::U16(vec![0, 1, 2]));
    assert!(mesh.colors.is_none());
    assert!(mesh.tangents.is_none());
    assert!(mesh.skin.is_none());
    assert!(asset.animation_reference.is_none());
}

#[test]
fn test_version_is_kept_but_not_validated() {
    let b = Bytes::new().u32(0xFFFF_FFFF).u8(200).u8(0).u8(0).u8(0);
    let asset = decode_sgm(&b.build()).unwrap();
    assert_eq!(
        asset.version,
        SgmVersion {
            major: 0xFFFF_FFFF,
            minor: 200
        }
    );
    assert!(asset.materials.is_empty());
    assert!(asset.meshes.is_empty());
}

#[test]
fn test_texture_placeholder_resolved() {
    let b = header()
        .u8(1)
        .u8(7) // id
        .u8(2) // uv slots
        .u8(2) // slot 0: two images
        .u8(1)
        .str("body_diffuse.*")
        .u8(3)
        .str("body_normal.*")
        .u8(1) // slot 1: one image
        .u8(5)
        .str("already.jpg")
        .u8(0) // no colors
        .u8(0) // no meshes
        .u8(0);
    let asset = decode_sgm(&b.build()).unwrap();

    let material = &asset.materials[0];
    assert_eq!(material.id, 7);
    assert_eq!(material.uv_slots.len(), 2);
    assert_eq!(material.uv_slots[0][0].path, "body_diffuse.png");
    assert_eq!(material.uv_slots[0][0].usage_hint, 1);
    assert_eq!(material.uv_slots[0][1].path, "body_normal.png");
    assert_eq!(material.uv_slots[1][0].path, "already.jpg");
    assert_eq!(material.textures().count(), 3);
    assert_eq!(material.base_color(), None);
}

#[test]
fn test_extra_uv_layers_consumed_but_discarded() {
    let mut b = mesh_header(header().u8(0).u8(1), 2, 2, 0, 0, 0);
    for _ in 0..2 {
        b = b
            .f32s(&[1.0, 2.0, 3.0])
            .f32s(&[0.0, 0.0, 1.0])
            .f32s(&[0.25, 0.5]) // layer 0
            .f32s(&[9.0, 9.0]); // layer 1
    }
    let b = b.u32(1).u8(2).u16(1).u8(1).str("anim.*");
    let asset = decode_sgm(&b.build()).unwrap();

    let mesh = &asset.meshes[0];
    assert_eq!(mesh.uvs, vec![[0.25, 0.5], [0.25, 0.5]]);
    assert_eq!(mesh.indices, IndexBuffer::U16(vec![1]));
    assert_eq!(asset.animation_reference.as_deref(), Some("anim.*"));
}

#[test]
fn test_no_uv_layers_gives_zero_uvs() {
    let b = mesh_header(header().u8(0).u8(1), 1, 0, 0, 0, 0)
        .f32s(&[1.0, 2.0, 3.0])
        .f32s(&[0.0, 1.0, 0.0])
        .u32(0)
        .u8(2)
        .u8(0);
    let asset = decode_sgm(&b.build()).unwrap();
    assert_eq!(asset.meshes[0].uvs, vec![[0.0, 0.0]]);
}

#[test]
fn test_color_channels_other_than_four_means_absent() {
    // Three channels declared: no color floats follow the UVs
    let b = plain_vertex(mesh_header(header().u8(0).u8(1), 1, 1, 3, 0, 0), 0.0)
        .u32(0)
        .u8(2)
        .u8(0);
    let asset = decode_sgm(&b.build()).unwrap();
    assert!(asset.meshes[0].colors.is_none());
}

#[test]
fn test_optional_attributes_in_fixed_order() {
    let b = plain_vertex(mesh_header(header().u8(0).u8(1), 1, 1, 4, 1, 1), 0.0)
        .f32s(&[0.1, 0.2, 0.3, 0.4]) // color
        .f32s(&[1.0, 0.0, 0.0, -1.0]) // tangent
        .f32s(&[0.7, 0.3, 0.0, 0.0]) // weights
        .f32s(&[2.0, 5.0, 0.0, 0.0]) // bone indices
        .u32(0)
        .u8(2)
        .u8(0);
    let asset = decode_sgm(&b.build()).unwrap();

    let mesh = &asset.meshes[0];
    assert_eq!(mesh.colors, Some(vec![[0.1, 0.2, 0.3, 0.4]]));
    assert_eq!(mesh.tangents, Some(vec![[1.0, 0.0, 0.0, -1.0]]));
    let skin = mesh.skin.as_ref().unwrap();
    assert_eq!(skin.weights, vec![[0.7, 0.3, 0.0, 0.0]]);
    assert_eq!(skin.bone_indices, vec![[2.0, 5.0, 0.0, 0.0]]);
    assert_eq!(skin.joint_indices(), vec![[2, 5, 0, 0]]);
    assert!(mesh.is_skinned());
    assert!(mesh.has_colors());
}

#[test]
fn test_no_bones_never_exposes_skin() {
    // Trailing bytes after the file that look like weights/indices
    let b = plain_vertex(mesh_header(header().u8(0).u8(1), 1, 1, 0, 0, 0), 0.0)
        .u32(0)
        .u8(2)
        .u8(0)
        .f32s(&[0.5, 0.5, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0]);
    let asset = decode_sgm(&b.build()).unwrap();
    assert!(asset.meshes[0].skin.is_none());
    assert!(!asset.meshes[0].is_skinned());
}

#[test]
fn test_wide_indices_consume_twelve_bytes() {
    // One vertex, but three 32-bit indices; values are not range checked
    let b = plain_vertex(mesh_header(header().u8(0).u8(1), 1, 1, 0, 0, 0), 0.0)
        .u32(3)
        .u8(4)
        .u32(0)
        .u32(70_000)
        .u32(2)
        .u8(1)
        .str("rig.*");
    let asset = decode_sgm(&b.build()).unwrap();

    let mesh = &asset.meshes[0];
    assert_eq!(mesh.indices, IndexBuffer::U32(vec![0, 70_000, 2]));
    assert_eq!(mesh.indices.width(), 4);
    assert_eq!(mesh.indices.get(1), Some(70_000));
    // The reference decodes cleanly only if exactly 12 index bytes were read
    assert_eq!(asset.animation_reference.as_deref(), Some("rig.*"));
}

#[test]
fn test_unknown_index_width_means_16_bit() {
    let b = plain_vertex(mesh_header(header().u8(0).u8(1), 1, 1, 0, 0, 0), 0.0)
        .u32(2)
        .u8(0)
        .u16(0)
        .u16(0)
        .u8(0);
    let asset = decode_sgm(&b.build()).unwrap();
    assert_eq!(asset.meshes[0].indices, IndexBuffer::U16(vec![0, 0]));
}

#[test]
fn test_material_id_not_validated() {
    let mut b = header().u8(0).u8(1);
    b = b.u8(3).u8(42).u32(0).u8(1).u8(0).u8(0).u8(0);
    let b = b.u32(0).u8(2).u8(0);
    let asset = decode_sgm(&b.build()).unwrap();
    assert_eq!(asset.meshes[0].id, 3);
    assert_eq!(asset.meshes[0].material_id, 42);
    assert!(asset.find_material(42).is_none());
}

#[test]
fn test_animation_flag_must_be_one() {
    let b = header().u8(0).u8(0).u8(2).str("ignored.*");
    let asset = decode_sgm(&b.build()).unwrap();
    assert!(asset.animation_reference.is_none());
}

// ========================================================================
// Failure Tests
// ========================================================================

#[test]
fn test_empty_buffer_is_truncated() {
    assert_eq!(
        decode_sgm(&[]),
        Err(DecodeError::Truncated {
            offset: 0,
            requested: 4,
            available: 0
        })
    );
}

#[test]
fn test_truncated_vertex_data() {
    let mut data = triangle_sgm();
    // Header and material take 27 bytes; cut inside the second vertex
    data.truncate(27 + 10 + 32 + 10);
    assert!(matches!(
        decode_sgm(&data),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_missing_animation_flag_is_truncated() {
    let mut data = triangle_sgm();
    data.pop();
    assert!(matches!(
        decode_sgm(&data),
        Err(DecodeError::Truncated { requested: 1, .. })
    ));
}

#[test]
fn test_hostile_vertex_count_fails_before_allocating() {
    let b = mesh_header(header().u8(0).u8(1), u32::MAX, 1, 4, 1, 1).f32s(&[0.0; 4]);
    match decode_sgm(&b.build()) {
        Err(DecodeError::Truncated {
            offset,
            requested,
            available,
        }) => {
            assert_eq!(offset, 5 + 1 + 1 + 10);
            assert!(requested > available);
            assert_eq!(available, 16);
        }
        other => panic!("expected truncation, got {:?}", other),
    }
}

#[test]
fn test_hostile_index_count_fails_before_allocating() {
    let b = plain_vertex(mesh_header(header().u8(0).u8(1), 1, 1, 0, 0, 0), 0.0)
        .u32(u32::MAX)
        .u8(4)
        .u32(0);
    assert!(matches!(
        decode_sgm(&b.build()),
        Err(DecodeError::Truncated { available: 4, .. })
    ));
}

// ========================================================================
// Layout and Writer Tests
// ========================================================================

#[test]
fn test_vertex_layout_stride() {
    assert_eq!(VertexLayout::from_header(0, 0, 0, 0).stride(), 24);
    assert_eq!(VertexLayout::from_header(1, 0, 0, 0).stride(), 32);
    assert_eq!(VertexLayout::from_header(2, 4, 0, 0).stride(), 56);
    assert_eq!(VertexLayout::from_header(1, 4, 1, 1).stride(), 96);
    // Any nonzero flag byte enables the attribute
    assert!(VertexLayout::from_header(1, 0, 7, 0).tangents);
}

#[test]
fn test_vertex_offsets() {
    let offsets = VertexLayout::from_header(2, 4, 0, 1).offsets();
    assert_eq!(offsets.uv, Some(24));
    assert_eq!(offsets.color, Some(40));
    assert_eq!(offsets.tangent, None);
    assert_eq!(offsets.skin, Some(56));
    assert_eq!(offsets.stride, 88);

    let bare = VertexLayout::from_header(0, 3, 0, 0).offsets();
    assert_eq!(bare.uv, None);
    assert_eq!(bare.color, None);
    assert_eq!(bare.stride, 24);
}

#[test]
fn test_second_uv_layer_skipped_per_vertex() {
    let b = mesh_header(header().u8(0).u8(1), 2, 2, 0, 0, 1);
    let b = b
        .f32s(&[1.0, 2.0, 3.0, 0.0, 1.0, 0.0])
        .f32s(&[0.25, 0.75, 9.0, 9.0])
        .f32s(&[1.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0])
        .f32s(&[4.0, 5.0, 6.0, 0.0, 0.0, 1.0])
        .f32s(&[0.5, 0.5, 9.0, 9.0])
        .f32s(&[0.5, 0.5, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0]);
    let asset = decode_sgm(&b.u32(0).u8(2).u8(0).build()).unwrap();

    let mesh = &asset.meshes[0];
    assert_eq!(mesh.positions, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    assert_eq!(mesh.normals[1], [0.0, 0.0, 1.0]);
    assert_eq!(mesh.uvs, vec![[0.25, 0.75], [0.5, 0.5]]);
    let skin = mesh.skin.as_ref().unwrap();
    assert_eq!(skin.weights[1], [0.5, 0.5, 0.0, 0.0]);
    assert_eq!(skin.joint_indices(), vec![[3, 0, 0, 0], [1, 2, 0, 0]]);
}

#[test]
fn test_joint_indices_wrap_like_uint16() {
    let skin = SkinData {
        weights: vec![[0.25; 4]],
        bone_indices: vec![[-1.0, 65537.0, 3.7, f32::NAN]],
    };
    assert_eq!(skin.joint_indices(), vec![[65535, 1, 3, 0]]);

    let skin = SkinData {
        weights: vec![[0.25; 4]],
        bone_indices: vec![[-0.5, f32::INFINITY, -65536.0, 1e20]],
    };
    assert_eq!(skin.joint_indices(), vec![[0, 0, 0, 0]]);
}

#[test]
fn test_writer_output_decodes_to_same_asset() {
    let asset = SgmAsset {
        version: SgmVersion { major: 3, minor: 1 },
        materials: vec![Material {
            id: 4,
            uv_slots: vec![vec![TextureRef {
                path: "visor.png".to_string(),
                usage_hint: 2,
            }]],
            color_slots: vec![
                ColorSlot {
                    rgba: [0.2, 0.4, 0.6, 1.0],
                    color_id: 1,
                },
                ColorSlot {
                    rgba: [1.0, 1.0, 1.0, 0.5],
                    color_id: 2,
                },
            ],
        }],
        meshes: vec![Mesh {
            id: 1,
            material_id: 4,
            vertex_count: 2,
            positions: vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]],
            normals: vec![[0.0, 0.0, 1.0]; 2],
            uvs: vec![[0.0, 0.0], [1.0, 1.0]],
            colors: Some(vec![[1.0, 0.0, 0.0, 1.0]; 2]),
            tangents: None,
            skin: Some(SkinData {
                weights: vec![[1.0, 0.0, 0.0, 0.0]; 2],
                bone_indices: vec![[0.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]],
            }),
            indices: IndexBuffer::U32(vec![0, 1, 0]),
        }],
        animation_reference: Some("visor.*".to_string()),
    };

    let bytes = asset.to_bytes().unwrap();
    assert_eq!(decode_sgm(&bytes).unwrap(), asset);
}

#[test]
fn test_writer_rejects_mismatched_attribute_lengths() {
    let mut asset = decode_sgm(&triangle_sgm()).unwrap();
    asset.meshes[0].normals.pop();
    let err = asset.to_bytes().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

// ========================================================================
// Property Tests
// ========================================================================

proptest! {
    #[test]
    fn prop_arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_sgm(&data);
    }

    #[test]
    fn prop_truncated_triangle_is_an_error(cut in 0.0f64..1.0) {
        let data = triangle_sgm();
        let len = (data.len() as f64 * cut) as usize;
        prop_assert!(decode_sgm(&data[..len]).is_err());
    }
}
