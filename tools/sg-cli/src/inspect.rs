//! Human-readable descriptions of decoded assets

use std::fmt::Write;

use sg_assets::LoadedModel;
use sg_common::{IndexBuffer, SgaAsset, SgmAsset};

pub fn sgm_summary(asset: &SgmAsset) -> String {
    format!(
        "SGM v{}.{}: {} materials, {} meshes, {} vertices{}",
        asset.version.major,
        asset.version.minor,
        asset.materials.len(),
        asset.meshes.len(),
        asset.meshes.iter().map(|m| m.vertex_count as u64).sum::<u64>(),
        match &asset.animation_reference {
            Some(name) => format!(", animation {}", name),
            None => String::new(),
        }
    )
}

pub fn sga_summary(asset: &SgaAsset) -> String {
    format!(
        "SGA '{}': {} bones, {} clips, {} warnings",
        asset.skeleton.name,
        asset.skeleton.len(),
        asset.clips.len(),
        asset.warnings.len()
    )
}

pub fn describe_sgm(asset: &SgmAsset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", sgm_summary(asset));

    for material in &asset.materials {
        let _ = writeln!(
            out,
            "  material {}: {} uv slots, {} colors, base color {}",
            material.id,
            material.uv_slots.len(),
            material.color_slots.len(),
            material
                .base_color()
                .map_or_else(|| "none".to_string(), |c| format!("{:?}", c))
        );
        for texture in material.textures() {
            let _ = writeln!(out, "    texture {} (usage {})", texture.path, texture.usage_hint);
        }
    }

    for mesh in &asset.meshes {
        let mut attributes = vec!["position", "normal", "uv"];
        if mesh.has_colors() {
            attributes.push("color");
        }
        if mesh.tangents.is_some() {
            attributes.push("tangent");
        }
        if mesh.is_skinned() {
            attributes.push("skin");
        }
        let width = match mesh.indices {
            IndexBuffer::U16(_) => 16,
            IndexBuffer::U32(_) => 32,
        };
        let _ = writeln!(
            out,
            "  mesh {}: material {}, {} vertices, {} indices ({}-bit), [{}]",
            mesh.id,
            mesh.material_id,
            mesh.vertex_count,
            mesh.indices.len(),
            width,
            attributes.join(", ")
        );
    }

    out
}

pub fn describe_sga(asset: &SgaAsset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", sga_summary(asset));

    let skeleton = &asset.skeleton;
    for (i, bone) in skeleton.bones().iter().enumerate() {
        let _ = writeln!(
            out,
            "  bone {} '{}'{}: position {:?}, children {:?}",
            i,
            bone.name,
            if bone.is_root { " (root)" } else { "" },
            bone.position,
            bone.children
        );
    }

    for clip in &asset.clips {
        let _ = writeln!(
            out,
            "  clip '{}': {} tracks, {:.3}s",
            clip.name,
            clip.tracks.len(),
            clip.duration()
        );
    }

    for warning in &asset.warnings {
        let _ = writeln!(out, "  warning: {}", warning);
    }

    out
}

pub fn describe_model(model: &LoadedModel) -> String {
    let bundle = &model.bundle;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} materials, {} meshes ({} skinned), {} clips",
        model.mesh_path,
        bundle.materials.len(),
        bundle.meshes.len(),
        bundle.skinned_meshes().count(),
        bundle.clips.len()
    );

    match (&model.animation_path, &bundle.rig) {
        (Some(path), Some(rig)) => {
            let _ = writeln!(
                out,
                "  animation {}: skeleton '{}', {} bones, roots {:?}",
                path,
                rig.name,
                rig.bones.len(),
                rig.roots
            );
        }
        (Some(path), None) => {
            let _ = writeln!(out, "  animation {}: unavailable, loaded static", path);
        }
        (None, _) => {
            let _ = writeln!(out, "  static model");
        }
    }

    for mesh in &bundle.meshes {
        let material = bundle.material_for(mesh);
        let _ = writeln!(
            out,
            "  mesh {}: material {} {:?}, {} vertices{}",
            mesh.mesh_id,
            material
                .id
                .map_or_else(|| "default".to_string(), |id| id.to_string()),
            material.base_color.to_array(),
            mesh.geometry.vertex_count(),
            if mesh.skin.is_some() { ", skinned" } else { "" }
        );
    }

    for warning in &model.warnings {
        let _ = writeln!(out, "  warning: {}", warning);
    }
    for warning in &bundle.warnings {
        let _ = writeln!(out, "  warning: {}", warning);
    }

    out
}
