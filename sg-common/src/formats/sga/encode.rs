//! SGA writer
//!
//! The inverse of [`decode_sga`](super::decode_sga): bone positions are
//! written as stored, track positions get their first axis negated back, and
//! frame numbers are written verbatim. Names are written from their stored
//! bytes, NUL padding included. Any buffer that decodes without warnings is
//! reproduced byte for byte, provided its root flags are 0 or 1.

use std::io::{self, Write};

use super::header::SgaHeader;
use super::types::{AnimationClip, Bone, SgaAsset, Track};
use crate::formats::name::Name;
use crate::formats::sgm::{invalid_input, write_f32s};

/// Write a complete SGA file
pub fn write_sga<W: Write>(w: &mut W, asset: &SgaAsset) -> io::Result<()> {
    w.write_all(&SgaHeader::new().to_bytes())?;

    let skeleton = &asset.skeleton;
    write_name(w, &skeleton.name)?;
    w.write_all(&count_u16(skeleton.len(), "bones")?.to_le_bytes())?;
    for bone in skeleton.bones() {
        write_bone(w, bone)?;
    }

    w.write_all(&count_u16(asset.clips.len(), "animations")?.to_le_bytes())?;
    for clip in &asset.clips {
        write_clip(w, clip)?;
    }

    Ok(())
}

fn write_bone<W: Write>(w: &mut W, bone: &Bone) -> io::Result<()> {
    write_name(w, &bone.name)?;
    write_f32s(w, &bone.position)?;
    w.write_all(&[bone.is_root as u8])?;
    w.write_all(&count_u16(bone.children.len(), "children")?.to_le_bytes())?;
    for child in &bone.children {
        w.write_all(&child.to_le_bytes())?;
    }
    Ok(())
}

fn write_clip<W: Write>(w: &mut W, clip: &AnimationClip) -> io::Result<()> {
    write_name(w, &clip.name)?;
    w.write_all(&count_u16(clip.tracks.len(), "tracks")?.to_le_bytes())?;
    for track in &clip.tracks {
        write_track(w, track)?;
    }
    Ok(())
}

fn write_track<W: Write>(w: &mut W, track: &Track) -> io::Result<()> {
    let frames = track.frames.len();
    if track.positions.len() != frames
        || track.scales.len() != frames
        || track.rotations.len() != frames
    {
        return Err(invalid_input(format!(
            "track for bone {} has mismatched channel lengths",
            track.bone
        )));
    }
    let frame_count = u32::try_from(frames)
        .map_err(|_| invalid_input(format!("{frames} frames exceeds u32")))?;

    w.write_all(&track.bone.to_le_bytes())?;
    w.write_all(&frame_count.to_le_bytes())?;
    let samples = track
        .frames
        .iter()
        .zip(&track.positions)
        .zip(&track.scales)
        .zip(&track.rotations);
    for (((&frame, &[x, y, z]), scale), rotation) in samples {
        write_f32s(w, &[frame, -x, y, z])?;
        write_f32s(w, scale)?;
        write_f32s(w, rotation)?;
    }
    Ok(())
}

fn write_name<W: Write>(w: &mut W, name: &Name) -> io::Result<()> {
    let bytes = name.stored_bytes();
    w.write_all(&count_u16(bytes.len(), "name bytes")?.to_le_bytes())?;
    w.write_all(bytes)
}

fn count_u16(len: usize, what: &str) -> io::Result<u16> {
    u16::try_from(len).map_err(|_| invalid_input(format!("{len} {what} (max 65535)")))
}
