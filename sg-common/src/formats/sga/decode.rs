//! SGA decoder

use super::header::SgaHeader;
use super::types::{AnimationClip, Bone, FRAME_RECORD_SIZE, SgaAsset, Skeleton, Track};
use crate::cursor::ByteCursor;
use crate::error::{DecodeResult, DecodeWarning};
use crate::formats::name::Name;

/// Decode a complete SGA buffer.
///
/// Fatal problems (bad magic, unknown version, truncation, out-of-range child
/// index) abort with an error. Tracks that target unknown bones and clips left
/// without tracks are dropped; each drop is logged and recorded in
/// [`SgaAsset::warnings`].
pub fn decode_sga(data: &[u8]) -> DecodeResult<SgaAsset> {
    let mut cursor = ByteCursor::new(data);
    SgaHeader::read(&mut cursor)?;

    let name = read_name(&mut cursor)?;

    // Pass one: flat bone table
    let bone_count = cursor.read_u16()?;
    let mut bones = Vec::with_capacity(bone_count as usize);
    for _ in 0..bone_count {
        bones.push(read_bone(&mut cursor)?);
    }

    // Pass two: hierarchy edges
    let skeleton = Skeleton::from_bones(name, bones)?;

    let mut warnings = Vec::new();
    let animation_count = cursor.read_u16()?;
    let mut clips = Vec::new();
    for _ in 0..animation_count {
        if let Some(clip) = read_clip(&mut cursor, skeleton.len(), &mut warnings)? {
            clips.push(clip);
        }
    }

    tracing::debug!(
        "Decoded SGA '{}': {} bones, {} clips, {} warnings",
        skeleton.name,
        skeleton.len(),
        clips.len(),
        warnings.len()
    );

    Ok(SgaAsset {
        skeleton,
        clips,
        warnings,
    })
}

/// Names keep their stored bytes so padded fields survive a rewrite
fn read_name(cursor: &mut ByteCursor<'_>) -> DecodeResult<Name> {
    cursor.read_length_prefixed_bytes().map(Name::from_stored)
}

fn read_bone(cursor: &mut ByteCursor<'_>) -> DecodeResult<Bone> {
    let name = read_name(cursor)?;
    let position = cursor.read_f32s::<3>()?;
    let is_root = cursor.read_u8()? == 1;

    let child_count = cursor.read_u16()? as usize;
    cursor.ensure(child_count * 2)?;
    let children = (0..child_count)
        .map(|_| cursor.read_u16())
        .collect::<DecodeResult<Vec<_>>>()?;

    Ok(Bone {
        name,
        position,
        is_root,
        children,
    })
}

/// Read one animation. Returns `None` when no track survived.
fn read_clip(
    cursor: &mut ByteCursor<'_>,
    bone_count: usize,
    warnings: &mut Vec<DecodeWarning>,
) -> DecodeResult<Option<AnimationClip>> {
    let name = read_name(cursor)?;
    let affected_bones = cursor.read_u16()?;

    let mut tracks = Vec::with_capacity(affected_bones as usize);
    for _ in 0..affected_bones {
        let bone_id = cursor.read_u16()?;
        let frame_count = cursor.read_u32()?;
        let frame_bytes = (frame_count as usize).saturating_mul(FRAME_RECORD_SIZE);

        if bone_id as usize >= bone_count {
            // Consume the records anyway so the next track stays aligned
            cursor.skip(frame_bytes)?;
            push_warning(
                warnings,
                DecodeWarning::InvalidBoneReference {
                    animation: name.to_string(),
                    bone_id,
                    bone_count,
                    frame_count,
                },
            );
            continue;
        }

        cursor.ensure(frame_bytes)?;
        tracks.push(read_track(cursor, bone_id, frame_count as usize)?);
    }

    if tracks.is_empty() {
        push_warning(
            warnings,
            DecodeWarning::EmptyClip {
                animation: name.into_string(),
            },
        );
        return Ok(None);
    }

    Ok(Some(AnimationClip { name, tracks }))
}

fn read_track(cursor: &mut ByteCursor<'_>, bone: u16, frame_count: usize) -> DecodeResult<Track> {
    let mut track = Track {
        bone,
        frames: Vec::with_capacity(frame_count),
        positions: Vec::with_capacity(frame_count),
        scales: Vec::with_capacity(frame_count),
        rotations: Vec::with_capacity(frame_count),
    };

    for _ in 0..frame_count {
        track.frames.push(cursor.read_f32()?);
        let [x, y, z] = cursor.read_f32s::<3>()?;
        track.positions.push([-x, y, z]);
        track.scales.push(cursor.read_f32s::<3>()?);
        track.rotations.push(cursor.read_f32s::<4>()?);
    }

    Ok(track)
}

fn push_warning(warnings: &mut Vec<DecodeWarning>, warning: DecodeWarning) {
    tracing::warn!("{}", warning);
    warnings.push(warning);
}
