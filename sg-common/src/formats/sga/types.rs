//! SGA data model

use serde::Serialize;

use crate::error::{DecodeError, DecodeResult, DecodeWarning};
use crate::formats::name::Name;

/// Stored frame numbers are divided by this to get seconds
pub const CLIP_FRAME_RATE: f32 = 60.0;

/// Bytes per keyframe record: time(4) + position(12) + scale(12) + rotation(16)
pub const FRAME_RECORD_SIZE: usize = 44;

/// One entry of the skeleton's flat bone table.
///
/// At bind time a bone has identity orientation and unit scale; only the
/// local position is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bone {
    pub name: Name,
    /// Local position exactly as stored. Exporter space has a flipped first
    /// axis; see [`Bone::exporter_position`].
    pub position: [f32; 3],
    pub is_root: bool,
    /// Child bone indices in declaration order
    pub children: Vec<u16>,
}

impl Bone {
    /// Position in the exporter's coordinate space (first axis negated).
    ///
    /// Tools re-exporting a skeleton for the original pipeline must write
    /// this rather than [`Bone::position`].
    pub fn exporter_position(&self) -> [f32; 3] {
        let [x, y, z] = self.position;
        [-x, y, z]
    }
}

/// Bone hierarchy stored as an arena.
///
/// Bones are addressed by their index in the file. Edges live in each bone's
/// `children` list plus a parent table derived from them; no bone owns another.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Skeleton {
    pub name: Name,
    bones: Vec<Bone>,
    parents: Vec<Option<u16>>,
}

impl Skeleton {
    /// Build the hierarchy from a complete bone table.
    ///
    /// Every child index must be below the bone count, and the table holds at
    /// most 65535 bones. Multiple parents and cycles are accepted: the parent
    /// table keeps the last declaration and child lists are kept exactly as
    /// stored.
    pub fn from_bones(name: impl Into<Name>, bones: Vec<Bone>) -> DecodeResult<Self> {
        let bone_count = bones.len();
        if u16::try_from(bone_count).is_err() {
            return Err(DecodeError::TooManyBones { count: bone_count });
        }
        let mut parents = vec![None; bone_count];

        for (index, bone) in bones.iter().enumerate() {
            for &child in &bone.children {
                let slot = parents
                    .get_mut(child as usize)
                    .ok_or(DecodeError::CorruptHierarchy {
                        bone: index,
                        child,
                        bone_count,
                    })?;
                // Checked above
                *slot = Some(index as u16);
            }
        }

        Ok(Self {
            name: name.into(),
            bones,
            parents,
        })
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// Index of the bone with the given name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Parent of `index`, if any bone declares it as a child
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten().map(usize::from)
    }

    pub fn children(&self, index: usize) -> &[u16] {
        self.bones
            .get(index)
            .map(|b| b.children.as_slice())
            .unwrap_or(&[])
    }

    /// Indices of bones flagged as roots.
    ///
    /// Roots come from the stored flag, not from the absence of a parent.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_root)
            .map(|(i, _)| i)
    }

    pub fn into_bones(self) -> Vec<Bone> {
        self.bones
    }
}

/// Keyframes for a single bone.
///
/// All channels have one entry per frame and share the same time base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    /// Index into the skeleton's bone table
    pub bone: u16,
    /// Frame numbers as stored; see [`Track::time`]
    pub frames: Vec<f32>,
    /// Positions with the first axis already negated
    pub positions: Vec<[f32; 3]>,
    pub scales: Vec<[f32; 3]>,
    /// Quaternions in (x, y, z, w) order, not renormalized
    pub rotations: Vec<[f32; 4]>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sample time in seconds
    pub fn time(&self, frame: usize) -> Option<f32> {
        self.frames.get(frame).map(|f| f / CLIP_FRAME_RATE)
    }

    /// Sample times in seconds
    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        self.frames.iter().map(|f| f / CLIP_FRAME_RATE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationClip {
    pub name: Name,
    /// Never empty for a decoded clip
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Largest sample time across all tracks, in seconds
    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .flat_map(Track::times)
            .fold(0.0, f32::max)
    }

    pub fn track_for_bone(&self, bone: u16) -> Option<&Track> {
        self.tracks.iter().find(|t| t.bone == bone)
    }
}

/// Decoded SGA file
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SgaAsset {
    pub skeleton: Skeleton,
    pub clips: Vec<AnimationClip>,
    /// Recoverable problems met while decoding, in stream order
    pub warnings: Vec<DecodeWarning>,
}

impl SgaAsset {
    pub fn find_clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Serialize with the writer
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut out = Vec::new();
        super::write_sga(&mut out, self)?;
        Ok(out)
    }
}
