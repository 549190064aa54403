//! Cross-file reference placeholders
//!
//! Filenames stored inside SGM files carry a literal `*` where the extension
//! belongs, e.g. `crate_diffuse.*` or `player_body.*`. The placeholder is
//! replaced by a fixed token when the reference is resolved: textures at decode
//! time, companion animations by the loader (which also needs the directory of
//! the model being loaded).

/// Extension token substituted into texture references
pub const TEXTURE_TOKEN: &str = "png";

/// Extension token substituted into companion animation references
pub const ANIMATION_TOKEN: &str = "sga";

/// Replace the first `*` in `name` with `token`.
///
/// Only the first occurrence is substituted; this is a format-level
/// placeholder, not a wildcard.
pub fn resolve_placeholder(name: &str, token: &str) -> String {
    name.replacen('*', token, 1)
}

/// Resolve a companion file reference relative to the model that named it.
///
/// The directory portion of `model_path` (up to and including the last `/`)
/// is prefixed to the resolved reference. A model path without a directory
/// yields the bare reference.
pub fn companion_path(model_path: &str, reference: &str, token: &str) -> String {
    let dir = model_path
        .rfind('/')
        .map_or("", |idx| &model_path[..=idx]);
    format!("{dir}{}", resolve_placeholder(reference, token))
}
