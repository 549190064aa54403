//! SG binary asset formats
//!
//! - `.sgm` has no magic bytes. The caller picks the decoder from the file
//!   association, and the version tuple is kept but never checked.
//! - `.sga` starts with a 32-bit magic and an 8-bit version, both validated.
//!
//! Stored filenames use `*` as an extension placeholder; see [`reference`].

pub mod name;
pub mod reference;
pub mod sga;
pub mod sgm;

pub use name::Name;
pub use reference::*;
pub use sga::*;
pub use sgm::*;
