//! # xlclone-container
//!
//! Package-level I/O for the cloning pipeline: unpacking and repacking
//! zip-based workbook packages, plus scratch-directory management.
//!
//! The codec never interprets part contents beyond presence checks. Byte
//! fidelity is the contract: repacking the parts of an unpacked package
//! reproduces every part byte for byte, in the original order.

pub mod codec;
pub mod error;
pub mod scratch;

pub use codec::{pack_parts, pack_tree, unpack, Parts, CONTENT_TYPES_PART};
pub use error::{ContainerError, ContainerResult};
pub use scratch::{copy_tree, ScratchDir};
