//! Attachment name matching
//!
//! Stored references on older leave requests do not always match the key of the
//! object actually stored: case differs, OCR swapped `0` for `o`, a suffix was
//! added or dropped. This module maps such a reference onto a store listing.

mod normalize;
mod resolver;
mod similarity;

pub use normalize::normalize;
pub use resolver::{resolve, MatchTier, MatchingConfig, Resolution};
pub use similarity::similarity;
