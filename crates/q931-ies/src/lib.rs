//! Q.931 information elements and message framing
//!
//! - `enums`: code points of the protocol fields
//! - `fields`: sub-structures shared by several elements (party numbers, layer information, ...)
//! - `ies`: one codec per information element kind and the `Ie` sum type
//! - `message`: call reference, element collection and whole-message encode/decode

pub mod enums;
pub mod fields;
pub mod ies;
pub mod message;

pub use ies::Ie;
pub use message::{CallRef, Ies, Q931Message};
