//! Core utilities for the Q.931 stack
//!
//! This crate provides fundamental types and utilities used across the stack:
//! - BitBuffer for bit-level manipulation of information element octets
//! - Longtime microsecond timestamps and the Clock abstraction
//! - IeParseErr and the field-reading helper macros
//! - Logging setup and debug macros

pub mod bitbuffer;
pub mod debug;
pub mod direction;
pub mod ie_parse_error;
pub mod longtime;

// Re-export commonly used items
pub use bitbuffer::BitBuffer;
pub use direction::Direction;
pub use ie_parse_error::IeParseErr;
pub use longtime::{Clock, Longtime, ManualClock, SystemClock, longtime_now};
