pub mod callref;
pub mod ies;
pub mod mandatory;
pub mod message;

pub use callref::CallRef;
pub use ies::Ies;
pub use message::{FrameErr, IeFault, PROTOCOL_DISCRIMINATOR_Q931, Q931Message};
