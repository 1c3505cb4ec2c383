pub mod call;
pub mod ces;

mod channels;
mod clearing;
mod messages;
mod primitives;
mod timers;

pub use call::{Call, CallId, CallTimer, network_state};
pub use ces::Ces;
