//! Q.931 / DSS1 call control
//!
//! `Q931Lib` owns the interfaces, calls, B-channels, data links and timers. The host
//! supplies a `Q931Transport`, feeds received frames to `Q931Lib::receive`, runs
//! `Q931Lib::run_timers` when `next_timer` says so, submits `Q931Primitive`s and drains
//! `Q931Indication`s with `next_indication`.

pub mod call;
pub mod ccb;
pub mod channel;
pub mod chanset;
pub mod dlc;
pub mod error;
pub mod global_call;
pub mod input;
pub mod intf;
pub mod output;
pub mod q931;
pub mod timer;
pub mod transport;

pub use call::{Call, CallId, CallTimer, Ces};
pub use ccb::{Q931Indication, Q931Primitive};
pub use channel::{Channel, ChannelState};
pub use chanset::Chanset;
pub use dlc::DlcStatus;
pub use error::{Q931Error, TransportErr};
pub use global_call::{GlobalCall, GlobalTimer, PeerRestart};
pub use intf::Intf;
pub use q931::{Q931Lib, TimerKey};
pub use transport::{ConnectStatus, DlcId, IntfId, Q931Transport, TEI_BROADCAST, TEI_P2P};
