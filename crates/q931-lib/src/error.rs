use thiserror::Error;

use q931_core::IeParseErr;
use q931_ies::enums::{call_state_value::CallStateValue, cause_value::CauseValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportErr {
    #[error("data link is down")]
    LinkDown,

    #[error("transport error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Q931Error {
    #[error("unknown interface {0}")]
    UnknownInterface(usize),

    #[error("unknown call {0}")]
    UnknownCall(u32),

    /// Primitive not allowed in the current call state. Nothing was transmitted.
    #[error("primitive not compatible with call state {state} (cause {})", .cause.into_raw())]
    IncompatibleState { state: CallStateValue, cause: CauseValue },

    #[error("no B-channel available")]
    NoChannelAvailable,

    #[error("requested B-channel not available")]
    ChannelUnavailable,

    #[error("no free call reference")]
    NoCallReference,

    #[error(transparent)]
    Transport(#[from] TransportErr),

    #[error("encoding failed: {0}")]
    Encode(#[from] IeParseErr),

    #[error("configuration: {0}")]
    Config(String),
}

impl Q931Error {
    pub fn incompatible(state: CallStateValue) -> Self {
        Q931Error::IncompatibleState { state, cause: CauseValue::MessageNotCompatibleWithCallState }
    }
}

pub type Result<T> = core::result::Result<T, Q931Error>;
