/// Q.931 4.5.7 Call state value
/// Bits: 6. Values 0-25 are shared by user (Ux) and network (Nx) states, 61 and 62 are global call states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CallStateValue {
    Null = 0,
    CallInitiated = 1,
    OverlapSending = 2,
    OutgoingCallProceeding = 3,
    CallDelivered = 4,
    CallPresent = 6,
    CallReceived = 7,
    ConnectRequest = 8,
    IncomingCallProceeding = 9,
    Active = 10,
    DisconnectRequest = 11,
    DisconnectIndication = 12,
    SuspendRequest = 15,
    ResumeRequest = 17,
    ReleaseRequest = 19,
    CallAbort = 22,
    OverlapReceiving = 25,
    RestartRequest = 61,
    Restart = 62,
}

impl std::convert::TryFrom<u64> for CallStateValue {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(CallStateValue::Null),
            1 => Ok(CallStateValue::CallInitiated),
            2 => Ok(CallStateValue::OverlapSending),
            3 => Ok(CallStateValue::OutgoingCallProceeding),
            4 => Ok(CallStateValue::CallDelivered),
            6 => Ok(CallStateValue::CallPresent),
            7 => Ok(CallStateValue::CallReceived),
            8 => Ok(CallStateValue::ConnectRequest),
            9 => Ok(CallStateValue::IncomingCallProceeding),
            10 => Ok(CallStateValue::Active),
            11 => Ok(CallStateValue::DisconnectRequest),
            12 => Ok(CallStateValue::DisconnectIndication),
            15 => Ok(CallStateValue::SuspendRequest),
            17 => Ok(CallStateValue::ResumeRequest),
            19 => Ok(CallStateValue::ReleaseRequest),
            22 => Ok(CallStateValue::CallAbort),
            25 => Ok(CallStateValue::OverlapReceiving),
            61 => Ok(CallStateValue::RestartRequest),
            62 => Ok(CallStateValue::Restart),
            _ => Err(()),
        }
    }
}

impl CallStateValue {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            CallStateValue::Null => 0,
            CallStateValue::CallInitiated => 1,
            CallStateValue::OverlapSending => 2,
            CallStateValue::OutgoingCallProceeding => 3,
            CallStateValue::CallDelivered => 4,
            CallStateValue::CallPresent => 6,
            CallStateValue::CallReceived => 7,
            CallStateValue::ConnectRequest => 8,
            CallStateValue::IncomingCallProceeding => 9,
            CallStateValue::Active => 10,
            CallStateValue::DisconnectRequest => 11,
            CallStateValue::DisconnectIndication => 12,
            CallStateValue::SuspendRequest => 15,
            CallStateValue::ResumeRequest => 17,
            CallStateValue::ReleaseRequest => 19,
            CallStateValue::CallAbort => 22,
            CallStateValue::OverlapReceiving => 25,
            CallStateValue::RestartRequest => 61,
            CallStateValue::Restart => 62,
        }
    }
}

impl From<CallStateValue> for u64 {
    fn from(e: CallStateValue) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for CallStateValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CallStateValue::Null => write!(f, "Null"),
            CallStateValue::CallInitiated => write!(f, "CallInitiated"),
            CallStateValue::OverlapSending => write!(f, "OverlapSending"),
            CallStateValue::OutgoingCallProceeding => write!(f, "OutgoingCallProceeding"),
            CallStateValue::CallDelivered => write!(f, "CallDelivered"),
            CallStateValue::CallPresent => write!(f, "CallPresent"),
            CallStateValue::CallReceived => write!(f, "CallReceived"),
            CallStateValue::ConnectRequest => write!(f, "ConnectRequest"),
            CallStateValue::IncomingCallProceeding => write!(f, "IncomingCallProceeding"),
            CallStateValue::Active => write!(f, "Active"),
            CallStateValue::DisconnectRequest => write!(f, "DisconnectRequest"),
            CallStateValue::DisconnectIndication => write!(f, "DisconnectIndication"),
            CallStateValue::SuspendRequest => write!(f, "SuspendRequest"),
            CallStateValue::ResumeRequest => write!(f, "ResumeRequest"),
            CallStateValue::ReleaseRequest => write!(f, "ReleaseRequest"),
            CallStateValue::CallAbort => write!(f, "CallAbort"),
            CallStateValue::OverlapReceiving => write!(f, "OverlapReceiving"),
            CallStateValue::RestartRequest => write!(f, "RestartRequest"),
            CallStateValue::Restart => write!(f, "Restart"),
        }
    }
}

impl CallStateValue {
    /// States of the global call reference (restart procedure)
    pub fn is_global(self) -> bool {
        matches!(self, CallStateValue::RestartRequest | CallStateValue::Restart)
    }
}
