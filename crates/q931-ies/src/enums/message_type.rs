/// Q.931 4.4 Message type
/// Bits: 8 (bit 8 is reserved and always 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Alerting = 0x01,
    CallProceeding = 0x02,
    Progress = 0x03,
    Setup = 0x05,
    Connect = 0x07,
    SetupAcknowledge = 0x0D,
    ConnectAcknowledge = 0x0F,
    UserInformation = 0x20,
    SuspendReject = 0x21,
    ResumeReject = 0x22,
    Suspend = 0x25,
    Resume = 0x26,
    SuspendAcknowledge = 0x2D,
    ResumeAcknowledge = 0x2E,
    Disconnect = 0x45,
    Restart = 0x46,
    Release = 0x4D,
    RestartAcknowledge = 0x4E,
    ReleaseComplete = 0x5A,
    Segment = 0x60,
    Facility = 0x62,
    Notify = 0x6E,
    StatusEnquiry = 0x75,
    CongestionControl = 0x79,
    Information = 0x7B,
    Status = 0x7D,
}

impl std::convert::TryFrom<u64> for MessageType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x01 => Ok(MessageType::Alerting),
            0x02 => Ok(MessageType::CallProceeding),
            0x03 => Ok(MessageType::Progress),
            0x05 => Ok(MessageType::Setup),
            0x07 => Ok(MessageType::Connect),
            0x0D => Ok(MessageType::SetupAcknowledge),
            0x0F => Ok(MessageType::ConnectAcknowledge),
            0x20 => Ok(MessageType::UserInformation),
            0x21 => Ok(MessageType::SuspendReject),
            0x22 => Ok(MessageType::ResumeReject),
            0x25 => Ok(MessageType::Suspend),
            0x26 => Ok(MessageType::Resume),
            0x2D => Ok(MessageType::SuspendAcknowledge),
            0x2E => Ok(MessageType::ResumeAcknowledge),
            0x45 => Ok(MessageType::Disconnect),
            0x46 => Ok(MessageType::Restart),
            0x4D => Ok(MessageType::Release),
            0x4E => Ok(MessageType::RestartAcknowledge),
            0x5A => Ok(MessageType::ReleaseComplete),
            0x60 => Ok(MessageType::Segment),
            0x62 => Ok(MessageType::Facility),
            0x6E => Ok(MessageType::Notify),
            0x75 => Ok(MessageType::StatusEnquiry),
            0x79 => Ok(MessageType::CongestionControl),
            0x7B => Ok(MessageType::Information),
            0x7D => Ok(MessageType::Status),
            _ => Err(()),
        }
    }
}

impl MessageType {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            MessageType::Alerting => 0x01,
            MessageType::CallProceeding => 0x02,
            MessageType::Progress => 0x03,
            MessageType::Setup => 0x05,
            MessageType::Connect => 0x07,
            MessageType::SetupAcknowledge => 0x0D,
            MessageType::ConnectAcknowledge => 0x0F,
            MessageType::UserInformation => 0x20,
            MessageType::SuspendReject => 0x21,
            MessageType::ResumeReject => 0x22,
            MessageType::Suspend => 0x25,
            MessageType::Resume => 0x26,
            MessageType::SuspendAcknowledge => 0x2D,
            MessageType::ResumeAcknowledge => 0x2E,
            MessageType::Disconnect => 0x45,
            MessageType::Restart => 0x46,
            MessageType::Release => 0x4D,
            MessageType::RestartAcknowledge => 0x4E,
            MessageType::ReleaseComplete => 0x5A,
            MessageType::Segment => 0x60,
            MessageType::Facility => 0x62,
            MessageType::Notify => 0x6E,
            MessageType::StatusEnquiry => 0x75,
            MessageType::CongestionControl => 0x79,
            MessageType::Information => 0x7B,
            MessageType::Status => 0x7D,
        }
    }
}

impl From<MessageType> for u64 {
    fn from(e: MessageType) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for MessageType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MessageType::Alerting => write!(f, "Alerting"),
            MessageType::CallProceeding => write!(f, "CallProceeding"),
            MessageType::Progress => write!(f, "Progress"),
            MessageType::Setup => write!(f, "Setup"),
            MessageType::Connect => write!(f, "Connect"),
            MessageType::SetupAcknowledge => write!(f, "SetupAcknowledge"),
            MessageType::ConnectAcknowledge => write!(f, "ConnectAcknowledge"),
            MessageType::UserInformation => write!(f, "UserInformation"),
            MessageType::SuspendReject => write!(f, "SuspendReject"),
            MessageType::ResumeReject => write!(f, "ResumeReject"),
            MessageType::Suspend => write!(f, "Suspend"),
            MessageType::Resume => write!(f, "Resume"),
            MessageType::SuspendAcknowledge => write!(f, "SuspendAcknowledge"),
            MessageType::ResumeAcknowledge => write!(f, "ResumeAcknowledge"),
            MessageType::Disconnect => write!(f, "Disconnect"),
            MessageType::Restart => write!(f, "Restart"),
            MessageType::Release => write!(f, "Release"),
            MessageType::RestartAcknowledge => write!(f, "RestartAcknowledge"),
            MessageType::ReleaseComplete => write!(f, "ReleaseComplete"),
            MessageType::Segment => write!(f, "Segment"),
            MessageType::Facility => write!(f, "Facility"),
            MessageType::Notify => write!(f, "Notify"),
            MessageType::StatusEnquiry => write!(f, "StatusEnquiry"),
            MessageType::CongestionControl => write!(f, "CongestionControl"),
            MessageType::Information => write!(f, "Information"),
            MessageType::Status => write!(f, "Status"),
        }
    }
}

impl MessageType {
    /// Messages of the call clearing group, which the unknown call reference rules treat specially
    pub fn is_clearing(self) -> bool {
        matches!(self, MessageType::Disconnect | MessageType::Release | MessageType::ReleaseComplete)
    }
}
