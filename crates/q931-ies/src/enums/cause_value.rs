/// Q.850 Cause values
/// Bits: 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CauseValue {
    UnallocatedNumber = 1,
    NoRouteToSpecifiedTransitNetwork = 2,
    NoRouteToDestination = 3,
    ChannelUnacceptable = 6,
    CallAwardedInEstablishedChannel = 7,
    Preemption = 8,
    PreemptionCircuitReserved = 9,
    NormalCallClearing = 16,
    UserBusy = 17,
    NoUserResponding = 18,
    NoAnswerFromUser = 19,
    CallRejected = 21,
    NumberChanged = 22,
    RedirectionToNewDestination = 23,
    ExchangeRoutingError = 25,
    NonSelectedUserClearing = 26,
    DestinationOutOfOrder = 27,
    InvalidNumberFormat = 28,
    FacilityRejected = 29,
    ResponseToStatusEnquiry = 30,
    NormalUnspecified = 31,
    NoCircuitChannelAvailable = 34,
    NetworkOutOfOrder = 38,
    TemporaryFailure = 41,
    SwitchingEquipmentCongestion = 42,
    AccessInformationDiscarded = 43,
    RequestedCircuitChannelNotAvailable = 44,
    ResourceUnavailableUnspecified = 47,
    QualityOfServiceNotAvailable = 49,
    RequestedFacilityNotSubscribed = 50,
    BearerCapabilityNotAuthorized = 57,
    BearerCapabilityNotPresentlyAvailable = 58,
    ServiceOrOptionNotAvailable = 63,
    BearerCapabilityNotImplemented = 65,
    ChannelTypeNotImplemented = 66,
    RequestedFacilityNotImplemented = 69,
    OnlyRestrictedDigitalInformationAvailable = 70,
    ServiceOrOptionNotImplemented = 79,
    InvalidCallReferenceValue = 81,
    IdentifiedChannelDoesNotExist = 82,
    SuspendedCallExistsButCallIdentityDoesNot = 83,
    CallIdentityInUse = 84,
    NoCallSuspended = 85,
    CallHavingRequestedCallIdentityCleared = 86,
    IncompatibleDestination = 88,
    InvalidTransitNetworkSelection = 91,
    InvalidMessageUnspecified = 95,
    MandatoryInformationElementMissing = 96,
    MessageTypeNonExistentOrNotImplemented = 97,
    MessageNotCompatibleWithCallStateOrNonExistent = 98,
    InformationElementNonExistentOrNotImplemented = 99,
    InvalidInformationElementContents = 100,
    MessageNotCompatibleWithCallState = 101,
    RecoveryOnTimerExpiry = 102,
    ProtocolErrorUnspecified = 111,
    InterworkingUnspecified = 127,
}

impl std::convert::TryFrom<u64> for CauseValue {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            1 => Ok(CauseValue::UnallocatedNumber),
            2 => Ok(CauseValue::NoRouteToSpecifiedTransitNetwork),
            3 => Ok(CauseValue::NoRouteToDestination),
            6 => Ok(CauseValue::ChannelUnacceptable),
            7 => Ok(CauseValue::CallAwardedInEstablishedChannel),
            8 => Ok(CauseValue::Preemption),
            9 => Ok(CauseValue::PreemptionCircuitReserved),
            16 => Ok(CauseValue::NormalCallClearing),
            17 => Ok(CauseValue::UserBusy),
            18 => Ok(CauseValue::NoUserResponding),
            19 => Ok(CauseValue::NoAnswerFromUser),
            21 => Ok(CauseValue::CallRejected),
            22 => Ok(CauseValue::NumberChanged),
            23 => Ok(CauseValue::RedirectionToNewDestination),
            25 => Ok(CauseValue::ExchangeRoutingError),
            26 => Ok(CauseValue::NonSelectedUserClearing),
            27 => Ok(CauseValue::DestinationOutOfOrder),
            28 => Ok(CauseValue::InvalidNumberFormat),
            29 => Ok(CauseValue::FacilityRejected),
            30 => Ok(CauseValue::ResponseToStatusEnquiry),
            31 => Ok(CauseValue::NormalUnspecified),
            34 => Ok(CauseValue::NoCircuitChannelAvailable),
            38 => Ok(CauseValue::NetworkOutOfOrder),
            41 => Ok(CauseValue::TemporaryFailure),
            42 => Ok(CauseValue::SwitchingEquipmentCongestion),
            43 => Ok(CauseValue::AccessInformationDiscarded),
            44 => Ok(CauseValue::RequestedCircuitChannelNotAvailable),
            47 => Ok(CauseValue::ResourceUnavailableUnspecified),
            49 => Ok(CauseValue::QualityOfServiceNotAvailable),
            50 => Ok(CauseValue::RequestedFacilityNotSubscribed),
            57 => Ok(CauseValue::BearerCapabilityNotAuthorized),
            58 => Ok(CauseValue::BearerCapabilityNotPresentlyAvailable),
            63 => Ok(CauseValue::ServiceOrOptionNotAvailable),
            65 => Ok(CauseValue::BearerCapabilityNotImplemented),
            66 => Ok(CauseValue::ChannelTypeNotImplemented),
            69 => Ok(CauseValue::RequestedFacilityNotImplemented),
            70 => Ok(CauseValue::OnlyRestrictedDigitalInformationAvailable),
            79 => Ok(CauseValue::ServiceOrOptionNotImplemented),
            81 => Ok(CauseValue::InvalidCallReferenceValue),
            82 => Ok(CauseValue::IdentifiedChannelDoesNotExist),
            83 => Ok(CauseValue::SuspendedCallExistsButCallIdentityDoesNot),
            84 => Ok(CauseValue::CallIdentityInUse),
            85 => Ok(CauseValue::NoCallSuspended),
            86 => Ok(CauseValue::CallHavingRequestedCallIdentityCleared),
            88 => Ok(CauseValue::IncompatibleDestination),
            91 => Ok(CauseValue::InvalidTransitNetworkSelection),
            95 => Ok(CauseValue::InvalidMessageUnspecified),
            96 => Ok(CauseValue::MandatoryInformationElementMissing),
            97 => Ok(CauseValue::MessageTypeNonExistentOrNotImplemented),
            98 => Ok(CauseValue::MessageNotCompatibleWithCallStateOrNonExistent),
            99 => Ok(CauseValue::InformationElementNonExistentOrNotImplemented),
            100 => Ok(CauseValue::InvalidInformationElementContents),
            101 => Ok(CauseValue::MessageNotCompatibleWithCallState),
            102 => Ok(CauseValue::RecoveryOnTimerExpiry),
            111 => Ok(CauseValue::ProtocolErrorUnspecified),
            127 => Ok(CauseValue::InterworkingUnspecified),
            _ => Err(()),
        }
    }
}

impl CauseValue {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            CauseValue::UnallocatedNumber => 1,
            CauseValue::NoRouteToSpecifiedTransitNetwork => 2,
            CauseValue::NoRouteToDestination => 3,
            CauseValue::ChannelUnacceptable => 6,
            CauseValue::CallAwardedInEstablishedChannel => 7,
            CauseValue::Preemption => 8,
            CauseValue::PreemptionCircuitReserved => 9,
            CauseValue::NormalCallClearing => 16,
            CauseValue::UserBusy => 17,
            CauseValue::NoUserResponding => 18,
            CauseValue::NoAnswerFromUser => 19,
            CauseValue::CallRejected => 21,
            CauseValue::NumberChanged => 22,
            CauseValue::RedirectionToNewDestination => 23,
            CauseValue::ExchangeRoutingError => 25,
            CauseValue::NonSelectedUserClearing => 26,
            CauseValue::DestinationOutOfOrder => 27,
            CauseValue::InvalidNumberFormat => 28,
            CauseValue::FacilityRejected => 29,
            CauseValue::ResponseToStatusEnquiry => 30,
            CauseValue::NormalUnspecified => 31,
            CauseValue::NoCircuitChannelAvailable => 34,
            CauseValue::NetworkOutOfOrder => 38,
            CauseValue::TemporaryFailure => 41,
            CauseValue::SwitchingEquipmentCongestion => 42,
            CauseValue::AccessInformationDiscarded => 43,
            CauseValue::RequestedCircuitChannelNotAvailable => 44,
            CauseValue::ResourceUnavailableUnspecified => 47,
            CauseValue::QualityOfServiceNotAvailable => 49,
            CauseValue::RequestedFacilityNotSubscribed => 50,
            CauseValue::BearerCapabilityNotAuthorized => 57,
            CauseValue::BearerCapabilityNotPresentlyAvailable => 58,
            CauseValue::ServiceOrOptionNotAvailable => 63,
            CauseValue::BearerCapabilityNotImplemented => 65,
            CauseValue::ChannelTypeNotImplemented => 66,
            CauseValue::RequestedFacilityNotImplemented => 69,
            CauseValue::OnlyRestrictedDigitalInformationAvailable => 70,
            CauseValue::ServiceOrOptionNotImplemented => 79,
            CauseValue::InvalidCallReferenceValue => 81,
            CauseValue::IdentifiedChannelDoesNotExist => 82,
            CauseValue::SuspendedCallExistsButCallIdentityDoesNot => 83,
            CauseValue::CallIdentityInUse => 84,
            CauseValue::NoCallSuspended => 85,
            CauseValue::CallHavingRequestedCallIdentityCleared => 86,
            CauseValue::IncompatibleDestination => 88,
            CauseValue::InvalidTransitNetworkSelection => 91,
            CauseValue::InvalidMessageUnspecified => 95,
            CauseValue::MandatoryInformationElementMissing => 96,
            CauseValue::MessageTypeNonExistentOrNotImplemented => 97,
            CauseValue::MessageNotCompatibleWithCallStateOrNonExistent => 98,
            CauseValue::InformationElementNonExistentOrNotImplemented => 99,
            CauseValue::InvalidInformationElementContents => 100,
            CauseValue::MessageNotCompatibleWithCallState => 101,
            CauseValue::RecoveryOnTimerExpiry => 102,
            CauseValue::ProtocolErrorUnspecified => 111,
            CauseValue::InterworkingUnspecified => 127,
        }
    }
}

impl From<CauseValue> for u64 {
    fn from(e: CauseValue) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for CauseValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CauseValue::UnallocatedNumber => write!(f, "UnallocatedNumber"),
            CauseValue::NoRouteToSpecifiedTransitNetwork => write!(f, "NoRouteToSpecifiedTransitNetwork"),
            CauseValue::NoRouteToDestination => write!(f, "NoRouteToDestination"),
            CauseValue::ChannelUnacceptable => write!(f, "ChannelUnacceptable"),
            CauseValue::CallAwardedInEstablishedChannel => write!(f, "CallAwardedInEstablishedChannel"),
            CauseValue::Preemption => write!(f, "Preemption"),
            CauseValue::PreemptionCircuitReserved => write!(f, "PreemptionCircuitReserved"),
            CauseValue::NormalCallClearing => write!(f, "NormalCallClearing"),
            CauseValue::UserBusy => write!(f, "UserBusy"),
            CauseValue::NoUserResponding => write!(f, "NoUserResponding"),
            CauseValue::NoAnswerFromUser => write!(f, "NoAnswerFromUser"),
            CauseValue::CallRejected => write!(f, "CallRejected"),
            CauseValue::NumberChanged => write!(f, "NumberChanged"),
            CauseValue::RedirectionToNewDestination => write!(f, "RedirectionToNewDestination"),
            CauseValue::ExchangeRoutingError => write!(f, "ExchangeRoutingError"),
            CauseValue::NonSelectedUserClearing => write!(f, "NonSelectedUserClearing"),
            CauseValue::DestinationOutOfOrder => write!(f, "DestinationOutOfOrder"),
            CauseValue::InvalidNumberFormat => write!(f, "InvalidNumberFormat"),
            CauseValue::FacilityRejected => write!(f, "FacilityRejected"),
            CauseValue::ResponseToStatusEnquiry => write!(f, "ResponseToStatusEnquiry"),
            CauseValue::NormalUnspecified => write!(f, "NormalUnspecified"),
            CauseValue::NoCircuitChannelAvailable => write!(f, "NoCircuitChannelAvailable"),
            CauseValue::NetworkOutOfOrder => write!(f, "NetworkOutOfOrder"),
            CauseValue::TemporaryFailure => write!(f, "TemporaryFailure"),
            CauseValue::SwitchingEquipmentCongestion => write!(f, "SwitchingEquipmentCongestion"),
            CauseValue::AccessInformationDiscarded => write!(f, "AccessInformationDiscarded"),
            CauseValue::RequestedCircuitChannelNotAvailable => write!(f, "RequestedCircuitChannelNotAvailable"),
            CauseValue::ResourceUnavailableUnspecified => write!(f, "ResourceUnavailableUnspecified"),
            CauseValue::QualityOfServiceNotAvailable => write!(f, "QualityOfServiceNotAvailable"),
            CauseValue::RequestedFacilityNotSubscribed => write!(f, "RequestedFacilityNotSubscribed"),
            CauseValue::BearerCapabilityNotAuthorized => write!(f, "BearerCapabilityNotAuthorized"),
            CauseValue::BearerCapabilityNotPresentlyAvailable => write!(f, "BearerCapabilityNotPresentlyAvailable"),
            CauseValue::ServiceOrOptionNotAvailable => write!(f, "ServiceOrOptionNotAvailable"),
            CauseValue::BearerCapabilityNotImplemented => write!(f, "BearerCapabilityNotImplemented"),
            CauseValue::ChannelTypeNotImplemented => write!(f, "ChannelTypeNotImplemented"),
            CauseValue::RequestedFacilityNotImplemented => write!(f, "RequestedFacilityNotImplemented"),
            CauseValue::OnlyRestrictedDigitalInformationAvailable => write!(f, "OnlyRestrictedDigitalInformationAvailable"),
            CauseValue::ServiceOrOptionNotImplemented => write!(f, "ServiceOrOptionNotImplemented"),
            CauseValue::InvalidCallReferenceValue => write!(f, "InvalidCallReferenceValue"),
            CauseValue::IdentifiedChannelDoesNotExist => write!(f, "IdentifiedChannelDoesNotExist"),
            CauseValue::SuspendedCallExistsButCallIdentityDoesNot => write!(f, "SuspendedCallExistsButCallIdentityDoesNot"),
            CauseValue::CallIdentityInUse => write!(f, "CallIdentityInUse"),
            CauseValue::NoCallSuspended => write!(f, "NoCallSuspended"),
            CauseValue::CallHavingRequestedCallIdentityCleared => write!(f, "CallHavingRequestedCallIdentityCleared"),
            CauseValue::IncompatibleDestination => write!(f, "IncompatibleDestination"),
            CauseValue::InvalidTransitNetworkSelection => write!(f, "InvalidTransitNetworkSelection"),
            CauseValue::InvalidMessageUnspecified => write!(f, "InvalidMessageUnspecified"),
            CauseValue::MandatoryInformationElementMissing => write!(f, "MandatoryInformationElementMissing"),
            CauseValue::MessageTypeNonExistentOrNotImplemented => write!(f, "MessageTypeNonExistentOrNotImplemented"),
            CauseValue::MessageNotCompatibleWithCallStateOrNonExistent => write!(f, "MessageNotCompatibleWithCallStateOrNonExistent"),
            CauseValue::InformationElementNonExistentOrNotImplemented => write!(f, "InformationElementNonExistentOrNotImplemented"),
            CauseValue::InvalidInformationElementContents => write!(f, "InvalidInformationElementContents"),
            CauseValue::MessageNotCompatibleWithCallState => write!(f, "MessageNotCompatibleWithCallState"),
            CauseValue::RecoveryOnTimerExpiry => write!(f, "RecoveryOnTimerExpiry"),
            CauseValue::ProtocolErrorUnspecified => write!(f, "ProtocolErrorUnspecified"),
            CauseValue::InterworkingUnspecified => write!(f, "InterworkingUnspecified"),
        }
    }
}
