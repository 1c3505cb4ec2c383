/// Q.931 4.5 Information element identifier, codeset 0
/// Single-octet elements carry their contents in the low nibble, which is masked off here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IeId {
    SegmentedMessage = 0x00,
    BearerCapability = 0x04,
    Cause = 0x08,
    CallIdentity = 0x10,
    CallState = 0x14,
    ChannelIdentification = 0x18,
    Facility = 0x1C,
    ProgressIndicator = 0x1E,
    NetworkSpecificFacilities = 0x20,
    NotificationIndicator = 0x27,
    Display = 0x28,
    DateTime = 0x29,
    KeypadFacility = 0x2C,
    Signal = 0x34,
    ConnectedNumber = 0x4C,
    ConnectedSubaddress = 0x4D,
    CallingPartyNumber = 0x6C,
    CallingPartySubaddress = 0x6D,
    CalledPartyNumber = 0x70,
    CalledPartySubaddress = 0x71,
    RedirectingNumber = 0x74,
    TransitNetworkSelection = 0x78,
    RestartIndicator = 0x79,
    LowLayerCompatibility = 0x7C,
    HighLayerCompatibility = 0x7D,
    UserUser = 0x7E,
    Shift = 0x90,
    MoreData = 0xA0,
    SendingComplete = 0xA1,
    CongestionLevel = 0xB0,
    RepeatIndicator = 0xD0,
}

impl std::convert::TryFrom<u64> for IeId {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(IeId::SegmentedMessage),
            0x04 => Ok(IeId::BearerCapability),
            0x08 => Ok(IeId::Cause),
            0x10 => Ok(IeId::CallIdentity),
            0x14 => Ok(IeId::CallState),
            0x18 => Ok(IeId::ChannelIdentification),
            0x1C => Ok(IeId::Facility),
            0x1E => Ok(IeId::ProgressIndicator),
            0x20 => Ok(IeId::NetworkSpecificFacilities),
            0x27 => Ok(IeId::NotificationIndicator),
            0x28 => Ok(IeId::Display),
            0x29 => Ok(IeId::DateTime),
            0x2C => Ok(IeId::KeypadFacility),
            0x34 => Ok(IeId::Signal),
            0x4C => Ok(IeId::ConnectedNumber),
            0x4D => Ok(IeId::ConnectedSubaddress),
            0x6C => Ok(IeId::CallingPartyNumber),
            0x6D => Ok(IeId::CallingPartySubaddress),
            0x70 => Ok(IeId::CalledPartyNumber),
            0x71 => Ok(IeId::CalledPartySubaddress),
            0x74 => Ok(IeId::RedirectingNumber),
            0x78 => Ok(IeId::TransitNetworkSelection),
            0x79 => Ok(IeId::RestartIndicator),
            0x7C => Ok(IeId::LowLayerCompatibility),
            0x7D => Ok(IeId::HighLayerCompatibility),
            0x7E => Ok(IeId::UserUser),
            0x90 => Ok(IeId::Shift),
            0xA0 => Ok(IeId::MoreData),
            0xA1 => Ok(IeId::SendingComplete),
            0xB0 => Ok(IeId::CongestionLevel),
            0xD0 => Ok(IeId::RepeatIndicator),
            _ => Err(()),
        }
    }
}

impl IeId {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            IeId::SegmentedMessage => 0x00,
            IeId::BearerCapability => 0x04,
            IeId::Cause => 0x08,
            IeId::CallIdentity => 0x10,
            IeId::CallState => 0x14,
            IeId::ChannelIdentification => 0x18,
            IeId::Facility => 0x1C,
            IeId::ProgressIndicator => 0x1E,
            IeId::NetworkSpecificFacilities => 0x20,
            IeId::NotificationIndicator => 0x27,
            IeId::Display => 0x28,
            IeId::DateTime => 0x29,
            IeId::KeypadFacility => 0x2C,
            IeId::Signal => 0x34,
            IeId::ConnectedNumber => 0x4C,
            IeId::ConnectedSubaddress => 0x4D,
            IeId::CallingPartyNumber => 0x6C,
            IeId::CallingPartySubaddress => 0x6D,
            IeId::CalledPartyNumber => 0x70,
            IeId::CalledPartySubaddress => 0x71,
            IeId::RedirectingNumber => 0x74,
            IeId::TransitNetworkSelection => 0x78,
            IeId::RestartIndicator => 0x79,
            IeId::LowLayerCompatibility => 0x7C,
            IeId::HighLayerCompatibility => 0x7D,
            IeId::UserUser => 0x7E,
            IeId::Shift => 0x90,
            IeId::MoreData => 0xA0,
            IeId::SendingComplete => 0xA1,
            IeId::CongestionLevel => 0xB0,
            IeId::RepeatIndicator => 0xD0,
        }
    }
}

impl From<IeId> for u64 {
    fn from(e: IeId) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for IeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IeId::SegmentedMessage => write!(f, "SegmentedMessage"),
            IeId::BearerCapability => write!(f, "BearerCapability"),
            IeId::Cause => write!(f, "Cause"),
            IeId::CallIdentity => write!(f, "CallIdentity"),
            IeId::CallState => write!(f, "CallState"),
            IeId::ChannelIdentification => write!(f, "ChannelIdentification"),
            IeId::Facility => write!(f, "Facility"),
            IeId::ProgressIndicator => write!(f, "ProgressIndicator"),
            IeId::NetworkSpecificFacilities => write!(f, "NetworkSpecificFacilities"),
            IeId::NotificationIndicator => write!(f, "NotificationIndicator"),
            IeId::Display => write!(f, "Display"),
            IeId::DateTime => write!(f, "DateTime"),
            IeId::KeypadFacility => write!(f, "KeypadFacility"),
            IeId::Signal => write!(f, "Signal"),
            IeId::ConnectedNumber => write!(f, "ConnectedNumber"),
            IeId::ConnectedSubaddress => write!(f, "ConnectedSubaddress"),
            IeId::CallingPartyNumber => write!(f, "CallingPartyNumber"),
            IeId::CallingPartySubaddress => write!(f, "CallingPartySubaddress"),
            IeId::CalledPartyNumber => write!(f, "CalledPartyNumber"),
            IeId::CalledPartySubaddress => write!(f, "CalledPartySubaddress"),
            IeId::RedirectingNumber => write!(f, "RedirectingNumber"),
            IeId::TransitNetworkSelection => write!(f, "TransitNetworkSelection"),
            IeId::RestartIndicator => write!(f, "RestartIndicator"),
            IeId::LowLayerCompatibility => write!(f, "LowLayerCompatibility"),
            IeId::HighLayerCompatibility => write!(f, "HighLayerCompatibility"),
            IeId::UserUser => write!(f, "UserUser"),
            IeId::Shift => write!(f, "Shift"),
            IeId::MoreData => write!(f, "MoreData"),
            IeId::SendingComplete => write!(f, "SendingComplete"),
            IeId::CongestionLevel => write!(f, "CongestionLevel"),
            IeId::RepeatIndicator => write!(f, "RepeatIndicator"),
        }
    }
}

impl IeId {
    /// Single-octet elements have bit 8 set and no length octet
    pub fn is_single_octet(self) -> bool {
        self.into_raw() & 0x80 != 0
    }

    /// Identifier octets 0000xxxx mark elements the receiver must comprehend
    pub fn is_comprehension_required(raw: u8) -> bool {
        raw & 0xF0 == 0
    }

    /// Strip the contents nibble from a single-octet element.
    /// Type 2 elements (1010xxxx) use the whole octet as identifier.
    pub fn single_octet_id(octet: u8) -> u8 {
        if octet & 0xF0 == 0xA0 { octet } else { octet & 0xF0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_octet_ids() {
        assert_eq!(IeId::single_octet_id(0x96), 0x90);
        assert_eq!(IeId::single_octet_id(0xA1), 0xA1);
        assert_eq!(IeId::single_octet_id(0xBF), 0xB0);
        assert!(IeId::Shift.is_single_octet());
        assert!(!IeId::Cause.is_single_octet());
        assert!(IeId::is_comprehension_required(IeId::BearerCapability.into_raw() as u8));
        assert!(!IeId::is_comprehension_required(IeId::Display.into_raw() as u8));
    }
}
