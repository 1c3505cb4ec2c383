pub mod bearer_capability;
pub mod call_identity;
pub mod call_state;
pub mod cause;
pub mod channel_identification;
pub mod date_time;
pub mod display;
pub mod facility;
pub mod high_layer_compatibility;
pub mod keypad_facility;
pub mod low_layer_compatibility;
pub mod network_specific_facilities;
pub mod notification_indicator;
pub mod party_numbers;
pub mod progress_indicator;
pub mod restart_indicator;
pub mod segmented_message;
pub mod signal;
pub mod single_octet;
pub mod subaddresses;
pub mod transit_network_selection;
pub mod user_user;

use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::enums::ie_id::IeId;

pub use bearer_capability::BearerCapability;
pub use call_identity::CallIdentity;
pub use call_state::CallState;
pub use cause::Cause;
pub use channel_identification::{ChannelIdentification, ChannelInterfaceType, ChannelSelection};
pub use date_time::DateTime;
pub use display::Display;
pub use facility::Facility;
pub use high_layer_compatibility::HighLayerCompatibility;
pub use keypad_facility::KeypadFacility;
pub use low_layer_compatibility::LowLayerCompatibility;
pub use network_specific_facilities::NetworkSpecificFacilities;
pub use notification_indicator::NotificationIndicator;
pub use party_numbers::{CalledPartyNumber, CallingPartyNumber, ConnectedNumber, RedirectingNumber};
pub use progress_indicator::ProgressIndicator;
pub use restart_indicator::RestartIndicator;
pub use segmented_message::SegmentedMessage;
pub use signal::Signal;
pub use single_octet::{CongestionLevel, MoreData, RepeatIndicator, SendingComplete, Shift};
pub use subaddresses::{CalledPartySubaddress, CallingPartySubaddress, ConnectedSubaddress};
pub use transit_network_selection::TransitNetworkSelection;
pub use user_user::UserUser;

/// Largest content length a variable-length element can announce
pub const IE_MAX_CONTENT_LEN: usize = 0xFF;

/// One decoded information element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ie {
    SegmentedMessage(SegmentedMessage),
    BearerCapability(BearerCapability),
    Cause(Cause),
    CallIdentity(CallIdentity),
    CallState(CallState),
    ChannelIdentification(ChannelIdentification),
    Facility(Facility),
    ProgressIndicator(ProgressIndicator),
    NetworkSpecificFacilities(NetworkSpecificFacilities),
    NotificationIndicator(NotificationIndicator),
    Display(Display),
    DateTime(DateTime),
    KeypadFacility(KeypadFacility),
    Signal(Signal),
    ConnectedNumber(ConnectedNumber),
    ConnectedSubaddress(ConnectedSubaddress),
    CallingPartyNumber(CallingPartyNumber),
    CallingPartySubaddress(CallingPartySubaddress),
    CalledPartyNumber(CalledPartyNumber),
    CalledPartySubaddress(CalledPartySubaddress),
    RedirectingNumber(RedirectingNumber),
    TransitNetworkSelection(TransitNetworkSelection),
    RestartIndicator(RestartIndicator),
    LowLayerCompatibility(LowLayerCompatibility),
    HighLayerCompatibility(HighLayerCompatibility),
    UserUser(UserUser),
    Shift(Shift),
    MoreData(MoreData),
    SendingComplete(SendingComplete),
    CongestionLevel(CongestionLevel),
    RepeatIndicator(RepeatIndicator),
    /// Element from another codeset, or with an identifier this stack does not implement.
    /// For single-octet elements `data` holds the octet itself.
    Unknown { codeset: u8, id: u8, data: Vec<u8> },
}

impl Ie {
    /// Kind of this element, None for `Ie::Unknown`
    pub fn ie_id(&self) -> Option<IeId> {
        Some(match self {
            Ie::SegmentedMessage(_) => IeId::SegmentedMessage,
            Ie::BearerCapability(_) => IeId::BearerCapability,
            Ie::Cause(_) => IeId::Cause,
            Ie::CallIdentity(_) => IeId::CallIdentity,
            Ie::CallState(_) => IeId::CallState,
            Ie::ChannelIdentification(_) => IeId::ChannelIdentification,
            Ie::Facility(_) => IeId::Facility,
            Ie::ProgressIndicator(_) => IeId::ProgressIndicator,
            Ie::NetworkSpecificFacilities(_) => IeId::NetworkSpecificFacilities,
            Ie::NotificationIndicator(_) => IeId::NotificationIndicator,
            Ie::Display(_) => IeId::Display,
            Ie::DateTime(_) => IeId::DateTime,
            Ie::KeypadFacility(_) => IeId::KeypadFacility,
            Ie::Signal(_) => IeId::Signal,
            Ie::ConnectedNumber(_) => IeId::ConnectedNumber,
            Ie::ConnectedSubaddress(_) => IeId::ConnectedSubaddress,
            Ie::CallingPartyNumber(_) => IeId::CallingPartyNumber,
            Ie::CallingPartySubaddress(_) => IeId::CallingPartySubaddress,
            Ie::CalledPartyNumber(_) => IeId::CalledPartyNumber,
            Ie::CalledPartySubaddress(_) => IeId::CalledPartySubaddress,
            Ie::RedirectingNumber(_) => IeId::RedirectingNumber,
            Ie::TransitNetworkSelection(_) => IeId::TransitNetworkSelection,
            Ie::RestartIndicator(_) => IeId::RestartIndicator,
            Ie::LowLayerCompatibility(_) => IeId::LowLayerCompatibility,
            Ie::HighLayerCompatibility(_) => IeId::HighLayerCompatibility,
            Ie::UserUser(_) => IeId::UserUser,
            Ie::Shift(_) => IeId::Shift,
            Ie::MoreData(_) => IeId::MoreData,
            Ie::SendingComplete(_) => IeId::SendingComplete,
            Ie::CongestionLevel(_) => IeId::CongestionLevel,
            Ie::RepeatIndicator(_) => IeId::RepeatIndicator,
            Ie::Unknown { .. } => return None,
        })
    }

    /// Raw identifier, with the contents nibble of type 1 single-octet elements masked off
    pub fn id(&self) -> u8 {
        match self {
            Ie::Unknown { id, .. } => *id,
            _ => self.ie_id().map(|id| id.into_raw() as u8).unwrap_or(0),
        }
    }

    pub fn codeset(&self) -> u8 {
        match self {
            Ie::Unknown { codeset, .. } => *codeset,
            _ => 0,
        }
    }

    pub fn is_single_octet(&self) -> bool {
        self.id() & 0x80 != 0
    }

    /// Decode one element. `data` is the contents after the identifier and length octets,
    /// or the element octet itself for single-octet elements.
    /// Elements outside codeset 0 and unimplemented identifiers decode to `Ie::Unknown`.
    pub fn read_from_buf(id: u8, codeset: u8, data: &[u8]) -> Result<Ie, IeParseErr> {
        let unknown = || Ie::Unknown { codeset, id, data: data.to_vec() };
        if codeset != 0 {
            return Ok(unknown());
        }
        let Ok(kind) = IeId::try_from(id as u64) else {
            return Ok(unknown());
        };

        let mut buf = BitBuffer::from_bytes(data);
        let buffer = &mut buf;
        let ie = match kind {
            IeId::SegmentedMessage => Ie::SegmentedMessage(SegmentedMessage::from_bitbuf(buffer)?),
            IeId::BearerCapability => Ie::BearerCapability(BearerCapability::from_bitbuf(buffer)?),
            IeId::Cause => Ie::Cause(Cause::from_bitbuf(buffer)?),
            IeId::CallIdentity => Ie::CallIdentity(CallIdentity::from_bitbuf(buffer)?),
            IeId::CallState => Ie::CallState(CallState::from_bitbuf(buffer)?),
            IeId::ChannelIdentification => Ie::ChannelIdentification(ChannelIdentification::from_bitbuf(buffer)?),
            IeId::Facility => Ie::Facility(Facility::from_bitbuf(buffer)?),
            IeId::ProgressIndicator => Ie::ProgressIndicator(ProgressIndicator::from_bitbuf(buffer)?),
            IeId::NetworkSpecificFacilities => Ie::NetworkSpecificFacilities(NetworkSpecificFacilities::from_bitbuf(buffer)?),
            IeId::NotificationIndicator => Ie::NotificationIndicator(NotificationIndicator::from_bitbuf(buffer)?),
            IeId::Display => Ie::Display(Display::from_bitbuf(buffer)?),
            IeId::DateTime => Ie::DateTime(DateTime::from_bitbuf(buffer)?),
            IeId::KeypadFacility => Ie::KeypadFacility(KeypadFacility::from_bitbuf(buffer)?),
            IeId::Signal => Ie::Signal(Signal::from_bitbuf(buffer)?),
            IeId::ConnectedNumber => Ie::ConnectedNumber(ConnectedNumber::from_bitbuf(buffer)?),
            IeId::ConnectedSubaddress => Ie::ConnectedSubaddress(ConnectedSubaddress::from_bitbuf(buffer)?),
            IeId::CallingPartyNumber => Ie::CallingPartyNumber(CallingPartyNumber::from_bitbuf(buffer)?),
            IeId::CallingPartySubaddress => Ie::CallingPartySubaddress(CallingPartySubaddress::from_bitbuf(buffer)?),
            IeId::CalledPartyNumber => Ie::CalledPartyNumber(CalledPartyNumber::from_bitbuf(buffer)?),
            IeId::CalledPartySubaddress => Ie::CalledPartySubaddress(CalledPartySubaddress::from_bitbuf(buffer)?),
            IeId::RedirectingNumber => Ie::RedirectingNumber(RedirectingNumber::from_bitbuf(buffer)?),
            IeId::TransitNetworkSelection => Ie::TransitNetworkSelection(TransitNetworkSelection::from_bitbuf(buffer)?),
            IeId::RestartIndicator => Ie::RestartIndicator(RestartIndicator::from_bitbuf(buffer)?),
            IeId::LowLayerCompatibility => Ie::LowLayerCompatibility(LowLayerCompatibility::from_bitbuf(buffer)?),
            IeId::HighLayerCompatibility => Ie::HighLayerCompatibility(HighLayerCompatibility::from_bitbuf(buffer)?),
            IeId::UserUser => Ie::UserUser(UserUser::from_bitbuf(buffer)?),
            IeId::Shift => Ie::Shift(Shift::from_bitbuf(buffer)?),
            IeId::MoreData => Ie::MoreData(MoreData::from_bitbuf(buffer)?),
            IeId::SendingComplete => Ie::SendingComplete(SendingComplete::from_bitbuf(buffer)?),
            IeId::CongestionLevel => Ie::CongestionLevel(CongestionLevel::from_bitbuf(buffer)?),
            IeId::RepeatIndicator => Ie::RepeatIndicator(RepeatIndicator::from_bitbuf(buffer)?),
        };

        let left = buffer.get_len_remaining_octets();
        if left > 0 {
            // Later protocol revisions may append octets; they are not an error
            tracing::debug!("ignoring {} trailing octets in {}", left, kind);
        }
        Ok(ie)
    }

    /// Encode this element including its identifier and length octets.
    /// Returns the number of octets written.
    pub fn write_to_buf(&self, buffer: &mut BitBuffer) -> Result<usize, IeParseErr> {
        if self.is_single_octet() {
            match self {
                Ie::Shift(ie) => ie.to_bitbuf(buffer)?,
                Ie::MoreData(ie) => ie.to_bitbuf(buffer)?,
                Ie::SendingComplete(ie) => ie.to_bitbuf(buffer)?,
                Ie::CongestionLevel(ie) => ie.to_bitbuf(buffer)?,
                Ie::RepeatIndicator(ie) => ie.to_bitbuf(buffer)?,
                Ie::Unknown { data, .. } => match data.as_slice() {
                    [octet] => buffer.write_bits(*octet as u64, 8),
                    _ => return Err(IeParseErr::InconsistentLength { expected: 1, found: data.len() }),
                },
                _ => return Err(IeParseErr::InvalidElemId { found: self.id() as u64 }),
            }
            return Ok(1);
        }

        let mut content = BitBuffer::new_autoexpand(64);
        let c = &mut content;
        match self {
            Ie::SegmentedMessage(ie) => ie.to_bitbuf(c)?,
            Ie::BearerCapability(ie) => ie.to_bitbuf(c)?,
            Ie::Cause(ie) => ie.to_bitbuf(c)?,
            Ie::CallIdentity(ie) => ie.to_bitbuf(c)?,
            Ie::CallState(ie) => ie.to_bitbuf(c)?,
            Ie::ChannelIdentification(ie) => ie.to_bitbuf(c)?,
            Ie::Facility(ie) => ie.to_bitbuf(c)?,
            Ie::ProgressIndicator(ie) => ie.to_bitbuf(c)?,
            Ie::NetworkSpecificFacilities(ie) => ie.to_bitbuf(c)?,
            Ie::NotificationIndicator(ie) => ie.to_bitbuf(c)?,
            Ie::Display(ie) => ie.to_bitbuf(c)?,
            Ie::DateTime(ie) => ie.to_bitbuf(c)?,
            Ie::KeypadFacility(ie) => ie.to_bitbuf(c)?,
            Ie::Signal(ie) => ie.to_bitbuf(c)?,
            Ie::ConnectedNumber(ie) => ie.to_bitbuf(c)?,
            Ie::ConnectedSubaddress(ie) => ie.to_bitbuf(c)?,
            Ie::CallingPartyNumber(ie) => ie.to_bitbuf(c)?,
            Ie::CallingPartySubaddress(ie) => ie.to_bitbuf(c)?,
            Ie::CalledPartyNumber(ie) => ie.to_bitbuf(c)?,
            Ie::CalledPartySubaddress(ie) => ie.to_bitbuf(c)?,
            Ie::RedirectingNumber(ie) => ie.to_bitbuf(c)?,
            Ie::TransitNetworkSelection(ie) => ie.to_bitbuf(c)?,
            Ie::RestartIndicator(ie) => ie.to_bitbuf(c)?,
            Ie::LowLayerCompatibility(ie) => ie.to_bitbuf(c)?,
            Ie::HighLayerCompatibility(ie) => ie.to_bitbuf(c)?,
            Ie::UserUser(ie) => ie.to_bitbuf(c)?,
            Ie::Unknown { data, .. } => c.write_bytes(data),
            Ie::Shift(_) | Ie::MoreData(_) | Ie::SendingComplete(_) | Ie::CongestionLevel(_) | Ie::RepeatIndicator(_) => {
                return Err(IeParseErr::InvalidElemId { found: self.id() as u64 });
            }
        }

        let content = content.into_bytes();
        if content.len() > IE_MAX_CONTENT_LEN {
            return Err(IeParseErr::InconsistentLength { expected: IE_MAX_CONTENT_LEN, found: content.len() });
        }
        buffer.write_bits(self.id() as u64, 8);
        buffer.write_bits(content.len() as u64, 8);
        buffer.write_bytes(&content);
        Ok(2 + content.len())
    }
}

impl fmt::Display for Ie {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ie::SegmentedMessage(ie) => ie.fmt(f),
            Ie::BearerCapability(ie) => ie.fmt(f),
            Ie::Cause(ie) => ie.fmt(f),
            Ie::CallIdentity(ie) => ie.fmt(f),
            Ie::CallState(ie) => ie.fmt(f),
            Ie::ChannelIdentification(ie) => ie.fmt(f),
            Ie::Facility(ie) => ie.fmt(f),
            Ie::ProgressIndicator(ie) => ie.fmt(f),
            Ie::NetworkSpecificFacilities(ie) => ie.fmt(f),
            Ie::NotificationIndicator(ie) => ie.fmt(f),
            Ie::Display(ie) => ie.fmt(f),
            Ie::DateTime(ie) => ie.fmt(f),
            Ie::KeypadFacility(ie) => ie.fmt(f),
            Ie::Signal(ie) => ie.fmt(f),
            Ie::ConnectedNumber(ie) => ie.fmt(f),
            Ie::ConnectedSubaddress(ie) => ie.fmt(f),
            Ie::CallingPartyNumber(ie) => ie.fmt(f),
            Ie::CallingPartySubaddress(ie) => ie.fmt(f),
            Ie::CalledPartyNumber(ie) => ie.fmt(f),
            Ie::CalledPartySubaddress(ie) => ie.fmt(f),
            Ie::RedirectingNumber(ie) => ie.fmt(f),
            Ie::TransitNetworkSelection(ie) => ie.fmt(f),
            Ie::RestartIndicator(ie) => ie.fmt(f),
            Ie::LowLayerCompatibility(ie) => ie.fmt(f),
            Ie::HighLayerCompatibility(ie) => ie.fmt(f),
            Ie::UserUser(ie) => ie.fmt(f),
            Ie::Shift(ie) => ie.fmt(f),
            Ie::MoreData(ie) => ie.fmt(f),
            Ie::SendingComplete(ie) => ie.fmt(f),
            Ie::CongestionLevel(ie) => ie.fmt(f),
            Ie::RepeatIndicator(ie) => ie.fmt(f),
            Ie::Unknown { codeset, id, data } => write!(f, "Unknown {{ codeset: {} id: 0x{:02x} data: {:02x?} }}", codeset, id, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{
        cause_value::CauseValue, location::Location, notification_description::NotificationDescription,
        progress_description::ProgressDescription, restart_class::RestartClass, signal_value::SignalValue,
        user_info_layer1::UserInfoLayer1,
    };
    use crate::fields::{network_id::NetworkIdentification, party_number::PartyNumber, subaddress::Subaddress};
    use crate::enums::subaddress_type::SubaddressType;
    use q931_core::debug;

    /// Encode every kind and decode it back through the generic dispatcher
    #[test]
    fn test_every_kind_through_dispatch() {
        debug::setup_logging_verbose();
        let sub = Subaddress { subaddress_type: SubaddressType::Nsap, odd: false, information: vec![0x50, 0x12] };
        let all = vec![
            Ie::SegmentedMessage(SegmentedMessage { first_segment: true, segments_remaining: 2, segmented_message_type: 0x05 }),
            Ie::BearerCapability(BearerCapability::speech(UserInfoLayer1::G711Alaw)),
            Ie::Cause(Cause::new(Location::User, CauseValue::UserBusy)),
            Ie::CallIdentity(CallIdentity { identity: vec![0x31, 0x32] }),
            Ie::CallState(CallState::new(crate::enums::call_state_value::CallStateValue::CallReceived)),
            Ie::ChannelIdentification(ChannelIdentification::b_channel(ChannelInterfaceType::Basic, 1, true)),
            Ie::Facility(Facility { protocol_profile: facility::PROTOCOL_PROFILE_ROSE, components: vec![0xA1, 0x00] }),
            Ie::ProgressIndicator(ProgressIndicator::new(Location::User, ProgressDescription::InbandInformationAvailable)),
            Ie::NetworkSpecificFacilities(NetworkSpecificFacilities { network_id: None, facility_specification: vec![0x01] }),
            Ie::NotificationIndicator(NotificationIndicator { description: NotificationDescription::UserResumed }),
            Ie::Display(Display::new("hello")),
            Ie::DateTime(DateTime { year: 26, month: 1, day: 2, hour: Some(3), minute: None, second: None }),
            Ie::KeypadFacility(KeypadFacility { digits: "*21#".to_string() }),
            Ie::Signal(Signal { value: SignalValue::RingBackToneOn }),
            Ie::ConnectedNumber(ConnectedNumber(PartyNumber::unknown("200"))),
            Ie::ConnectedSubaddress(ConnectedSubaddress(sub.clone())),
            Ie::CallingPartyNumber(CallingPartyNumber(PartyNumber::unknown("100"))),
            Ie::CallingPartySubaddress(CallingPartySubaddress(sub.clone())),
            Ie::CalledPartyNumber(CalledPartyNumber(PartyNumber::unknown("200"))),
            Ie::CalledPartySubaddress(CalledPartySubaddress(sub)),
            Ie::RedirectingNumber(RedirectingNumber(PartyNumber::unknown("300"))),
            Ie::TransitNetworkSelection(TransitNetworkSelection { network: NetworkIdentification::national_carrier("0288") }),
            Ie::RestartIndicator(RestartIndicator { class: RestartClass::SingleInterface }),
            Ie::LowLayerCompatibility(LowLayerCompatibility {
                coding_standard: crate::enums::coding_standard::CodingStandard::Ccitt,
                information_transfer_capability: crate::enums::information_transfer_capability::InformationTransferCapability::Speech,
                out_band_negotiation: None,
                transfer_mode: crate::enums::transfer_mode::TransferMode::Circuit,
                information_transfer_rate: crate::enums::information_transfer_rate::InformationTransferRate::Rate64k,
                rate_multiplier: None,
                layers: Default::default(),
            }),
            Ie::HighLayerCompatibility(HighLayerCompatibility::new(high_layer_compatibility::HLC_TELEPHONY)),
            Ie::UserUser(UserUser { protocol_discriminator: user_user::UU_PROTOCOL_IA5, information: b"hi".to_vec() }),
            Ie::Shift(Shift { locking: false, codeset: 6 }),
            Ie::MoreData(MoreData),
            Ie::SendingComplete(SendingComplete),
            Ie::CongestionLevel(CongestionLevel { receiver_not_ready: false }),
            Ie::RepeatIndicator(RepeatIndicator { value: RepeatIndicator::PRIORITIZED_LIST }),
        ];
        assert_eq!(all.len(), 31);

        for ie in all {
            let mut buf = BitBuffer::new_autoexpand(64);
            let n = ie.write_to_buf(&mut buf).unwrap();
            let bytes = buf.into_bytes();
            assert_eq!(n, bytes.len());
            tracing::debug!("{} -> {}", ie, hex::encode(&bytes));

            let decoded = if ie.is_single_octet() {
                Ie::read_from_buf(IeId::single_octet_id(bytes[0]), 0, &bytes).unwrap()
            } else {
                assert_eq!(bytes[1] as usize, bytes.len() - 2);
                Ie::read_from_buf(bytes[0], 0, &bytes[2..]).unwrap()
            };
            assert_eq!(decoded, ie);
        }
    }

    #[test]
    fn test_unknown_and_other_codesets() {
        debug::setup_logging_verbose();
        let ie = Ie::read_from_buf(0x08, 5, &[0x01, 0x02]).unwrap();
        assert_eq!(ie, Ie::Unknown { codeset: 5, id: 0x08, data: vec![0x01, 0x02] });
        assert_eq!(ie.codeset(), 5);

        let ie = Ie::read_from_buf(0x7F, 0, &[0xAA]).unwrap();
        assert!(matches!(ie, Ie::Unknown { id: 0x7F, .. }));

        let mut buf = BitBuffer::new_autoexpand(8);
        assert_eq!(ie.write_to_buf(&mut buf).unwrap(), 3);
        assert_eq!(buf.into_bytes(), vec![0x7F, 0x01, 0xAA]);
    }

    #[test]
    fn test_broken_content_fails() {
        debug::setup_logging_verbose();
        assert!(Ie::read_from_buf(0x04, 0, &[0x80]).is_err());
        assert!(Ie::read_from_buf(0x18, 0, &[0x8C]).is_err());
    }
}
