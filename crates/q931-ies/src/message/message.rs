use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::enums::{ie_id::IeId, message_type::MessageType};
use crate::ies::{Ie, Shift};

use super::callref::CallRef;
use super::ies::Ies;

pub const PROTOCOL_DISCRIMINATOR_Q931: u8 = 0x08;

/// Problem with one information element found while decoding a message.
/// The element is left out of the decoded collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IeFault {
    /// Contents could not be decoded
    Malformed { id: u8, codeset: u8, err: IeParseErr },
    /// Codeset 0 identifier not known to this stack. Kept in the collection as `Ie::Unknown`.
    Unrecognized { id: u8 },
    /// Element length runs past the end of the frame. Decoding stops here.
    Truncated { id: u8 },
}

impl IeFault {
    pub fn id(&self) -> u8 {
        match self {
            IeFault::Malformed { id, .. } | IeFault::Unrecognized { id } | IeFault::Truncated { id } => *id,
        }
    }
}

impl fmt::Display for IeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IeFault::Malformed { id, codeset, err } => write!(f, "malformed IE 0x{:02x} codeset {}: {}", id, codeset, err),
            IeFault::Unrecognized { id } => write!(f, "unrecognized IE 0x{:02x}", id),
            IeFault::Truncated { id } => write!(f, "truncated IE 0x{:02x}", id),
        }
    }
}

/// Frame that could not be turned into a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameErr {
    /// Protocol discriminator, call reference or message type octet unusable. The frame is dropped.
    Header(IeParseErr),
    /// Header is fine but the message type is unknown
    UnknownMessageType { callref: CallRef, message_type: u8 },
}

impl fmt::Display for FrameErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameErr::Header(e) => write!(f, "bad header: {}", e),
            FrameErr::UnknownMessageType { callref, message_type } => {
                write!(f, "unknown message type 0x{:02x} callref {}", message_type, callref)
            }
        }
    }
}

impl std::error::Error for FrameErr {}

impl From<IeParseErr> for FrameErr {
    fn from(e: IeParseErr) -> Self {
        FrameErr::Header(e)
    }
}

/// Q.931 message: header plus information elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Q931Message {
    pub callref: CallRef,
    pub message_type: MessageType,
    pub ies: Ies,
    /// Elements dropped while decoding. Always empty for locally built messages.
    pub faults: Vec<IeFault>,
}

impl Q931Message {
    pub fn new(callref: CallRef, message_type: MessageType, ies: Ies) -> Self {
        Q931Message { callref, message_type, ies, faults: Vec::new() }
    }

    /// Decode a frame. Element level problems do not fail the decode; they are listed in `faults`.
    pub fn from_bytes(frame: &[u8]) -> Result<Self, FrameErr> {
        let mut buf = BitBuffer::from_bytes(frame);
        let buffer = &mut buf;

        let pd = buffer.read_octet("protocol_discriminator")?;
        if pd != PROTOCOL_DISCRIMINATOR_Q931 {
            return Err(FrameErr::Header(IeParseErr::InvalidValue { field: "protocol_discriminator", value: pd as u64 }));
        }
        let callref = CallRef::from_bitbuf(buffer)?;

        let raw_type = buffer.read_octet("message_type")?;
        if raw_type & 0x80 != 0 {
            // Escape to nationally specific message types is not supported
            return Err(FrameErr::UnknownMessageType { callref, message_type: raw_type });
        }
        let Ok(message_type) = MessageType::try_from(raw_type as u64) else {
            return Err(FrameErr::UnknownMessageType { callref, message_type: raw_type });
        };

        let mut msg = Q931Message::new(callref, message_type, Ies::new());
        msg.read_ies(buffer);
        Ok(msg)
    }

    fn read_ies(&mut self, buffer: &mut BitBuffer) {
        let mut locked_codeset = 0u8;
        let mut next_codeset: Option<u8> = None;

        while buffer.get_len_remaining_octets() > 0 {
            let Ok(octet) = buffer.read_octet("ie_id") else { break };

            if octet & 0x80 != 0 {
                let id = IeId::single_octet_id(octet);
                if id as u64 == Shift::ID {
                    self.apply_shift(octet, &mut locked_codeset, &mut next_codeset);
                    continue;
                }
                let codeset = next_codeset.take().unwrap_or(locked_codeset);
                self.push_decoded(id, codeset, &[octet]);
                continue;
            }

            let Ok(len) = buffer.read_octet("ie_len") else {
                self.faults.push(IeFault::Truncated { id: octet });
                break;
            };
            let Ok(data) = buffer.read_bytes(len as usize, "ie_data") else {
                self.faults.push(IeFault::Truncated { id: octet });
                break;
            };
            let codeset = next_codeset.take().unwrap_or(locked_codeset);
            self.push_decoded(octet, codeset, &data);
        }
    }

    fn apply_shift(&mut self, octet: u8, locked_codeset: &mut u8, next_codeset: &mut Option<u8>) {
        match Shift::from_bitbuf(&mut BitBuffer::from_bytes(&[octet])) {
            Ok(shift) if shift.locking => {
                if shift.codeset < *locked_codeset {
                    // Locking shift may only move to a higher codeset
                    tracing::debug!("ignoring locking shift from codeset {} to {}", locked_codeset, shift.codeset);
                } else {
                    *locked_codeset = shift.codeset;
                }
            }
            Ok(shift) => *next_codeset = Some(shift.codeset),
            Err(err) => {
                tracing::debug!("bad shift 0x{:02x}: {}", octet, err);
                self.faults.push(IeFault::Malformed { id: octet, codeset: *locked_codeset, err });
            }
        }
    }

    fn push_decoded(&mut self, id: u8, codeset: u8, data: &[u8]) {
        match Ie::read_from_buf(id, codeset, data) {
            Ok(ie) => {
                if codeset == 0 && ie.ie_id().is_none() {
                    tracing::debug!("unrecognized IE 0x{:02x} in {}", id, self.message_type);
                    self.faults.push(IeFault::Unrecognized { id });
                }
                self.ies.add(ie);
            }
            Err(err) => {
                tracing::debug!("dropping IE 0x{:02x} codeset {} in {}: {}", id, codeset, self.message_type, err);
                self.faults.push(IeFault::Malformed { id, codeset, err });
            }
        }
    }

    /// Encode the message. Elements are written in canonical order; elements of other
    /// codesets are each preceded by a non-locking shift.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IeParseErr> {
        let mut buf = BitBuffer::new_autoexpand(256);
        let buffer = &mut buf;
        buffer.write_bits(PROTOCOL_DISCRIMINATOR_Q931 as u64, 8);
        self.callref.to_bitbuf(buffer)?;
        buffer.write_bits(self.message_type.into_raw() & 0x7F, 8);

        let mut ies = self.ies.clone();
        ies.sort();
        for ie in ies.iter() {
            if matches!(ie, Ie::Shift(_)) {
                // Shifts are generated from the codeset of each element
                continue;
            }
            let codeset = ie.codeset();
            if codeset != 0 {
                Shift { locking: false, codeset }.to_bitbuf(buffer)?;
            }
            ie.write_to_buf(buffer)?;
        }
        Ok(buf.into_bytes())
    }
}

impl fmt::Display for Q931Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} callref {} {}", self.message_type, self.callref, self.ies)?;
        for fault in &self.faults {
            write!(f, " ({})", fault)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{cause_value::CauseValue, location::Location, user_info_layer1::UserInfoLayer1};
    use crate::fields::party_number::PartyNumber;
    use crate::ies::*;
    use q931_core::debug;

    const SETUP_BRI: &str = "0801010504038090a3180189700481323030a1";

    #[test]
    fn test_decode_setup() {
        debug::setup_logging_verbose();
        let msg = Q931Message::from_bytes(&hex::decode(SETUP_BRI).unwrap()).unwrap();
        tracing::info!("{}", msg);
        assert_eq!(msg.callref, CallRef::new(1, 1, false));
        assert_eq!(msg.message_type, MessageType::Setup);
        assert!(msg.faults.is_empty());
        assert_eq!(msg.ies.len(), 4);
        assert_eq!(msg.ies.channel_identification().map(|c| c.channels().to_vec()), Some(vec![1]));
        assert_eq!(msg.ies.called_party_number().map(|n| n.digits()), Some("200"));
        assert!(msg.ies.sending_complete());
    }

    #[test]
    fn test_encode_setup_canonical_order() {
        debug::setup_logging_verbose();
        // Added out of order on purpose
        let ies = Ies::new()
            .with(Ie::SendingComplete(SendingComplete))
            .with(Ie::CalledPartyNumber(CalledPartyNumber(PartyNumber {
                type_of_number: crate::enums::type_of_number::TypeOfNumber::Unknown,
                numbering_plan: crate::enums::numbering_plan::NumberingPlan::Isdn,
                presentation: None,
                redirection_reason: None,
                digits: "200".to_string(),
            })))
            .with(Ie::ChannelIdentification(ChannelIdentification::b_channel(ChannelInterfaceType::Basic, 1, true)))
            .with(Ie::BearerCapability(BearerCapability::speech(UserInfoLayer1::G711Alaw)));
        let msg = Q931Message::new(CallRef::new(1, 1, false), MessageType::Setup, ies);
        assert_eq!(hex::encode(msg.to_bytes().unwrap()), SETUP_BRI);
    }

    #[test]
    fn test_codeset_shifts() {
        debug::setup_logging_verbose();
        // Non-locking shift to codeset 6, one element, display back in codeset 0,
        // locking shift to codeset 5, one element
        let frame = "080182 7b 9e 0101 55 28024142 95 080133".replace(' ', "");
        let msg = Q931Message::from_bytes(&hex::decode(frame).unwrap()).unwrap();
        assert_eq!(msg.callref, CallRef::new(1, 2, true));
        assert!(msg.faults.is_empty(), "{:?}", msg.faults);
        let all: Vec<&Ie> = msg.ies.iter().collect();
        assert_eq!(all.len(), 3);
        assert_eq!(*all[0], Ie::Unknown { codeset: 6, id: 0x01, data: vec![0x55] });
        assert_eq!(msg.ies.display().map(|d| d.text.as_str()), Some("AB"));
        assert_eq!(*all[2], Ie::Unknown { codeset: 5, id: 0x08, data: vec![0x33] });
    }

    #[test]
    fn test_encode_other_codeset_with_shift() {
        debug::setup_logging_verbose();
        let ies = Ies::new()
            .with(Ie::Unknown { codeset: 6, id: 0x01, data: vec![0x55] })
            .with(Ie::Display(Display::new("AB")));
        let msg = Q931Message::new(CallRef::new(1, 2, true), MessageType::Information, ies);
        assert_eq!(hex::encode(msg.to_bytes().unwrap()), "080182 7b 28024142 9e 010155".replace(' ', ""));
    }

    #[test]
    fn test_bad_optional_ie_is_dropped() {
        debug::setup_logging_verbose();
        // DISCONNECT with a display carrying a non IA5 octet
        let frame = "08010145 08028290 2801c1".replace(' ', "");
        let msg = Q931Message::from_bytes(&hex::decode(frame).unwrap()).unwrap();
        assert_eq!(msg.ies.cause().and_then(|c| c.cause_value()), Some(CauseValue::NormalCallClearing));
        assert!(!msg.ies.contains(IeId::Display));
        assert!(matches!(msg.faults.as_slice(), [IeFault::Malformed { id: 0x28, codeset: 0, .. }]));
    }

    #[test]
    fn test_truncated_element() {
        debug::setup_logging_verbose();
        let frame = "08010145 0805 8290".replace(' ', "");
        let msg = Q931Message::from_bytes(&hex::decode(frame).unwrap()).unwrap();
        assert_eq!(msg.faults, vec![IeFault::Truncated { id: 0x08 }]);
        assert!(msg.ies.is_empty());
    }

    #[test]
    fn test_header_errors() {
        debug::setup_logging_verbose();
        assert!(matches!(Q931Message::from_bytes(&[0x09, 0x01, 0x01, 0x05]), Err(FrameErr::Header(_))));
        assert!(matches!(Q931Message::from_bytes(&[0x08, 0x01]), Err(FrameErr::Header(_))));
        assert_eq!(
            Q931Message::from_bytes(&[0x08, 0x01, 0x81, 0x7F]),
            Err(FrameErr::UnknownMessageType { callref: CallRef::new(1, 1, true), message_type: 0x7F })
        );
    }

    #[test]
    fn test_status_with_global_callref() {
        debug::setup_logging_verbose();
        let ies = Ies::new()
            .with(Ie::Cause(Cause::new(Location::User, CauseValue::InvalidCallReferenceValue)))
            .with(Ie::CallState(CallState::new(crate::enums::call_state_value::CallStateValue::Null)));
        let msg = Q931Message::new(CallRef::global(2), MessageType::Status, ies);
        let bytes = msg.to_bytes().unwrap();
        assert_eq!(hex::encode(&bytes), "080200007d080280d1140100");
        assert_eq!(Q931Message::from_bytes(&bytes).unwrap(), msg);
    }
}
