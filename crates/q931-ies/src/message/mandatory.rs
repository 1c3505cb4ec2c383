//! Mandatory information elements per message type, Q.931 clause 3 message tables.
//! Elements that are only conditionally mandatory are left to the call state machine.

use q931_config::Role;

use crate::enums::{cause_value::CauseValue, ie_id::IeId, message_type::MessageType};

use super::message::{IeFault, Q931Message};

/// Elements a message must carry when received by the given side
pub fn mandatory_ies(message_type: MessageType, receiver: Role) -> &'static [IeId] {
    match message_type {
        // Network to user SETUP always identifies the channel
        MessageType::Setup if receiver == Role::Te => &[IeId::BearerCapability, IeId::ChannelIdentification],
        MessageType::Setup => &[IeId::BearerCapability],
        MessageType::Disconnect => &[IeId::Cause],
        MessageType::Status => &[IeId::Cause, IeId::CallState],
        MessageType::Restart | MessageType::RestartAcknowledge => &[IeId::RestartIndicator],
        MessageType::Notify => &[IeId::NotificationIndicator],
        MessageType::Progress => &[IeId::ProgressIndicator],
        MessageType::ResumeAcknowledge => &[IeId::ChannelIdentification],
        MessageType::SuspendReject | MessageType::ResumeReject => &[IeId::Cause],
        MessageType::CongestionControl => &[IeId::CongestionLevel],
        _ => &[],
    }
}

/// Reason for rejecting a received message, with the diagnostic element identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MandatoryIeErr {
    pub cause: CauseValue,
    pub id: u8,
}

/// Checks a decoded message for missing or unusable mandatory elements.
/// An unrecognized comprehension-required element counts as a missing mandatory element.
/// Optional elements that failed to decode were dropped during decoding and are not reported.
pub fn check_mandatory(msg: &Q931Message, receiver: Role) -> Result<(), MandatoryIeErr> {
    let mandatory = mandatory_ies(msg.message_type, receiver);

    for fault in &msg.faults {
        match fault {
            IeFault::Malformed { id, codeset: 0, .. } => {
                if mandatory.iter().any(|m| m.into_raw() as u8 == *id) && !msg.ies.contains_raw(*id) {
                    return Err(MandatoryIeErr { cause: CauseValue::InvalidInformationElementContents, id: *id });
                }
            }
            IeFault::Unrecognized { id } if IeId::is_comprehension_required(*id) => {
                return Err(MandatoryIeErr { cause: CauseValue::MandatoryInformationElementMissing, id: *id });
            }
            _ => {}
        }
    }

    for id in mandatory {
        if !msg.ies.contains(*id) {
            return Err(MandatoryIeErr { cause: CauseValue::MandatoryInformationElementMissing, id: id.into_raw() as u8 });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_core::debug;

    fn decode(hex_str: &str) -> Q931Message {
        Q931Message::from_bytes(&hex::decode(hex_str).unwrap()).unwrap()
    }

    #[test]
    fn test_setup_requirements_depend_on_receiver() {
        debug::setup_logging_verbose();
        // SETUP with bearer capability only
        let msg = decode("0801010504038090a3");
        assert!(check_mandatory(&msg, Role::Nt).is_ok());
        let err = check_mandatory(&msg, Role::Te).unwrap_err();
        assert_eq!(err.cause, CauseValue::MandatoryInformationElementMissing);
        assert_eq!(err.id, 0x18);
    }

    #[test]
    fn test_disconnect_without_cause() {
        debug::setup_logging_verbose();
        let msg = decode("08010145");
        let err = check_mandatory(&msg, Role::Te).unwrap_err();
        assert_eq!(err, MandatoryIeErr { cause: CauseValue::MandatoryInformationElementMissing, id: 0x08 });
    }

    #[test]
    fn test_malformed_mandatory_cause() {
        debug::setup_logging_verbose();
        // Cause with octets 3 and 3a but no cause value octet
        let msg = decode("0801014508020090");
        let err = check_mandatory(&msg, Role::Te).unwrap_err();
        assert_eq!(err.cause, CauseValue::InvalidInformationElementContents);
    }

    #[test]
    fn test_unknown_comprehension_required() {
        debug::setup_logging_verbose();
        // RELEASE with an unknown element 0x02 (comprehension required) and 0x7f (not)
        let msg = decode("0801014d7f01000201ff");
        let err = check_mandatory(&msg, Role::Nt).unwrap_err();
        assert_eq!(err, MandatoryIeErr { cause: CauseValue::MandatoryInformationElementMissing, id: 0x02 });

        let msg = decode("0801014d7f0100");
        assert!(check_mandatory(&msg, Role::Nt).is_ok());
    }
}
