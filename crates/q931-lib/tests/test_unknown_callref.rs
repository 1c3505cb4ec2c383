mod common;

use q931_config::{IntfType, Role};
use q931_core::debug;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::message_type::MessageType;
use q931_lib::Q931Indication;
use common::{ComponentTest, cause_of, default_test_config};

fn nt_test() -> ComponentTest {
    ComponentTest::new(default_test_config(Role::Nt, IntfType::BraPointToPoint))
}

fn raw(cause: CauseValue) -> Option<u8> {
    Some(cause.into_raw() as u8)
}

#[test]
fn test_messages_for_unknown_call_references() {
    debug::setup_logging_verbose();
    let mut test = nt_test();

    // STATUS ENQUIRY: we know nothing, so we are in Null
    test.deliver_hex(0, "08010575");
    let status = test.take_one_sent();
    assert_eq!(status.message_type, MessageType::Status);
    assert!(status.callref.flag);
    assert_eq!(status.callref.value, 5);
    assert_eq!(cause_of(&status.ies), raw(CauseValue::ResponseToStatusEnquiry));
    assert_eq!(status.ies.call_state().map(|s| s.value), Some(CallStateValue::Null));

    // DISCONNECT, cause 16
    test.deliver_hex(0, "0801054508028090");
    let rc = test.take_one_sent();
    assert_eq!(rc.message_type, MessageType::ReleaseComplete);
    assert_eq!(cause_of(&rc.ies), raw(CauseValue::InvalidCallReferenceValue));

    // RELEASE COMPLETE is never answered
    test.deliver_hex(0, "0801055a");
    assert!(test.take_sent().is_empty());

    // STATUS reporting Null agrees with us; any other state does not
    test.deliver_hex(0, "0801057d0802809e140100");
    assert!(test.take_sent().is_empty());
    test.deliver_hex(0, "0801057d0802809e14010a");
    let rc = test.take_one_sent();
    assert_eq!(rc.message_type, MessageType::ReleaseComplete);
    assert_eq!(cause_of(&rc.ies), raw(CauseValue::MessageNotCompatibleWithCallState));

    // Unknown message type on an unknown call reference
    test.deliver_hex(0, "0801057f");
    let rc = test.take_one_sent();
    assert_eq!(rc.message_type, MessageType::ReleaseComplete);
    assert_eq!(cause_of(&rc.ies), raw(CauseValue::InvalidCallReferenceValue));

    assert!(test.take_indications().is_empty());
    assert_eq!(test.lib.active_calls_cnt(), 0);
}

#[test]
fn test_unknown_message_type_on_call() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    let call = test.incoming_call("0801010504038090a3");

    test.deliver_hex(0, "0801017f");
    let status = test.take_one_sent();
    assert_eq!(status.message_type, MessageType::Status);
    let cause = status.ies.cause().unwrap();
    assert_eq!(Some(cause.value), raw(CauseValue::MessageTypeNonExistentOrNotImplemented));
    assert_eq!(cause.diagnostics, vec![0x7f]);
    assert_eq!(
        test.take_indications(),
        vec![Q931Indication::Error { call, cause: CauseValue::MessageTypeNonExistentOrNotImplemented.into_raw() as u8 }]
    );

    // Same value with the flag of a call we originated belongs to no call
    test.deliver_hex(0, "08018101");
    let rc = test.take_one_sent();
    assert_eq!(rc.message_type, MessageType::ReleaseComplete);
    assert!(!rc.callref.flag);
    assert_eq!(test.call_state(call), Some(CallStateValue::CallPresent));
}

#[test]
fn test_frames_that_are_dropped() {
    debug::setup_logging_verbose();
    let mut test = nt_test();

    // Wrong protocol discriminator
    test.deliver_hex(0, "09010575");
    // Truncated header
    test.deliver_hex(0, "0801");
    // Dummy call reference
    test.deliver_hex(0, "080062");
    // Two-octet call reference on an interface that uses one
    test.deliver_hex(0, "0802000575");

    assert!(test.take_sent().is_empty());
    assert!(test.take_indications().is_empty());
}

#[test]
fn test_global_call_reference() {
    debug::setup_logging_verbose();
    let mut test = nt_test();

    // Only restart messages are meaningful here
    test.deliver_hex(0, "08010075");
    let status = test.take_one_sent();
    assert_eq!(status.message_type, MessageType::Status);
    assert!(status.callref.is_global());
    assert!(status.callref.flag);
    assert_eq!(cause_of(&status.ies), raw(CauseValue::InvalidCallReferenceValue));
    assert_eq!(status.ies.call_state().map(|s| s.value), Some(CallStateValue::Null));

    // RESTART ACKNOWLEDGE without a RESTART of ours, restart indicator 'all interfaces'
    test.deliver_hex(0, "0801804e790187");
    let status = test.take_one_sent();
    assert_eq!(status.message_type, MessageType::Status);
    let cause = status.ies.cause().unwrap();
    assert_eq!(Some(cause.value), raw(CauseValue::MessageNotCompatibleWithCallState));
    assert_eq!(cause.diagnostics, vec![MessageType::RestartAcknowledge.into_raw() as u8]);

    // STATUS on the global call reference is only logged
    test.deliver_hex(0, "0801807d0802809e140100");
    assert!(test.take_sent().is_empty());
    assert!(test.take_indications().is_empty());
}
