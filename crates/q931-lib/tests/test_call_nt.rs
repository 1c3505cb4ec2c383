mod common;

use q931_config::{IntfType, Role};
use q931_core::debug;
use q931_core::longtime::LONGTIME_SECOND;
use q931_ies::Ie;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::location::Location;
use q931_ies::enums::message_type::MessageType;
use q931_ies::enums::progress_description::ProgressDescription;
use q931_ies::fields::party_number::PartyNumber;
use q931_ies::ies::{CallState, CalledPartyNumber, ProgressIndicator};
use q931_ies::message::Ies;
use q931_lib::{CallTimer, ChannelState, Q931Error, Q931Indication};
use common::{ComponentTest, cause_ies, cause_of, default_test_config};

/// SETUP from the user side, call reference 1, bearer capability only
const SETUP_BC_ONLY: &str = "0801010504038090a3";

fn nt_test() -> ComponentTest {
    ComponentTest::new(default_test_config(Role::Nt, IntfType::BraPointToPoint))
}

#[test]
fn test_incoming_call_answer_and_clear() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    let call = test.incoming_call(SETUP_BC_ONLY);
    assert_eq!(test.call_state(call), Some(CallStateValue::CallPresent));
    assert_eq!(test.channel_state(1), ChannelState::Selected);
    assert!(test.take_sent().is_empty());

    // The network names the channel in its first response
    test.lib.alerting_request(call, Ies::new()).unwrap();
    let alerting = test.take_one_sent();
    assert_eq!(alerting.message_type, MessageType::Alerting);
    assert!(alerting.callref.flag);
    assert_eq!(alerting.callref.value, 1);
    let chanid = alerting.ies.channel_identification().unwrap();
    assert_eq!(chanid.channels(), &[1]);
    assert!(chanid.exclusive);
    assert_eq!(test.call_state(call), Some(CallStateValue::CallReceived));

    // Neither alerting twice nor completing an incoming call is allowed, and nothing goes out
    assert!(matches!(
        test.lib.alerting_request(call, Ies::new()),
        Err(Q931Error::IncompatibleState { state: CallStateValue::CallReceived, .. })
    ));
    assert!(matches!(test.lib.setup_complete_request(call, Ies::new()), Err(Q931Error::IncompatibleState { .. })));
    assert!(test.take_sent().is_empty());

    test.lib.setup_response(call, Ies::new()).unwrap();
    let connect = test.take_one_sent();
    assert_eq!(connect.message_type, MessageType::Connect);
    assert!(connect.ies.channel_identification().is_none());
    assert!(connect.ies.date_time().is_none());
    assert_eq!(test.call_state(call), Some(CallStateValue::Active));
    assert_eq!(test.take_indications(), vec![Q931Indication::ConnectChannel { call, channel: 1 }]);
    assert_eq!(test.channel_state(1), ChannelState::Connected);

    // CONNECT ACKNOWLEDGE after the network went active changes nothing
    let callref = test.peer_callref(1, false);
    test.deliver_p2p(callref, MessageType::ConnectAcknowledge, Ies::new());
    assert!(test.take_sent().is_empty());
    assert!(test.take_indications().is_empty());

    // Caller hangs up; the application releases
    test.deliver_p2p(callref, MessageType::Disconnect, cause_ies(CauseValue::NormalCallClearing));
    let inds = test.take_indications();
    assert_eq!(inds.len(), 2);
    assert_eq!(inds[0], Q931Indication::DisconnectChannel { call, channel: 1 });
    assert!(matches!(&inds[1], Q931Indication::Disconnect { ies, .. } if cause_of(ies) == Some(16)));
    assert_eq!(test.call_state(call), Some(CallStateValue::DisconnectIndication));

    test.lib.release_request(call, Ies::new()).unwrap();
    assert_eq!(test.take_one_sent().message_type, MessageType::Release);
    assert_eq!(test.call_state(call), Some(CallStateValue::ReleaseRequest));

    test.deliver_p2p(callref, MessageType::ReleaseComplete, Ies::new());
    assert!(matches!(
        test.take_indications().as_slice(),
        [Q931Indication::ReleaseConfirm { timed_out: false, .. }]
    ));
    assert_eq!(test.lib.active_calls_cnt(), 0);
    assert_eq!(test.channel_state(1), ChannelState::Available);
}

#[test]
fn test_connect_carries_date_time_when_configured() {
    debug::setup_logging_verbose();
    let mut config = default_test_config(Role::Nt, IntfType::BraPointToPoint);
    config.send_date_time = true;
    let mut test = ComponentTest::new(config);
    let call = test.incoming_call(SETUP_BC_ONLY);

    test.lib.setup_response(call, Ies::new()).unwrap();
    let connect = test.take_one_sent();
    assert_eq!(connect.message_type, MessageType::Connect);
    assert!(connect.ies.date_time().is_some());
    // First response, so the channel goes with it
    assert_eq!(connect.ies.channel_identification().map(|c| c.channels().to_vec()), Some(vec![1]));
}

#[test]
fn test_setup_without_bearer_capability() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    test.deliver_hex(0, "08010105");

    let reply = test.take_one_sent();
    assert_eq!(reply.message_type, MessageType::ReleaseComplete);
    assert!(reply.callref.flag);
    let cause = reply.ies.cause().unwrap();
    assert_eq!(cause.value, CauseValue::MandatoryInformationElementMissing.into_raw() as u8);
    assert_eq!(cause.diagnostics, vec![0x04]);
    assert!(test.take_indications().is_empty());
    assert_eq!(test.lib.active_calls_cnt(), 0);
}

#[test]
fn test_reject_incoming_call() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    let call = test.incoming_call(SETUP_BC_ONLY);

    test.lib.reject_request(call, Ies::new()).unwrap();
    let rc = test.take_one_sent();
    assert_eq!(rc.message_type, MessageType::ReleaseComplete);
    assert_eq!(cause_of(&rc.ies), Some(CauseValue::CallRejected.into_raw() as u8));
    assert!(test.lib.call(call).is_none());
    assert_eq!(test.channel_state(1), ChannelState::Available);

    // The call is in Null now, and ALERTING is not compatible with that state
    assert_eq!(
        test.lib.alerting_request(call, Ies::new()),
        Err(Q931Error::IncompatibleState {
            state: CallStateValue::Null,
            cause: CauseValue::MessageNotCompatibleWithCallState,
        })
    );
    assert!(matches!(test.lib.disconnect_request(call, Ies::new()), Err(Q931Error::IncompatibleState { state: CallStateValue::Null, .. })));
    assert!(test.take_sent().is_empty());
}

#[test]
fn test_overlap_receiving() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    let call = test.incoming_call(SETUP_BC_ONLY);
    let callref = test.peer_callref(1, false);

    test.lib.more_info_request(call, Ies::new()).unwrap();
    let setup_ack = test.take_one_sent();
    assert_eq!(setup_ack.message_type, MessageType::SetupAcknowledge);
    assert!(setup_ack.ies.channel_identification().is_some());
    assert_eq!(test.call_state(call), Some(CallStateValue::OverlapReceiving));
    assert_eq!(test.lib.next_timer(), Some(12 * LONGTIME_SECOND));

    // Each digit restarts T302
    test.advance(10 * LONGTIME_SECOND);
    let digits = Ies::new().with(Ie::CalledPartyNumber(CalledPartyNumber(PartyNumber::unknown("5"))));
    test.deliver_p2p(callref, MessageType::Information, digits);
    assert!(matches!(test.take_indications().as_slice(), [Q931Indication::Info { .. }]));
    assert_eq!(test.lib.next_timer(), Some(12 * LONGTIME_SECOND));

    // T302 only tells the application; the call waits for its decision
    test.advance(12 * LONGTIME_SECOND);
    assert_eq!(test.take_indications(), vec![Q931Indication::Timeout { call, timer: CallTimer::T302 }]);
    assert_eq!(test.call_state(call), Some(CallStateValue::OverlapReceiving));
    assert!(test.take_sent().is_empty());

    test.lib.proceeding_request(call, Ies::new()).unwrap();
    let proceeding = test.take_one_sent();
    assert_eq!(proceeding.message_type, MessageType::CallProceeding);
    // Already named in SETUP ACKNOWLEDGE
    assert!(proceeding.ies.channel_identification().is_none());
    assert_eq!(test.call_state(call), Some(CallStateValue::IncomingCallProceeding));

    assert!(matches!(test.lib.progress_request(call, Ies::new()), Err(Q931Error::Encode(_))));
    let inband = Ie::ProgressIndicator(ProgressIndicator::new(Location::PublicNetworkLocalUser, ProgressDescription::InbandInformationAvailable));
    test.lib.progress_request(call, Ies::new().with(inband)).unwrap();
    assert_eq!(test.take_one_sent().message_type, MessageType::Progress);
    assert!(matches!(test.lib.reject_request(call, Ies::new()), Err(Q931Error::IncompatibleState { .. })));
}

#[test]
fn test_disconnect_unanswered_falls_back_to_release() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    let call = test.incoming_call(SETUP_BC_ONLY);
    test.lib.alerting_request(call, Ies::new()).unwrap();
    test.take_sent();

    test.lib.disconnect_request(call, cause_ies(CauseValue::UserBusy)).unwrap();
    let disconnect = test.take_one_sent();
    assert_eq!(disconnect.message_type, MessageType::Disconnect);
    assert_eq!(cause_of(&disconnect.ies), Some(CauseValue::UserBusy.into_raw() as u8));
    assert_eq!(test.call_state(call), Some(CallStateValue::DisconnectRequest));

    // No RELEASE within T305: RELEASE repeats the cause of the DISCONNECT
    test.advance(30 * LONGTIME_SECOND);
    assert_eq!(test.take_indications(), vec![Q931Indication::Timeout { call, timer: CallTimer::T305 }]);
    let release = test.take_one_sent();
    assert_eq!(release.message_type, MessageType::Release);
    assert_eq!(release.ies.causes().count(), 1);
    assert_eq!(release.ies.cause(), disconnect.ies.cause());
    assert_eq!(test.call_state(call), Some(CallStateValue::ReleaseRequest));

    // Anything but clearing messages is ignored while releasing
    let callref = test.peer_callref(1, false);
    test.deliver_p2p(callref, MessageType::Information, Ies::new());
    assert!(test.take_sent().is_empty());

    test.deliver_p2p(callref, MessageType::ReleaseComplete, Ies::new());
    assert!(matches!(test.take_indications().as_slice(), [Q931Indication::ReleaseConfirm { .. }]));
    assert_eq!(test.lib.active_calls_cnt(), 0);
}

#[test]
fn test_unexpected_message_answered_with_status() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    let call = test.incoming_call(SETUP_BC_ONLY);

    // CONNECT makes no sense on a call the peer placed
    let callref = test.peer_callref(1, false);
    test.deliver_p2p(callref, MessageType::Connect, Ies::new());
    let status = test.take_one_sent();
    assert_eq!(status.message_type, MessageType::Status);
    let cause = status.ies.cause().unwrap();
    assert_eq!(cause.value, CauseValue::MessageNotCompatibleWithCallState.into_raw() as u8);
    assert_eq!(cause.diagnostics, vec![MessageType::Connect.into_raw() as u8]);
    // The network reports its own numbering, N1 for a call the user originated
    assert_eq!(status.ies.call_state().map(|s| s.value), Some(CallStateValue::CallInitiated));
    assert_eq!(
        test.take_indications(),
        vec![Q931Indication::Error { call, cause: CauseValue::MessageNotCompatibleWithCallState.into_raw() as u8 }]
    );
    assert_eq!(test.call_state(call), Some(CallStateValue::CallPresent));

    // DISCONNECT without its cause is answered with RELEASE
    test.deliver_p2p(callref, MessageType::Disconnect, Ies::new());
    let release = test.take_one_sent();
    assert_eq!(release.message_type, MessageType::Release);
    assert_eq!(cause_of(&release.ies), Some(CauseValue::MandatoryInformationElementMissing.into_raw() as u8));
    assert_eq!(test.call_state(call), Some(CallStateValue::ReleaseRequest));
}

#[test]
fn test_status_enquiry_on_call() {
    debug::setup_logging_verbose();
    let mut test = nt_test();
    let call = test.incoming_call(SETUP_BC_ONLY);
    test.lib.setup_response(call, Ies::new()).unwrap();
    test.take_sent();
    test.take_indications();

    let callref = test.peer_callref(1, false);
    test.deliver_p2p(callref, MessageType::StatusEnquiry, Ies::new());
    let status = test.take_one_sent();
    assert_eq!(status.message_type, MessageType::Status);
    assert_eq!(cause_of(&status.ies), Some(CauseValue::ResponseToStatusEnquiry.into_raw() as u8));
    assert_eq!(status.ies.call_state().map(|s| s.value), Some(CallStateValue::Active));

    // Our own enquiry, answered in time
    test.lib.status_enquiry_request(call, Ies::new()).unwrap();
    assert_eq!(test.take_one_sent().message_type, MessageType::StatusEnquiry);
    // A second one while T322 runs is absorbed
    test.lib.status_enquiry_request(call, Ies::new()).unwrap();
    assert!(test.take_sent().is_empty());

    let active = cause_ies(CauseValue::ResponseToStatusEnquiry)
        .with(Ie::CallState(CallState::new(CallStateValue::Active)));
    test.deliver_p2p(callref, MessageType::Status, active);
    assert!(matches!(test.take_indications().as_slice(), [Q931Indication::Status { .. }]));
    assert_eq!(test.lib.next_timer(), None);

    // Unanswered: one retry, then the call is released with cause 41
    test.lib.status_enquiry_request(call, Ies::new()).unwrap();
    test.take_sent();
    test.advance(4 * LONGTIME_SECOND);
    assert_eq!(test.take_one_sent().message_type, MessageType::StatusEnquiry);
    test.advance(4 * LONGTIME_SECOND);
    let release = test.take_one_sent();
    assert_eq!(release.message_type, MessageType::Release);
    assert_eq!(cause_of(&release.ies), Some(CauseValue::TemporaryFailure.into_raw() as u8));
}
