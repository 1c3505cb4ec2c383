mod common;

use q931_config::IntfType;
use q931_core::debug;
use q931_core::longtime::LONGTIME_SECOND;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::message::Ies;
use q931_lib::{CallId, ChannelState, Q931Indication};
use common::{LinkedPair, cause_ies, cause_of, setup_ies};

/// Network side calls the user side, which answers. Returns the call on each side.
fn connect_call(pair: &mut LinkedPair) -> (CallId, CallId) {
    let a_call = pair.a.lib.setup_request(pair.a.intf, setup_ies("100")).unwrap();
    pair.pump();
    let b_call = match pair.b.take_indications().as_slice() {
        [Q931Indication::Setup { call, ies, .. }] => {
            assert_eq!(ies.called_party_number().map(|n| n.digits()), Some("100"));
            *call
        }
        other => panic!("expected a setup indication, got {:?}", other),
    };

    pair.b.lib.alerting_request(b_call, Ies::new()).unwrap();
    pair.pump();
    assert!(matches!(pair.a.take_indications().as_slice(), [Q931Indication::Alerting { .. }]));

    pair.b.lib.setup_response(b_call, Ies::new()).unwrap();
    pair.pump();
    assert!(matches!(pair.a.take_indications().as_slice(), [Q931Indication::SetupConfirm { .. }]));
    pair.a.lib.setup_complete_request(a_call, Ies::new()).unwrap();
    pair.pump();
    assert_eq!(pair.a.take_indications(), vec![Q931Indication::ConnectChannel { call: a_call, channel: 1 }]);
    let inds = pair.b.take_indications();
    assert_eq!(inds.len(), 2);
    assert_eq!(inds[0], Q931Indication::ConnectChannel { call: b_call, channel: 1 });
    assert!(matches!(inds[1], Q931Indication::SetupComplete { .. }));

    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::Active));
    assert_eq!(pair.b.call_state(b_call), Some(CallStateValue::Active));
    (a_call, b_call)
}

#[test]
fn test_call_setup_and_clearing_between_both_sides() {
    debug::setup_logging_verbose();
    let mut pair = LinkedPair::new(IntfType::BraPointToPoint);
    let a_call = pair.a.lib.setup_request(pair.a.intf, setup_ies("100")).unwrap();
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::CallInitiated));
    pair.pump();

    let b_call = match pair.b.take_indications().as_slice() {
        [Q931Indication::Setup { call, .. }] => *call,
        other => panic!("expected a setup indication, got {:?}", other),
    };
    assert_eq!(pair.b.call_state(b_call), Some(CallStateValue::CallPresent));
    // The channel the network assigned is taken by the user side too
    assert_eq!(pair.a.channel_state(1), ChannelState::Selected);
    assert_eq!(pair.b.channel_state(1), ChannelState::Selected);

    pair.b.lib.proceeding_request(b_call, Ies::new()).unwrap();
    pair.pump();
    assert!(matches!(pair.a.take_indications().as_slice(), [Q931Indication::Proceeding { .. }]));
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::OutgoingCallProceeding));

    pair.b.lib.alerting_request(b_call, Ies::new()).unwrap();
    pair.pump();
    assert!(matches!(pair.a.take_indications().as_slice(), [Q931Indication::Alerting { .. }]));
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::CallDelivered));
    assert_eq!(pair.b.call_state(b_call), Some(CallStateValue::CallReceived));

    // The network side waits for the application before acknowledging CONNECT
    pair.b.lib.setup_response(b_call, Ies::new()).unwrap();
    pair.pump();
    assert!(matches!(pair.a.take_indications().as_slice(), [Q931Indication::SetupConfirm { .. }]));
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::ConnectRequest));
    assert_eq!(pair.b.call_state(b_call), Some(CallStateValue::ConnectRequest));

    pair.a.lib.setup_complete_request(a_call, Ies::new()).unwrap();
    pair.pump();
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::Active));
    assert_eq!(pair.b.call_state(b_call), Some(CallStateValue::Active));
    assert_eq!(pair.a.channel_state(1), ChannelState::Connected);
    assert_eq!(pair.b.channel_state(1), ChannelState::Connected);
    pair.a.take_indications();
    pair.b.take_indications();

    // Nothing is supervised on an active call
    assert_eq!(pair.a.lib.next_timer(), None);
    assert_eq!(pair.b.lib.next_timer(), None);

    // User hangs up; the network application releases
    pair.b.lib.disconnect_request(b_call, cause_ies(CauseValue::NormalCallClearing)).unwrap();
    pair.pump();
    let inds = pair.a.take_indications();
    assert_eq!(inds.len(), 2);
    assert_eq!(inds[0], Q931Indication::DisconnectChannel { call: a_call, channel: 1 });
    assert!(matches!(&inds[1], Q931Indication::Disconnect { ies, .. } if cause_of(ies) == Some(16)));
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::DisconnectIndication));

    pair.a.lib.release_request(a_call, Ies::new()).unwrap();
    pair.pump();
    assert!(matches!(pair.a.take_indications().as_slice(), [Q931Indication::ReleaseConfirm { timed_out: false, .. }]));
    assert!(matches!(
        pair.b.take_indications().as_slice(),
        [Q931Indication::DisconnectChannel { .. }, Q931Indication::Release { .. }]
    ));

    assert_eq!(pair.a.lib.active_calls_cnt(), 0);
    assert_eq!(pair.b.lib.active_calls_cnt(), 0);
    assert_eq!(pair.a.channel_state(1), ChannelState::Available);
    assert_eq!(pair.b.channel_state(1), ChannelState::Available);
    assert_eq!(pair.a.lib.next_timer(), None);
    assert_eq!(pair.b.lib.next_timer(), None);
}

#[test]
fn test_second_call_takes_the_other_channel() {
    debug::setup_logging_verbose();
    let mut pair = LinkedPair::new(IntfType::BraPointToPoint);
    let (a_first, _) = connect_call(&mut pair);

    let a_second = pair.a.lib.setup_request(pair.a.intf, setup_ies("200")).unwrap();
    pair.pump();
    assert!(matches!(pair.b.take_indications().as_slice(), [Q931Indication::Setup { .. }]));
    assert_eq!(pair.a.lib.call(a_second).map(|c| c.channels.first()), Some(Some(2)));
    assert_eq!(pair.b.channel_state(2), ChannelState::Selected);
    assert_eq!(pair.a.lib.active_calls_cnt(), 2);

    // Both channels busy: a third call is refused before anything is sent
    assert!(pair.a.lib.setup_request(pair.a.intf, setup_ies("300")).is_err());
    assert!(pair.a.take_frames().is_empty());

    assert!(pair.a.lib.call(a_first).is_some());
}

#[test]
fn test_unanswered_call_times_out_on_network_side() {
    debug::setup_logging_verbose();
    let mut pair = LinkedPair::new(IntfType::BraPointToPoint);
    let a_call = pair.a.lib.setup_request(pair.a.intf, setup_ies("100")).unwrap();
    pair.pump();
    let b_call = match pair.b.take_indications().as_slice() {
        [Q931Indication::Setup { call, .. }] => *call,
        other => panic!("expected a setup indication, got {:?}", other),
    };
    pair.b.lib.alerting_request(b_call, Ies::new()).unwrap();
    pair.pump();
    pair.a.take_indications();

    // T301 gives up on the ringing user, the disconnect reaches the user application
    pair.advance(180 * LONGTIME_SECOND);
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::DisconnectRequest));
    assert!(matches!(
        pair.b.take_indications().as_slice(),
        [Q931Indication::Disconnect { ies, .. }] if cause_of(ies) == Some(CauseValue::NoAnswerFromUser.into_raw() as u8)
    ));

    pair.b.lib.release_request(b_call, Ies::new()).unwrap();
    pair.pump();
    assert_eq!(pair.a.lib.active_calls_cnt(), 0);
    assert_eq!(pair.b.lib.active_calls_cnt(), 0);
}

#[test]
fn test_disconnect_collision() {
    debug::setup_logging_verbose();
    let mut pair = LinkedPair::new(IntfType::BraPointToPoint);
    let (a_call, b_call) = connect_call(&mut pair);

    // Both hang up before seeing the other's DISCONNECT
    pair.a.lib.disconnect_request(a_call, Ies::new()).unwrap();
    pair.b.lib.disconnect_request(b_call, Ies::new()).unwrap();
    pair.pump();

    assert!(pair.a.take_indications().iter().any(|i| matches!(i, Q931Indication::ReleaseConfirm { .. })));
    assert!(pair.b.take_indications().iter().any(|i| matches!(i, Q931Indication::ReleaseConfirm { .. })));
    assert_eq!(pair.a.lib.active_calls_cnt(), 0);
    assert_eq!(pair.b.lib.active_calls_cnt(), 0);
    assert_eq!(pair.a.lib.next_timer(), None);
    assert_eq!(pair.b.lib.next_timer(), None);
}

#[test]
fn test_release_collision() {
    debug::setup_logging_verbose();
    let mut pair = LinkedPair::new(IntfType::BraPointToPoint);
    let (a_call, b_call) = connect_call(&mut pair);

    pair.a.lib.release_request(a_call, Ies::new()).unwrap();
    pair.b.lib.release_request(b_call, Ies::new()).unwrap();
    assert_eq!(pair.a.call_state(a_call), Some(CallStateValue::ReleaseRequest));
    pair.pump();

    // Crossing RELEASEs end the call on both sides without RELEASE COMPLETE
    assert!(matches!(
        pair.a.take_indications().as_slice(),
        [Q931Indication::DisconnectChannel { .. }, Q931Indication::ReleaseConfirm { timed_out: false, .. }]
    ));
    assert!(matches!(
        pair.b.take_indications().as_slice(),
        [Q931Indication::DisconnectChannel { .. }, Q931Indication::ReleaseConfirm { timed_out: false, .. }]
    ));
    assert_eq!(pair.a.lib.active_calls_cnt(), 0);
    assert_eq!(pair.b.lib.active_calls_cnt(), 0);
}

#[test]
fn test_status_enquiry_answered_by_peer() {
    debug::setup_logging_verbose();
    let mut pair = LinkedPair::new(IntfType::BraPointToPoint);
    let (a_call, b_call) = connect_call(&mut pair);

    pair.a.lib.status_enquiry_request(a_call, Ies::new()).unwrap();
    assert_eq!(pair.a.lib.next_timer(), Some(4 * LONGTIME_SECOND));
    pair.pump();
    match pair.a.take_indications().as_slice() {
        [Q931Indication::Status { call, ies }] => {
            assert_eq!(*call, a_call);
            assert_eq!(ies.call_state().map(|s| s.value), Some(CallStateValue::Active));
            assert_eq!(cause_of(ies), Some(CauseValue::ResponseToStatusEnquiry.into_raw() as u8));
        }
        other => panic!("expected a status indication, got {:?}", other),
    }
    // STATUS stopped T322
    assert_eq!(pair.a.lib.next_timer(), None);
    assert!(pair.b.take_indications().is_empty());
    assert_eq!(pair.b.call_state(b_call), Some(CallStateValue::Active));
}
