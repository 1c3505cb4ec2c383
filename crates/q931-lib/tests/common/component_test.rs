use std::cell::RefCell;
use std::rc::Rc;

use q931_config::{IntfConfig, IntfType, Role};
use q931_core::{Longtime, ManualClock};
use q931_ies::Ie;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::location::Location;
use q931_ies::enums::message_type::MessageType;
use q931_ies::enums::user_info_layer1::UserInfoLayer1;
use q931_ies::fields::party_number::PartyNumber;
use q931_ies::ies::{BearerCapability, CalledPartyNumber, Cause};
use q931_ies::message::{CallRef, Ies, Q931Message};
use q931_lib::{CallId, ChannelState, DlcId, IntfId, Q931Indication, Q931Lib, TEI_P2P};

use super::sink::{Sink, SinkLog};

/// Creates a default interface config for testing. It can still be modified as needed
/// before passing it to the ComponentTest constructor
pub fn default_test_config(role: Role, intf_type: IntfType) -> IntfConfig {
    let name = if role.is_nt() { "nt0" } else { "te0" };
    IntfConfig::new(name, role, intf_type)
}

/// Bearer capability and called number, enough for a SETUP
pub fn setup_ies(digits: &str) -> Ies {
    Ies::new()
        .with(Ie::BearerCapability(BearerCapability::speech(UserInfoLayer1::G711Alaw)))
        .with(Ie::CalledPartyNumber(CalledPartyNumber(PartyNumber::unknown(digits))))
}

pub fn cause_ies(cause: CauseValue) -> Ies {
    Ies::new().with(Ie::Cause(Cause::new(Location::User, cause)))
}

/// Raw cause value of the first Cause IE
pub fn cause_of(ies: &Ies) -> Option<u8> {
    ies.cause().map(|c| c.value)
}

/// One Q.931 library with a single interface, a recording link layer and a manual clock
pub struct ComponentTest {
    pub lib: Q931Lib,
    pub clock: ManualClock,
    pub intf: IntfId,
    log: Rc<RefCell<SinkLog>>,
}

impl ComponentTest {
    pub fn new(config: IntfConfig) -> Self {
        let log = Rc::new(RefCell::new(SinkLog::default()));
        Self::with_sink(config, Sink::new(log.clone()), log, ManualClock::new(0))
    }

    /// Links are only reported up when the test calls `Q931Lib::dlc_established`
    pub fn with_pending_links(config: IntfConfig) -> Self {
        let log = Rc::new(RefCell::new(SinkLog::default()));
        Self::with_sink(config, Sink::pending(log.clone()), log, ManualClock::new(0))
    }

    pub fn with_clock(config: IntfConfig, clock: ManualClock) -> Self {
        let log = Rc::new(RefCell::new(SinkLog::default()));
        Self::with_sink(config, Sink::new(log.clone()), log, clock)
    }

    fn with_sink(config: IntfConfig, sink: Sink, log: Rc<RefCell<SinkLog>>, clock: ManualClock) -> Self {
        let mut lib = Q931Lib::with_clock(Box::new(sink), Box::new(clock.clone()));
        let intf = lib.open_interface(config).expect("test config must be valid");
        Self { lib, clock, intf, log }
    }

    pub fn dlc(&self, tei: u8) -> DlcId {
        DlcId::new(self.intf, tei)
    }

    pub fn callref_len(&self) -> u8 {
        self.lib.interface(self.intf).map(|i| i.callref_len()).unwrap_or(1)
    }

    /// Call reference of a message from the peer. `ours` is true for calls this side originated.
    pub fn peer_callref(&self, value: u16, ours: bool) -> CallRef {
        CallRef::new(self.callref_len(), value, ours)
    }

    /// Encode `msg` and feed it to the stack as if received on `tei`
    pub fn deliver(&mut self, tei: u8, msg: &Q931Message) {
        let frame = msg.to_bytes().expect("test message must encode");
        self.deliver_frame(tei, &frame);
    }

    pub fn deliver_frame(&mut self, tei: u8, frame: &[u8]) {
        let dlc = self.dlc(tei);
        self.lib.receive(dlc, frame);
    }

    pub fn deliver_hex(&mut self, tei: u8, hex_str: &str) {
        let frame = hex::decode(hex_str).expect("test vector must be hex");
        self.deliver_frame(tei, &frame);
    }

    /// Message from the peer on the point-to-point link
    pub fn deliver_p2p(&mut self, callref: CallRef, message_type: MessageType, ies: Ies) {
        self.deliver(TEI_P2P, &Q931Message::new(callref, message_type, ies));
    }

    /// Raw frames sent since the last call
    pub fn take_frames(&mut self) -> Vec<(DlcId, Vec<u8>)> {
        std::mem::take(&mut self.log.borrow_mut().frames)
    }

    /// Decoded messages sent since the last call
    pub fn take_sent(&mut self) -> Vec<(DlcId, Q931Message)> {
        self.take_frames()
            .into_iter()
            .map(|(dlc, frame)| (dlc, Q931Message::from_bytes(&frame).expect("stack sent an undecodable frame")))
            .collect()
    }

    pub fn take_sent_types(&mut self) -> Vec<MessageType> {
        self.take_sent().into_iter().map(|(_, m)| m.message_type).collect()
    }

    /// The single message sent since the last call
    pub fn take_one_sent(&mut self) -> Q931Message {
        let mut sent = self.take_sent();
        assert_eq!(sent.len(), 1, "expected exactly one message, got {:?}", sent);
        sent.remove(0).1
    }

    pub fn take_indications(&mut self) -> Vec<Q931Indication> {
        let mut inds = vec![];
        while let Some(ind) = self.lib.next_indication() {
            inds.push(ind);
        }
        inds
    }

    /// Deliver a SETUP on the point-to-point link and return the call it created
    pub fn incoming_call(&mut self, setup_hex: &str) -> CallId {
        self.deliver_hex(TEI_P2P, setup_hex);
        match self.take_indications().as_slice() {
            [Q931Indication::Setup { call, .. }] => *call,
            other => panic!("expected a setup indication, got {:?}", other),
        }
    }

    pub fn call_state(&self, call: CallId) -> Option<CallStateValue> {
        self.lib.call(call).map(|c| c.state)
    }

    pub fn channel_state(&self, chan: u8) -> ChannelState {
        let intf = self.lib.interface(self.intf).expect("interface is open");
        intf.channels.iter().find(|c| c.id == chan).map(|c| c.state).expect("no such channel")
    }

    pub fn connects(&self) -> Vec<DlcId> {
        self.log.borrow().connects.clone()
    }

    pub fn disconnects(&self) -> Vec<DlcId> {
        self.log.borrow().disconnects.clone()
    }

    /// Move the clock and fire what expired
    pub fn advance(&mut self, delta: Longtime) {
        self.clock.advance(delta);
        self.lib.run_timers();
    }
}

/// Two libraries wired back to back over point-to-point links: `a` on the network side, `b` on the user side
pub struct LinkedPair {
    pub a: ComponentTest,
    pub b: ComponentTest,
}

impl LinkedPair {
    pub fn new(intf_type: IntfType) -> Self {
        let clock = ManualClock::new(0);
        let a = ComponentTest::with_clock(default_test_config(Role::Nt, intf_type), clock.clone());
        let b = ComponentTest::with_clock(default_test_config(Role::Te, intf_type), clock);
        Self { a, b }
    }

    /// Carry frames between the two sides until neither has anything left to send
    pub fn pump(&mut self) {
        loop {
            let from_a = self.a.take_frames();
            let from_b = self.b.take_frames();
            if from_a.is_empty() && from_b.is_empty() {
                break;
            }
            for (_, frame) in from_a {
                self.b.deliver_frame(TEI_P2P, &frame);
            }
            for (_, frame) in from_b {
                self.a.deliver_frame(TEI_P2P, &frame);
            }
        }
    }

    /// Move the shared clock and fire what expired on both sides
    pub fn advance(&mut self, delta: Longtime) {
        self.a.clock.advance(delta);
        self.a.lib.run_timers();
        self.b.lib.run_timers();
        self.pump();
    }
}
