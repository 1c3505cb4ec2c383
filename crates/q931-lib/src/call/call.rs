use core::fmt;

use q931_config::{Q931Timers, Role};
use q931_core::{Direction, Longtime};
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::ies::Cause;
use q931_ies::message::{CallRef, Ies};

use crate::call::ces::Ces;
use crate::chanset::Chanset;
use crate::transport::{DlcId, IntfId};

/// Library-wide handle of a call, stable for the lifetime of the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallId(pub u32);

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-call protocol timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallTimer {
    T301,
    T302,
    T303,
    T304,
    T305,
    T306,
    T308,
    T309,
    T310,
    T312,
    T313,
    T318,
    T319,
    T322,
}

impl CallTimer {
    pub fn duration(&self, timers: &Q931Timers) -> Longtime {
        match self {
            CallTimer::T301 => timers.t301,
            CallTimer::T302 => timers.t302,
            CallTimer::T303 => timers.t303,
            CallTimer::T304 => timers.t304,
            CallTimer::T305 => timers.t305,
            CallTimer::T306 => timers.t306,
            CallTimer::T308 => timers.t308,
            CallTimer::T309 => timers.t309,
            CallTimer::T310 => timers.t310,
            CallTimer::T312 => timers.t312,
            CallTimer::T313 => timers.t313,
            CallTimer::T318 => timers.t318,
            CallTimer::T319 => timers.t319,
            CallTimer::T322 => timers.t322,
        }
    }
}

impl fmt::Display for CallTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One call attempt on an interface.
/// `state` is kept in the local sense: outbound calls walk CallInitiated..CallDelivered,
/// inbound calls CallPresent..ConnectRequest, whichever side of the interface we are.
#[derive(Debug)]
pub struct Call {
    pub id: CallId,
    pub intf: IntfId,
    pub intf_name: String,
    pub callref: u16,
    pub callref_len: u8,
    pub direction: Direction,
    pub state: CallStateValue,
    /// DLC carrying the call. Broadcast while a multipoint SETUP has no selected CES.
    pub dlc: DlcId,
    pub channels: Chanset,
    /// Responding terminals of a broadcast SETUP
    pub ces: Vec<Ces>,
    pub selected_ces: Option<u8>,

    /// SETUP content, kept for the T303 retransmission
    pub(crate) setup_ies: Option<Ies>,
    /// RELEASE content, kept for the T308 retransmission
    pub(crate) release_ies: Option<Ies>,
    /// Cause of the DISCONNECT sent, repeated in RELEASE when T305 or T306 expires
    pub(crate) disconnect_cause: Option<Cause>,
    pub(crate) t303_expired: bool,
    pub(crate) t308_expired: bool,
    pub(crate) t322_retries: u32,
    /// Channel identification still owed to the peer in the first response to SETUP
    pub(crate) chanid_pending: bool,
    /// Call identity of a SUSPEND in progress
    pub(crate) suspend_identity: Vec<u8>,
    /// Parked call a RESUME in progress refers to
    pub(crate) resumed_from: Option<CallId>,
    /// Last cause reported by a clearing CES, used if the whole broadcast call fails
    pub(crate) ces_cause: Option<u8>,
}

impl Call {
    pub fn new(id: CallId, intf: IntfId, intf_name: &str, callref: u16, callref_len: u8, direction: Direction, dlc: DlcId) -> Self {
        Call {
            id,
            intf,
            intf_name: intf_name.to_string(),
            callref,
            callref_len,
            direction,
            state: CallStateValue::Null,
            dlc,
            channels: Chanset::new(),
            ces: Vec::new(),
            selected_ces: None,
            setup_ies: None,
            release_ies: None,
            disconnect_cause: None,
            t303_expired: false,
            t308_expired: false,
            t322_retries: 0,
            chanid_pending: false,
            suspend_identity: Vec::new(),
            resumed_from: None,
            ces_cause: None,
        }
    }

    /// Call reference as this side transmits it
    pub fn tx_callref(&self) -> CallRef {
        CallRef::new(self.callref_len, self.callref, self.direction.tx_callref_flag())
    }

    pub fn set_state(&mut self, state: CallStateValue) {
        if self.state != state {
            tracing::debug!(intf = %self.intf_name, callref = %self.tx_callref(), "call {} state {} -> {}", self.id, self.state, state);
            self.state = state;
        }
    }

    /// State number reported in the Call state IE
    pub fn wire_state(&self, role: Role) -> CallStateValue {
        if role.is_nt() { network_state(self.state) } else { self.state }
    }

    /// Clearing has started on this call
    pub fn is_clearing(&self) -> bool {
        matches!(
            self.state,
            CallStateValue::DisconnectRequest | CallStateValue::DisconnectIndication | CallStateValue::ReleaseRequest
        )
    }

    pub fn ces(&self, tei: u8) -> Option<&Ces> {
        self.ces.iter().find(|c| c.tei == tei)
    }

    pub fn ces_mut(&mut self, tei: u8) -> Option<&mut Ces> {
        self.ces.iter_mut().find(|c| c.tei == tei)
    }

    /// Call state derived from the most advanced responding CES
    pub fn best_ces_state(&self) -> Option<CallStateValue> {
        self.ces.iter().filter(|c| c.is_responding()).max_by_key(|c| c.rank()).map(|c| c.state)
    }
}

/// Network side number of a local call state.
/// The network side numbers its states from the opposite end of the call.
pub fn network_state(local: CallStateValue) -> CallStateValue {
    use CallStateValue::*;
    match local {
        CallInitiated => CallPresent,
        CallPresent => CallInitiated,
        OverlapSending => OverlapReceiving,
        OverlapReceiving => OverlapSending,
        OutgoingCallProceeding => IncomingCallProceeding,
        IncomingCallProceeding => OutgoingCallProceeding,
        CallDelivered => CallReceived,
        CallReceived => CallDelivered,
        DisconnectRequest => DisconnectIndication,
        DisconnectIndication => DisconnectRequest,
        s => s,
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call {} {} {} {} {}", self.id, self.intf_name, self.tx_callref(), self.direction, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::ces::Ces;

    fn call(direction: Direction) -> Call {
        Call::new(CallId(1), 0, "A", 5, 1, direction, DlcId::new(0, 0))
    }

    #[test]
    fn test_wire_state_mirrors_on_network_side() {
        let mut c = call(Direction::Outbound);
        c.set_state(CallStateValue::CallDelivered);
        assert_eq!(c.wire_state(Role::Te), CallStateValue::CallDelivered);
        assert_eq!(c.wire_state(Role::Nt), CallStateValue::CallReceived);

        c.set_state(CallStateValue::Active);
        assert_eq!(c.wire_state(Role::Nt), CallStateValue::Active);

        let mut c = call(Direction::Inbound);
        c.set_state(CallStateValue::OverlapReceiving);
        assert_eq!(c.wire_state(Role::Nt), CallStateValue::OverlapSending);
    }

    #[test]
    fn test_callref_flag_follows_direction() {
        assert!(!call(Direction::Outbound).tx_callref().flag);
        assert!(call(Direction::Inbound).tx_callref().flag);
    }

    #[test]
    fn test_best_ces_state() {
        let mut c = call(Direction::Outbound);
        assert_eq!(c.best_ces_state(), None);
        let mut a = Ces::new(1, DlcId::new(0, 1));
        a.set_state(CallStateValue::CallDelivered);
        let mut b = Ces::new(2, DlcId::new(0, 2));
        b.set_state(CallStateValue::OutgoingCallProceeding);
        c.ces.push(a);
        c.ces.push(b);
        assert_eq!(c.best_ces_state(), Some(CallStateValue::CallDelivered));

        c.ces_mut(1).unwrap().set_state(CallStateValue::ReleaseRequest);
        assert_eq!(c.best_ces_state(), Some(CallStateValue::OutgoingCallProceeding));
    }
}
