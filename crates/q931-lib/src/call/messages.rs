//! Messages received for an existing call

use q931_ies::enums::call_state_value::CallStateValue::{self, *};
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::message_type::MessageType;
use q931_ies::message::mandatory::{MandatoryIeErr, check_mandatory};
use q931_ies::message::{Ies, Q931Message};

use crate::Q931Lib;
use crate::call::ces::state_rank;
use crate::call::{CallId, CallTimer, network_state};
use crate::ccb::Q931Indication;
use crate::error::Result;
use crate::transport::DlcId;

/// Outgoing call states before the peer answered
const OUTGOING_UNANSWERED: &[CallStateValue] = &[CallInitiated, OverlapSending, OutgoingCallProceeding, CallDelivered];

const PROGRESS_ALLOWED: &[CallStateValue] = &[
    CallInitiated,
    OverlapSending,
    OutgoingCallProceeding,
    CallDelivered,
    OverlapReceiving,
    IncomingCallProceeding,
    CallReceived,
    DisconnectIndication,
];

/// States in which a call is set up far enough to carry INFORMATION, NOTIFY and FACILITY
const ESTABLISHING_OR_ACTIVE: &[CallStateValue] = &[
    CallInitiated,
    OverlapSending,
    OutgoingCallProceeding,
    CallDelivered,
    CallPresent,
    CallReceived,
    ConnectRequest,
    IncomingCallProceeding,
    Active,
    OverlapReceiving,
    DisconnectRequest,
    DisconnectIndication,
    SuspendRequest,
    ResumeRequest,
];

impl Q931Lib {
    /// Entry point for a message whose call reference matched `call`
    pub(crate) fn call_rx(&mut self, call: CallId, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let c = self.get_call(call)?;
        if c.dlc.is_broadcast() && c.selected_ces.is_none() {
            return self.ces_rx(call, dlc, msg);
        }
        if c.selected_ces.is_some_and(|tei| tei != dlc.tei) {
            return self.ces_rx_late(call, dlc, msg);
        }

        let role = self.call_role(call)?;
        if let Err(err) = check_mandatory(&msg, role) {
            return self.rx_mandatory_error(call, msg, err);
        }

        let state = self.get_call(call)?.state;
        if state == ReleaseRequest
            && !matches!(
                msg.message_type,
                MessageType::Release | MessageType::ReleaseComplete | MessageType::Status | MessageType::StatusEnquiry
            )
        {
            tracing::debug!(intf = %self.intf_name(dlc.intf), "call {} ignoring {} while releasing", call, msg.message_type);
            return Ok(());
        }

        match msg.message_type {
            MessageType::SetupAcknowledge => self.rx_setup_acknowledge(call, msg),
            MessageType::CallProceeding => self.rx_call_proceeding(call, msg),
            MessageType::Alerting => self.rx_alerting(call, msg),
            MessageType::Connect => self.rx_connect(call, msg),
            MessageType::ConnectAcknowledge => self.rx_connect_acknowledge(call, msg),
            MessageType::Progress => self.rx_progress(call, msg),
            MessageType::Information => self.rx_information(call, msg),
            MessageType::Notify => self.rx_passthrough(call, msg, |call, ies| Q931Indication::Notify { call, ies }),
            MessageType::Facility => self.rx_passthrough(call, msg, |call, ies| Q931Indication::Facility { call, ies }),
            MessageType::Disconnect => self.rx_disconnect(call, msg),
            MessageType::Release => self.rx_release(call, msg),
            MessageType::ReleaseComplete => self.rx_release_complete(call, msg),
            MessageType::Status => self.rx_status(call, msg),
            MessageType::StatusEnquiry => self.send_status(call, CauseValue::ResponseToStatusEnquiry, None),
            MessageType::Suspend => self.rx_suspend(call, msg),
            MessageType::SuspendAcknowledge => self.rx_suspend_acknowledge(call, msg),
            MessageType::SuspendReject => self.rx_suspend_reject(call, msg),
            MessageType::ResumeAcknowledge => self.rx_resume_acknowledge(call, msg),
            MessageType::ResumeReject => self.rx_resume_reject(call, msg),
            MessageType::Setup => {
                // Retransmitted SETUP for a call we already know
                tracing::debug!(intf = %self.intf_name(dlc.intf), "call {} ignoring repeated SETUP", call);
                Ok(())
            }
            MessageType::UserInformation | MessageType::Segment | MessageType::CongestionControl => {
                let mt = msg.message_type.into_raw() as u8;
                self.send_status(call, CauseValue::MessageTypeNonExistentOrNotImplemented, Some(mt))?;
                self.indicate(Q931Indication::Error { call, cause: CauseValue::MessageTypeNonExistentOrNotImplemented.into_raw() as u8 });
                Ok(())
            }
            MessageType::Resume | MessageType::Restart | MessageType::RestartAcknowledge => self.rx_unexpected(call, &msg),
        }
    }

    /// Answer a message that is not allowed in the current state. The state does not change.
    fn rx_unexpected(&mut self, call: CallId, msg: &Q931Message) -> Result<()> {
        let c = self.get_call(call)?;
        tracing::warn!(intf = %c.intf_name, callref = %c.tx_callref(), "unexpected {} in {}", msg.message_type, c.state);
        let mt = msg.message_type.into_raw() as u8;
        self.send_status(call, CauseValue::MessageNotCompatibleWithCallState, Some(mt))?;
        self.indicate(Q931Indication::Error { call, cause: CauseValue::MessageNotCompatibleWithCallState.into_raw() as u8 });
        Ok(())
    }

    /// Check the call state; answers with STATUS and returns false when not allowed
    fn rx_allowed(&mut self, call: CallId, msg: &Q931Message, allowed: &[CallStateValue]) -> Result<bool> {
        if allowed.contains(&self.get_call(call)?.state) {
            return Ok(true);
        }
        self.rx_unexpected(call, msg)?;
        Ok(false)
    }

    fn rx_mandatory_error(&mut self, call: CallId, msg: Q931Message, err: MandatoryIeErr) -> Result<()> {
        let c = self.get_call(call)?;
        let (intf, dlc, callref) = (c.intf, c.dlc, c.tx_callref());
        tracing::warn!(intf = %c.intf_name, callref = %callref, "{} rejected: cause {} IE 0x{:02x}", msg.message_type, err.cause.into_raw(), err.id);

        match msg.message_type {
            MessageType::Disconnect => {
                let ies = Ies::new().with(self.cause_ie(intf, err.cause, Some(err.id)));
                self.start_release(call, ies)?;
            }
            MessageType::Release => {
                self.send_release_complete_on(dlc, callref, err.cause, Some(err.id))?;
                let ies = Ies::new().with(self.cause_ie(intf, err.cause, Some(err.id)));
                self.disconnect_channels(call);
                self.destroy_call(call);
                self.indicate(Q931Indication::Release { call, ies });
            }
            // Nothing useful to answer a broken STATUS with
            MessageType::Status => return Ok(()),
            _ => self.send_status(call, err.cause, Some(err.id))?,
        }
        self.indicate(Q931Indication::Error { call, cause: err.cause.into_raw() as u8 });
        Ok(())
    }

    /// Take the channel named in a response to our SETUP; clear the call if it is unusable
    fn rx_take_channel(&mut self, call: CallId, ies: &Ies) -> Result<bool> {
        match self.accept_peer_channel(call, ies) {
            Ok(()) => Ok(true),
            Err(cause) => {
                tracing::warn!("call {} peer channel refused, cause {}", call, cause.into_raw());
                self.release_with_cause(call, cause)?;
                self.indicate(Q931Indication::Error { call, cause: cause.into_raw() as u8 });
                Ok(false)
            }
        }
    }

    fn rx_setup_acknowledge(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, &[CallInitiated])? {
            return Ok(());
        }
        self.stop_call_timer(call, CallTimer::T303);
        if !self.rx_take_channel(call, &msg.ies)? {
            return Ok(());
        }
        self.start_call_timer(call, CallTimer::T304);
        self.set_call_state(call, OverlapSending);
        self.indicate(Q931Indication::MoreInfo { call, ies: msg.ies });
        Ok(())
    }

    fn rx_call_proceeding(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, &[CallInitiated, OverlapSending])? {
            return Ok(());
        }
        self.stop_call_timers(call, &[CallTimer::T303, CallTimer::T304]);
        if !self.rx_take_channel(call, &msg.ies)? {
            return Ok(());
        }
        self.start_call_timer(call, CallTimer::T310);
        self.set_call_state(call, OutgoingCallProceeding);
        self.indicate(Q931Indication::Proceeding { call, ies: msg.ies });
        Ok(())
    }

    fn rx_alerting(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, &[CallInitiated, OverlapSending, OutgoingCallProceeding])? {
            return Ok(());
        }
        self.stop_call_timers(call, &[CallTimer::T303, CallTimer::T304, CallTimer::T310]);
        if !self.rx_take_channel(call, &msg.ies)? {
            return Ok(());
        }
        self.start_call_timer(call, CallTimer::T301);
        self.set_call_state(call, CallDelivered);
        self.indicate(Q931Indication::Alerting { call, ies: msg.ies });
        Ok(())
    }

    /// CONNECT on an outgoing call. The user side acknowledges at once; the network side
    /// waits for the application's setup complete request.
    fn rx_connect(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, OUTGOING_UNANSWERED)? {
            return Ok(());
        }
        self.stop_call_timers(call, &[CallTimer::T301, CallTimer::T303, CallTimer::T304, CallTimer::T310]);
        if !self.rx_take_channel(call, &msg.ies)? {
            return Ok(());
        }
        if self.call_role(call)?.is_nt() {
            self.set_call_state(call, ConnectRequest);
        } else {
            self.call_send(call, MessageType::ConnectAcknowledge, Ies::new())?;
            self.set_call_state(call, Active);
            self.connect_channels(call);
        }
        self.indicate(Q931Indication::SetupConfirm { call, ies: msg.ies });
        Ok(())
    }

    fn rx_connect_acknowledge(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        let c = self.get_call(call)?;
        match c.state {
            ConnectRequest if c.direction.is_inbound() => {
                self.stop_call_timer(call, CallTimer::T313);
                self.set_call_state(call, Active);
                self.connect_channels(call);
                self.indicate(Q931Indication::SetupComplete { call, ies: msg.ies });
                Ok(())
            }
            // The network side went Active when it sent CONNECT
            Active => Ok(()),
            _ => self.rx_unexpected(call, &msg),
        }
    }

    fn rx_progress(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, PROGRESS_ALLOWED)? {
            return Ok(());
        }
        self.stop_call_timers(call, &[CallTimer::T303, CallTimer::T304, CallTimer::T310]);
        self.indicate(Q931Indication::Progress { call, ies: msg.ies });
        Ok(())
    }

    fn rx_information(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, ESTABLISHING_OR_ACTIVE)? {
            return Ok(());
        }
        match self.get_call(call)?.state {
            OverlapReceiving => self.start_call_timer(call, CallTimer::T302),
            OverlapSending => self.start_call_timer(call, CallTimer::T304),
            _ => {}
        }
        self.indicate(Q931Indication::Info { call, ies: msg.ies });
        Ok(())
    }

    fn rx_passthrough(&mut self, call: CallId, msg: Q931Message, ind: fn(CallId, Ies) -> Q931Indication) -> Result<()> {
        if !self.rx_allowed(call, &msg, ESTABLISHING_OR_ACTIVE)? {
            return Ok(());
        }
        self.indicate(ind(call, msg.ies));
        Ok(())
    }

    fn rx_disconnect(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        match self.get_call(call)?.state {
            DisconnectRequest => {
                // Clear collision: both sides sent DISCONNECT
                let c = self.get_call(call)?;
                tracing::info!(intf = %c.intf_name, callref = %c.tx_callref(), "disconnect collision");
                self.release_with_cause(call, CauseValue::NormalCallClearing)
            }
            DisconnectIndication => Ok(()),
            Null => self.rx_unexpected(call, &msg),
            _ => {
                self.stop_all_call_timers(call);
                self.disconnect_channels(call);
                self.set_call_state(call, DisconnectIndication);
                self.indicate(Q931Indication::Disconnect { call, ies: msg.ies });
                Ok(())
            }
        }
    }

    fn rx_release(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        self.stop_all_call_timers(call);
        self.disconnect_channels(call);
        if self.get_call(call)?.state == ReleaseRequest {
            // Clear collision: RELEASE crossed ours, no RELEASE COMPLETE follows
            self.destroy_call(call);
            self.indicate(Q931Indication::ReleaseConfirm { call, ies: msg.ies, timed_out: false });
            return Ok(());
        }
        let res = self.call_send(call, MessageType::ReleaseComplete, Ies::new());
        self.destroy_call(call);
        self.indicate(Q931Indication::Release { call, ies: msg.ies });
        res
    }

    fn rx_release_complete(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        let state = self.get_call(call)?.state;
        self.disconnect_channels(call);
        self.destroy_call(call);
        let ies = msg.ies;
        self.indicate(match state {
            ReleaseRequest => Q931Indication::ReleaseConfirm { call, ies, timed_out: false },
            CallInitiated => Q931Indication::Reject { call, ies },
            ResumeRequest => Q931Indication::ResumeConfirm { call, ies, ok: false },
            _ => Q931Indication::Release { call, ies },
        });
        Ok(())
    }

    fn rx_status(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        self.stop_call_timer(call, CallTimer::T322);
        let peer = msg.ies.call_state().map(|s| s.value);
        if peer == Some(Null) {
            let c = self.get_call(call)?;
            tracing::info!(intf = %c.intf_name, callref = %c.tx_callref(), "peer reports Null, clearing");
            self.disconnect_channels(call);
            self.destroy_call(call);
            self.indicate(Q931Indication::Release { call, ies: msg.ies });
            return Ok(());
        }
        self.indicate(Q931Indication::Status { call, ies: msg.ies });
        Ok(())
    }

    /// SUSPEND on the network side. An identity already parked is refused at once.
    fn rx_suspend(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.call_role(call)?.is_nt() {
            return self.rx_unexpected(call, &msg);
        }
        if !self.rx_allowed(call, &msg, &[Active])? {
            return Ok(());
        }
        let identity = msg.ies.call_identity().map(|c| c.identity.clone()).unwrap_or_default();
        let intf = self.get_call(call)?.intf;
        if self.intf(intf)?.parked.iter().any(|p| p.identity == identity) {
            let ies = Ies::new().with(self.cause_ie(intf, CauseValue::CallIdentityInUse, None));
            return self.call_send(call, MessageType::SuspendReject, ies);
        }
        self.get_call_mut(call)?.suspend_identity = identity;
        self.set_call_state(call, SuspendRequest);
        self.indicate(Q931Indication::Suspend { call, ies: msg.ies });
        Ok(())
    }

    fn rx_suspend_acknowledge(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, &[SuspendRequest])? {
            return Ok(());
        }
        self.stop_call_timer(call, CallTimer::T319);
        self.disconnect_channels(call);
        self.destroy_call(call);
        self.indicate(Q931Indication::SuspendConfirm { call, ies: msg.ies, ok: true });
        Ok(())
    }

    fn rx_suspend_reject(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, &[SuspendRequest])? {
            return Ok(());
        }
        self.stop_call_timer(call, CallTimer::T319);
        self.set_call_state(call, Active);
        self.indicate(Q931Indication::SuspendConfirm { call, ies: msg.ies, ok: false });
        Ok(())
    }

    fn rx_resume_acknowledge(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, &[ResumeRequest])? {
            return Ok(());
        }
        self.stop_call_timer(call, CallTimer::T318);
        if !self.rx_take_channel(call, &msg.ies)? {
            return Ok(());
        }
        self.set_call_state(call, Active);
        self.connect_channels(call);
        self.indicate(Q931Indication::ResumeConfirm { call, ies: msg.ies, ok: true });
        Ok(())
    }

    fn rx_resume_reject(&mut self, call: CallId, msg: Q931Message) -> Result<()> {
        if !self.rx_allowed(call, &msg, &[ResumeRequest])? {
            return Ok(());
        }
        self.destroy_call(call);
        self.indicate(Q931Indication::ResumeConfirm { call, ies: msg.ies, ok: false });
        Ok(())
    }

    // ------------------------------------ broadcast SETUP ------------------------------------

    /// Response to a broadcast SETUP before any terminal was selected
    fn ces_rx(&mut self, call: CallId, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let tei = dlc.tei;
        let known = self.get_call(call)?.ces(tei).is_some();
        if !known && msg.message_type == MessageType::ReleaseComplete {
            // Terminal refusing the call without ever responding
            self.record_ces_cause(call, &msg.ies);
            return self.check_broadcast_failed(call);
        }
        if !known && !self.call_timer_pending(call, CallTimer::T312) {
            tracing::info!(intf = %self.intf_name(dlc.intf), "call {} late response from tei {}", call, tei);
            let callref = self.get_call(call)?.tx_callref();
            return self.send_release_complete_on(dlc, callref, CauseValue::RecoveryOnTimerExpiry, None);
        }
        self.ensure_ces(call, tei)?;

        let role = self.call_role(call)?;
        if let Err(err) = check_mandatory(&msg, role) {
            let callref = self.get_call(call)?.tx_callref();
            let state = self.get_call(call)?.ces(tei).map(|c| c.state).unwrap_or(Null);
            return self.send_status_on(dlc, callref, err.cause, Some(err.id), network_state(state));
        }

        let ces_state = match msg.message_type {
            MessageType::SetupAcknowledge => OverlapSending,
            MessageType::CallProceeding => OutgoingCallProceeding,
            MessageType::Alerting => CallDelivered,
            MessageType::Connect => ConnectRequest,
            MessageType::Information | MessageType::Progress | MessageType::Notify => {
                let ies = msg.ies;
                self.indicate(match msg.message_type {
                    MessageType::Information => Q931Indication::Info { call, ies },
                    MessageType::Progress => Q931Indication::Progress { call, ies },
                    _ => Q931Indication::Notify { call, ies },
                });
                return Ok(());
            }
            MessageType::Disconnect => {
                self.record_ces_cause(call, &msg.ies);
                let cause = msg.ies.cause().and_then(|c| c.cause_value()).unwrap_or(CauseValue::NormalCallClearing);
                self.release_ces(call, tei, cause)?;
                return self.check_broadcast_failed(call);
            }
            MessageType::Release => {
                self.record_ces_cause(call, &msg.ies);
                let callref = self.get_call(call)?.tx_callref();
                let res = self.send_message(dlc, &Q931Message::new(callref, MessageType::ReleaseComplete, Ies::new()));
                self.remove_ces(call, tei);
                self.check_broadcast_failed(call)?;
                return res;
            }
            MessageType::ReleaseComplete => {
                self.record_ces_cause(call, &msg.ies);
                self.remove_ces(call, tei);
                return self.check_broadcast_failed(call);
            }
            MessageType::StatusEnquiry => {
                let callref = self.get_call(call)?.tx_callref();
                let state = self.get_call(call)?.ces(tei).map(|c| c.state).unwrap_or(Null);
                return self.send_status_on(dlc, callref, CauseValue::ResponseToStatusEnquiry, None, network_state(state));
            }
            MessageType::Status => {
                if msg.ies.call_state().is_some_and(|s| s.value == Null) {
                    self.remove_ces(call, tei);
                    return self.check_broadcast_failed(call);
                }
                return Ok(());
            }
            _ => {
                let callref = self.get_call(call)?.tx_callref();
                let state = self.get_call(call)?.ces(tei).map(|c| c.state).unwrap_or(Null);
                let mt = msg.message_type.into_raw() as u8;
                return self.send_status_on(dlc, callref, CauseValue::MessageNotCompatibleWithCallState, Some(mt), network_state(state));
            }
        };

        // Leg progress, ignoring responses that would move it backwards
        if let Some(ces) = self.get_call_mut(call)?.ces_mut(tei) {
            if state_rank(ces_state) < ces.rank() {
                tracing::debug!("call {} CES tei {} stale {}", call, tei, msg.message_type);
                return Ok(());
            }
            ces.set_state(ces_state);
        }
        self.stop_call_timer(call, CallTimer::T303);

        if ces_state == ConnectRequest {
            self.select_ces(call, tei)?;
            return self.rx_connect(call, msg);
        }

        // The call follows the most advanced leg
        let best = self.get_call(call)?.best_ces_state();
        let current = self.get_call(call)?.state;
        if let Some(best) = best.filter(|b| state_rank(*b) > state_rank(current)) {
            self.set_call_state(call, best);
            let ies = msg.ies;
            match best {
                OverlapSending => self.indicate(Q931Indication::MoreInfo { call, ies }),
                OutgoingCallProceeding => self.indicate(Q931Indication::Proceeding { call, ies }),
                CallDelivered => {
                    self.start_call_timer(call, CallTimer::T301);
                    self.indicate(Q931Indication::Alerting { call, ies })
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Bind the call to the terminal that answered and clear the others with cause 26
    fn select_ces(&mut self, call: CallId, tei: u8) -> Result<()> {
        let c = self.get_call_mut(call)?;
        let Some(pos) = c.ces.iter().position(|x| x.tei == tei) else { return Ok(()) };
        let selected = c.ces.remove(pos);
        // The leg's hold on its DLC passes to the call
        c.dlc = selected.dlc;
        c.selected_ces = Some(tei);
        let others: Vec<u8> = c.ces.iter().filter(|x| x.is_responding()).map(|x| x.tei).collect();
        tracing::info!(intf = %c.intf_name, callref = %c.tx_callref(), "call {} selected tei {}", call, tei);
        self.stop_call_timer(call, CallTimer::T312);
        for other in others {
            self.release_ces(call, other, CauseValue::NonSelectedUserClearing)?;
        }
        Ok(())
    }

    /// Message from a terminal after another terminal was selected
    fn ces_rx_late(&mut self, call: CallId, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let tei = dlc.tei;
        let known = self.get_call(call)?.ces(tei).is_some();
        match msg.message_type {
            MessageType::ReleaseComplete => {
                self.remove_ces(call, tei);
                Ok(())
            }
            MessageType::Release if known => {
                let callref = self.get_call(call)?.tx_callref();
                let res = self.send_message(dlc, &Q931Message::new(callref, MessageType::ReleaseComplete, Ies::new()));
                self.remove_ces(call, tei);
                res
            }
            _ if known => {
                tracing::debug!("call {} CES tei {} ignoring {} while releasing", call, tei, msg.message_type);
                Ok(())
            }
            _ => {
                let callref = self.get_call(call)?.tx_callref();
                self.send_release_complete_on(dlc, callref, CauseValue::NonSelectedUserClearing, None)
            }
        }
    }

    fn record_ces_cause(&mut self, call: CallId, ies: &Ies) {
        let Some(cause) = ies.cause().map(|c| c.value) else { return };
        if let Some(c) = self.calls.get_mut(&call) {
            c.ces_cause = Some(cause);
        }
    }
}
