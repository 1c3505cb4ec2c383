//! Requests and responses from the application

use q931_core::{Direction, IeParseErr};
use q931_ies::Ie;
use q931_ies::enums::call_state_value::CallStateValue::{self, *};
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::ie_id::IeId;
use q931_ies::enums::message_type::MessageType;
use q931_ies::ies::{ChannelIdentification, DateTime};
use q931_ies::message::Ies;

use crate::Q931Lib;
use crate::call::{CallId, CallTimer};
use crate::channel::channel_alloc;
use crate::chanset::Chanset;
use crate::error::{Q931Error, Result};
use crate::intf::ParkedCall;
use crate::q931::TimerKey;
use crate::transport::IntfId;

impl Q931Lib {
    /// Reject a primitive that is not allowed in the current state. Nothing is sent.
    fn check_state(&self, call: CallId, allowed: &[CallStateValue]) -> Result<()> {
        let c = self.get_call(call)?;
        if allowed.contains(&c.state) {
            Ok(())
        } else {
            tracing::warn!(intf = %c.intf_name, callref = %c.tx_callref(), "primitive not allowed in {}", c.state);
            Err(Q931Error::incompatible(c.state))
        }
    }

    /// Reject a primitive reserved to one side of the interface
    fn check_role(&self, call: CallId, nt: bool) -> Result<()> {
        if self.call_role(call)?.is_nt() == nt { Ok(()) } else { Err(Q931Error::incompatible(self.get_call(call)?.state)) }
    }

    /// Allocate a call reference for a new outgoing call on `intf`
    fn take_call_reference(&mut self, intf: IntfId) -> Result<u16> {
        let calls = &self.calls;
        let i = self.intfs.get_mut(&intf).ok_or(Q931Error::UnknownInterface(intf))?;
        i.take_call_reference(|v| calls.values().any(|c| c.intf == intf && c.direction == Direction::Outbound && c.callref == v))
            .ok_or(Q931Error::NoCallReference)
    }

    /// Start an outgoing call: pick a call reference and a channel, send SETUP
    pub fn setup_request(&mut self, intf: IntfId, mut ies: Ies) -> Result<CallId> {
        if ies.bearer_capability().is_none() {
            return Err(Q931Error::Encode(IeParseErr::Inconsistency {
                field: "bearer_capability",
                reason: "mandatory in SETUP",
            }));
        }
        let dlc = self.intf(intf)?.default_dlc();
        let callref = self.take_call_reference(intf)?;
        let call = self.new_call(intf, callref, Direction::Outbound, dlc)?;

        let requested = ies.channel_identification().cloned();
        let chanid = match self.assign_outgoing_channel(call, requested.as_ref()) {
            Ok(c) => c,
            Err(e) => {
                self.destroy_call(call);
                return Err(e);
            }
        };
        ies.remove_all(IeId::ChannelIdentification);
        ies.add(Ie::ChannelIdentification(chanid));

        if let Err(e) = self.call_send(call, MessageType::Setup, ies.clone()) {
            self.destroy_call(call);
            return Err(e);
        }
        self.get_call_mut(call)?.setup_ies = Some(ies);
        self.set_call_state(call, CallInitiated);
        self.start_call_timer(call, CallTimer::T303);
        if dlc.is_broadcast() {
            self.start_call_timer(call, CallTimer::T312);
        }
        Ok(call)
    }

    /// SETUP ACKNOWLEDGE: ask the caller for more digits
    pub fn more_info_request(&mut self, call: CallId, mut ies: Ies) -> Result<()> {
        self.check_state(call, &[CallPresent])?;
        self.add_pending_chanid(call, &mut ies);
        self.call_send(call, MessageType::SetupAcknowledge, ies)?;
        self.start_call_timer(call, CallTimer::T302);
        self.set_call_state(call, OverlapReceiving);
        Ok(())
    }

    pub fn proceeding_request(&mut self, call: CallId, mut ies: Ies) -> Result<()> {
        self.check_state(call, &[CallPresent, OverlapReceiving])?;
        self.add_pending_chanid(call, &mut ies);
        self.call_send(call, MessageType::CallProceeding, ies)?;
        self.stop_call_timer(call, CallTimer::T302);
        self.set_call_state(call, IncomingCallProceeding);
        Ok(())
    }

    pub fn alerting_request(&mut self, call: CallId, mut ies: Ies) -> Result<()> {
        self.check_state(call, &[CallPresent, OverlapReceiving, IncomingCallProceeding])?;
        self.add_pending_chanid(call, &mut ies);
        self.call_send(call, MessageType::Alerting, ies)?;
        self.stop_call_timer(call, CallTimer::T302);
        self.set_call_state(call, CallReceived);
        Ok(())
    }

    /// CONNECT: answer an incoming call
    pub fn setup_response(&mut self, call: CallId, mut ies: Ies) -> Result<()> {
        self.check_state(call, &[CallPresent, OverlapReceiving, IncomingCallProceeding, CallReceived])?;
        self.add_pending_chanid(call, &mut ies);
        let intf = self.get_call(call)?.intf;
        let (is_nt, send_date_time) = {
            let i = self.intf(intf)?;
            (i.is_nt(), i.config.send_date_time)
        };
        if send_date_time && ies.date_time().is_none() {
            ies.add(Ie::DateTime(DateTime::now()));
        }
        self.call_send(call, MessageType::Connect, ies)?;
        self.stop_call_timer(call, CallTimer::T302);
        if is_nt {
            self.set_call_state(call, Active);
            self.connect_channels(call);
        } else {
            self.start_call_timer(call, CallTimer::T313);
            self.set_call_state(call, ConnectRequest);
        }
        Ok(())
    }

    /// CONNECT ACKNOWLEDGE on an outgoing call answered by the user side
    pub fn setup_complete_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(call, &[ConnectRequest])?;
        self.check_role(call, true)?;
        self.call_send(call, MessageType::ConnectAcknowledge, ies)?;
        self.set_call_state(call, Active);
        self.connect_channels(call);
        Ok(())
    }

    pub fn disconnect_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        let c = self.get_call(call)?;
        if c.dlc.is_broadcast() && c.selected_ces.is_none() {
            return self.abandon_broadcast(call, ies);
        }
        self.check_state(
            call,
            &[
                CallInitiated,
                OverlapSending,
                OutgoingCallProceeding,
                CallDelivered,
                CallReceived,
                ConnectRequest,
                IncomingCallProceeding,
                Active,
                OverlapReceiving,
            ],
        )?;
        self.start_disconnect(call, ies)
    }

    pub fn release_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        let state = self.get_call(call)?.state;
        if matches!(state, Null | CallPresent | ReleaseRequest) {
            return self.check_state(call, &[]);
        }
        let ies = if state == DisconnectIndication {
            ies
        } else {
            let intf = self.get_call(call)?.intf;
            self.with_default_cause(intf, ies, CauseValue::NormalCallClearing)
        };
        self.start_release(call, ies)
    }

    /// RELEASE COMPLETE as the first answer to SETUP
    pub fn reject_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(call, &[CallPresent])?;
        let intf = self.get_call(call)?.intf;
        let ies = self.with_default_cause(intf, ies, CauseValue::CallRejected);
        let res = self.call_send(call, MessageType::ReleaseComplete, ies);
        self.destroy_call(call);
        res
    }

    pub fn info_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(
            call,
            &[
                OverlapSending,
                OverlapReceiving,
                OutgoingCallProceeding,
                IncomingCallProceeding,
                CallDelivered,
                CallReceived,
                ConnectRequest,
                Active,
            ],
        )?;
        self.call_send(call, MessageType::Information, ies)?;
        if self.get_call(call)?.state == OverlapSending {
            self.start_call_timer(call, CallTimer::T304);
        }
        Ok(())
    }

    pub fn notify_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(
            call,
            &[OutgoingCallProceeding, IncomingCallProceeding, CallDelivered, CallReceived, ConnectRequest, Active],
        )?;
        if ies.notification_indicator().is_none() {
            return Err(Q931Error::Encode(IeParseErr::Inconsistency {
                field: "notification_indicator",
                reason: "mandatory in NOTIFY",
            }));
        }
        self.call_send(call, MessageType::Notify, ies)
    }

    pub fn progress_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(call, &[OverlapReceiving, IncomingCallProceeding, CallReceived])?;
        if ies.progress_indicators().next().is_none() {
            return Err(Q931Error::Encode(IeParseErr::Inconsistency {
                field: "progress_indicator",
                reason: "mandatory in PROGRESS",
            }));
        }
        self.call_send(call, MessageType::Progress, ies)
    }

    pub fn facility_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        let state = self.get_call(call)?.state;
        if matches!(state, Null | CallPresent | ReleaseRequest) {
            return self.check_state(call, &[]);
        }
        self.call_send(call, MessageType::Facility, ies)
    }

    pub fn status_enquiry_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        if self.get_call(call)?.state == Null {
            return self.check_state(call, &[]);
        }
        self.status_enquiry(call, ies)
    }

    /// STATUS ENQUIRY supervised by T322; no-op while one is outstanding
    pub(crate) fn start_status_enquiry(&mut self, call: CallId) -> Result<()> {
        self.status_enquiry(call, Ies::new())
    }

    fn status_enquiry(&mut self, call: CallId, ies: Ies) -> Result<()> {
        if self.call_timer_pending(call, CallTimer::T322) {
            return Ok(());
        }
        self.call_send(call, MessageType::StatusEnquiry, ies)?;
        self.get_call_mut(call)?.t322_retries = 0;
        self.start_call_timer(call, CallTimer::T322);
        Ok(())
    }

    /// SUSPEND an active call, user side
    pub fn suspend_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(call, &[Active])?;
        self.check_role(call, false)?;
        let identity = ies.call_identity().map(|c| c.identity.clone()).unwrap_or_default();
        self.call_send(call, MessageType::Suspend, ies)?;
        self.get_call_mut(call)?.suspend_identity = identity;
        self.start_call_timer(call, CallTimer::T319);
        self.set_call_state(call, SuspendRequest);
        Ok(())
    }

    /// SUSPEND ACKNOWLEDGE, network side. The call is parked under its call identity for T307.
    pub fn suspend_response(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(call, &[SuspendRequest])?;
        self.check_role(call, true)?;
        self.call_send(call, MessageType::SuspendAcknowledge, ies)?;

        let c = self.get_call(call)?;
        let (intf, identity, channels) = (c.intf, c.suspend_identity.clone(), c.channels);
        self.disconnect_channels(call);
        let i = self.intf_mut(intf)?;
        tracing::info!(intf = %i.config.name, "parking call {} as {:02x?}", call, identity);
        i.parked.push(ParkedCall { call, identity, channels });
        let delta = i.config.timers.t307;
        let now = self.now();
        self.timers.start_delta(TimerKey::Parked { intf, call }, delta, now);
        self.destroy_call(call);
        Ok(())
    }

    pub fn suspend_reject_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(call, &[SuspendRequest])?;
        self.check_role(call, true)?;
        let intf = self.get_call(call)?.intf;
        let ies = self.with_default_cause(intf, ies, CauseValue::FacilityRejected);
        self.call_send(call, MessageType::SuspendReject, ies)?;
        self.set_call_state(call, Active);
        Ok(())
    }

    /// RESUME a suspended call, user side. `ies` names it with a Call identity.
    pub fn resume_request(&mut self, intf: IntfId, ies: Ies) -> Result<CallId> {
        let i = self.intf(intf)?;
        if i.is_nt() {
            return Err(Q931Error::incompatible(Null));
        }
        let dlc = i.default_dlc();
        let callref = self.take_call_reference(intf)?;
        let call = self.new_call(intf, callref, Direction::Outbound, dlc)?;
        if let Err(e) = self.call_send(call, MessageType::Resume, ies) {
            self.destroy_call(call);
            return Err(e);
        }
        self.start_call_timer(call, CallTimer::T318);
        self.set_call_state(call, ResumeRequest);
        Ok(call)
    }

    /// RESUME ACKNOWLEDGE, network side: bring the parked call back, on its old channel if that is still free
    pub fn resume_response(&mut self, call: CallId, mut ies: Ies) -> Result<()> {
        self.check_state(call, &[ResumeRequest])?;
        self.check_role(call, true)?;
        let c = self.get_call(call)?;
        let (intf, parked) = (c.intf, c.resumed_from);

        let i = self.intf_mut(intf)?;
        let chantype = i.channel_interface_type();
        let previous = i.parked.iter().find(|p| Some(p.call) == parked).map(|p| p.channels).unwrap_or_default();
        let chan = match previous.iter().find(|&ch| i.channels.iter().any(|c| c.id == ch && c.is_available())) {
            Some(ch) => {
                if let Some(channel) = i.channel_mut(ch) {
                    channel.select(call);
                }
                ch
            }
            None => channel_alloc(&mut i.channels, call).ok_or(Q931Error::NoChannelAvailable)?,
        };
        ies.remove_all(IeId::ChannelIdentification);
        ies.add(Ie::ChannelIdentification(ChannelIdentification::b_channel(chantype, chan, true)));
        if let Err(e) = self.call_send(call, MessageType::ResumeAcknowledge, ies) {
            if let Some(ch) = self.intf_mut(intf)?.channel_mut(chan) {
                ch.release();
            }
            return Err(e);
        }
        self.get_call_mut(call)?.channels = Chanset::single(chan);

        if let Some(parked) = parked {
            self.timers.stop(TimerKey::Parked { intf, call: parked });
            self.intf_mut(intf)?.parked.retain(|p| p.call != parked);
        }
        self.set_call_state(call, Active);
        self.connect_channels(call);
        Ok(())
    }

    pub fn resume_reject_request(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.check_state(call, &[ResumeRequest])?;
        self.check_role(call, true)?;
        let intf = self.get_call(call)?.intf;
        let ies = self.with_default_cause(intf, ies, CauseValue::SuspendedCallExistsButCallIdentityDoesNot);
        let res = self.call_send(call, MessageType::ResumeReject, ies);
        self.destroy_call(call);
        res
    }

    /// Caller gave up on a broadcast SETUP nobody answered yet: release the terminals that responded
    fn abandon_broadcast(&mut self, call: CallId, ies: Ies) -> Result<()> {
        let c = self.get_call(call)?;
        let intf = c.intf;
        let teis: Vec<u8> = c.ces.iter().filter(|x| x.is_responding()).map(|x| x.tei).collect();
        let cause = ies
            .cause()
            .and_then(|v| v.cause_value())
            .unwrap_or(CauseValue::NormalCallClearing);
        for tei in teis {
            if let Err(e) = self.release_ces(call, tei, cause) {
                tracing::warn!(intf = %self.intf_name(intf), "releasing CES tei {}: {}", tei, e);
            }
        }
        self.destroy_call(call);
        self.indicate(crate::ccb::Q931Indication::ReleaseConfirm { call, ies, timed_out: false });
        Ok(())
    }
}
