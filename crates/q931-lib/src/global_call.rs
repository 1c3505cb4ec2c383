//! Global call reference: restart procedure and suspended call supervision

use core::fmt;

use q931_ies::Ie;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::ie_id::IeId;
use q931_ies::enums::message_type::MessageType;
use q931_ies::enums::restart_class::RestartClass;
use q931_ies::ies::{ChannelIdentification, ChannelSelection, RestartIndicator};
use q931_ies::message::mandatory::check_mandatory;
use q931_ies::message::{CallRef, Ies, Q931Message};

use crate::Q931Lib;
use crate::call::CallId;
use crate::ccb::Q931Indication;
use crate::chanset::Chanset;
use crate::error::{Q931Error, Result};
use crate::q931::TimerKey;
use crate::transport::{DlcId, IntfId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalTimer {
    /// RESTART sent, waiting for RESTART ACKNOWLEDGE
    T316,
    /// RESTART received, waiting for the application to give the channels back
    T317,
}

impl fmt::Display for GlobalTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// RESTART from the peer, acknowledged once the application answers with `restart_response`
#[derive(Debug, Clone)]
pub struct PeerRestart {
    pub(crate) dlc: DlcId,
    pub(crate) reply: CallRef,
    pub class: RestartClass,
    pub channels: Chanset,
    pub(crate) ack_ies: Ies,
}

/// State of the restart procedure of one interface
#[derive(Debug, Clone)]
pub struct GlobalCall {
    /// Null, RestartRequest while our RESTART is outstanding, Restart while handling the peer's
    pub state: CallStateValue,
    /// Channels our RESTART covers
    pub requested: Chanset,
    /// Channels acknowledged so far
    pub acknowledged: Chanset,
    pub class: RestartClass,
    pub(crate) retransmissions: u32,
    /// Elements of the outstanding RESTART, kept for retransmission
    pub(crate) restart_ies: Ies,
    pub peer_restart: Option<PeerRestart>,
}

impl GlobalCall {
    pub fn new() -> Self {
        GlobalCall {
            state: CallStateValue::Null,
            requested: Chanset::new(),
            acknowledged: Chanset::new(),
            class: RestartClass::SingleInterface,
            retransmissions: 0,
            restart_ies: Ies::new(),
            peer_restart: None,
        }
    }

    fn set_state(&mut self, state: CallStateValue) {
        if self.state != state {
            tracing::debug!("global call {} -> {}", self.state, state);
            self.state = state;
        }
    }
}

impl Default for GlobalCall {
    fn default() -> Self {
        Self::new()
    }
}

impl Q931Lib {
    /// Restart `channels` of an interface, or the whole interface when `channels` is empty.
    /// Calls on the restarted channels are cleared locally. The channels stay out of service
    /// until the peer acknowledges; `ManagementRestartConfirm` reports the outcome.
    pub fn restart_request(&mut self, intf: IntfId, channels: Chanset) -> Result<()> {
        let i = self.intf(intf)?;
        if i.global_call.state != CallStateValue::Null {
            return Err(Q931Error::incompatible(i.global_call.state));
        }
        if channels.iter().any(|c| !i.has_channel(c)) {
            return Err(Q931Error::ChannelUnavailable);
        }
        let (class, target) = if channels.is_empty() {
            (RestartClass::SingleInterface, i.all_channels())
        } else {
            (RestartClass::IndicatedChannels, channels)
        };
        let chantype = i.channel_interface_type();
        let name = i.config.name.clone();

        let mut ies = Ies::new().with(Ie::RestartIndicator(RestartIndicator { class }));
        if class == RestartClass::IndicatedChannels {
            let selection = ChannelSelection::BChannels(target.as_slice().to_vec());
            ies.add(Ie::ChannelIdentification(ChannelIdentification::new(chantype, selection, true)));
        }

        tracing::info!(intf = %name, "restarting {}", if channels.is_empty() { "interface".to_string() } else { target.to_string() });
        self.clear_calls_on(intf, &target, class != RestartClass::IndicatedChannels);
        let i = self.intf_mut(intf)?;
        for chan in target.iter() {
            if let Some(ch) = i.channel_mut(chan) {
                ch.set_maintenance();
            }
        }
        let gc = &mut i.global_call;
        gc.class = class;
        gc.requested = target;
        gc.acknowledged = Chanset::new();
        gc.retransmissions = 0;
        gc.restart_ies = ies.clone();
        gc.set_state(CallStateValue::RestartRequest);

        self.send_restart(intf, ies)?;
        self.start_global_timer(intf, GlobalTimer::T316);
        Ok(())
    }

    fn send_restart(&mut self, intf: IntfId, ies: Ies) -> Result<()> {
        let i = self.intf(intf)?;
        let (dlc, callref) = (i.default_dlc(), CallRef::global(i.callref_len()));
        self.send_message(dlc, &Q931Message::new(callref, MessageType::Restart, ies))
    }

    fn start_global_timer(&mut self, intf: IntfId, timer: GlobalTimer) {
        let Some(i) = self.intfs.get(&intf) else { return };
        let delta = match timer {
            GlobalTimer::T316 => i.config.timers.t316,
            GlobalTimer::T317 => i.config.timers.t317,
        };
        let now = self.now();
        self.timers.start_delta(TimerKey::Global { intf, timer }, delta, now);
    }

    /// Clear every call holding one of `channels`, or every call of the interface
    fn clear_calls_on(&mut self, intf: IntfId, channels: &Chanset, whole_interface: bool) {
        let victims: Vec<CallId> = self
            .calls
            .values()
            .filter(|c| c.intf == intf && (whole_interface || c.channels.iter().any(|ch| channels.contains(ch))))
            .map(|c| c.id)
            .collect();
        for call in victims {
            self.clear_locally(call, CauseValue::TemporaryFailure);
        }
    }

    /// Message on the global call reference
    pub(crate) fn global_rx(&mut self, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let intf = dlc.intf;
        let role = self.intf(intf)?.role();
        let state = self.intf(intf)?.global_call.state;
        let reply = msg.callref.flipped();

        if matches!(msg.message_type, MessageType::Restart | MessageType::RestartAcknowledge) {
            if let Err(err) = check_mandatory(&msg, role) {
                return self.send_status_on(dlc, reply, err.cause, Some(err.id), state);
            }
        }

        match msg.message_type {
            MessageType::Restart => self.rx_restart(dlc, msg),
            MessageType::RestartAcknowledge if state == CallStateValue::RestartRequest => {
                self.rx_restart_acknowledge(intf, msg)
            }
            MessageType::RestartAcknowledge => {
                let mt = msg.message_type.into_raw() as u8;
                self.send_status_on(dlc, reply, CauseValue::MessageNotCompatibleWithCallState, Some(mt), state)
            }
            MessageType::Status => {
                tracing::info!(intf = %self.intf_name(intf), "STATUS on global call reference: {}", msg.ies);
                Ok(())
            }
            _ => self.send_status_on(dlc, reply, CauseValue::InvalidCallReferenceValue, None, state),
        }
    }

    /// Channels named by a restart message, or None with the cause to reject it
    fn restart_channels(&self, intf: IntfId, ies: &Ies) -> core::result::Result<(RestartClass, Chanset), CauseValue> {
        let i = self.intfs.get(&intf).ok_or(CauseValue::TemporaryFailure)?;
        let class = ies.restart_indicator().map(|r| r.class).unwrap_or(RestartClass::SingleInterface);
        if class != RestartClass::IndicatedChannels {
            return Ok((class, i.all_channels()));
        }
        let Some(ci) = ies.channel_identification() else {
            return Err(CauseValue::MandatoryInformationElementMissing);
        };
        let chans: Chanset = ci.channels().iter().copied().collect();
        if chans.is_empty() || chans.iter().any(|c| !i.has_channel(c)) {
            return Err(CauseValue::IdentifiedChannelDoesNotExist);
        }
        Ok((class, chans))
    }

    fn rx_restart(&mut self, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let intf = dlc.intf;
        let reply = msg.callref.flipped();
        let (class, channels) = match self.restart_channels(intf, &msg.ies) {
            Ok(v) => v,
            Err(cause) => {
                let state = self.intf(intf)?.global_call.state;
                let diag = (cause == CauseValue::MandatoryInformationElementMissing).then_some(IeId::ChannelIdentification.into_raw() as u8);
                return self.send_status_on(dlc, reply, cause, diag, state);
            }
        };
        if self.intf(intf)?.global_call.peer_restart.is_some() {
            tracing::debug!(intf = %self.intf_name(intf), "RESTART repeated while the previous one is pending");
            return Ok(());
        }
        tracing::info!(intf = %self.intf_name(intf), "peer restarts {:?} {}", class, channels);

        let mut ack_ies = Ies::new().with(Ie::RestartIndicator(RestartIndicator { class }));
        if let Some(ci) = msg.ies.channel_identification().filter(|_| class == RestartClass::IndicatedChannels) {
            ack_ies.add(Ie::ChannelIdentification(ci.clone()));
        }

        self.clear_calls_on(intf, &channels, class != RestartClass::IndicatedChannels);
        let i = self.intf_mut(intf)?;
        for chan in channels.iter() {
            if let Some(ch) = i.channel_mut(chan) {
                ch.set_maintenance();
            }
        }
        let gc = &mut i.global_call;
        if gc.state == CallStateValue::Null {
            gc.set_state(CallStateValue::Restart);
        }
        gc.peer_restart = Some(PeerRestart { dlc, reply, class, channels, ack_ies });
        self.start_global_timer(intf, GlobalTimer::T317);
        self.indicate(Q931Indication::Restart { intf, channels });
        Ok(())
    }

    /// The application has freed everything it had on the channels of the peer's RESTART
    pub fn restart_response(&mut self, intf: IntfId) -> Result<()> {
        let gc = &mut self.intf_mut(intf)?.global_call;
        let Some(pending) = gc.peer_restart.take() else {
            return Err(Q931Error::incompatible(gc.state));
        };
        self.timers.stop(TimerKey::Global { intf, timer: GlobalTimer::T317 });
        self.acknowledge_peer_restart(intf, pending)
    }

    /// Put the channels back in service and send RESTART ACKNOWLEDGE
    fn acknowledge_peer_restart(&mut self, intf: IntfId, pending: PeerRestart) -> Result<()> {
        let i = self.intf_mut(intf)?;
        for chan in pending.channels.iter() {
            if let Some(ch) = i.channel_mut(chan) {
                ch.restart();
            }
        }
        if i.global_call.state == CallStateValue::Restart {
            i.global_call.set_state(CallStateValue::Null);
        }
        let ack = Q931Message::new(pending.reply, MessageType::RestartAcknowledge, pending.ack_ies);
        self.send_message(pending.dlc, &ack)
    }

    fn rx_restart_acknowledge(&mut self, intf: IntfId, msg: Q931Message) -> Result<()> {
        let acked = match self.restart_channels(intf, &msg.ies) {
            Ok((_, chans)) => chans,
            // An acknowledgement that does not say what it covers covers our request
            Err(_) => self.intf(intf)?.global_call.requested,
        };
        let gc = &mut self.intf_mut(intf)?.global_call;
        gc.acknowledged.merge(&acked);
        if !gc.acknowledged.contains_all(&gc.requested) {
            tracing::debug!("restart acknowledged {} of {}", gc.acknowledged, gc.requested);
            return Ok(());
        }
        let channels = gc.requested;
        gc.set_state(CallStateValue::Null);
        self.timers.stop(TimerKey::Global { intf, timer: GlobalTimer::T316 });
        let i = self.intf_mut(intf)?;
        for chan in channels.iter() {
            if let Some(ch) = i.channel_mut(chan) {
                ch.restart();
            }
        }
        tracing::info!(intf = %i.config.name, "restart of {} complete", channels);
        self.indicate(Q931Indication::ManagementRestartConfirm { intf, channels, ok: true });
        Ok(())
    }

    pub(crate) fn global_timer_expired(&mut self, intf: IntfId, timer: GlobalTimer) -> Result<()> {
        let i = self.intf_mut(intf)?;
        tracing::info!(intf = %i.config.name, "global {} expired", timer);
        match timer {
            GlobalTimer::T316 => {
                let limit = i.config.restart_retransmit_count;
                let gc = &mut i.global_call;
                if gc.state != CallStateValue::RestartRequest {
                    return Ok(());
                }
                if gc.retransmissions < limit {
                    gc.retransmissions += 1;
                    let ies = gc.restart_ies.clone();
                    self.send_restart(intf, ies)?;
                    self.start_global_timer(intf, GlobalTimer::T316);
                    return Ok(());
                }
                // Unacknowledged channels stay in maintenance
                let channels = gc.requested;
                gc.set_state(CallStateValue::Null);
                self.indicate(Q931Indication::ManagementRestartConfirm { intf, channels, ok: false });
                Ok(())
            }
            GlobalTimer::T317 => {
                let Some(pending) = i.global_call.peer_restart.take() else { return Ok(()) };
                tracing::warn!(intf = %i.config.name, "no restart response for {}, acknowledging anyway", pending.channels);
                let channels = pending.channels;
                self.acknowledge_peer_restart(intf, pending)?;
                self.indicate(Q931Indication::RestartTimeout { intf, channels });
                Ok(())
            }
        }
    }

    /// T307: a suspended call was not resumed in time
    pub(crate) fn parked_timer_expired(&mut self, intf: IntfId, call: CallId) {
        let location_cause = self.cause_ie(intf, CauseValue::RecoveryOnTimerExpiry, None);
        let Some(i) = self.intfs.get_mut(&intf) else { return };
        let Some(pos) = i.parked.iter().position(|p| p.call == call) else { return };
        let parked = i.parked.remove(pos);
        tracing::info!(intf = %i.config.name, "suspended call {} {:02x?} not resumed, releasing", call, parked.identity);
        self.indicate(Q931Indication::Release { call, ies: Ies::new().with(location_cause) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_global_call_is_idle() {
        let gc = GlobalCall::new();
        assert_eq!(gc.state, CallStateValue::Null);
        assert!(gc.requested.is_empty());
        assert!(gc.acknowledged.contains_all(&gc.requested));
    }
}
