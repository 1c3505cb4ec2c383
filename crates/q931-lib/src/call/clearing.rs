//! Call clearing and teardown

use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::message_type::MessageType;
use q931_ies::enums::progress_description::ProgressDescription;
use q931_ies::message::Ies;

use crate::Q931Lib;
use crate::call::{CallId, CallTimer, Ces};
use crate::ccb::Q931Indication;
use crate::error::Result;
use crate::q931::TimerKey;
use crate::transport::DlcId;

impl Q931Lib {
    /// Send DISCONNECT and wait for RELEASE under T305, or T306 when in-band tones follow
    pub(crate) fn start_disconnect(&mut self, call: CallId, ies: Ies) -> Result<()> {
        let intf = self.get_call(call)?.intf;
        let is_nt = self.call_role(call)?.is_nt();
        let ies = self.with_default_cause(intf, ies, CauseValue::NormalCallClearing);
        let inband = is_nt && ies.progress_indicators().any(|p| p.description == ProgressDescription::InbandInformationAvailable);

        let cause = ies.cause().cloned();
        self.call_send(call, MessageType::Disconnect, ies)?;
        self.get_call_mut(call)?.disconnect_cause = cause;
        self.stop_all_call_timers(call);
        if !inband {
            self.disconnect_channels(call);
        }
        self.start_call_timer(call, if inband { CallTimer::T306 } else { CallTimer::T305 });
        self.set_call_state(call, CallStateValue::DisconnectRequest);
        Ok(())
    }

    /// Send RELEASE and wait for RELEASE COMPLETE under T308
    pub(crate) fn start_release(&mut self, call: CallId, ies: Ies) -> Result<()> {
        self.call_send(call, MessageType::Release, ies.clone())?;
        self.stop_all_call_timers(call);
        self.disconnect_channels(call);
        let c = self.get_call_mut(call)?;
        c.release_ies = Some(ies);
        c.t308_expired = false;
        self.start_call_timer(call, CallTimer::T308);
        self.set_call_state(call, CallStateValue::ReleaseRequest);
        Ok(())
    }

    /// RELEASE with just a cause
    pub(crate) fn release_with_cause(&mut self, call: CallId, cause: CauseValue) -> Result<()> {
        let intf = self.get_call(call)?.intf;
        let ies = Ies::new().with(self.cause_ie(intf, cause, None));
        self.start_release(call, ies)
    }

    /// DISCONNECT with just a cause
    pub(crate) fn disconnect_with_cause(&mut self, call: CallId, cause: CauseValue) -> Result<()> {
        let intf = self.get_call(call)?.intf;
        let ies = Ies::new().with(self.cause_ie(intf, cause, None));
        self.start_disconnect(call, ies)
    }

    /// Clear a call without signalling, on link loss, restart or unrecoverable errors
    pub(crate) fn clear_locally(&mut self, call: CallId, cause: CauseValue) {
        let Some(intf) = self.calls.get(&call).map(|c| c.intf) else { return };
        let ies = Ies::new().with(self.cause_ie(intf, cause, None));
        self.disconnect_channels(call);
        self.destroy_call(call);
        self.indicate(Q931Indication::Release { call, ies });
    }

    pub(crate) fn stop_all_call_timers(&mut self, call: CallId) {
        self.timers.stop_matching(|k| matches!(k, TimerKey::Call { call: c, .. } if *c == call));
    }

    /// Free everything the call holds and forget it
    pub(crate) fn destroy_call(&mut self, call: CallId) {
        self.timers.stop_matching(|k| match k {
            TimerKey::Call { call: c, .. } | TimerKey::Ces { call: c, .. } => *c == call,
            _ => false,
        });
        let Some(c) = self.calls.remove(&call) else { return };
        if let Some(intf) = self.intfs.get_mut(&c.intf) {
            for ch in intf.channels.iter_mut().filter(|ch| ch.call == Some(call)) {
                ch.release();
            }
        }
        for ces in &c.ces {
            self.dlc_unuse(ces.dlc);
        }
        self.dlc_unuse(c.dlc);
        tracing::debug!(intf = %c.intf_name, callref = %c.tx_callref(), "call {} gone", call);
    }

    // ----------------------------------- broadcast SETUP legs -----------------------------------

    /// CES for `tei`, created and bound to its DLC on first use
    pub(crate) fn ensure_ces(&mut self, call: CallId, tei: u8) -> Result<()> {
        let c = self.get_call(call)?;
        if c.ces(tei).is_some() {
            return Ok(());
        }
        let dlc = DlcId::new(c.intf, tei);
        tracing::debug!(intf = %c.intf_name, "call {} new CES tei {}", call, tei);
        self.dlc_use(dlc);
        self.get_call_mut(call)?.ces.push(Ces::new(tei, dlc));
        Ok(())
    }

    pub(crate) fn remove_ces(&mut self, call: CallId, tei: u8) {
        self.timers.stop(TimerKey::Ces { call, tei });
        let Some(c) = self.calls.get_mut(&call) else { return };
        let Some(pos) = c.ces.iter().position(|x| x.tei == tei) else { return };
        let ces = c.ces.remove(pos);
        tracing::debug!(intf = %c.intf_name, "call {} CES tei {} gone", call, tei);
        self.dlc_unuse(ces.dlc);
    }

    /// Send RELEASE to one terminal of a broadcast call and supervise it with T308
    pub(crate) fn release_ces(&mut self, call: CallId, tei: u8, cause: CauseValue) -> Result<()> {
        self.ensure_ces(call, tei)?;
        let c = self.get_call(call)?;
        let intf = c.intf;
        let Some(dlc) = c.ces(tei).map(|x| x.dlc) else { return Ok(()) };
        let ies = Ies::new().with(self.cause_ie(intf, cause, None));
        self.call_send_on(call, dlc, MessageType::Release, ies)?;
        if let Some(ces) = self.get_call_mut(call)?.ces_mut(tei) {
            ces.set_state(CallStateValue::ReleaseRequest);
        }
        let delta = self.intf(intf)?.config.timers.t308;
        let now = self.now();
        self.timers.start_delta(TimerKey::Ces { call, tei }, delta, now);
        Ok(())
    }

    pub(crate) fn ces_t308_expired(&mut self, call: CallId, tei: u8) -> Result<()> {
        let Some(ces) = self.get_call(call)?.ces(tei) else { return Ok(()) };
        if ces.t308_expired {
            tracing::info!("call {} CES tei {} did not answer RELEASE", call, tei);
            self.remove_ces(call, tei);
            return self.check_broadcast_failed(call);
        }
        if let Some(ces) = self.get_call_mut(call)?.ces_mut(tei) {
            ces.t308_expired = true;
        }
        self.release_ces(call, tei, CauseValue::NonSelectedUserClearing)
    }

    /// A broadcast SETUP that no terminal is pursuing any more, with nothing left to wait for, fails
    pub(crate) fn check_broadcast_failed(&mut self, call: CallId) -> Result<()> {
        let Some(c) = self.calls.get(&call) else { return Ok(()) };
        if c.selected_ces.is_some() || !c.dlc.is_broadcast() || c.ces.iter().any(|x| x.is_responding()) {
            return Ok(());
        }
        if self.call_timer_pending(call, CallTimer::T312) || self.call_timer_pending(call, CallTimer::T303) {
            return Ok(());
        }
        let cause = c.ces_cause.and_then(|v| CauseValue::try_from(v as u64).ok()).unwrap_or(CauseValue::NoUserResponding);
        let ies = Ies::new().with(self.cause_ie(c.intf, cause, None));
        tracing::info!(intf = %c.intf_name, "broadcast call {} failed, cause {}", call, cause.into_raw());
        self.destroy_call(call);
        self.indicate(Q931Indication::Reject { call, ies });
        Ok(())
    }
}
