//! Call timer expiry

use q931_ies::Ie;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::message_type::MessageType;
use q931_ies::message::Ies;

use crate::Q931Lib;
use crate::call::{CallId, CallTimer};
use crate::ccb::Q931Indication;
use crate::error::Result;

impl Q931Lib {
    pub(crate) fn call_timer_expired(&mut self, call: CallId, timer: CallTimer) -> Result<()> {
        let c = self.get_call(call)?;
        tracing::info!(intf = %c.intf_name, callref = %c.tx_callref(), "call {} {} expired in {}", call, timer, c.state);
        self.indicate(Q931Indication::Timeout { call, timer });

        match timer {
            CallTimer::T301 => self.disconnect_with_cause(call, CauseValue::NoAnswerFromUser),
            // Overlap receiving stalled; the application decides whether the number is complete
            CallTimer::T302 => Ok(()),
            CallTimer::T303 => self.t303_expired(call),
            CallTimer::T304 | CallTimer::T310 | CallTimer::T313 => {
                self.disconnect_with_cause(call, CauseValue::RecoveryOnTimerExpiry)
            }
            CallTimer::T305 | CallTimer::T306 => {
                let c = self.get_call(call)?;
                let cause = match c.disconnect_cause.clone() {
                    Some(cause) => Ie::Cause(cause),
                    None => self.cause_ie(c.intf, CauseValue::RecoveryOnTimerExpiry, None),
                };
                self.start_release(call, Ies::new().with(cause))
            }
            CallTimer::T308 => self.t308_expired(call),
            CallTimer::T309 => {
                self.clear_locally(call, CauseValue::DestinationOutOfOrder);
                Ok(())
            }
            CallTimer::T312 => self.check_broadcast_failed(call),
            CallTimer::T318 => {
                let res = self.release_with_cause(call, CauseValue::RecoveryOnTimerExpiry);
                self.indicate(Q931Indication::ResumeConfirm { call, ies: Ies::new(), ok: false });
                res
            }
            CallTimer::T319 => {
                self.set_call_state(call, CallStateValue::Active);
                self.indicate(Q931Indication::SuspendConfirm { call, ies: Ies::new(), ok: false });
                Ok(())
            }
            CallTimer::T322 => self.t322_expired(call),
        }
    }

    /// SETUP unanswered: send it once more, then give up
    fn t303_expired(&mut self, call: CallId) -> Result<()> {
        let c = self.get_call(call)?;
        let broadcast = c.dlc.is_broadcast() && c.selected_ces.is_none();
        if broadcast && !c.ces.is_empty() {
            // Some terminal responded; T312 and the legs decide
            return self.check_broadcast_failed(call);
        }
        if !c.t303_expired {
            let Some(ies) = c.setup_ies.clone() else { return Ok(()) };
            self.get_call_mut(call)?.t303_expired = true;
            self.call_send(call, MessageType::Setup, ies)?;
            self.start_call_timer(call, CallTimer::T303);
            return Ok(());
        }
        if broadcast {
            // Fails with the cause of a refusing terminal, once T312 is over
            return self.check_broadcast_failed(call);
        }

        let intf = c.intf;
        let ies = Ies::new().with(self.cause_ie(intf, CauseValue::RecoveryOnTimerExpiry, None));
        let res = self.call_send(call, MessageType::ReleaseComplete, ies.clone());
        self.destroy_call(call);
        self.indicate(Q931Indication::Reject { call, ies });
        res
    }

    /// RELEASE unanswered: send it once more, then take the channels out of service and forget the call
    fn t308_expired(&mut self, call: CallId) -> Result<()> {
        let c = self.get_call(call)?;
        if !c.t308_expired {
            let ies = c.release_ies.clone().unwrap_or_default();
            self.get_call_mut(call)?.t308_expired = true;
            self.call_send(call, MessageType::Release, ies)?;
            self.start_call_timer(call, CallTimer::T308);
            return Ok(());
        }
        let intf = c.intf;
        let ies = Ies::new().with(self.cause_ie(intf, CauseValue::RecoveryOnTimerExpiry, None));
        self.channels_to_maintenance(call);
        self.destroy_call(call);
        self.indicate(Q931Indication::ReleaseConfirm { call, ies, timed_out: true });
        Ok(())
    }

    /// STATUS ENQUIRY unanswered
    fn t322_expired(&mut self, call: CallId) -> Result<()> {
        let c = self.get_call(call)?;
        let limit = self.intf(c.intf)?.config.status_enquiry_retransmit_count;
        if c.t322_retries < limit {
            self.get_call_mut(call)?.t322_retries += 1;
            self.call_send(call, MessageType::StatusEnquiry, Ies::new())?;
            self.start_call_timer(call, CallTimer::T322);
            return Ok(());
        }
        self.release_with_cause(call, CauseValue::TemporaryFailure)
    }
}
