//! Frames received from the link layer

use q931_core::Direction;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::message_type::MessageType;
use q931_ies::message::mandatory::check_mandatory;
use q931_ies::message::{CallRef, FrameErr, Ies, Q931Message};

use crate::Q931Lib;
use crate::call::CallId;
use crate::ccb::Q931Indication;
use crate::dlc::DlcStatus;
use crate::error::Result;
use crate::transport::DlcId;

impl Q931Lib {
    /// Feed one frame received on `dlc`. Protocol errors are answered on the wire and logged;
    /// nothing is returned to the caller.
    pub fn receive(&mut self, dlc: DlcId, frame: &[u8]) {
        if let Err(e) = self.receive_frame(dlc, frame) {
            tracing::warn!(intf = %self.intf_name(dlc.intf), "handling frame from tei {}: {}", dlc.tei, e);
        }
    }

    fn receive_frame(&mut self, dlc: DlcId, frame: &[u8]) -> Result<()> {
        let intf = self.intf_mut(dlc.intf)?;
        let callref_len = intf.callref_len();
        // A frame on a link proves it is up
        if !dlc.is_broadcast() && intf.dlc_entry(dlc.tei).status != DlcStatus::Connected {
            self.dlc_established(dlc);
        }

        let msg = match Q931Message::from_bytes(frame) {
            Ok(msg) => msg,
            Err(FrameErr::Header(e)) => {
                tracing::debug!(intf = %self.intf_name(dlc.intf), "<- dropping {}: {}", hex::encode(frame), e);
                return Ok(());
            }
            Err(FrameErr::UnknownMessageType { callref, message_type }) => {
                return self.rx_unknown_message_type(dlc, callref, message_type);
            }
        };
        tracing::debug!(intf = %self.intf_name(dlc.intf), "<- {} tei {}", msg, dlc.tei);
        for fault in &msg.faults {
            tracing::debug!(intf = %self.intf_name(dlc.intf), "   {}", fault);
        }

        if msg.callref.is_dummy() {
            tracing::debug!("ignoring {} with dummy call reference", msg.message_type);
            return Ok(());
        }
        if msg.callref.len != callref_len {
            tracing::warn!(intf = %self.intf_name(dlc.intf), "ignoring call reference of {} octets, expected {}", msg.callref.len, callref_len);
            return Ok(());
        }
        if msg.callref.is_global() {
            return self.global_rx(dlc, msg);
        }
        match self.find_call(dlc, msg.callref) {
            Some(call) => self.call_rx(call, dlc, msg),
            None => self.rx_unknown_callref(dlc, msg),
        }
    }

    /// Call a received call reference belongs to. Responses to our broadcast SETUP come in on
    /// any link of the interface; everything else must arrive on the call's link.
    fn find_call(&self, dlc: DlcId, callref: CallRef) -> Option<CallId> {
        let direction = Direction::from_rx_callref_flag(callref.flag);
        self.calls
            .values()
            .find(|c| {
                c.intf == dlc.intf
                    && c.callref == callref.value
                    && c.direction == direction
                    && (direction.is_outbound() || c.dlc == dlc)
            })
            .map(|c| c.id)
    }

    fn rx_unknown_message_type(&mut self, dlc: DlcId, callref: CallRef, message_type: u8) -> Result<()> {
        tracing::warn!(intf = %self.intf_name(dlc.intf), "<- unknown message type 0x{:02x} callref {}", message_type, callref);
        if callref.is_dummy() {
            return Ok(());
        }
        let reply = callref.flipped();
        if callref.is_global() {
            let state = self.intf(dlc.intf)?.global_call.state;
            return self.send_status_on(dlc, reply, CauseValue::MessageTypeNonExistentOrNotImplemented, Some(message_type), state);
        }
        match self.find_call(dlc, callref) {
            Some(call) => {
                self.send_status(call, CauseValue::MessageTypeNonExistentOrNotImplemented, Some(message_type))?;
                self.indicate(Q931Indication::Error { call, cause: CauseValue::MessageTypeNonExistentOrNotImplemented.into_raw() as u8 });
                Ok(())
            }
            None => self.send_release_complete_on(dlc, reply, CauseValue::InvalidCallReferenceValue, None),
        }
    }

    /// Message for a call reference no call holds
    fn rx_unknown_callref(&mut self, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let reply = msg.callref.flipped();
        let originated_by_peer = Direction::from_rx_callref_flag(msg.callref.flag).is_inbound();
        match msg.message_type {
            MessageType::Setup if originated_by_peer => self.rx_new_setup(dlc, msg),
            MessageType::Setup => {
                tracing::debug!("ignoring SETUP with the destination flag set");
                Ok(())
            }
            MessageType::Resume if originated_by_peer && self.intf(dlc.intf)?.is_nt() => self.rx_resume(dlc, msg),
            MessageType::ReleaseComplete => Ok(()),
            MessageType::StatusEnquiry => {
                self.send_status_on(dlc, reply, CauseValue::ResponseToStatusEnquiry, None, CallStateValue::Null)
            }
            MessageType::Status if msg.ies.call_state().is_some_and(|s| s.value == CallStateValue::Null) => Ok(()),
            MessageType::Status => {
                self.send_release_complete_on(dlc, reply, CauseValue::MessageNotCompatibleWithCallState, None)
            }
            _ => self.send_release_complete_on(dlc, reply, CauseValue::InvalidCallReferenceValue, None),
        }
    }

    fn rx_new_setup(&mut self, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let reply = msg.callref.flipped();
        let role = self.intf(dlc.intf)?.role();
        if let Err(err) = check_mandatory(&msg, role) {
            tracing::warn!(intf = %self.intf_name(dlc.intf), "SETUP rejected: cause {} IE 0x{:02x}", err.cause.into_raw(), err.id);
            return self.send_release_complete_on(dlc, reply, err.cause, Some(err.id));
        }

        let call = self.new_call(dlc.intf, msg.callref.value, Direction::Inbound, dlc)?;
        if let Err(cause) = self.negotiate_incoming_channel(call, msg.ies.channel_identification()) {
            tracing::info!(intf = %self.intf_name(dlc.intf), "call {} refused, cause {}", call, cause.into_raw());
            self.destroy_call(call);
            return self.send_release_complete_on(dlc, reply, cause, None);
        }
        self.set_call_state(call, CallStateValue::CallPresent);
        self.indicate(Q931Indication::Setup { call, intf: dlc.intf, ies: msg.ies });
        Ok(())
    }

    /// RESUME on the network side: find the parked call by its call identity
    fn rx_resume(&mut self, dlc: DlcId, msg: Q931Message) -> Result<()> {
        let reply = msg.callref.flipped();
        let identity = msg.ies.call_identity().map(|c| c.identity.clone()).unwrap_or_default();
        let i = self.intf(dlc.intf)?;
        let parked = i.parked.iter().find(|p| p.identity == identity).map(|p| p.call);

        let Some(suspended) = parked else {
            let cause = if i.parked.is_empty() {
                CauseValue::NoCallSuspended
            } else {
                CauseValue::SuspendedCallExistsButCallIdentityDoesNot
            };
            tracing::info!(intf = %i.config.name, "RESUME for {:02x?} rejected, cause {}", identity, cause.into_raw());
            let ies = Ies::new().with(self.cause_ie(dlc.intf, cause, None));
            return self.send_message(dlc, &Q931Message::new(reply, MessageType::ResumeReject, ies));
        };

        let call = self.new_call(dlc.intf, msg.callref.value, Direction::Inbound, dlc)?;
        self.get_call_mut(call)?.resumed_from = Some(suspended);
        self.set_call_state(call, CallStateValue::ResumeRequest);
        self.indicate(Q931Indication::Resume { call, suspended, ies: msg.ies });
        Ok(())
    }
}
