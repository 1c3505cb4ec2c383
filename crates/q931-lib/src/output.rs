use q931_ies::Ie;
use q931_ies::enums::location::Location;
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::enums::message_type::MessageType;
use q931_ies::ies::{CallState, Cause};
use q931_ies::message::{CallRef, Ies, Q931Message};

use crate::Q931Lib;
use crate::call::CallId;
use crate::dlc::DlcStatus;
use crate::error::{Q931Error, Result};
use crate::transport::{ConnectStatus, DlcId, IntfId};

impl Q931Lib {
    /// Hand a frame to the link layer. Frames for a link that is not up are queued
    /// and the link is brought up.
    pub(crate) fn send_frame(&mut self, dlc: DlcId, frame: Vec<u8>) -> Result<()> {
        if dlc.is_broadcast() {
            return Ok(self.transport.send_frame(dlc, &frame)?);
        }
        let Some(intf) = self.intfs.get_mut(&dlc.intf) else {
            return Err(Q931Error::UnknownInterface(dlc.intf));
        };
        let entry = intf.dlc_entry(dlc.tei);
        match entry.status {
            DlcStatus::Connected => self.transport.send_frame(dlc, &frame)?,
            DlcStatus::AwaitingConnection => entry.queue_frame(frame),
            DlcStatus::Disconnected | DlcStatus::AwaitingDisconnection => {
                entry.queue_frame(frame);
                match self.transport.connect(dlc) {
                    Ok(ConnectStatus::Connected) => {
                        entry.set_status(DlcStatus::Connected);
                        for f in entry.take_queue() {
                            self.transport.send_frame(dlc, &f)?;
                        }
                    }
                    Ok(ConnectStatus::Pending) => entry.set_status(DlcStatus::AwaitingConnection),
                    Err(e) => {
                        entry.take_queue();
                        return Err(e.into());
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn send_message(&mut self, dlc: DlcId, msg: &Q931Message) -> Result<()> {
        let frame = msg.to_bytes()?;
        tracing::debug!(intf = %self.intf_name(dlc.intf), "-> {} tei {}", msg, dlc.tei);
        self.send_frame(dlc, frame)
    }

    /// Send a message of `call` on the call's DLC
    pub(crate) fn call_send(&mut self, call: CallId, message_type: MessageType, ies: Ies) -> Result<()> {
        let dlc = self.get_call(call)?.dlc;
        self.call_send_on(call, dlc, message_type, ies)
    }

    /// Send a message of `call` on a given DLC, for messages to one terminal of a broadcast call
    pub(crate) fn call_send_on(&mut self, call: CallId, dlc: DlcId, message_type: MessageType, ies: Ies) -> Result<()> {
        let callref = self.get_call(call)?.tx_callref();
        self.send_message(dlc, &Q931Message::new(callref, message_type, ies))
    }

    /// STATUS reporting the current state of `call`
    pub(crate) fn send_status(&mut self, call: CallId, cause: CauseValue, diag: Option<u8>) -> Result<()> {
        let role = self.call_role(call)?;
        let c = self.get_call(call)?;
        let (dlc, callref, state) = (c.dlc, c.tx_callref(), c.wire_state(role));
        self.send_status_on(dlc, callref, cause, diag, state)
    }

    pub(crate) fn send_status_on(
        &mut self,
        dlc: DlcId,
        callref: CallRef,
        cause: CauseValue,
        diag: Option<u8>,
        state: CallStateValue,
    ) -> Result<()> {
        let ies = Ies::new().with(self.cause_ie(dlc.intf, cause, diag)).with(Ie::CallState(CallState::new(state)));
        self.send_message(dlc, &Q931Message::new(callref, MessageType::Status, ies))
    }

    pub(crate) fn send_release_complete_on(
        &mut self,
        dlc: DlcId,
        callref: CallRef,
        cause: CauseValue,
        diag: Option<u8>,
    ) -> Result<()> {
        let ies = Ies::new().with(self.cause_ie(dlc.intf, cause, diag));
        self.send_message(dlc, &Q931Message::new(callref, MessageType::ReleaseComplete, ies))
    }

    /// Cause IE with the location of this interface
    pub(crate) fn cause_ie(&self, intf: IntfId, cause: CauseValue, diag: Option<u8>) -> Ie {
        let location = self.intfs.get(&intf).map(|i| i.location()).unwrap_or(Location::User);
        let ie = Cause::new(location, cause);
        Ie::Cause(match diag {
            Some(d) => ie.with_diagnostics(&[d]),
            None => ie,
        })
    }

    /// Caller's elements, plus a cause when they carry none
    pub(crate) fn with_default_cause(&self, intf: IntfId, mut ies: Ies, cause: CauseValue) -> Ies {
        if ies.cause().is_none() {
            ies.add(self.cause_ie(intf, cause, None));
        }
        ies
    }

    pub(crate) fn intf_name(&self, intf: IntfId) -> String {
        self.intfs.get(&intf).map(|i| i.config.name.clone()).unwrap_or_else(|| format!("#{}", intf))
    }
}
