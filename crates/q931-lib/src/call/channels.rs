//! B-channel negotiation for calls

use q931_core::unimplemented_log;
use q931_ies::Ie;
use q931_ies::enums::cause_value::CauseValue;
use q931_ies::ies::{ChannelIdentification, ChannelSelection};
use q931_ies::message::Ies;

use crate::Q931Lib;
use crate::call::CallId;
use crate::ccb::Q931Indication;
use crate::channel::{ChannelState, channel_alloc, channel_select_from};
use crate::chanset::Chanset;
use crate::error::{Q931Error, Result};

impl Q931Lib {
    /// Pick the channel for an outgoing SETUP and return the Channel identification to send.
    /// The network side assigns an exclusive channel; the user side proposes what the
    /// application asked for, or any channel.
    pub(crate) fn assign_outgoing_channel(
        &mut self,
        call: CallId,
        requested: Option<&ChannelIdentification>,
    ) -> Result<ChannelIdentification> {
        let intf_id = self.get_call(call)?.intf;
        let intf = self.intf_mut(intf_id)?;
        let chantype = intf.channel_interface_type();
        let wanted: Chanset = requested.map(|r| r.channels().iter().copied().collect()).unwrap_or_default();

        if intf.is_nt() {
            let chan = channel_select_from(&intf.channels, &wanted).ok_or(if wanted.is_empty() {
                Q931Error::NoChannelAvailable
            } else {
                Q931Error::ChannelUnavailable
            })?;
            if let Some(ch) = intf.channel_mut(chan) {
                ch.select(call);
            }
            self.get_call_mut(call)?.channels = Chanset::single(chan);
            return Ok(ChannelIdentification::b_channel(chantype, chan, true));
        }

        match requested {
            Some(req) if !wanted.is_empty() => {
                for chan in wanted.iter() {
                    match intf.channel_mut(chan) {
                        Some(ch) if ch.is_available() => ch.propose(call),
                        _ => {
                            // Undo what was proposed so far
                            for ch in intf.channels.iter_mut().filter(|c| c.call == Some(call)) {
                                ch.release();
                            }
                            return Err(Q931Error::ChannelUnavailable);
                        }
                    }
                }
                let req = req.clone();
                self.get_call_mut(call)?.channels = wanted;
                Ok(req)
            }
            _ => Ok(ChannelIdentification::new(chantype, ChannelSelection::Any, false)),
        }
    }

    /// Bind a channel to an incoming call from the Channel identification of its SETUP.
    /// On failure, returns the cause to clear the call with.
    pub(crate) fn negotiate_incoming_channel(
        &mut self,
        call: CallId,
        offered: Option<&ChannelIdentification>,
    ) -> core::result::Result<(), CauseValue> {
        let intf_id = self.calls.get(&call).map(|c| c.intf).ok_or(CauseValue::TemporaryFailure)?;
        let intf = self.intfs.get_mut(&intf_id).ok_or(CauseValue::TemporaryFailure)?;
        let is_nt = intf.is_nt();

        let (chan, changed) = match offered.map(|c| (&c.selection, c.exclusive)) {
            Some((ChannelSelection::NoChannel, _)) if !is_nt => {
                tracing::debug!(intf = %intf.config.name, "call {} offered without channel", call);
                return Ok(());
            }
            None | Some((ChannelSelection::Any, _)) | Some((ChannelSelection::NoChannel, _)) => {
                (channel_alloc(&mut intf.channels, call).ok_or(CauseValue::NoCircuitChannelAvailable)?, true)
            }
            Some((ChannelSelection::BChannels(list), exclusive)) => {
                if list.iter().any(|c| !intf.has_channel(*c)) {
                    return Err(CauseValue::IdentifiedChannelDoesNotExist);
                }
                let wanted: Chanset = list.iter().copied().collect();
                match channel_select_from(&intf.channels, &wanted) {
                    Some(chan) => {
                        if let Some(ch) = intf.channel_mut(chan) {
                            ch.select(call);
                        }
                        (chan, false)
                    }
                    None if exclusive => return Err(CauseValue::RequestedCircuitChannelNotAvailable),
                    None => (channel_alloc(&mut intf.channels, call).ok_or(CauseValue::NoCircuitChannelAvailable)?, true),
                }
            }
            Some((ChannelSelection::SlotMap(_), _)) => {
                unimplemented_log!("channel selection by slot map");
                return Err(CauseValue::ChannelTypeNotImplemented);
            }
        };

        tracing::debug!(intf = %intf.config.name, "call {} on B{}", call, chan);
        if let Some(c) = self.calls.get_mut(&call) {
            c.channels = Chanset::single(chan);
            // The network always names the channel in its first response; the user only when it picked another one
            c.chanid_pending = is_nt || changed;
        }
        Ok(())
    }

    /// Add the channel identification owed in the first response to an incoming SETUP
    pub(crate) fn add_pending_chanid(&mut self, call: CallId, ies: &mut Ies) {
        let Some(c) = self.calls.get_mut(&call) else { return };
        if !c.chanid_pending {
            return;
        }
        c.chanid_pending = false;
        let Some(chan) = c.channels.first() else { return };
        if ies.channel_identification().is_some() {
            return;
        }
        let Some(intf) = self.intfs.get(&c.intf) else { return };
        ies.add(Ie::ChannelIdentification(ChannelIdentification::b_channel(intf.channel_interface_type(), chan, true)));
    }

    /// Take the channel the peer names in a response to our SETUP or RESUME.
    /// On failure, returns the cause to clear the call with.
    pub(crate) fn accept_peer_channel(&mut self, call: CallId, ies: &Ies) -> core::result::Result<(), CauseValue> {
        let Some(ci) = ies.channel_identification() else { return Ok(()) };
        let Some(&chan) = ci.channels().first() else { return Ok(()) };
        let c = self.calls.get_mut(&call).ok_or(CauseValue::TemporaryFailure)?;
        let intf = self.intfs.get_mut(&c.intf).ok_or(CauseValue::TemporaryFailure)?;

        if c.channels.len() == 1 && c.channels.contains(chan) {
            if let Some(ch) = intf.channel_mut(chan).filter(|ch| ch.state == ChannelState::Proposed) {
                ch.select(call);
            }
            return Ok(());
        }
        if intf.is_nt() && !c.channels.is_empty() {
            // The network assigned the channel exclusively
            return Err(CauseValue::ChannelUnacceptable);
        }

        match intf.channel_mut(chan) {
            Some(ch) if ch.is_available() || (ch.state == ChannelState::Proposed && ch.call == Some(call)) => ch.select(call),
            Some(_) => return Err(CauseValue::ChannelUnacceptable),
            None => return Err(CauseValue::IdentifiedChannelDoesNotExist),
        }
        for other in c.channels.iter().filter(|o| *o != chan) {
            if let Some(ch) = intf.channel_mut(other) {
                ch.release();
            }
        }
        tracing::debug!(intf = %intf.config.name, "call {} on B{}", call, chan);
        c.channels = Chanset::single(chan);
        Ok(())
    }

    /// Switch the call's B-channels through
    pub(crate) fn connect_channels(&mut self, call: CallId) {
        let Some(c) = self.calls.get(&call) else { return };
        let Some(intf) = self.intfs.get_mut(&c.intf) else { return };
        let mut connected = Vec::new();
        for chan in c.channels.iter() {
            if let Some(ch) = intf.channel_mut(chan).filter(|ch| ch.call == Some(call) && ch.state != ChannelState::Connected) {
                ch.connect();
                connected.push(chan);
            }
        }
        for channel in connected {
            self.indicate(Q931Indication::ConnectChannel { call, channel });
        }
    }

    pub(crate) fn disconnect_channels(&mut self, call: CallId) {
        let Some(c) = self.calls.get(&call) else { return };
        let Some(intf) = self.intfs.get_mut(&c.intf) else { return };
        let mut disconnected = Vec::new();
        for chan in c.channels.iter() {
            if let Some(ch) = intf.channel_mut(chan).filter(|ch| ch.call == Some(call) && ch.state == ChannelState::Connected) {
                ch.disconnect();
                disconnected.push(chan);
            }
        }
        for channel in disconnected {
            self.indicate(Q931Indication::DisconnectChannel { call, channel });
        }
    }

    /// Put the call's channels out of service; they come back with a restart
    pub(crate) fn channels_to_maintenance(&mut self, call: CallId) {
        let Some(c) = self.calls.get(&call) else { return };
        let Some(intf) = self.intfs.get_mut(&c.intf) else { return };
        for ch in intf.channels.iter_mut().filter(|ch| ch.call == Some(call)) {
            tracing::warn!(intf = %intf.config.name, "B{} placed in maintenance", ch.id);
            ch.set_maintenance();
        }
    }
}
