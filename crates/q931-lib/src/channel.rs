use core::fmt;

use crate::chanset::Chanset;
use crate::call::CallId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Out of service until restarted
    Maintenance,
    Available,
    /// Offered to the peer but not yet accepted
    Proposed,
    /// Bound to a call
    Selected,
    /// B-channel switched through
    Connected,
    /// Call is clearing, B-channel no longer switched
    Disconnected,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One B-channel of an interface
#[derive(Debug, Clone)]
pub struct Channel {
    /// Channel number, B1 is 1. On primary rate this is the timeslot number.
    pub id: u8,
    pub state: ChannelState,
    pub call: Option<CallId>,
}

impl Channel {
    pub fn new(id: u8) -> Self {
        Channel { id, state: ChannelState::Available, call: None }
    }

    pub fn is_available(&self) -> bool {
        self.state == ChannelState::Available
    }

    fn set_state(&mut self, state: ChannelState) {
        tracing::trace!("B{} {} -> {}", self.id, self.state, state);
        self.state = state;
    }

    pub fn propose(&mut self, call: CallId) {
        self.set_state(ChannelState::Proposed);
        self.call = Some(call);
    }

    pub fn select(&mut self, call: CallId) {
        self.set_state(ChannelState::Selected);
        self.call = Some(call);
    }

    pub fn connect(&mut self) {
        self.set_state(ChannelState::Connected);
    }

    pub fn disconnect(&mut self) {
        if self.state == ChannelState::Connected {
            self.set_state(ChannelState::Disconnected);
        }
    }

    /// Return to the pool; a channel in maintenance stays there
    pub fn release(&mut self) {
        if self.state != ChannelState::Maintenance {
            self.set_state(ChannelState::Available);
        }
        self.call = None;
    }

    pub fn set_maintenance(&mut self) {
        self.set_state(ChannelState::Maintenance);
        self.call = None;
    }

    /// Bring back into service after a restart
    pub fn restart(&mut self) {
        self.set_state(ChannelState::Available);
        self.call = None;
    }
}

/// Channels sized for an interface with `count` B-channels.
/// Primary rate numbering skips timeslot 16, which carries the D-channel.
pub fn channels_for(count: usize) -> Vec<Channel> {
    if count <= 2 {
        (1..=count as u8).map(Channel::new).collect()
    } else {
        (1..=31u8).filter(|ts| *ts != 16).take(count).map(Channel::new).collect()
    }
}

/// First available channel, without taking it
pub fn channel_select(channels: &[Channel]) -> Option<u8> {
    channels.iter().find(|c| c.is_available()).map(|c| c.id)
}

/// First available channel among `candidates`, or among all channels if `candidates` is empty
pub fn channel_select_from(channels: &[Channel], candidates: &Chanset) -> Option<u8> {
    if candidates.is_empty() {
        return channel_select(channels);
    }
    channels.iter().find(|c| c.is_available() && candidates.contains(c.id)).map(|c| c.id)
}

/// Take the first available channel for `call`
pub fn channel_alloc(channels: &mut [Channel], call: CallId) -> Option<u8> {
    let chan = channels.iter_mut().find(|c| c.is_available())?;
    chan.select(call);
    Some(chan.id)
}

pub fn channel_by_id(channels: &mut [Channel], id: u8) -> Option<&mut Channel> {
    channels.iter_mut().find(|c| c.id == id)
}
