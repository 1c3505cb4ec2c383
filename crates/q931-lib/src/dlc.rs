use std::collections::VecDeque;

use q931_core::{Longtime, assert_warn};

use crate::q931::TimerKey;
use crate::timer::TimerSet;
use crate::transport::DlcId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlcStatus {
    Disconnected,
    AwaitingConnection,
    AwaitingDisconnection,
    Connected,
}

/// Signalling data link connection.
/// `refcnt` counts the calls and CES that store this DLC; the entry is dropped when it reaches zero
/// while disconnected. `holdcnt` counts logical users; at zero the autorelease timer runs.
#[derive(Debug)]
pub struct Dlc {
    pub id: DlcId,
    pub status: DlcStatus,
    refcnt: u32,
    holdcnt: u32,
    /// Frames composed while the link was being established
    queue: VecDeque<Vec<u8>>,
    autorelease_time: Longtime,
}

impl Dlc {
    pub fn new(id: DlcId, autorelease_time: Longtime) -> Self {
        Dlc {
            id,
            status: DlcStatus::Disconnected,
            refcnt: 0,
            holdcnt: 0,
            queue: VecDeque::new(),
            autorelease_time,
        }
    }

    pub fn refcnt(&self) -> u32 {
        self.refcnt
    }

    pub fn holdcnt(&self) -> u32 {
        self.holdcnt
    }

    pub fn get(&mut self) {
        self.refcnt += 1;
    }

    /// Returns true when the last reference was dropped
    pub fn put(&mut self) -> bool {
        assert_warn!(self.refcnt > 0, "DLC {} put with refcnt 0", self.id);
        self.refcnt = self.refcnt.saturating_sub(1);
        self.refcnt == 0
    }

    /// Mark the link in use; cancels a pending autorelease
    pub fn hold(&mut self, timers: &mut TimerSet<TimerKey>) {
        self.holdcnt += 1;
        timers.stop(TimerKey::DlcAutorelease(self.id));
    }

    /// Drop one logical use. When the last one goes, the autorelease timer starts if configured.
    pub fn release(&mut self, timers: &mut TimerSet<TimerKey>, now: Longtime) {
        assert_warn!(self.holdcnt > 0, "DLC {} released with holdcnt 0", self.id);
        self.holdcnt = self.holdcnt.saturating_sub(1);
        if self.holdcnt == 0 && self.autorelease_time > 0 && !self.id.is_broadcast() {
            tracing::debug!(tei = self.id.tei, "DLC idle, autorelease in {} us", self.autorelease_time);
            timers.start_delta(TimerKey::DlcAutorelease(self.id), self.autorelease_time, now);
        }
    }

    pub fn queue_frame(&mut self, frame: Vec<u8>) {
        self.queue.push_back(frame);
    }

    /// Frames queued while awaiting connection, oldest first
    pub fn take_queue(&mut self) -> Vec<Vec<u8>> {
        self.queue.drain(..).collect()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn set_status(&mut self, status: DlcStatus) {
        if self.status != status {
            tracing::debug!(tei = self.id.tei, "DLC {:?} -> {:?}", self.status, status);
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_core::debug;

    #[test]
    fn test_autorelease_only_when_configured() {
        debug::setup_logging_verbose();
        let mut timers = TimerSet::new();
        let id = DlcId::new(0, 0);

        let mut dlc = Dlc::new(id, 0);
        dlc.hold(&mut timers);
        dlc.release(&mut timers, 0);
        assert!(timers.is_empty());

        let mut dlc = Dlc::new(id, 5000);
        dlc.hold(&mut timers);
        dlc.hold(&mut timers);
        dlc.release(&mut timers, 0);
        assert!(timers.is_empty());
        dlc.release(&mut timers, 0);
        assert_eq!(timers.expiry(TimerKey::DlcAutorelease(id)), Some(5000));

        // A new hold before expiry cancels the timer
        dlc.hold(&mut timers);
        assert!(!timers.is_pending(TimerKey::DlcAutorelease(id)));
        assert_eq!(dlc.holdcnt(), 1);
    }

    #[test]
    fn test_refcnt_is_independent_of_holdcnt() {
        debug::setup_logging_verbose();
        let mut timers = TimerSet::new();
        let mut dlc = Dlc::new(DlcId::new(0, 64), 1000);
        dlc.get();
        dlc.hold(&mut timers);
        dlc.release(&mut timers, 0);
        assert_eq!(dlc.refcnt(), 1);
        assert!(dlc.put());
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut dlc = Dlc::new(DlcId::new(0, 0), 0);
        dlc.queue_frame(vec![1]);
        dlc.queue_frame(vec![2]);
        assert_eq!(dlc.take_queue(), vec![vec![1], vec![2]]);
        assert_eq!(dlc.queue_len(), 0);
    }
}
