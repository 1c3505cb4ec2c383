use std::collections::{BTreeMap, VecDeque};

use q931_config::{IntfConfig, Role};
use q931_core::{Clock, Direction, Longtime, SystemClock};
use q931_ies::enums::call_state_value::CallStateValue;
use q931_ies::enums::cause_value::CauseValue;

use crate::call::{Call, CallId, CallTimer};
use crate::ccb::Q931Indication;
use crate::dlc::DlcStatus;
use crate::error::{Q931Error, Result};
use crate::global_call::GlobalTimer;
use crate::intf::Intf;
use crate::timer::TimerSet;
use crate::transport::{DlcId, IntfId, Q931Transport};

/// Owner and kind of a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKey {
    Call { call: CallId, timer: CallTimer },
    /// T308 of a terminal being cleared after another one answered a broadcast SETUP
    Ces { call: CallId, tei: u8 },
    DlcAutorelease(DlcId),
    Global { intf: IntfId, timer: GlobalTimer },
    /// T307 of a suspended call
    Parked { intf: IntfId, call: CallId },
}

/// Q.931 call control context.
/// Owns the interfaces, calls and timers. All entry points run on the caller's thread;
/// the host drives it with `receive`, `run_timers` and the primitive methods, and drains
/// `next_indication`.
pub struct Q931Lib {
    clock: Box<dyn Clock>,
    pub(crate) transport: Box<dyn Q931Transport>,
    pub(crate) timers: TimerSet<TimerKey>,
    pub(crate) intfs: BTreeMap<IntfId, Intf>,
    pub(crate) calls: BTreeMap<CallId, Call>,
    indications: VecDeque<Q931Indication>,
    next_intf: IntfId,
    next_call: u32,
}

impl Q931Lib {
    pub fn new(transport: Box<dyn Q931Transport>) -> Self {
        Self::with_clock(transport, Box::new(SystemClock))
    }

    pub fn with_clock(transport: Box<dyn Q931Transport>, clock: Box<dyn Clock>) -> Self {
        Q931Lib {
            clock,
            transport,
            timers: TimerSet::new(),
            intfs: BTreeMap::new(),
            calls: BTreeMap::new(),
            indications: VecDeque::new(),
            next_intf: 0,
            next_call: 1,
        }
    }

    pub fn now(&self) -> Longtime {
        self.clock.now()
    }

    pub fn open_interface(&mut self, config: IntfConfig) -> Result<IntfId> {
        config.validate().map_err(|e| Q931Error::Config(format!("interface {}: {}", config.name, e)))?;
        if self.intfs.values().any(|i| i.config.name == config.name) {
            return Err(Q931Error::Config(format!("interface {} already open", config.name)));
        }
        let id = self.next_intf;
        self.next_intf += 1;
        tracing::info!(intf = %config.name, "opening {:?} {:?} interface as {}", config.role, config.intf_type, id);
        self.intfs.insert(id, Intf::new(id, config));
        Ok(id)
    }

    /// Close an interface. All its calls must have been released.
    pub fn close_interface(&mut self, intf: IntfId) -> Result<()> {
        if self.calls.values().any(|c| c.intf == intf) {
            return Err(Q931Error::Config(format!("interface {} still has calls", intf)));
        }
        let Some(removed) = self.intfs.remove(&intf) else {
            return Err(Q931Error::UnknownInterface(intf));
        };
        tracing::info!(intf = %removed.config.name, "closing interface");
        self.timers.stop_matching(|k| match k {
            TimerKey::DlcAutorelease(d) => d.intf == intf,
            TimerKey::Global { intf: i, .. } | TimerKey::Parked { intf: i, .. } => *i == intf,
            _ => false,
        });
        for dlc in removed.dlcs.values() {
            if matches!(dlc.status, DlcStatus::Connected | DlcStatus::AwaitingConnection) {
                if let Err(e) = self.transport.disconnect(dlc.id) {
                    tracing::warn!(intf = %removed.config.name, "disconnect of DLC {} failed: {}", dlc.id, e);
                }
            }
        }
        Ok(())
    }

    pub fn interface(&self, intf: IntfId) -> Option<&Intf> {
        self.intfs.get(&intf)
    }

    pub fn interface_by_name(&self, name: &str) -> Option<IntfId> {
        self.intfs.values().find(|i| i.config.name == name).map(|i| i.id)
    }

    pub fn call(&self, call: CallId) -> Option<&Call> {
        self.calls.get(&call)
    }

    pub fn calls(&self) -> impl Iterator<Item = &Call> {
        self.calls.values()
    }

    /// Calls not yet released, on all interfaces
    pub fn active_calls_cnt(&self) -> usize {
        self.calls.len()
    }

    pub fn next_indication(&mut self) -> Option<Q931Indication> {
        self.indications.pop_front()
    }

    /// Fire every expired timer. Returns the time until the next expiry.
    pub fn run_timers(&mut self) -> Option<Longtime> {
        loop {
            let now = self.now();
            let Some(key) = self.timers.pop_expired(now) else {
                break;
            };
            tracing::trace!("timer {:?} expired", key);
            let res = match key {
                TimerKey::Call { call, timer } => self.call_timer_expired(call, timer),
                TimerKey::Ces { call, tei } => self.ces_t308_expired(call, tei),
                TimerKey::DlcAutorelease(dlc) => {
                    self.dlc_autorelease_expired(dlc);
                    Ok(())
                }
                TimerKey::Global { intf, timer } => self.global_timer_expired(intf, timer),
                TimerKey::Parked { intf, call } => {
                    self.parked_timer_expired(intf, call);
                    Ok(())
                }
            };
            if let Err(e) = res {
                tracing::warn!("handling {:?} expiry: {}", key, e);
            }
        }
        self.next_timer()
    }

    /// Time until the next timer expires, None when no timer is pending
    pub fn next_timer(&self) -> Option<Longtime> {
        self.timers.next_timer(self.now())
    }

    /// The link layer reports `dlc` established: flush queued frames and recover calls that lost it
    pub fn dlc_established(&mut self, dlc: DlcId) {
        let Some(intf) = self.intfs.get_mut(&dlc.intf) else {
            tracing::warn!("DLC {} established on unknown interface", dlc);
            return;
        };
        let name = intf.config.name.clone();
        let entry = intf.dlc_entry(dlc.tei);
        entry.set_status(DlcStatus::Connected);
        for frame in entry.take_queue() {
            if let Err(e) = self.transport.send_frame(dlc, &frame) {
                tracing::error!(intf = %name, "sending queued frame on {}: {}", dlc, e);
            }
        }

        let waiting: Vec<CallId> = self
            .calls
            .values()
            .filter(|c| c.dlc == dlc && self.timers.is_pending(TimerKey::Call { call: c.id, timer: CallTimer::T309 }))
            .map(|c| c.id)
            .collect();
        for call in waiting {
            self.stop_call_timer(call, CallTimer::T309);
            if let Err(e) = self.start_status_enquiry(call) {
                tracing::warn!("status enquiry after link recovery: {}", e);
            }
        }
    }

    /// The link layer reports `dlc` released, or its establishment failed
    pub fn dlc_released(&mut self, dlc: DlcId) {
        let Some(intf) = self.intfs.get_mut(&dlc.intf) else {
            tracing::warn!("DLC {} released on unknown interface", dlc);
            return;
        };
        let name = intf.config.name.clone();
        if let Some(entry) = intf.dlcs.get_mut(&dlc.tei) {
            entry.set_status(DlcStatus::Disconnected);
            let lost = entry.take_queue();
            if !lost.is_empty() {
                tracing::warn!(intf = %name, "DLC {} released with {} frames queued", dlc, lost.len());
            }
        }

        // Legs of broadcast calls answered over this link
        let legs: Vec<CallId> =
            self.calls.values().filter(|c| c.dlc != dlc && c.ces(dlc.tei).is_some_and(|ces| ces.dlc == dlc)).map(|c| c.id).collect();
        for call in legs {
            self.remove_ces(call, dlc.tei);
            if let Err(e) = self.check_broadcast_failed(call) {
                tracing::warn!(intf = %name, "clearing broadcast call: {}", e);
            }
        }

        let affected: Vec<CallId> = self.calls.values().filter(|c| c.dlc == dlc).map(|c| c.id).collect();
        for call in affected {
            let Some(c) = self.calls.get(&call) else { continue };
            if c.state == CallStateValue::Active {
                if !self.call_timer_pending(call, CallTimer::T309) {
                    tracing::info!(intf = %name, "data link lost, holding call {} for T309", call);
                    self.start_call_timer(call, CallTimer::T309);
                }
            } else {
                tracing::info!(intf = %name, "data link lost, clearing call {} in {}", call, c.state);
                self.clear_locally(call, CauseValue::DestinationOutOfOrder);
            }
        }
        self.drop_unused_dlc(dlc);
    }

    // ---------------------------------------------------------------------------------------------

    pub(crate) fn indicate(&mut self, ind: Q931Indication) {
        tracing::debug!("{}", ind);
        self.indications.push_back(ind);
    }

    pub(crate) fn intf(&self, intf: IntfId) -> Result<&Intf> {
        self.intfs.get(&intf).ok_or(Q931Error::UnknownInterface(intf))
    }

    pub(crate) fn intf_mut(&mut self, intf: IntfId) -> Result<&mut Intf> {
        self.intfs.get_mut(&intf).ok_or(Q931Error::UnknownInterface(intf))
    }

    /// Error for a handle with no live call. Handles already handed out belong to calls
    /// that have reached Null since, and primitives on them are out of state.
    fn missing_call(&self, call: CallId) -> Q931Error {
        if call.0 != 0 && call.0 < self.next_call {
            Q931Error::incompatible(CallStateValue::Null)
        } else {
            Q931Error::UnknownCall(call.0)
        }
    }

    pub(crate) fn get_call(&self, call: CallId) -> Result<&Call> {
        self.calls.get(&call).ok_or_else(|| self.missing_call(call))
    }

    pub(crate) fn get_call_mut(&mut self, call: CallId) -> Result<&mut Call> {
        let missing = self.missing_call(call);
        self.calls.get_mut(&call).ok_or(missing)
    }

    /// Interface role of a call
    pub(crate) fn call_role(&self, call: CallId) -> Result<Role> {
        let intf = self.get_call(call)?.intf;
        Ok(self.intf(intf)?.role())
    }

    pub(crate) fn set_call_state(&mut self, call: CallId, state: CallStateValue) {
        if let Some(c) = self.calls.get_mut(&call) {
            c.set_state(state);
        }
    }

    /// Create a call in state Null, bound to `dlc`
    pub(crate) fn new_call(&mut self, intf: IntfId, callref: u16, direction: Direction, dlc: DlcId) -> Result<CallId> {
        let i = self.intf(intf)?;
        let (name, callref_len) = (i.name().to_string(), i.callref_len());
        let id = CallId(self.next_call);
        self.next_call = self.next_call.wrapping_add(1).max(1);
        let call = Call::new(id, intf, &name, callref, callref_len, direction, dlc);
        tracing::debug!(intf = %name, callref = %call.tx_callref(), "new {} call {}", direction, id);
        self.calls.insert(id, call);
        self.dlc_use(dlc);
        Ok(id)
    }

    pub(crate) fn start_call_timer(&mut self, call: CallId, timer: CallTimer) {
        let Some(c) = self.calls.get(&call) else { return };
        let Some(intf) = self.intfs.get(&c.intf) else { return };
        let delta = timer.duration(&intf.config.timers);
        let now = self.now();
        tracing::trace!(intf = %intf.config.name, "call {} start {}", call, timer);
        self.timers.start_delta(TimerKey::Call { call, timer }, delta, now);
    }

    pub(crate) fn stop_call_timer(&mut self, call: CallId, timer: CallTimer) {
        self.timers.stop(TimerKey::Call { call, timer });
    }

    pub(crate) fn stop_call_timers(&mut self, call: CallId, timers: &[CallTimer]) {
        for t in timers {
            self.stop_call_timer(call, *t);
        }
    }

    pub(crate) fn call_timer_pending(&self, call: CallId, timer: CallTimer) -> bool {
        self.timers.is_pending(TimerKey::Call { call, timer })
    }

    /// Take a reference and a hold on a DLC
    pub(crate) fn dlc_use(&mut self, dlc: DlcId) {
        if dlc.is_broadcast() {
            return;
        }
        let Some(intf) = self.intfs.get_mut(&dlc.intf) else { return };
        let entry = intf.dlc_entry(dlc.tei);
        entry.get();
        entry.hold(&mut self.timers);
    }

    /// Drop the reference and hold taken by `dlc_use`
    pub(crate) fn dlc_unuse(&mut self, dlc: DlcId) {
        if dlc.is_broadcast() {
            return;
        }
        let now = self.now();
        let Some(intf) = self.intfs.get_mut(&dlc.intf) else { return };
        let Some(entry) = intf.dlcs.get_mut(&dlc.tei) else { return };
        entry.release(&mut self.timers, now);
        entry.put();
        self.drop_unused_dlc(dlc);
    }

    /// Forget a disconnected, unreferenced DLC of a multipoint network interface
    fn drop_unused_dlc(&mut self, dlc: DlcId) {
        let Some(intf) = self.intfs.get_mut(&dlc.intf) else { return };
        if !intf.is_nt_multipoint() {
            return;
        }
        if let Some(entry) = intf.dlcs.get(&dlc.tei) {
            if entry.refcnt() == 0 && entry.status == DlcStatus::Disconnected {
                tracing::debug!(intf = %intf.config.name, "dropping DLC {}", dlc);
                intf.dlcs.remove(&dlc.tei);
                self.timers.stop(TimerKey::DlcAutorelease(dlc));
            }
        }
    }

    fn dlc_autorelease_expired(&mut self, dlc: DlcId) {
        let Some(intf) = self.intfs.get_mut(&dlc.intf) else { return };
        let name = intf.config.name.clone();
        let Some(entry) = intf.dlcs.get_mut(&dlc.tei) else { return };
        if entry.holdcnt() > 0 {
            return;
        }
        if matches!(entry.status, DlcStatus::Connected | DlcStatus::AwaitingConnection) {
            tracing::info!(intf = %name, "releasing idle DLC {}", dlc);
            match self.transport.disconnect(dlc) {
                Ok(()) => entry.set_status(DlcStatus::AwaitingDisconnection),
                Err(e) => {
                    tracing::warn!(intf = %name, "disconnect of DLC {} failed: {}", dlc, e);
                    entry.set_status(DlcStatus::Disconnected);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportErr;
    use crate::transport::ConnectStatus;
    use q931_config::IntfType;
    use q931_core::{ManualClock, debug};
    use q931_ies::message::Ies;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        frames: Vec<(DlcId, Vec<u8>)>,
        disconnects: Vec<DlcId>,
    }

    struct Recorder(Rc<RefCell<Log>>);

    impl Q931Transport for Recorder {
        fn send_frame(&mut self, dlc: DlcId, frame: &[u8]) -> core::result::Result<(), TransportErr> {
            self.0.borrow_mut().frames.push((dlc, frame.to_vec()));
            Ok(())
        }
        fn connect(&mut self, _dlc: DlcId) -> core::result::Result<ConnectStatus, TransportErr> {
            Ok(ConnectStatus::Pending)
        }
        fn disconnect(&mut self, dlc: DlcId) -> core::result::Result<(), TransportErr> {
            self.0.borrow_mut().disconnects.push(dlc);
            Ok(())
        }
    }

    fn lib() -> (Q931Lib, Rc<RefCell<Log>>, ManualClock) {
        let log = Rc::new(RefCell::new(Log::default()));
        let clock = ManualClock::new(0);
        let lib = Q931Lib::with_clock(Box::new(Recorder(log.clone())), Box::new(clock.clone()));
        (lib, log, clock)
    }

    #[test]
    fn test_open_close_interface() {
        debug::setup_logging_verbose();
        let (mut lib, _, _) = lib();
        let a = lib.open_interface(IntfConfig::new("A", Role::Nt, IntfType::BraPointToPoint)).unwrap();
        assert_eq!(lib.interface_by_name("A"), Some(a));
        assert!(lib.open_interface(IntfConfig::new("A", Role::Te, IntfType::BraPointToPoint)).is_err());

        let mut bad = IntfConfig::new("B", Role::Te, IntfType::Pra);
        bad.call_reference_len = 1;
        assert!(matches!(lib.open_interface(bad), Err(Q931Error::Config(_))));

        lib.close_interface(a).unwrap();
        assert_eq!(lib.close_interface(a), Err(Q931Error::UnknownInterface(a)));
    }

    #[test]
    fn test_frames_queued_until_established() {
        debug::setup_logging_verbose();
        let (mut lib, log, _) = lib();
        let a = lib.open_interface(IntfConfig::new("A", Role::Te, IntfType::BraPointToPoint)).unwrap();
        let dlc = DlcId::new(a, 0);

        lib.send_frame(dlc, vec![1]).unwrap();
        lib.send_frame(dlc, vec![2]).unwrap();
        assert!(log.borrow().frames.is_empty());
        assert_eq!(lib.interface(a).unwrap().dlcs[&0].status, DlcStatus::AwaitingConnection);

        lib.dlc_established(dlc);
        let frames: Vec<Vec<u8>> = log.borrow().frames.iter().map(|(_, f)| f.clone()).collect();
        assert_eq!(frames, vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_dlc_autorelease() {
        debug::setup_logging_verbose();
        let (mut lib, log, clock) = lib();
        let mut cfg = IntfConfig::new("A", Role::Te, IntfType::BraPointToPoint);
        cfg.dlc_autorelease_time = 10 * q931_core::longtime::LONGTIME_SECOND;
        let a = lib.open_interface(cfg).unwrap();
        let dlc = DlcId::new(a, 0);
        lib.dlc_established(dlc);

        lib.dlc_use(dlc);
        lib.dlc_unuse(dlc);
        assert_eq!(lib.next_timer(), Some(10 * q931_core::longtime::LONGTIME_SECOND));

        // A new user before expiry cancels the release
        clock.advance(5 * q931_core::longtime::LONGTIME_SECOND);
        lib.dlc_use(dlc);
        assert_eq!(lib.next_timer(), None);
        lib.dlc_unuse(dlc);

        clock.advance(10 * q931_core::longtime::LONGTIME_SECOND);
        assert_eq!(lib.run_timers(), None);
        assert_eq!(log.borrow().disconnects, vec![dlc]);
        assert_eq!(lib.interface(a).unwrap().dlcs[&0].status, DlcStatus::AwaitingDisconnection);
    }

    #[test]
    fn test_handles_never_issued_are_unknown() {
        debug::setup_logging_verbose();
        let (mut lib, log, _) = lib();
        lib.open_interface(IntfConfig::new("A", Role::Te, IntfType::BraPointToPoint)).unwrap();
        assert_eq!(lib.alerting_request(CallId(0), Ies::new()), Err(Q931Error::UnknownCall(0)));
        assert_eq!(lib.alerting_request(CallId(7), Ies::new()), Err(Q931Error::UnknownCall(7)));
        assert!(log.borrow().frames.is_empty());
    }
}
