use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use q931_config::IntfConfig;
use q931_ies::Ie;
use q931_ies::enums::user_info_layer1::UserInfoLayer1;
use q931_ies::fields::party_number::PartyNumber;
use q931_ies::ies::{BearerCapability, CalledPartyNumber};
use q931_ies::message::Ies;
use q931_lib::{CallId, DlcId, IntfId, Q931Error, Q931Indication, Q931Lib, TEI_P2P};

use crate::console::Command;
use crate::wire::{Side, WireEnd, WireEvent};

/// TEI the terminal on a multipoint bus answers from
const TERMINAL_TEI: u8 = 64;
/// Upper bound on a main loop wait, so ctrl-c is noticed
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// How long clearing may take on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// One interface with its own library instance
pub struct End {
    pub name: String,
    pub side: Side,
    pub lib: Q931Lib,
    pub intf: IntfId,
    is_nt: bool,
}

impl End {
    fn new(side: Side, config: IntfConfig, wire: Sender<WireEvent>) -> Result<Self, Q931Error> {
        let name = config.name.clone();
        let is_nt = config.role.is_nt();
        let mut lib = Q931Lib::new(Box::new(WireEnd::new(side, wire)));
        let intf = lib.open_interface(config)?;
        Ok(Self { name, side, lib, intf, is_nt })
    }

    /// Link on which frames from the other side arrive
    fn peer_dlc(&self) -> DlcId {
        let multipoint = self.lib.interface(self.intf).is_some_and(|i| i.is_nt_multipoint());
        DlcId::new(self.intf, if multipoint { TERMINAL_TEI } else { TEI_P2P })
    }

    fn call_ids(&self) -> Vec<CallId> {
        self.lib.calls().map(|c| c.id).collect()
    }

    /// Answers incoming calls and completes clearing the peer started
    fn handle(&mut self, ind: Q931Indication) {
        tracing::info!("{}: {:?}", self.name, ind);
        let res = match ind {
            Q931Indication::Setup { call, .. } => self
                .lib
                .alerting_request(call, Ies::new())
                .and_then(|_| self.lib.setup_response(call, Ies::new())),
            Q931Indication::SetupConfirm { call, .. } if self.is_nt => self.lib.setup_complete_request(call, Ies::new()),
            Q931Indication::Disconnect { call, .. } => self.lib.release_request(call, Ies::new()),
            Q931Indication::Restart { intf, .. } => self.lib.restart_response(intf),
            _ => Ok(()),
        };
        if let Err(e) = res {
            tracing::warn!("{}: {}", self.name, e);
        }
    }

    fn hangup(&mut self) {
        for call in self.call_ids() {
            if let Err(e) = self.lib.disconnect_request(call, Ies::new()) {
                tracing::warn!("{}: hangup of call {}: {}", self.name, call, e);
            }
        }
    }
}

/// Two interfaces of opposite roles wired back to back
pub struct Switch {
    pub a: End,
    pub b: End,
}

impl Switch {
    pub fn new(a: IntfConfig, b: IntfConfig, wire: Sender<WireEvent>) -> Result<Self, Q931Error> {
        Ok(Self {
            a: End::new(Side::A, a, wire.clone())?,
            b: End::new(Side::B, b, wire)?,
        })
    }

    fn end_mut(&mut self, side: Side) -> &mut End {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    pub fn active_calls_cnt(&self) -> usize {
        self.a.lib.active_calls_cnt() + self.b.lib.active_calls_cnt()
    }

    /// Runs until `running` is cleared or the console asks to exit, then clears all calls
    pub fn run(&mut self, commands: &Receiver<Command>, wire: &Receiver<WireEvent>, running: &AtomicBool) {
        let mut commands = commands.clone();
        let mut closing_since: Option<Instant> = None;

        loop {
            if !running.load(Ordering::SeqCst) && closing_since.is_none() {
                tracing::info!("shutting down, clearing {} calls", self.active_calls_cnt());
                self.a.hangup();
                self.b.hangup();
                self.settle(wire);
                closing_since = Some(Instant::now());
            }
            if let Some(since) = closing_since {
                if self.active_calls_cnt() == 0 {
                    break;
                }
                if since.elapsed() > SHUTDOWN_GRACE {
                    tracing::warn!("{} calls still present at shutdown", self.active_calls_cnt());
                    break;
                }
            }

            crossbeam_channel::select! {
                recv(commands) -> cmd => match cmd {
                    Ok(Command::Exit) => running.store(false, Ordering::SeqCst),
                    Ok(cmd) => self.execute(cmd),
                    Err(_) => {
                        commands = crossbeam_channel::never();
                        running.store(false, Ordering::SeqCst);
                    }
                },
                recv(wire) -> ev => if let Ok(ev) = ev {
                    self.deliver(ev);
                },
                default(self.next_wait()) => {}
            }

            self.a.lib.run_timers();
            self.b.lib.run_timers();
            self.settle(wire);
        }
    }

    fn next_wait(&self) -> Duration {
        let next = [self.a.lib.next_timer(), self.b.lib.next_timer()].into_iter().flatten().min();
        match next {
            Some(t) => Duration::from_micros(t.max(0) as u64).min(POLL_INTERVAL),
            None => POLL_INTERVAL,
        }
    }

    pub fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::Dial(digits) => {
                let ies = Ies::new()
                    .with(Ie::BearerCapability(BearerCapability::speech(UserInfoLayer1::G711Alaw)))
                    .with(Ie::CalledPartyNumber(CalledPartyNumber(PartyNumber::unknown(&digits))));
                match self.a.lib.setup_request(self.a.intf, ies) {
                    Ok(call) => tracing::info!("{}: dialing {} on call {}", self.a.name, digits, call),
                    Err(e) => tracing::warn!("{}: dialing {} failed: {}", self.a.name, digits, e),
                }
            }
            Command::Hangup => self.a.hangup(),
            Command::Calls => {
                for end in [&self.a, &self.b] {
                    for c in end.lib.calls() {
                        println!("{} call {} {:?} channels {}", end.name, c.id, c.state, c.channels);
                    }
                }
            }
            Command::Exit => {}
        }
    }

    /// Hands a frame or link release to the other side
    pub fn deliver(&mut self, ev: WireEvent) {
        match ev {
            WireEvent::Frame { from, frame, .. } => {
                let to = self.end_mut(from.peer());
                let dlc = to.peer_dlc();
                to.lib.receive(dlc, &frame);
            }
            WireEvent::Released { from, .. } => {
                let to = self.end_mut(from.peer());
                let dlc = to.peer_dlc();
                to.lib.dlc_released(dlc);
            }
        }
    }

    /// Moves frames and handles indications until both sides are quiet
    pub fn settle(&mut self, wire: &Receiver<WireEvent>) {
        loop {
            let mut busy = false;
            while let Ok(ev) = wire.try_recv() {
                self.deliver(ev);
                busy = true;
            }
            for end in [&mut self.a, &mut self.b] {
                while let Some(ind) = end.lib.next_indication() {
                    end.handle(ind);
                    busy = true;
                }
            }
            if !busy {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_config::{IntfType, Role};
    use q931_core::debug;
    use q931_ies::enums::call_state_value::CallStateValue;
    use q931_lib::Chanset;

    fn switch(intf_type: IntfType) -> (Switch, Receiver<WireEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let a = IntfConfig::new("A", Role::Nt, intf_type);
        let b = IntfConfig::new("B", Role::Te, intf_type);
        (Switch::new(a, b, tx).unwrap(), rx)
    }

    #[test]
    fn test_dialed_call_is_answered_and_hung_up() {
        debug::setup_logging_verbose();
        let (mut sw, wire) = switch(IntfType::BraPointToPoint);

        sw.execute(Command::Dial("100".to_string()));
        sw.settle(&wire);
        assert_eq!(sw.a.lib.calls().map(|c| c.state).collect::<Vec<_>>(), vec![CallStateValue::Active]);
        assert_eq!(sw.b.lib.calls().map(|c| c.state).collect::<Vec<_>>(), vec![CallStateValue::Active]);

        sw.execute(Command::Hangup);
        sw.settle(&wire);
        assert_eq!(sw.active_calls_cnt(), 0);
    }

    #[test]
    fn test_multipoint_bus_answers_from_terminal_tei() {
        debug::setup_logging_verbose();
        let (mut sw, wire) = switch(IntfType::BraMultipoint);

        sw.execute(Command::Dial("100".to_string()));
        sw.settle(&wire);
        let call = sw.a.lib.calls().next().unwrap();
        assert_eq!(call.state, CallStateValue::Active);
        assert_eq!(call.selected_ces, Some(TERMINAL_TEI));
    }

    #[test]
    fn test_restart_from_network_is_acknowledged() {
        debug::setup_logging_verbose();
        let (mut sw, wire) = switch(IntfType::BraPointToPoint);

        sw.a.lib.restart_request(sw.a.intf, Chanset::new()).unwrap();
        sw.settle(&wire);
        for end in [&sw.a, &sw.b] {
            assert_eq!(end.lib.interface(end.intf).map(|i| i.global_call.state), Some(CallStateValue::Null));
            assert!(end.lib.interface(end.intf).and_then(|i| i.global_call.peer_restart.as_ref()).is_none());
        }
        assert_eq!(sw.a.lib.next_timer(), None);
        assert_eq!(sw.b.lib.next_timer(), None);
    }
}
