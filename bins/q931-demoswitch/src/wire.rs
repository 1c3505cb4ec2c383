use crossbeam_channel::Sender;

use q931_lib::{ConnectStatus, DlcId, Q931Transport, TransportErr};

/// One of the two interfaces the demo switch connects back to back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn peer(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Debug)]
pub enum WireEvent {
    Frame { from: Side, dlc: DlcId, frame: Vec<u8> },
    /// `from` released its data link; the peer sees the link drop
    Released { from: Side, dlc: DlcId },
}

/// In-memory link layer. Links are always up and frames are queued for the main loop,
/// which hands them to the library on the other side.
pub struct WireEnd {
    side: Side,
    tx: Sender<WireEvent>,
}

impl WireEnd {
    pub fn new(side: Side, tx: Sender<WireEvent>) -> Self {
        Self { side, tx }
    }
}

impl Q931Transport for WireEnd {
    fn send_frame(&mut self, dlc: DlcId, frame: &[u8]) -> Result<(), TransportErr> {
        tracing::debug!("{:?} {} -> {}", self.side, dlc, hex::encode(frame));
        self.tx
            .send(WireEvent::Frame { from: self.side, dlc, frame: frame.to_vec() })
            .map_err(|_| TransportErr::LinkDown)
    }

    fn connect(&mut self, dlc: DlcId) -> Result<ConnectStatus, TransportErr> {
        tracing::debug!("{:?} link {} up", self.side, dlc);
        Ok(ConnectStatus::Connected)
    }

    fn disconnect(&mut self, dlc: DlcId) -> Result<(), TransportErr> {
        tracing::debug!("{:?} link {} released", self.side, dlc);
        self.tx.send(WireEvent::Released { from: self.side, dlc }).map_err(|_| TransportErr::LinkDown)
    }
}
