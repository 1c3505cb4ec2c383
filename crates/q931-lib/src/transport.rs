use core::fmt;

use crate::error::TransportErr;

/// Index of an interface within a `Q931Lib`
pub type IntfId = usize;

/// TEI of the point-to-point data link of an interface
pub const TEI_P2P: u8 = 0;
/// Group TEI; frames to it go out as broadcast UI frames
pub const TEI_BROADCAST: u8 = 127;

/// Data link connection, identified by interface and TEI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DlcId {
    pub intf: IntfId,
    pub tei: u8,
}

impl DlcId {
    pub fn new(intf: IntfId, tei: u8) -> Self {
        DlcId { intf, tei }
    }

    pub fn broadcast(intf: IntfId) -> Self {
        DlcId { intf, tei: TEI_BROADCAST }
    }

    pub fn is_broadcast(&self) -> bool {
        self.tei == TEI_BROADCAST
    }
}

impl fmt::Display for DlcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.intf, self.tei)
    }
}

/// Outcome of a data link establishment request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStatus {
    Connected,
    /// Establishment in progress; `Q931Lib::dlc_established` follows
    Pending,
}

/// LAPD service the host provides to the stack
pub trait Q931Transport {
    /// Send one frame on an established link, or as a broadcast UI frame when `dlc` is the broadcast TEI
    fn send_frame(&mut self, dlc: DlcId, frame: &[u8]) -> Result<(), TransportErr>;

    /// Request establishment of a link
    fn connect(&mut self, dlc: DlcId) -> Result<ConnectStatus, TransportErr>;

    /// Release a link
    fn disconnect(&mut self, dlc: DlcId) -> Result<(), TransportErr>;
}
