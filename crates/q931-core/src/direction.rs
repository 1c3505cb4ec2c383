use core::fmt;

/// Direction of a call, seen from the local side of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Call was set up by the remote side
    Inbound,
    /// Call was set up locally
    Outbound,
}

impl Direction {
    #[inline]
    pub fn is_outbound(&self) -> bool {
        matches!(self, Direction::Outbound)
    }

    #[inline]
    pub fn is_inbound(&self) -> bool {
        matches!(self, Direction::Inbound)
    }

    /// Value of the call reference flag on messages this side transmits for a call
    /// in this direction. The originating side always sends flag 0.
    #[inline]
    pub fn tx_callref_flag(&self) -> bool {
        matches!(self, Direction::Inbound)
    }

    /// Direction of a call as deduced from the call reference flag of a received message.
    #[inline]
    pub fn from_rx_callref_flag(flag: bool) -> Self {
        if flag { Direction::Outbound } else { Direction::Inbound }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "in"),
            Direction::Outbound => write!(f, "out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callref_flag_mapping() {
        assert!(!Direction::Outbound.tx_callref_flag());
        assert!(Direction::Inbound.tx_callref_flag());
        // A message we receive with flag 1 was sent by the side that did not originate, so it belongs to our outbound call
        assert_eq!(Direction::from_rx_callref_flag(true), Direction::Outbound);
        assert_eq!(Direction::from_rx_callref_flag(false), Direction::Inbound);
    }
}
