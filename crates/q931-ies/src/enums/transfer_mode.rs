/// Q.931 4.5.5 Transfer mode
/// Bits: 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransferMode {
    Circuit = 0,
    Packet = 2,
}

impl std::convert::TryFrom<u64> for TransferMode {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(TransferMode::Circuit),
            2 => Ok(TransferMode::Packet),
            _ => Err(()),
        }
    }
}

impl TransferMode {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            TransferMode::Circuit => 0,
            TransferMode::Packet => 2,
        }
    }
}

impl From<TransferMode> for u64 {
    fn from(e: TransferMode) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransferMode::Circuit => write!(f, "Circuit"),
            TransferMode::Packet => write!(f, "Packet"),
        }
    }
}
