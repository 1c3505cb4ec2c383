/// Q.931 Coding standard
/// Bits: 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CodingStandard {
    Ccitt = 0,
    Iso = 1,
    National = 2,
    Network = 3,
}

impl std::convert::TryFrom<u64> for CodingStandard {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(CodingStandard::Ccitt),
            1 => Ok(CodingStandard::Iso),
            2 => Ok(CodingStandard::National),
            3 => Ok(CodingStandard::Network),
            _ => Err(()),
        }
    }
}

impl CodingStandard {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            CodingStandard::Ccitt => 0,
            CodingStandard::Iso => 1,
            CodingStandard::National => 2,
            CodingStandard::Network => 3,
        }
    }
}

impl From<CodingStandard> for u64 {
    fn from(e: CodingStandard) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for CodingStandard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodingStandard::Ccitt => write!(f, "Ccitt"),
            CodingStandard::Iso => write!(f, "Iso"),
            CodingStandard::National => write!(f, "National"),
            CodingStandard::Network => write!(f, "Network"),
        }
    }
}
