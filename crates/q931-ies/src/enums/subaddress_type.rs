/// Q.931 4.5.11 Type of subaddress
/// Bits: 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SubaddressType {
    Nsap = 0,
    UserSpecified = 2,
}

impl std::convert::TryFrom<u64> for SubaddressType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(SubaddressType::Nsap),
            2 => Ok(SubaddressType::UserSpecified),
            _ => Err(()),
        }
    }
}

impl SubaddressType {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            SubaddressType::Nsap => 0,
            SubaddressType::UserSpecified => 2,
        }
    }
}

impl From<SubaddressType> for u64 {
    fn from(e: SubaddressType) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for SubaddressType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SubaddressType::Nsap => write!(f, "Nsap"),
            SubaddressType::UserSpecified => write!(f, "UserSpecified"),
        }
    }
}
