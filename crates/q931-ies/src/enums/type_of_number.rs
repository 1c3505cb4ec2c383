/// Q.931 4.5.8 Type of number
/// Bits: 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeOfNumber {
    Unknown = 0,
    International = 1,
    National = 2,
    NetworkSpecific = 3,
    Subscriber = 4,
    Abbreviated = 6,
}

impl std::convert::TryFrom<u64> for TypeOfNumber {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(TypeOfNumber::Unknown),
            1 => Ok(TypeOfNumber::International),
            2 => Ok(TypeOfNumber::National),
            3 => Ok(TypeOfNumber::NetworkSpecific),
            4 => Ok(TypeOfNumber::Subscriber),
            6 => Ok(TypeOfNumber::Abbreviated),
            _ => Err(()),
        }
    }
}

impl TypeOfNumber {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            TypeOfNumber::Unknown => 0,
            TypeOfNumber::International => 1,
            TypeOfNumber::National => 2,
            TypeOfNumber::NetworkSpecific => 3,
            TypeOfNumber::Subscriber => 4,
            TypeOfNumber::Abbreviated => 6,
        }
    }
}

impl From<TypeOfNumber> for u64 {
    fn from(e: TypeOfNumber) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for TypeOfNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TypeOfNumber::Unknown => write!(f, "Unknown"),
            TypeOfNumber::International => write!(f, "International"),
            TypeOfNumber::National => write!(f, "National"),
            TypeOfNumber::NetworkSpecific => write!(f, "NetworkSpecific"),
            TypeOfNumber::Subscriber => write!(f, "Subscriber"),
            TypeOfNumber::Abbreviated => write!(f, "Abbreviated"),
        }
    }
}
