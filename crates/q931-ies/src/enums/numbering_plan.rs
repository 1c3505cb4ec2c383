/// Q.931 4.5.8 Numbering plan identification
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NumberingPlan {
    Unknown = 0,
    Isdn = 1,
    Data = 3,
    Telex = 4,
    National = 8,
    Private = 9,
}

impl std::convert::TryFrom<u64> for NumberingPlan {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(NumberingPlan::Unknown),
            1 => Ok(NumberingPlan::Isdn),
            3 => Ok(NumberingPlan::Data),
            4 => Ok(NumberingPlan::Telex),
            8 => Ok(NumberingPlan::National),
            9 => Ok(NumberingPlan::Private),
            _ => Err(()),
        }
    }
}

impl NumberingPlan {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            NumberingPlan::Unknown => 0,
            NumberingPlan::Isdn => 1,
            NumberingPlan::Data => 3,
            NumberingPlan::Telex => 4,
            NumberingPlan::National => 8,
            NumberingPlan::Private => 9,
        }
    }
}

impl From<NumberingPlan> for u64 {
    fn from(e: NumberingPlan) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for NumberingPlan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NumberingPlan::Unknown => write!(f, "Unknown"),
            NumberingPlan::Isdn => write!(f, "Isdn"),
            NumberingPlan::Data => write!(f, "Data"),
            NumberingPlan::Telex => write!(f, "Telex"),
            NumberingPlan::National => write!(f, "National"),
            NumberingPlan::Private => write!(f, "Private"),
        }
    }
}
