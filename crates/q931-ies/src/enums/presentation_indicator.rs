/// Q.931 4.5.10 Presentation indicator
/// Bits: 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PresentationIndicator {
    Allowed = 0,
    Restricted = 1,
    NotAvailable = 2,
}

impl std::convert::TryFrom<u64> for PresentationIndicator {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(PresentationIndicator::Allowed),
            1 => Ok(PresentationIndicator::Restricted),
            2 => Ok(PresentationIndicator::NotAvailable),
            _ => Err(()),
        }
    }
}

impl PresentationIndicator {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            PresentationIndicator::Allowed => 0,
            PresentationIndicator::Restricted => 1,
            PresentationIndicator::NotAvailable => 2,
        }
    }
}

impl From<PresentationIndicator> for u64 {
    fn from(e: PresentationIndicator) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for PresentationIndicator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PresentationIndicator::Allowed => write!(f, "Allowed"),
            PresentationIndicator::Restricted => write!(f, "Restricted"),
            PresentationIndicator::NotAvailable => write!(f, "NotAvailable"),
        }
    }
}
