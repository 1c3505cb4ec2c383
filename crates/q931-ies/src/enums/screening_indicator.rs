/// Q.931 4.5.10 Screening indicator
/// Bits: 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScreeningIndicator {
    UserProvidedNotScreened = 0,
    UserProvidedVerifiedPassed = 1,
    UserProvidedVerifiedFailed = 2,
    NetworkProvided = 3,
}

impl std::convert::TryFrom<u64> for ScreeningIndicator {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(ScreeningIndicator::UserProvidedNotScreened),
            1 => Ok(ScreeningIndicator::UserProvidedVerifiedPassed),
            2 => Ok(ScreeningIndicator::UserProvidedVerifiedFailed),
            3 => Ok(ScreeningIndicator::NetworkProvided),
            _ => Err(()),
        }
    }
}

impl ScreeningIndicator {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            ScreeningIndicator::UserProvidedNotScreened => 0,
            ScreeningIndicator::UserProvidedVerifiedPassed => 1,
            ScreeningIndicator::UserProvidedVerifiedFailed => 2,
            ScreeningIndicator::NetworkProvided => 3,
        }
    }
}

impl From<ScreeningIndicator> for u64 {
    fn from(e: ScreeningIndicator) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for ScreeningIndicator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScreeningIndicator::UserProvidedNotScreened => write!(f, "UserProvidedNotScreened"),
            ScreeningIndicator::UserProvidedVerifiedPassed => write!(f, "UserProvidedVerifiedPassed"),
            ScreeningIndicator::UserProvidedVerifiedFailed => write!(f, "UserProvidedVerifiedFailed"),
            ScreeningIndicator::NetworkProvided => write!(f, "NetworkProvided"),
        }
    }
}
