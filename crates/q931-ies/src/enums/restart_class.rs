/// Q.931 4.5.25 Restart indicator class
/// Bits: 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RestartClass {
    IndicatedChannels = 0,
    SingleInterface = 6,
    AllInterfaces = 7,
}

impl std::convert::TryFrom<u64> for RestartClass {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(RestartClass::IndicatedChannels),
            6 => Ok(RestartClass::SingleInterface),
            7 => Ok(RestartClass::AllInterfaces),
            _ => Err(()),
        }
    }
}

impl RestartClass {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            RestartClass::IndicatedChannels => 0,
            RestartClass::SingleInterface => 6,
            RestartClass::AllInterfaces => 7,
        }
    }
}

impl From<RestartClass> for u64 {
    fn from(e: RestartClass) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for RestartClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RestartClass::IndicatedChannels => write!(f, "IndicatedChannels"),
            RestartClass::SingleInterface => write!(f, "SingleInterface"),
            RestartClass::AllInterfaces => write!(f, "AllInterfaces"),
        }
    }
}
