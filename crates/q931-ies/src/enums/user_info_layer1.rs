/// Q.931 4.5.5 User information layer 1 protocol
/// Bits: 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UserInfoLayer1 {
    V110 = 1,
    G711Mulaw = 2,
    G711Alaw = 3,
    G721 = 4,
    H221 = 5,
    H223 = 6,
    NonItuRateAdaption = 7,
    V120 = 8,
    X31Hdlc = 9,
}

impl std::convert::TryFrom<u64> for UserInfoLayer1 {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            1 => Ok(UserInfoLayer1::V110),
            2 => Ok(UserInfoLayer1::G711Mulaw),
            3 => Ok(UserInfoLayer1::G711Alaw),
            4 => Ok(UserInfoLayer1::G721),
            5 => Ok(UserInfoLayer1::H221),
            6 => Ok(UserInfoLayer1::H223),
            7 => Ok(UserInfoLayer1::NonItuRateAdaption),
            8 => Ok(UserInfoLayer1::V120),
            9 => Ok(UserInfoLayer1::X31Hdlc),
            _ => Err(()),
        }
    }
}

impl UserInfoLayer1 {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            UserInfoLayer1::V110 => 1,
            UserInfoLayer1::G711Mulaw => 2,
            UserInfoLayer1::G711Alaw => 3,
            UserInfoLayer1::G721 => 4,
            UserInfoLayer1::H221 => 5,
            UserInfoLayer1::H223 => 6,
            UserInfoLayer1::NonItuRateAdaption => 7,
            UserInfoLayer1::V120 => 8,
            UserInfoLayer1::X31Hdlc => 9,
        }
    }
}

impl From<UserInfoLayer1> for u64 {
    fn from(e: UserInfoLayer1) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for UserInfoLayer1 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserInfoLayer1::V110 => write!(f, "V110"),
            UserInfoLayer1::G711Mulaw => write!(f, "G711Mulaw"),
            UserInfoLayer1::G711Alaw => write!(f, "G711Alaw"),
            UserInfoLayer1::G721 => write!(f, "G721"),
            UserInfoLayer1::H221 => write!(f, "H221"),
            UserInfoLayer1::H223 => write!(f, "H223"),
            UserInfoLayer1::NonItuRateAdaption => write!(f, "NonItuRateAdaption"),
            UserInfoLayer1::V120 => write!(f, "V120"),
            UserInfoLayer1::X31Hdlc => write!(f, "X31Hdlc"),
        }
    }
}
