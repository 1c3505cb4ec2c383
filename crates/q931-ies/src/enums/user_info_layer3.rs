/// Q.931 4.5.5 User information layer 3 protocol
/// Bits: 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UserInfoLayer3 {
    Q931 = 2,
    X25Packet = 6,
    Iso8208 = 7,
    X223 = 8,
    Iso8473 = 9,
    T70 = 10,
    Tr9577 = 11,
    UserSpecified = 16,
}

impl std::convert::TryFrom<u64> for UserInfoLayer3 {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            2 => Ok(UserInfoLayer3::Q931),
            6 => Ok(UserInfoLayer3::X25Packet),
            7 => Ok(UserInfoLayer3::Iso8208),
            8 => Ok(UserInfoLayer3::X223),
            9 => Ok(UserInfoLayer3::Iso8473),
            10 => Ok(UserInfoLayer3::T70),
            11 => Ok(UserInfoLayer3::Tr9577),
            16 => Ok(UserInfoLayer3::UserSpecified),
            _ => Err(()),
        }
    }
}

impl UserInfoLayer3 {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            UserInfoLayer3::Q931 => 2,
            UserInfoLayer3::X25Packet => 6,
            UserInfoLayer3::Iso8208 => 7,
            UserInfoLayer3::X223 => 8,
            UserInfoLayer3::Iso8473 => 9,
            UserInfoLayer3::T70 => 10,
            UserInfoLayer3::Tr9577 => 11,
            UserInfoLayer3::UserSpecified => 16,
        }
    }
}

impl From<UserInfoLayer3> for u64 {
    fn from(e: UserInfoLayer3) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for UserInfoLayer3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserInfoLayer3::Q931 => write!(f, "Q931"),
            UserInfoLayer3::X25Packet => write!(f, "X25Packet"),
            UserInfoLayer3::Iso8208 => write!(f, "Iso8208"),
            UserInfoLayer3::X223 => write!(f, "X223"),
            UserInfoLayer3::Iso8473 => write!(f, "Iso8473"),
            UserInfoLayer3::T70 => write!(f, "T70"),
            UserInfoLayer3::Tr9577 => write!(f, "Tr9577"),
            UserInfoLayer3::UserSpecified => write!(f, "UserSpecified"),
        }
    }
}
