/// Q.931 4.5.5 User information layer 2 protocol
/// Bits: 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UserInfoLayer2 {
    Q921 = 2,
    X25Link = 6,
    X25Multilink = 7,
    ExtendedLapb = 8,
    HdlcArm = 9,
    HdlcNrm = 10,
    HdlcAbm = 11,
    LanLlc = 12,
    X75Slp = 13,
    Q922 = 14,
    UserSpecified = 16,
    Iso7776 = 17,
}

impl std::convert::TryFrom<u64> for UserInfoLayer2 {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            2 => Ok(UserInfoLayer2::Q921),
            6 => Ok(UserInfoLayer2::X25Link),
            7 => Ok(UserInfoLayer2::X25Multilink),
            8 => Ok(UserInfoLayer2::ExtendedLapb),
            9 => Ok(UserInfoLayer2::HdlcArm),
            10 => Ok(UserInfoLayer2::HdlcNrm),
            11 => Ok(UserInfoLayer2::HdlcAbm),
            12 => Ok(UserInfoLayer2::LanLlc),
            13 => Ok(UserInfoLayer2::X75Slp),
            14 => Ok(UserInfoLayer2::Q922),
            16 => Ok(UserInfoLayer2::UserSpecified),
            17 => Ok(UserInfoLayer2::Iso7776),
            _ => Err(()),
        }
    }
}

impl UserInfoLayer2 {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            UserInfoLayer2::Q921 => 2,
            UserInfoLayer2::X25Link => 6,
            UserInfoLayer2::X25Multilink => 7,
            UserInfoLayer2::ExtendedLapb => 8,
            UserInfoLayer2::HdlcArm => 9,
            UserInfoLayer2::HdlcNrm => 10,
            UserInfoLayer2::HdlcAbm => 11,
            UserInfoLayer2::LanLlc => 12,
            UserInfoLayer2::X75Slp => 13,
            UserInfoLayer2::Q922 => 14,
            UserInfoLayer2::UserSpecified => 16,
            UserInfoLayer2::Iso7776 => 17,
        }
    }
}

impl From<UserInfoLayer2> for u64 {
    fn from(e: UserInfoLayer2) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for UserInfoLayer2 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserInfoLayer2::Q921 => write!(f, "Q921"),
            UserInfoLayer2::X25Link => write!(f, "X25Link"),
            UserInfoLayer2::X25Multilink => write!(f, "X25Multilink"),
            UserInfoLayer2::ExtendedLapb => write!(f, "ExtendedLapb"),
            UserInfoLayer2::HdlcArm => write!(f, "HdlcArm"),
            UserInfoLayer2::HdlcNrm => write!(f, "HdlcNrm"),
            UserInfoLayer2::HdlcAbm => write!(f, "HdlcAbm"),
            UserInfoLayer2::LanLlc => write!(f, "LanLlc"),
            UserInfoLayer2::X75Slp => write!(f, "X75Slp"),
            UserInfoLayer2::Q922 => write!(f, "Q922"),
            UserInfoLayer2::UserSpecified => write!(f, "UserSpecified"),
            UserInfoLayer2::Iso7776 => write!(f, "Iso7776"),
        }
    }
}
