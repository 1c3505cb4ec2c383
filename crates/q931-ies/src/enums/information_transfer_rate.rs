/// Q.931 4.5.5 Information transfer rate
/// Bits: 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InformationTransferRate {
    PacketMode = 0,
    Rate64k = 16,
    Rate2x64k = 17,
    Rate384k = 19,
    Rate1536k = 21,
    Rate1920k = 23,
    Multirate = 24,
}

impl std::convert::TryFrom<u64> for InformationTransferRate {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(InformationTransferRate::PacketMode),
            16 => Ok(InformationTransferRate::Rate64k),
            17 => Ok(InformationTransferRate::Rate2x64k),
            19 => Ok(InformationTransferRate::Rate384k),
            21 => Ok(InformationTransferRate::Rate1536k),
            23 => Ok(InformationTransferRate::Rate1920k),
            24 => Ok(InformationTransferRate::Multirate),
            _ => Err(()),
        }
    }
}

impl InformationTransferRate {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            InformationTransferRate::PacketMode => 0,
            InformationTransferRate::Rate64k => 16,
            InformationTransferRate::Rate2x64k => 17,
            InformationTransferRate::Rate384k => 19,
            InformationTransferRate::Rate1536k => 21,
            InformationTransferRate::Rate1920k => 23,
            InformationTransferRate::Multirate => 24,
        }
    }
}

impl From<InformationTransferRate> for u64 {
    fn from(e: InformationTransferRate) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for InformationTransferRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InformationTransferRate::PacketMode => write!(f, "PacketMode"),
            InformationTransferRate::Rate64k => write!(f, "Rate64k"),
            InformationTransferRate::Rate2x64k => write!(f, "Rate2x64k"),
            InformationTransferRate::Rate384k => write!(f, "Rate384k"),
            InformationTransferRate::Rate1536k => write!(f, "Rate1536k"),
            InformationTransferRate::Rate1920k => write!(f, "Rate1920k"),
            InformationTransferRate::Multirate => write!(f, "Multirate"),
        }
    }
}
