/// Q.931 4.5.5 Information transfer capability
/// Bits: 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InformationTransferCapability {
    Speech = 0,
    UnrestrictedDigital = 8,
    RestrictedDigital = 9,
    Audio3k1Hz = 16,
    UnrestrictedDigitalWithTones = 17,
    Video = 24,
}

impl std::convert::TryFrom<u64> for InformationTransferCapability {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(InformationTransferCapability::Speech),
            8 => Ok(InformationTransferCapability::UnrestrictedDigital),
            9 => Ok(InformationTransferCapability::RestrictedDigital),
            16 => Ok(InformationTransferCapability::Audio3k1Hz),
            17 => Ok(InformationTransferCapability::UnrestrictedDigitalWithTones),
            24 => Ok(InformationTransferCapability::Video),
            _ => Err(()),
        }
    }
}

impl InformationTransferCapability {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            InformationTransferCapability::Speech => 0,
            InformationTransferCapability::UnrestrictedDigital => 8,
            InformationTransferCapability::RestrictedDigital => 9,
            InformationTransferCapability::Audio3k1Hz => 16,
            InformationTransferCapability::UnrestrictedDigitalWithTones => 17,
            InformationTransferCapability::Video => 24,
        }
    }
}

impl From<InformationTransferCapability> for u64 {
    fn from(e: InformationTransferCapability) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for InformationTransferCapability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InformationTransferCapability::Speech => write!(f, "Speech"),
            InformationTransferCapability::UnrestrictedDigital => write!(f, "UnrestrictedDigital"),
            InformationTransferCapability::RestrictedDigital => write!(f, "RestrictedDigital"),
            InformationTransferCapability::Audio3k1Hz => write!(f, "Audio3k1Hz"),
            InformationTransferCapability::UnrestrictedDigitalWithTones => write!(f, "UnrestrictedDigitalWithTones"),
            InformationTransferCapability::Video => write!(f, "Video"),
        }
    }
}
