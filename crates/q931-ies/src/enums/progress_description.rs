/// Q.931 4.5.23 Progress description
/// Bits: 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProgressDescription {
    NotEndToEndIsdn = 1,
    DestinationNotIsdn = 2,
    OriginationNotIsdn = 3,
    ReturnedToIsdn = 4,
    InterworkingOccurred = 5,
    InbandInformationAvailable = 8,
}

impl std::convert::TryFrom<u64> for ProgressDescription {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            1 => Ok(ProgressDescription::NotEndToEndIsdn),
            2 => Ok(ProgressDescription::DestinationNotIsdn),
            3 => Ok(ProgressDescription::OriginationNotIsdn),
            4 => Ok(ProgressDescription::ReturnedToIsdn),
            5 => Ok(ProgressDescription::InterworkingOccurred),
            8 => Ok(ProgressDescription::InbandInformationAvailable),
            _ => Err(()),
        }
    }
}

impl ProgressDescription {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            ProgressDescription::NotEndToEndIsdn => 1,
            ProgressDescription::DestinationNotIsdn => 2,
            ProgressDescription::OriginationNotIsdn => 3,
            ProgressDescription::ReturnedToIsdn => 4,
            ProgressDescription::InterworkingOccurred => 5,
            ProgressDescription::InbandInformationAvailable => 8,
        }
    }
}

impl From<ProgressDescription> for u64 {
    fn from(e: ProgressDescription) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for ProgressDescription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProgressDescription::NotEndToEndIsdn => write!(f, "NotEndToEndIsdn"),
            ProgressDescription::DestinationNotIsdn => write!(f, "DestinationNotIsdn"),
            ProgressDescription::OriginationNotIsdn => write!(f, "OriginationNotIsdn"),
            ProgressDescription::ReturnedToIsdn => write!(f, "ReturnedToIsdn"),
            ProgressDescription::InterworkingOccurred => write!(f, "InterworkingOccurred"),
            ProgressDescription::InbandInformationAvailable => write!(f, "InbandInformationAvailable"),
        }
    }
}
