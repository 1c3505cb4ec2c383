use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::{coding_standard::CodingStandard, location::Location, progress_description::ProgressDescription};

/// Q.931 4.5.23 Progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressIndicator {
    pub coding_standard: CodingStandard,
    pub location: Location,
    pub description: ProgressDescription,
}

impl ProgressIndicator {
    pub fn new(location: Location, description: ProgressDescription) -> Self {
        ProgressIndicator { coding_standard: CodingStandard::Ccitt, location, description }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        // Octet 3
        let ext_3 = buffer.read_field(1, "ext_3")?;
        expect_ext!(ext_3, 1, "octet 3")?;
        let val = buffer.read_field(2, "coding_standard")?;
        let coding_standard = CodingStandard::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "coding_standard", value: val })?;
        buffer.read_field(1, "spare")?;
        let val = buffer.read_field(4, "location")?;
        let location = Location::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "location", value: val })?;

        // Octet 4
        let ext_4 = buffer.read_field(1, "ext_4")?;
        expect_ext!(ext_4, 1, "octet 4")?;
        let val = buffer.read_field(7, "progress_description")?;
        let description = ProgressDescription::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "progress_description", value: val })?;

        Ok(ProgressIndicator { coding_standard, location, description })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(1, 1);
        buffer.write_bits(self.coding_standard.into_raw(), 2);
        buffer.write_bits(0, 1);
        buffer.write_bits(self.location.into_raw(), 4);
        buffer.write_bits(1, 1);
        buffer.write_bits(self.description.into_raw(), 7);
        Ok(())
    }
}

impl fmt::Display for ProgressIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ProgressIndicator {{ location: {} description: {} }}", self.location, self.description)
    }
}
