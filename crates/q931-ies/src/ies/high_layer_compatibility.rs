use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::coding_standard::CodingStandard;

pub const HLC_TELEPHONY: u8 = 0x01;
pub const HLC_FACSIMILE_G3: u8 = 0x04;

/// Q.931 4.5.17 High layer compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighLayerCompatibility {
    pub coding_standard: CodingStandard,
    /// 3 bits, 4 = first high layer characteristics identification to be used
    pub interpretation: u8,
    /// 2 bits, 1 = high layer protocol profile
    pub presentation: u8,
    /// 7 bits
    pub characteristics: u8,
    /// Octet 4a, 7 bits
    pub extended_characteristics: Option<u8>,
}

impl HighLayerCompatibility {
    pub fn new(characteristics: u8) -> Self {
        HighLayerCompatibility {
            coding_standard: CodingStandard::Ccitt,
            interpretation: 4,
            presentation: 1,
            characteristics,
            extended_characteristics: None,
        }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        // Octet 3
        let ext_3 = buffer.read_field(1, "ext_3")?;
        expect_ext!(ext_3, 1, "octet 3")?;
        let val = buffer.read_field(2, "coding_standard")?;
        let coding_standard = CodingStandard::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "coding_standard", value: val })?;
        let interpretation = buffer.read_field(3, "interpretation")? as u8;
        let presentation = buffer.read_field(2, "presentation")? as u8;

        // Octet 4
        let ext_4 = buffer.read_field(1, "ext_4")?;
        let characteristics = buffer.read_field(7, "characteristics")? as u8;

        // Octet 4a
        let extended_characteristics = if ext_4 == 0 {
            let ext_4a = buffer.read_field(1, "ext_4a")?;
            expect_ext!(ext_4a, 1, "octet 4a")?;
            Some(buffer.read_field(7, "extended_characteristics")? as u8)
        } else {
            None
        };

        Ok(HighLayerCompatibility {
            coding_standard,
            interpretation,
            presentation,
            characteristics,
            extended_characteristics,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(1, 1);
        buffer.write_bits(self.coding_standard.into_raw(), 2);
        buffer.write_bits(self.interpretation as u64 & 0x07, 3);
        buffer.write_bits(self.presentation as u64 & 0x03, 2);

        buffer.write_bits(self.extended_characteristics.is_none() as u64, 1);
        buffer.write_bits(self.characteristics as u64 & 0x7F, 7);
        if let Some(x) = self.extended_characteristics {
            buffer.write_bits(1, 1);
            buffer.write_bits(x as u64 & 0x7F, 7);
        }
        Ok(())
    }
}

impl fmt::Display for HighLayerCompatibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "HighLayerCompatibility {{ coding_standard: {} characteristics: 0x{:02x} extended: {:?} }}",
            self.coding_standard, self.characteristics, self.extended_characteristics
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hlc_telephony() {
        let hlc = HighLayerCompatibility::new(HLC_TELEPHONY);
        let mut buf = BitBuffer::new_autoexpand(16);
        hlc.to_bitbuf(&mut buf).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(bytes, vec![0x91, 0x81]);
        let mut rd = BitBuffer::from_bytes(&bytes);
        assert_eq!(HighLayerCompatibility::from_bitbuf(&mut rd).unwrap(), hlc);
    }
}
