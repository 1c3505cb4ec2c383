use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::{cause_value::CauseValue, coding_standard::CodingStandard, location::Location};

/// Q.931 4.5.12 Cause
/// The cause value is kept as a raw 7-bit value, so that causes this stack does not know
/// can still be relayed and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    pub coding_standard: CodingStandard,
    pub location: Location,
    /// Octet 3a
    pub recommendation: Option<u8>,
    pub value: u8,
    pub diagnostics: Vec<u8>,
}

impl Cause {
    pub fn new(location: Location, value: CauseValue) -> Self {
        Cause {
            coding_standard: CodingStandard::Ccitt,
            location,
            recommendation: None,
            value: value.into_raw() as u8,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: &[u8]) -> Self {
        self.diagnostics = diagnostics.to_vec();
        self
    }

    pub fn cause_value(&self) -> Option<CauseValue> {
        CauseValue::try_from(self.value as u64).ok()
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        // Octet 3
        let ext_3 = buffer.read_field(1, "ext_3")?;
        let val = buffer.read_field(2, "coding_standard")?;
        let coding_standard = CodingStandard::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "coding_standard", value: val })?;
        buffer.read_field(1, "spare")?;
        let val = buffer.read_field(4, "location")?;
        let location = Location::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "location", value: val })?;

        // Octet 3a
        let recommendation = if ext_3 == 0 {
            let ext_3a = buffer.read_field(1, "ext_3a")?;
            expect_ext!(ext_3a, 1, "octet 3a")?;
            Some(buffer.read_field(7, "recommendation")? as u8)
        } else {
            None
        };

        // Octet 4
        let ext_4 = buffer.read_field(1, "ext_4")?;
        expect_ext!(ext_4, 1, "octet 4")?;
        let value = buffer.read_field(7, "cause_value")? as u8;

        let diagnostics = buffer.read_remaining_bytes();

        Ok(Cause {
            coding_standard,
            location,
            recommendation,
            value,
            diagnostics,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.value > 0x7F {
            return Err(IeParseErr::InvalidValue { field: "cause_value", value: self.value as u64 });
        }
        buffer.write_bits(self.recommendation.is_none() as u64, 1);
        buffer.write_bits(self.coding_standard.into_raw(), 2);
        buffer.write_bits(0, 1);
        buffer.write_bits(self.location.into_raw(), 4);

        if let Some(r) = self.recommendation {
            buffer.write_bits(1, 1);
            buffer.write_bits(r as u64 & 0x7F, 7);
        }

        buffer.write_bits(1, 1);
        buffer.write_bits(self.value as u64, 7);
        buffer.write_bytes(&self.diagnostics);
        Ok(())
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cause {{ location: {} value: {}", self.location, self.value)?;
        if let Some(v) = self.cause_value() {
            write!(f, " ({})", v)?;
        }
        if !self.diagnostics.is_empty() {
            write!(f, " diagnostics: {:02x?}", self.diagnostics)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_core::debug;

    #[test]
    fn test_parse_normal_clearing() {
        debug::setup_logging_verbose();
        let bytes = hex::decode("8190").unwrap();
        let mut buf = BitBuffer::from_bytes(&bytes);
        let cause = Cause::from_bitbuf(&mut buf).unwrap();
        tracing::info!("Parsed: {}", cause);
        assert_eq!(cause.location, Location::PrivateNetworkLocalUser);
        assert_eq!(cause.cause_value(), Some(CauseValue::NormalCallClearing));
        assert!(cause.diagnostics.is_empty());
    }

    #[test]
    fn test_recommendation_and_diagnostics() {
        debug::setup_logging_verbose();
        // Missing mandatory IE, diagnostics name the bearer capability identifier
        let cause = Cause {
            recommendation: Some(0),
            ..Cause::new(Location::User, CauseValue::MandatoryInformationElementMissing)
        }
        .with_diagnostics(&[0x04]);
        let mut buf = BitBuffer::new_autoexpand(32);
        cause.to_bitbuf(&mut buf).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(bytes, hex::decode("0080e004").unwrap());
        let mut rd = BitBuffer::from_bytes(&bytes);
        assert_eq!(Cause::from_bitbuf(&mut rd).unwrap(), cause);
    }

    #[test]
    fn test_unknown_value_kept() {
        debug::setup_logging_verbose();
        let mut buf = BitBuffer::from_bytes(&[0x80, 0xFE]);
        let cause = Cause::from_bitbuf(&mut buf).unwrap();
        assert_eq!(cause.value, 0x7E);
        assert_eq!(cause.cause_value(), None);
    }

    #[test]
    fn test_bad_ext_bit() {
        debug::setup_logging_verbose();
        let mut buf = BitBuffer::from_bytes(&[0x80, 0x10]);
        assert_eq!(Cause::from_bitbuf(&mut buf), Err(IeParseErr::InvalidExtBit { field: "octet 4" }));
    }
}
