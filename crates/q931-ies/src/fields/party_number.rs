use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::{
    numbering_plan::NumberingPlan, presentation_indicator::PresentationIndicator, screening_indicator::ScreeningIndicator,
    type_of_number::TypeOfNumber,
};
use crate::fields::ia5;

/// Which of the optional octets 3a and 3b a party number element may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberLayout {
    /// Called party number: octet 3 only
    Plain,
    /// Calling and connected number: octet 3a with presentation and screening
    WithPresentation,
    /// Redirecting number: octets 3a and 3b (reason for redirection)
    WithRedirection,
}

/// Octet 3a of the calling, connected and redirecting number elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub indicator: PresentationIndicator,
    pub screening: ScreeningIndicator,
}

/// Common body of the party number elements (Q.931 4.5.8 and 4.5.10, connected number from Q.951, redirecting number from Q.952)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyNumber {
    pub type_of_number: TypeOfNumber,
    pub numbering_plan: NumberingPlan,
    /// Octet 3a
    pub presentation: Option<Presentation>,
    /// Octet 3b, 4 bits
    pub redirection_reason: Option<u8>,
    pub digits: String,
}

impl PartyNumber {
    pub fn new(type_of_number: TypeOfNumber, numbering_plan: NumberingPlan, digits: &str) -> Self {
        PartyNumber {
            type_of_number,
            numbering_plan,
            presentation: None,
            redirection_reason: None,
            digits: digits.to_string(),
        }
    }

    /// Subscriber-independent default used by the demo switch and tests
    pub fn unknown(digits: &str) -> Self {
        Self::new(TypeOfNumber::Unknown, NumberingPlan::Isdn, digits)
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer, layout: NumberLayout) -> Result<Self, IeParseErr> {
        // Octet 3
        let ext_3 = buffer.read_field(1, "ext_3")?;
        let val = buffer.read_field(3, "type_of_number")?;
        let type_of_number = TypeOfNumber::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "type_of_number", value: val })?;
        let val = buffer.read_field(4, "numbering_plan")?;
        let numbering_plan = NumberingPlan::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "numbering_plan", value: val })?;

        let mut presentation = None;
        let mut redirection_reason = None;
        if ext_3 == 0 {
            if layout == NumberLayout::Plain {
                return Err(IeParseErr::InvalidExtBit { field: "octet 3" });
            }

            // Octet 3a
            let ext_3a = buffer.read_field(1, "ext_3a")?;
            let val = buffer.read_field(2, "presentation_indicator")?;
            let indicator = PresentationIndicator::try_from(val)
                .map_err(|_| IeParseErr::InvalidValue { field: "presentation_indicator", value: val })?;
            buffer.read_field(3, "spare")?;
            let val = buffer.read_field(2, "screening_indicator")?;
            let screening = ScreeningIndicator::try_from(val)
                .map_err(|_| IeParseErr::InvalidValue { field: "screening_indicator", value: val })?;
            presentation = Some(Presentation { indicator, screening });

            if ext_3a == 0 {
                if layout != NumberLayout::WithRedirection {
                    return Err(IeParseErr::InvalidExtBit { field: "octet 3a" });
                }
                // Octet 3b
                let ext_3b = buffer.read_field(1, "ext_3b")?;
                expect_ext!(ext_3b, 1, "octet 3b")?;
                buffer.read_field(3, "spare")?;
                redirection_reason = Some(buffer.read_field(4, "redirection_reason")? as u8);
            }
        }

        let digits = ia5::read_ia5(buffer, "digits")?;

        Ok(PartyNumber {
            type_of_number,
            numbering_plan,
            presentation,
            redirection_reason,
            digits,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer, layout: NumberLayout) -> Result<(), IeParseErr> {
        if layout == NumberLayout::Plain && self.presentation.is_some() {
            return Err(IeParseErr::Inconsistency { field: "presentation", reason: "not carried by this element" });
        }
        if self.redirection_reason.is_some() {
            if layout != NumberLayout::WithRedirection {
                return Err(IeParseErr::Inconsistency { field: "redirection_reason", reason: "not carried by this element" });
            }
            if self.presentation.is_none() {
                return Err(IeParseErr::Inconsistency { field: "redirection_reason", reason: "octet 3b requires octet 3a" });
            }
        }

        // Octet 3
        buffer.write_bits(self.presentation.is_none() as u64, 1);
        buffer.write_bits(self.type_of_number.into_raw(), 3);
        buffer.write_bits(self.numbering_plan.into_raw(), 4);

        // Octet 3a
        if let Some(p) = &self.presentation {
            buffer.write_bits(self.redirection_reason.is_none() as u64, 1);
            buffer.write_bits(p.indicator.into_raw(), 2);
            buffer.write_bits(0, 3);
            buffer.write_bits(p.screening.into_raw(), 2);
        }

        // Octet 3b
        if let Some(reason) = self.redirection_reason {
            buffer.write_bits(1, 1);
            buffer.write_bits(0, 3);
            buffer.write_bits(reason as u64 & 0x0F, 4);
        }

        ia5::write_ia5(buffer, &self.digits, "digits")
    }
}

impl fmt::Display for PartyNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.type_of_number, self.numbering_plan, self.digits)?;
        if let Some(p) = &self.presentation {
            write!(f, " {} {}", p.indicator, p.screening)?;
        }
        if let Some(r) = self.redirection_reason {
            write!(f, " reason {}", r)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_core::debug;

    fn encode(n: &PartyNumber, layout: NumberLayout) -> Vec<u8> {
        let mut buf = BitBuffer::new_autoexpand(32);
        n.to_bitbuf(&mut buf, layout).unwrap();
        buf.into_bytes()
    }

    #[test]
    fn test_called_number() {
        debug::setup_logging_verbose();
        // National, ISDN plan, "5551234"
        let bytes = hex::decode("a135353531323334").unwrap();
        let mut buf = BitBuffer::from_bytes(&bytes);
        let n = PartyNumber::from_bitbuf(&mut buf, NumberLayout::Plain).unwrap();
        tracing::info!("{}", n);
        assert_eq!(n.type_of_number, TypeOfNumber::National);
        assert_eq!(n.numbering_plan, NumberingPlan::Isdn);
        assert_eq!(n.digits, "5551234");
        assert_eq!(encode(&n, NumberLayout::Plain), bytes);
    }

    #[test]
    fn test_calling_number_with_presentation() {
        debug::setup_logging_verbose();
        // Octet 3 ext=0, 3a: restricted, network provided
        let bytes = hex::decode("21a33132").unwrap();
        let mut buf = BitBuffer::from_bytes(&bytes);
        let n = PartyNumber::from_bitbuf(&mut buf, NumberLayout::WithPresentation).unwrap();
        let p = n.presentation.unwrap();
        assert_eq!(p.indicator, PresentationIndicator::Restricted);
        assert_eq!(p.screening, ScreeningIndicator::NetworkProvided);
        assert_eq!(n.digits, "12");
        assert_eq!(encode(&n, NumberLayout::WithPresentation), bytes);

        // Called number cannot carry octet 3a
        let mut buf = BitBuffer::from_bytes(&bytes);
        assert_eq!(
            PartyNumber::from_bitbuf(&mut buf, NumberLayout::Plain),
            Err(IeParseErr::InvalidExtBit { field: "octet 3" })
        );
    }

    #[test]
    fn test_redirecting_number() {
        debug::setup_logging_verbose();
        let mut n = PartyNumber::unknown("99");
        n.presentation = Some(Presentation {
            indicator: PresentationIndicator::Allowed,
            screening: ScreeningIndicator::UserProvidedNotScreened,
        });
        n.redirection_reason = Some(0x0F);
        let bytes = encode(&n, NumberLayout::WithRedirection);
        assert_eq!(bytes, hex::decode("01008f3939").unwrap());
        let mut buf = BitBuffer::from_bytes(&bytes);
        assert_eq!(PartyNumber::from_bitbuf(&mut buf, NumberLayout::WithRedirection).unwrap(), n);

        let mut out = BitBuffer::new_autoexpand(8);
        assert!(n.to_bitbuf(&mut out, NumberLayout::WithPresentation).is_err());
    }
}
