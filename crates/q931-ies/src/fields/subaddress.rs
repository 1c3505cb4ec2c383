use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::subaddress_type::SubaddressType;

/// Q.931 limits subaddress information to 20 octets
pub const SUBADDRESS_MAX_LEN: usize = 20;

/// Common body of the calling, called and connected subaddress elements (4.5.9, 4.5.11)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subaddress {
    pub subaddress_type: SubaddressType,
    /// Odd number of address signals, only meaningful for BCD-coded user specified subaddresses
    pub odd: bool,
    pub information: Vec<u8>,
}

impl Subaddress {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let ext = buffer.read_field(1, "ext")?;
        expect_ext!(ext, 1, "octet 3")?;
        let val = buffer.read_field(3, "subaddress_type")?;
        let subaddress_type = SubaddressType::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "subaddress_type", value: val })?;
        let odd = buffer.read_field(1, "odd_even")? == 1;
        buffer.read_field(3, "spare")?;

        let information = buffer.read_remaining_bytes();
        if information.len() > SUBADDRESS_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: SUBADDRESS_MAX_LEN, found: information.len() });
        }

        Ok(Subaddress { subaddress_type, odd, information })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.information.len() > SUBADDRESS_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: SUBADDRESS_MAX_LEN, found: self.information.len() });
        }
        buffer.write_bits(1, 1);
        buffer.write_bits(self.subaddress_type.into_raw(), 3);
        buffer.write_bits(self.odd as u64, 1);
        buffer.write_bits(0, 3);
        buffer.write_bytes(&self.information);
        Ok(())
    }
}

impl fmt::Display for Subaddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{} {:02x?}", self.subaddress_type, if self.odd { " odd" } else { "" }, self.information)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subaddress() {
        let bytes = hex::decode("a812345678").unwrap();
        let mut buf = BitBuffer::from_bytes(&bytes);
        let s = Subaddress::from_bitbuf(&mut buf).unwrap();
        assert_eq!(s.subaddress_type, SubaddressType::UserSpecified);
        assert!(s.odd);
        assert_eq!(s.information, vec![0x12, 0x34, 0x56, 0x78]);

        let mut out = BitBuffer::new_autoexpand(40);
        s.to_bitbuf(&mut out).unwrap();
        assert_eq!(out.into_bytes(), bytes);
    }

    #[test]
    fn test_subaddress_too_long() {
        let mut bytes = vec![0x80];
        bytes.extend_from_slice(&[0x50; 21]);
        let mut buf = BitBuffer::from_bytes(&bytes);
        assert!(matches!(Subaddress::from_bitbuf(&mut buf), Err(IeParseErr::InconsistentLength { .. })));
    }
}
