use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::restart_class::RestartClass;

/// Q.931 4.5.25 Restart indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartIndicator {
    pub class: RestartClass,
}

impl RestartIndicator {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let ext = buffer.read_field(1, "ext_3")?;
        expect_ext!(ext, 1, "octet 3")?;
        buffer.read_field(4, "spare")?;
        let val = buffer.read_field(3, "class")?;
        let class = RestartClass::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "class", value: val })?;
        Ok(RestartIndicator { class })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(1, 1);
        buffer.write_bits(0, 4);
        buffer.write_bits(self.class.into_raw(), 3);
        Ok(())
    }
}

impl fmt::Display for RestartIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RestartIndicator {{ class: {} }}", self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_indicator() {
        let mut buf = BitBuffer::from_bytes(&[0x87]);
        assert_eq!(RestartIndicator::from_bitbuf(&mut buf).unwrap().class, RestartClass::AllInterfaces);
        let mut buf = BitBuffer::from_bytes(&[0x82]);
        assert!(RestartIndicator::from_bitbuf(&mut buf).is_err());
    }
}
