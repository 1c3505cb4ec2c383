use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_value};

/// Call reference: length, flag and value.
/// The flag is 0 on messages sent by the side that allocated the value, 1 on messages sent by the other side.
/// A length of zero is the dummy call reference; value 0 with a non-zero length is the global call reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallRef {
    /// Length of the value in octets, 0 to 2
    pub len: u8,
    pub flag: bool,
    /// 7 bits for 1-octet references, 15 bits for 2-octet references
    pub value: u16,
}

impl CallRef {
    pub const MAX_LEN: u8 = 2;

    pub fn new(len: u8, value: u16, flag: bool) -> Self {
        CallRef { len, flag, value }
    }

    pub fn global(len: u8) -> Self {
        CallRef { len, flag: false, value: 0 }
    }

    pub fn dummy() -> Self {
        CallRef { len: 0, flag: false, value: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.len == 0
    }

    pub fn is_global(&self) -> bool {
        self.len > 0 && self.value == 0
    }

    /// Largest value that fits a call reference of `len` octets
    pub fn max_value(len: u8) -> u16 {
        match len {
            0 => 0,
            1 => 0x7F,
            _ => 0x7FFF,
        }
    }

    /// Same reference as seen from the other side
    pub fn flipped(&self) -> Self {
        CallRef { flag: !self.flag, ..*self }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let spare = buffer.read_field(4, "callref_spare")?;
        expect_value!(spare, 0, "callref_spare")?;
        let len = buffer.read_field(4, "callref_len")? as u8;
        if len > Self::MAX_LEN {
            return Err(IeParseErr::InvalidValue { field: "callref_len", value: len as u64 });
        }
        if len == 0 {
            return Ok(Self::dummy());
        }
        let flag = buffer.read_field(1, "callref_flag")? == 1;
        let value = buffer.read_field(len as usize * 8 - 1, "callref_value")? as u16;
        Ok(CallRef { len, flag, value })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.len > Self::MAX_LEN {
            return Err(IeParseErr::InvalidValue { field: "callref_len", value: self.len as u64 });
        }
        if self.value > Self::max_value(self.len) {
            return Err(IeParseErr::InvalidValue { field: "callref_value", value: self.value as u64 });
        }
        buffer.write_bits(0, 4);
        buffer.write_bits(self.len as u64, 4);
        if self.len > 0 {
            buffer.write_bit(self.flag as u8);
            buffer.write_bits(self.value as u64, self.len as usize * 8 - 1);
        }
        Ok(())
    }
}

impl fmt::Display for CallRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "dummy")
        } else {
            write!(f, "{}/{}", self.value, self.flag as u8)
        }
    }
}
