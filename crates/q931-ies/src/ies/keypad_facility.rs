use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::fields::ia5;

pub const KEYPAD_MAX_LEN: usize = 32;

/// Q.931 4.5.18 Keypad facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadFacility {
    pub digits: String,
}

impl KeypadFacility {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let len = buffer.get_len_remaining_octets();
        if len == 0 || len > KEYPAD_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: KEYPAD_MAX_LEN, found: len });
        }
        let digits = ia5::read_ia5(buffer, "keypad")?;
        Ok(KeypadFacility { digits })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.digits.is_empty() || self.digits.len() > KEYPAD_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: KEYPAD_MAX_LEN, found: self.digits.len() });
        }
        ia5::write_ia5(buffer, &self.digits, "keypad")
    }
}

impl fmt::Display for KeypadFacility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeypadFacility {{ digits: {:?} }}", self.digits)
    }
}
