use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::fields::ia5;

/// Display information is limited to 82 IA5 characters
pub const DISPLAY_MAX_LEN: usize = 82;

/// Q.931 4.5.16 Display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pub text: String,
}

impl Display {
    pub fn new(text: &str) -> Self {
        Display { text: text.to_string() }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let len = buffer.get_len_remaining_octets();
        if len > DISPLAY_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: DISPLAY_MAX_LEN, found: len });
        }
        let text = ia5::read_ia5(buffer, "display")?;
        Ok(Display { text })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.text.len() > DISPLAY_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: DISPLAY_MAX_LEN, found: self.text.len() });
        }
        ia5::write_ia5(buffer, &self.text, "display")
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Display {{ text: {:?} }}", self.text)
    }
}
