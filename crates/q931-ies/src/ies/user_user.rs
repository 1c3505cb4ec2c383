use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

/// User-specific protocol discriminator
pub const UU_PROTOCOL_USER_SPECIFIC: u8 = 0x00;
/// IA5 characters
pub const UU_PROTOCOL_IA5: u8 = 0x04;

/// Q.931 4.5.30 User-user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUser {
    pub protocol_discriminator: u8,
    pub information: Vec<u8>,
}

impl UserUser {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let protocol_discriminator = buffer.read_octet("protocol_discriminator")?;
        let information = buffer.read_remaining_bytes();
        Ok(UserUser { protocol_discriminator, information })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(self.protocol_discriminator as u64, 8);
        buffer.write_bytes(&self.information);
        Ok(())
    }
}

impl fmt::Display for UserUser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UserUser {{ protocol_discriminator: 0x{:02x} information: {:02x?} }}", self.protocol_discriminator, self.information)
    }
}
