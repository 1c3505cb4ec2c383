use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

/// Remote operations protocol, the profile used for supplementary services
pub const PROTOCOL_PROFILE_ROSE: u8 = 0x11;

/// Q.932 Facility
/// The service components are not interpreted by this stack and are carried as raw octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facility {
    /// 5 bits
    pub protocol_profile: u8,
    pub components: Vec<u8>,
}

impl Facility {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let ext = buffer.read_field(1, "ext_3")?;
        expect_ext!(ext, 1, "octet 3")?;
        buffer.read_field(2, "spare")?;
        let protocol_profile = buffer.read_field(5, "protocol_profile")? as u8;
        let components = buffer.read_remaining_bytes();
        Ok(Facility { protocol_profile, components })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.protocol_profile > 0x1F {
            return Err(IeParseErr::InvalidValue { field: "protocol_profile", value: self.protocol_profile as u64 });
        }
        buffer.write_bits(1, 1);
        buffer.write_bits(0, 2);
        buffer.write_bits(self.protocol_profile as u64, 5);
        buffer.write_bytes(&self.components);
        Ok(())
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Facility {{ protocol_profile: 0x{:02x} components: {:02x?} }}", self.protocol_profile, self.components)
    }
}
