use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

pub const CALL_IDENTITY_MAX_LEN: usize = 8;

/// Q.931 4.5.6 Call identity
/// Names a suspended call. The octets are assigned by the user and compared verbatim on resume.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallIdentity {
    pub identity: Vec<u8>,
}

impl CallIdentity {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let identity = buffer.read_remaining_bytes();
        if identity.len() > CALL_IDENTITY_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: CALL_IDENTITY_MAX_LEN, found: identity.len() });
        }
        Ok(CallIdentity { identity })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.identity.len() > CALL_IDENTITY_MAX_LEN {
            return Err(IeParseErr::InconsistentLength { expected: CALL_IDENTITY_MAX_LEN, found: self.identity.len() });
        }
        buffer.write_bytes(&self.identity);
        Ok(())
    }
}

impl fmt::Display for CallIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CallIdentity {{ identity: {:02x?} }}", self.identity)
    }
}
