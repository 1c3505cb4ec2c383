use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::fields::network_id::NetworkIdentification;

/// Q.931 4.5.21 Network-specific facilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpecificFacilities {
    /// Octets 3.1 and 3.2, preceded on the wire by their length in octet 3
    pub network_id: Option<NetworkIdentification>,
    /// Octet 4 onwards, network specific
    pub facility_specification: Vec<u8>,
}

impl NetworkSpecificFacilities {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let id_len = buffer.read_octet("network_id_length")? as usize;
        let network_id = if id_len > 0 {
            let id_bytes = buffer.read_bytes(id_len, "network_id")?;
            let mut id_buf = BitBuffer::from_vec(id_bytes);
            Some(NetworkIdentification::from_bitbuf(&mut id_buf)?)
        } else {
            None
        };
        let facility_specification = buffer.read_remaining_bytes();
        if facility_specification.is_empty() {
            return Err(IeParseErr::BufferEnded { field: Some("facility_specification") });
        }
        Ok(NetworkSpecificFacilities { network_id, facility_specification })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.facility_specification.is_empty() {
            return Err(IeParseErr::Inconsistency { field: "facility_specification", reason: "must not be empty" });
        }
        match &self.network_id {
            Some(id) => {
                let len = id.len_octets();
                if len > 0xFF {
                    return Err(IeParseErr::InconsistentLength { expected: 0xFF, found: len });
                }
                buffer.write_bits(len as u64, 8);
                id.to_bitbuf(buffer)?;
            }
            None => buffer.write_bits(0, 8),
        }
        buffer.write_bytes(&self.facility_specification);
        Ok(())
    }
}

impl fmt::Display for NetworkSpecificFacilities {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NetworkSpecificFacilities {{ ")?;
        if let Some(id) = &self.network_id {
            write!(f, "network_id: {} ", id)?;
        }
        write!(f, "facility_specification: {:02x?} }}", self.facility_specification)
    }
}
