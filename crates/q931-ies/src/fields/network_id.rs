use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::fields::ia5;

/// Network identification, as carried by Transit network selection and Network-specific facilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkIdentification {
    /// 3 bits. 0 user specified, 2 national network, 3 international network
    pub type_of_network_id: u8,
    /// 4 bits. 0 unknown, 1 carrier identification code, 3 data network identification code
    pub network_id_plan: u8,
    pub network_id: String,
}

impl NetworkIdentification {
    pub fn national_carrier(id: &str) -> Self {
        NetworkIdentification {
            type_of_network_id: 2,
            network_id_plan: 1,
            network_id: id.to_string(),
        }
    }

    /// Parse the type/plan octet followed by the IA5 identification, consuming the whole buffer
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let ext = buffer.read_field(1, "ext")?;
        expect_ext!(ext, 1, "network identification type")?;
        let type_of_network_id = buffer.read_field(3, "type_of_network_id")? as u8;
        let network_id_plan = buffer.read_field(4, "network_id_plan")? as u8;
        let network_id = ia5::read_ia5(buffer, "network_id")?;

        Ok(NetworkIdentification {
            type_of_network_id,
            network_id_plan,
            network_id,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.type_of_network_id > 7 {
            return Err(IeParseErr::InvalidValue { field: "type_of_network_id", value: self.type_of_network_id as u64 });
        }
        if self.network_id_plan > 15 {
            return Err(IeParseErr::InvalidValue { field: "network_id_plan", value: self.network_id_plan as u64 });
        }
        buffer.write_bits(1, 1);
        buffer.write_bits(self.type_of_network_id as u64, 3);
        buffer.write_bits(self.network_id_plan as u64, 4);
        ia5::write_ia5(buffer, &self.network_id, "network_id")
    }

    /// Encoded length in octets
    pub fn len_octets(&self) -> usize {
        1 + self.network_id.len()
    }
}

impl fmt::Display for NetworkIdentification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "type {} plan {} id {:?}", self.type_of_network_id, self.network_id_plan, self.network_id)
    }
}
