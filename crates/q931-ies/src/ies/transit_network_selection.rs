use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::fields::network_id::NetworkIdentification;

/// Q.931 4.5.29 Transit network selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitNetworkSelection {
    pub network: NetworkIdentification,
}

impl TransitNetworkSelection {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        Ok(TransitNetworkSelection { network: NetworkIdentification::from_bitbuf(buffer)? })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        self.network.to_bitbuf(buffer)
    }
}

impl fmt::Display for TransitNetworkSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TransitNetworkSelection {{ {} }}", self.network)
    }
}
