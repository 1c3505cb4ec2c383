/// Q.931 4.5.12 Location
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Location {
    User = 0,
    PrivateNetworkLocalUser = 1,
    PublicNetworkLocalUser = 2,
    TransitNetwork = 3,
    PublicNetworkRemoteUser = 4,
    PrivateNetworkRemoteUser = 5,
    InternationalNetwork = 7,
    NetworkBeyondInterworkingPoint = 10,
}

impl std::convert::TryFrom<u64> for Location {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(Location::User),
            1 => Ok(Location::PrivateNetworkLocalUser),
            2 => Ok(Location::PublicNetworkLocalUser),
            3 => Ok(Location::TransitNetwork),
            4 => Ok(Location::PublicNetworkRemoteUser),
            5 => Ok(Location::PrivateNetworkRemoteUser),
            7 => Ok(Location::InternationalNetwork),
            10 => Ok(Location::NetworkBeyondInterworkingPoint),
            _ => Err(()),
        }
    }
}

impl Location {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            Location::User => 0,
            Location::PrivateNetworkLocalUser => 1,
            Location::PublicNetworkLocalUser => 2,
            Location::TransitNetwork => 3,
            Location::PublicNetworkRemoteUser => 4,
            Location::PrivateNetworkRemoteUser => 5,
            Location::InternationalNetwork => 7,
            Location::NetworkBeyondInterworkingPoint => 10,
        }
    }
}

impl From<Location> for u64 {
    fn from(e: Location) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Location::User => write!(f, "User"),
            Location::PrivateNetworkLocalUser => write!(f, "PrivateNetworkLocalUser"),
            Location::PublicNetworkLocalUser => write!(f, "PublicNetworkLocalUser"),
            Location::TransitNetwork => write!(f, "TransitNetwork"),
            Location::PublicNetworkRemoteUser => write!(f, "PublicNetworkRemoteUser"),
            Location::PrivateNetworkRemoteUser => write!(f, "PrivateNetworkRemoteUser"),
            Location::InternationalNetwork => write!(f, "InternationalNetwork"),
            Location::NetworkBeyondInterworkingPoint => write!(f, "NetworkBeyondInterworkingPoint"),
        }
    }
}

impl From<q931_config::NetworkRole> for Location {
    fn from(role: q931_config::NetworkRole) -> Self {
        use q931_config::NetworkRole;
        match role {
            NetworkRole::User => Location::User,
            NetworkRole::PrivateNetworkLocalUser => Location::PrivateNetworkLocalUser,
            NetworkRole::PublicNetworkLocalUser => Location::PublicNetworkLocalUser,
            NetworkRole::TransitNetwork => Location::TransitNetwork,
            NetworkRole::PublicNetworkRemoteUser => Location::PublicNetworkRemoteUser,
            NetworkRole::PrivateNetworkRemoteUser => Location::PrivateNetworkRemoteUser,
            NetworkRole::InternationalNetwork => Location::InternationalNetwork,
            NetworkRole::NetworkBeyondInterworkingPoint => Location::NetworkBeyondInterworkingPoint,
        }
    }
}
