//! Called, calling and connected subaddress elements, sharing `fields::subaddress`

use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::fields::subaddress::Subaddress;

macro_rules! subaddress_ie {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(pub Subaddress);

        impl $name {
            pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
                Ok($name(Subaddress::from_bitbuf(buffer)?))
            }

            pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
                self.0.to_bitbuf(buffer)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} {{ {} }}", stringify!($name), self.0)
            }
        }
    };
}

subaddress_ie!(
    /// Q.931 4.5.9 Called party subaddress
    CalledPartySubaddress
);
subaddress_ie!(
    /// Q.931 4.5.11 Calling party subaddress
    CallingPartySubaddress
);
subaddress_ie!(
    /// Q.951 Connected subaddress
    ConnectedSubaddress
);
