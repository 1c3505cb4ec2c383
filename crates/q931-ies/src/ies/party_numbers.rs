//! Called, calling, connected and redirecting number elements.
//! All four share the layout in `fields::party_number` and differ only in the optional octets they allow.

use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::fields::party_number::{NumberLayout, PartyNumber};

macro_rules! party_number_ie {
    ($(#[$doc:meta])* $name:ident, $layout:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(pub PartyNumber);

        impl $name {
            pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
                Ok($name(PartyNumber::from_bitbuf(buffer, $layout)?))
            }

            pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
                self.0.to_bitbuf(buffer, $layout)
            }

            pub fn digits(&self) -> &str {
                &self.0.digits
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} {{ {} }}", stringify!($name), self.0)
            }
        }
    };
}

party_number_ie!(
    /// Q.931 4.5.8 Called party number
    CalledPartyNumber,
    NumberLayout::Plain
);
party_number_ie!(
    /// Q.931 4.5.10 Calling party number
    CallingPartyNumber,
    NumberLayout::WithPresentation
);
party_number_ie!(
    /// Q.951 Connected number
    ConnectedNumber,
    NumberLayout::WithPresentation
);
party_number_ie!(
    /// Q.952 Redirecting number
    RedirectingNumber,
    NumberLayout::WithRedirection
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_called_vs_calling_layout() {
        // Octet 3 with ext=0 is only legal where octet 3a exists
        let bytes = hex::decode("0180313233").unwrap();
        let mut buf = BitBuffer::from_bytes(&bytes);
        assert!(CalledPartyNumber::from_bitbuf(&mut buf).is_err());
        let mut buf = BitBuffer::from_bytes(&bytes);
        let calling = CallingPartyNumber::from_bitbuf(&mut buf).unwrap();
        assert_eq!(calling.digits(), "123");
        assert_eq!(calling.to_string(), "CallingPartyNumber { Unknown Isdn \"123\" Allowed UserProvidedNotScreened }");
    }
}
