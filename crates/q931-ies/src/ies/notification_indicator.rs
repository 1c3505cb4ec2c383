use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::notification_description::NotificationDescription;

/// Q.931 4.5.22 Notification indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationIndicator {
    pub description: NotificationDescription,
}

impl NotificationIndicator {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let ext = buffer.read_field(1, "ext_3")?;
        expect_ext!(ext, 1, "octet 3")?;
        let val = buffer.read_field(7, "notification_description")?;
        let description =
            NotificationDescription::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "notification_description", value: val })?;
        Ok(NotificationIndicator { description })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(1, 1);
        buffer.write_bits(self.description.into_raw(), 7);
        Ok(())
    }
}

impl fmt::Display for NotificationIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NotificationIndicator {{ description: {} }}", self.description)
    }
}
