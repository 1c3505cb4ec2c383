/// Q.931 4.5.22 Notification description
/// Bits: 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NotificationDescription {
    UserSuspended = 0,
    UserResumed = 1,
    BearerServiceChange = 2,
}

impl std::convert::TryFrom<u64> for NotificationDescription {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(NotificationDescription::UserSuspended),
            1 => Ok(NotificationDescription::UserResumed),
            2 => Ok(NotificationDescription::BearerServiceChange),
            _ => Err(()),
        }
    }
}

impl NotificationDescription {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            NotificationDescription::UserSuspended => 0,
            NotificationDescription::UserResumed => 1,
            NotificationDescription::BearerServiceChange => 2,
        }
    }
}

impl From<NotificationDescription> for u64 {
    fn from(e: NotificationDescription) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for NotificationDescription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NotificationDescription::UserSuspended => write!(f, "UserSuspended"),
            NotificationDescription::UserResumed => write!(f, "UserResumed"),
            NotificationDescription::BearerServiceChange => write!(f, "BearerServiceChange"),
        }
    }
}
