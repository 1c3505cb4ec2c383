use core::fmt;

use crate::enums::ie_id::IeId;
use crate::ies::*;

/// Most elements a single message may carry
pub const IES_MAX: usize = 260;

/// Typed accessor for the first element of one kind
macro_rules! first_of {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        pub fn $fn_name(&self) -> Option<&$ty> {
            self.ies.iter().find_map(|ie| match ie {
                Ie::$variant(v) => Some(v),
                _ => None,
            })
        }
    };
}

/// Ordered collection of the information elements of one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ies {
    ies: Vec<Ie>,
}

impl Ies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element. Elements beyond IES_MAX are dropped with a warning.
    pub fn add(&mut self, ie: Ie) {
        if self.ies.len() >= IES_MAX {
            tracing::warn!("IE collection full, dropping {}", ie);
            return;
        }
        self.ies.push(ie);
    }

    pub fn with(mut self, ie: Ie) -> Self {
        self.add(ie);
        self
    }

    pub fn len(&self) -> usize {
        self.ies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ie> {
        self.ies.iter()
    }

    pub fn contains(&self, id: IeId) -> bool {
        self.ies.iter().any(|ie| ie.ie_id() == Some(id))
    }

    /// Codeset 0 element with this raw identifier present
    pub fn contains_raw(&self, id: u8) -> bool {
        self.ies.iter().any(|ie| ie.codeset() == 0 && ie.id() == id)
    }

    pub fn count(&self, id: IeId) -> usize {
        self.ies.iter().filter(|ie| ie.ie_id() == Some(id)).count()
    }

    pub fn remove_all(&mut self, id: IeId) {
        self.ies.retain(|ie| ie.ie_id() != Some(id));
    }

    /// Append all elements of `other`. A Cause is skipped when one with the same
    /// cause value is already present.
    pub fn merge(&mut self, other: &Ies) {
        for ie in other.iter() {
            if let Ie::Cause(cause) = ie {
                if self.causes().any(|c| c.value == cause.value) {
                    continue;
                }
            }
            self.add(ie.clone());
        }
    }

    /// Order elements by codeset, then identifier. The sort is stable, so repeated elements
    /// keep their relative order. A repeat indicator is placed right before the first
    /// repeated element.
    pub fn sort(&mut self) {
        self.ies.sort_by_key(|ie| (ie.codeset(), ie.id()));

        let Some(ri_pos) = self.ies.iter().position(|ie| matches!(ie, Ie::RepeatIndicator(_))) else {
            return;
        };
        let repeated = self.ies.windows(2).position(|pair| {
            !pair[0].is_single_octet() && pair[0].codeset() == 0 && pair[0].codeset() == pair[1].codeset() && pair[0].id() == pair[1].id()
        });
        if let Some(target) = repeated {
            // Codeset 0 variable length elements always sort before the indicator
            let ri = self.ies.remove(ri_pos);
            self.ies.insert(target, ri);
        }
    }

    pub fn causes(&self) -> impl Iterator<Item = &Cause> {
        self.ies.iter().filter_map(|ie| match ie {
            Ie::Cause(c) => Some(c),
            _ => None,
        })
    }

    pub fn progress_indicators(&self) -> impl Iterator<Item = &ProgressIndicator> {
        self.ies.iter().filter_map(|ie| match ie {
            Ie::ProgressIndicator(p) => Some(p),
            _ => None,
        })
    }

    first_of!(bearer_capability, BearerCapability, BearerCapability);
    first_of!(cause, Cause, Cause);
    first_of!(call_identity, CallIdentity, CallIdentity);
    first_of!(call_state, CallState, CallState);
    first_of!(channel_identification, ChannelIdentification, ChannelIdentification);
    first_of!(notification_indicator, NotificationIndicator, NotificationIndicator);
    first_of!(display, Display, Display);
    first_of!(date_time, DateTime, DateTime);
    first_of!(keypad_facility, KeypadFacility, KeypadFacility);
    first_of!(called_party_number, CalledPartyNumber, CalledPartyNumber);
    first_of!(calling_party_number, CallingPartyNumber, CallingPartyNumber);
    first_of!(connected_number, ConnectedNumber, ConnectedNumber);
    first_of!(restart_indicator, RestartIndicator, RestartIndicator);

    pub fn sending_complete(&self) -> bool {
        self.contains(IeId::SendingComplete)
    }
}

impl From<Vec<Ie>> for Ies {
    fn from(mut ies: Vec<Ie>) -> Self {
        if ies.len() > IES_MAX {
            tracing::warn!("IE collection full, dropping {} elements", ies.len() - IES_MAX);
            ies.truncate(IES_MAX);
        }
        Ies { ies }
    }
}

impl<'a> IntoIterator for &'a Ies {
    type Item = &'a Ie;
    type IntoIter = std::slice::Iter<'a, Ie>;

    fn into_iter(self) -> Self::IntoIter {
        self.ies.iter()
    }
}

impl fmt::Display for Ies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, ie) in self.ies.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ie)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{cause_value::CauseValue, location::Location, user_info_layer1::UserInfoLayer1};
    use crate::fields::party_number::PartyNumber;
    use q931_core::debug;

    fn ids(ies: &Ies) -> Vec<u8> {
        ies.iter().map(|ie| ie.id()).collect()
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        debug::setup_logging_verbose();
        let mut ies = Ies::from(vec![
            Ie::SendingComplete(SendingComplete),
            Ie::CalledPartyNumber(CalledPartyNumber(PartyNumber::unknown("200"))),
            Ie::Unknown { codeset: 6, id: 0x01, data: vec![0] },
            Ie::Cause(Cause::new(Location::User, CauseValue::UserBusy)),
            Ie::BearerCapability(BearerCapability::speech(UserInfoLayer1::G711Alaw)),
            Ie::Cause(Cause::new(Location::User, CauseValue::NormalCallClearing)),
        ]);
        ies.sort();
        assert_eq!(ids(&ies), vec![0x04, 0x08, 0x08, 0x70, 0xA1, 0x01]);
        // Stable: the busy cause was added first
        assert_eq!(ies.causes().next().map(|c| c.value), Some(17));

        let once = ies.clone();
        ies.sort();
        assert_eq!(ies, once);
    }

    #[test]
    fn test_repeat_indicator_precedes_repeated_element() {
        debug::setup_logging_verbose();
        let mut ies = Ies::new()
            .with(Ie::RepeatIndicator(RepeatIndicator { value: RepeatIndicator::PRIORITIZED_LIST }))
            .with(Ie::Display(Display::new("x")))
            .with(Ie::BearerCapability(BearerCapability::speech(UserInfoLayer1::G711Alaw)))
            .with(Ie::BearerCapability(BearerCapability::unrestricted_digital()));
        ies.sort();
        assert_eq!(ids(&ies), vec![0xD0, 0x04, 0x04, 0x28]);
        let once = ies.clone();
        ies.sort();
        assert_eq!(ies, once);
    }

    #[test]
    fn test_merge_drops_duplicate_cause_values() {
        debug::setup_logging_verbose();
        let mut dst = Ies::new().with(Ie::Cause(Cause::new(Location::User, CauseValue::NormalCallClearing)));
        let src = Ies::new()
            .with(Ie::Cause(Cause::new(Location::PublicNetworkLocalUser, CauseValue::NormalCallClearing)))
            .with(Ie::Cause(Cause::new(Location::User, CauseValue::RecoveryOnTimerExpiry)))
            .with(Ie::Display(Display::new("bye")));
        dst.merge(&src);
        assert_eq!(dst.count(IeId::Cause), 2);
        assert_eq!(dst.causes().map(|c| c.value).collect::<Vec<_>>(), vec![16, 102]);
        assert!(dst.contains(IeId::Display));
    }

    #[test]
    fn test_capacity() {
        let mut ies = Ies::new();
        for _ in 0..IES_MAX + 5 {
            ies.add(Ie::SendingComplete(SendingComplete));
        }
        assert_eq!(ies.len(), IES_MAX);
    }
}
