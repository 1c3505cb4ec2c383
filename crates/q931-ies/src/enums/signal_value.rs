/// Q.931 4.5.28 Signal value
/// Bits: 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SignalValue {
    DialToneOn = 0x00,
    RingBackToneOn = 0x01,
    InterceptToneOn = 0x02,
    NetworkCongestionToneOn = 0x03,
    BusyToneOn = 0x04,
    ConfirmToneOn = 0x05,
    AnswerToneOn = 0x06,
    CallWaitingToneOn = 0x07,
    OffHookWarningToneOn = 0x08,
    PreemptionToneOn = 0x09,
    TonesOff = 0x3F,
    AlertingOnPattern0 = 0x40,
    AlertingOnPattern1 = 0x41,
    AlertingOnPattern2 = 0x42,
    AlertingOnPattern3 = 0x43,
    AlertingOnPattern4 = 0x44,
    AlertingOnPattern5 = 0x45,
    AlertingOnPattern6 = 0x46,
    AlertingOnPattern7 = 0x47,
    AlertingOff = 0x4F,
}

impl std::convert::TryFrom<u64> for SignalValue {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(SignalValue::DialToneOn),
            0x01 => Ok(SignalValue::RingBackToneOn),
            0x02 => Ok(SignalValue::InterceptToneOn),
            0x03 => Ok(SignalValue::NetworkCongestionToneOn),
            0x04 => Ok(SignalValue::BusyToneOn),
            0x05 => Ok(SignalValue::ConfirmToneOn),
            0x06 => Ok(SignalValue::AnswerToneOn),
            0x07 => Ok(SignalValue::CallWaitingToneOn),
            0x08 => Ok(SignalValue::OffHookWarningToneOn),
            0x09 => Ok(SignalValue::PreemptionToneOn),
            0x3F => Ok(SignalValue::TonesOff),
            0x40 => Ok(SignalValue::AlertingOnPattern0),
            0x41 => Ok(SignalValue::AlertingOnPattern1),
            0x42 => Ok(SignalValue::AlertingOnPattern2),
            0x43 => Ok(SignalValue::AlertingOnPattern3),
            0x44 => Ok(SignalValue::AlertingOnPattern4),
            0x45 => Ok(SignalValue::AlertingOnPattern5),
            0x46 => Ok(SignalValue::AlertingOnPattern6),
            0x47 => Ok(SignalValue::AlertingOnPattern7),
            0x4F => Ok(SignalValue::AlertingOff),
            _ => Err(()),
        }
    }
}

impl SignalValue {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            SignalValue::DialToneOn => 0x00,
            SignalValue::RingBackToneOn => 0x01,
            SignalValue::InterceptToneOn => 0x02,
            SignalValue::NetworkCongestionToneOn => 0x03,
            SignalValue::BusyToneOn => 0x04,
            SignalValue::ConfirmToneOn => 0x05,
            SignalValue::AnswerToneOn => 0x06,
            SignalValue::CallWaitingToneOn => 0x07,
            SignalValue::OffHookWarningToneOn => 0x08,
            SignalValue::PreemptionToneOn => 0x09,
            SignalValue::TonesOff => 0x3F,
            SignalValue::AlertingOnPattern0 => 0x40,
            SignalValue::AlertingOnPattern1 => 0x41,
            SignalValue::AlertingOnPattern2 => 0x42,
            SignalValue::AlertingOnPattern3 => 0x43,
            SignalValue::AlertingOnPattern4 => 0x44,
            SignalValue::AlertingOnPattern5 => 0x45,
            SignalValue::AlertingOnPattern6 => 0x46,
            SignalValue::AlertingOnPattern7 => 0x47,
            SignalValue::AlertingOff => 0x4F,
        }
    }
}

impl From<SignalValue> for u64 {
    fn from(e: SignalValue) -> Self {
        e.into_raw()
    }
}

impl core::fmt::Display for SignalValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SignalValue::DialToneOn => write!(f, "DialToneOn"),
            SignalValue::RingBackToneOn => write!(f, "RingBackToneOn"),
            SignalValue::InterceptToneOn => write!(f, "InterceptToneOn"),
            SignalValue::NetworkCongestionToneOn => write!(f, "NetworkCongestionToneOn"),
            SignalValue::BusyToneOn => write!(f, "BusyToneOn"),
            SignalValue::ConfirmToneOn => write!(f, "ConfirmToneOn"),
            SignalValue::AnswerToneOn => write!(f, "AnswerToneOn"),
            SignalValue::CallWaitingToneOn => write!(f, "CallWaitingToneOn"),
            SignalValue::OffHookWarningToneOn => write!(f, "OffHookWarningToneOn"),
            SignalValue::PreemptionToneOn => write!(f, "PreemptionToneOn"),
            SignalValue::TonesOff => write!(f, "TonesOff"),
            SignalValue::AlertingOnPattern0 => write!(f, "AlertingOnPattern0"),
            SignalValue::AlertingOnPattern1 => write!(f, "AlertingOnPattern1"),
            SignalValue::AlertingOnPattern2 => write!(f, "AlertingOnPattern2"),
            SignalValue::AlertingOnPattern3 => write!(f, "AlertingOnPattern3"),
            SignalValue::AlertingOnPattern4 => write!(f, "AlertingOnPattern4"),
            SignalValue::AlertingOnPattern5 => write!(f, "AlertingOnPattern5"),
            SignalValue::AlertingOnPattern6 => write!(f, "AlertingOnPattern6"),
            SignalValue::AlertingOnPattern7 => write!(f, "AlertingOnPattern7"),
            SignalValue::AlertingOff => write!(f, "AlertingOff"),
        }
    }
}
