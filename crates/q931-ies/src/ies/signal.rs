use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::enums::signal_value::SignalValue;

/// Q.931 4.5.28 Signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub value: SignalValue,
}

impl Signal {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let val = buffer.read_field(8, "signal_value")?;
        let value = SignalValue::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "signal_value", value: val })?;
        Ok(Signal { value })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(self.value.into_raw(), 8);
        Ok(())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Signal {{ value: {} }}", self.value)
    }
}
