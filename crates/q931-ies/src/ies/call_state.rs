use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

use crate::enums::{call_state_value::CallStateValue, coding_standard::CodingStandard};

/// Q.931 4.5.7 Call state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallState {
    pub coding_standard: CodingStandard,
    pub value: CallStateValue,
}

impl CallState {
    pub fn new(value: CallStateValue) -> Self {
        CallState { coding_standard: CodingStandard::Ccitt, value }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let val = buffer.read_field(2, "coding_standard")?;
        let coding_standard = CodingStandard::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "coding_standard", value: val })?;
        let val = buffer.read_field(6, "call_state_value")?;
        let value = CallStateValue::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "call_state_value", value: val })?;
        Ok(CallState { coding_standard, value })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(self.coding_standard.into_raw(), 2);
        buffer.write_bits(self.value.into_raw(), 6);
        Ok(())
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CallState {{ value: {} ({}) }}", self.value, self.value.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_state() {
        let mut buf = BitBuffer::from_bytes(&[0x0A]);
        assert_eq!(CallState::from_bitbuf(&mut buf).unwrap(), CallState::new(CallStateValue::Active));

        let mut buf = BitBuffer::from_bytes(&[0x3D]);
        assert_eq!(CallState::from_bitbuf(&mut buf).unwrap().value, CallStateValue::RestartRequest);

        let mut buf = BitBuffer::from_bytes(&[0x05]);
        assert!(CallState::from_bitbuf(&mut buf).is_err());
    }
}
