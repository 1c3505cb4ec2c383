//! Single-octet elements. Type 1 elements carry an identifier in bits 7-5 and
//! contents in bits 4-1; type 2 elements are identified by the whole octet.

use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

fn read_type1(buffer: &mut BitBuffer, expected_id: u64, field: &'static str) -> Result<u8, IeParseErr> {
    let id = buffer.read_field(4, field)?;
    if id != expected_id >> 4 {
        return Err(IeParseErr::InvalidElemId { found: id << 4 });
    }
    Ok(buffer.read_field(4, "contents")? as u8)
}

fn read_type2(buffer: &mut BitBuffer, expected_id: u64) -> Result<(), IeParseErr> {
    let id = buffer.read_field(8, "identifier")?;
    if id != expected_id {
        return Err(IeParseErr::InvalidElemId { found: id });
    }
    Ok(())
}

/// Q.931 4.5.3 / 4.5.4 Locking and non-locking shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub locking: bool,
    /// 3 bits
    pub codeset: u8,
}

impl Shift {
    pub const ID: u64 = 0x90;

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let contents = read_type1(buffer, Self::ID, "shift")?;
        let locking = contents & 0x08 == 0;
        let codeset = contents & 0x07;
        if locking && codeset == 0 {
            // Locking shift to codeset 0 is reserved
            return Err(IeParseErr::InvalidValue { field: "codeset", value: 0 });
        }
        Ok(Shift { locking, codeset })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        if self.codeset > 7 {
            return Err(IeParseErr::InvalidValue { field: "codeset", value: self.codeset as u64 });
        }
        buffer.write_bits(Self::ID >> 4, 4);
        buffer.write_bits((!self.locking) as u64, 1);
        buffer.write_bits(self.codeset as u64, 3);
        Ok(())
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Shift {{ {} codeset: {} }}", if self.locking { "locking" } else { "non-locking" }, self.codeset)
    }
}

/// Q.931 4.5.14 Congestion level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CongestionLevel {
    pub receiver_not_ready: bool,
}

impl CongestionLevel {
    pub const ID: u64 = 0xB0;

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        match read_type1(buffer, Self::ID, "congestion_level")? {
            0x0 => Ok(CongestionLevel { receiver_not_ready: false }),
            0xF => Ok(CongestionLevel { receiver_not_ready: true }),
            v => Err(IeParseErr::InvalidValue { field: "congestion_level", value: v as u64 }),
        }
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(Self::ID >> 4, 4);
        buffer.write_bits(if self.receiver_not_ready { 0xF } else { 0x0 }, 4);
        Ok(())
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CongestionLevel {{ receiver_not_ready: {} }}", self.receiver_not_ready)
    }
}

/// Q.931 4.5.24 Repeat indicator
/// Precedes a repeated element and tells how the repetitions are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatIndicator {
    /// 4 bits, 2 = prioritized list for selecting one possibility
    pub value: u8,
}

impl RepeatIndicator {
    pub const ID: u64 = 0xD0;
    pub const PRIORITIZED_LIST: u8 = 0x2;

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let value = read_type1(buffer, Self::ID, "repeat_indicator")?;
        Ok(RepeatIndicator { value })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(Self::ID >> 4, 4);
        buffer.write_bits(self.value as u64 & 0x0F, 4);
        Ok(())
    }
}

impl fmt::Display for RepeatIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RepeatIndicator {{ value: {} }}", self.value)
    }
}

/// Q.931 4.5.20 More data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoreData;

impl MoreData {
    pub const ID: u64 = 0xA0;

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        read_type2(buffer, Self::ID)?;
        Ok(MoreData)
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(Self::ID, 8);
        Ok(())
    }
}

impl fmt::Display for MoreData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MoreData")
    }
}

/// Q.931 4.5.27 Sending complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendingComplete;

impl SendingComplete {
    pub const ID: u64 = 0xA1;

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        read_type2(buffer, Self::ID)?;
        Ok(SendingComplete)
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(Self::ID, 8);
        Ok(())
    }
}

impl fmt::Display for SendingComplete {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SendingComplete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift() {
        let mut buf = BitBuffer::from_bytes(&[0x9D]);
        assert_eq!(Shift::from_bitbuf(&mut buf).unwrap(), Shift { locking: false, codeset: 5 });
        let mut buf = BitBuffer::from_bytes(&[0x96]);
        assert_eq!(Shift::from_bitbuf(&mut buf).unwrap(), Shift { locking: true, codeset: 6 });
        let mut buf = BitBuffer::from_bytes(&[0x90]);
        assert!(Shift::from_bitbuf(&mut buf).is_err());
    }

    #[test]
    fn test_type2() {
        let mut buf = BitBuffer::from_bytes(&[0xA1]);
        assert_eq!(SendingComplete::from_bitbuf(&mut buf), Ok(SendingComplete));
        let mut buf = BitBuffer::from_bytes(&[0xA1]);
        assert_eq!(MoreData::from_bitbuf(&mut buf), Err(IeParseErr::InvalidElemId { found: 0xA1 }));

        let mut out = BitBuffer::new_autoexpand(8);
        CongestionLevel { receiver_not_ready: true }.to_bitbuf(&mut out).unwrap();
        assert_eq!(out.into_bytes(), vec![0xBF]);
    }
}
