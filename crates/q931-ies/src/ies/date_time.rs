use core::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use q931_core::{BitBuffer, IeParseErr};

/// Q.931 4.5.15 Date/time
/// Sent by the network in CONNECT. Hour, minute and second are optional but positional:
/// a minute can only be present after an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Two digits, 0-99
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
}

impl DateTime {
    pub fn from_naive(dt: &NaiveDateTime) -> Self {
        DateTime {
            year: (dt.year().rem_euclid(100)) as u8,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: Some(dt.hour() as u8),
            minute: Some(dt.minute() as u8),
            second: Some(dt.second() as u8),
        }
    }

    /// Current local wall-clock time
    pub fn now() -> Self {
        Self::from_naive(&chrono::Local::now().naive_local())
    }

    /// Interpret as a date in the 2000s. Missing time fields count as zero.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2000 + self.year as i32, self.month as u32, self.day as u32)?.and_hms_opt(
            self.hour.unwrap_or(0) as u32,
            self.minute.unwrap_or(0) as u32,
            self.second.unwrap_or(0) as u32,
        )
    }

    fn check(&self) -> Result<(), IeParseErr> {
        let check = |field: &'static str, v: u8, lo: u8, hi: u8| {
            if v < lo || v > hi { Err(IeParseErr::InvalidValue { field, value: v as u64 }) } else { Ok(()) }
        };
        check("year", self.year, 0, 99)?;
        check("month", self.month, 1, 12)?;
        check("day", self.day, 1, 31)?;
        if let Some(h) = self.hour {
            check("hour", h, 0, 23)?;
        }
        if let Some(m) = self.minute {
            check("minute", m, 0, 59)?;
        }
        if let Some(s) = self.second {
            check("second", s, 0, 59)?;
        }
        if (self.minute.is_some() && self.hour.is_none()) || (self.second.is_some() && self.minute.is_none()) {
            return Err(IeParseErr::Inconsistency { field: "date_time", reason: "time fields are positional" });
        }
        Ok(())
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let year = buffer.read_octet("year")?;
        let month = buffer.read_octet("month")?;
        let day = buffer.read_octet("day")?;
        let mut optional = || if buffer.get_len_remaining() >= 8 { buffer.read_octet("time").ok() } else { None };
        let hour = optional();
        let minute = optional();
        let second = optional();

        let dt = DateTime { year, month, day, hour, minute, second };
        dt.check()?;
        Ok(dt)
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        self.check()?;
        buffer.write_bits(self.year as u64, 8);
        buffer.write_bits(self.month as u64, 8);
        buffer.write_bits(self.day as u64, 8);
        for v in [self.hour, self.minute, self.second].into_iter().flatten() {
            buffer.write_bits(v as u64, 8);
        }
        Ok(())
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DateTime {{ {:02}-{:02}-{:02}", self.year, self.month, self.day)?;
        if let Some(h) = self.hour {
            write!(f, " {:02}", h)?;
        }
        if let Some(m) = self.minute {
            write!(f, ":{:02}", m)?;
        }
        if let Some(s) = self.second {
            write!(f, ":{:02}", s)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_time() {
        let naive = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap().and_hms_opt(13, 5, 9).unwrap();
        let dt = DateTime::from_naive(&naive);
        let mut buf = BitBuffer::new_autoexpand(48);
        dt.to_bitbuf(&mut buf).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(bytes, vec![26, 10, 17, 13, 5, 9]);

        let mut rd = BitBuffer::from_bytes(&bytes);
        let parsed = DateTime::from_bitbuf(&mut rd).unwrap();
        assert_eq!(parsed.to_naive(), Some(naive));
    }

    #[test]
    fn test_date_only_and_invalid() {
        let mut rd = BitBuffer::from_bytes(&[1, 2, 3]);
        let dt = DateTime::from_bitbuf(&mut rd).unwrap();
        assert_eq!(dt.hour, None);

        let mut rd = BitBuffer::from_bytes(&[1, 13, 3]);
        assert_eq!(DateTime::from_bitbuf(&mut rd), Err(IeParseErr::InvalidValue { field: "month", value: 13 }));
    }
}
