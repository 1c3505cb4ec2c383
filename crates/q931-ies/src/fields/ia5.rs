use q931_core::{BitBuffer, IeParseErr};

/// Read all remaining octets as IA5 characters. Bit 8 of each octet is spare and must be 0.
pub fn read_ia5(buffer: &mut BitBuffer, field: &'static str) -> Result<String, IeParseErr> {
    let mut s = String::with_capacity(buffer.get_len_remaining_octets());
    while buffer.get_len_remaining() >= 8 {
        let c = buffer.read_octet(field)?;
        if c & 0x80 != 0 {
            return Err(IeParseErr::InvalidValue { field, value: c as u64 });
        }
        s.push(c as char);
    }
    Ok(s)
}

pub fn write_ia5(buffer: &mut BitBuffer, s: &str, field: &'static str) -> Result<(), IeParseErr> {
    for c in s.bytes() {
        if c & 0x80 != 0 {
            return Err(IeParseErr::InvalidValue { field, value: c as u64 });
        }
        buffer.write_bits(c as u64, 8);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ia5() {
        let mut buf = BitBuffer::from_bytes(b"12*#");
        assert_eq!(read_ia5(&mut buf, "digits").unwrap(), "12*#");

        let mut buf = BitBuffer::from_bytes(&[0x31, 0xB2]);
        assert_eq!(read_ia5(&mut buf, "digits"), Err(IeParseErr::InvalidValue { field: "digits", value: 0xB2 }));

        let mut out = BitBuffer::new_autoexpand(8);
        assert!(write_ia5(&mut out, "né", "display").is_err());
    }
}
