use core::fmt;

use crate::ie_parse_error::IeParseErr;

/// Bit cursor over the octets of a message or information element.
///
/// Q.931 numbers the bits of an octet 8..1 and draws bit 8 first, so fields are taken
/// most significant bit first. Positions are bit offsets from the first octet.
/// Buffers made with `new_autoexpand` grow as they are written; all others have a fixed length
/// and writing past it is a programming error.
pub struct BitBuffer {
    octets: Vec<u8>,
    /// Bit offset of the next read or write
    pos: usize,
    /// Number of valid bits
    len: usize,
    growable: bool,
}

impl BitBuffer {
    /// Zeroed buffer of exactly `len_bits` bits
    pub fn new(len_bits: usize) -> Self {
        BitBuffer { octets: vec![0; len_bits.div_ceil(8)], pos: 0, len: len_bits, growable: false }
    }

    /// Empty buffer for encoding, with room for `capacity_bits` before it reallocates
    pub fn new_autoexpand(capacity_bits: usize) -> Self {
        BitBuffer { octets: Vec::with_capacity(capacity_bits.div_ceil(8)), pos: 0, len: 0, growable: true }
    }

    pub fn from_vec(octets: Vec<u8>) -> Self {
        let len = octets.len() * 8;
        BitBuffer { octets, pos: 0, len, growable: false }
    }

    pub fn from_bytes(octets: &[u8]) -> Self {
        Self::from_vec(octets.to_vec())
    }

    /// Buffer from '0'/'1' characters, for tests. Spaces separate fields: "1 00 00000".
    pub fn from_bitstr(bits: &str) -> Self {
        let mut buf = BitBuffer::new_autoexpand(bits.len());
        for c in bits.chars() {
            match c {
                '0' => buf.write_bit(0),
                '1' => buf.write_bit(1),
                ' ' => {}
                other => panic!("from_bitstr: invalid character `{}`", other),
            }
        }
        buf.growable = false;
        buf.pos = 0;
        buf
    }

    fn bit_at(&self, pos: usize) -> u64 {
        ((self.octets[pos / 8] >> (7 - pos % 8)) & 1) as u64
    }

    fn set_bit_at(&mut self, pos: usize, bit: bool) {
        let mask = 0x80u8 >> (pos % 8);
        if bit {
            self.octets[pos / 8] |= mask;
        } else {
            self.octets[pos / 8] &= !mask;
        }
    }

    /// `num_bits` starting at bit `offset`, without moving the cursor.
    /// None if that runs past the end or `num_bits` exceeds 64.
    pub fn peek_bits_at(&self, offset: usize, num_bits: usize) -> Option<u64> {
        if num_bits > 64 || offset + num_bits > self.len {
            return None;
        }
        Some((offset..offset + num_bits).fold(0, |acc, p| (acc << 1) | self.bit_at(p)))
    }

    pub fn peek_bits(&self, num_bits: usize) -> Option<u64> {
        self.peek_bits_at(self.pos, num_bits)
    }

    pub fn read_bits(&mut self, num_bits: usize) -> Option<u64> {
        let v = self.peek_bits(num_bits)?;
        self.pos += num_bits;
        Some(v)
    }

    /// Read a field of an octet. Running out of octets is reported against `field`.
    pub fn read_field(&mut self, num_bits: usize, field: &'static str) -> Result<u64, IeParseErr> {
        self.read_bits(num_bits).ok_or(IeParseErr::BufferEnded { field: Some(field) })
    }

    pub fn read_octet(&mut self, field: &'static str) -> Result<u8, IeParseErr> {
        Ok(self.read_field(8, field)? as u8)
    }

    pub fn read_bytes(&mut self, num_bytes: usize, field: &'static str) -> Result<Vec<u8>, IeParseErr> {
        if self.get_len_remaining() < num_bytes * 8 {
            return Err(IeParseErr::BufferEnded { field: Some(field) });
        }
        (0..num_bytes).map(|_| self.read_octet(field)).collect()
    }

    /// All remaining whole octets. Bits short of an octet stay unread.
    pub fn read_remaining_bytes(&mut self) -> Vec<u8> {
        let n = self.get_len_remaining_octets();
        let mut ret = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(v) = self.read_bits(8) {
                ret.push(v as u8);
            }
        }
        ret
    }

    pub fn write_bit(&mut self, value: u8) {
        assert!(value <= 1, "write_bit: value must be 0 or 1");
        self.write_bits(value as u64, 1);
    }

    /// Write the low `num_bits` of `value` at the cursor
    pub fn write_bits(&mut self, value: u64, num_bits: usize) {
        assert!(num_bits <= 64, "can only write up to 64 bits");
        assert!(num_bits == 64 || value >> num_bits == 0, "value exceeds num_bits {} {}", value, num_bits);

        let end = self.pos + num_bits;
        if end > self.len {
            assert!(self.growable, "write would exceed buffer end");
            self.octets.resize(end.div_ceil(8), 0);
            self.len = end;
        }
        for i in 0..num_bits {
            let bit = (value >> (num_bits - 1 - i)) & 1 == 1;
            self.set_bit_at(self.pos + i, bit);
        }
        self.pos = end;
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        for b in data {
            self.write_bits(*b as u64, 8);
        }
    }

    /// Overwrite the octet at bit `offset` without moving the cursor.
    /// Length octets are filled in this way once their contents are written.
    pub fn patch_octet(&mut self, offset: usize, value: u8) {
        assert!(offset % 8 == 0 && offset + 8 <= self.len, "patch_octet outside buffer: {}", offset);
        self.octets[offset / 8] = value;
    }

    /// Written octets. A partial last octet is padded with zero bits.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.octets.truncate(self.len.div_ceil(8));
        self.octets
    }

    pub fn get_len(&self) -> usize {
        self.len
    }

    pub fn get_len_remaining(&self) -> usize {
        self.len - self.pos
    }

    pub fn get_len_remaining_octets(&self) -> usize {
        self.get_len_remaining() / 8
    }

    pub fn get_pos(&self) -> usize {
        self.pos
    }

    pub fn is_octet_aligned(&self) -> bool {
        self.pos % 8 == 0
    }

    pub fn seek(&mut self, pos: usize) {
        assert!(pos <= self.len, "seek to {} past end {}", pos, self.len);
        self.pos = pos;
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer {{ pos {} len {} [", self.pos, self.len)?;
        for (i, o) in self.octets.iter().take(self.len.div_ceil(8)).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", o)?;
        }
        write!(f, "] }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octet_subfields() {
        // Bearer capability octet 3: ext 1, CCITT coding, speech
        let mut bb = BitBuffer::from_bitstr("1 00 00000");
        assert_eq!(bb.read_field(1, "ext").unwrap(), 1);
        assert_eq!(bb.read_field(2, "coding_standard").unwrap(), 0);
        assert_eq!(bb.read_field(5, "itc").unwrap(), 0);
        assert_eq!(bb.get_len_remaining(), 0);
        assert!(bb.is_octet_aligned());
    }

    #[test]
    fn test_read_past_end() {
        let mut bb = BitBuffer::from_bytes(&[0x70]);
        assert!(bb.read_bits(9).is_none());
        assert_eq!(bb.read_field(16, "length"), Err(IeParseErr::BufferEnded { field: Some("length") }));
        // Failed reads leave the cursor alone
        assert_eq!(bb.read_octet("id").unwrap(), 0x70);
    }

    #[test]
    fn test_read_bytes() {
        let mut bb = BitBuffer::from_bytes(&[0x81, 0x31, 0x32]);
        assert_eq!(bb.read_octet("type_plan").unwrap(), 0x81);
        assert!(bb.read_bytes(3, "digits").is_err());
        assert_eq!(bb.read_bytes(2, "digits").unwrap(), b"12".to_vec());
        assert!(bb.read_remaining_bytes().is_empty());
    }

    #[test]
    fn test_remaining_bytes_after_partial_octet() {
        let mut bb = BitBuffer::from_bytes(&[0xa1, 0x02, 0x03]);
        bb.read_field(4, "high_nibble").unwrap();
        assert_eq!(bb.read_remaining_bytes(), vec![0x10, 0x20]);
        assert_eq!(bb.get_len_remaining(), 4);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut bb = BitBuffer::from_bytes(&[0b1010_0000, 0xff]);
        // Layer identification sits in bits 7 and 6
        assert_eq!(bb.peek_bits_at(1, 2), Some(0b01));
        assert_eq!(bb.peek_bits_at(12, 8), None);
        bb.seek(4);
        assert_eq!(bb.peek_bits(8), Some(0x0f));
        assert_eq!(bb.get_pos(), 4);
    }

    #[test]
    #[should_panic(expected = "write would exceed buffer end")]
    fn test_fixed_buffer_overflow() {
        let mut bb = BitBuffer::new(10);
        bb.write_bits(1, 11);
    }

    #[test]
    #[should_panic(expected = "value exceeds num_bits")]
    fn test_value_above_num_bits() {
        let mut bb = BitBuffer::new(4);
        bb.write_bits(0b11111, 4);
    }

    #[test]
    fn test_autoexpand_grows_with_writes() {
        let mut bb = BitBuffer::new_autoexpand(8);
        bb.write_bits(1, 1);
        bb.write_bits(0b10, 2);
        bb.write_bits(0b00011, 5);
        bb.write_bytes(&[0x08, 0x02]);
        assert_eq!(bb.get_len(), 24);
        assert_eq!(bb.into_bytes(), vec![0xc3, 0x08, 0x02]);
    }

    #[test]
    fn test_patch_length_octet() {
        let mut bb = BitBuffer::new_autoexpand(32);
        bb.write_bits(0x70, 8);
        bb.write_bits(0x00, 8);
        bb.write_bytes(&[0x81, 0x31]);
        bb.patch_octet(8, 2);
        assert_eq!(bb.get_pos(), 32);
        assert_eq!(bb.into_bytes(), vec![0x70, 0x02, 0x81, 0x31]);
    }

    #[test]
    fn test_partial_octet_is_padded() {
        let mut bb = BitBuffer::new_autoexpand(8);
        bb.write_bits(0b101, 3);
        assert_eq!(bb.into_bytes(), vec![0xa0]);
    }

    #[test]
    fn test_unaligned_write_then_read() {
        let mut bb = BitBuffer::new(48);
        bb.seek(5);
        let pattern: u32 = 0b10_1010_1111_0001_0010;
        bb.write_bits(pattern as u64, 20);
        bb.seek(5);
        assert_eq!(bb.read_bits(20).unwrap() as u32, pattern);
        assert!(!bb.is_octet_aligned());
    }
}
