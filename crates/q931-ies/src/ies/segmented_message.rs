use core::fmt;

use q931_core::{BitBuffer, IeParseErr};

/// Q.931 4.5.26 Segmented message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentedMessage {
    pub first_segment: bool,
    /// 7 bits
    pub segments_remaining: u8,
    /// Message type of the message being segmented, 7 bits
    pub segmented_message_type: u8,
}

impl SegmentedMessage {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        let first_segment = buffer.read_field(1, "first_segment_indicator")? == 1;
        let segments_remaining = buffer.read_field(7, "segments_remaining")? as u8;
        buffer.read_field(1, "spare")?;
        let segmented_message_type = buffer.read_field(7, "segmented_message_type")? as u8;
        Ok(SegmentedMessage { first_segment, segments_remaining, segmented_message_type })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        buffer.write_bits(self.first_segment as u64, 1);
        buffer.write_bits(self.segments_remaining as u64 & 0x7F, 7);
        buffer.write_bits(0, 1);
        buffer.write_bits(self.segmented_message_type as u64 & 0x7F, 7);
        Ok(())
    }
}

impl fmt::Display for SegmentedMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SegmentedMessage {{ first_segment: {} segments_remaining: {} segmented_message_type: 0x{:02x} }}",
            self.first_segment, self.segments_remaining, self.segmented_message_type
        )
    }
}
