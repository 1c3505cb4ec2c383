use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::coding_standard::CodingStandard;

/// B-channel units, the only channel type this stack allocates
const CHANNEL_TYPE_B: u64 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelInterfaceType {
    Basic,
    Primary,
}

/// Information channel selection together with the channel list of the primary rate layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSelection {
    NoChannel,
    Any,
    /// B-channel numbers. Basic rate carries exactly one, B1 or B2, in octet 3.
    /// Primary rate lists timeslot numbers in octet 3.3.
    BChannels(Vec<u8>),
    /// Primary rate slot map octets, as received
    SlotMap(Vec<u8>),
}

/// Q.931 4.5.13 Channel identification
/// Basic and primary rate interfaces use different layouts: the basic rate layout fits the
/// channel into octet 3, the primary rate layout appends octets 3.2 and 3.3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdentification {
    pub interface_type: ChannelInterfaceType,
    /// Octet 3.1, interface identifier octets (7 bits each)
    pub interface_id: Option<Vec<u8>>,
    /// Exclusive when set, preferred otherwise
    pub exclusive: bool,
    pub selection: ChannelSelection,
    /// Octet 3.2, primary rate only
    pub coding_standard: CodingStandard,
}

impl ChannelIdentification {
    pub fn new(interface_type: ChannelInterfaceType, selection: ChannelSelection, exclusive: bool) -> Self {
        ChannelIdentification {
            interface_type,
            interface_id: None,
            exclusive,
            selection,
            coding_standard: CodingStandard::Ccitt,
        }
    }

    /// Single B-channel on the given interface type
    pub fn b_channel(interface_type: ChannelInterfaceType, channel: u8, exclusive: bool) -> Self {
        Self::new(interface_type, ChannelSelection::BChannels(vec![channel]), exclusive)
    }

    /// Channel numbers requested by this element, empty for "any" and "no channel"
    pub fn channels(&self) -> &[u8] {
        match &self.selection {
            ChannelSelection::BChannels(v) => v,
            _ => &[],
        }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        // Octet 3
        let ext_3 = buffer.read_field(1, "ext_3")?;
        expect_ext!(ext_3, 1, "octet 3")?;
        let interface_id_present = buffer.read_field(1, "interface_id_present")? == 1;
        let interface_type = if buffer.read_field(1, "interface_type")? == 1 {
            ChannelInterfaceType::Primary
        } else {
            ChannelInterfaceType::Basic
        };
        buffer.read_field(1, "spare")?;
        let exclusive = buffer.read_field(1, "preferred_exclusive")? == 1;
        let d_channel = buffer.read_field(1, "d_channel_indicator")?;
        if d_channel == 1 {
            return Err(IeParseErr::Inconsistency { field: "d_channel_indicator", reason: "D-channel cannot carry a call" });
        }
        let info_channel_selection = buffer.read_field(2, "info_channel_selection")?;

        // Octet 3.1
        let interface_id = if interface_id_present {
            let mut id = Vec::new();
            loop {
                let ext = buffer.read_field(1, "ext_3.1")?;
                id.push(buffer.read_field(7, "interface_identifier")? as u8);
                if ext == 1 {
                    break;
                }
            }
            Some(id)
        } else {
            None
        };

        let mut coding_standard = CodingStandard::Ccitt;
        let selection = match (interface_type, info_channel_selection) {
            (_, 0) => ChannelSelection::NoChannel,
            (_, 3) => ChannelSelection::Any,
            (ChannelInterfaceType::Basic, n) => ChannelSelection::BChannels(vec![n as u8]),
            (ChannelInterfaceType::Primary, 1) => {
                // Octet 3.2
                let ext_32 = buffer.read_field(1, "ext_3.2")?;
                expect_ext!(ext_32, 1, "octet 3.2")?;
                let val = buffer.read_field(2, "coding_standard")?;
                coding_standard = CodingStandard::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "coding_standard", value: val })?;
                let slot_map = buffer.read_field(1, "number_map")? == 1;
                let channel_type = buffer.read_field(4, "channel_type")?;
                if channel_type != CHANNEL_TYPE_B {
                    return Err(IeParseErr::InvalidValue { field: "channel_type", value: channel_type });
                }

                // Octet 3.3
                if slot_map {
                    let map = buffer.read_remaining_bytes();
                    if map.is_empty() {
                        return Err(IeParseErr::BufferEnded { field: Some("slot_map") });
                    }
                    ChannelSelection::SlotMap(map)
                } else {
                    let mut channels = Vec::new();
                    loop {
                        let ext = buffer.read_field(1, "ext_3.3")?;
                        channels.push(buffer.read_field(7, "channel_number")? as u8);
                        if ext == 1 {
                            break;
                        }
                    }
                    ChannelSelection::BChannels(channels)
                }
            }
            (ChannelInterfaceType::Primary, n) => {
                return Err(IeParseErr::InvalidValue { field: "info_channel_selection", value: n });
            }
        };

        Ok(ChannelIdentification {
            interface_type,
            interface_id,
            exclusive,
            selection,
            coding_standard,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        let primary = self.interface_type == ChannelInterfaceType::Primary;
        let info_channel_selection = match (&self.selection, primary) {
            (ChannelSelection::NoChannel, _) => 0,
            (ChannelSelection::Any, _) => 3,
            (ChannelSelection::BChannels(ch), false) => match ch.as_slice() {
                [1] => 1,
                [2] => 2,
                _ => return Err(IeParseErr::Inconsistency { field: "selection", reason: "basic rate selects exactly one of B1, B2" }),
            },
            (ChannelSelection::BChannels(ch) | ChannelSelection::SlotMap(ch), true) if ch.is_empty() => {
                return Err(IeParseErr::Inconsistency { field: "selection", reason: "empty channel list" });
            }
            (ChannelSelection::SlotMap(_), false) => {
                return Err(IeParseErr::Inconsistency { field: "selection", reason: "slot map on basic rate interface" });
            }
            (_, true) => 1,
        };

        // Octet 3
        buffer.write_bits(1, 1);
        buffer.write_bits(self.interface_id.is_some() as u64, 1);
        buffer.write_bits(primary as u64, 1);
        buffer.write_bits(0, 1);
        buffer.write_bits(self.exclusive as u64, 1);
        buffer.write_bits(0, 1);
        buffer.write_bits(info_channel_selection, 2);

        // Octet 3.1
        if let Some(id) = &self.interface_id {
            if id.is_empty() {
                return Err(IeParseErr::Inconsistency { field: "interface_id", reason: "empty interface identifier" });
            }
            for (i, v) in id.iter().enumerate() {
                buffer.write_bits((i == id.len() - 1) as u64, 1);
                buffer.write_bits(*v as u64 & 0x7F, 7);
            }
        }

        if !primary || info_channel_selection != 1 {
            return Ok(());
        }

        // Octet 3.2
        let slot_map = matches!(self.selection, ChannelSelection::SlotMap(_));
        buffer.write_bits(1, 1);
        buffer.write_bits(self.coding_standard.into_raw(), 2);
        buffer.write_bits(slot_map as u64, 1);
        buffer.write_bits(CHANNEL_TYPE_B, 4);

        // Octet 3.3
        match &self.selection {
            ChannelSelection::SlotMap(map) => buffer.write_bytes(map),
            ChannelSelection::BChannels(channels) => {
                for (i, ch) in channels.iter().enumerate() {
                    buffer.write_bits((i == channels.len() - 1) as u64, 1);
                    buffer.write_bits(*ch as u64 & 0x7F, 7);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for ChannelIdentification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ChannelIdentification {{ interface_type: {:?} {} selection: {:?}",
            self.interface_type,
            if self.exclusive { "exclusive" } else { "preferred" },
            self.selection,
        )?;
        if let Some(id) = &self.interface_id {
            write!(f, " interface_id: {:02x?}", id)?;
        }
        write!(f, " }}")
    }
}
