use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::{user_info_layer1::UserInfoLayer1, user_info_layer2::UserInfoLayer2, user_info_layer3::UserInfoLayer3};

/// Octet 5b, whose layout depends on the layer 1 rate adaption protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oct5b {
    V110 {
        /// 2 bits: 1 = 8 kbit/s, 2 = 16 kbit/s, 3 = 32 kbit/s
        intermediate_rate: u8,
        nic_tx: bool,
        nic_rx: bool,
        flow_control_tx: bool,
        flow_control_rx: bool,
    },
    V120 {
        rate_adaption_header: bool,
        multiple_frame: bool,
        /// Protocol sensitive mode when set, bit transparent otherwise
        protocol_sensitive: bool,
        lli_negotiation: bool,
        assignor: bool,
        inband_negotiation: bool,
    },
    /// Any other protocol, 7 payload bits
    Other(u8),
}

impl Oct5b {
    fn from_raw(protocol: UserInfoLayer1, raw: u8) -> Self {
        let bit = |n: u8| (raw >> n) & 1 == 1;
        match protocol {
            UserInfoLayer1::V110 => Oct5b::V110 {
                intermediate_rate: (raw >> 5) & 0x03,
                nic_tx: bit(4),
                nic_rx: bit(3),
                flow_control_tx: bit(2),
                flow_control_rx: bit(1),
            },
            UserInfoLayer1::V120 => Oct5b::V120 {
                rate_adaption_header: bit(6),
                multiple_frame: bit(5),
                protocol_sensitive: bit(4),
                lli_negotiation: bit(3),
                assignor: bit(2),
                inband_negotiation: bit(1),
            },
            _ => Oct5b::Other(raw & 0x7F),
        }
    }

    fn to_raw(self) -> u8 {
        let b = |v: bool, n: u8| (v as u8) << n;
        match self {
            Oct5b::V110 { intermediate_rate, nic_tx, nic_rx, flow_control_tx, flow_control_rx } => {
                ((intermediate_rate & 0x03) << 5) | b(nic_tx, 4) | b(nic_rx, 3) | b(flow_control_tx, 2) | b(flow_control_rx, 1)
            }
            Oct5b::V120 { rate_adaption_header, multiple_frame, protocol_sensitive, lli_negotiation, assignor, inband_negotiation } => {
                b(rate_adaption_header, 6)
                    | b(multiple_frame, 5)
                    | b(protocol_sensitive, 4)
                    | b(lli_negotiation, 3)
                    | b(assignor, 2)
                    | b(inband_negotiation, 1)
            }
            Oct5b::Other(raw) => raw & 0x7F,
        }
    }
}

/// Octet 5c, asynchronous character framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oct5c {
    /// 2 bits: 1 = 1 bit, 2 = 1.5 bits, 3 = 2 bits
    pub stop_bits: u8,
    /// 2 bits: 1 = 5 bits, 2 = 7 bits, 3 = 8 bits
    pub data_bits: u8,
    /// 3 bits: 0 odd, 2 even, 3 none, 4 forced to 0, 5 forced to 1
    pub parity: u8,
}

/// Octet 5d
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oct5d {
    pub full_duplex: bool,
    /// 6 bits
    pub modem_type: u8,
}

/// Octets 5a-5d
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateAdaption {
    pub asynchronous: bool,
    pub negotiation: bool,
    /// 5 bits, e.g. 0x0F = 56 kbit/s, 0x08 = 9.6 kbit/s
    pub user_rate: u8,
    pub oct_5b: Option<Oct5b>,
    pub oct_5c: Option<Oct5c>,
    pub oct_5d: Option<Oct5d>,
}

/// Octet 5 group: user information layer 1 protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer1Info {
    pub protocol: UserInfoLayer1,
    pub rate_adaption: Option<RateAdaption>,
}

/// Octet 6 group: user information layer 2 protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer2Info {
    pub protocol: UserInfoLayer2,
    /// Octet 6a, 7 bits. Mode of operation and Q.933 use, or user specified protocol information.
    /// Low layer compatibility only.
    pub oct_6a: Option<u8>,
    /// Octet 6b, window size k. Low layer compatibility only.
    pub window_size: Option<u8>,
}

/// Octet 7 group: user information layer 3 protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer3Info {
    pub protocol: UserInfoLayer3,
    /// Octet 7a, 7 bits. In bearer capability only present for ISO/IEC TR 9577,
    /// carrying the high nibble of the additional layer 3 protocol information.
    pub oct_7a: Option<u8>,
    /// Octet 7b, 7 bits. Default packet size (LLC) or the low nibble of the additional protocol information (BC)
    pub oct_7b: Option<u8>,
    /// Octet 7c, packet window size. Low layer compatibility only.
    pub oct_7c: Option<u8>,
}

impl Layer3Info {
    pub fn new(protocol: UserInfoLayer3) -> Self {
        Layer3Info { protocol, oct_7a: None, oct_7b: None, oct_7c: None }
    }

    /// ISO/IEC TR 9577 protocol with an additional layer 3 protocol identifier, split over octets 7a and 7b
    pub fn tr9577(additional_protocol: u8) -> Self {
        Layer3Info {
            protocol: UserInfoLayer3::Tr9577,
            oct_7a: Some(additional_protocol >> 4),
            oct_7b: Some(additional_protocol & 0x0F),
            oct_7c: None,
        }
    }

    pub fn additional_protocol(&self) -> Option<u8> {
        match (self.protocol, self.oct_7a, self.oct_7b) {
            (UserInfoLayer3::Tr9577, Some(hi), Some(lo)) => Some(((hi & 0x0F) << 4) | (lo & 0x0F)),
            _ => None,
        }
    }
}

/// Which element the layer octets belong to. The bearer capability carries fewer extension octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerContext {
    BearerCapability,
    LowLayerCompatibility,
}

/// Octets 5, 6 and 7 of bearer capability and low layer compatibility, each group optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserLayers {
    pub layer1: Option<Layer1Info>,
    pub layer2: Option<Layer2Info>,
    pub layer3: Option<Layer3Info>,
}

fn parse_enum<T: TryFrom<u64>>(val: u64, field: &'static str) -> Result<T, IeParseErr> {
    T::try_from(val).map_err(|_| IeParseErr::InvalidValue { field, value: val })
}

impl UserLayers {
    /// Parse layer groups until the buffer is exhausted. Groups are identified by the layer
    /// identification bits and must appear in ascending order.
    pub fn from_bitbuf(buffer: &mut BitBuffer, ctx: LayerContext) -> Result<Self, IeParseErr> {
        let mut layers = UserLayers::default();
        let mut last_layer = 0;

        while buffer.get_len_remaining() >= 8 {
            let layer_id = buffer.peek_bits_at(buffer.get_pos() + 1, 2).unwrap_or(0);
            if layer_id == 0 {
                return Err(IeParseErr::InvalidValue { field: "layer_identification", value: 0 });
            }
            if layer_id <= last_layer {
                return Err(IeParseErr::Inconsistency { field: "layer_identification", reason: "layer octets out of order" });
            }
            last_layer = layer_id;

            match layer_id {
                1 => layers.layer1 = Some(Self::read_layer1(buffer)?),
                2 => layers.layer2 = Some(Self::read_layer2(buffer, ctx)?),
                _ => layers.layer3 = Some(Self::read_layer3(buffer, ctx)?),
            }
        }
        Ok(layers)
    }

    fn read_layer1(buffer: &mut BitBuffer) -> Result<Layer1Info, IeParseErr> {
        // Octet 5
        let ext_5 = buffer.read_field(1, "ext_5")?;
        buffer.read_field(2, "layer_identification")?;
        let protocol: UserInfoLayer1 = parse_enum(buffer.read_field(5, "user_info_layer1")?, "user_info_layer1")?;
        if ext_5 == 1 {
            return Ok(Layer1Info { protocol, rate_adaption: None });
        }

        // Octet 5a
        let ext_5a = buffer.read_field(1, "ext_5a")?;
        let asynchronous = buffer.read_field(1, "synchronous_asynchronous")? == 1;
        let negotiation = buffer.read_field(1, "negotiation")? == 1;
        let user_rate = buffer.read_field(5, "user_rate")? as u8;
        let mut ra = RateAdaption { asynchronous, negotiation, user_rate, oct_5b: None, oct_5c: None, oct_5d: None };

        if ext_5a == 0 {
            // Octet 5b
            let ext_5b = buffer.read_field(1, "ext_5b")?;
            let raw = buffer.read_field(7, "oct_5b")? as u8;
            ra.oct_5b = Some(Oct5b::from_raw(protocol, raw));

            if ext_5b == 0 {
                // Octet 5c
                let ext_5c = buffer.read_field(1, "ext_5c")?;
                let stop_bits = buffer.read_field(2, "stop_bits")? as u8;
                let data_bits = buffer.read_field(2, "data_bits")? as u8;
                let parity = buffer.read_field(3, "parity")? as u8;
                ra.oct_5c = Some(Oct5c { stop_bits, data_bits, parity });

                if ext_5c == 0 {
                    // Octet 5d
                    let ext_5d = buffer.read_field(1, "ext_5d")?;
                    expect_ext!(ext_5d, 1, "octet 5d")?;
                    let full_duplex = buffer.read_field(1, "duplex_mode")? == 1;
                    let modem_type = buffer.read_field(6, "modem_type")? as u8;
                    ra.oct_5d = Some(Oct5d { full_duplex, modem_type });
                }
            }
        }
        Ok(Layer1Info { protocol, rate_adaption: Some(ra) })
    }

    fn read_layer2(buffer: &mut BitBuffer, ctx: LayerContext) -> Result<Layer2Info, IeParseErr> {
        // Octet 6
        let ext_6 = buffer.read_field(1, "ext_6")?;
        buffer.read_field(2, "layer_identification")?;
        let protocol: UserInfoLayer2 = parse_enum(buffer.read_field(5, "user_info_layer2")?, "user_info_layer2")?;
        let mut l2 = Layer2Info { protocol, oct_6a: None, window_size: None };
        if ext_6 == 1 {
            return Ok(l2);
        }
        if ctx == LayerContext::BearerCapability {
            return Err(IeParseErr::InvalidExtBit { field: "octet 6" });
        }

        // Octet 6a
        let ext_6a = buffer.read_field(1, "ext_6a")?;
        l2.oct_6a = Some(buffer.read_field(7, "oct_6a")? as u8);
        if ext_6a == 0 {
            // Octet 6b
            let ext_6b = buffer.read_field(1, "ext_6b")?;
            expect_ext!(ext_6b, 1, "octet 6b")?;
            l2.window_size = Some(buffer.read_field(7, "window_size")? as u8);
        }
        Ok(l2)
    }

    fn read_layer3(buffer: &mut BitBuffer, ctx: LayerContext) -> Result<Layer3Info, IeParseErr> {
        // Octet 7
        let ext_7 = buffer.read_field(1, "ext_7")?;
        buffer.read_field(2, "layer_identification")?;
        let protocol: UserInfoLayer3 = parse_enum(buffer.read_field(5, "user_info_layer3")?, "user_info_layer3")?;
        let mut l3 = Layer3Info::new(protocol);
        if ext_7 == 1 {
            return Ok(l3);
        }
        if ctx == LayerContext::BearerCapability && protocol != UserInfoLayer3::Tr9577 {
            return Err(IeParseErr::InvalidExtBit { field: "octet 7" });
        }

        // Octet 7a
        let ext_7a = buffer.read_field(1, "ext_7a")?;
        l3.oct_7a = Some(buffer.read_field(7, "oct_7a")? as u8);
        if ext_7a == 1 {
            if ctx == LayerContext::BearerCapability {
                // 7a and 7b always come as a pair in the bearer capability
                return Err(IeParseErr::InvalidExtBit { field: "octet 7a" });
            }
            return Ok(l3);
        }

        // Octet 7b
        let ext_7b = buffer.read_field(1, "ext_7b")?;
        l3.oct_7b = Some(buffer.read_field(7, "oct_7b")? as u8);
        if ext_7b == 1 {
            return Ok(l3);
        }
        if ctx == LayerContext::BearerCapability {
            return Err(IeParseErr::InvalidExtBit { field: "octet 7b" });
        }

        // Octet 7c
        let ext_7c = buffer.read_field(1, "ext_7c")?;
        expect_ext!(ext_7c, 1, "octet 7c")?;
        l3.oct_7c = Some(buffer.read_field(7, "oct_7c")? as u8);
        Ok(l3)
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer, ctx: LayerContext) -> Result<(), IeParseErr> {
        if let Some(l1) = &self.layer1 {
            Self::write_layer1(buffer, l1)?;
        }
        if let Some(l2) = &self.layer2 {
            Self::write_layer2(buffer, l2, ctx)?;
        }
        if let Some(l3) = &self.layer3 {
            Self::write_layer3(buffer, l3, ctx)?;
        }
        Ok(())
    }

    fn write_layer1(buffer: &mut BitBuffer, l1: &Layer1Info) -> Result<(), IeParseErr> {
        buffer.write_bits(l1.rate_adaption.is_none() as u64, 1);
        buffer.write_bits(1, 2);
        buffer.write_bits(l1.protocol.into_raw(), 5);

        let Some(ra) = &l1.rate_adaption else {
            return Ok(());
        };
        if ra.oct_5c.is_some() && ra.oct_5b.is_none() {
            return Err(IeParseErr::Inconsistency { field: "oct_5c", reason: "octet 5c requires octet 5b" });
        }
        if ra.oct_5d.is_some() && ra.oct_5c.is_none() {
            return Err(IeParseErr::Inconsistency { field: "oct_5d", reason: "octet 5d requires octet 5c" });
        }

        // Octet 5a
        buffer.write_bits(ra.oct_5b.is_none() as u64, 1);
        buffer.write_bits(ra.asynchronous as u64, 1);
        buffer.write_bits(ra.negotiation as u64, 1);
        buffer.write_bits(ra.user_rate as u64 & 0x1F, 5);

        if let Some(oct_5b) = ra.oct_5b {
            buffer.write_bits(ra.oct_5c.is_none() as u64, 1);
            buffer.write_bits(oct_5b.to_raw() as u64, 7);
        }
        if let Some(c) = ra.oct_5c {
            buffer.write_bits(ra.oct_5d.is_none() as u64, 1);
            buffer.write_bits(c.stop_bits as u64 & 0x03, 2);
            buffer.write_bits(c.data_bits as u64 & 0x03, 2);
            buffer.write_bits(c.parity as u64 & 0x07, 3);
        }
        if let Some(d) = ra.oct_5d {
            buffer.write_bits(1, 1);
            buffer.write_bits(d.full_duplex as u64, 1);
            buffer.write_bits(d.modem_type as u64 & 0x3F, 6);
        }
        Ok(())
    }

    fn write_layer2(buffer: &mut BitBuffer, l2: &Layer2Info, ctx: LayerContext) -> Result<(), IeParseErr> {
        if ctx == LayerContext::BearerCapability && (l2.oct_6a.is_some() || l2.window_size.is_some()) {
            return Err(IeParseErr::Inconsistency { field: "layer2", reason: "bearer capability carries octet 6 only" });
        }
        if l2.window_size.is_some() && l2.oct_6a.is_none() {
            return Err(IeParseErr::Inconsistency { field: "window_size", reason: "octet 6b requires octet 6a" });
        }

        buffer.write_bits(l2.oct_6a.is_none() as u64, 1);
        buffer.write_bits(2, 2);
        buffer.write_bits(l2.protocol.into_raw(), 5);
        if let Some(a) = l2.oct_6a {
            buffer.write_bits(l2.window_size.is_none() as u64, 1);
            buffer.write_bits(a as u64 & 0x7F, 7);
        }
        if let Some(k) = l2.window_size {
            buffer.write_bits(1, 1);
            buffer.write_bits(k as u64 & 0x7F, 7);
        }
        Ok(())
    }

    fn write_layer3(buffer: &mut BitBuffer, l3: &Layer3Info, ctx: LayerContext) -> Result<(), IeParseErr> {
        if l3.oct_7b.is_some() && l3.oct_7a.is_none() {
            return Err(IeParseErr::Inconsistency { field: "oct_7b", reason: "octet 7b requires octet 7a" });
        }
        if l3.oct_7c.is_some() && l3.oct_7b.is_none() {
            return Err(IeParseErr::Inconsistency { field: "oct_7c", reason: "octet 7c requires octet 7b" });
        }
        if ctx == LayerContext::BearerCapability {
            let has_ext = l3.oct_7a.is_some();
            if has_ext && (l3.protocol != UserInfoLayer3::Tr9577 || l3.oct_7b.is_none() || l3.oct_7c.is_some()) {
                return Err(IeParseErr::Inconsistency {
                    field: "layer3",
                    reason: "bearer capability carries octets 7a/7b only for TR 9577",
                });
            }
        }

        buffer.write_bits(l3.oct_7a.is_none() as u64, 1);
        buffer.write_bits(3, 2);
        buffer.write_bits(l3.protocol.into_raw(), 5);
        if let Some(a) = l3.oct_7a {
            buffer.write_bits(l3.oct_7b.is_none() as u64, 1);
            buffer.write_bits(a as u64 & 0x7F, 7);
        }
        if let Some(b) = l3.oct_7b {
            buffer.write_bits(l3.oct_7c.is_none() as u64, 1);
            buffer.write_bits(b as u64 & 0x7F, 7);
        }
        if let Some(c) = l3.oct_7c {
            buffer.write_bits(1, 1);
            buffer.write_bits(c as u64 & 0x7F, 7);
        }
        Ok(())
    }
}

impl fmt::Display for UserLayers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(l1) = &self.layer1 {
            write!(f, " l1: {}", l1.protocol)?;
            if let Some(ra) = &l1.rate_adaption {
                write!(f, " {:?}", ra)?;
            }
        }
        if let Some(l2) = &self.layer2 {
            write!(f, " l2: {}", l2.protocol)?;
        }
        if let Some(l3) = &self.layer3 {
            write!(f, " l3: {}", l3.protocol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_core::debug;

    fn roundtrip(layers: &UserLayers, ctx: LayerContext) -> Vec<u8> {
        let mut buf = BitBuffer::new_autoexpand(64);
        layers.to_bitbuf(&mut buf, ctx).unwrap();
        let bytes = buf.into_bytes();
        let mut rd = BitBuffer::from_bytes(&bytes);
        assert_eq!(&UserLayers::from_bitbuf(&mut rd, ctx).unwrap(), layers);
        bytes
    }

    #[test]
    fn test_layer_presence_permutations() {
        debug::setup_logging_verbose();
        let l1 = Layer1Info { protocol: UserInfoLayer1::G711Alaw, rate_adaption: None };
        let l2 = Layer2Info { protocol: UserInfoLayer2::Q921, oct_6a: None, window_size: None };
        let l3 = Layer3Info::new(UserInfoLayer3::Q931);

        for mask in 0..8u8 {
            let layers = UserLayers {
                layer1: (mask & 1 != 0).then_some(l1),
                layer2: (mask & 2 != 0).then_some(l2),
                layer3: (mask & 4 != 0).then_some(l3),
            };
            for ctx in [LayerContext::BearerCapability, LayerContext::LowLayerCompatibility] {
                let bytes = roundtrip(&layers, ctx);
                assert_eq!(bytes.len(), mask.count_ones() as usize);
            }
        }
    }

    #[test]
    fn test_v110_rate_adaption() {
        debug::setup_logging_verbose();
        // V.110, async 9.6 kbit/s, 8 kbit/s intermediate rate, 1 stop bit, 8 data bits, no parity, full duplex
        let bytes = hex::decode("21484c3bc0").unwrap();
        let mut buf = BitBuffer::from_bytes(&bytes);
        let layers = UserLayers::from_bitbuf(&mut buf, LayerContext::BearerCapability).unwrap();
        let ra = layers.layer1.unwrap().rate_adaption.unwrap();
        assert!(ra.asynchronous);
        assert_eq!(ra.user_rate, 0x08);
        assert_eq!(
            ra.oct_5b,
            Some(Oct5b::V110 { intermediate_rate: 2, nic_tx: false, nic_rx: true, flow_control_tx: true, flow_control_rx: false })
        );
        assert_eq!(ra.oct_5c, Some(Oct5c { stop_bits: 1, data_bits: 3, parity: 3 }));
        assert_eq!(ra.oct_5d, Some(Oct5d { full_duplex: true, modem_type: 0 }));
        assert_eq!(roundtrip(&layers, LayerContext::BearerCapability), bytes);
    }

    #[test]
    fn test_llc_extension_octets() {
        debug::setup_logging_verbose();
        let layers = UserLayers {
            layer1: None,
            layer2: Some(Layer2Info { protocol: UserInfoLayer2::X25Link, oct_6a: Some(0x40), window_size: Some(7) }),
            layer3: Some(Layer3Info {
                protocol: UserInfoLayer3::X25Packet,
                oct_7a: Some(0x40),
                oct_7b: Some(0x07),
                oct_7c: Some(0x02),
            }),
        };
        let bytes = roundtrip(&layers, LayerContext::LowLayerCompatibility);
        assert_eq!(bytes, hex::decode("46408766400782").unwrap());

        // Not representable in a bearer capability
        let mut buf = BitBuffer::new_autoexpand(64);
        assert!(layers.to_bitbuf(&mut buf, LayerContext::BearerCapability).is_err());
        let mut rd = BitBuffer::from_bytes(&bytes);
        assert_eq!(
            UserLayers::from_bitbuf(&mut rd, LayerContext::BearerCapability),
            Err(IeParseErr::InvalidExtBit { field: "octet 6" })
        );
    }

    #[test]
    fn test_bc_tr9577() {
        debug::setup_logging_verbose();
        let layers = UserLayers { layer1: None, layer2: None, layer3: Some(Layer3Info::tr9577(0xCC)) };
        let bytes = roundtrip(&layers, LayerContext::BearerCapability);
        assert_eq!(bytes, hex::decode("6b0c8c").unwrap());
        assert_eq!(layers.layer3.unwrap().additional_protocol(), Some(0xCC));
    }

    #[test]
    fn test_layers_out_of_order() {
        debug::setup_logging_verbose();
        // Layer 3 followed by layer 1
        let mut buf = BitBuffer::from_bytes(&[0xE2, 0xA3]);
        assert!(matches!(
            UserLayers::from_bitbuf(&mut buf, LayerContext::LowLayerCompatibility),
            Err(IeParseErr::Inconsistency { .. })
        ));
    }
}
