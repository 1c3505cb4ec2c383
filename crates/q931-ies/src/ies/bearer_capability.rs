use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::{
    coding_standard::CodingStandard, information_transfer_capability::InformationTransferCapability,
    information_transfer_rate::InformationTransferRate, transfer_mode::TransferMode, user_info_layer1::UserInfoLayer1,
};
use crate::fields::layer_info::{Layer1Info, LayerContext, UserLayers};

/// Q.931 4.5.5 Bearer capability
/// Mandatory in SETUP. Requests a bearer service to be provided by the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerCapability {
    pub coding_standard: CodingStandard,
    pub information_transfer_capability: InformationTransferCapability,
    pub transfer_mode: TransferMode,
    pub information_transfer_rate: InformationTransferRate,
    /// Octet 4.1, present only with the multirate information transfer rate
    pub rate_multiplier: Option<u8>,
    /// Octets 5, 6 and 7
    pub layers: UserLayers,
}

impl BearerCapability {
    /// 64 kbit/s circuit mode speech with the given G.711 law
    pub fn speech(law: UserInfoLayer1) -> Self {
        BearerCapability {
            coding_standard: CodingStandard::Ccitt,
            information_transfer_capability: InformationTransferCapability::Speech,
            transfer_mode: TransferMode::Circuit,
            information_transfer_rate: InformationTransferRate::Rate64k,
            rate_multiplier: None,
            layers: UserLayers {
                layer1: Some(Layer1Info { protocol: law, rate_adaption: None }),
                layer2: None,
                layer3: None,
            },
        }
    }

    /// 64 kbit/s unrestricted digital information, no user layers
    pub fn unrestricted_digital() -> Self {
        BearerCapability {
            coding_standard: CodingStandard::Ccitt,
            information_transfer_capability: InformationTransferCapability::UnrestrictedDigital,
            transfer_mode: TransferMode::Circuit,
            information_transfer_rate: InformationTransferRate::Rate64k,
            rate_multiplier: None,
            layers: UserLayers::default(),
        }
    }

    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        // Octet 3
        let ext_3 = buffer.read_field(1, "ext_3")?;
        expect_ext!(ext_3, 1, "octet 3")?;
        let val = buffer.read_field(2, "coding_standard")?;
        let coding_standard = CodingStandard::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "coding_standard", value: val })?;
        let val = buffer.read_field(5, "information_transfer_capability")?;
        let information_transfer_capability = InformationTransferCapability::try_from(val)
            .map_err(|_| IeParseErr::InvalidValue { field: "information_transfer_capability", value: val })?;

        // Octet 4
        let ext_4 = buffer.read_field(1, "ext_4")?;
        expect_ext!(ext_4, 1, "octet 4")?;
        let val = buffer.read_field(2, "transfer_mode")?;
        let transfer_mode = TransferMode::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "transfer_mode", value: val })?;
        let val = buffer.read_field(5, "information_transfer_rate")?;
        let information_transfer_rate = InformationTransferRate::try_from(val)
            .map_err(|_| IeParseErr::InvalidValue { field: "information_transfer_rate", value: val })?;

        // Octet 4.1
        let rate_multiplier = if information_transfer_rate == InformationTransferRate::Multirate {
            let ext_41 = buffer.read_field(1, "ext_4.1")?;
            expect_ext!(ext_41, 1, "octet 4.1")?;
            Some(buffer.read_field(7, "rate_multiplier")? as u8)
        } else {
            None
        };

        let layers = UserLayers::from_bitbuf(buffer, LayerContext::BearerCapability)?;

        Ok(BearerCapability {
            coding_standard,
            information_transfer_capability,
            transfer_mode,
            information_transfer_rate,
            rate_multiplier,
            layers,
        })
    }

    pub fn to_bitbuf(&self, buffer: &mut BitBuffer) -> Result<(), IeParseErr> {
        let multirate = self.information_transfer_rate == InformationTransferRate::Multirate;
        if multirate != self.rate_multiplier.is_some() {
            return Err(IeParseErr::Inconsistency { field: "rate_multiplier", reason: "present if and only if multirate" });
        }

        buffer.write_bits(1, 1);
        buffer.write_bits(self.coding_standard.into_raw(), 2);
        buffer.write_bits(self.information_transfer_capability.into_raw(), 5);

        buffer.write_bits(1, 1);
        buffer.write_bits(self.transfer_mode.into_raw(), 2);
        buffer.write_bits(self.information_transfer_rate.into_raw(), 5);

        if let Some(m) = self.rate_multiplier {
            buffer.write_bits(1, 1);
            buffer.write_bits(m as u64 & 0x7F, 7);
        }

        self.layers.to_bitbuf(buffer, LayerContext::BearerCapability)
    }
}

impl fmt::Display for BearerCapability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BearerCapability {{ coding_standard: {} information_transfer_capability: {} transfer_mode: {} information_transfer_rate: {}",
            self.coding_standard, self.information_transfer_capability, self.transfer_mode, self.information_transfer_rate,
        )?;
        if let Some(m) = self.rate_multiplier {
            write!(f, " rate_multiplier: {}", m)?;
        }
        write!(f, "{} }}", self.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{user_info_layer2::UserInfoLayer2, user_info_layer3::UserInfoLayer3};
    use crate::fields::layer_info::{Layer2Info, Layer3Info};
    use q931_core::debug;

    fn encode(bc: &BearerCapability) -> Vec<u8> {
        let mut buf = BitBuffer::new_autoexpand(64);
        bc.to_bitbuf(&mut buf).unwrap();
        buf.into_bytes()
    }

    #[test]
    fn test_parse_speech_alaw() {
        debug::setup_logging_verbose();
        let bytes = hex::decode("8090a3").unwrap();
        let mut buf = BitBuffer::from_bytes(&bytes);
        let bc = BearerCapability::from_bitbuf(&mut buf).unwrap();
        tracing::info!("Parsed: {}", bc);
        assert_eq!(bc, BearerCapability::speech(UserInfoLayer1::G711Alaw));
        assert_eq!(encode(&bc), bytes);
    }

    #[test]
    fn test_multirate() {
        debug::setup_logging_verbose();
        let mut bc = BearerCapability::unrestricted_digital();
        bc.information_transfer_rate = InformationTransferRate::Multirate;
        bc.rate_multiplier = Some(6);
        let bytes = encode(&bc);
        assert_eq!(bytes, hex::decode("889886").unwrap());
        let mut buf = BitBuffer::from_bytes(&bytes);
        assert_eq!(BearerCapability::from_bitbuf(&mut buf).unwrap(), bc);

        bc.rate_multiplier = None;
        let mut out = BitBuffer::new_autoexpand(8);
        assert!(bc.to_bitbuf(&mut out).is_err());
    }

    #[test]
    fn test_all_layers() {
        debug::setup_logging_verbose();
        let mut bc = BearerCapability::speech(UserInfoLayer1::G711Mulaw);
        bc.layers.layer2 = Some(Layer2Info { protocol: UserInfoLayer2::Q921, oct_6a: None, window_size: None });
        bc.layers.layer3 = Some(Layer3Info::new(UserInfoLayer3::Q931));
        let bytes = encode(&bc);
        assert_eq!(bytes, hex::decode("8090a2c2e2").unwrap());
        let mut buf = BitBuffer::from_bytes(&bytes);
        assert_eq!(BearerCapability::from_bitbuf(&mut buf).unwrap(), bc);
    }

    #[test]
    fn test_truncated() {
        debug::setup_logging_verbose();
        let mut buf = BitBuffer::from_bytes(&[0x80]);
        assert_eq!(BearerCapability::from_bitbuf(&mut buf), Err(IeParseErr::BufferEnded { field: Some("ext_4") }));
    }
}
