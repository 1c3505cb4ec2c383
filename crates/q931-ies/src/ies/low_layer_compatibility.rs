use core::fmt;

use q931_core::{BitBuffer, IeParseErr, expect_ext};

use crate::enums::{
    coding_standard::CodingStandard, information_transfer_capability::InformationTransferCapability,
    information_transfer_rate::InformationTransferRate, transfer_mode::TransferMode,
};
use crate::fields::layer_info::{LayerContext, UserLayers};

/// Q.931 4.5.19 Low layer compatibility
/// Carried transparently between the users. Unlike the bearer capability it may hold
/// the layer 2 and layer 3 extension octets 6a, 6b and 7a to 7c.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowLayerCompatibility {
    pub coding_standard: CodingStandard,
    pub information_transfer_capability: InformationTransferCapability,
    /// Octet 3a, out-band negotiation possible
    pub out_band_negotiation: Option<bool>,
    pub transfer_mode: TransferMode,
    pub information_transfer_rate: InformationTransferRate,
    pub rate_multiplier: Option<u8>,
    pub layers: UserLayers,
}

impl LowLayerCompatibility {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, IeParseErr> {
        // Octet 3
        let ext_3 = buffer.read_field(1, "ext_3")?;
        let val = buffer.read_field(2, "coding_standard")?;
        let coding_standard = CodingStandard::try_from(val).map_err(|_| IeParseErr::InvalidValue { field: "coding_standard", value: val })?;
        let val = buffer.read_field(5, "information_transfer_capability")?;
        let information_transfer_capability = InformationTransferCapability::try_from(val)
            .map_err(|_| IeParseErr::InvalidValue { field: "information_transfer_capability", value: val })?;

        // Octet 3a
        let out_band_negotiation = if ext_3 == 0 {
            let ext_3a = buffer.read_field(1, "ext_3a")?;
            expect_ext!(ext_3a, 1, "octet 3a")?;
            let negotiation = buffer.read_field(1, "negotiation_indicator")? == 1;
            buffer.read_field(6, "spare")?;
            Some(negotiation)
        } else {
            None
        };

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

        let layers = UserLayers::from_bitbuf(buffer, LayerContext::LowLayerCompatibility)?;

        Ok(LowLayerCompatibility {
            coding_standard,
            information_transfer_capability,
            out_band_negotiation,
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

        buffer.write_bits(self.out_band_negotiation.is_none() as u64, 1);
        buffer.write_bits(self.coding_standard.into_raw(), 2);
        buffer.write_bits(self.information_transfer_capability.into_raw(), 5);

        if let Some(negotiation) = self.out_band_negotiation {
            buffer.write_bits(1, 1);
            buffer.write_bits(negotiation as u64, 1);
            buffer.write_bits(0, 6);
        }

        buffer.write_bits(1, 1);
        buffer.write_bits(self.transfer_mode.into_raw(), 2);
        buffer.write_bits(self.information_transfer_rate.into_raw(), 5);

        if let Some(m) = self.rate_multiplier {
            buffer.write_bits(1, 1);
            buffer.write_bits(m as u64 & 0x7F, 7);
        }

        self.layers.to_bitbuf(buffer, LayerContext::LowLayerCompatibility)
    }
}

impl fmt::Display for LowLayerCompatibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LowLayerCompatibility {{ coding_standard: {} information_transfer_capability: {} out_band_negotiation: {:?} transfer_mode: {} information_transfer_rate: {}{} }}",
            self.coding_standard,
            self.information_transfer_capability,
            self.out_band_negotiation,
            self.transfer_mode,
            self.information_transfer_rate,
            self.layers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{user_info_layer2::UserInfoLayer2, user_info_layer3::UserInfoLayer3};
    use crate::fields::layer_info::{Layer2Info, Layer3Info};
    use q931_core::debug;

    #[test]
    fn test_llc_packet_mode() {
        debug::setup_logging_verbose();
        let llc = LowLayerCompatibility {
            coding_standard: CodingStandard::Ccitt,
            information_transfer_capability: InformationTransferCapability::UnrestrictedDigital,
            out_band_negotiation: Some(true),
            transfer_mode: TransferMode::Packet,
            information_transfer_rate: InformationTransferRate::PacketMode,
            rate_multiplier: None,
            layers: UserLayers {
                layer1: None,
                layer2: Some(Layer2Info { protocol: UserInfoLayer2::X25Link, oct_6a: None, window_size: None }),
                layer3: Some(Layer3Info { protocol: UserInfoLayer3::X25Packet, oct_7a: Some(0x40), oct_7b: None, oct_7c: None }),
            },
        };
        let mut buf = BitBuffer::new_autoexpand(64);
        llc.to_bitbuf(&mut buf).unwrap();
        let bytes = buf.into_bytes();
        assert_eq!(bytes, hex::decode("08c0c0c666c0").unwrap());

        let mut rd = BitBuffer::from_bytes(&bytes);
        let parsed = LowLayerCompatibility::from_bitbuf(&mut rd).unwrap();
        tracing::info!("Parsed: {}", parsed);
        assert_eq!(parsed, llc);
    }
}
