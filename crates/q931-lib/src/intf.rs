use std::collections::BTreeMap;

use q931_config::{IntfConfig, Role};
use q931_ies::enums::location::Location;
use q931_ies::ies::ChannelInterfaceType;
use q931_ies::message::CallRef;

use crate::call::CallId;
use crate::channel::{Channel, channels_for};
use crate::chanset::Chanset;
use crate::dlc::Dlc;
use crate::global_call::GlobalCall;
use crate::transport::{DlcId, IntfId, TEI_P2P};

/// Call suspended on the network side, waiting for RESUME
#[derive(Debug, Clone)]
pub struct ParkedCall {
    pub call: CallId,
    pub identity: Vec<u8>,
    pub channels: Chanset,
}

/// One signalling interface
pub struct Intf {
    pub id: IntfId,
    pub config: IntfConfig,
    pub channels: Vec<Channel>,
    /// Data links by TEI. Point-to-point interfaces and the user side use TEI_P2P only.
    pub dlcs: BTreeMap<u8, Dlc>,
    pub global_call: GlobalCall,
    pub parked: Vec<ParkedCall>,
    next_call_reference: u16,
}

impl Intf {
    pub fn new(id: IntfId, config: IntfConfig) -> Self {
        let channels = channels_for(config.intf_type.channel_count());
        let mut intf = Intf {
            id,
            channels,
            dlcs: BTreeMap::new(),
            global_call: GlobalCall::new(),
            parked: Vec::new(),
            next_call_reference: 1,
            config,
        };
        if !intf.is_nt_multipoint() {
            intf.dlc_entry(TEI_P2P);
        }
        intf
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    pub fn is_nt(&self) -> bool {
        self.config.role.is_nt()
    }

    /// Network side of a point-to-multipoint basic rate interface
    pub fn is_nt_multipoint(&self) -> bool {
        self.is_nt() && self.config.intf_type.is_multipoint()
    }

    pub fn callref_len(&self) -> u8 {
        self.config.call_reference_len
    }

    pub fn location(&self) -> Location {
        Location::from(self.config.network_role)
    }

    pub fn channel_interface_type(&self) -> ChannelInterfaceType {
        if self.config.intf_type.is_bra() { ChannelInterfaceType::Basic } else { ChannelInterfaceType::Primary }
    }

    /// DLC used for calls that are not bound to a specific terminal
    pub fn default_dlc(&self) -> DlcId {
        if self.is_nt_multipoint() { DlcId::broadcast(self.id) } else { DlcId::new(self.id, TEI_P2P) }
    }

    /// DLC for `tei`, created on first use
    pub fn dlc_entry(&mut self, tei: u8) -> &mut Dlc {
        let id = DlcId::new(self.id, tei);
        let autorelease = self.config.dlc_autorelease_time;
        self.dlcs.entry(tei).or_insert_with(|| {
            tracing::debug!(tei, "new DLC on {}", id.intf);
            Dlc::new(id, autorelease)
        })
    }

    pub fn channel_mut(&mut self, id: u8) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.id == id)
    }

    pub fn has_channel(&self, id: u8) -> bool {
        self.channels.iter().any(|c| c.id == id)
    }

    pub fn all_channels(&self) -> Chanset {
        self.channels.iter().map(|c| c.id).collect()
    }

    /// Allocate a call reference value for an outgoing call.
    /// Values held by outstanding outgoing calls are skipped. Returns None when all values are taken.
    pub fn take_call_reference(&mut self, in_use: impl Fn(u16) -> bool) -> Option<u16> {
        let max = CallRef::max_value(self.callref_len());
        for _ in 0..max {
            let value = self.next_call_reference;
            self.next_call_reference = if value >= max { 1 } else { value + 1 };
            if !in_use(value) {
                return Some(value);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_config::IntfType;
    use q931_core::debug;
    use std::collections::HashSet;

    #[test]
    fn test_call_reference_uniqueness() {
        debug::setup_logging_verbose();
        let mut intf = Intf::new(0, IntfConfig::new("A", Role::Te, IntfType::BraPointToPoint));
        let mut held = HashSet::new();
        for _ in 0..127 {
            let v = intf.take_call_reference(|v| held.contains(&v)).unwrap();
            assert!(v >= 1 && v <= 0x7F);
            assert!(held.insert(v), "value {} handed out twice", v);
        }
        // Space exhausted
        assert_eq!(intf.take_call_reference(|v| held.contains(&v)), None);

        // Freeing one value makes exactly that value available again
        held.remove(&42);
        assert_eq!(intf.take_call_reference(|v| held.contains(&v)), Some(42));
    }

    #[test]
    fn test_dlc_layout() {
        debug::setup_logging_verbose();
        let p2p = Intf::new(0, IntfConfig::new("A", Role::Nt, IntfType::BraPointToPoint));
        assert_eq!(p2p.dlcs.len(), 1);
        assert!(!p2p.default_dlc().is_broadcast());

        let mp = Intf::new(1, IntfConfig::new("B", Role::Nt, IntfType::BraMultipoint));
        assert!(mp.dlcs.is_empty());
        assert!(mp.default_dlc().is_broadcast());

        let pra = Intf::new(2, IntfConfig::new("C", Role::Te, IntfType::Pra));
        assert_eq!(pra.channels.len(), 30);
        assert_eq!(pra.channel_interface_type(), ChannelInterfaceType::Primary);
    }
}
