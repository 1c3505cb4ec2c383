use serde::Deserialize;

use q931_core::Longtime;
use q931_core::longtime::LONGTIME_SECOND;

/// Which side of the user-network interface this stack implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Role {
    /// Network termination, network side
    Nt,
    /// Terminal equipment, user side
    Te,
}

impl Role {
    pub fn is_nt(&self) -> bool {
        matches!(self, Role::Nt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum IntfType {
    /// Basic rate, point-to-point data link
    BraPointToPoint,
    /// Basic rate, point-to-multipoint. On the NT side, several terminals may answer one SETUP
    BraMultipoint,
    /// Primary rate, 30 B-channels
    Pra,
}

impl IntfType {
    /// Number of B-channels on the interface
    pub fn channel_count(&self) -> usize {
        match self {
            IntfType::BraPointToPoint | IntfType::BraMultipoint => 2,
            IntfType::Pra => 30,
        }
    }

    pub fn is_bra(&self) -> bool {
        !matches!(self, IntfType::Pra)
    }

    pub fn is_multipoint(&self) -> bool {
        matches!(self, IntfType::BraMultipoint)
    }

    /// Default call reference length in octets
    pub fn default_call_reference_len(&self) -> u8 {
        if self.is_bra() { 1 } else { 2 }
    }
}

/// Position of this equipment in the network, reported in the location field of Cause IEs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum NetworkRole {
    User,
    PrivateNetworkLocalUser,
    PublicNetworkLocalUser,
    TransitNetwork,
    PublicNetworkRemoteUser,
    PrivateNetworkRemoteUser,
    InternationalNetwork,
    NetworkBeyondInterworkingPoint,
}

impl NetworkRole {
    /// Value of the Q.931 location field
    pub fn location_code(&self) -> u8 {
        match self {
            NetworkRole::User => 0,
            NetworkRole::PrivateNetworkLocalUser => 1,
            NetworkRole::PublicNetworkLocalUser => 2,
            NetworkRole::TransitNetwork => 3,
            NetworkRole::PublicNetworkRemoteUser => 4,
            NetworkRole::PrivateNetworkRemoteUser => 5,
            NetworkRole::InternationalNetwork => 7,
            NetworkRole::NetworkBeyondInterworkingPoint => 10,
        }
    }
}

/// Q.931 protocol timers, in microseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Q931Timers {
    /// ALERTING received, waiting for CONNECT
    pub t301: Longtime,
    /// Overlap receiving, waiting for more digits
    pub t302: Longtime,
    /// SETUP sent, waiting for a response
    pub t303: Longtime,
    /// Overlap sending, waiting for progress
    pub t304: Longtime,
    /// DISCONNECT sent, waiting for RELEASE or DISCONNECT
    pub t305: Longtime,
    /// DISCONNECT with in-band tones sent
    pub t306: Longtime,
    /// Suspended call parked, waiting for RESUME
    pub t307: Longtime,
    /// RELEASE sent, waiting for RELEASE COMPLETE
    pub t308: Longtime,
    /// Data link lost while calls are active
    pub t309: Longtime,
    /// CALL PROCEEDING received, waiting for ALERTING, CONNECT or PROGRESS
    pub t310: Longtime,
    /// Broadcast SETUP sent, collecting responses
    pub t312: Longtime,
    /// CONNECT sent, waiting for CONNECT ACKNOWLEDGE
    pub t313: Longtime,
    /// RESTART sent, waiting for RESTART ACKNOWLEDGE
    pub t316: Longtime,
    /// RESTART received, waiting for internal clearing
    pub t317: Longtime,
    /// RESUME sent, waiting for RESUME ACKNOWLEDGE or RESUME REJECT
    pub t318: Longtime,
    /// SUSPEND sent, waiting for SUSPEND ACKNOWLEDGE or SUSPEND REJECT
    pub t319: Longtime,
    /// STATUS ENQUIRY sent, waiting for STATUS
    pub t322: Longtime,
}

impl Q931Timers {
    pub fn defaults_for(role: Role) -> Self {
        let s = LONGTIME_SECOND;
        let nt = role.is_nt();
        Q931Timers {
            t301: 180 * s,
            t302: if nt { 12 * s } else { 15 * s },
            t303: 4 * s,
            t304: if nt { 20 * s } else { 30 * s },
            t305: 30 * s,
            t306: 30 * s,
            t307: 180 * s,
            t308: 4 * s,
            t309: 6 * s,
            t310: if nt { 35 * s } else { 40 * s },
            t312: 6 * s,
            t313: 4 * s,
            t316: 120 * s,
            t317: 60 * s,
            t318: 4 * s,
            t319: 4 * s,
            t322: 4 * s,
        }
    }
}

/// Configuration of one signalling interface
#[derive(Debug, Clone)]
pub struct IntfConfig {
    pub name: String,
    pub role: Role,
    pub intf_type: IntfType,
    pub network_role: NetworkRole,
    /// 1 or 2 octets
    pub call_reference_len: u8,
    /// Idle time after which an unused data link is released, 0 disables
    pub dlc_autorelease_time: Longtime,
    /// Number of RESTART retransmissions on T316 expiry
    pub restart_retransmit_count: u32,
    /// Number of STATUS ENQUIRY retransmissions on T322 expiry
    pub status_enquiry_retransmit_count: u32,
    /// Add a Date/time IE to CONNECT sent by the network side
    pub send_date_time: bool,
    pub timers: Q931Timers,
}

impl IntfConfig {
    pub fn new(name: &str, role: Role, intf_type: IntfType) -> Self {
        IntfConfig {
            name: name.to_string(),
            role,
            intf_type,
            network_role: default_network_role(role),
            call_reference_len: intf_type.default_call_reference_len(),
            dlc_autorelease_time: 0,
            restart_retransmit_count: 2,
            status_enquiry_retransmit_count: 1,
            send_date_time: false,
            timers: Q931Timers::defaults_for(role),
        }
    }

    /// Validate that all configuration fields hold usable values.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty() {
            return Err("interface name must not be empty");
        }
        if self.call_reference_len != 1 && self.call_reference_len != 2 {
            return Err("call_reference_len must be 1 or 2");
        }
        if self.intf_type == IntfType::Pra && self.call_reference_len != 2 {
            return Err("primary rate interfaces use 2-octet call references");
        }
        if self.role == Role::Te && self.send_date_time {
            return Err("send_date_time is only meaningful on the network side");
        }
        if self.dlc_autorelease_time < 0 {
            return Err("dlc_autorelease_time must not be negative");
        }
        let t = &self.timers;
        let all = [
            t.t301, t.t302, t.t303, t.t304, t.t305, t.t306, t.t307, t.t308, t.t309, t.t310, t.t312, t.t313, t.t316,
            t.t317, t.t318, t.t319, t.t322,
        ];
        if all.iter().any(|v| *v <= 0) {
            return Err("all timers must be positive");
        }
        Ok(())
    }
}

fn default_network_role(role: Role) -> NetworkRole {
    match role {
        Role::Nt => NetworkRole::PrivateNetworkLocalUser,
        Role::Te => NetworkRole::User,
    }
}

/// Top-level configuration of a switch built on the stack
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    pub debug_log: Option<String>,
    pub interfaces: Vec<IntfConfig>,
}

impl SwitchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.interfaces.is_empty() {
            return Err("at least one interface must be configured".to_string());
        }
        for (i, intf) in self.interfaces.iter().enumerate() {
            intf.validate().map_err(|e| format!("interface {}: {}", intf.name, e))?;
            if self.interfaces[..i].iter().any(|other| other.name == intf.name) {
                return Err(format!("duplicate interface name {}", intf.name));
            }
        }
        Ok(())
    }

    pub fn interface(&self, name: &str) -> Option<&IntfConfig> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}
