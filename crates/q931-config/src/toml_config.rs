use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use q931_core::longtime::LONGTIME_MILLISECOND;

use super::intf_config::{IntfConfig, IntfType, NetworkRole, Q931Timers, Role, SwitchConfig};

/// Build `SwitchConfig` from a TOML configuration string
pub fn from_toml_str(toml_str: &str) -> Result<SwitchConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }

    let mut cfg = SwitchConfig {
        debug_log: root.debug_log,
        interfaces: Vec::with_capacity(root.interface.len()),
    };

    for dto in root.interface {
        if !dto.extra.is_empty() {
            return Err(format!("Unrecognized fields in interface {}: {:?}", dto.name, sorted_keys(&dto.extra)).into());
        }
        if let Some(ref timers) = dto.timers {
            if !timers.extra.is_empty() {
                return Err(format!("Unrecognized fields in interface {}.timers: {:?}", dto.name, sorted_keys(&timers.extra)).into());
            }
        }

        let mut intf = IntfConfig::new(&dto.name, dto.role, dto.intf_type);
        apply_intf_patch(&mut intf, dto);
        cfg.interfaces.push(intf);
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Build `SwitchConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SwitchConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SwitchConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SwitchConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let cfg = from_reader(r)?;
    Ok(cfg)
}

fn apply_intf_patch(dst: &mut IntfConfig, src: IntfDto) {
    if let Some(v) = src.network_role {
        dst.network_role = v;
    }
    if let Some(v) = src.call_reference_len {
        dst.call_reference_len = v;
    }
    if let Some(v) = src.dlc_autorelease_ms {
        dst.dlc_autorelease_time = v as i64 * LONGTIME_MILLISECOND;
    }
    if let Some(v) = src.restart_retransmit_count {
        dst.restart_retransmit_count = v;
    }
    if let Some(v) = src.status_enquiry_retransmit_count {
        dst.status_enquiry_retransmit_count = v;
    }
    if let Some(v) = src.send_date_time {
        dst.send_date_time = v;
    }
    if let Some(timers) = src.timers {
        apply_timers_patch(&mut dst.timers, timers);
    }
}

fn apply_timers_patch(dst: &mut Q931Timers, src: TimersDto) {
    let ms = |v: u64| v as i64 * LONGTIME_MILLISECOND;
    if let Some(v) = src.t301 { dst.t301 = ms(v); }
    if let Some(v) = src.t302 { dst.t302 = ms(v); }
    if let Some(v) = src.t303 { dst.t303 = ms(v); }
    if let Some(v) = src.t304 { dst.t304 = ms(v); }
    if let Some(v) = src.t305 { dst.t305 = ms(v); }
    if let Some(v) = src.t306 { dst.t306 = ms(v); }
    if let Some(v) = src.t307 { dst.t307 = ms(v); }
    if let Some(v) = src.t308 { dst.t308 = ms(v); }
    if let Some(v) = src.t309 { dst.t309 = ms(v); }
    if let Some(v) = src.t310 { dst.t310 = ms(v); }
    if let Some(v) = src.t312 { dst.t312 = ms(v); }
    if let Some(v) = src.t313 { dst.t313 = ms(v); }
    if let Some(v) = src.t316 { dst.t316 = ms(v); }
    if let Some(v) = src.t317 { dst.t317 = ms(v); }
    if let Some(v) = src.t318 { dst.t318 = ms(v); }
    if let Some(v) = src.t319 { dst.t319 = ms(v); }
    if let Some(v) = src.t322 { dst.t322 = ms(v); }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    interface: Vec<IntfDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct IntfDto {
    name: String,
    role: Role,
    intf_type: IntfType,

    network_role: Option<NetworkRole>,
    call_reference_len: Option<u8>,
    dlc_autorelease_ms: Option<u64>,
    restart_retransmit_count: Option<u32>,
    status_enquiry_retransmit_count: Option<u32>,
    send_date_time: Option<bool>,

    #[serde(default)]
    timers: Option<TimersDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

/// Timer overrides in milliseconds
#[derive(Default, Deserialize)]
struct TimersDto {
    t301: Option<u64>,
    t302: Option<u64>,
    t303: Option<u64>,
    t304: Option<u64>,
    t305: Option<u64>,
    t306: Option<u64>,
    t307: Option<u64>,
    t308: Option<u64>,
    t309: Option<u64>,
    t310: Option<u64>,
    t312: Option<u64>,
    t313: Option<u64>,
    t316: Option<u64>,
    t317: Option<u64>,
    t318: Option<u64>,
    t319: Option<u64>,
    t322: Option<u64>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use q931_core::longtime::LONGTIME_SECOND;

    const DEMO: &str = r#"
config_version = "0.1"
debug_log = "/tmp/q931.log"

[[interface]]
name = "A"
role = "Nt"
intf_type = "BraPointToPoint"
send_date_time = true

[[interface]]
name = "B"
role = "Te"
intf_type = "Pra"
dlc_autorelease_ms = 5000

[interface.timers]
t303 = 2000
t308 = 1500
"#;

    #[test]
    fn test_parse_demo_config() {
        let cfg = from_toml_str(DEMO).unwrap();
        assert_eq!(cfg.debug_log.as_deref(), Some("/tmp/q931.log"));
        assert_eq!(cfg.interfaces.len(), 2);

        let a = cfg.interface("A").unwrap();
        assert_eq!(a.role, Role::Nt);
        assert_eq!(a.call_reference_len, 1);
        assert!(a.send_date_time);
        assert_eq!(a.timers.t303, 4 * LONGTIME_SECOND);

        let b = cfg.interface("B").unwrap();
        assert_eq!(b.call_reference_len, 2);
        assert_eq!(b.dlc_autorelease_time, 5 * LONGTIME_SECOND);
        assert_eq!(b.timers.t303, 2 * LONGTIME_SECOND);
        assert_eq!(b.timers.t308, 1_500_000);
        assert_eq!(b.timers.t310, 40 * LONGTIME_SECOND);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let bad_top = "config_version = \"0.1\"\nfoo = 1\n";
        assert!(from_toml_str(bad_top).is_err());

        let bad_timer = "config_version = \"0.1\"\n[[interface]]\nname = \"A\"\nrole = \"Nt\"\nintf_type = \"Pra\"\n[interface.timers]\nt399 = 5\n";
        let err = from_toml_str(bad_timer).unwrap_err().to_string();
        assert!(err.contains("t399"), "{}", err);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let s = "config_version = \"9.9\"\n[[interface]]\nname = \"A\"\nrole = \"Nt\"\nintf_type = \"Pra\"\n";
        assert!(from_toml_str(s).is_err());
    }

    #[test]
    fn test_no_interfaces_rejected() {
        assert!(from_toml_str("config_version = \"0.1\"\n").is_err());
    }
}
