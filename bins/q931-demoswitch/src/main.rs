use clap::Parser;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use q931_config::{IntfConfig, SwitchConfig, toml_config};
use q931_core::debug;

mod console;
mod switch;
mod wire;

use switch::Switch;

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SwitchConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

/// The first two interfaces, which must have opposite roles
fn pick_interfaces(cfg: &SwitchConfig) -> Result<(IntfConfig, IntfConfig), String> {
    match cfg.interfaces.as_slice() {
        [a, b, rest @ ..] if a.role != b.role => {
            for extra in rest {
                tracing::warn!("ignoring interface {}", extra.name);
            }
            Ok((a.clone(), b.clone()))
        }
        [a, b, ..] => Err(format!("interfaces {} and {} are both {:?}, need one Nt and one Te", a.name, b.name, a.role)),
        _ => Err(format!("need two interfaces, config has {}", cfg.interfaces.len())),
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Q.931 demo switch",
    long_about = "Wires a network side and a user side interface back to back and places calls between them"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with two interfaces of opposite roles")]
    config: String,
}

fn main() {
    eprintln!("[+] Q.931 demo switch");
    eprintln!("    Commands on stdin: dial <digits> | hangup | calls | exit\n");

    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.debug_log.clone());

    let (a_cfg, b_cfg) = match pick_interfaces(&cfg) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    eprintln!(" -> {} ({:?}) calls {} ({:?}) over {:?}", a_cfg.name, a_cfg.role, b_cfg.name, b_cfg.role, a_cfg.intf_type);

    let (wire_tx, wire_rx) = crossbeam_channel::unbounded();
    let mut switch = match Switch::new(a_cfg, b_cfg, wire_tx) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Error: failed to set Ctrl-C handler: {}", e);
        std::process::exit(1);
    }

    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    console::spawn(cmd_tx);

    switch.run(&cmd_rx, &wire_rx, &running);
    tracing::info!("done");
}
