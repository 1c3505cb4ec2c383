use clap::Parser;

use q931_config::Role;
use q931_core::debug;
use q931_ies::message::mandatory::check_mandatory;
use q931_ies::message::{FrameErr, Q931Message};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Q.931 frame decoder",
    long_about = "Decodes a hex-encoded Q.931 frame and prints the call reference, message type and information elements"
)]
struct Args {
    /// Frame as hex octets
    #[arg(
        help = "Frame in hex, e.g. 0801010504038090a3. Spaces and colons are ignored"
    )]
    frame: String,

    #[arg(
        short = 'r',
        long = "receiver",
        help = "Check mandatory elements as received by this side: [ nt | te ]"
    )]
    receiver: Option<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Trace the decoder"
    )]
    verbose: bool,
}

fn parse_receiver(s: &str) -> Role {
    match s.to_lowercase().as_str() {
        "nt" | "network" => Role::Nt,
        "te" | "user" => Role::Te,
        _ => {
            eprintln!("Error: Unsupported receiver '{}'. Use: nt, te", s);
            std::process::exit(1);
        }
    }
}

fn main() {
    eprintln!("[+] Q.931 frame decoding tool");

    let args = Args::parse();
    if args.verbose {
        debug::setup_logging_verbose();
    }
    let receiver = args.receiver.as_deref().map(parse_receiver);

    let cleaned: String = args.frame.chars().filter(|c| !c.is_whitespace() && *c != ':').collect();
    let frame = match hex::decode(&cleaned) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: Invalid hex string: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("decoding {} octets", frame.len());

    let msg = match Q931Message::from_bytes(&frame) {
        Ok(msg) => msg,
        Err(FrameErr::UnknownMessageType { callref, message_type }) => {
            eprintln!("Error: Unknown message type 0x{:02x} for call reference {}", message_type, callref);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Message type:   {}", msg.message_type);
    println!(
        "Call reference: value {} flag {} ({} octet{}){}",
        msg.callref.value,
        msg.callref.flag as u8,
        msg.callref.len,
        if msg.callref.len == 1 { "" } else { "s" },
        if msg.callref.is_global() { ", global" } else if msg.callref.is_dummy() { ", dummy" } else { "" }
    );
    println!("Elements:       {}", msg.ies.len());
    for ie in msg.ies.iter() {
        println!("  {}", ie);
    }
    if !msg.faults.is_empty() {
        println!("Faults:");
        for fault in &msg.faults {
            println!("  {}", fault);
        }
    }

    if let Some(role) = receiver {
        match check_mandatory(&msg, role) {
            Ok(()) => println!("Mandatory elements for {:?} receiver: ok", role),
            Err(e) => println!(
                "Mandatory elements for {:?} receiver: rejected with cause {} ({:?}), diagnostic 0x{:02x}",
                role,
                e.cause.into_raw(),
                e.cause,
                e.id
            ),
        }
    }

    match msg.to_bytes() {
        Ok(encoded) if encoded == frame => println!("Re-encodes identically"),
        Ok(encoded) => println!("Re-encodes as {}", hex::encode(encoded)),
        Err(e) => println!("Re-encoding failed: {}", e),
    }
}
