//! Debug CLI: connects to `al-entityd`'s ALME TCP port, sends one request,
//! prints the reply, and closes (top-level spec §6: "The TCP server
//! accepts one request per connection, delivers one reply, and closes").

use std::io::{Read, Write};
use std::net::TcpStream;

use al_core::MacAddr;
use al_pdus::alme::interface::{GetIntfPwrStateRequest, SetIntfPwrStateRequest};
use al_pdus::alme::vendor::{CustomCommand, PowerState};
use al_pdus::alme::{AlmeMessage, CustomCommandRequest};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "alme-client", version, about = "Sends one ALME-SAP request to al-entityd and prints the reply")]
struct Args {
    /// Host the ALME server is listening on.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// ALME server port (top-level spec §6: default 8888).
    #[arg(short = 'p', long, default_value_t = 8888)]
    port: u16,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ALME-GET-INTF-LIST.req
    GetIntfList,
    /// ALME-GET-FWD-RULES.req
    GetFwdRules,
    /// ALME-GET-INTF-POWER-STATE.req
    GetIntfPowerState { interface_mac: String },
    /// ALME-SET-INTF-POWER-STATE.req
    SetIntfPowerState { interface_mac: String, state: String },
    /// ALME-CUSTOM-COMMAND.req: dump-network-devices
    DumpNetworkDevices,
    /// Send a raw hex-encoded ALME request and print the raw hex reply.
    Raw { hex: String },
}

fn parse_power_state(s: &str) -> PowerState {
    match s.to_lowercase().as_str() {
        "on" => PowerState::On,
        "off" => PowerState::Off,
        "powersave" | "power-save" => PowerState::PowerSave,
        other => {
            eprintln!("unknown power state {other:?}; expected on, off, or powersave");
            std::process::exit(2);
        }
    }
}

fn parse_mac(s: &str) -> MacAddr {
    s.parse().unwrap_or_else(|e| {
        eprintln!("invalid MAC address {s:?}: {e}");
        std::process::exit(2);
    })
}

fn decode_hex(s: &str) -> Vec<u8> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16).unwrap_or_else(|_| {
                eprintln!("invalid hex input");
                std::process::exit(2);
            })
        })
        .collect()
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() {
    let args = Args::parse();

    let request_bytes = match args.command {
        Command::GetIntfList => AlmeMessage::GetIntfListRequest.forge(),
        Command::GetFwdRules => AlmeMessage::GetFwdRulesRequest.forge(),
        Command::GetIntfPowerState { interface_mac } => {
            let interface_address = parse_mac(&interface_mac);
            AlmeMessage::GetIntfPwrStateRequest(GetIntfPwrStateRequest { interface_address }).forge()
        }
        Command::SetIntfPowerState { interface_mac, state } => {
            let interface_address = parse_mac(&interface_mac);
            let power_state = parse_power_state(&state);
            AlmeMessage::SetIntfPwrStateRequest(SetIntfPwrStateRequest { interface_address, power_state }).forge()
        }
        Command::DumpNetworkDevices => {
            AlmeMessage::CustomCommandRequest(CustomCommandRequest { command: CustomCommand::DumpNetworkDevices }).forge()
        }
        Command::Raw { hex } => decode_hex(&hex),
    };

    let mut stream = match TcpStream::connect((args.host.as_str(), args.port)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to connect to {}:{}: {e}", args.host, args.port);
            std::process::exit(1);
        }
    };
    stream.set_read_timeout(Some(std::time::Duration::from_secs(5))).expect("setting a read timeout never fails");

    if let Err(e) = stream.write_all(&request_bytes) {
        eprintln!("failed to send request: {e}");
        std::process::exit(1);
    }
    // The server replies then closes; shutting down our write half signals
    // we have nothing more to send, letting it read to EOF if it wants to.
    let _ = stream.shutdown(std::net::Shutdown::Write);

    let mut reply_bytes = Vec::new();
    if let Err(e) = stream.read_to_end(&mut reply_bytes) {
        eprintln!("failed to read reply: {e}");
        std::process::exit(1);
    }

    match AlmeMessage::parse(&reply_bytes) {
        Ok(reply) => println!("{reply:#?}"),
        Err(e) => {
            eprintln!("reply did not parse as an ALME message ({e:?}); raw hex:");
            println!("{}", encode_hex(&reply_bytes));
        }
    }
}
