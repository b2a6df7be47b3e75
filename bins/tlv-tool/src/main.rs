//! Debug CLI: parses a CMDU or ALME-SAP byte stream given as hex and
//! prints its structure, or forges a minimal example of either and prints
//! its hex (top-level spec §6: wire formats are "bit-exact... as defined
//! by the fixed reference bytestreams used by the test suite" — this tool
//! is how a developer eyeballs one of those bytestreams by hand).

use std::io::Read;

use al_core::ByteReader;
use al_pdus::alme::AlmeMessage;
use al_pdus::cmdu::header::CmduHeader;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tlv-tool", version, about = "Inspects 1905 CMDU and ALME-SAP byte streams")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a CMDU (6-byte header + TLV sequence) from hex and print it.
    Cmdu {
        /// Hex bytes; reads stdin if omitted.
        hex: Option<String>,
    },
    /// Parse an ALME-SAP message (type tag + body) from hex and print it.
    Alme {
        /// Hex bytes; reads stdin if omitted.
        hex: Option<String>,
    },
    /// Forge a minimal TopologyQuery CMDU and print its hex.
    ForgeCmdu {
        /// Message id to stamp on the header.
        #[arg(default_value_t = 1)]
        message_id: u16,
    },
    /// Forge a GetIntfListRequest ALME message and print its hex.
    ForgeAlme,
}

fn read_hex_arg(hex: Option<String>) -> Vec<u8> {
    let raw = match hex {
        Some(h) => h,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).expect("failed to read stdin");
            buf
        }
    };
    decode_hex(raw.trim()).unwrap_or_else(|e| {
        eprintln!("invalid hex input: {e}");
        std::process::exit(1);
    })
}

fn decode_hex(s: &str) -> Result<Vec<u8>, String> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.len() % 2 != 0 {
        return Err("hex string has an odd number of digits".into());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string()))
        .collect()
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() {
    let args = Args::parse();

    match args.command {
        Command::Cmdu { hex } => {
            let bytes = read_hex_arg(hex);
            let mut r = ByteReader::new(&bytes);
            let header = match CmduHeader::parse(&mut r) {
                Ok(h) => h,
                Err(e) => {
                    eprintln!("header parse error: {e:?}");
                    std::process::exit(1);
                }
            };
            println!("{header:#?}");
            match al_pdus::tlv::parse_tlv_sequence(&mut r) {
                Ok(tlvs) => {
                    for tlv in tlvs {
                        println!("{tlv:#?}");
                    }
                }
                Err(e) => {
                    eprintln!("TLV parse error: {e:?}");
                    std::process::exit(1);
                }
            }
        }
        Command::Alme { hex } => {
            let bytes = read_hex_arg(hex);
            match AlmeMessage::parse(&bytes) {
                Ok(msg) => println!("{msg:#?}"),
                Err(e) => {
                    eprintln!("ALME parse error: {e:?}");
                    std::process::exit(1);
                }
            }
        }
        Command::ForgeCmdu { message_id } => {
            use al_core::ByteWriter;
            use al_pdus::cmdu::header::CmduType;
            use al_pdus::tlv::Tlv;

            let header = CmduHeader::new(CmduType::TopologyQuery.as_u16(), message_id);
            let mut w = ByteWriter::new();
            header.forge(&mut w);
            Tlv::EndOfMessage.forge(&mut w).expect("always forges");
            println!("{}", encode_hex(w.as_slice()));
        }
        Command::ForgeAlme => {
            println!("{}", encode_hex(&AlmeMessage::GetIntfListRequest.forge()));
        }
    }
}
