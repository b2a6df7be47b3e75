//! The Abstraction Layer daemon binary (top-level spec §6: CLI surface and
//! exit codes). Wires a `HostBackend`, the ALME TCP server, and a periodic
//! topology-discovery timer into one `Context` owned by this thread, per
//! the single-AL-thread design in `al_entities::dispatch`.

mod alme_server;
mod host_backend;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use al_config::{AlConfig, SharedConfig};
use al_core::{debug, MacAddr, ETHERTYPE_1905};
use al_entities::dispatch::Context;
use al_entities::handlers::topology::forge_topology_discovery;
use al_entities::handlers::{push_button, route_cmdu, vendor::VendorRegistry, RouteInput};
use al_entities::model::{Interface, InterfaceKind, Network, RegistrarConfig};
use al_entities::platform::InterfaceBackend;
use al_entities::wsc::WscIdentity;
use al_messages::AlEvent;
use clap::Parser;
use crossbeam_channel::unbounded;
use host_backend::HostBackend;
use tracing::{error, info, warn};

#[allow(dead_code)]
mod exit_code {
    pub const OOM: i32 = 1;
    pub const INVALID_ARGS: i32 = 2;
    pub const NO_INTERFACES: i32 = 3;
    pub const INTERFACE_ERROR: i32 = 4;
    pub const OS_ERROR: i32 = 5;
    pub const PROTOCOL_EXTENSION_ERROR: i32 = 6;
}

/// Only timer token this binary allocates outside the per-exchange tokens
/// `al-entities` itself hands out; reserved so it never collides with one
/// of those (top-level spec §5: tokens are bounded per `TimerRegistry`,
/// which this one deliberately bypasses since nothing here needs to cancel it).
const TOPOLOGY_DISCOVERY_TOKEN: u32 = u32::MAX;

#[derive(Parser, Debug)]
#[command(
    name = "al-entityd",
    version,
    about = "IEEE 1905.1/1a Abstraction Layer daemon with Multi-AP Wi-Fi EasyMesh extensions"
)]
struct Args {
    /// This node's AL MAC address.
    #[arg(short = 'm', value_name = "MAC")]
    al_mac: String,
    /// Comma-separated managed interface names.
    #[arg(short = 'i', value_name = "IFACE,IFACE,...")]
    interfaces: String,
    /// Map the whole network at startup.
    #[arg(short = 'w')]
    map_whole_network: bool,
    /// Name the registrar interface.
    #[arg(short = 'r', value_name = "IFACE")]
    registrar_interface: Option<String>,
    /// Increase verbosity; repeatable.
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
    /// ALME server port.
    #[arg(short = 'p', default_value_t = 8888)]
    port: u16,
}

/// Local interfaces keyed both ways: handlers key state by MAC, the
/// platform trait and logging key it by name.
struct IfaceNames {
    by_mac: HashMap<MacAddr, String>,
}

impl IfaceNames {
    fn name_of(&self, mac: MacAddr) -> &str {
        self.by_mac.get(&mac).map(String::as_str).unwrap_or("unknown")
    }
}

fn wsc_identity(backend: &dyn InterfaceBackend, al_mac: MacAddr) -> WscIdentity {
    let digest = backend.sha256(al_mac.as_bytes());
    let mut uuid = [0u8; 16];
    uuid.copy_from_slice(&digest[..16]);
    WscIdentity {
        uuid,
        manufacturer: "al-entityd".into(),
        model_name: "al-entityd".into(),
        model_number: env!("CARGO_PKG_VERSION").into(),
        serial_number: al_mac.to_string(),
        primary_device_type: [0; 8],
        device_name: al_mac.to_string(),
        os_version: 0,
    }
}

fn main() {
    let args = Args::parse();

    let stdout_filter = debug::verbosity_filter(args.verbose);
    let _log_guard = debug::setup_logging(stdout_filter, None);

    let al_mac: MacAddr = match args.al_mac.parse() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("invalid AL MAC address {:?}: {e}", args.al_mac);
            std::process::exit(exit_code::INVALID_ARGS);
        }
    };

    let interface_names: Vec<String> =
        args.interfaces.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect();
    if interface_names.is_empty() {
        eprintln!("no managed interfaces given");
        std::process::exit(exit_code::NO_INTERFACES);
    }

    if let Some(registrar_iface) = &args.registrar_interface {
        if !interface_names.contains(registrar_iface) {
            eprintln!("registrar interface {registrar_iface:?} is not one of the managed interfaces");
            std::process::exit(exit_code::INVALID_ARGS);
        }
    }

    let mut cfg = AlConfig::new(al_mac, interface_names.clone());
    cfg.map_whole_network = args.map_whole_network;
    cfg.registrar_interface = args.registrar_interface.clone();
    cfg.verbosity = args.verbose;
    cfg.alme_port = args.port;
    let discovery_period = Duration::from_secs(cfg.discovery_period_secs);
    let device_timeout = Duration::from_secs(cfg.device_timeout_secs);
    let alme_port = cfg.alme_port;

    // Registrar BSS credentialing is a provisioning concern this binary's
    // documented CLI surface doesn't cover (top-level spec §6 lists only
    // the registrar *interface* flag, not SSID/key material), so `-r`
    // alone can never produce a registrar_bsses conflict here; this guards
    // against a future caller constructing `AlConfig` with a duplicate band.
    let shared_config = match SharedConfig::from_config(cfg) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("protocol extension (registrar) configuration rejected: {e}");
            std::process::exit(exit_code::PROTOCOL_EXTENSION_ERROR);
        }
    };

    let backend: Arc<dyn InterfaceBackend> = Arc::new(HostBackend::new(interface_names.clone()));

    let mut network = Network::new(al_mac, RegistrarConfig::new(Vec::new()));
    let mut by_mac = HashMap::new();
    for name in &interface_names {
        let info = match backend.interface_info(name) {
            Ok(i) => i,
            Err(e) => {
                eprintln!("interface {name:?} is not usable: {e}");
                std::process::exit(exit_code::INTERFACE_ERROR);
            }
        };
        let kind = if info.is_wifi { InterfaceKind::Wifi } else { InterfaceKind::Ethernet };
        network.local_device.interfaces.insert(info.mac, Interface::new(info.mac, kind));
        by_mac.insert(info.mac, name.clone());
    }
    let iface_names = IfaceNames { by_mac };

    let mid_seed = {
        let bytes = backend.secure_random(2);
        u16::from_be_bytes([bytes[0], bytes[1]])
    };
    let mut ctx = Context::new(network, shared_config, Arc::clone(&backend), mid_seed);
    let identity = wsc_identity(backend.as_ref(), al_mac);
    let vendor_registry = VendorRegistry::new();

    let listener = match std::net::TcpListener::bind(("0.0.0.0", alme_port)) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("failed to bind ALME server to port {alme_port}: {e}");
            std::process::exit(exit_code::OS_ERROR);
        }
    };

    let (events_tx, events_rx) = unbounded::<AlEvent>();
    let rendezvous = Arc::new(alme_server::new_rendezvous());

    {
        let events_tx = events_tx.clone();
        let rendezvous = Arc::clone(&rendezvous);
        std::thread::spawn(move || alme_server::serve(listener, events_tx, &rendezvous));
    }

    {
        let events_tx = events_tx.clone();
        std::thread::spawn(move || loop {
            std::thread::sleep(discovery_period);
            if events_tx.send(AlEvent::PeriodicTimeout { token: TOPOLOGY_DISCOVERY_TOKEN }).is_err() {
                break;
            }
        });
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)).expect("failed to set Ctrl+C handler");
    }

    info!(%al_mac, interfaces = ?interface_names, alme_port, "al-entityd starting");

    if args.map_whole_network {
        announce_topology_discovery(&mut ctx, &iface_names);
    }

    while running.load(Ordering::SeqCst) {
        let event = match events_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(e) => e,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                ctx.network.evict_stale_devices(ctx.backend.monotonic_now(), device_timeout);
                continue;
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        };

        handle_event(&mut ctx, &iface_names, &identity, &vendor_registry, &rendezvous, event);
    }

    info!("al-entityd stopping");
}

fn handle_event(
    ctx: &mut Context,
    iface_names: &IfaceNames,
    identity: &WscIdentity,
    vendor_registry: &VendorRegistry,
    rendezvous: &alme_server::Rendezvous,
    event: AlEvent,
) {
    match event {
        AlEvent::PeriodicTimeout { token } if token == TOPOLOGY_DISCOVERY_TOKEN => {
            announce_topology_discovery(ctx, iface_names);
        }
        AlEvent::PeriodicTimeout { .. } => {}
        AlEvent::AlmeRequest { client_id, payload } => {
            let reply = match al_pdus::alme::AlmeMessage::parse(&payload) {
                Ok(request) => al_entities::handlers::alme::handle_request(ctx, &request).forge(),
                Err(e) => {
                    warn!(error = ?e, "malformed ALME request");
                    return;
                }
            };
            if let Some(sender) = rendezvous.lock().expect("rendezvous mutex is never poisoned").get(&client_id) {
                let _ = sender.send(reply);
            }
        }
        AlEvent::NewPacket { interface, payload } => {
            // No raw-frame receive path is wired into `HostBackend` (see
            // host_backend.rs), so nothing currently produces this event;
            // the dispatch below is exercised directly in integration
            // tests, and a real capture adapter only needs to push it.
            let local_iface_name = iface_names.name_of(interface);
            let input = RouteInput {
                source_al_mac: ctx.network.local_device.al_mac,
                local_iface: interface,
                local_iface_name,
                identity,
                radio_uid: None,
                vendor_registry,
            };
            match route_cmdu(ctx, &payload, &input) {
                Ok(replies) => {
                    for reply in replies {
                        if let Err(e) = ctx.backend.send_frame(local_iface_name, MacAddr::AL_MULTICAST, ETHERTYPE_1905, &reply) {
                            error!(error = %e, "failed to send reply CMDU");
                        }
                    }
                }
                Err(e) => warn!(error = %e, "CMDU routing failed"),
            }
        }
        AlEvent::Timeout { token } => {
            if let Some(timer) = ctx.timers.fire(token) {
                warn!(?timer, "timer fired with no retry policy wired to act on it");
            }
        }
        AlEvent::PushButton { interface } => {
            let name = iface_names.name_of(interface).to_string();
            let message_id = ctx.mid_allocator.alloc();
            match push_button::press_button(ctx, &name, interface, message_id) {
                Ok(frame) => {
                    if let Err(e) = ctx.backend.send_frame(&name, MacAddr::AL_MULTICAST, ETHERTYPE_1905, &frame) {
                        error!(error = %e, "failed to broadcast PushButtonEventNotification");
                    }
                }
                Err(e) => warn!(error = %e, "push-button press failed"),
            }
        }
        AlEvent::TopologyChangeNotification => {
            announce_topology_discovery(ctx, iface_names);
        }
    }
}

fn announce_topology_discovery(ctx: &mut Context, iface_names: &IfaceNames) {
    let al_mac = ctx.network.local_device.al_mac;
    let iface_macs: Vec<MacAddr> = ctx.network.local_device.interfaces.keys().copied().collect();
    for iface_mac in iface_macs {
        let message_id = ctx.mid_allocator.alloc();
        let frame = forge_topology_discovery(al_mac, iface_mac, message_id);
        let name = iface_names.name_of(iface_mac);
        if let Err(e) = ctx.backend.send_frame(name, MacAddr::AL_MULTICAST, ETHERTYPE_1905, &frame) {
            warn!(error = %e, interface = %name, "failed to send TopologyDiscovery");
        }
    }
}
