//! The ALME-SAP TCP server (top-level spec §6: "non-standardised framing
//! ... first byte is the ALME type tag ... accepts one request per
//! connection, delivers one reply, and closes").
//!
//! Runs on its own thread. It never touches `Context` directly: per the
//! shared-resource policy (top-level spec §5) a request is pushed onto the
//! AL thread's single event queue as `AlEvent::AlmeRequest`, and the reply
//! comes back through a rendezvous slot keyed by a per-connection id —
//! the only two things this thread and the AL thread touch in common.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Mutex;
use std::time::Duration;

use al_messages::AlEvent;
use crossbeam_channel::{bounded, Sender};
use tracing::warn;
use uuid::Uuid;

/// One request fits comfortably within this; a connection sending more is
/// almost certainly not speaking the ALME protocol.
const MAX_REQUEST_LEN: usize = 64 * 1024;
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// The rendezvous slot: one pending reply channel per in-flight ALME
/// connection, keyed by the id the server minted for it.
pub type Rendezvous = Mutex<HashMap<Uuid, Sender<Vec<u8>>>>;

pub fn new_rendezvous() -> Rendezvous {
    Mutex::new(HashMap::new())
}

pub fn serve(listener: TcpListener, events: Sender<AlEvent>, rendezvous: &Rendezvous) {
    for conn in listener.incoming() {
        let stream = match conn {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "ALME server: accept failed");
                continue;
            }
        };
        if let Err(e) = handle_connection(stream, &events, rendezvous) {
            warn!(error = %e, "ALME server: connection error");
        }
    }
}

fn handle_connection(mut stream: TcpStream, events: &Sender<AlEvent>, rendezvous: &Rendezvous) -> std::io::Result<()> {
    let mut buf = Vec::new();
    stream.set_read_timeout(Some(REPLY_TIMEOUT))?;
    (&mut stream).take(MAX_REQUEST_LEN as u64).read_to_end(&mut buf)?;

    let client_id = Uuid::new_v4();
    let (reply_tx, reply_rx) = bounded(1);
    rendezvous.lock().expect("rendezvous mutex is never poisoned").insert(client_id, reply_tx);

    if events.send(AlEvent::AlmeRequest { client_id, payload: buf }).is_err() {
        warn!("ALME server: AL thread is gone, dropping request");
        rendezvous.lock().expect("rendezvous mutex is never poisoned").remove(&client_id);
        return Ok(());
    }

    let reply = reply_rx.recv_timeout(REPLY_TIMEOUT).ok();
    rendezvous.lock().expect("rendezvous mutex is never poisoned").remove(&client_id);

    match reply {
        Some(bytes) => stream.write_all(&bytes),
        None => {
            warn!("ALME server: no reply from AL thread within timeout");
            Ok(())
        }
    }
}
