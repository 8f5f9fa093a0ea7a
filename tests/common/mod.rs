//! In-process stub region store for integration tests
//!
//! Speaks the real wire protocol over TCP so the adapter under test runs
//! its actual transport path. Region state is shared across connections,
//! and region creations are counted so tests can assert the
//! resolve-at-most-once contract.

use std::collections::{BTreeMap, HashSet};
use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use regionkv::protocol::{
    encode_batch_values, encode_query_results, read_command, write_response, Command, Response,
};
use regionkv::StoreConfig;

/// Shared server state
struct State {
    data: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
    regions: Mutex<HashSet<String>>,
    regions_created: AtomicUsize,
}

/// A stub region store listening on an ephemeral local port
pub struct StubStore {
    addr: SocketAddr,
    state: Arc<State>,
}

impl StubStore {
    /// Bind an ephemeral port and start accepting connections
    pub fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(State {
            data: Mutex::new(BTreeMap::new()),
            regions: Mutex::new(HashSet::new()),
            regions_created: AtomicUsize::new(0),
        });

        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let conn_state = Arc::clone(&accept_state);
                thread::spawn(move || handle_connection(stream, conn_state));
            }
        });

        Self { addr, state }
    }

    /// Adapter config pointing at this stub
    pub fn config(&self, region: &str) -> StoreConfig {
        StoreConfig::builder()
            .locator_host("127.0.0.1")
            .locator_port(self.addr.port())
            .region_name(region)
            .build()
    }

    /// How many regions have been created so far
    pub fn regions_created(&self) -> usize {
        self.state.regions_created.load(Ordering::SeqCst)
    }
}

fn handle_connection(stream: TcpStream, state: Arc<State>) {
    let Ok(read_stream) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_stream);
    let mut writer = BufWriter::new(stream);

    loop {
        let command = match read_command(&mut reader) {
            Ok(cmd) => cmd,
            Err(_) => return, // client gone
        };

        let response = execute(&command, &state);
        if write_response(&mut writer, &response).is_err() {
            return;
        }
    }
}

fn execute(command: &Command, state: &State) -> Response {
    match command {
        Command::ResolveRegion { name } => {
            if state.regions.lock().insert(name.clone()) {
                state.regions_created.fetch_add(1, Ordering::SeqCst);
            }
            Response::ok(None)
        }
        Command::Get { key } => match state.data.lock().get(key) {
            Some(value) => Response::ok(Some(value.clone())),
            None => Response::not_found(),
        },
        Command::Put { key, value } => {
            state.data.lock().insert(key.clone(), value.clone());
            Response::ok(None)
        }
        Command::Remove { key } => match state.data.lock().remove(key) {
            Some(_) => Response::ok(None),
            None => Response::not_found(),
        },
        Command::GetAll { keys } => {
            let data = state.data.lock();
            let values: Vec<Option<Vec<u8>>> = keys.iter().map(|k| data.get(k).cloned()).collect();
            Response::ok(Some(encode_batch_values(&values).unwrap()))
        }
        Command::PutAll { entries } => {
            let mut data = state.data.lock();
            for (key, value) in entries {
                data.insert(key.clone(), value.clone());
            }
            Response::ok(None)
        }
        Command::Query { predicate } => run_query(predicate, state),
        Command::Ping => Response::ok(Some(b"PONG".to_vec())),
    }
}

/// Toy query language, enough to exercise both query outcomes:
/// - `*`               all values
/// - `prefix=<bytes>`  values whose key starts with the prefix
/// - anything else     malformed predicate error
fn run_query(predicate: &str, state: &State) -> Response {
    let data = state.data.lock();
    let results: Vec<Vec<u8>> = if predicate == "*" {
        data.values().cloned().collect()
    } else if let Some(prefix) = predicate.strip_prefix("prefix=") {
        data.iter()
            .filter(|(k, _)| k.starts_with(prefix.as_bytes()))
            .map(|(_, v)| v.clone())
            .collect()
    } else {
        return Response::error(&format!("malformed predicate: {}", predicate));
    };

    Response::ok(Some(encode_query_results(&results).unwrap()))
}
