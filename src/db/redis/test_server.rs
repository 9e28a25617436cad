//! Minimal in-process RESP server for cache tests.
//!
//! Understands `GET` and `SETEX`; answers `+OK` to anything else (including the
//! `CLIENT SETINFO` handshake). Every command received is recorded.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Default)]
struct State {
    values: HashMap<String, String>,
    commands: Vec<Vec<String>>,
    fail_reads: bool,
}

pub(crate) struct TestRedis {
    addr: SocketAddr,
    state: Arc<Mutex<State>>,
}

impl TestRedis {
    pub(crate) async fn start() -> Self {
        Self::spawn(false).await
    }

    /// Server that answers every `GET` with an error reply
    pub(crate) async fn with_failing_reads() -> Self {
        Self::spawn(true).await
    }

    async fn spawn(fail_reads: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(State {
            fail_reads,
            ..State::default()
        }));

        let accept_state = state.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, accept_state.clone()));
            }
        });

        Self { addr, state }
    }

    pub(crate) fn url(&self) -> String {
        format!("redis://{}", self.addr)
    }

    /// Recorded commands whose name matches `name`, case-insensitively
    pub(crate) fn commands_named(&self, name: &str) -> Vec<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .commands
            .iter()
            .filter(|c| c.first().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .cloned()
            .collect()
    }
}

async fn serve(stream: TcpStream, state: Arc<Mutex<State>>) {
    let mut reader = BufReader::new(stream);
    while let Ok(Some(command)) = read_command(&mut reader).await {
        let reply = respond(&state, command);
        if reader.get_mut().write_all(reply.as_bytes()).await.is_err() {
            break;
        }
    }
}

fn respond(state: &Mutex<State>, command: Vec<String>) -> String {
    let mut state = state.lock().unwrap();
    state.commands.push(command.clone());

    let name = command.first().map(|n| n.to_ascii_uppercase()).unwrap_or_default();
    match (name.as_str(), command.as_slice()) {
        ("GET", _) if state.fail_reads => "-ERR simulated outage\r\n".to_string(),
        ("GET", [_, key]) => match state.values.get(key) {
            Some(value) => format!("${}\r\n{}\r\n", value.len(), value),
            None => "$-1\r\n".to_string(),
        },
        ("SETEX", [_, key, _ttl, value]) => {
            state.values.insert(key.clone(), value.clone());
            "+OK\r\n".to_string()
        }
        _ => "+OK\r\n".to_string(),
    }
}

async fn read_command<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<Option<Vec<String>>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    let count = parse_header(&line, '*')?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await?;
        let len = parse_header(&line, '$')?;

        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf).await?;
        buf.truncate(len);
        args.push(String::from_utf8_lossy(&buf).into_owned());
    }

    Ok(Some(args))
}

fn parse_header(line: &str, prefix: char) -> std::io::Result<usize> {
    line.trim_end()
        .strip_prefix(prefix)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unexpected RESP line: {:?}", line),
            )
        })
}
