#![allow(dead_code)]

use std::io;

use trellis::Transport;

/// Install a test subscriber once so `RUST_LOG` filters apply during tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Transport that captures everything sent through it.
#[derive(Default)]
pub struct TestTransport {
    pub sends: usize,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Transport for TestTransport {
    fn send(&mut self, status: u16, headers: &[(String, String)], body: Vec<u8>) -> io::Result<()> {
        self.sends += 1;
        self.status = status;
        self.headers = headers.to_vec();
        self.body = body;
        Ok(())
    }
}

impl TestTransport {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
