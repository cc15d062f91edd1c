//! Hexfab -- the game-contract stdin driver.
//!
//! This binary reads commands from stdin and writes responses to stdout,
//! one transaction per line, against an in-memory ledger:
//!
//!   init <tx-id>
//!   invoke <creator> <json-args>
//!   show
//!   quit

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use hexfab::contract::{decode, handle_init, handle_invoke, load_game};
use hexfab::ledger::MemoryLedger;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut ledger = MemoryLedger::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match cmd {
            "init" => match handle_init(&mut ledger, rest) {
                Ok(data) => {
                    let _ = writeln!(out, "ok {:?}", data.phase);
                }
                Err(e) => {
                    let _ = writeln!(out, "error {e}");
                }
            },
            "invoke" => {
                let (creator, payload) = match rest.split_once(' ') {
                    Some((c, p)) => (c, p.trim()),
                    None => {
                        let _ = writeln!(out, "error invoke needs a creator and arguments");
                        continue;
                    }
                };
                let result = decode(payload.as_bytes())
                    .and_then(|args| handle_invoke(&mut ledger, creator.as_bytes(), &args));
                match result {
                    Ok(data) => {
                        let _ = writeln!(out, "ok {:?}", data.phase);
                    }
                    Err(e) => {
                        let _ = writeln!(out, "error {e}");
                    }
                }
            }
            "show" => match load_game(&ledger).map(|d| serde_json::to_string(&d)) {
                Ok(Ok(json)) => {
                    let _ = writeln!(out, "{json}");
                }
                Ok(Err(e)) => {
                    let _ = writeln!(out, "error {e}");
                }
                Err(e) => {
                    let _ = writeln!(out, "error {e}");
                }
            },
            "quit" => break,
            _ => {
                let _ = writeln!(out, "error unknown command: {cmd}");
            }
        }
        let _ = out.flush();
    }
}
