//! Alliance-contract stdin driver.
//!
//! Reads one command per line against an in-memory ledger:
//!
//!   init <json-alliance-data>
//!   invoke <json-completed-transaction>
//!   quit

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use hexfab::alliance::{handle_init, handle_invoke, AllianceData, TrxCompleted};
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
            "init" => match serde_json::from_str::<AllianceData>(rest) {
                Ok(data) => match handle_init(&mut ledger, &data) {
                    Ok(()) => {
                        let _ = writeln!(out, "ok registered alliance{}", data.contract_id);
                    }
                    Err(e) => {
                        let _ = writeln!(out, "error {e}");
                    }
                },
                Err(e) => {
                    let _ = writeln!(out, "error {e}");
                }
            },
            "invoke" => match serde_json::from_str::<TrxCompleted>(rest) {
                Ok(completed) => match handle_invoke(&mut ledger, &completed) {
                    Ok(data) => {
                        let _ = writeln!(out, "ok {:?} terms={}", data.state, data.terms.len());
                    }
                    Err(e) => {
                        let _ = writeln!(out, "error {e}");
                    }
                },
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
