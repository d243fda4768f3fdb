use std::io;

use mailbox_chess::uci::uci_top::run_stdio_loop;
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    // Logs go to stderr; stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    run_stdio_loop()
}
