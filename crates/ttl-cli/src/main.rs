//! ttlctl - default IPv4 TTL control
//!
//! Read, apply and persist the kernel's default TTL from the command line.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match ttl_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(ttl_cli::exit_code(&e))
        }
    }
}
