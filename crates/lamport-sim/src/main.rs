//! Lamport Clock Simulator
//!
//! One running instance is one process. It can:
//! - Record local events
//! - Send timestamped messages to other instances
//! - Receive messages in the background and advance its clock

mod ui;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use lamport_core::{LamportError, ProcessId};
use lamport_runtime::{telemetry, Endpoint, EndpointConfig};
use lamport_transport::is_port_available;

use ui::{Input, SimUI};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they stay out of the redrawn screen
    telemetry::init_tracing("warn");

    ui::clear_screen()?;
    ui::print_welcome();

    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();

    let Some(port) = prompt_port(&mut input).await? else {
        return Ok(());
    };

    let endpoint = Arc::new(Endpoint::bind(EndpointConfig::new(port)).await?);
    tracing::debug!("Endpoint bound at {}", endpoint.local_addr());

    ui::clear_screen()?;
    ui::render(&endpoint, false);

    let mut sim = SimUI::new(Arc::clone(&endpoint));

    tokio::select! {
        result = sim.run(&mut input) => result?,
        _ = tokio::signal::ctrl_c() => {}
    }

    ui::clear_screen()?;
    ui::print_goodbye();
    Ok(())
}

/// Ask for this process's port until it is valid and free.
/// `None` if stdin closes first.
async fn prompt_port(input: &mut Input) -> Result<Option<ProcessId>, Box<dyn std::error::Error>> {
    loop {
        ui::prompt("Please enter a port number for this process: ");
        let Some(line) = input.next_line().await? else {
            return Ok(None);
        };

        let port = match ProcessId::parse(&line) {
            Ok(port) => port,
            Err(LamportError::InvalidPort(_)) => {
                ui::print_error("Port number must be an integer.");
                continue;
            }
            Err(LamportError::PortOutOfRange(_)) => {
                ui::print_error("Port number must be between 1024 and 65535.");
                continue;
            }
            Err(e) => {
                ui::print_error(&e.to_string());
                continue;
            }
        };

        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port.port());
        if !is_port_available(addr).await {
            ui::print_error("Port number is already in use.");
            continue;
        }

        return Ok(Some(port));
    }
}
