//! Console presentation: prompts, banner and the event table

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use tokio::io::{BufReader, Lines, Stdin};
use tokio::sync::broadcast::error::RecvError;

use lamport_core::ProcessId;
use lamport_runtime::{Endpoint, EndpointEvent};

/// Line-oriented stdin
pub type Input = Lines<BufReader<Stdin>>;

/// Rows shown in the event table
const VISIBLE_EVENTS: usize = 10;

pub fn clear_screen() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
}

pub fn print_welcome() {
    println!("{}", "╔════════════════════════════════════════════════════════════╗".yellow());
    println!("{}", "║            Welcome to lamport clock simulator              ║".yellow().bold());
    println!("{}", "╚════════════════════════════════════════════════════════════╝".yellow());
    println!();
}

pub fn print_goodbye() {
    println!("{}", "╔════════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║        Exiting lamport clock simulator, Goodbye !          ║".cyan().bold());
    println!("{}", "╚════════════════════════════════════════════════════════════╝".cyan());
}

pub fn print_error(msg: &str) {
    println!("{}", format!("Error: {}", msg).red().bold());
}

/// Print without a newline and flush
pub fn prompt(text: &str) {
    print!("{}", text.cyan().bold());
    let _ = io::stdout().flush();
}

fn print_menu_prompt() {
    println!(
        "{}",
        "Available events: `l` - local event or `s` - send message".cyan()
    );
    print!(
        "{}{}{}",
        "Please enter event type: ".cyan().bold(),
        "[l/s] ".white().bold(),
        "(default: l) : ".dim()
    );
    let _ = io::stdout().flush();
}

/// Redraw the banner and the last events. With `with_prompt` the menu prompt
/// is re-printed, for redraws triggered by the background feed.
pub fn render(endpoint: &Endpoint, with_prompt: bool) {
    let _ = clear_screen();

    let banner = format!(
        "Listening for incoming messages at port {}",
        endpoint.identity()
    );
    println!("{}", format!("== Lamport Clock Simulator == {}", banner).green().bold());
    println!();

    println!("{}", format!("{:>6}  {}", "#", "Event").blue().bold());
    for record in endpoint.recent(VISIBLE_EVENTS) {
        println!("{:>6}  {}", record.seq.to_string().dim(), record.to_string().green());
    }
    println!();

    if with_prompt {
        print_menu_prompt();
    }
}

/// Interactive loop over an endpoint
pub struct SimUI {
    endpoint: Arc<Endpoint>,
}

impl SimUI {
    pub fn new(endpoint: Arc<Endpoint>) -> Self {
        Self { endpoint }
    }

    /// Run until stdin closes
    pub async fn run(&mut self, input: &mut Input) -> io::Result<()> {
        // Redraw whenever a message arrives
        let endpoint = Arc::clone(&self.endpoint);
        let mut feed = endpoint.subscribe();
        let feed_handle = tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(EndpointEvent::Recorded(record)) if record.kind.is_received() => {
                        render(&endpoint, true);
                    }
                    Ok(EndpointEvent::Recorded(_)) => {}
                    Ok(EndpointEvent::ReceiveFailed { reason }) => {
                        println!();
                        print_error(&format!("Error receiving message: {}", reason));
                        print_menu_prompt();
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Display skipped {} feed entries", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let result = self.menu_loop(input).await;
        feed_handle.abort();
        result
    }

    async fn menu_loop(&mut self, input: &mut Input) -> io::Result<()> {
        loop {
            print_menu_prompt();
            let Some(line) = input.next_line().await? else {
                return Ok(());
            };

            match line.trim() {
                "" | "l" => {
                    self.endpoint.record_local_event();
                    render(&self.endpoint, false);
                }
                "s" => self.send_flow(input).await?,
                _ => print_error("Please type 'l' or 's'"),
            }
        }
    }

    /// Ask for a destination until a send succeeds; empty input cancels
    async fn send_flow(&mut self, input: &mut Input) -> io::Result<()> {
        loop {
            prompt("Please type the destination port (empty to cancel): ");
            let Some(line) = input.next_line().await? else {
                return Ok(());
            };
            if line.trim().is_empty() {
                return Ok(());
            }

            let dest = match ProcessId::parse(&line) {
                Ok(dest) => dest,
                Err(e) => {
                    print_error(&e.to_string());
                    continue;
                }
            };

            match self.endpoint.send_message(dest).await {
                Ok(_) => {
                    render(&self.endpoint, false);
                    return Ok(());
                }
                Err(e) => print_error(&e.to_string()),
            }
        }
    }
}
