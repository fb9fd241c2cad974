//! Line-oriented interactive shell
//!
//! Reads one command per line and dispatches it to a catalog query. Bad
//! input prints a message and the loop continues; only `quit`, `exit`,
//! end of input or Ctrl-C stop it.

use std::future::Future;
use std::io::BufRead;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::config::Connection;
use crate::demo::{QueryRunner, RunOptions};
use crate::queries::{DEFAULT_MIN_RATING, DEFAULT_POPULAR_LIMIT};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Users,
    Products,
    Purchases(String),
    Friends(String),
    Recommend(String),
    Network(String),
    Category(String),
    Rated(i64),
    Popular(i64),
    Analytics,
    Demo,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("not a number: {0}")]
    InvalidNumber(String),
}

fn number(arg: Option<&str>, default: i64) -> Result<i64, ParseError> {
    match arg {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| ParseError::InvalidNumber(s.to_string())),
    }
}

fn limit(arg: Option<&str>, default: i64) -> Result<i64, ParseError> {
    let n = number(arg, default)?;
    if n < 0 {
        return Err(ParseError::InvalidNumber(n.to_string()));
    }
    Ok(n)
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let required = |name: &'static str| {
        arg.map(str::to_string)
            .ok_or(ParseError::MissingArgument(name))
    };

    let command = match cmd.to_ascii_lowercase().as_str() {
        "users" => Command::Users,
        "products" => Command::Products,
        "purchases" => Command::Purchases(required("purchases")?),
        "friends" => Command::Friends(required("friends")?),
        "recommend" => Command::Recommend(required("recommend")?),
        "network" => Command::Network(required("network")?),
        // category names may contain spaces
        "category" => {
            let name = line.trim_start()[cmd.len()..].trim();
            if name.is_empty() {
                return Err(ParseError::MissingArgument("category"));
            }
            Command::Category(name.to_string())
        }
        "rated" => Command::Rated(number(arg, DEFAULT_MIN_RATING)?),
        "popular" => Command::Popular(limit(arg, DEFAULT_POPULAR_LIMIT)?),
        "analytics" => Command::Analytics,
        "demo" => Command::Demo,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn print_help() {
    println!("Available commands:");
    println!("  users               Show all users");
    println!("  products            Show all products");
    println!("  purchases <user_id> Show user purchases");
    println!("  friends <user_id>   Show user friends");
    println!("  recommend <user_id> Show recommendations for a user");
    println!("  network <user_id>   Show network size");
    println!("  category <name>     Show products in a category");
    println!("  rated [min]         Show products rated at least min (default {})", DEFAULT_MIN_RATING);
    println!("  popular [limit]     Show popular products (default {})", DEFAULT_POPULAR_LIMIT);
    println!("  analytics           Show purchase analytics");
    println!("  demo                Run every demo query");
    println!("  quit                Exit");
}

/// Feed lines from a blocking reader into a channel
///
/// The reader lives on its own thread so a pending read never holds up
/// the shell's select loop. The thread ends at EOF, on a read error, or
/// once the shell drops the receiver.
fn spawn_reader<R: BufRead + Send + 'static>(mut input: R) -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || loop {
        let mut line = String::new();
        let next = match input.read_line(&mut line) {
            Ok(0) => return, // EOF
            Ok(_) => Ok(line),
            Err(e) => Err(e),
        };
        let failed = next.is_err();
        if tx.blocking_send(next).is_err() || failed {
            return;
        }
    });
    rx
}

/// Interactive loop over any line source
pub struct Shell {
    lines: mpsc::Receiver<std::io::Result<String>>,
    runner: QueryRunner,
}

impl Shell {
    pub fn new<R: BufRead + Send + 'static>(input: R, connection: &Connection, options: &RunOptions) -> Self {
        Self {
            lines: spawn_reader(input),
            runner: QueryRunner::new(connection, options.style, options.format),
        }
    }

    /// Run one command; returns false when the shell should stop
    pub async fn execute(&self, command: Command) -> bool {
        debug!(?command, "Executing");
        match command {
            Command::Users => {
                self.runner.all_users().await;
            }
            Command::Products => {
                self.runner.all_products().await;
            }
            Command::Purchases(id) => {
                self.runner.user_purchases(&id).await;
            }
            Command::Friends(id) => {
                self.runner.user_friends(&id).await;
            }
            Command::Recommend(id) => {
                self.runner.recommendations_for_user(&id).await;
            }
            Command::Network(id) => {
                self.runner.user_network_size(&id).await;
            }
            Command::Category(name) => {
                self.runner.products_by_category(&name).await;
            }
            Command::Rated(min) => {
                self.runner.high_rated_products(min).await;
            }
            Command::Popular(limit) => {
                self.runner.popular_products(limit).await;
            }
            Command::Analytics => {
                self.runner.purchase_analytics().await;
            }
            Command::Demo => self.runner.run_all().await,
            Command::Help => print_help(),
            Command::Quit => return false,
        }
        true
    }

    /// Read and execute commands until `quit` or end of input
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Like [`Shell::run`], but also stop as soon as `interrupt` completes
    ///
    /// An interrupt between commands ends the loop at once; one that
    /// arrives mid-command is seen after that command finishes.
    pub async fn run_until<F: Future<Output = ()>>(&mut self, interrupt: F) -> anyhow::Result<()> {
        println!("\nInteractive Mode");
        println!("{}", "=".repeat(30));
        print_help();

        tokio::pin!(interrupt);
        loop {
            eprint!("\n> ");

            let line = tokio::select! {
                biased;
                _ = &mut interrupt => {
                    println!();
                    debug!("Interrupted");
                    break;
                }
                line = self.lines.recv() => match line {
                    None => break, // EOF
                    Some(line) => line?,
                },
            };

            match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => {
                    if !self.execute(command).await {
                        break;
                    }
                }
                Err(e) => {
                    debug!("Rejected input: {}", e);
                    println!("Invalid command or missing parameters");
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}

/// Resolves on Ctrl-C; never, if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run a shell on `input`, closing the connection when it ends
///
/// Ctrl-C ends the shell the same way `quit` does.
pub async fn run_shell<R: BufRead + Send + 'static>(
    input: R,
    connection: &Connection,
    options: &RunOptions,
) -> anyhow::Result<()> {
    run_shell_until(input, connection, options, ctrl_c()).await
}

async fn run_shell_until<R, F>(input: R, connection: &Connection, options: &RunOptions, interrupt: F) -> anyhow::Result<()>
where
    R: BufRead + Send + 'static,
    F: Future<Output = ()>,
{
    let mut shell = Shell::new(input, connection, options);
    let result = shell.run_until(interrupt).await;
    if let Err(e) = connection.close().await {
        error!("Failed to close connection: {}", e);
    }
    result
}
