use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::serial::LoginPolicy;

/// Top-level CLI definition for serial-keygen.
///
/// Without a subcommand the tool prompts for a login on stdin and prints its serial.
#[derive(Parser, Debug)]
#[command(name = "serial-keygen")]
#[command(about = "Derive the 32-bit serial for a login", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the serial for a single login.
    Serial(SerialArgs),
    /// Compute serials for every login in a file, one per line.
    Batch(BatchArgs),
}

/// Arguments for the `serial` subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct SerialArgs {
    /// Login to use; read from stdin when omitted.
    pub login: Option<String>,

    /// Validation rules applied before the serial is computed.
    #[arg(long, value_enum, default_value_t = LoginPolicy::Relaxed)]
    pub policy: LoginPolicy,

    /// Print a JSON report instead of the `Serial:` line.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Skip the `Enter login: ` prompt when reading from stdin.
    #[arg(long, default_value_t = false)]
    pub no_prompt: bool,
}

/// Arguments for the `batch` subcommand.
#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// File with one login per line; `-` reads stdin.
    #[arg(long)]
    pub input: PathBuf,

    /// Validation rules applied to every login.
    #[arg(long, value_enum, default_value_t = LoginPolicy::Relaxed)]
    pub policy: LoginPolicy,
}
