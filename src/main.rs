use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use serial_keygen::batch;
use serial_keygen::cli::{Cli, Commands, SerialArgs};
use serial_keygen::login::{normalize_login, read_login};
use serial_keygen::serial::{SerialReport, calculate_serial_with};
use serial_keygen::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init();
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => serial(SerialArgs::default()).await?,
        Some(Commands::Serial(args)) => serial(args).await?,
        Some(Commands::Batch(args)) => {
            let summary = batch::run(args).await?;
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{json}");
        }
    }
    Ok(())
}

async fn serial(args: SerialArgs) -> Result<()> {
    let login = match args.login {
        Some(login) => normalize_login(login.as_bytes()).to_vec(),
        None => {
            if !args.no_prompt {
                print!("Enter login: ");
                std::io::stdout().flush().context("failed to flush prompt")?;
            }
            read_login(&mut BufReader::new(tokio::io::stdin())).await?
        }
    };

    let serial = calculate_serial_with(&login, args.policy)?;
    tracing::debug!(len = login.len(), serial, policy = ?args.policy, "computed serial");

    if args.json {
        let report = SerialReport::new(&login, serial);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Serial: {serial}");
    }
    Ok(())
}
