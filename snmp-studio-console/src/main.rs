use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use snmp_studio_config::ConsoleArgs;
use snmp_studio_console::app::commands::{self, Command};
use snmp_studio_console::app::terminal::TerminalShell;
use snmp_studio_console::app::Console;
use tokio::io::{AsyncBufReadExt, BufReader};

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("snmp_studio_console", LevelFilter::Debug)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let args = ConsoleArgs::parse();
    let config = args
        .loader()
        .load()
        .context("loading console configuration")?;
    log::debug!("backend at {}", config.backend_url);

    let shell = Arc::new(TerminalShell::new());
    let console = match Console::boot(config, shell).await {
        Ok(console) => console,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        match commands::run(&console, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("{err:#}"),
        }
    }

    console.shutdown();
    Ok(())
}
