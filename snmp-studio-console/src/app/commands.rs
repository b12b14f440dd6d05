//! Stdin commands for the headless console.
//!
//! A bare route name (with or without the leading `#`) navigates; every
//! other line is an action on one of the screens.

use std::str::FromStr;

use anyhow::Context;
use snmp_studio_model::{TrapReceiverConfig, WalkRequest};
use thiserror::Error;

use crate::app::Console;
use crate::core::route::Route;
use crate::screens::{
    ExportFormat, FilesScreen, SettingsScreen, SimulatorScreen, TrapsScreen,
    WalkerScreen,
};

pub const HELP: &str = "\
commands:
  <route> | #<route>                 navigate (dashboard, simulator, walker, traps, files, settings)
  sim start [port] [community]       start the simulator
  sim stop | sim restart [port] [community]
  sim data <json>                    save simulator custom data
  walk <oid> [target] [port] [community] [--raw]
  export json|csv                    write the last walk result to a file
  traps start [port] [community] [--raw]
                                     start the trap receiver (--raw skips MIB resolution)
  traps stop | traps clear           stop the receiver, clear received traps
  mibs reload                        reload every MIB
  mibs delete <file>                 delete a MIB file, then reload
  passwd <user> <password> <confirm> change the console credentials
  reload [route]                     drop cached fragments (manual/ttl policies)
  help | quit";

const DEFAULT_SIM_PORT: u16 = 1061;
const DEFAULT_TRAP_PORT: u16 = 1162;
const DEFAULT_COMMUNITY: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(String),
    SimStart { port: u16, community: String },
    SimStop,
    SimRestart { port: u16, community: String },
    SimData(String),
    Walk(WalkRequest),
    Export(ExportFormat),
    TrapsStart(TrapReceiverConfig),
    TrapsStop,
    ClearTraps,
    MibsReload,
    MibsDelete(String),
    Passwd {
        username: String,
        password: String,
        confirm: String,
    },
    Reload(Option<String>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Navigate(String::new()));
        }
        if let Some(fragment) = line.strip_prefix('#') {
            return Ok(Command::Navigate(fragment.to_string()));
        }

        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default();
        let rest: Vec<&str> = words.collect();

        match (head, rest.as_slice()) {
            ("help", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),
            ("sim", ["start", args @ ..]) => {
                let (port, community) =
                    port_and_community(args, DEFAULT_SIM_PORT, SIM_USAGE)?;
                Ok(Command::SimStart { port, community })
            }
            ("sim", ["stop"]) => Ok(Command::SimStop),
            ("sim", ["restart", args @ ..]) => {
                let (port, community) =
                    port_and_community(args, DEFAULT_SIM_PORT, SIM_USAGE)?;
                Ok(Command::SimRestart { port, community })
            }
            ("sim", ["data", ..]) => {
                let json = line
                    .split_once("data")
                    .map(|(_, json)| json.trim())
                    .unwrap_or_default();
                if json.is_empty() {
                    return Err(CommandError::Usage("sim data <json>"));
                }
                Ok(Command::SimData(json.to_string()))
            }
            ("sim", _) => Err(CommandError::Usage("sim start|stop|restart|data")),
            ("walk", args) => walk_args(args).map(Command::Walk),
            ("export", ["json"]) => Ok(Command::Export(ExportFormat::Json)),
            ("export", ["csv"]) => Ok(Command::Export(ExportFormat::Csv)),
            ("export", _) => Err(CommandError::Usage("export json|csv")),
            ("traps", ["start", args @ ..]) => {
                let resolve_mibs = !args.contains(&"--raw");
                let positional: Vec<&str> =
                    args.iter().copied().filter(|arg| *arg != "--raw").collect();
                let (port, community) =
                    port_and_community(&positional, DEFAULT_TRAP_PORT, TRAPS_USAGE)?;
                Ok(Command::TrapsStart(TrapReceiverConfig {
                    port: Some(port),
                    community: Some(community),
                    resolve_mibs,
                }))
            }
            ("traps", ["stop"]) => Ok(Command::TrapsStop),
            ("traps", ["clear"]) => Ok(Command::ClearTraps),
            ("traps", _) => Err(CommandError::Usage("traps start|stop|clear")),
            ("mibs", ["reload"]) => Ok(Command::MibsReload),
            ("mibs", ["delete", file]) => Ok(Command::MibsDelete(file.to_string())),
            ("mibs", _) => Err(CommandError::Usage("mibs reload | mibs delete <file>")),
            ("passwd", [username, password, confirm]) => Ok(Command::Passwd {
                username: username.to_string(),
                password: password.to_string(),
                confirm: confirm.to_string(),
            }),
            ("passwd", _) => Err(CommandError::Usage("passwd <user> <password> <confirm>")),
            ("reload", []) => Ok(Command::Reload(None)),
            ("reload", [route]) => Ok(Command::Reload(Some(route.to_string()))),
            (name, []) if Route::from_name(name).is_some() => {
                Ok(Command::Navigate(name.to_string()))
            }
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

const SIM_USAGE: &str = "sim start|restart [port] [community]";
const TRAPS_USAGE: &str = "traps start [port] [community] [--raw]";

fn port_and_community(
    args: &[&str],
    default_port: u16,
    usage: &'static str,
) -> Result<(u16, String), CommandError> {
    if args.len() > 2 {
        return Err(CommandError::Usage(usage));
    }
    let port = match args.first() {
        Some(port) => port.parse().map_err(|_| CommandError::Usage(usage))?,
        None => default_port,
    };
    let community = args.get(1).copied().unwrap_or(DEFAULT_COMMUNITY);
    Ok((port, community.to_string()))
}

fn walk_args(args: &[&str]) -> Result<WalkRequest, CommandError> {
    const USAGE: &str = "walk <oid> [target] [port] [community] [--raw]";

    let raw = args.contains(&"--raw");
    let positional: Vec<&str> =
        args.iter().copied().filter(|arg| *arg != "--raw").collect();

    let mut request = WalkRequest {
        parse: !raw,
        use_mibs: !raw,
        ..WalkRequest::default()
    };
    match positional.as_slice() {
        [] => return Err(CommandError::Usage(USAGE)),
        [oid, rest @ ..] => {
            request.oid = oid.to_string();
            if let Some(target) = rest.first() {
                request.target = target.to_string();
            }
            if let Some(port) = rest.get(1) {
                request.port = port.parse().map_err(|_| CommandError::Usage(USAGE))?;
            }
            if let Some(community) = rest.get(2) {
                request.community = community.to_string();
            }
        }
    }
    Ok(request)
}

/// Runs one command. Returns `false` when the console should exit.
pub async fn run(console: &Console, command: Command) -> anyhow::Result<bool> {
    let ctx = console.context().clone();
    match command {
        Command::Navigate(fragment) => {
            console.set_location(fragment);
        }
        Command::SimStart { port, community } => {
            SimulatorScreen::new(ctx).start(port, &community).await?;
        }
        Command::SimStop => {
            SimulatorScreen::new(ctx).stop().await?;
        }
        Command::SimRestart { port, community } => {
            SimulatorScreen::new(ctx).restart(port, &community).await?;
        }
        Command::SimData(json) => {
            SimulatorScreen::new(ctx).save_custom_data(&json).await?;
        }
        Command::Walk(request) => {
            WalkerScreen::new(ctx).execute(request).await?;
        }
        Command::Export(format) => {
            let export = WalkerScreen::new(ctx).export(format)?;
            std::fs::write(&export.file_name, &export.content)
                .with_context(|| format!("writing {}", export.file_name))?;
            println!("wrote {} ({})", export.file_name, format.mime());
        }
        Command::TrapsStart(config) => {
            let response = TrapsScreen::new(ctx).start(&config).await?;
            println!("{}", response.summary());
        }
        Command::TrapsStop => {
            let response = TrapsScreen::new(ctx).stop().await?;
            println!("{}", response.summary());
        }
        Command::ClearTraps => {
            TrapsScreen::new(ctx).clear().await?;
        }
        Command::MibsReload => {
            let reload = FilesScreen::new(ctx).reload().await?;
            println!("{}", reload.summary());
        }
        Command::MibsDelete(file) => {
            let reload = FilesScreen::new(ctx).delete(&file).await?;
            println!("deleted {file}. {}", reload.summary());
        }
        Command::Passwd {
            username,
            password,
            confirm,
        } => {
            SettingsScreen::new(ctx)
                .update_credentials(&username, &password, &confirm)
                .await?;
            println!("Credentials updated. Restart the console with the new ones.");
        }
        Command::Reload(route) => {
            let dropped = {
                let mut cache = console.router().cache();
                match &route {
                    Some(name) => cache.invalidate(name),
                    None => cache.clear(),
                }
            };
            if !dropped {
                println!("fragment cache policy keeps entries for the session");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_names_and_fragments_navigate() {
        assert_eq!("walker".parse::<Command>(), Ok(Command::Navigate("walker".into())));
        assert_eq!("#traps".parse::<Command>(), Ok(Command::Navigate("traps".into())));
        assert_eq!("#nowhere".parse::<Command>(), Ok(Command::Navigate("nowhere".into())));
        assert_eq!(
            "nowhere".parse::<Command>(),
            Err(CommandError::Unknown("nowhere".into()))
        );
    }

    #[test]
    fn simulator_commands_use_defaults() {
        assert_eq!(
            "sim start".parse::<Command>(),
            Ok(Command::SimStart {
                port: 1061,
                community: "public".into()
            })
        );
        assert_eq!(
            "sim restart 2161 private".parse::<Command>(),
            Ok(Command::SimRestart {
                port: 2161,
                community: "private".into()
            })
        );
        assert_eq!(
            r#"sim data {"1.3.6.1.2.1.1.5.0": "lab"}"#.parse::<Command>(),
            Ok(Command::SimData(r#"{"1.3.6.1.2.1.1.5.0": "lab"}"#.into()))
        );
        assert!("sim start notaport".parse::<Command>().is_err());
    }

    #[test]
    fn trap_receiver_and_mib_commands() {
        assert_eq!(
            "traps start".parse::<Command>(),
            Ok(Command::TrapsStart(TrapReceiverConfig {
                port: Some(1162),
                community: Some("public".into()),
                resolve_mibs: true,
            }))
        );
        assert_eq!(
            "traps start 2162 --raw".parse::<Command>(),
            Ok(Command::TrapsStart(TrapReceiverConfig {
                port: Some(2162),
                community: Some("public".into()),
                resolve_mibs: false,
            }))
        );
        assert_eq!("traps stop".parse::<Command>(), Ok(Command::TrapsStop));
        assert_eq!("mibs reload".parse::<Command>(), Ok(Command::MibsReload));
        assert_eq!(
            "mibs delete IF-MIB.txt".parse::<Command>(),
            Ok(Command::MibsDelete("IF-MIB.txt".into()))
        );
        assert!("mibs delete".parse::<Command>().is_err());
        assert_eq!(
            "traps start 1162 public extra".parse::<Command>(),
            Err(CommandError::Usage("traps start [port] [community] [--raw]"))
        );
    }

    #[test]
    fn walk_parses_positionals_and_raw_flag() {
        let Ok(Command::Walk(request)) =
            "walk 1.3.6.1.2.1.1 10.0.0.7 161 private --raw".parse::<Command>()
        else {
            panic!("expected a walk command");
        };
        assert_eq!(request.oid, "1.3.6.1.2.1.1");
        assert_eq!(request.target, "10.0.0.7");
        assert_eq!(request.port, 161);
        assert_eq!(request.community, "private");
        assert!(!request.parse);

        assert_eq!(
            "walk".parse::<Command>(),
            Err(CommandError::Usage("walk <oid> [target] [port] [community] [--raw]"))
        );
    }
}
