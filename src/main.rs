// ── eoa-registrar ─────────────────────────────────────────────────────────────
//
// Command-line front end used by the installer and launcher.  All behavior
// lives in the library; this file parses arguments, sets up logging, and
// maps the outcome to an exit code.

#![deny(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use eoa_registrar::{
    config::{AppIdentity, OsVersion},
    error::Result,
    input::InputSink,
    platform,
    registrar::Registrar,
    store::{ConfigStore, Scope},
};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "EOA_REGISTRAR_LOG";

#[derive(Parser)]
#[command(name = "eoa-registrar", version, about = "Ease of Access Center registration")]
struct Cli {
    /// JSON file overriding the built-in application identity.
    #[arg(long, global = true)]
    identity: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register as an assistive technology (requires elevation).
    Register {
        /// Directory holding the installed executables.
        install_dir: PathBuf,
    },
    /// Remove the registration and the machine-wide auto-start entry.
    Unregister,
    /// Print registration and auto-start state as JSON.
    Status,
    /// Pass a signal to the Ease of Access shell.
    Notify { signal: u32 },
    /// Turn logon auto-start on or off.
    AutoStart {
        #[arg(value_enum)]
        scope: ScopeArg,
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Machine,
    User,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Machine => Scope::Machine,
            ScopeArg::User => Scope::User,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Serialize)]
struct Status {
    registered: bool,
    auto_start: AutoStartStatus,
    can_configure_terminate_on_desktop_switch: bool,
    os_version: OsVersion,
}

#[derive(Serialize)]
struct AutoStartStatus {
    machine: bool,
    user: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute<S: ConfigStore, I: InputSink>(registrar: &Registrar<S, I>, command: Command) -> Result<()> {
    match command {
        Command::Register { install_dir } => registrar.register(&install_dir),
        Command::Unregister => {
            registrar.unregister();
            Ok(())
        }
        Command::Status => {
            let config = registrar.config();
            let status = Status {
                registered: registrar.is_registered(),
                auto_start: AutoStartStatus {
                    machine: registrar.will_auto_start(Scope::Machine),
                    user: registrar.will_auto_start(Scope::User),
                },
                can_configure_terminate_on_desktop_switch: config
                    .can_configure_terminate_on_desktop_switch,
                os_version: config.os,
            };
            let json = serde_json::to_string_pretty(&status)?;
            println!("{json}");
            Ok(())
        }
        Command::Notify { signal } => registrar.notify(signal),
        Command::AutoStart { scope, state } => {
            registrar.set_auto_start(scope.into(), matches!(state, Toggle::On))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let identity = match &cli.identity {
        Some(path) => AppIdentity::load(path)?,
        None => AppIdentity::default(),
    };
    let registrar = platform::native_registrar(identity)?;
    execute(&registrar, cli.command)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(cli) {
        tracing::error!(%error, "eoa-registrar failed");
        std::process::exit(1);
    }
}
