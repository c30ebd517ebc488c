//! muxcable CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sonic_cli_common::platform::DEFAULT_PORT_CONFIG_PATH;
use sonic_cli_common::{PortMap, RedisConfig, RedisDatabase};
use sonic_muxcable::context::{CliContext, DbShard};
use sonic_muxcable::error::CmdResult;
use sonic_muxcable::hwmode::ToggleRunner;
use sonic_muxcable::tables::{
    EXIT_CONFIG_SUCCESSFUL, EXIT_FAIL, EXIT_SHOW_CONFIG_SUCCESSFUL, EXIT_SHOW_STATUS_SUCCESSFUL,
    EXIT_SUCCESS,
};
use sonic_muxcable::types::{ALL_PORTS, MuxMode, MuxTarget};
use sonic_muxcable::{mode, output, show};
use sonic_y_cable::PlatformDriver;

/// SONiC mux cable operator CLI
#[derive(Parser, Debug)]
#[command(name = "muxcable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Redis server host
    #[arg(long, global = true, default_value = "127.0.0.1")]
    redis_host: String,

    /// Redis server port
    #[arg(long, global = true, default_value_t = 6379)]
    redis_port: u16,

    /// Port config file listing the switch's logical ports
    #[arg(long, global = true, default_value = DEFAULT_PORT_CONFIG_PATH)]
    port_config: PathBuf,

    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile the configured mux mode for one port, or "all"
    Mode {
        /// Mode to configure
        #[arg(value_enum)]
        state: MuxMode,

        /// Port name, or "all"
        port: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drive the mux hardware directly
    #[command(subcommand)]
    Hwmode(HwmodeCommand),

    /// Show the observed mux status from STATE_DB
    Status {
        /// Port name; omit for all ports
        port: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the desired mux configuration from CONFIG_DB
    Config {
        /// Port name; omit for all ports
        port: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum HwmodeCommand {
    /// Toggle the mux at one port, or "all", to the given state
    State {
        /// State to toggle to
        #[arg(value_enum)]
        state: MuxTarget,

        /// Port name, or "all"
        port: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.opts.log_level);

    if requires_root(&cli.command) && !nix::unistd::geteuid().is_root() {
        eprintln!("Root privileges are required for this operation");
        return ExitCode::from(EXIT_FAIL);
    }

    let ctx = match build_context(&cli.opts).await {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::from(EXIT_FAIL);
        }
    };

    match run(&ctx, cli.command).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(EXIT_FAIL)
        }
    }
}

/// Initializes tracing to stderr. `RUST_LOG` overrides the CLI level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// Commands that write CONFIG_DB or touch hardware are root-only, matching
// the rest of the config toolchain.
fn requires_root(command: &Command) -> bool {
    matches!(command, Command::Mode { .. } | Command::Hwmode(_))
}

async fn build_context(opts: &GlobalOpts) -> CmdResult<CliContext> {
    let topology = PortMap::from_port_config(&opts.port_config)?;
    let config =
        RedisDatabase::new(RedisConfig::config_db(opts.redis_host.as_str(), opts.redis_port))
            .await?;
    let state =
        RedisDatabase::new(RedisConfig::state_db(opts.redis_host.as_str(), opts.redis_port))
            .await?;
    Ok(CliContext::new(
        Arc::new(topology),
        vec![DbShard::new(0, Arc::new(config), Arc::new(state))],
    ))
}

async fn run(ctx: &CliContext, command: Command) -> CmdResult<u8> {
    match command {
        Command::Mode { state, port, json } => run_mode(ctx, state, &port, json).await,
        Command::Hwmode(HwmodeCommand::State { state, port, yes }) => {
            run_hwmode(ctx, state, &port, yes).await
        }
        Command::Status { port, json } => run_status(ctx, port.as_deref(), json).await,
        Command::Config { port, json } => run_config(ctx, port.as_deref(), json).await,
    }
}

async fn run_mode(ctx: &CliContext, state: MuxMode, port: &str, json: bool) -> CmdResult<u8> {
    let report = mode::run(ctx, state, port).await?;
    for (_, err) in &report.errors {
        eprintln!("Error: {}", err);
    }
    if json {
        println!("{}", output::render_mode_json(&report.outcomes)?);
    } else {
        print!("{}", output::render_mode_table(&report.outcomes)?);
    }
    Ok(if report.failed() {
        EXIT_FAIL
    } else {
        EXIT_CONFIG_SUCCESSFUL
    })
}

async fn run_hwmode(ctx: &CliContext, target: MuxTarget, port: &str, yes: bool) -> CmdResult<u8> {
    if !yes {
        let prompt = if port == ALL_PORTS {
            format!(
                "Mux cables at all ports will be toggled to {} state. Continue?",
                target
            )
        } else {
            format!(
                "Mux cable at port {} will be toggled to {} state. Continue?",
                port, target
            )
        };
        if !output::confirm(&prompt)? {
            println!("Aborted!");
            return Ok(EXIT_FAIL);
        }
    }

    let runner = ToggleRunner::new();
    let cable = PlatformDriver::new();

    if port == ALL_PORTS {
        let report = runner.toggle_all(ctx, &cable, target).await;
        for (port, result) in &report.results {
            match result {
                Ok(()) => println!("Success in toggling port {} to {}", port, target),
                Err(err) => eprintln!("Error: {}", err),
            }
        }
        Ok(if report.failed() { EXIT_FAIL } else { EXIT_SUCCESS })
    } else {
        runner.toggle_port(ctx, &cable, port, target).await?;
        println!("Success in toggling port {} to {}", port, target);
        Ok(EXIT_SUCCESS)
    }
}

async fn run_status(ctx: &CliContext, port: Option<&str>, json: bool) -> CmdResult<u8> {
    let rows = match port {
        Some(port) => show::status_port(ctx, port).await?,
        None => show::status_all(ctx).await?,
    };
    if json {
        println!("{}", output::render_status_json(&rows)?);
    } else {
        print!("{}", output::render_status_table(&rows)?);
    }
    Ok(EXIT_SHOW_STATUS_SUCCESSFUL)
}

async fn run_config(ctx: &CliContext, port: Option<&str>, json: bool) -> CmdResult<u8> {
    let report = match port {
        Some(port) => show::config_port(ctx, port).await?,
        None => show::config_all(ctx).await?,
    };
    if json {
        println!("{}", output::render_config_json(&report)?);
    } else {
        print!("{}", output::render_config_table(&report)?);
    }
    Ok(EXIT_SHOW_CONFIG_SUCCESSFUL)
}
