//! instancer - terminal client for the CTF challenge instancer
//!
//! This is the binary entry point. Screens and state live in the workspace
//! crates; this file wires settings, the API client and a frontend together.

mod headless;
mod startup;

use std::path::PathBuf;

use clap::Parser;
use instancer_core::prelude::*;

/// Terminal client for the CTF challenge instancer
#[derive(Parser, Debug)]
#[command(name = "instancer")]
#[command(about = "Deploy, extend and terminate CTF challenge instances", long_about = None)]
pub struct Args {
    /// Settings file (defaults to <config dir>/instancer/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Instancer base URL, overrides the settings file
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Open this challenge on start
    #[arg(long, value_name = "ID")]
    pub chall: Option<String>,

    /// One-time login token
    #[arg(long, value_name = "TOKEN")]
    pub login_token: Option<String>,

    /// Login link as handed out by the instancer (…/login?token=…&chall=…)
    #[arg(long, value_name = "URL")]
    pub login_url: Option<String>,

    /// Client configuration as JSON, overrides [client] in the settings file
    #[arg(long, value_name = "JSON")]
    pub client_conf: Option<String>,

    /// Neither read nor write the stored session
    #[arg(long)]
    pub no_store: bool,

    /// Run in headless mode (JSON output, commands on stdin, no TUI)
    #[arg(long)]
    pub headless: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize error handling
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Initialize logging (to file, since the TUI and headless output own stdout)
    instancer_core::logging::init()?;

    if let Err(e) = run(&args).await {
        error!("Application error: {:?}", e);
        // The terminal is restored by now
        eprintln!("instancer: {}", e);
        std::process::exit(exit_code(&e));
    }

    info!("instancer exiting");
    Ok(())
}

async fn run(args: &Args) -> Result<()> {
    let settings = startup::resolve_settings(args)?;
    let route = startup::initial_route(args);
    let login_token = args.login_token.clone();

    if args.headless {
        headless::runner::run_headless(&settings, args, route, login_token).await
    } else {
        let mut engine = startup::build_engine(&settings, args)?;
        engine.start(route, login_token);
        instancer_tui::run(engine, settings.ui.tick_rate()).await
    }
}

/// 2 when the setup needs fixing before a retry can help, 1 otherwise
fn exit_code(err: &Error) -> i32 {
    if err.is_fatal() {
        2
    } else {
        1
    }
}
