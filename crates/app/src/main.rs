//! Crossportal - Main Entry Point
//!
//! Wires the cross-portal auth service to its desktop adapters and runs a
//! single command.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use crossportal_application::{
    CrossPortalAuth, PortalBrowser, SessionHolder, TokenExchanger, listen_for_signouts,
    spawn_expiry_sweep,
};
use crossportal_domain::{Portal, PrimarySession, UserIdentity};
use crossportal_infrastructure::{
    FileSessionStorage, PortalConfig, ReqwestTokenExchanger, SignoutChannel, SystemBrowser,
    SystemClock,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Command, USAGE};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = PortalConfig::from_env()?;
    tracing::debug!(
        "Starting Crossportal v{} as {}",
        env!("CARGO_PKG_VERSION"),
        config.current_portal
    );

    let channel = SignoutChannel::new();
    let auth = Arc::new(CrossPortalAuth::new(
        ReqwestTokenExchanger::new(&config.auth_service_url)?,
        SystemBrowser::new(channel.clone()),
        Arc::new(SystemClock::new()),
        SessionHolder::new(Arc::new(FileSessionStorage::new(&config.session_file))),
        config.auth_options(),
    ));
    auth.session().restore().await?;

    let sweep = spawn_expiry_sweep(Arc::clone(&auth), config.sweep_interval);
    let listener = listen_for_signouts(Arc::clone(&auth), channel.subscribe());

    let result = execute(&auth, command).await;

    sweep.abort();
    listener.abort();
    result
}

async fn execute<E, B>(
    auth: &CrossPortalAuth<E, B>,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>>
where
    E: TokenExchanger,
    B: PortalBrowser,
{
    match command {
        Command::Login { user_id, token } => {
            let session = PrimarySession::new(UserIdentity::new(user_id), token, Utc::now());
            auth.establish_session(session).await?;
            println!("Signed in.");
        }
        Command::Open { portal, path } => {
            auth.navigate_to_portal(portal, path.as_deref()).await?;
            println!("Opened {portal}.");
        }
        Command::Status => {
            match auth.session().current().await {
                Some(session) => println!("Signed in as {}", session.user.id),
                None => println!("Not signed in"),
            }
            for portal in Portal::ALL {
                let status = auth.portal_status(portal).await;
                println!("  {portal:<16} {}", status.display_message());
            }
        }
        Command::SignOut => {
            auth.sign_out().await?;
            println!("Signed out of all portals.");
        }
        Command::Help => println!("{USAGE}"),
    }
    Ok(())
}
