// Terminal login against the fake backend
//
// Drives CodeSendFlow, then OtpEntryFlow, from stdin lines.

use anyhow::{Context, Result};
use clap::Parser;
use phone_auth::{AuthDeps, Config, LoginEvent, OtpEvent};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "phone-login", about = "Log in with a phone number and a one-time code")]
struct Args {
    /// Phone number to use instead of prompting
    #[arg(long)]
    phone: Option<String>,

    /// Override the fake backend latency (milliseconds)
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Print state snapshots as JSON
    #[arg(long)]
    json: bool,
}

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,phone_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(latency_ms) = args.latency_ms {
        config.fake_backend_latency_ms = latency_ms;
    }
    tracing::info!(?config, "Configuration loaded");

    let deps = AuthDeps::fake(&config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let Some(phone) = request_code(&deps, &args, &mut lines).await? else {
        return Ok(());
    };
    enter_code(&deps, &args, phone, &mut lines).await
}

/// Phone entry screen. Returns the phone the code went to, or `None` on EOF/quit.
async fn request_code(deps: &AuthDeps, args: &Args, lines: &mut InputLines) -> Result<Option<String>> {
    let flow = deps.login_flow();
    let mut events = flow.subscribe_events();
    let mut preset = args.phone.clone();

    loop {
        let raw = match preset.take() {
            Some(raw) => raw,
            None => {
                println!("Phone number ({}):", flow.policy().country_code);
                match next_line(lines).await? {
                    Some(line) if line != "quit" => line,
                    _ => return Ok(None),
                }
            }
        };

        flow.on_phone_changed(&raw);
        flow.send_code().await;
        print_state(args.json, &flow.state(), |state| {
            format!(
                "phone: {} valid: {} error: {}",
                state.display_phone(),
                state.is_valid,
                state.error.as_deref().unwrap_or("-")
            )
        })?;

        loop {
            match events.try_recv() {
                Ok(LoginEvent::CodeSent { phone }) => {
                    println!("Code sent to {phone}");
                    flow.close();
                    return Ok(Some(phone));
                }
                Ok(LoginEvent::Error { message }) => println!("Error: {message}"),
                Err(TryRecvError::Empty) => break,
                Err(e) => return Err(e).context("login event channel failed"),
            }
        }
    }
}

/// Code entry screen.
async fn enter_code(deps: &AuthDeps, args: &Args, phone: String, lines: &mut InputLines) -> Result<()> {
    let flow = deps.otp_flow(phone);
    let mut events = flow.subscribe_events();

    loop {
        let state = flow.state();
        println!(
            "Code for {} (`resend` in {}, `quit` to leave):",
            flow.phone(),
            if state.is_resend_available {
                "now".to_string()
            } else {
                state.countdown_label()
            }
        );

        let Some(line) = next_line(lines).await? else {
            flow.close();
            return Ok(());
        };
        match line.as_str() {
            "quit" => {
                flow.close();
                return Ok(());
            }
            "resend" => flow.resend_code().await,
            "" => {}
            code => {
                flow.on_code_changed(code);
                flow.submit().await;
            }
        }

        print_state(args.json, &flow.state(), |state| {
            format!(
                "code: {} error: {}",
                state.code,
                state.error.as_deref().unwrap_or("-")
            )
        })?;

        loop {
            match events.try_recv() {
                Ok(OtpEvent::Verified) => {
                    println!("Verified. Welcome!");
                    flow.close();
                    return Ok(());
                }
                Ok(OtpEvent::CodeResent) => println!("A new code is on its way"),
                Err(TryRecvError::Empty) => break,
                Err(e) => return Err(e).context("otp event channel failed"),
            }
        }
    }
}

async fn next_line(lines: &mut InputLines) -> Result<Option<String>> {
    let line = lines.next_line().await.context("Failed to read stdin")?;
    Ok(line.map(|l| l.trim().to_string()))
}

fn print_state<S: Serialize>(json: bool, state: &S, human: impl FnOnce(&S) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(state).context("Failed to encode state")?);
    } else {
        println!("{}", human(state));
    }
    Ok(())
}
