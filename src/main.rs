// turnstay-webhooks - Command Line Entry Point
//
// Operator tooling around the SDK:
// - trigger: emit an event through the webhook-service or the queue
// - sign: produce a signature header for a payload
// - verify: check a signed payload and print the parsed event
//
// Results go to stdout, logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;
use turnstay_webhooks::config::{LoggingConfig, Settings};
use turnstay_webhooks::{signature, DeliveryMode, Event, JsonObject, WebhookClient};

/// TurnStay webhooks: emit, sign and verify event notifications
#[derive(Parser, Debug)]
#[command(name = "turnstay-webhooks")]
#[command(author = "TurnStay Contributors")]
#[command(version)]
#[command(about = "Emit, sign and verify TurnStay webhook events", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: ~/.config/turnstay-webhooks/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Emit a webhook event
    Trigger {
        /// Event type (e.g. payment_intent.succeeded)
        event_type: String,

        /// Event data as a JSON object
        #[arg(long, default_value = "{}")]
        data: String,

        /// Human-readable event name (defaults to the event type)
        #[arg(long)]
        name: Option<String>,

        /// Delivery mode (http or queue)
        #[arg(long)]
        mode: Option<DeliveryMode>,

        /// Webhook-service base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Queue URL for queue mode
        #[arg(long)]
        queue_url: Option<String>,
    },
    /// Print a signature header for a payload
    Sign {
        /// Endpoint secret
        #[arg(long, env = "TURNSTAY_WEBHOOKS_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Raw payload to sign
        #[arg(long)]
        payload: String,

        /// Unix timestamp to sign with (default: now)
        #[arg(long, allow_hyphen_values = true)]
        timestamp: Option<i64>,
    },
    /// Verify a signed payload and print the event
    Verify {
        /// Endpoint secret
        #[arg(long, env = "TURNSTAY_WEBHOOKS_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Signature header value (t=..., v1=...)
        #[arg(long)]
        header: String,

        /// Raw payload as received
        #[arg(long)]
        payload: String,

        /// Replay window in seconds, 0 disables the check
        #[arg(long)]
        tolerance: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref(), args.verbose)?;

    init_tracing(&settings.logging, args.verbose)?;
    debug!("turnstay-webhooks v{} starting", env!("CARGO_PKG_VERSION"));

    match args.command {
        Commands::Trigger {
            event_type,
            data,
            name,
            mode,
            base_url,
            queue_url,
        } => trigger(settings, &event_type, &data, name.as_deref(), mode, base_url, queue_url).await,
        Commands::Sign {
            secret,
            payload,
            timestamp,
        } => {
            let secret = resolve_secret(secret, &settings)?;
            let header = match timestamp {
                Some(ts) => signature::sign_with_timestamp(&secret, &payload, ts),
                None => signature::sign(&secret, &payload),
            };
            println!("{}", header);
            Ok(())
        }
        Commands::Verify {
            secret,
            header,
            payload,
            tolerance,
        } => {
            let secret = resolve_secret(secret, &settings)?;
            let tolerance = tolerance.unwrap_or(settings.verification.tolerance_secs);
            let event = Event::construct_from(payload.as_bytes(), &header, &secret, tolerance)?;
            info!("Verified {}", event);
            println!("{}", serde_json::to_string_pretty(&event.to_dict())?);
            Ok(())
        }
    }
}

/// Load settings under a temporary stderr subscriber
///
/// The configured subscriber depends on the settings, so loader messages
/// (file found, ignored overrides) go through this one instead.
fn load_settings(path: Option<&Path>, verbose: bool) -> Result<Settings> {
    let bootstrap = tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::with_default(bootstrap, || match path {
        Some(path) => Settings::load_from_path(path),
        None => Settings::load(),
    })
}

/// Initialize tracing on stderr from the logging settings
fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        logging
            .level
            .to_lowercase()
            .parse()
            .context("Failed to parse log level")?
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format.to_lowercase().as_str() {
        "json" => builder.json().init(),
        "pretty" => builder.pretty().init(),
        _ => builder.compact().init(),
    }

    Ok(())
}

fn resolve_secret(secret: Option<String>, settings: &Settings) -> Result<String> {
    secret
        .or_else(|| settings.verification.secret.clone())
        .filter(|s| !s.is_empty())
        .context("No secret given. Pass --secret or set TURNSTAY_WEBHOOKS_SECRET")
}

async fn trigger(
    settings: Settings,
    event_type: &str,
    data: &str,
    name: Option<&str>,
    mode: Option<DeliveryMode>,
    base_url: Option<String>,
    queue_url: Option<String>,
) -> Result<()> {
    let data: JsonObject =
        serde_json::from_str(data).context("--data must be a JSON object")?;

    let mut config = settings.client;
    if let Some(mode) = mode {
        config.mode = mode;
    }
    if base_url.is_some() {
        config.base_url = base_url;
    }
    if queue_url.is_some() {
        config.queue_url = queue_url;
    }

    let client = WebhookClient::new(config)?;
    let result = client.trigger(event_type, data, name).await;
    client.close().await;

    match result? {
        Some(response) => println!("{}", serde_json::to_string_pretty(&response)?),
        None => info!("Event {} queued", event_type),
    }

    Ok(())
}
