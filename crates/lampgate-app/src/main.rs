//! Lampgate application binary - composition root.
//!
//! Ties the Lampgate crates together into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the HTTP relay client
//! 3. Force the relay into a known (off) state
//! 4. Feed NDJSON frame batches from stdin or a file into the controller
//! 5. Shut the controller down on end of input or Ctrl-C

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use lampgate_control::ActuatorController;
use lampgate_core::LampgateConfig;
use lampgate_relay::HttpRelayClient;

use cli::CliArgs;

/// Feed frame batches to the controller, one JSON value per line.
///
/// A JSON array is one batch; a single object is a batch of one. Lines that
/// fail to parse are logged and skipped.
async fn frame_feed_loop<R>(controller: &ActuatorController<HttpRelayClient>, reader: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read frame input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let batch = match serde_json::from_str::<serde_json::Value>(&line) {
            Ok(serde_json::Value::Array(items)) => items,
            Ok(value) => vec![value],
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unparsable frame line");
                continue;
            }
        };

        controller.process_inputs(&batch).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first: the log level default lives there.
    let config_file = args.resolve_config_path();
    let config = LampgateConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Lampgate v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Relay client and controller.
    let relay = Arc::new(HttpRelayClient::new(&config.relay)?);
    tracing::info!(
        base_url = %config.relay.base_url,
        address = config.relay.address,
        "Relay client ready"
    );

    let controller = ActuatorController::new(relay, config.control.clone());
    controller.initialize().await;

    tracing::info!(
        stage = %config.control.stage_name,
        label = %config.control.target_label,
        threshold = config.control.activation_threshold,
        "Watching detections"
    );

    // Frame feed: a file when given, stdin otherwise. Runs until end of
    // input or Ctrl-C.
    let feed = async {
        match args.frames {
            Some(ref path) => {
                let file = tokio::fs::File::open(path).await?;
                frame_feed_loop(&controller, BufReader::new(file)).await;
                Ok::<(), std::io::Error>(())
            }
            None => {
                frame_feed_loop(&controller, BufReader::new(tokio::io::stdin())).await;
                Ok(())
            }
        }
    };

    tokio::select! {
        result = feed => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Frame source failed");
            } else {
                tracing::info!("Frame input finished");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    controller.shutdown();
    Ok(())
}
