use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod config;
mod model;
mod scan;
mod utils;

use config::Config;

use crate::api::client::GymApiClient;
use crate::scan::reconcile::{Reconciler, process_scan};
use crate::scan::scanner::{DetectedCode, DetectorSource, DeviceError, ScanSurface};
use crate::utils::member_cache::{self, MemberCache};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};
use tracing_appender::rolling;

/// Keyboard-wedge scanner feed: the decoder delivers each payload as one
/// line on standard input.
struct LineFedSource {
    lines: Lines<BufReader<Stdin>>,
}

impl LineFedSource {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl DetectorSource for LineFedSource {
    async fn next_detection(&mut self) -> Result<Option<Vec<DetectedCode>>, DeviceError> {
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(Some(vec![DetectedCode {
                raw_value: line,
                format: Some("qr_code".to_string()),
            }])),
            Ok(None) => Ok(None),
            Err(e) => Err(DeviceError::new(e.to_string())),
        }
    }

    async fn restart(&mut self) -> Result<(), DeviceError> {
        // stdin survives decoder hiccups; nothing to reacquire
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "station.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Check-in station starting...");

    let api = Arc::new(GymApiClient::from_config(&config)?);

    // lookup cache lives exactly as long as this scanning session
    let cache = MemberCache::new(config.member_cache_capacity);

    let api_for_warmup = Arc::clone(&api);
    let cache_for_warmup = cache.clone();
    let warmup_batch = config.member_warmup_batch;

    tokio::spawn(async move {
        if let Err(e) = member_cache::warmup_member_cache(
            &cache_for_warmup,
            api_for_warmup.as_ref(),
            warmup_batch,
        )
        .await
        {
            eprintln!("Failed to warmup member cache: {:?}", e);
        }
    });

    let reconciler = Reconciler::new(api, cache);

    let mut surface = ScanSurface::new();
    let session = surface.open(LineFedSource::new());

    loop {
        match session.next_payload().await {
            Ok(Some(payload)) => {
                if let Some(feedback) = process_scan(&reconciler, &payload).await {
                    if feedback.ok {
                        info!(session_id = %session.session_id(), "{}", feedback.message);
                    } else {
                        warn!(session_id = %session.session_id(), "{}", feedback.message);
                    }
                    println!("{}", feedback.message);
                }
            }
            Ok(None) => {
                info!("Scanner feed closed, shutting down");
                break;
            }
            Err(device_err) => {
                let message = device_err.user_message();
                error!(error = %device_err, "{}", message);
                println!("{}", message);

                // give the device a moment before the retry reacquires it
                tokio::time::sleep(Duration::from_secs(2)).await;

                if let Err(e) = session.retry().await {
                    error!(error = %e, "Retry failed, shutting down");
                    break;
                }
            }
        }
    }

    surface.close();
    Ok(())
}
