//! Vault Lock entry point
//!
//! Headless terminal front end: each stdin line is a press on the handle
//! (`left`/`right`, `ccw`/`cw`, or `x <offset>`). Progress is reported
//! through the log.
//!
//! Usage: `vault-lock [settings.json] [--seed N]`

use std::io::BufRead;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use vault_lock::anim::TweenEngine;
use vault_lock::diagnostics::LogSink;
use vault_lock::input::{PointerEvent, parse_command};
use vault_lock::{Settings, VaultController};

struct Args {
    settings_path: Option<String>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        settings_path: None,
        seed: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {}", value))?;
                args.seed = Some(seed);
            }
            _ if args.settings_path.is_none() => args.settings_path = Some(arg),
            _ => return Err(format!("unexpected argument: {}", arg)),
        }
    }
    Ok(args)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Forward parsed commands until input ends or the receiver goes away
fn read_commands(input: impl BufRead, tx: mpsc::UnboundedSender<PointerEvent>) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        match parse_command(&line) {
            Some(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => log::warn!("Unrecognised command: {}", line.trim()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::from(64);
        }
    };

    let settings = match args.settings_path.as_deref().map(Settings::load) {
        Some(Ok(settings)) => settings,
        Some(Err(err)) => {
            log::error!("{}", err);
            return ExitCode::from(2);
        }
        None => Settings::default(),
    };

    let seed = args.seed.unwrap_or_else(time_seed);
    let engine = TweenEngine::new(settings.animation.frame_interval());
    let scene = engine.scene();

    let mut controller = match VaultController::with_seed(settings, engine, seed, LogSink) {
        Ok(controller) => controller,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            return ExitCode::from(2);
        }
    };
    log::info!("Vault Lock starting with seed {}", seed);
    log::info!("Type `left` or `right` to turn the handle, Ctrl+C to quit");

    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    // Stdin reads must stay off the runtime's blocking pool, or shutdown
    // waits for the next line
    let reader = std::thread::Builder::new()
        .name("stdin".into())
        .spawn(move || read_commands(std::io::stdin().lock(), tx));
    if let Err(err) = reader {
        log::error!("Failed to start input reader: {}", err);
        return ExitCode::from(1);
    }

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    match controller.run(rx, cancel).await {
        Ok(stats) => {
            let handle = scene.borrow().sprite(vault_lock::anim::SpriteId::Handle).rotation;
            log::info!(
                "Wins: {}, failures: {}, best: {}, handle at {:.2} rad",
                stats.wins,
                stats.failures,
                stats
                    .best
                    .map(|b| format!("{:.2}s", b.as_secs_f32()))
                    .unwrap_or_else(|| "-".to_string()),
                handle
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::from(1)
        }
    }
}
