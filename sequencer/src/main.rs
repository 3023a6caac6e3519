//! Option vault sequencer
//!
//! Loads an instrument and its starting balances from configuration, runs
//! the scripted steps through the sequencer task and prints a JSON report.

mod config;
mod health;
mod report;
mod sequencer;
mod session;

use anyhow::{Context, Result};
use config::{identity, Action, Config};
use report::{Report, StepRecord};
use session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if let [_, flag, path] = args.as_slice() {
        if flag == "--write-default" {
            return Config::write_default(path);
        }
    }

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using default demo config", e);
        Config::default_demo()
    });

    log::info!("Starting sequencer for {} ({})", config.name, config.symbol);

    let session = Session::from_config(&config)?;
    let (handle, task) = sequencer::spawn(session, config.queue_depth);

    let mut steps = Vec::with_capacity(config.steps.len());
    for (index, step) in config.steps.iter().enumerate() {
        let record = match (&step.action, step.action.to_instruction()) {
            (_, Some(instruction)) => {
                let op = instruction.name();
                let result = handle.execute(identity(&step.caller), instruction).await?;
                match &result {
                    Ok(_) => log::info!("Step {}: {} by {} committed", index, op, step.caller),
                    Err(e) => log::warn!("Step {}: {} by {} rejected: {}", index, op, step.caller, e),
                }
                StepRecord::from_result(index, &step.caller, op, &result)
            }
            (Action::AdvanceTime { seconds }, None) => {
                let now = handle.advance_time(*seconds).await?;
                log::info!("Step {}: clock advanced to {}", index, now);
                StepRecord::control(index, &step.caller, "AdvanceTime")
            }
            (Action::SetPrice { asset, price }, None) => {
                handle.set_price(identity(asset), *price).await?;
                log::info!("Step {}: {} price set to {}", index, asset, price);
                StepRecord::control(index, &step.caller, "SetPrice")
            }
            (_, None) => continue,
        };
        steps.push(record);
    }

    drop(handle);
    let session = task.await.context("Sequencer task failed")?;

    let health = session.health().unwrap_or_else(|e| {
        log::warn!("Health unavailable: {}", e);
        Vec::new()
    });
    for vault in health::undercollateralized(&health) {
        log::warn!("Vault of {} is undercollateralized", vault.owner);
    }

    let report = Report::new(config.name.clone(), config.symbol.clone(), steps, session.snapshot(), health);
    log::info!("Finished: {} steps, {} rejected", report.steps.len(), report.rejected);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
