use crate::commands::common::{warn_if_degraded, AppService};
use crate::error::CliError;

pub async fn run_voted(service: &AppService, as_json: bool) -> Result<(), CliError> {
    let voted = service.ledger().voted_ids().await;
    if let Some(error) = voted.error() {
        eprintln!("Warning: vote history is unreadable ({error})");
    }
    let ids = voted.into_value();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&ids)?);
    } else if ids.is_empty() {
        println!("No votes recorded on this device");
    } else {
        for id in ids {
            println!("{id}");
        }
    }

    Ok(())
}

pub async fn run_device(
    service: &AppService,
    label: Option<&str>,
    clear: bool,
) -> Result<(), CliError> {
    if clear {
        let cleared = service.device().set("").await;
        warn_if_degraded(&cleared, "device label");
        return Ok(());
    }

    if let Some(label) = label {
        let stored = service.device().set(label).await;
        warn_if_degraded(&stored, "device label");
        println!("{}", label.trim());
        return Ok(());
    }

    match service.device().get().await.into_value() {
        Some(label) => println!("{label}"),
        None => println!("No device label set"),
    }
    Ok(())
}

pub async fn run_reset(service: &AppService) -> Result<(), CliError> {
    let reset = service.reset_local_data().await;
    if let Some(error) = reset.error() {
        eprintln!("Warning: local data could not be fully cleared ({error})");
    } else {
        println!("Cleared local votes, cached features, and device label");
    }
    Ok(())
}
