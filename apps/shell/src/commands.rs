use anyhow::{Context, Result, bail};
use pheco::features::registration::{
    DraftStore, JsonFileDraftStore, Registration, RegistrationDraft, ReviewSummary, WizardStep, validation,
};
use std::path::Path;

pub fn list_steps() {
    for step in WizardStep::all() {
        let fields = step.fields().iter().filter(|f| f.required).count();
        println!("{}. {} - {} ({fields} required fields)", step.number(), step, step.description());
    }
}

/// Fails when any step has errors so scripts can rely on the exit code.
pub async fn validate(path: &Path) -> Result<()> {
    let draft = read_draft(path).await?;
    let failing = validation::validate_all(&draft);

    if failing.is_empty() {
        println!("Draft {} is valid", draft.id);
        return Ok(());
    }

    for (step, errors) in &failing {
        println!("Step {} {step}:", step.number());
        for (field, message) in errors.iter() {
            println!("  {field}: {message}");
        }
    }
    bail!("{} of {} steps have errors", failing.len(), WizardStep::all().count())
}

pub async fn review(path: &Path) -> Result<()> {
    let draft = read_draft(path).await?;
    let summary = ReviewSummary::project(&draft);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub async fn register(registration: &Registration, path: &Path, save: bool) -> Result<()> {
    let draft = read_draft(path).await?;
    let draft_id = draft.id.clone();
    let store = registration.draft_store();

    let mut wizard = registration.resume(draft);

    if save {
        wizard.save_draft(&store).await.context("Failed to save draft")?;
        println!("Draft saved to {}", store.path_for(&draft_id)?.display());
    }

    while !wizard.current_step().is_final() {
        let step = wizard.current_step();
        if !wizard.next() {
            println!("Step {} {step} is incomplete:", step.number());
            for (field, message) in wizard.errors().iter() {
                println!("  {field}: {message}");
            }
            bail!("Registration stopped at step {}", step.number());
        }
    }

    if !wizard.submit(&registration.service()).await {
        let reason = wizard.last_notification().map(|t| t.message.to_string()).unwrap_or_default();
        for (field, message) in wizard.errors().iter() {
            println!("  {field}: {message}");
        }
        bail!("Registration was not submitted: {reason}");
    }

    if let Some(receipt) = wizard.receipt() {
        println!("Registration submitted for {}: reference {}", receipt.store_name, receipt.reference);
    }
    if save && store.delete(&draft_id).await? {
        tracing::info!(draft = %draft_id, "Submitted draft removed from store");
    }
    Ok(())
}

async fn read_draft(path: &Path) -> Result<RegistrationDraft> {
    Ok(JsonFileDraftStore::read_file(path).await?)
}
