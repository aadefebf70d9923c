use inquire::{MultiSelect, Select};

use o2tv::prelude::*;

use crate::logger::CliLogger;

pub fn select_entry(message: &str, entries: &[CatalogEntry]) -> Result<CatalogEntry> {
    let labels: Vec<String> = entries.iter().map(|entry| entry.label.clone()).collect();

    let choice = Select::new(message, labels)
        .prompt()
        .map_err(|err| O2tvError::Message(format!("failed to read selection: {err}")))?;

    entries
        .iter()
        .find(|entry| entry.label == choice)
        .cloned()
        .ok_or(O2tvError::NoEntries)
}

/// multi-select over the episode listing; an empty pick re-prompts locally
/// instead of failing the run.
pub fn select_episodes(logger: &CliLogger, entries: &[CatalogEntry]) -> Result<Vec<CatalogEntry>> {
    let message = format!("{} episodes found. Pick some:", entries.len());
    let labels: Vec<String> = entries.iter().map(|entry| entry.label.clone()).collect();

    loop {
        let chosen = MultiSelect::new(&message, labels.clone())
            .prompt()
            .map_err(|err| O2tvError::Message(format!("failed to read episodes: {err}")))?;

        if chosen.is_empty() {
            logger.warn("pick at least one episode");
            continue;
        }

        // selection order follows the listing, so downloads do too
        return Ok(entries
            .iter()
            .filter(|entry| chosen.contains(&entry.label))
            .cloned()
            .collect());
    }
}
