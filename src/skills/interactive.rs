use anyhow::{Result, anyhow};
use inquire::Confirm;
use inquire::error::InquireError;
use std::io::IsTerminal;

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Deletion needs either an explicit `--yes` or a terminal to confirm on.
pub fn confirm_delete(name: &str, assume_yes: bool, interactive: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !interactive {
        return Err(anyhow!(t!("skills.rm.requires_yes")));
    }
    let prompt = t!("skills.rm.confirm", name = name);
    match Confirm::new(&prompt).with_default(false).prompt() {
        Ok(confirmed) => Ok(confirmed),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(anyhow!(t!("skills.prompt_failed", error = e))),
    }
}
