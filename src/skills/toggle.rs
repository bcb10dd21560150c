use crate::skills::library::Library;
use crate::skills::status::link_status;
use crate::skills::types::{BulkAction, BulkSummary, LinkStatus, ToggleOutcome};
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Flips a single (directory, skill) pair between linked and absent.
/// A blocked path is never touched; the caller reports the skip.
pub fn toggle(library: &Library, dir: &Path, name: &str) -> Result<ToggleOutcome> {
    let full = dir.join(name);
    match link_status(library, dir, name) {
        LinkStatus::Linked => {
            fs::remove_file(&full)?;
            Ok(ToggleOutcome::Unlinked)
        }
        LinkStatus::Blocked => Ok(ToggleOutcome::Skipped),
        LinkStatus::Absent => {
            fs::create_dir_all(dir)?;
            create_symlink(&library.skill_dir(name), &full)?;
            Ok(ToggleOutcome::Linked)
        }
    }
}

/// Majority-rule batch toggle: when no more than half of `names` are linked
/// the intent is link-all, otherwise unlink-all. Blocked entries are skipped
/// in either direction and counted in the summary.
pub fn bulk_toggle(library: &Library, dir: &Path, names: &[String]) -> Result<BulkSummary> {
    let linked = names
        .iter()
        .filter(|name| link_status(library, dir, name) == LinkStatus::Linked)
        .count();
    let action = if linked * 2 <= names.len() {
        BulkAction::Link
    } else {
        BulkAction::Unlink
    };

    let mut changed = 0;
    let mut skipped = 0;
    for name in names {
        match (action, link_status(library, dir, name)) {
            (BulkAction::Link, LinkStatus::Absent) | (BulkAction::Unlink, LinkStatus::Linked) => {
                match toggle(library, dir, name)? {
                    ToggleOutcome::Skipped => skipped += 1,
                    _ => changed += 1,
                }
            }
            (BulkAction::Link, LinkStatus::Blocked) => skipped += 1,
            _ => {}
        }
    }

    Ok(BulkSummary {
        action,
        changed,
        skipped,
    })
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::windows::fs::symlink_dir(target, link)?;
    Ok(())
}
