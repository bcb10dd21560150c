use crate::config::Workspace;
use crate::skills::library::Library;
use crate::skills::status::link_status;
use crate::skills::types::{DeletionReport, LinkStatus, TargetRole};
use crate::skills::view::SkillsView;
use anyhow::Result;
use std::fs;
use std::io;

/// Tears a skill down: removes its link from every resolved target
/// directory, then purges the library entry. Purge failure is reported,
/// not propagated, so the caller sees which phase succeeded.
pub fn delete_skill(
    library: &Library,
    workspace: &Workspace,
    name: &str,
) -> Result<DeletionReport> {
    let mut unlinked = Vec::new();
    for role in TargetRole::ALL {
        let Some(dir) = workspace.target_dir(role) else {
            continue;
        };
        if link_status(library, dir, name) == LinkStatus::Linked {
            fs::remove_file(dir.join(name))?;
            unlinked.push(role);
        }
    }

    let purge_error = match fs::remove_dir_all(library.skill_dir(name)) {
        Ok(()) => None,
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => Some(err.to_string()),
    };

    Ok(DeletionReport {
        name: name.to_string(),
        unlinked,
        purged: purge_error.is_none(),
        purge_error,
    })
}

/// Deletes the skill at a view index and masks it from the session.
/// Returns `None` when the index is already deleted or unknown.
pub fn delete_at(
    view: &mut SkillsView,
    library: &Library,
    workspace: &Workspace,
    index: usize,
) -> Result<Option<DeletionReport>> {
    if view.is_deleted(index) {
        return Ok(None);
    }
    let Some(name) = view.name(index).map(str::to_string) else {
        return Ok(None);
    };
    let report = delete_skill(library, workspace, &name)?;
    view.mark_deleted(index);
    Ok(Some(report))
}
