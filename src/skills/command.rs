use crate::config::Workspace;
use crate::error::SklmanError;
use crate::skills::delete::delete_at;
use crate::skills::github::GithubClient;
use crate::skills::interactive::{confirm_delete, is_interactive};
use crate::skills::library::Library;
use crate::skills::remote::{self, RemoteSource, RepoId};
use crate::skills::status::link_status;
use crate::skills::toggle::{bulk_toggle, toggle};
use crate::skills::types::{BulkAction, DeletionReport, LinkStatus, TargetRole, ToggleOutcome};
use crate::skills::view::SkillsView;
use anyhow::{Result, anyhow};
use inquire::error::InquireError;
use inquire::{MultiSelect, Select, Text};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ListRow {
    name: String,
    global: LinkStatus,
    local: Option<LinkStatus>,
}

pub fn run_list(workspace: &Workspace, filter: Option<&str>, json: bool) -> Result<()> {
    let library = Library::open(&workspace.library_dir)?;
    let mut view = SkillsView::new(library.list()?);
    if let Some(query) = filter {
        view.set_query(query);
    }
    if view.names().is_empty() {
        println!("{}", t!("skills.list.no_skills"));
        return Ok(());
    }

    let rows: Vec<ListRow> = view
        .filtered()
        .iter()
        .map(|&index| {
            let name = view.names()[index].clone();
            let global = link_status(&library, &workspace.global_dir, &name);
            let local = workspace
                .target_dir(TargetRole::Local)
                .map(|dir| link_status(&library, dir, &name));
            ListRow {
                name,
                global,
                local,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let linked = count_linked(&library, workspace, &view);
    println!(
        "{}",
        t!(
            "skills.list.header",
            linked = linked,
            total = view.active_count()
        )
    );
    for row in rows {
        let local = row.local.map(|status| status.checkbox()).unwrap_or("  -");
        println!("{:<34} {:<8} {}", row.name, row.global.checkbox(), local);
    }
    Ok(())
}

pub fn run_toggle(workspace: &Workspace, name: &str, role: TargetRole) -> Result<()> {
    let library = Library::open(&workspace.library_dir)?;
    let view = SkillsView::new(library.list()?);
    if view.index_of(name).is_none() {
        return Err(anyhow!(t!("skills.unknown_skill", name = name)));
    }
    report_toggle(&library, workspace, name, role)
}

pub fn run_all(workspace: &Workspace, role: TargetRole, filter: Option<&str>) -> Result<()> {
    let library = Library::open(&workspace.library_dir)?;
    let mut view = SkillsView::new(library.list()?);
    if let Some(query) = filter {
        view.set_query(query);
    }

    let Some(dir) = workspace.target_dir(role) else {
        println!("{}", t!("skills.target.unavailable"));
        return Ok(());
    };
    let names = view.visible_names();
    if names.is_empty() {
        println!("{}", t!("skills.all.empty"));
        return Ok(());
    }

    let summary = bulk_toggle(&library, dir, &names)?;
    let message = match summary.action {
        BulkAction::Link => t!(
            "skills.all.linked",
            changed = summary.changed,
            skipped = summary.skipped,
            target = role.as_str()
        ),
        BulkAction::Unlink => t!(
            "skills.all.unlinked",
            changed = summary.changed,
            skipped = summary.skipped,
            target = role.as_str()
        ),
    };
    println!("{message}");
    Ok(())
}

pub fn run_rm(workspace: &Workspace, name: &str, assume_yes: bool) -> Result<()> {
    let library = Library::open(&workspace.library_dir)?;
    let mut view = SkillsView::new(library.list()?);
    let Some(index) = view.index_of(name) else {
        return Err(anyhow!(t!("skills.unknown_skill", name = name)));
    };

    if !confirm_delete(name, assume_yes, is_interactive())? {
        println!("{}", t!("skills.rm.cancelled"));
        return Ok(());
    }

    match delete_at(&mut view, &library, workspace, index)? {
        Some(report) => report_deletion(&report),
        None => println!("{}", t!("skills.rm.already_deleted", name = name)),
    }
    Ok(())
}

pub fn run_add(workspace: &Workspace, repo_input: &str, all: bool, picks: &[String]) -> Result<()> {
    // argument parsing happens before anything is touched
    let repo = RepoId::parse(repo_input)?;
    let client = GithubClient::new()?;
    run_add_with(workspace, &repo, &client, all, picks)
}

pub fn run_add_with(
    workspace: &Workspace,
    repo: &RepoId,
    source: &dyn RemoteSource,
    all: bool,
    picks: &[String],
) -> Result<()> {
    println!("{}", t!("skills.add.fetching_repo", repo = repo));
    let branch = source.default_branch(repo)?;
    let tree = source.list_tree(repo, &branch)?;
    let names = remote::discover_skill_names(&tree);
    if names.is_empty() {
        return Err(anyhow!(t!("skills.add.no_skills", repo = repo)));
    }

    let library = Library::open(&workspace.library_dir)?;
    let plan = remote::classify(&library, &names);
    if plan.addable.is_empty() {
        println!("{}", t!("skills.add.all_exist", repo = repo));
        return Ok(());
    }

    let selected: Vec<String> = if all {
        plan.addable.iter().cloned().collect()
    } else if !picks.is_empty() {
        let mut chosen = Vec::new();
        for pick in picks {
            if plan.addable.contains(pick) {
                chosen.push(pick.clone());
            } else if plan.existing.contains(pick) {
                println!("{}", t!("skills.add.already_exists", name = pick));
            } else {
                return Err(SklmanError::Usage {
                    message: t!("skills.add.unknown_selection", name = pick, repo = repo)
                        .to_string(),
                }
                .into());
            }
        }
        chosen
    } else if is_interactive() {
        let options: Vec<String> = plan.addable.iter().cloned().collect();
        match MultiSelect::new(&t!("skills.add.select", repo = repo), options).prompt() {
            Ok(selections) => selections,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(anyhow!(t!("skills.prompt_failed", error = e))),
        }
    } else {
        return Err(SklmanError::Usage {
            message: t!("skills.add.requires_selection").to_string(),
        }
        .into());
    };

    if selected.is_empty() {
        println!("{}", t!("skills.add.nothing_selected"));
        return Ok(());
    }

    let summary = remote::materialize(&library, source, repo, &branch, &tree, &selected)?;
    println!(
        "{}",
        t!(
            "skills.add.done",
            skills = summary.skills,
            files = summary.files,
            library = library.root().display()
        )
    );
    if summary.failed > 0 {
        eprintln!("{}", t!("skills.add.failures", failed = summary.failed));
    }
    Ok(())
}

pub fn run_manage(workspace: &Workspace) -> Result<()> {
    let library = Library::open(&workspace.library_dir)?;
    let mut view = SkillsView::new(library.list()?);
    if view.names().is_empty() {
        println!("{}", t!("skills.list.no_skills"));
        return Ok(());
    }

    loop {
        let linked = count_linked(&library, workspace, &view);
        println!(
            "{}",
            t!(
                "skills.list.header",
                linked = linked,
                total = view.active_count()
            )
        );

        let mut labels: Vec<String> = view
            .filtered()
            .iter()
            .map(|&index| {
                let name = &view.names()[index];
                format!(
                    "{} {} {}",
                    status_cell(&library, workspace, name, TargetRole::Global),
                    status_cell(&library, workspace, name, TargetRole::Local),
                    name
                )
            })
            .collect();
        let filter_label = t!("skills.manage.filter").to_string();
        let exit_label = t!("skills.manage.exit").to_string();
        labels.push(filter_label.clone());
        labels.push(exit_label.clone());

        let starting = view.cursor().unwrap_or(0);
        let selection = match Select::new(&t!("skills.manage.select_skill"), labels.clone())
            .with_starting_cursor(starting)
            .prompt()
        {
            Ok(selection) => selection,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(anyhow!(t!("skills.prompt_failed", error = e))),
        };
        if selection == exit_label {
            return Ok(());
        }
        if selection == filter_label {
            match Text::new(&t!("skills.manage.filter_prompt"))
                .with_initial_value(view.query())
                .prompt()
            {
                Ok(query) => view.set_query(&query),
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {}
                Err(e) => return Err(anyhow!(t!("skills.prompt_failed", error = e))),
            }
            continue;
        }
        let Some(position) = labels.iter().position(|label| label == &selection) else {
            continue;
        };
        view.set_cursor(position);
        let Some(index) = view.current() else {
            continue;
        };
        manage_skill(&library, workspace, &mut view, index)?;
    }
}

fn manage_skill(
    library: &Library,
    workspace: &Workspace,
    view: &mut SkillsView,
    index: usize,
) -> Result<()> {
    let Some(name) = view.name(index).map(str::to_string) else {
        return Ok(());
    };

    let toggle_global = t!("skills.manage.action_toggle_global").to_string();
    let toggle_local = t!("skills.manage.action_toggle_local").to_string();
    let delete_label = t!("skills.manage.action_delete").to_string();
    let back_label = t!("skills.manage.back").to_string();
    let options = vec![
        toggle_global.clone(),
        toggle_local.clone(),
        delete_label.clone(),
        back_label,
    ];

    let prompt = t!("skills.manage.select_action", name = name);
    let selection = match Select::new(&prompt, options).prompt() {
        Ok(selection) => selection,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(());
        }
        Err(e) => return Err(anyhow!(t!("skills.prompt_failed", error = e))),
    };

    if selection == toggle_global {
        report_toggle(library, workspace, &name, TargetRole::Global)?;
    } else if selection == toggle_local {
        report_toggle(library, workspace, &name, TargetRole::Local)?;
    } else if selection == delete_label {
        if confirm_delete(&name, false, true)? {
            match delete_at(view, library, workspace, index)? {
                Some(report) => report_deletion(&report),
                None => println!("{}", t!("skills.rm.already_deleted", name = name)),
            }
        } else {
            println!("{}", t!("skills.rm.cancelled"));
        }
    }
    Ok(())
}

fn report_toggle(
    library: &Library,
    workspace: &Workspace,
    name: &str,
    role: TargetRole,
) -> Result<()> {
    let Some(dir) = workspace.target_dir(role) else {
        println!("{}", t!("skills.target.unavailable"));
        return Ok(());
    };
    let message = match toggle(library, dir, name)? {
        ToggleOutcome::Linked => t!("skills.toggle.linked", name = name, target = role.as_str()),
        ToggleOutcome::Unlinked => {
            t!("skills.toggle.unlinked", name = name, target = role.as_str())
        }
        ToggleOutcome::Skipped => {
            t!("skills.toggle.skipped", name = name, target = role.as_str())
        }
    };
    println!("{message}");
    Ok(())
}

fn report_deletion(report: &DeletionReport) {
    if let Some(error) = &report.purge_error {
        eprintln!(
            "{}",
            t!("skills.rm.partial", name = report.name, error = error)
        );
    } else {
        println!(
            "{}",
            t!(
                "skills.rm.done",
                name = report.name,
                unlinked = report.unlinked.len()
            )
        );
    }
}

fn status_cell(
    library: &Library,
    workspace: &Workspace,
    name: &str,
    role: TargetRole,
) -> &'static str {
    match workspace.target_dir(role) {
        Some(dir) => link_status(library, dir, name).checkbox(),
        None => "  -",
    }
}

fn count_linked(library: &Library, workspace: &Workspace, view: &SkillsView) -> usize {
    (0..view.names().len())
        .filter(|&index| !view.is_deleted(index))
        .filter(|&index| {
            let name = &view.names()[index];
            TargetRole::ALL.iter().any(|&role| {
                workspace
                    .target_dir(role)
                    .is_some_and(|dir| link_status(library, dir, name) == LinkStatus::Linked)
            })
        })
        .count()
}
