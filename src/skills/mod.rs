pub mod command;

mod delete;
mod github;
mod interactive;
mod library;
mod remote;
mod status;
mod toggle;
mod types;
mod view;

pub use delete::{delete_at, delete_skill};
pub use github::GithubClient;
pub use library::Library;
pub use remote::{
    ImportPlan, ImportSummary, RemoteSource, RepoId, SKILL_FILE, TreeEntry, classify,
    discover_skill_names, materialize,
};
pub use status::link_status;
pub use toggle::{bulk_toggle, toggle};
pub use types::{
    BulkAction, BulkSummary, DeletionReport, LinkStatus, TargetRole, ToggleOutcome,
};
pub use view::SkillsView;

pub(crate) use interactive::is_interactive;
