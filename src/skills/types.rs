use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetRole {
    Global,
    Local,
}

impl TargetRole {
    pub const ALL: [TargetRole; 2] = [TargetRole::Global, TargetRole::Local];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetRole::Global => "global",
            TargetRole::Local => "local",
        }
    }
}

/// Relationship between a target path and a skill's library entry.
/// Always recomputed from the filesystem, never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Linked,
    Blocked,
    Absent,
}

impl LinkStatus {
    pub fn checkbox(&self) -> &'static str {
        match self {
            LinkStatus::Linked => "[x]",
            LinkStatus::Blocked => "[!]",
            LinkStatus::Absent => "[ ]",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Linked,
    Unlinked,
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkAction {
    Link,
    Unlink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulkSummary {
    pub action: BulkAction,
    pub changed: usize,
    pub skipped: usize,
}

/// Outcome of tearing down a skill: which targets lost their link, and
/// whether the library purge succeeded. Purge failure is carried here
/// instead of aborting so callers can surface partial teardown.
#[derive(Clone, Debug)]
pub struct DeletionReport {
    pub name: String,
    pub unlinked: Vec<TargetRole>,
    pub purged: bool,
    pub purge_error: Option<String>,
}
