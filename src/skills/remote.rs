use crate::error::SklmanError;
use crate::skills::library::Library;
use anyhow::Result;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

pub const SKILL_FILE: &str = "SKILL.md";

/// `owner/repo` pair accepted either bare or embedded in a github.com URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn parse(input: &str) -> Result<Self> {
        let mut raw = input.trim();
        if let Some(pos) = raw.find("github.com/") {
            raw = &raw[pos + "github.com/".len()..];
        }
        let mut segments = raw.split('/').filter(|segment| !segment.is_empty());
        let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
            return Err(usage_error(input));
        };
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if owner.is_empty() || repo.is_empty() || raw.starts_with('/') {
            return Err(usage_error(input));
        }
        // a bare id must be exactly two segments; URLs may carry extra path
        if !input.contains("github.com/") && input.trim().split('/').count() != 2 {
            return Err(usage_error(input));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn usage_error(input: &str) -> anyhow::Error {
    SklmanError::Usage {
        message: t!("skills.add.invalid_repo", repo = input).to_string(),
    }
    .into()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub is_blob: bool,
}

/// Remote capabilities the import planner consumes. Implemented over the
/// GitHub API in production and faked in tests.
pub trait RemoteSource {
    fn default_branch(&self, repo: &RepoId) -> Result<String>;
    fn list_tree(&self, repo: &RepoId, branch: &str) -> Result<Vec<TreeEntry>>;
    fn fetch_file(&self, repo: &RepoId, branch: &str, path: &str) -> Result<Vec<u8>>;
}

/// Candidate skill names: top-level directories holding a file literally
/// named SKILL.md, sorted lexicographically.
pub fn discover_skill_names(tree: &[TreeEntry]) -> Vec<String> {
    let mut names: Vec<String> = tree
        .iter()
        .filter(|entry| entry.is_blob)
        .filter_map(|entry| {
            let (first, rest) = entry.path.split_once('/')?;
            (!first.is_empty() && rest == SKILL_FILE).then(|| first.to_string())
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub existing: BTreeSet<String>,
    pub addable: BTreeSet<String>,
}

/// Splits remote entries by pure name-existence in the library.
pub fn classify(library: &Library, names: &[String]) -> ImportPlan {
    let mut plan = ImportPlan::default();
    for name in names {
        if library.contains(name) {
            plan.existing.insert(name.clone());
        } else {
            plan.addable.insert(name.clone());
        }
    }
    plan
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub skills: usize,
    pub files: usize,
    pub failed: usize,
}

/// Downloads every file of each selected skill into the library, one file at
/// a time in tree order. A failed fetch is logged and counted; the rest of
/// the skill and the remaining skills still proceed.
pub fn materialize(
    library: &Library,
    source: &dyn RemoteSource,
    repo: &RepoId,
    branch: &str,
    tree: &[TreeEntry],
    selected: &[String],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for name in selected {
        library.clear_stale_link(name)?;
        fs::create_dir_all(library.skill_dir(name))?;

        let prefix = format!("{name}/");
        let files: Vec<&str> = tree
            .iter()
            .filter(|entry| entry.is_blob && entry.path.starts_with(&prefix))
            .map(|entry| entry.path.as_str())
            .collect();
        println!(
            "{}",
            t!("skills.import.fetching", name = name, count = files.len())
        );

        for path in files {
            match source.fetch_file(repo, branch, path) {
                Ok(bytes) => {
                    library.write_file(Path::new(path), &bytes)?;
                    summary.files += 1;
                }
                Err(err) => {
                    eprintln!(
                        "{}",
                        t!("skills.import.fetch_failed", path = path, error = err)
                    );
                    summary.failed += 1;
                }
            }
        }
        summary.skills += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_repo_id_accepts_bare_pair() {
        let repo = RepoId::parse("octo/skills").expect("parse");
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.repo, "skills");
        assert_eq!(repo.to_string(), "octo/skills");
    }

    #[test]
    fn test_repo_id_accepts_github_urls() {
        let repo = RepoId::parse("https://github.com/octo/skills").expect("parse");
        assert_eq!(repo.to_string(), "octo/skills");

        let with_path =
            RepoId::parse("https://github.com/octo/skills/tree/main/alpha").expect("parse");
        assert_eq!(with_path.to_string(), "octo/skills");
    }

    #[test]
    fn test_repo_id_strips_git_suffix() {
        let repo = RepoId::parse("https://github.com/octo/skills.git").expect("parse");
        assert_eq!(repo.repo, "skills");
        let bare = RepoId::parse("octo/skills.git").expect("parse");
        assert_eq!(bare.repo, "skills");
    }

    #[test]
    fn test_repo_id_rejects_other_shapes() {
        for input in ["octo", "octo/skills/extra", "", "/", "https://example.com/a/b"] {
            assert!(RepoId::parse(input).is_err(), "accepted {input:?}");
        }
    }

    fn blob(path: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            is_blob: true,
        }
    }

    fn tree_dir(path: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            is_blob: false,
        }
    }

    #[test]
    fn test_discover_top_level_skill_dirs_sorted() {
        let tree = vec![
            blob("gamma/SKILL.md"),
            blob("gamma/notes.txt"),
            tree_dir("delta"),
            blob("delta/SKILL.md"),
            blob("README.md"),
            blob("nested/deep/SKILL.md"),
            tree_dir("empty/SKILL.md"),
        ];
        assert_eq!(
            discover_skill_names(&tree),
            vec!["delta".to_string(), "gamma".to_string()]
        );
    }

    #[test]
    fn test_classify_is_disjoint() {
        let temp = TempDir::new().expect("temp dir");
        let library = Library::open(temp.path().join("library")).expect("library");
        fs::create_dir_all(library.skill_dir("gamma")).expect("gamma");

        let names = vec!["gamma".to_string(), "delta".to_string()];
        let plan = classify(&library, &names);
        assert!(plan.existing.contains("gamma"));
        assert!(plan.addable.contains("delta"));
        assert!(plan.existing.intersection(&plan.addable).next().is_none());
    }

    struct FakeRemote {
        files: HashMap<String, Vec<u8>>,
        broken: BTreeSet<String>,
    }

    impl FakeRemote {
        fn new(files: &[(&str, &[u8])]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, bytes)| (path.to_string(), bytes.to_vec()))
                    .collect(),
                broken: BTreeSet::new(),
            }
        }

        fn tree(&self) -> Vec<TreeEntry> {
            let mut paths: Vec<&String> = self.files.keys().collect();
            paths.sort();
            paths.into_iter().map(|path| blob(path)).collect()
        }
    }

    impl RemoteSource for FakeRemote {
        fn default_branch(&self, _repo: &RepoId) -> Result<String> {
            Ok("main".to_string())
        }

        fn list_tree(&self, _repo: &RepoId, _branch: &str) -> Result<Vec<TreeEntry>> {
            Ok(self.tree())
        }

        fn fetch_file(&self, _repo: &RepoId, _branch: &str, path: &str) -> Result<Vec<u8>> {
            if self.broken.contains(path) {
                return Err(anyhow::anyhow!("HTTP 404"));
            }
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("HTTP 404"))
        }
    }

    #[test]
    fn test_materialize_writes_only_selected_skills() {
        let temp = TempDir::new().expect("temp dir");
        let library = Library::open(temp.path().join("library")).expect("library");
        let remote = FakeRemote::new(&[
            ("delta/SKILL.md", b"# delta"),
            ("delta/ref/guide.md", b"guide"),
            ("gamma/SKILL.md", b"# gamma"),
        ]);
        let repo = RepoId::parse("octo/skills").expect("repo");

        let summary = materialize(
            &library,
            &remote,
            &repo,
            "main",
            &remote.tree(),
            &["delta".to_string()],
        )
        .expect("materialize");

        assert_eq!(summary.skills, 1);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.failed, 0);
        assert!(library.contains("delta"));
        assert!(library.skill_dir("delta").join("ref/guide.md").exists());
        assert!(!library.contains("gamma"));
    }

    #[test]
    fn test_materialize_continues_past_fetch_failures() {
        let temp = TempDir::new().expect("temp dir");
        let library = Library::open(temp.path().join("library")).expect("library");
        let mut remote = FakeRemote::new(&[
            ("delta/SKILL.md", b"# delta"),
            ("delta/broken.md", b"unreachable"),
            ("gamma/SKILL.md", b"# gamma"),
        ]);
        remote.broken.insert("delta/broken.md".to_string());
        let repo = RepoId::parse("octo/skills").expect("repo");

        let summary = materialize(
            &library,
            &remote,
            &repo,
            "main",
            &remote.tree(),
            &["delta".to_string(), "gamma".to_string()],
        )
        .expect("materialize");

        assert_eq!(summary.skills, 2);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.failed, 1);
        assert!(!library.skill_dir("delta").join("broken.md").exists());
        assert!(library.skill_dir("gamma").join(SKILL_FILE).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_materialize_replaces_stale_library_link() {
        use std::os::unix::fs as unix_fs;

        let temp = TempDir::new().expect("temp dir");
        let library = Library::open(temp.path().join("library")).expect("library");
        unix_fs::symlink(temp.path().join("gone"), library.skill_dir("delta"))
            .expect("stale link");

        let remote = FakeRemote::new(&[("delta/SKILL.md", b"# delta")]);
        let repo = RepoId::parse("octo/skills").expect("repo");
        materialize(
            &library,
            &remote,
            &repo,
            "main",
            &remote.tree(),
            &["delta".to_string()],
        )
        .expect("materialize");

        let meta = fs::symlink_metadata(library.skill_dir("delta")).expect("meta");
        assert!(meta.is_dir());
        assert!(!meta.file_type().is_symlink());
    }
}
