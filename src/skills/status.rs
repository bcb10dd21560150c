use crate::skills::library::Library;
use crate::skills::types::LinkStatus;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Computes the relationship between `dir/name` and the library entry of the
/// same name. Stat failures other than not-found degrade to `Absent` so one
/// unreadable entry cannot break a whole listing.
pub fn link_status(library: &Library, dir: &Path, name: &str) -> LinkStatus {
    let full = dir.join(name);
    let Ok(meta) = fs::symlink_metadata(&full) else {
        // not-found and unreadable alike
        return LinkStatus::Absent;
    };
    if !meta.file_type().is_symlink() {
        return LinkStatus::Blocked;
    }
    let Ok(dest) = fs::read_link(&full) else {
        return LinkStatus::Absent;
    };
    let resolved = if dest.is_absolute() {
        normalize(&dest)
    } else {
        normalize(&dir.join(dest))
    };
    if resolved == normalize(&library.skill_dir(name)) {
        LinkStatus::Linked
    } else {
        LinkStatus::Blocked
    }
}

/// Lexical normalization: collapses `.` and `..` without touching the
/// filesystem, so dangling links still compare correctly.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Library, PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let library = Library::open(temp.path().join("library")).expect("library");
        fs::create_dir_all(library.skill_dir("alpha")).expect("alpha");
        let target = temp.path().join("target");
        fs::create_dir_all(&target).expect("target");
        (temp, library, target)
    }

    #[test]
    fn test_absent_when_nothing_there() {
        let (_temp, library, target) = setup();
        assert_eq!(link_status(&library, &target, "alpha"), LinkStatus::Absent);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_when_symlink_points_at_library() {
        use std::os::unix::fs as unix_fs;

        let (_temp, library, target) = setup();
        unix_fs::symlink(library.skill_dir("alpha"), target.join("alpha")).expect("link");
        assert_eq!(link_status(&library, &target, "alpha"), LinkStatus::Linked);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_survives_dot_segments() {
        use std::os::unix::fs as unix_fs;

        let (_temp, library, target) = setup();
        let dest = library.root().join(".").join("alpha");
        unix_fs::symlink(dest, target.join("alpha")).expect("link");
        assert_eq!(link_status(&library, &target, "alpha"), LinkStatus::Linked);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_library_link_still_counts_as_linked() {
        use std::os::unix::fs as unix_fs;

        let (_temp, library, target) = setup();
        unix_fs::symlink(library.skill_dir("beta"), target.join("beta")).expect("link");
        // beta was never added to the library, the link dangles
        assert_eq!(link_status(&library, &target, "beta"), LinkStatus::Linked);
    }

    #[test]
    fn test_unstatable_path_reads_absent() {
        let (temp, library, _target) = setup();
        // "file/alpha" stats with NotADirectory, not NotFound
        let bogus = temp.path().join("file");
        fs::write(&bogus, "a file where a directory should be").expect("file");
        assert_eq!(link_status(&library, &bogus, "alpha"), LinkStatus::Absent);
    }

    #[test]
    fn test_blocked_by_real_directory() {
        let (_temp, library, target) = setup();
        fs::create_dir_all(target.join("epsilon")).expect("blocker");
        assert_eq!(link_status(&library, &target, "epsilon"), LinkStatus::Blocked);
    }

    #[test]
    fn test_blocked_by_regular_file() {
        let (_temp, library, target) = setup();
        fs::write(target.join("alpha"), "not a link").expect("blocker");
        assert_eq!(link_status(&library, &target, "alpha"), LinkStatus::Blocked);
    }

    #[cfg(unix)]
    #[test]
    fn test_blocked_by_foreign_symlink() {
        use std::os::unix::fs as unix_fs;

        let (temp, library, target) = setup();
        unix_fs::symlink(temp.path().join("elsewhere"), target.join("alpha")).expect("link");
        assert_eq!(link_status(&library, &target, "alpha"), LinkStatus::Blocked);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
        assert_eq!(normalize(Path::new("/a/..")), PathBuf::from("/"));
    }
}
