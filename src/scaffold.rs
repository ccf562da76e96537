use crate::{
    errors::{FileOperation, IoError},
    manifest::{EntryKind, Manifest, PathEntry},
    utils::blocking_ancestor,
};
use miette::Diagnostic;
use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),

    #[error("cannot create {expected} '{}': '{}' is in the way", .path.display(), .conflict.display())]
    #[diagnostic(
        code(hinagata::scaffold::path_conflict),
        help("Move or remove the conflicting path, then run again")
    )]
    PathConflict {
        path: PathBuf,
        conflict: PathBuf,
        expected: EntryKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyExists,
}

/// What happened (or would happen) to a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Full path, base included.
    pub path: PathBuf,
    pub kind: EntryKind,
    pub outcome: Outcome,
}
impl EntryReport {
    pub fn created(&self) -> bool {
        self.outcome == Outcome::Created
    }
}

/// Receives one report per processed entry, in manifest order.
pub trait Observer {
    fn on_entry(&mut self, report: &EntryReport);
}
impl<F: FnMut(&EntryReport)> Observer for F {
    fn on_entry(&mut self, report: &EntryReport) {
        self(report)
    }
}
impl Observer for Vec<EntryReport> {
    fn on_entry(&mut self, report: &EntryReport) {
        self.push(report.clone());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreatedCount(pub usize);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub directories_created: usize,
    pub directories_skipped: usize,
    pub files_created: usize,
    pub files_skipped: usize,
}

/// Decides whether `path` has to be created to satisfy `kind`. Only reads
/// metadata; never modifies the filesystem.
///
/// Returns [`ScaffoldError::PathConflict`] when the path, or one of its
/// ancestors, exists with the wrong type.
pub fn needs_creation(path: &Path, kind: EntryKind) -> Result<bool, ScaffoldError> {
    match fs::metadata(path) {
        Ok(meta) => match (kind, meta.is_dir()) {
            (EntryKind::Directory, true) | (EntryKind::File, false) => Ok(false),
            _ => Err(ScaffoldError::PathConflict {
                path: path.to_path_buf(),
                conflict: path.to_path_buf(),
                expected: kind,
            }),
        },
        Err(error) if error.kind() == ErrorKind::NotFound => {
            if let Some(conflict) = path.parent().and_then(blocking_ancestor) {
                return Err(ScaffoldError::PathConflict {
                    path: path.to_path_buf(),
                    conflict,
                    expected: kind,
                });
            }
            Ok(true)
        }
        Err(error) => match blocking_ancestor(path) {
            Some(conflict) => Err(ScaffoldError::PathConflict {
                path: path.to_path_buf(),
                conflict,
                expected: kind,
            }),
            None => Err(IoError::new(FileOperation::Stat, path.to_path_buf(), error).into()),
        },
    }
}

/// Creates `path` and every missing ancestor. An existing directory is left
/// alone and reported as skipped.
fn create_directory(path: &Path) -> Result<Outcome, ScaffoldError> {
    if !needs_creation(path, EntryKind::Directory)? {
        return Ok(Outcome::Skipped(SkipReason::AlreadyExists));
    }

    fs::create_dir_all(path).map_err(|error| match blocking_ancestor(path) {
        Some(conflict) => ScaffoldError::PathConflict {
            path: path.to_path_buf(),
            conflict,
            expected: EntryKind::Directory,
        },
        None => IoError::new(FileOperation::Mkdir, path.to_path_buf(), error).into(),
    })?;

    log::debug!("created directory: {}", path.display());

    Ok(Outcome::Created)
}

/// Creates an empty file at `path` unless something is already there.
///
/// The existence check and the creation are one `create_new` call, so a file
/// created concurrently by another process is a skip, never a truncation.
fn create_empty_file(path: &Path) -> Result<Outcome, ScaffoldError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_directory(parent)?;
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            log::debug!("created file: {}", path.display());
            Ok(Outcome::Created)
        }
        Err(error) if error.kind() == ErrorKind::AlreadyExists => {
            if path.is_dir() {
                return Err(ScaffoldError::PathConflict {
                    path: path.to_path_buf(),
                    conflict: path.to_path_buf(),
                    expected: EntryKind::File,
                });
            }
            log::debug!("skipped existing file: {}", path.display());
            Ok(Outcome::Skipped(SkipReason::AlreadyExists))
        }
        Err(error) => Err(IoError::new(FileOperation::Create, path.to_path_buf(), error).into()),
    }
}

fn ensure_entries<'a, I, O>(
    base: &Path,
    entries: I,
    observer: &mut O,
) -> Result<(CreatedCount, usize), ScaffoldError>
where
    I: IntoIterator<Item = &'a PathEntry>,
    O: Observer + ?Sized,
{
    let mut created = 0;
    let mut skipped = 0;

    for entry in entries {
        let path = base.join(&entry.path);

        let outcome = match entry.kind {
            EntryKind::Directory => create_directory(&path)?,
            EntryKind::File => create_empty_file(&path)?,
        };

        match outcome {
            Outcome::Created => created += 1,
            Outcome::Skipped(_) => skipped += 1,
        }

        observer.on_entry(&EntryReport {
            path,
            kind: entry.kind,
            outcome,
        });
    }

    Ok((CreatedCount(created), skipped))
}

/// Ensures every directory entry exists below `base`.
///
/// Only [`EntryKind::Directory`] entries are processed; file entries in
/// `directories` are ignored and not reported.
///
/// # Errors
///
/// Aborts on the first entry that cannot be created. Entries processed before
/// the failure stay on disk.
pub fn ensure_directories<'a, I, O>(
    base: &Path,
    directories: I,
    observer: &mut O,
) -> Result<CreatedCount, ScaffoldError>
where
    I: IntoIterator<Item = &'a PathEntry>,
    O: Observer + ?Sized,
{
    let directories = directories
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::Directory);

    ensure_entries(base, directories, observer).map(|(created, _)| created)
}

/// Ensures every file entry exists below `base`, creating missing parents and
/// empty placeholder files. Existing files are never modified.
///
/// Only [`EntryKind::File`] entries are processed; directory entries in
/// `files` are ignored and not reported.
///
/// # Errors
///
/// Aborts on the first entry that cannot be created. Entries processed before
/// the failure stay on disk.
pub fn ensure_files<'a, I, O>(
    base: &Path,
    files: I,
    observer: &mut O,
) -> Result<CreatedCount, ScaffoldError>
where
    I: IntoIterator<Item = &'a PathEntry>,
    O: Observer + ?Sized,
{
    let files = files
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::File);

    ensure_entries(base, files, observer).map(|(created, _)| created)
}

/// Performs a full scaffold run: the base, then directories, then files.
pub fn run<O>(base: &Path, manifest: &Manifest, observer: &mut O) -> Result<Summary, ScaffoldError>
where
    O: Observer + ?Sized,
{
    log::info!(
        "scaffolding '{}' into {}",
        manifest.name,
        base.display()
    );

    if !base.as_os_str().is_empty() {
        create_directory(base)?;
    }

    let mut summary = Summary::default();

    let (created, skipped) = ensure_entries(base, &manifest.directories, observer)?;
    summary.directories_created = created.0;
    summary.directories_skipped = skipped;

    let (created, skipped) = ensure_entries(base, &manifest.files, observer)?;
    summary.files_created = created.0;
    summary.files_skipped = skipped;

    Ok(summary)
}

/// Reports what [`run`] would do without writing anything.
pub fn plan(base: &Path, manifest: &Manifest) -> Result<Vec<EntryReport>, ScaffoldError> {
    manifest
        .entries()
        .map(|entry| {
            let path = base.join(&entry.path);
            let outcome = if needs_creation(&path, entry.kind)? {
                Outcome::Created
            } else {
                Outcome::Skipped(SkipReason::AlreadyExists)
            };

            Ok(EntryReport {
                path,
                kind: entry.kind,
                outcome,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use walkdir::WalkDir;

    fn snapshot(root: &Path) -> BTreeSet<(PathBuf, bool)> {
        WalkDir::new(root)
            .into_iter()
            .map(|entry| entry.unwrap())
            .map(|entry| {
                (
                    entry.path().strip_prefix(root).unwrap().to_path_buf(),
                    entry.file_type().is_dir(),
                )
            })
            .collect()
    }

    fn quiet() -> Vec<EntryReport> {
        Vec::new()
    }

    fn scenario() -> Manifest {
        Manifest::new("scenario")
            .with_directories(["a/b", "a/c"])
            .with_files(["a/b/x.txt"])
    }

    #[test]
    fn test_first_run_creates_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("out");

        let mut reports: Vec<EntryReport> = Vec::new();
        let summary = run(&base, &scenario(), &mut reports).unwrap();

        assert!(base.join("a/b").is_dir());
        assert!(base.join("a/c").is_dir());
        assert_eq!(fs::metadata(base.join("a/b/x.txt")).unwrap().len(), 0);
        assert_eq!(summary.directories_created, 2);
        assert_eq!(summary.files_created, 1);
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(EntryReport::created));
    }

    #[test]
    fn test_rerun_keeps_content_and_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("out");
        run(&base, &scenario(), &mut quiet()).unwrap();
        fs::write(base.join("a/b/x.txt"), "hello").unwrap();

        let mut reports: Vec<EntryReport> = Vec::new();
        let summary = run(&base, &scenario(), &mut reports).unwrap();

        assert_eq!(fs::read_to_string(base.join("a/b/x.txt")).unwrap(), "hello");
        assert_eq!(summary.directories_created, 0);
        assert_eq!(summary.files_created, 0);
        assert_eq!(summary.directories_skipped, 2);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(
            reports.last().unwrap().outcome,
            Outcome::Skipped(SkipReason::AlreadyExists)
        );
    }

    #[test]
    fn test_closure_observer_sees_every_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let mut created = 0;
        let mut seen = 0;

        let summary = run(&tmp.path().join("out"), &scenario(), &mut |report: &EntryReport| {
            seen += 1;
            if report.created() {
                created += 1;
            }
        })
        .unwrap();

        assert_eq!(seen, 3);
        assert_eq!(created, summary.directories_created + summary.files_created);
    }

    #[test]
    fn test_mixed_entries_are_filtered_by_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let mixed = [PathEntry::directory("dir"), PathEntry::file("file.txt")];

        let dirs = ensure_directories(tmp.path(), &mixed, &mut quiet()).unwrap();

        assert_eq!(dirs, CreatedCount(1));
        assert!(!tmp.path().join("file.txt").exists());

        let mut reports = quiet();
        let files = ensure_files(tmp.path(), &mixed, &mut reports).unwrap();

        assert_eq!(files, CreatedCount(1));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, EntryKind::File);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("out");
        let manifest = Manifest::new("deep")
            .with_directories(["one/two/three/four", "one/two", "other"])
            .with_files(["one/readme", "other/x/y/z.txt"]);

        run(&base, &manifest, &mut quiet()).unwrap();
        let first = snapshot(&base);
        run(&base, &manifest, &mut quiet()).unwrap();

        assert_eq!(first, snapshot(&base));
    }

    #[test]
    fn test_order_does_not_change_result() {
        let tmp = tempfile::tempdir().unwrap();
        let forward = Manifest::new("forward")
            .with_directories(["a/b", "a", "c/d"])
            .with_files(["a/b/x", "c/y", "e/f/g"]);
        let reversed = Manifest::new("reversed")
            .with_directories(["c/d", "a", "a/b"])
            .with_files(["e/f/g", "c/y", "a/b/x"]);

        run(&tmp.path().join("fwd"), &forward, &mut quiet()).unwrap();
        run(&tmp.path().join("rev"), &reversed, &mut quiet()).unwrap();

        assert_eq!(
            snapshot(&tmp.path().join("fwd")),
            snapshot(&tmp.path().join("rev"))
        );
    }

    #[test]
    fn test_file_creates_unlisted_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let files = [PathEntry::file("z/y/file.txt")];

        let created = ensure_files(tmp.path(), &files, &mut quiet()).unwrap();

        assert_eq!(created, CreatedCount(1));
        assert!(tmp.path().join("z/y").is_dir());
        assert_eq!(fs::metadata(tmp.path().join("z/y/file.txt")).unwrap().len(), 0);
    }

    #[test]
    fn test_ensure_directories_counts_only_new() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("existing")).unwrap();
        let dirs = [
            PathEntry::directory("existing"),
            PathEntry::directory("fresh/nested"),
        ];

        let created = ensure_directories(tmp.path(), &dirs, &mut quiet()).unwrap();

        assert_eq!(created, CreatedCount(1));
    }

    #[test]
    fn test_directory_over_file_is_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("taken"), "data").unwrap();
        let dirs = [PathEntry::directory("taken")];

        let result = ensure_directories(tmp.path(), &dirs, &mut quiet());

        assert!(matches!(
            result,
            Err(ScaffoldError::PathConflict {
                expected: EntryKind::Directory,
                ..
            })
        ));
        assert_eq!(fs::read_to_string(tmp.path().join("taken")).unwrap(), "data");
    }

    #[test]
    fn test_file_over_directory_is_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("taken")).unwrap();
        let files = [PathEntry::file("taken")];

        let result = ensure_files(tmp.path(), &files, &mut quiet());

        assert!(matches!(
            result,
            Err(ScaffoldError::PathConflict {
                expected: EntryKind::File,
                ..
            })
        ));
    }

    #[test]
    fn test_file_below_file_reports_blocking_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("src");
        fs::write(&blocker, "").unwrap();
        let files = [PathEntry::file("src/main.rs")];

        let result = ensure_files(tmp.path(), &files, &mut quiet());

        match result {
            Err(ScaffoldError::PathConflict { conflict, .. }) => assert_eq!(conflict, blocker),
            other => panic!("expected path conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_abort_keeps_earlier_entries() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("blocked"), "").unwrap();
        let manifest = Manifest::new("partial").with_directories(["first", "blocked", "last"]);

        let mut reports: Vec<EntryReport> = Vec::new();
        let result = run(tmp.path(), &manifest, &mut reports);

        assert!(result.is_err());
        assert_eq!(reports.len(), 1);
        assert!(tmp.path().join("first").is_dir());
        assert!(!tmp.path().join("last").exists());
    }

    #[test]
    fn test_empty_manifest_creates_only_base() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("nested/base");

        let summary = run(&base, &Manifest::new("empty"), &mut quiet()).unwrap();

        assert!(base.is_dir());
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_plan_does_not_write() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("out");
        fs::create_dir_all(base.join("a/b")).unwrap();

        let reports = plan(&base, &scenario()).unwrap();

        let outcomes: Vec<_> = reports.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                Outcome::Skipped(SkipReason::AlreadyExists),
                Outcome::Created,
                Outcome::Created
            ]
        );
        assert!(!base.join("a/c").exists());
        assert!(!base.join("a/b/x.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_base_fails_with_path() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // permission bits do not bind a privileged user
        if fs::write(locked.join("probe"), "").is_ok() {
            return;
        }

        let result = run(&locked.join("out"), &scenario(), &mut quiet());

        match result {
            Err(ScaffoldError::Io(error)) => {
                assert_eq!(error.kind(), ErrorKind::PermissionDenied);
                assert_eq!(error.path, locked.join("out"));
            }
            other => panic!("expected permission error, got {:?}", other),
        }
    }
}
