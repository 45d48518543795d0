//! Install manifests.
//!
//! A [`Manifest`] lists every file an HPCToolkit install is expected to
//! contain. [`Manifest::check`] compares it against an install tree and
//! reports files that are missing, structurally wrong, or unexpected.
//!
//! Shared libraries follow the soname convention: `libfoo.so.0.0.0` is the
//! real file, and `libfoo.so.0` and `libfoo.so` are symlinks to it that live
//! in the same directory.

mod catalog;

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::util::fs::list_files;

/// One expected item of an install tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A single file.
    File { path: PathBuf },

    /// A versioned shared library: `path + target` is the real file and each
    /// `path + alias` is a sibling symlink to it.
    VersionedLib {
        path: PathBuf,
        target: String,
        aliases: Vec<String>,
    },

    /// An external library: `path + main_suffix` must exist, and siblings
    /// named `path + s` are claimed when `s` matches one of `suffixes`.
    SuffixLib {
        path: PathBuf,
        main_suffix: String,
        suffixes: Vec<String>,
    },
}

/// An expected path that was not satisfied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Missing {
    /// Nothing is installed at the path.
    Absent(PathBuf),
    /// Something is installed but it has the wrong shape.
    Invalid { path: PathBuf, reason: String },
}

impl Missing {
    fn invalid(path: PathBuf, reason: impl Into<String>) -> Self {
        Missing::Invalid {
            path,
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Missing::Absent(path) | Missing::Invalid { path, .. } => path,
        }
    }

    /// Report line(s) for this item.
    pub fn hunk(&self) -> String {
        match self {
            Missing::Absent(path) => format!("- {}", path.display()),
            Missing::Invalid { path, reason } => {
                format!("! {}\n  ^ {}", path.display(), reason.replace('\n', "\n    "))
            }
        }
    }
}

/// What a single entry found in an install tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub found: BTreeSet<PathBuf>,
    pub missing: BTreeSet<Missing>,
}

/// `path` with `suffix` appended to its final component.
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

impl Entry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Entry::File { path: path.into() }
    }

    pub fn versioned_lib(path: impl Into<PathBuf>, target: &str, aliases: &[&str]) -> Self {
        Entry::VersionedLib {
            path: path.into(),
            target: target.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn suffix_lib(path: impl Into<PathBuf>, main_suffix: &str, suffixes: &[&str]) -> Self {
        Entry::SuffixLib {
            path: path.into(),
            main_suffix: main_suffix.to_string(),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Paths this entry requires by exact name.
    pub fn expected_paths(&self) -> Vec<PathBuf> {
        match self {
            Entry::File { path } => vec![path.clone()],
            Entry::VersionedLib {
                path,
                target,
                aliases,
            } => std::iter::once(target)
                .chain(aliases)
                .map(|s| suffixed(path, s))
                .collect(),
            Entry::SuffixLib {
                path, main_suffix, ..
            } => vec![suffixed(path, main_suffix)],
        }
    }

    /// Check this entry against the install tree at `root`.
    pub fn check(&self, root: &Path) -> Result<CheckOutcome> {
        match self {
            Entry::File { path } => Ok(check_file(root, path)),
            Entry::VersionedLib {
                path,
                target,
                aliases,
            } => check_versioned_lib(root, path, target, aliases),
            Entry::SuffixLib {
                path,
                main_suffix,
                suffixes,
            } => check_suffix_lib(root, path, main_suffix, suffixes),
        }
    }
}

fn check_file(root: &Path, path: &Path) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    if root.join(path).is_file() {
        outcome.found.insert(path.to_path_buf());
    } else {
        outcome.missing.insert(Missing::Absent(path.to_path_buf()));
    }
    outcome
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

fn check_versioned_lib(
    root: &Path,
    path: &Path,
    target: &str,
    aliases: &[String],
) -> Result<CheckOutcome> {
    let mut outcome = CheckOutcome::default();

    let target = suffixed(path, target);
    let target_abs = root.join(&target);
    let target_exists = target_abs.is_file();
    if !target_exists {
        outcome.missing.insert(Missing::Absent(target.clone()));
    }
    if is_symlink(&target_abs) {
        let dest = fs::read_link(&target_abs)
            .with_context(|| format!("failed to read link {}", target_abs.display()))?;
        outcome.missing.insert(Missing::invalid(
            target.clone(),
            format!("Unexpected symlink to {}", dest.display()),
        ));
    } else if target_exists {
        outcome.found.insert(target.clone());
    }

    let target_name = target.file_name().unwrap_or_default();
    for alias in aliases {
        let alias = suffixed(path, alias);
        let alias_abs = root.join(&alias);

        // follows the link, so a dangling alias is absent
        if !alias_abs.is_file() {
            outcome.missing.insert(Missing::Absent(alias));
            continue;
        }
        if !is_symlink(&alias_abs) {
            outcome.missing.insert(Missing::invalid(alias, "Not a symlink"));
            continue;
        }

        let dest = fs::read_link(&alias_abs)
            .with_context(|| format!("failed to read link {}", alias_abs.display()))?;
        if dest.components().count() != 1 {
            outcome.missing.insert(Missing::invalid(
                alias,
                "Invalid symlink, must point to sibling file",
            ));
            continue;
        }
        if dest.file_name() != Some(target_name) {
            outcome.missing.insert(Missing::invalid(
                alias,
                format!(
                    "Invalid symlink, must point to {}",
                    target_name.to_string_lossy()
                ),
            ));
            continue;
        }

        outcome.found.insert(alias);
    }

    Ok(outcome)
}

fn check_suffix_lib(
    root: &Path,
    path: &Path,
    main_suffix: &str,
    suffixes: &[String],
) -> Result<CheckOutcome> {
    let mut outcome = CheckOutcome::default();

    let main = suffixed(path, main_suffix);
    if !root.join(&main).is_file() {
        outcome.missing.insert(Missing::Absent(main));
        return Ok(outcome);
    }
    outcome.found.insert(main.clone());

    let patterns = suffixes
        .iter()
        .map(|s| Regex::new(&format!("^(?:{})", s)))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid suffix pattern for {}", path.display()))?;

    let stem = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let parent = path.parent().unwrap_or(Path::new(""));
    let dir = root.join(parent);
    for entry in
        fs::read_dir(&dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(rest) = name.strip_prefix(stem) else {
            continue;
        };
        let rel = parent.join(name);
        if rel != main && patterns.iter().any(|re| re.is_match(rest)) {
            outcome.found.insert(rel);
        }
    }

    Ok(outcome)
}

/// Result of comparing a manifest against an install tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    /// Number of expected items that were missing or malformed.
    pub missing: usize,
    /// Number of installed files the manifest did not account for.
    pub unexpected: usize,
    /// `+ path` lines for unexpected files.
    pub warnings: Vec<String>,
    /// `- path` / `! path` lines for missing items.
    pub errors: Vec<String>,
}

impl InstallReport {
    pub fn is_clean(&self) -> bool {
        self.missing == 0 && self.unexpected == 0
    }

    /// Warnings then errors, optionally colored.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();
        let (warn, err, reset) = if color {
            ("\x1b[33m", "\x1b[31m", "\x1b[0m")
        } else {
            ("", "", "")
        };
        for hunk in &self.warnings {
            let _ = writeln!(output, "{}{}{}", warn, hunk, reset);
        }
        for hunk in &self.errors {
            let _ = writeln!(output, "{}{}{}", err, hunk, reset);
        }
        output
    }
}

/// Expected contents of an HPCToolkit install.
#[derive(Debug, Clone)]
pub struct Manifest {
    entries: Vec<Entry>,
}

impl Manifest {
    /// The install manifest for a build with or without MPI.
    pub fn new(mpi: bool) -> Self {
        let mut entries = catalog::base();
        if mpi {
            entries.extend(catalog::mpi());
        }
        Manifest { entries }
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Manifest { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Whether some entry requires exactly `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries
            .iter()
            .any(|e| e.expected_paths().iter().any(|p| p == path))
    }

    /// Scan `root` and compare it against the manifest.
    ///
    /// Findings are returned (and logged at debug level, warnings first);
    /// only I/O failures are errors.
    pub fn check(&self, root: &Path) -> Result<InstallReport> {
        let listing = list_files(root)?;
        let mut unclaimed = listing.clone();
        let mut report = InstallReport::default();

        for entry in &self.entries {
            let outcome = entry.check(root)?;

            // claimed by the entry but not actually listed
            let unlisted: Vec<&PathBuf> = outcome.found.difference(&listing).collect();
            report.unexpected += unlisted.len();
            report
                .warnings
                .extend(unlisted.iter().map(|p| format!("+ {}", p.display())));

            for path in &outcome.found {
                unclaimed.remove(path);
            }

            report.missing += outcome.missing.len();
            report
                .errors
                .extend(outcome.missing.iter().map(Missing::hunk));
        }

        report.unexpected += unclaimed.len();
        report
            .warnings
            .extend(unclaimed.iter().map(|p| format!("+ {}", p.display())));

        for hunk in report.warnings.iter().chain(&report.errors) {
            tracing::debug!("{}", hunk);
        }
        tracing::info!(
            "{} missing, {} unexpected in {}",
            report.missing,
            report.unexpected,
            root.display()
        );

        Ok(report)
    }
}
