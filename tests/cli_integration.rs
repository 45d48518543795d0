//! CLI integration tests for buildfe.
//!
//! Commands run with a scratch HOME and a PATH holding only fake tools, so
//! the host's configuration and toolchain never leak in.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use buildfe::core::manifest::{Entry, Manifest};

const DEPS: &str = "\
--with-boost=/opt/boost
--with-bzip=/opt/bzip2
--with-dyninst=/opt/dyninst
--with-elfutils=/opt/elfutils
--with-tbb=/opt/tbb
--with-libmonitor=/opt/libmonitor
--with-libunwind=/opt/libunwind
--with-xerces=/opt/xerces
--with-lzma=/opt/xz
--with-zlib=/opt/zlib ENV{ZLIB_ROOT}=/opt/zlib
--with-libiberty=/opt/binutils
--with-memkind=/opt/memkind
--with-yaml-cpp=/opt/yaml-cpp CC=${CC}
--with-xed=/opt/xed
--with-papi=/opt/papi
--with-perfmon=/opt/libpfm4
--with-level0=/opt/level0
--with-opencl=/opt/opencl
--with-rocm=/opt/rocm
MPICXX=/opt/mpi/bin/mpicxx
";

/// Every feature pinned except `cuda`.
const NO_CUDA_FREE: &str = "~mpi ~debug ~papi ~opencl ~rocm ~level0";

struct Sandbox {
    tmp: TempDir,
}

impl Sandbox {
    /// A scratch directory with fake `make` and `gcc` on PATH and a
    /// dependency file without `--with-cuda=`.
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let sandbox = Sandbox { tmp };
        sandbox.executable("bin/make", "#!/bin/sh\n");
        sandbox.executable("bin/gcc", "#!/bin/sh\n");
        sandbox.write("deps.conf", DEPS);
        sandbox
    }

    fn path(&self) -> &Path {
        self.tmp.path()
    }

    fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn executable(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.write(rel, contents);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Get the buildfe binary command, confined to the sandbox.
    fn buildfe(&self) -> Command {
        let mut cmd = Command::cargo_bin("buildfe").unwrap();
        cmd.env_clear()
            .env("HOME", self.path().join("home"))
            .env("PATH", self.path().join("bin"))
            .current_dir(self.path());
        cmd
    }
}

/// Lay out a correct install for `manifest` under `root`.
fn populate(root: &Path, manifest: &Manifest) {
    let touch = |rel: &Path| {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    };

    for entry in manifest.entries() {
        let paths = entry.expected_paths();
        match entry {
            Entry::VersionedLib { .. } => {
                let (real, aliases) = paths.split_first().unwrap();
                touch(real.as_path());
                for alias in aliases {
                    std::os::unix::fs::symlink(real.file_name().unwrap(), root.join(alias))
                        .unwrap();
                }
            }
            Entry::File { .. } | Entry::SuffixLib { .. } => paths.iter().for_each(|p| touch(p.as_path())),
        }
    }
}

// ============================================================================
// buildfe variants
// ============================================================================

#[test]
fn test_variants_lists_all() {
    let sb = Sandbox::new();

    let output = sb.buildfe().arg("variants").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 128);
    assert_eq!(
        stdout.lines().next(),
        Some("~mpi +debug +papi ~opencl ~cuda ~rocm ~level0")
    );
}

#[test]
fn test_variants_filtered() {
    let sb = Sandbox::new();

    let output = sb
        .buildfe()
        .args(["variants", "+mpi ~debug"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 32);
    assert!(stdout.lines().all(|l| l.starts_with("+mpi ~debug")));
}

#[test]
fn test_variants_invalid_name() {
    let sb = Sandbox::new();

    sb.buildfe()
        .args(["variants", "+gpu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown variant `gpu`"));
}

#[test]
fn test_variants_missing_indicator() {
    let sb = Sandbox::new();

    sb.buildfe()
        .args(["variants", "mpi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`mpi` is not a variant spec"));
}

#[test]
fn test_variants_use_project_filter() {
    let sb = Sandbox::new();
    sb.write(".buildfe/config.toml", "[variants]\nfilter = \"+cuda +rocm\"\n");

    let output = sb.buildfe().arg("variants").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 32);
}

// ============================================================================
// buildfe configure
// ============================================================================

#[test]
fn test_configure_prints_command() {
    let sb = Sandbox::new();
    let spec = format!("{} ~cuda", NO_CUDA_FREE);

    let output = sb
        .buildfe()
        .args(["configure", "-d", "deps.conf", "--variant", &spec])
        .args(["--prefix", "/opt/hpctoolkit", "--source", "/src/hpctoolkit"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("ZLIB_ROOT=/opt/zlib"));
    assert!(stdout.contains("/src/hpctoolkit/configure"));
    assert!(stdout.contains("--prefix=/opt/hpctoolkit"));
    assert!(stdout.contains("--with-yaml-cpp=/opt/yaml-cpp"));
    assert!(stdout.contains("CC=") && stdout.contains("/bin/gcc"));
    assert!(stdout.contains("MPICXX="));
    assert!(!stdout.contains("ENV{"));
}

#[test]
fn test_configure_skips_missing_definition() {
    let sb = Sandbox::new();

    sb.buildfe()
        .args(["configure", "-d", "deps.conf", "--variant", NO_CUDA_FREE])
        .assert()
        .success()
        .stdout(predicate::str::contains("--with-zlib=/opt/zlib"))
        .stdout(predicate::str::contains(
            "skipped: missing definition for argument `--with-cuda=`",
        ))
        .stderr(predicate::str::contains("warning: no definition for `--with-cuda=`"));
}

#[test]
fn test_configure_json() {
    let sb = Sandbox::new();

    let output = sb
        .buildfe()
        .args(["configure", "-d", "deps.conf", "--format", "json"])
        .args(["--variant", NO_CUDA_FREE])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["status"], "configured");
    assert_eq!(items[0]["env"]["ZLIB_ROOT"], "/opt/zlib");
    assert_eq!(items[1]["status"], "skipped");
}

#[test]
fn test_configure_uses_project_config() {
    let sb = Sandbox::new();
    sb.write(
        ".buildfe/config.toml",
        &format!(
            "[dependencies]\nfiles = [{{ path = \"../deps.conf\" }}]\n[variants]\nfilter = \"{} ~cuda\"\n",
            NO_CUDA_FREE
        ),
    );

    sb.buildfe()
        .arg("configure")
        .assert()
        .success()
        .stdout(predicate::str::contains("--with-boost=/opt/boost"));
}

#[test]
fn test_configure_requires_make() {
    let sb = Sandbox::new();
    fs::remove_file(sb.path().join("bin/make")).unwrap();

    sb.buildfe()
        .args(["configure", "-d", "deps.conf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`make` not found in PATH"));
}

#[test]
fn test_configure_missing_deps_file() {
    let sb = Sandbox::new();

    sb.buildfe()
        .args(["configure", "-d", "nope.conf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.conf"));
}

#[test]
fn test_configure_exec() {
    let sb = Sandbox::new();
    let log = sb.path().join("configure.log");
    sb.executable(
        "src/configure",
        &format!("#!/bin/sh\necho \"$ZLIB_ROOT $*\" > '{}'\n", log.display()),
    );
    let spec = format!("{} ~cuda", NO_CUDA_FREE);

    sb.buildfe()
        // the script's shebang needs a real shell
        .env("PATH", format!("{}:/bin:/usr/bin", sb.path().join("bin").display()))
        .args(["configure", "-d", "deps.conf", "--variant", &spec])
        .args(["--source", "src", "--prefix", "/opt/hpctoolkit", "--exec"])
        .assert()
        .success();

    let written = fs::read_to_string(&log).unwrap();
    assert!(written.starts_with("/opt/zlib --prefix=/opt/hpctoolkit --with-boost=/opt/boost"));
}

#[test]
fn test_configure_exec_ambiguous() {
    let sb = Sandbox::new();

    sb.buildfe()
        .args(["configure", "-d", "deps.conf", "--exec"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("narrow the filter"));
}

// ============================================================================
// buildfe check-install
// ============================================================================

#[test]
fn test_check_install_clean() {
    let sb = Sandbox::new();
    let root = sb.path().join("install");
    populate(&root, &Manifest::new(true));

    sb.buildfe()
        .args(["check-install", "install", "--mpi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("install matches manifest"));

    // without MPI, hpcprof-mpi is unexpected
    sb.buildfe()
        .args(["check-install", "install", "--variant", "~mpi"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("+ bin/hpcprof-mpi"));
}

#[test]
fn test_check_install_missing_and_stray() {
    let sb = Sandbox::new();
    let root = sb.path().join("install");
    populate(&root, &Manifest::new(false));
    fs::remove_file(root.join("bin/hpclink")).unwrap();
    fs::write(root.join("bin/stray"), "").unwrap();

    sb.buildfe()
        .args(["check-install", "install"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("- bin/hpclink"))
        .stdout(predicate::str::contains("+ bin/stray"))
        .stdout(predicate::str::contains("1 missing, 1 unexpected"))
        // hunks go to stdout only; stderr carries the summary log
        .stderr(predicate::str::contains("1 missing, 1 unexpected in"))
        .stderr(predicate::str::contains("bin/hpclink").not())
        .stderr(predicate::str::contains("bin/stray").not());
}

#[test]
fn test_check_install_json() {
    let sb = Sandbox::new();
    let root = sb.path().join("install");
    populate(&root, &Manifest::new(false));
    fs::remove_file(root.join("bin/hpcrun")).unwrap();

    let output = sb
        .buildfe()
        .args(["check-install", "install", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["missing"], 1);
    assert_eq!(json["unexpected"], 0);
    assert_eq!(json["errors"][0], "- bin/hpcrun");
}

#[test]
fn test_check_install_missing_root() {
    let sb = Sandbox::new();

    sb.buildfe()
        .args(["check-install", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}
