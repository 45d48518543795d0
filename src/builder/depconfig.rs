//! Dependency configuration lines.
//!
//! A dependency file maps configure arguments to their full form, one per
//! line:
//!
//! ```text
//! --with-boost=/opt/boost
//! --with-zlib= ${CTX}/zlib ENV{ZLIB_HOME}=${CTX}/zlib
//! MPICXX=mpicxx
//! ```
//!
//! Lines from every loaded file are kept in load order and searched
//! first-match-wins, so files loaded earlier take precedence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::env::LayeredEnv;
use crate::core::errors::ConfigureError;

/// Candidates searched for `${CC}` when `CC` is unset.
const CC_CANDIDATES: &[&str] = &["gcc", "icc", "cc"];

/// Candidates searched for `${CXX}` when `CXX` is unset.
const CXX_CANDIDATES: &[&str] = &["g++", "icpc", "CC", "c++"];

/// One loaded line and the directory it was loaded for.
#[derive(Debug, Clone)]
struct Entry {
    ctx: Option<PathBuf>,
    line: String,
}

/// Ordered table of dependency lines.
#[derive(Debug, Clone)]
pub struct DependencyConfig {
    entries: Vec<Entry>,
    env: LayeredEnv,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyConfig {
    /// Create an empty table resolving macros against the process environment.
    pub fn new() -> Self {
        Self::with_env(LayeredEnv::from_process())
    }

    /// Create an empty table resolving macros against `env`.
    pub fn with_env(env: LayeredEnv) -> Self {
        DependencyConfig {
            entries: Vec::new(),
            env,
        }
    }

    /// The environment macros are resolved against.
    pub fn env(&self) -> &LayeredEnv {
        &self.env
    }

    /// Number of loaded lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append every line of `path`, tagged with `ctx` for `${CTX}`.
    pub fn load(&mut self, path: &Path, ctx: Option<&Path>) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dependency file: {}", path.display()))?;
        self.add_lines(&contents, ctx);
        tracing::debug!(
            "Loaded {} ({} lines total)",
            path.display(),
            self.entries.len()
        );
        Ok(())
    }

    /// Append every line of `contents`.
    pub fn add_lines(&mut self, contents: &str, ctx: Option<&Path>) {
        self.entries.extend(contents.lines().map(|line| Entry {
            ctx: ctx.map(Path::to_path_buf),
            line: line.to_string(),
        }));
    }

    /// Fetch the full form of `argument`.
    ///
    /// If `argument` ends in whitespace it is stripped from the matched line;
    /// otherwise the whole line is used.
    pub fn get(&self, argument: &str) -> Result<Vec<String>, ConfigureError> {
        let argument = argument.trim_start();

        let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.line.trim_start().starts_with(argument))
        else {
            return Err(ConfigureError::MissingDefinition {
                argument: argument.to_string(),
            });
        };

        let mut line = entry.line.trim_start();
        if argument.ends_with(char::is_whitespace) {
            line = &line[argument.len()..];
        }
        let line = line.trim();

        let words = shlex::split(line).ok_or_else(|| ConfigureError::InvalidQuoting {
            argument: argument.to_string(),
            line: entry.line.clone(),
        })?;

        let result = words
            .into_iter()
            .map(|word| self.expand(word, entry.ctx.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("{} -> {:?}", argument, result);
        Ok(result)
    }

    /// Substitute `${CC}`, `${CXX}` and `${CTX}` in a single word.
    fn expand(&self, mut word: String, ctx: Option<&Path>) -> Result<String, ConfigureError> {
        let mut names = vec!["CC", "CXX"];
        if ctx.is_some() {
            names.push("CTX");
        }

        for name in names {
            let placeholder = format!("${{{}}}", name);
            if !word.contains(&placeholder) {
                continue;
            }
            let value = match (name, ctx) {
                ("CC", _) => self.compiler("CC", CC_CANDIDATES),
                ("CXX", _) => self.compiler("CXX", CXX_CANDIDATES),
                (_, Some(ctx)) => Some(
                    std::path::absolute(ctx)
                        .unwrap_or_else(|_| ctx.to_path_buf())
                        .to_string_lossy()
                        .into_owned(),
                ),
                (_, None) => None,
            };
            let Some(value) = value else {
                return Err(ConfigureError::UnresolvedMacro { placeholder });
            };
            word = word.replace(&placeholder, &value);
        }
        Ok(word)
    }

    /// `$name` from the environment, else the first candidate on `PATH`.
    fn compiler(&self, name: &str, candidates: &[&str]) -> Option<String> {
        if let Some(value) = self.env.get(name) {
            return Some(value.to_string());
        }
        self.env
            .which_any(candidates)
            .map(|p| p.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn env_with_cc(cc: &str) -> LayeredEnv {
        LayeredEnv::inheriting([("CC", cc), ("CXX", "/opt/bin/g++")])
    }

    fn empty_path_env(tmp: &TempDir) -> LayeredEnv {
        LayeredEnv::inheriting([("PATH", tmp.path().to_string_lossy().into_owned())])
    }

    #[test]
    fn test_whitespace_key_strips_prefix() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("deps.conf");
        fs::write(&file, "--with-zlib= ${CC} --extra\n").unwrap();

        let mut deps = DependencyConfig::with_env(env_with_cc("/usr/bin/gcc"));
        deps.load(&file, None).unwrap();

        assert_eq!(
            deps.get("--with-zlib= ").unwrap(),
            vec!["/usr/bin/gcc", "--extra"]
        );
    }

    #[test]
    fn test_plain_key_keeps_whole_line() {
        let mut deps = DependencyConfig::with_env(env_with_cc("/usr/bin/gcc"));
        deps.add_lines("--with-zlib= ${CC} --extra\n", None);

        assert_eq!(
            deps.get("--with-zlib=").unwrap(),
            vec!["--with-zlib=", "/usr/bin/gcc", "--extra"]
        );
    }

    #[test]
    fn test_missing_definition_names_key() {
        let mut deps = DependencyConfig::with_env(env_with_cc("cc"));
        deps.add_lines("--with-boost=/opt/boost\n", None);

        assert_eq!(
            deps.get("--with-tbb=").unwrap_err(),
            ConfigureError::MissingDefinition {
                argument: "--with-tbb=".to_string()
            }
        );
    }

    #[test]
    fn test_first_match_wins_across_files() {
        let mut deps = DependencyConfig::with_env(env_with_cc("cc"));
        deps.add_lines("--with-tbb=/project/tbb\n", None);
        deps.add_lines("--with-boost=/site/boost\n--with-tbb=/site/tbb\n", None);

        assert_eq!(deps.len(), 3);
        assert_eq!(deps.get("--with-tbb=").unwrap(), vec!["--with-tbb=/project/tbb"]);
        assert_eq!(deps.get("--with-boost=").unwrap(), vec!["--with-boost=/site/boost"]);
    }

    #[test]
    fn test_shell_quoting() {
        let mut deps = DependencyConfig::with_env(env_with_cc("cc"));
        deps.add_lines(r#"CFLAGS= "-O2 -g" 'ENV{LDFLAGS}=-L/opt/x lib'"#, None);

        assert_eq!(
            deps.get("CFLAGS= ").unwrap(),
            vec!["-O2 -g", "ENV{LDFLAGS}=-L/opt/x lib"]
        );
    }

    #[test]
    fn test_unbalanced_quote() {
        let mut deps = DependencyConfig::with_env(env_with_cc("cc"));
        deps.add_lines("--with-papi=\"/opt/papi\n", None);

        assert!(matches!(
            deps.get("--with-papi=").unwrap_err(),
            ConfigureError::InvalidQuoting { .. }
        ));
    }

    #[test]
    fn test_ctx_substitution() {
        let tmp = TempDir::new().unwrap();
        let mut deps = DependencyConfig::with_env(env_with_cc("cc"));
        deps.add_lines("--with-xed=${CTX}/xed\n", Some(tmp.path()));

        let expected = format!("--with-xed={}/xed", tmp.path().display());
        assert_eq!(deps.get("--with-xed=").unwrap(), vec![expected]);
    }

    #[test]
    fn test_ctx_left_alone_without_context() {
        let mut deps = DependencyConfig::with_env(env_with_cc("cc"));
        deps.add_lines("--with-xed=${CTX}/xed ${UNKNOWN}\n", None);

        assert_eq!(
            deps.get("--with-xed=").unwrap(),
            vec!["--with-xed=${CTX}/xed", "${UNKNOWN}"]
        );
    }

    #[test]
    fn test_cxx_from_env() {
        let mut deps = DependencyConfig::with_env(env_with_cc("cc"));
        deps.add_lines("MPICXX=${CXX}\n", None);

        assert_eq!(deps.get("MPICXX=").unwrap(), vec!["MPICXX=/opt/bin/g++"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_compiler_found_on_path() {
        let tmp = TempDir::new().unwrap();
        let cc = crate::util::fs::write_executable(&tmp.path().join("cc"), "#!/bin/sh\n").unwrap();

        let mut deps = DependencyConfig::with_env(empty_path_env(&tmp));
        deps.add_lines("CC= ${CC}\n", None);

        assert_eq!(deps.get("CC= ").unwrap(), vec![cc.to_string_lossy().into_owned()]);
    }

    #[test]
    fn test_unresolved_compiler() {
        let tmp = TempDir::new().unwrap();
        let mut deps = DependencyConfig::with_env(empty_path_env(&tmp));
        deps.add_lines("--with-zlib= ${CC}\n--with-boost=/opt/boost\n", None);

        assert_eq!(
            deps.get("--with-zlib= ").unwrap_err(),
            ConfigureError::UnresolvedMacro {
                placeholder: "${CC}".to_string()
            }
        );
        // lines without compiler macros still resolve
        assert_eq!(deps.get("--with-boost=").unwrap(), vec!["--with-boost=/opt/boost"]);
    }
}
