//! Layered process environment.
//!
//! Variables set on a [`LayeredEnv`] shadow a snapshot of the environment
//! taken when it was created. The real process environment is never touched;
//! the overlay is handed to child processes explicitly.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Local overrides on top of an inherited environment snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredEnv {
    local: BTreeMap<String, String>,
    inherited: BTreeMap<String, String>,
}

impl LayeredEnv {
    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self::inheriting(std::env::vars())
    }

    /// An environment inheriting the given variables.
    pub fn inheriting<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LayeredEnv {
            local: BTreeMap::new(),
            inherited: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Look a variable up, overrides first.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.local
            .get(key)
            .or_else(|| self.inherited.get(key))
            .map(String::as_str)
    }

    /// Set a local override.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.local.insert(key.into(), value.into());
    }

    /// The local overrides only.
    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.local
    }

    /// A fresh overlay on top of everything visible through this one.
    pub fn child(&self) -> LayeredEnv {
        LayeredEnv::inheriting(self.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    /// Every visible variable, with overrides applied.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let shadowed = self
            .inherited
            .iter()
            .filter(|(k, _)| !self.local.contains_key(*k));
        let mut all: Vec<(&str, &str)> = self
            .local
            .iter()
            .chain(shadowed)
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all.sort_unstable_by_key(|(k, _)| *k);
        all.into_iter()
    }

    /// Locate an executable on this environment's `PATH`.
    pub fn which(&self, name: &str) -> Option<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_default();
        which::which_in(name, self.get("PATH"), cwd).ok()
    }

    /// Locate the first of several executables on `PATH`.
    pub fn which_any(&self, names: &[&str]) -> Option<PathBuf> {
        names.iter().find_map(|name| self.which(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_shadow_inherited() {
        let mut env = LayeredEnv::inheriting([("CC", "gcc"), ("HOME", "/home/u")]);
        env.set("CC", "clang");

        assert_eq!(env.get("CC"), Some("clang"));
        assert_eq!(env.get("HOME"), Some("/home/u"));
        assert_eq!(env.get("MISSING"), None);
        assert_eq!(env.overrides().len(), 1);

        let visible: Vec<_> = env.iter().collect();
        assert_eq!(visible, vec![("CC", "clang"), ("HOME", "/home/u")]);
    }

    #[test]
    fn test_child_sees_parent_overrides() {
        let mut parent = LayeredEnv::inheriting([("A", "1")]);
        parent.set("B", "2");

        let mut child = parent.child();
        child.set("A", "3");

        assert_eq!(child.get("A"), Some("3"));
        assert_eq!(child.get("B"), Some("2"));
        assert_eq!(parent.get("A"), Some("1"));
        assert_eq!(child.overrides().len(), 1);
    }

    #[test]
    fn test_which_with_empty_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let env = LayeredEnv::inheriting([("PATH", tmp.path().to_string_lossy().into_owned())]);
        assert_eq!(env.which_any(&["gcc", "cc"]), None);
    }
}
