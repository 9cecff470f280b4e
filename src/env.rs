use std::ffi::{OsStr, OsString};

use crate::model::EnvMap;

/// Environment handed to a launched process.
///
/// An ordered list of name/value pairs. Names may repeat; when the list is
/// applied to a process the last occurrence of a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ {
    vars: Vec<(OsString, OsString)>,
}

impl Environ {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    pub fn inherited() -> Self {
        std::env::vars_os().collect()
    }

    /// Build from `KEY=VALUE` strings.
    ///
    /// The split happens at the first `=` after the first character, so names
    /// like `=C:` survive. Strings without a separator are skipped.
    pub fn from_assignments<I, S>(assignments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        assignments
            .into_iter()
            .filter_map(|assignment| {
                let assignment = assignment.as_ref();
                let split = assignment.char_indices().skip(1).find(|(_, ch)| *ch == '=');
                split.map(|(idx, _)| {
                    (
                        OsString::from(&assignment[..idx]),
                        OsString::from(&assignment[idx + 1..]),
                    )
                })
            })
            .collect()
    }

    pub fn push(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.push((key.into(), value.into()));
    }

    /// Append every decoded entry, without removing earlier entries that
    /// share a name.
    pub fn extend_from_map(&mut self, map: &EnvMap) {
        self.vars.extend(
            map.iter()
                .map(|(key, value)| (OsString::from(key), OsString::from(value))),
        );
    }

    /// Value of the last entry named `key`.
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        let key = key.as_ref();
        self.vars
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_os_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars
            .iter()
            .map(|(key, value)| (key.as_os_str(), value.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Render as `KEY=VALUE` strings, replacing invalid UTF-8 lossily.
    pub fn to_assignments(&self) -> Vec<String> {
        self.iter()
            .map(|(key, value)| format!("{}={}", key.to_string_lossy(), value.to_string_lossy()))
            .collect()
    }
}

impl FromIterator<(OsString, OsString)> for Environ {
    fn from_iter<I: IntoIterator<Item = (OsString, OsString)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Merge decoded values onto an inherited environment.
pub fn build_environ(mut inherited: Environ, decoded: &EnvMap) -> Environ {
    inherited.extend_from_map(decoded);
    inherited
}
