use std::collections::BTreeMap;
use std::path::PathBuf;

/// Decoded `.env` contents: variable name to value.
pub type EnvMap = BTreeMap<String, String>;

/// A parsed `KEY=VALUE` entry from a `.env` file or input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub source: Option<PathBuf>,
    /// 1-based line on which the key appears.
    pub line: u32,
}

/// Collapse entries into a map; later keys overwrite earlier ones.
pub fn to_map<I>(entries: I) -> EnvMap
where
    I: IntoIterator<Item = Entry>,
{
    entries
        .into_iter()
        .map(|entry| (entry.key, entry.value))
        .collect()
}
