//! Version queries (`@v1.2.3`, `@latest`, `@upgrade`, `@patch`).

use std::cmp::Ordering;

use semver::Version;

/// A parsed `@query` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionQuery {
    /// A specific semantic version such as `v1.2.3`.
    Exact(String),
    /// The newest release (or newest pre-release if there is no release).
    Latest,
    /// Like `Latest`, but never older than the required version.
    Upgrade,
    /// Newest version sharing the required version's major.minor.
    Patch,
}

impl VersionQuery {
    pub fn parse(query: &str) -> Result<Self, String> {
        match query {
            "latest" => Ok(Self::Latest),
            "upgrade" => Ok(Self::Upgrade),
            "patch" => Ok(Self::Patch),
            other if parse_version(other).is_some() => Ok(Self::Exact(other.to_string())),
            other => Err(format!("invalid version query {other:?}")),
        }
    }

    /// Select a version from `available` given the currently required one.
    pub fn select(&self, current: Option<&str>, available: &[String]) -> Result<String, String> {
        match self {
            Self::Exact(version) => Ok(version.clone()),
            Self::Latest => newest(available)
                .map(str::to_string)
                .ok_or_else(|| "no matching versions for query \"latest\"".to_string()),
            Self::Upgrade => {
                let latest = newest(available);
                match (current, latest) {
                    (Some(cur), Some(new)) if compare(cur, new) == Ordering::Greater => {
                        Ok(cur.to_string())
                    }
                    (_, Some(new)) => Ok(new.to_string()),
                    (Some(cur), None) => Ok(cur.to_string()),
                    (None, None) => Err("no matching versions for query \"upgrade\"".to_string()),
                }
            }
            Self::Patch => {
                let Some(cur) = current.and_then(parse_version) else {
                    return Self::Latest.select(None, available);
                };
                available
                    .iter()
                    .filter_map(|v| parse_version(v).map(|parsed| (parsed, v)))
                    .filter(|(v, _)| v.major == cur.major && v.minor == cur.minor && *v >= cur)
                    .max_by(|a, b| a.0.cmp(&b.0))
                    .map(|(_, v)| v.clone())
                    .or_else(|| current.map(str::to_string))
                    .ok_or_else(|| "no matching versions for query \"patch\"".to_string())
            }
        }
    }
}

/// Parse a `v`-prefixed semantic version.
pub fn parse_version(version: &str) -> Option<Version> {
    version
        .strip_prefix('v')
        .and_then(|rest| Version::parse(rest).ok())
}

/// Keep valid versions only, sorted ascending and without duplicates.
pub fn sort_versions(versions: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut parsed: Vec<(Version, String)> = versions
        .into_iter()
        .filter_map(|v| parse_version(&v).map(|parsed| (parsed, v)))
        .collect();
    parsed.sort_by(|a, b| a.0.cmp(&b.0));
    parsed.dedup_by(|a, b| a.0 == b.0);
    parsed.into_iter().map(|(_, v)| v).collect()
}

/// Newest release in `available`, falling back to the newest pre-release.
pub fn newest(available: &[String]) -> Option<&str> {
    let parsed = || {
        available
            .iter()
            .filter_map(|v| parse_version(v).map(|parsed| (parsed, v.as_str())))
    };
    parsed()
        .filter(|(v, _)| v.pre.is_empty())
        .max_by(|a, b| a.0.cmp(&b.0))
        .or_else(|| parsed().max_by(|a, b| a.0.cmp(&b.0)))
        .map(|(_, v)| v)
}

/// Compare two versions; unparsable versions sort first.
pub fn compare(a: &str, b: &str) -> Ordering {
    parse_version(a).cmp(&parse_version(b))
}
