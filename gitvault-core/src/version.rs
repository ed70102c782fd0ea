//! Version ordering for the tag regression guard.
//!
//! Published tags look like `v1.2.3-pc` or `v0.4-windows+chunked`. To compare
//! a candidate against what a channel already has, we strip build metadata
//! (`+…`) and the channel suffix (`-<channel>`), pull out the leading numeric
//! component, and compare multi-component numerically — `1.10 > 1.2`.
//!
//! Channels are independent: callers must filter to one channel *before*
//! taking a maximum; [`newest_on_channel`] does exactly that.

use std::fmt;

use crate::error::VersionError;

/// A comparable version: ordered numeric components, trailing zeros dropped
/// so `1.0` and `1.0.0` are equal. Ordering is component-wise numeric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(Vec<u64>);

impl Version {
    /// Parse any version-ish string (`1.2.3`, `v1.0`, `Ch.2.1`, `0.4-pc`,
    /// `1.0+chunked`) into a comparable version.
    ///
    /// Build metadata and a trailing channel suffix are removed first, then
    /// everything from the first digit onward is read as dot-separated
    /// numeric components (non-digit tails of a component are ignored).
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let stripped = strip_channel_suffix(strip_build_metadata(raw));

        let numeric_start = stripped
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| VersionError::NoNumericComponent(raw.to_string()))?;

        let mut components = Vec::new();
        for part in stripped[numeric_start..].split('.') {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                break;
            }
            // Fixed-width numeric strings always fit u64 here; a component
            // longer than 19 digits is not a version anyone publishes.
            let value = digits
                .parse::<u64>()
                .map_err(|_| VersionError::NoNumericComponent(raw.to_string()))?;
            components.push(value);
        }

        if components.is_empty() {
            return Err(VersionError::NoNumericComponent(raw.to_string()));
        }

        // Normalise so 1.0 == 1.0.0 under derived Eq/Ord.
        while components.len() > 1 && components.last() == Some(&0) {
            components.pop();
        }

        Ok(Self(components))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Remove build metadata: everything from the first `+` onward.
pub fn strip_build_metadata(s: &str) -> &str {
    match s.find('+') {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Remove a trailing `-<channel>` suffix (`1.0-pc` → `1.0`), if present.
pub fn strip_channel_suffix(s: &str) -> &str {
    match s.rfind('-') {
        Some(i) if i > 0 && s[i + 1..].chars().all(|c| c.is_ascii_alphanumeric() || c == '_') && !s[i + 1..].is_empty() => {
            &s[..i]
        }
        _ => s,
    }
}

/// Highest parseable version among `tags` published on `channel`.
///
/// A tag participates only when, after metadata stripping, it ends in
/// exactly `-<channel>`. Unparseable survivors are skipped.
pub fn newest_on_channel(tags: &[String], channel: &str) -> Option<Version> {
    let suffix = format!("-{channel}");
    tags.iter()
        .filter_map(|tag| {
            let no_meta = strip_build_metadata(tag);
            let base = no_meta.strip_suffix(&suffix)?;
            Version::parse(base).ok()
        })
        .max()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
