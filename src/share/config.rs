//! Share definitions and the registry loaded from `shares.json`
//!
//! # Example
//! ```json
//! {
//!   "shares": {
//!     "media": {
//!       "mount_point": "~/mnt/Media",
//!       "share_path": "//nas.local/Media",
//!       "display_name": "Media"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Host used by the built-in share definitions
const DEFAULT_HOST: &str = "nas.local";

/// A named SMB share that can be mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDefinition {
    /// Lookup name, always lower case
    pub key: String,

    /// Local mount point, may start with `~`
    pub mount_point: String,

    /// UNC-style network path (`//host/Share`)
    pub share_path: String,

    /// Human readable name used in notifications
    pub display_name: String,
}

impl ShareDefinition {
    pub fn new(
        key: impl Into<String>,
        mount_point: impl Into<String>,
        share_path: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            mount_point: mount_point.into(),
            share_path: share_path.into(),
            display_name: display_name.into(),
        }
    }

    /// Resolve the mount point (expand ~)
    pub fn resolve_mount_point(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.mount_point).as_ref())
    }
}

/// On-disk layout of `shares.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SharesFile {
    #[serde(default)]
    shares: BTreeMap<String, ShareEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShareEntry {
    mount_point: String,
    share_path: String,
    #[serde(default)]
    display_name: String,
}

/// Mapping from lookup key to share definition
///
/// Loaded once at startup and never reloaded.
#[derive(Debug, Clone, Default)]
pub struct ShareRegistry {
    shares: BTreeMap<String, ShareDefinition>,
}

impl ShareRegistry {
    /// Built-in shares used when no config file exists
    pub fn defaults() -> Self {
        let shares = [
            ("downloads", "ArrsDownloadShare"),
            ("media", "LocalMediaLibraryShare"),
            ("backups", "BackupShare"),
        ]
        .into_iter()
        .map(|(key, name)| {
            let share = ShareDefinition::new(
                key,
                format!("~/mnt/{}", name),
                format!("//{}/{}", DEFAULT_HOST, name),
                name,
            );
            (key.to_string(), share)
        })
        .collect();

        Self { shares }
    }

    /// Build a registry from a list of definitions
    pub fn from_definitions(definitions: impl IntoIterator<Item = ShareDefinition>) -> Self {
        let shares = definitions
            .into_iter()
            .map(|d| (d.key.clone(), d))
            .collect();
        Self { shares }
    }

    /// Load shares, degrading instead of failing
    ///
    /// A missing file yields the built-in defaults. An unreadable or malformed
    /// file is logged and yields an empty registry.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::error!("Failed to load shares from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load shares, returning read and parse errors to the caller
    pub fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(
                "No shares file at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::defaults());
        }

        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&content)?;
        tracing::debug!("Loaded {} share(s) from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Parse and validate the contents of a shares file
    ///
    /// Invalid entries are skipped with a warning rather than rejecting the
    /// whole file.
    pub fn from_json(content: &str) -> Result<Self> {
        let file: SharesFile = serde_json::from_str(content)?;
        let mut shares = BTreeMap::new();

        for (raw_key, entry) in file.shares {
            let key = raw_key.trim().to_lowercase();

            if shares.contains_key(&key) {
                tracing::warn!("Skipping share '{}': duplicate key '{}'", raw_key, key);
                continue;
            }

            match validate_entry(&key, entry) {
                Ok(share) => {
                    shares.insert(key, share);
                }
                Err(reason) => tracing::warn!("Skipping share '{}': {}", raw_key, reason),
            }
        }

        Ok(Self { shares })
    }

    /// Look up a share by key (case-insensitive)
    pub fn get(&self, key: &str) -> Option<&ShareDefinition> {
        self.shares.get(&key.trim().to_lowercase())
    }

    /// All share keys, sorted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.shares.keys().map(String::as_str)
    }

    /// All share definitions, sorted by key
    pub fn iter(&self) -> impl Iterator<Item = &ShareDefinition> {
        self.shares.values()
    }

    /// Comma separated key list for error messages
    pub fn available(&self) -> String {
        if self.shares.is_empty() {
            return "(none)".to_string();
        }
        self.keys().collect::<Vec<_>>().join(", ")
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

fn validate_entry(key: &str, entry: ShareEntry) -> std::result::Result<ShareDefinition, String> {
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err("key must be a single non-empty word".to_string());
    }

    let mount_point = entry.mount_point.trim();
    if mount_point.is_empty() {
        return Err("mount_point is empty".to_string());
    }

    let share_path = entry.share_path.trim();
    if !is_unc_path(share_path) {
        return Err(format!(
            "share_path '{}' is not of the form //host/share",
            share_path
        ));
    }

    let display_name = match entry.display_name.trim() {
        "" => key.to_string(),
        name => name.to_string(),
    };

    Ok(ShareDefinition::new(key, mount_point, share_path, display_name))
}

fn is_unc_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("//") else {
        return false;
    };
    match rest.split_once('/') {
        Some((host, share)) => !host.is_empty() && !share.trim_matches('/').is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SharemountError;
    use std::io::Write;

    #[test]
    fn test_defaults_have_three_shares() {
        let registry = ShareRegistry::defaults();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.available(), "backups, downloads, media");

        let media = registry.get("media").unwrap();
        assert_eq!(media.mount_point, "~/mnt/LocalMediaLibraryShare");
        assert_eq!(media.share_path, "//nas.local/LocalMediaLibraryShare");
        assert_eq!(media.display_name, "LocalMediaLibraryShare");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ShareRegistry::load(&dir.path().join("shares.json"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_malformed_file_yields_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"{ \"shares\": { \"media\": ").unwrap();

        let registry = ShareRegistry::load(&path);
        assert!(registry.is_empty());
        assert!(registry.get("media").is_none());
        assert_eq!(registry.available(), "(none)");
    }

    #[test]
    fn test_try_load_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.json");
        std::fs::write(&path, "not json").unwrap();

        let err = ShareRegistry::try_load(&path).unwrap_err();
        assert!(matches!(err, SharemountError::Json(_)));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.json");
        std::fs::write(
            &path,
            r#"{
                "shares": {
                    "media": {
                        "mount_point": "~/mnt/Media",
                        "share_path": "//host/Media",
                        "display_name": "Media"
                    }
                }
            }"#,
        )
        .unwrap();

        let registry = ShareRegistry::load(&path);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("media"),
            Some(&ShareDefinition::new(
                "media",
                "~/mnt/Media",
                "//host/Media",
                "Media"
            ))
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ShareRegistry::defaults();
        assert!(registry.get("MEDIA").is_some());
        assert!(registry.get(" Downloads ").is_some());
    }

    #[test]
    fn test_keys_are_case_folded() {
        let registry = ShareRegistry::from_json(
            r#"{"shares": {"Media": {"mount_point": "/mnt/m", "share_path": "//h/M"}}}"#,
        )
        .unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["media"]);
    }

    #[test]
    fn test_display_name_defaults_to_key() {
        let registry = ShareRegistry::from_json(
            r#"{"shares": {"music": {"mount_point": "/mnt/music", "share_path": "//h/Music"}}}"#,
        )
        .unwrap();
        assert_eq!(registry.get("music").unwrap().display_name, "music");
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let registry = ShareRegistry::from_json(
            r#"{"shares": {
                "good": {"mount_point": "/mnt/good", "share_path": "//h/Good"},
                "nopath": {"mount_point": "", "share_path": "//h/X"},
                "local": {"mount_point": "/mnt/local", "share_path": "/srv/local"},
                "noshare": {"mount_point": "/mnt/ns", "share_path": "//host"}
            }}"#,
        )
        .unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["good"]);
    }

    #[test]
    fn test_duplicate_keys_after_folding_keep_first() {
        let registry = ShareRegistry::from_json(
            r#"{"shares": {
                "MEDIA": {"mount_point": "/mnt/a", "share_path": "//h/A"},
                "media": {"mount_point": "/mnt/b", "share_path": "//h/B"}
            }}"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 1);
        // BTreeMap iterates "MEDIA" before "media"
        assert_eq!(registry.get("media").unwrap().mount_point, "/mnt/a");
    }

    #[test]
    fn test_missing_shares_key_is_empty() {
        let registry = ShareRegistry::from_json("{}").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_mount_point_expands_tilde() {
        let share = ShareDefinition::new("media", "~/mnt/Media", "//host/Media", "Media");
        let resolved = share.resolve_mount_point();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolved, home.join("mnt").join("Media"));
        }

        let share = ShareDefinition::new("abs", "/srv/mnt/abs", "//host/Abs", "Abs");
        assert_eq!(share.resolve_mount_point(), PathBuf::from("/srv/mnt/abs"));
    }

    #[test]
    fn test_is_unc_path() {
        assert!(is_unc_path("//host/Share"));
        assert!(is_unc_path("//192.168.1.10/Share/sub"));
        assert!(!is_unc_path("/host/Share"));
        assert!(!is_unc_path("//host"));
        assert!(!is_unc_path("//host/"));
        assert!(!is_unc_path("///Share"));
    }
}
