use std::path::PathBuf;

use crate::error::{Result, SharemountError};
use crate::share::config::ShareRegistry;

/// File name of the shares registry inside the config directory
pub const SHARES_FILE_NAME: &str = "shares.json";

/// Settings resolved from the command line and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Location of `shares.json`
    pub shares_path: PathBuf,

    /// Fail startup on a malformed shares file instead of running with no shares
    pub strict: bool,

    /// Privilege-escalation program prefixed to mount/umount ("" for none)
    pub elevate: String,
}

impl AppConfig {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("sharemount"))
            .ok_or_else(|| {
                SharemountError::Config("Could not determine config directory".to_string())
            })
    }

    pub fn default_shares_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(SHARES_FILE_NAME))
    }

    pub fn new(
        shares_path: Option<PathBuf>,
        strict: bool,
        elevate: impl Into<String>,
    ) -> Result<Self> {
        let shares_path = match shares_path {
            Some(path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref()),
            None => Self::default_shares_path()?,
        };

        Ok(Self {
            shares_path,
            strict,
            elevate: elevate.into(),
        })
    }

    /// Load the share registry according to the strictness setting
    pub fn load_registry(&self) -> Result<ShareRegistry> {
        if !self.strict {
            return Ok(ShareRegistry::load(&self.shares_path));
        }

        ShareRegistry::try_load(&self.shares_path).map_err(|e| {
            SharemountError::Config(format!(
                "Invalid shares file {}: {}",
                self.shares_path.display(),
                e
            ))
        })
    }
}
