//! Client settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::envelope::SUCCESS_CODE;
use crate::page::DEFAULT_PAGE_SIZE;

/// Configuration values controlling how envelopes are interpreted.
///
/// Values come from CLI arguments, `LOCATOR_*` environment variables, or a
/// configuration file. Unset values fall back to the backend's conventions.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOCATOR")]
pub struct ClientSettings {
    /// Status code the backend reports for a successful call.
    pub success_code: Option<i64>,
    /// Page size substituted for non-positive list request sizes.
    pub default_page_size: Option<i64>,
}

impl ClientSettings {
    /// Return the configured success sentinel, falling back to the default.
    #[must_use]
    pub fn success_code(&self) -> i64 {
        self.success_code.unwrap_or(SUCCESS_CODE)
    }

    /// Return the configured default page size, falling back to the default.
    #[must_use]
    pub fn default_page_size(&self) -> i64 {
        self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}
