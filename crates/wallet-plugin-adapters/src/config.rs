#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// MSafe application origins allowed to host a dapp. The first entry is
    /// the fallback when the current origin is not in the list.
    pub msafe_origins: Vec<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            msafe_origins: vec![
                "https://app.m-safe.io".to_owned(),
                "https://testnet.m-safe.io".to_owned(),
                "https://partner.m-safe.io".to_owned(),
            ],
        }
    }
}

impl AdapterConfig {
    /// Defaults with `MSAFE_ORIGINS` (comma separated) applied on top.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("MSAFE_ORIGINS") {
            let origins: Vec<String> = raw
                .split(',')
                .map(|origin| origin.trim().to_owned())
                .filter(|origin| !origin.is_empty())
                .collect();
            if !origins.is_empty() {
                config.msafe_origins = origins;
            }
        }
        config
    }
}

/// Snapshot of the hosting page, injected at adapter construction instead of
/// being read from ambient browser globals. `full_page` distinguishes a
/// top-level page from an embedded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub origin: String,
    pub href: String,
    pub full_page: bool,
}
