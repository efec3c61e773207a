//! Mapper construction-time configuration (spec §6 "Configuration").
//!
//! A plain struct built once at construction, not a file-based config
//! layer — the teacher's `CdpConnectionOptions`/`BrowserLaunchOptions` do
//! the same.

use std::time::Duration;

/// How the mapper should respond to an unhandled `window.alert`/`confirm`/
/// `prompt`/`beforeunload` dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnhandledPromptBehavior {
    #[default]
    Default,
    Accept,
    Dismiss,
    Ignore,
}

/// Construction-time configuration for a [`crate::engine::MapperEngine`].
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Forwarded to `Security.setIgnoreCertificateErrors`.
    pub accept_insecure_certs: bool,
    /// How unhandled prompts are resolved automatically.
    pub unhandled_prompt_behavior: UnhandledPromptBehavior,
    /// Cap on how long a suspended command handler (navigation wait,
    /// intercept resolution) may wait before failing with `unknown error`.
    /// `None` means no timeout.
    pub idle_timeout: Option<Duration>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            accept_insecure_certs: false,
            unhandled_prompt_behavior: UnhandledPromptBehavior::default(),
            idle_timeout: None,
        }
    }
}
