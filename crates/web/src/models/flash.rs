//! One-shot notices shown on the next rendered page.

use serde::{Deserialize, Serialize};

/// Severity of a flash notice; drives its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashLevel {
    /// CSS modifier class used by the templates.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice--success",
            Self::Info => "notice--info",
            Self::Warning => "notice--warning",
            Self::Danger => "notice--danger",
        }
    }
}

/// A queued notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// CSS class for this notice (convenience for templates).
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_serializes_level_lowercase() {
        let flash = Flash::new(FlashLevel::Warning, "Log in first.");
        let json = serde_json::to_string(&flash).unwrap();
        assert_eq!(json, r#"{"level":"warning","message":"Log in first."}"#);
    }

    #[test]
    fn test_css_class() {
        assert_eq!(
            Flash::new(FlashLevel::Danger, "x").css_class(),
            "notice--danger"
        );
    }
}
