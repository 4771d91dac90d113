//! Logo generation request: form options, prompt composition and
//! validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default image width sent to the generation service.
pub const DEFAULT_WIDTH: u32 = 1024;
/// Default image height sent to the generation service.
pub const DEFAULT_HEIGHT: u32 = 768;

// ---------------------------------------------------------------------------
// Option enums
// ---------------------------------------------------------------------------

/// Defines a closed set of lowercase string options with `as_str`,
/// `Display` and `FromStr`.
macro_rules! string_options {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {}: '{other}'. Valid values: {}",
                        $label,
                        [$($value),+].join(", ")
                    ))),
                }
            }
        }
    };
}

string_options!(
    /// Colour scheme offered by the generation form.
    ColorScheme, "color scheme" {
        Vibrant => "vibrant",
        Pastel => "pastel",
        Monochrome => "monochrome",
        Earthy => "earthy",
    }
);

string_options!(
    /// Target industry offered by the generation form.
    Industry, "industry" {
        Technology => "technology",
        Finance => "finance",
        Healthcare => "healthcare",
        Education => "education",
    }
);

string_options!(
    /// Visual style offered by the generation form.
    LogoStyle, "style" {
        Minimalist => "minimalist",
        Vintage => "vintage",
        Futuristic => "futuristic",
        Handdrawn => "handdrawn",
    }
);

// ---------------------------------------------------------------------------
// LogoRequest
// ---------------------------------------------------------------------------

/// A single "Generate Logos" submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoRequest {
    pub prompt: String,
    pub color: Option<ColorScheme>,
    pub industry: Option<Industry>,
    pub style: Option<LogoStyle>,
    pub width: u32,
    pub height: u32,
}

impl LogoRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            color: None,
            industry: None,
            style: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn with_color(mut self, color: ColorScheme) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    pub fn with_style(mut self, style: LogoStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Reject blank prompts and zero dimensions.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "Logo prompt must not be empty".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::Validation(format!(
                "Logo dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// The prompt text sent to the generation service. Unselected options
    /// render as empty strings.
    pub fn composed_prompt(&self) -> String {
        format!(
            "{} Color: {}, Industry: {}, Style: {}",
            self.prompt,
            self.color.map(|c| c.as_str()).unwrap_or(""),
            self.industry.map(|i| i.as_str()).unwrap_or(""),
            self.style.map(|s| s.as_str()).unwrap_or(""),
        )
    }

    /// Form-encoded body fields for `POST /api/generate-logos/`.
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("prompt", self.composed_prompt()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
        ]
    }
}
