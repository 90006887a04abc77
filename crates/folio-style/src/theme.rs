#![forbid(unsafe_code)]

//! Theme mode and the adaptive color palette.
//!
//! A [`Palette`] maps semantic slots to [`AdaptiveColor`]s. Resolving it for a
//! [`ThemeMode`] flattens every slot to a fixed [`Rgb`], which the web layer
//! writes out as `--color-*` custom properties.
//!
//! # Example
//! ```
//! use folio_style::theme::{Palette, ThemeMode};
//!
//! let resolved = Palette::default().resolve(ThemeMode::Dark);
//! assert_eq!(resolved.accent.to_css_hex(), "#22d3ee");
//! ```

use crate::color::Rgb;

/// Global light/dark mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThemeMode {
    /// Dark backgrounds, light text. The startup mode.
    #[default]
    Dark,
    /// Light backgrounds, dark text.
    Light,
}

impl ThemeMode {
    /// Map a boolean dark flag.
    #[inline]
    #[must_use]
    pub const fn from_is_dark(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }

    /// Whether this is the dark mode.
    #[inline]
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// The other mode.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Class name applied to the document root.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// An adaptive color that can change based on light/dark mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveColor {
    /// A fixed color that doesn't change with mode.
    Fixed(Rgb),
    /// A color that adapts to light/dark mode.
    Adaptive {
        /// Color to use in light mode.
        light: Rgb,
        /// Color to use in dark mode.
        dark: Rgb,
    },
}

impl AdaptiveColor {
    /// Create a fixed color.
    #[inline]
    pub const fn fixed(color: Rgb) -> Self {
        Self::Fixed(color)
    }

    /// Create an adaptive color with light/dark variants.
    #[inline]
    pub const fn adaptive(light: Rgb, dark: Rgb) -> Self {
        Self::Adaptive { light, dark }
    }

    /// Resolve the color for `mode`.
    #[inline]
    pub const fn resolve(&self, mode: ThemeMode) -> Rgb {
        match self {
            Self::Fixed(c) => *c,
            Self::Adaptive { light, dark } => match mode {
                ThemeMode::Dark => *dark,
                ThemeMode::Light => *light,
            },
        }
    }

    /// Check if this color adapts to mode.
    #[inline]
    pub const fn is_adaptive(&self) -> bool {
        matches!(self, Self::Adaptive { .. })
    }
}

impl From<Rgb> for AdaptiveColor {
    fn from(color: Rgb) -> Self {
        Self::Fixed(color)
    }
}

/// Semantic color slots shared by every section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Page background.
    pub background: AdaptiveColor,
    /// Cards and panels.
    pub surface: AdaptiveColor,
    /// Card and divider borders.
    pub border: AdaptiveColor,
    /// Primary text.
    pub text: AdaptiveColor,
    /// Secondary text.
    pub text_muted: AdaptiveColor,
    /// Cyan accent: links, headings, the pointer glow.
    pub accent: AdaptiveColor,
    /// Purple gradient stop.
    pub secondary: AdaptiveColor,
    /// Pink gradient stop.
    pub highlight: AdaptiveColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: AdaptiveColor::adaptive(Rgb::from_hex(0xf9fafb), Rgb::from_hex(0x111827)),
            surface: AdaptiveColor::adaptive(Rgb::from_hex(0xffffff), Rgb::from_hex(0x1f2937)),
            border: AdaptiveColor::adaptive(Rgb::from_hex(0xe5e7eb), Rgb::from_hex(0x374151)),
            text: AdaptiveColor::adaptive(Rgb::from_hex(0x111827), Rgb::from_hex(0xffffff)),
            text_muted: AdaptiveColor::adaptive(Rgb::from_hex(0x4b5563), Rgb::from_hex(0xd1d5db)),
            accent: AdaptiveColor::adaptive(Rgb::from_hex(0x0891b2), Rgb::from_hex(0x22d3ee)),
            secondary: AdaptiveColor::adaptive(Rgb::from_hex(0x9333ea), Rgb::from_hex(0xa855f7)),
            highlight: AdaptiveColor::adaptive(Rgb::from_hex(0xdb2777), Rgb::from_hex(0xec4899)),
        }
    }
}

impl Palette {
    /// Flatten every slot for `mode`.
    #[must_use]
    pub fn resolve(&self, mode: ThemeMode) -> ResolvedPalette {
        ResolvedPalette {
            mode,
            background: self.background.resolve(mode),
            surface: self.surface.resolve(mode),
            border: self.border.resolve(mode),
            text: self.text.resolve(mode),
            text_muted: self.text_muted.resolve(mode),
            accent: self.accent.resolve(mode),
            secondary: self.secondary.resolve(mode),
            highlight: self.highlight.resolve(mode),
        }
    }
}

/// A palette with all colors resolved to fixed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedPalette {
    /// Mode this palette was resolved for.
    pub mode: ThemeMode,
    pub background: Rgb,
    pub surface: Rgb,
    pub border: Rgb,
    pub text: Rgb,
    pub text_muted: Rgb,
    pub accent: Rgb,
    pub secondary: Rgb,
    pub highlight: Rgb,
}

impl ResolvedPalette {
    /// Custom property name/value pairs, in slot order.
    #[must_use]
    pub fn css_vars(&self) -> [(&'static str, String); 8] {
        [
            ("--color-background", self.background.to_css_hex()),
            ("--color-surface", self.surface.to_css_hex()),
            ("--color-border", self.border.to_css_hex()),
            ("--color-text", self.text.to_css_hex()),
            ("--color-text-muted", self.text_muted.to_css_hex()),
            ("--color-accent", self.accent.to_css_hex()),
            ("--color-secondary", self.secondary.to_css_hex()),
            ("--color-highlight", self.highlight.to_css_hex()),
        ]
    }

    /// Inline style declarations (`--color-background: #111827; ...`).
    #[must_use]
    pub fn to_css_declarations(&self) -> String {
        self.css_vars()
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
