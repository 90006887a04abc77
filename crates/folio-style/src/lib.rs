#![forbid(unsafe_code)]

//! Style: colors, the adaptive light/dark palette and the process-wide
//! [`ThemeStore`].

pub mod color;
pub mod theme;
pub mod theme_store;

pub use color::{ParseColorError, Rgb};
pub use theme::{AdaptiveColor, Palette, ResolvedPalette, ThemeMode};
pub use theme_store::{SubId, ThemeStore, ThemeSubscription};
