//! Theme palette.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOption {
    pub name: String,
    pub color: String,
    pub light_color: String,
}

const PALETTE: [(&str, &str, &str); 10] = [
    ("Tulip", "#f43f5e", "#fff1f2"),
    ("Midnight", "#171717", "#f5f5f5"),
    ("Amber", "#f59e0b", "#fffbeb"),
    ("Emerald", "#10b981", "#ecfdf5"),
    ("Ice", "#0ea5e9", "#f0f9ff"),
    ("Lavender", "#8b5cf6", "#f5f3ff"),
    ("Sunset", "#f97316", "#fff7ed"),
    ("Turquoise", "#14b8a6", "#f0fdfa"),
    ("Sakura", "#ec4899", "#fdf2f8"),
    ("Graphite", "#52525b", "#fafafa"),
];

/// Returns the built-in palette in display order.
pub fn theme_options() -> Vec<ThemeOption> {
    PALETTE
        .iter()
        .map(|(name, color, light_color)| ThemeOption {
            name: (*name).to_string(),
            color: (*color).to_string(),
            light_color: (*light_color).to_string(),
        })
        .collect()
}

/// First palette entry, used for fresh installs.
pub fn default_theme() -> ThemeOption {
    let (name, color, light_color) = PALETTE[0];
    ThemeOption {
        name: name.to_string(),
        color: color.to_string(),
        light_color: light_color.to_string(),
    }
}

/// Picks a palette entry at random for auto-theme mode.
pub fn random_theme() -> ThemeOption {
    theme_options()
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(default_theme)
}

#[cfg(test)]
mod tests {
    use super::{default_theme, random_theme, theme_options};

    #[test]
    fn random_theme_comes_from_palette() {
        let options = theme_options();
        assert_eq!(options.len(), 10);
        assert_eq!(options[0], default_theme());
        assert!(options.contains(&random_theme()));
    }
}
