use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Concrete colour scheme applied to the page root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"').to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Persisted user preference. `System` means "unset": follow the platform scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn explicit(self) -> Option<ThemeMode> {
        match self {
            ThemePreference::System => None,
            ThemePreference::Light => Some(ThemeMode::Light),
            ThemePreference::Dark => Some(ThemeMode::Dark),
        }
    }

    /// Resolve against the platform scheme; stays unresolved when the preference is unset
    /// and the platform scheme is not yet known.
    pub fn resolve(self, system: Option<ThemeMode>) -> ResolvedTheme {
        match self.explicit().or(system) {
            Some(mode) => ResolvedTheme::Resolved(mode),
            None => ResolvedTheme::Unresolved,
        }
    }
}

impl From<ThemeMode> for ThemePreference {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => ThemePreference::Light,
            ThemeMode::Dark => ThemePreference::Dark,
        }
    }
}

/// Theme as known at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Unresolved,
    Resolved(ThemeMode),
}

impl ResolvedTheme {
    pub fn mode(self) -> Option<ThemeMode> {
        match self {
            ResolvedTheme::Resolved(mode) => Some(mode),
            ResolvedTheme::Unresolved => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_preference_wins_over_system() {
        assert_eq!(
            ThemePreference::Light.resolve(Some(ThemeMode::Dark)),
            ResolvedTheme::Resolved(ThemeMode::Light)
        );
    }

    #[test]
    fn test_unset_preference_follows_system() {
        assert_eq!(
            ThemePreference::System.resolve(Some(ThemeMode::Dark)),
            ResolvedTheme::Resolved(ThemeMode::Dark)
        );
        assert_eq!(
            ThemePreference::System.resolve(None),
            ResolvedTheme::Unresolved
        );
    }

    #[test]
    fn test_parse_client_hint_values() {
        assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!("\"light\"".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("sepia".parse::<ThemeMode>().is_err());
    }
}
