use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;

use crate::config::ConfigError;

/// Named gradient used to shade the surface from flat to deeply curved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    #[default]
    Default,
    Cool,
    Warm,
    Neon,
    Cosmic,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Default,
        ColorScheme::Cool,
        ColorScheme::Warm,
        ColorScheme::Neon,
        ColorScheme::Cosmic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Cool => "cool",
            Self::Warm => "warm",
            Self::Neon => "neon",
            Self::Cosmic => "cosmic",
        }
    }

    /// Flat-space color followed by the deep-well color.
    pub fn colors(self) -> (Srgba, Srgba) {
        match self {
            Self::Default => (Srgba::rgb_u8(0x4f, 0xc3, 0xf7), Srgba::rgb_u8(0x9c, 0x27, 0xb0)),
            Self::Cool => (Srgba::rgb_u8(0x00, 0xbc, 0xd4), Srgba::rgb_u8(0x3f, 0x51, 0xb5)),
            Self::Warm => (Srgba::rgb_u8(0xff, 0x98, 0x00), Srgba::rgb_u8(0xf4, 0x43, 0x36)),
            Self::Neon => (Srgba::rgb_u8(0x00, 0xff, 0x88), Srgba::rgb_u8(0xff, 0x00, 0x80)),
            Self::Cosmic => (Srgba::rgb_u8(0x9c, 0x27, 0xb0), Srgba::rgb_u8(0x67, 0x3a, 0xb7)),
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownColorScheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_scheme_name() {
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.name().parse::<ColorScheme>(), Ok(scheme));
        }
        assert_eq!(" Neon ".parse::<ColorScheme>(), Ok(ColorScheme::Neon));
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert_eq!(
            "sepia".parse::<ColorScheme>(),
            Err(ConfigError::UnknownColorScheme("sepia".to_string()))
        );
    }

    #[test]
    fn cycling_visits_all_schemes() {
        let mut scheme = ColorScheme::Default;
        for _ in 0..ColorScheme::ALL.len() {
            scheme = scheme.next();
        }
        assert_eq!(scheme, ColorScheme::Default);
    }
}
