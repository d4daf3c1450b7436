/// Theme provider: named role → ink tables.
///
/// A theme is picked once per run and only ever read afterwards.

use crossterm::style::Color;

use super::canvas::Ink;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Border,
    Text,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub primary: Ink,
    pub secondary: Ink,
    pub accent: Ink,
    pub border: Ink,
    pub text: Ink,
    pub success: Ink,
    pub warning: Ink,
    pub error: Ink,
}

const fn rgb(r: u8, g: u8, b: u8) -> Ink {
    Ink::fg(Color::Rgb { r, g, b })
}

const fn rgb_on(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> Ink {
    Ink::on(
        Color::Rgb { r: fg.0, g: fg.1, b: fg.2 },
        Color::Rgb { r: bg.0, g: bg.1, b: bg.2 },
    )
}

// ── Artistic themes (zines) ──

pub const WINTER: Theme = Theme {
    name: "winter",
    primary: rgb(220, 235, 255),
    secondary: rgb(130, 150, 180),
    accent: rgb(120, 200, 255),
    border: rgb(90, 110, 140),
    text: rgb(245, 250, 255),
    success: rgb(150, 230, 200),
    warning: rgb(240, 220, 150),
    error: rgb(240, 130, 140),
};

pub const NEBULA: Theme = Theme {
    name: "nebula",
    primary: rgb(190, 150, 255),
    secondary: rgb(120, 100, 170),
    accent: rgb(255, 120, 210),
    border: rgb(90, 70, 140),
    text: rgb(235, 225, 255),
    success: rgb(120, 240, 190),
    warning: rgb(255, 210, 120),
    error: rgb(255, 110, 130),
};

pub const MINIMAL: Theme = Theme {
    name: "minimal",
    primary: rgb(230, 230, 230),
    secondary: rgb(128, 128, 128),
    accent: rgb(255, 255, 255),
    border: rgb(170, 170, 170),
    text: rgb(200, 200, 200),
    success: rgb(160, 220, 160),
    warning: rgb(230, 200, 120),
    error: rgb(230, 120, 120),
};

pub const AMBER: Theme = Theme {
    name: "amber",
    primary: rgb(255, 176, 0),
    secondary: rgb(153, 102, 0),
    accent: rgb(255, 204, 102),
    border: rgb(204, 136, 0),
    text: rgb(255, 221, 153),
    success: rgb(255, 190, 60),
    warning: rgb(255, 150, 0),
    error: rgb(255, 100, 0),
};

// ── TTYKit themes ──

pub const GRUVBOX_LIGHT: Theme = Theme {
    name: "gruvbox_light",
    primary: rgb_on((40, 40, 40), (251, 241, 199)),
    secondary: rgb(124, 111, 100),
    accent: rgb(214, 93, 14),
    border: rgb(214, 93, 14),
    text: rgb(60, 56, 54),
    success: rgb(121, 116, 14),
    warning: rgb(181, 118, 20),
    error: rgb(157, 0, 6),
};

pub const SOLARIZED_DARK: Theme = Theme {
    name: "solarized_dark",
    primary: rgb_on((238, 232, 213), (7, 54, 66)),
    secondary: rgb(147, 161, 161),
    accent: rgb(133, 153, 0),
    border: rgb(133, 153, 0),
    text: rgb(253, 246, 227),
    success: rgb(42, 161, 152),
    warning: rgb(181, 137, 0),
    error: rgb(220, 50, 47),
};

/// Monochrome with a single inverted highlight; status is carried by text.
pub const FUNCTIONAL: Theme = Theme {
    name: "functional",
    primary: Ink::on(Color::White, Color::Black),
    secondary: Ink::fg(Color::DarkGrey),
    accent: Ink::on(Color::Black, Color::White),
    border: Ink::fg(Color::White),
    text: Ink::fg(Color::White),
    success: Ink::fg(Color::White),
    warning: Ink::fg(Color::White),
    error: Ink::fg(Color::White),
};

pub const ALL: [Theme; 7] = [
    WINTER, NEBULA, MINIMAL, AMBER, GRUVBOX_LIGHT, SOLARIZED_DARK, FUNCTIONAL,
];

impl Theme {
    pub fn role(&self, role: Role) -> Ink {
        match role {
            Role::Primary => self.primary,
            Role::Secondary => self.secondary,
            Role::Accent => self.accent,
            Role::Border => self.border,
            Role::Text => self.text,
            Role::Success => self.success,
            Role::Warning => self.warning,
            Role::Error => self.error,
        }
    }

    pub fn by_name(name: &str) -> Option<Theme> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
        ALL.iter().copied().find(|t| t.name == wanted)
    }

    /// Resolve a configured theme name, falling back to `minimal`.
    pub fn resolve(name: &str) -> Theme {
        Theme::by_name(name).unwrap_or_else(|| {
            log::warn!("unknown theme '{name}', using minimal");
            MINIMAL
        })
    }
}
