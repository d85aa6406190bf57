use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::settings::Appearance;

/// Resolve the iced Theme from appearance + high_contrast settings.
pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => detect_system_dark_mode(),
    };

    let palette = match (is_dark, high_contrast) {
        (true, false) => dark_palette(),
        (false, false) => light_palette(),
        (true, true) => high_contrast_dark_palette(),
        (false, true) => high_contrast_light_palette(),
    };

    Theme::custom("FaceWatch", palette)
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x17, 0x1a, 0x21),
        text: color!(0xd4, 0xd6, 0xdb),
        primary: color!(0x4f, 0x8f, 0xe8),
        success: color!(0x27, 0xc9, 0x5f),
        warning: color!(0xf5, 0x9e, 0x0b),
        danger: color!(0xef, 0x44, 0x44),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf4, 0xf5, 0xf8),
        text: color!(0x1c, 0x1e, 0x24),
        primary: color!(0x2f, 0x6f, 0xe4),
        success: color!(0x1f, 0xa7, 0x4e),
        warning: color!(0xd9, 0x7a, 0x06),
        danger: color!(0xdc, 0x26, 0x26),
    }
}

fn high_contrast_dark_palette() -> Palette {
    Palette {
        background: color!(0x00, 0x00, 0x00),
        text: color!(0xff, 0xff, 0xff),
        primary: color!(0x6c, 0xb4, 0xff),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xd6, 0x0a),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn high_contrast_light_palette() -> Palette {
    Palette {
        background: color!(0xff, 0xff, 0xff),
        text: color!(0x00, 0x00, 0x00),
        primary: color!(0x00, 0x50, 0xd0),
        success: color!(0x24, 0x8a, 0x3d),
        warning: color!(0xb2, 0x5c, 0x00),
        danger: color!(0xd7, 0x00, 0x15),
    }
}

/// Secondary text tone for labels and hints.
pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.72,
        ..theme.palette().text
    }
}

/// Tertiary tone for de-emphasized copy.
pub fn tertiary_color(theme: &Theme) -> Color {
    Color {
        a: 0.45,
        ..theme.palette().text
    }
}

/// Card/panel background one step off the window background.
pub fn surface_color(theme: &Theme) -> Color {
    let p = theme.palette();
    let luma = p.background.r * 0.299 + p.background.g * 0.587 + p.background.b * 0.114;
    if luma > 0.5 {
        Color::WHITE
    } else {
        Color {
            r: (p.background.r + 0.05).min(1.0),
            g: (p.background.g + 0.05).min(1.0),
            b: (p.background.b + 0.05).min(1.0),
            a: 1.0,
        }
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(true)
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}
