/// Terminal appearance; picks the dark or light half of every adaptive color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    Light,
    #[default]
    Dark,
}

impl Appearance {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Appearance::Dark),
            "light" => Some(Appearance::Light),
            _ => None,
        }
    }

    /// Best-effort detection, falling back to dark.
    pub fn detect() -> Self {
        detect_preferred_appearance().unwrap_or_default()
    }
}

/// Detect the preferred appearance. `RYCODE_APPEARANCE` wins, then the
/// terminal's `COLORFGBG` hint, then the OS-level app theme preference.
pub fn detect_preferred_appearance() -> Option<Appearance> {
    if let Some(appearance) = std::env::var("RYCODE_APPEARANCE")
        .ok()
        .and_then(|v| Appearance::parse(&v))
    {
        return Some(appearance);
    }
    if let Some(appearance) = std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| appearance_from_colorfgbg(&v))
    {
        return Some(appearance);
    }
    detect_via_os_hint()
}

/// `COLORFGBG` is "fg;bg" (sometimes "fg;default;bg"); ANSI backgrounds 0-6
/// and 8 are dark.
fn appearance_from_colorfgbg(value: &str) -> Option<Appearance> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(match bg {
        0..=6 | 8 => Appearance::Dark,
        _ => Appearance::Light,
    })
}

/// Detect OS-level app theme preference (best-effort, with conservative fallbacks)
fn detect_via_os_hint() -> Option<Appearance> {
    #[cfg(target_os = "macos")]
    {
        use std::process::Command;
        // `defaults read -g AppleInterfaceStyle` returns "Dark" when dark mode is on.
        if let Ok(output) = Command::new("/usr/bin/defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
        {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if stdout.to_ascii_lowercase().contains("dark") {
                    return Some(Appearance::Dark);
                }
            }
        }
        // The key is missing in light mode.
        return Some(Appearance::Light);
    }

    #[cfg(target_os = "windows")]
    {
        // HKCU\...\Personalize\AppsUseLightTheme: 1 = light, 0 = dark
        use winreg::enums::HKEY_CURRENT_USER;
        use winreg::RegKey;
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        if let Ok(personalize) =
            hkcu.open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        {
            let value: Result<u32, _> = personalize.get_value("AppsUseLightTheme");
            if let Ok(v) = value {
                return Some(if v == 0 {
                    Appearance::Dark
                } else {
                    Appearance::Light
                });
            }
        }
        return None;
    }

    #[cfg(target_os = "linux")]
    {
        use std::process::Command;
        // GNOME 42+: color-scheme is 'prefer-dark' or 'default'
        if let Ok(output) = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "color-scheme"])
            .output()
        {
            if output.status.success() {
                let s = String::from_utf8_lossy(&output.stdout).to_ascii_lowercase();
                if s.contains("prefer-dark") {
                    return Some(Appearance::Dark);
                } else if s.contains("default") || s.contains("prefer-light") {
                    return Some(Appearance::Light);
                }
            }
        }
        None
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_names() {
        assert_eq!(Appearance::parse(" Light "), Some(Appearance::Light));
        assert_eq!(Appearance::parse("DARK"), Some(Appearance::Dark));
        assert_eq!(Appearance::parse("sepia"), None);
    }

    #[test]
    fn colorfgbg_background_decides() {
        assert_eq!(appearance_from_colorfgbg("15;0"), Some(Appearance::Dark));
        assert_eq!(appearance_from_colorfgbg("0;15"), Some(Appearance::Light));
        assert_eq!(appearance_from_colorfgbg("7;default;8"), Some(Appearance::Dark));
        assert_eq!(appearance_from_colorfgbg("garbage"), None);
    }
}
