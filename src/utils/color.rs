use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Truecolor,
    X256,
    X16,
}

/// Detect terminal color depth from environment.
/// Priority: RYCODE_COLOR override -> COLORTERM truecolor/24bit -> TERM *256color -> 16.
pub fn detect_color_depth() -> ColorDepth {
    if let Ok(force) = std::env::var("RYCODE_COLOR") {
        match force.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" | "24-bit" => return ColorDepth::Truecolor,
            "256" | "x256" | "256color" => return ColorDepth::X256,
            "16" | "ansi" | "x16" => return ColorDepth::X16,
            _ => {}
        }
    }

    if let Ok(colorterm) = std::env::var("COLORTERM") {
        let s = colorterm.to_ascii_lowercase();
        if s.contains("truecolor") || s.contains("24bit") {
            return ColorDepth::Truecolor;
        }
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.to_ascii_lowercase().contains("256color") {
            return ColorDepth::X256;
        }
    }
    ColorDepth::X16
}

/// Parse a theme color: `#rgb`, `#rrggbb`, `rgb(r,g,b)` or an ANSI color name.
pub fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<u16> = body
            .split([',', ' '])
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<u16>())
            .collect::<Result<_, _>>()
            .ok()?;
        return match parts.as_slice() {
            [r, g, b] => Some(Color::Rgb(
                (*r).min(255) as u8,
                (*g).min(255) as u8,
                (*b).min(255) as u8,
            )),
            _ => None,
        };
    }
    let named = match lower.replace('-', "_").as_str() {
        "black" => Color::Black,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" | "darkgray" => Color::DarkGray,
        "red" => Color::Red,
        "light_red" => Color::LightRed,
        "green" => Color::Green,
        "light_green" => Color::LightGreen,
        "blue" => Color::Blue,
        "light_blue" => Color::LightBlue,
        "cyan" => Color::Cyan,
        "light_cyan" => Color::LightCyan,
        "magenta" => Color::Magenta,
        "light_magenta" => Color::LightMagenta,
        "yellow" => Color::Yellow,
        "light_yellow" => Color::LightYellow,
        "reset" => Color::Reset,
        _ => return None,
    };
    Some(named)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = channel(&hex[0..1].repeat(2))?;
            let g = channel(&hex[1..2].repeat(2))?;
            let b = channel(&hex[2..3].repeat(2))?;
            Some(Color::Rgb(r, g, b))
        }
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Map a color to the nearest representable color in the chosen depth.
pub fn quantize_color(color: Color, depth: ColorDepth) -> Color {
    match (depth, color) {
        (ColorDepth::Truecolor, c) => c,
        (ColorDepth::X256, Color::Rgb(r, g, b)) => Color::Indexed(rgb_to_cube_index(r, g, b)),
        (ColorDepth::X16, Color::Rgb(r, g, b)) => nearest_ansi16(r, g, b),
        (_, other) => other,
    }
}

fn rgb_to_cube_index(r: u8, g: u8, b: u8) -> u8 {
    fn level(c: u8) -> u8 {
        match c {
            0..=47 => 0,
            48..=114 => 1,
            _ => ((c - 35) / 40).min(5),
        }
    }
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

fn nearest_ansi16(r: u8, g: u8, b: u8) -> Color {
    const ANSI16: [(u8, u8, u8, Color); 16] = [
        (0, 0, 0, Color::Black),
        (205, 0, 0, Color::Red),
        (0, 205, 0, Color::Green),
        (205, 205, 0, Color::Yellow),
        (0, 0, 205, Color::Blue),
        (205, 0, 205, Color::Magenta),
        (0, 205, 205, Color::Cyan),
        (192, 192, 192, Color::Gray),
        (128, 128, 128, Color::DarkGray),
        (255, 0, 0, Color::LightRed),
        (0, 255, 0, Color::LightGreen),
        (255, 255, 0, Color::LightYellow),
        (92, 92, 255, Color::LightBlue),
        (255, 0, 255, Color::LightMagenta),
        (0, 255, 255, Color::LightCyan),
        (255, 255, 255, Color::White),
    ];

    ANSI16
        .iter()
        .min_by_key(|(rr, gg, bb, _)| {
            let dr = *rr as i32 - r as i32;
            let dg = *gg as i32 - g as i32;
            let db = *bb as i32 - b as i32;
            dr * dr + dg * dg + db * db
        })
        .map(|entry| entry.3)
        .unwrap_or(Color::Reset)
}
