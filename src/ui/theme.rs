use crate::core::config::data::{ColorSpec, DecorationSpec};
use crate::ui::appearance::Appearance;
use crate::ui::builtin_themes::ThemeSpec;
use crate::utils::color::parse_color;
use ratatui::style::Color;
use tracing::warn;

/// A dark/light color pair; the terminal appearance picks one at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdaptiveColor {
    pub dark: Color,
    pub light: Color,
}

impl AdaptiveColor {
    pub const fn new(dark: Color, light: Color) -> Self {
        Self { dark, light }
    }

    pub const fn same(color: Color) -> Self {
        Self::new(color, color)
    }

    pub fn resolve(self, appearance: Appearance) -> Color {
        match appearance {
            Appearance::Dark => self.dark,
            Appearance::Light => self.light,
        }
    }

    fn from_spec(spec: &ColorSpec) -> Option<Self> {
        match spec {
            ColorSpec::Same(value) => parse_color(value).map(Self::same),
            ColorSpec::Adaptive { dark, light } => {
                Some(Self::new(parse_color(dark)?, parse_color(light)?))
            }
        }
    }
}

/// Invokes `$callback! { slot, ... }` with every palette slot name.
///
/// The palette struct and the registry's per-color accessors are both
/// generated from this one list so they can never drift apart.
macro_rules! for_each_palette_slot {
    ($callback:ident) => {
        $callback! {
            // Accents
            primary, secondary, accent,
            // Backgrounds
            background, background_panel, background_element,
            // Borders
            border_subtle, border, border_active,
            // Text
            text, text_muted,
            // Status
            error, warning, success, info,
            // Diff
            diff_added, diff_removed, diff_context, diff_hunk_header,
            diff_highlight_added, diff_highlight_removed,
            diff_added_bg, diff_removed_bg, diff_context_bg,
            diff_line_number, diff_added_line_number_bg, diff_removed_line_number_bg,
            // Markdown
            markdown_text, markdown_heading, markdown_link, markdown_link_text,
            markdown_code, markdown_block_quote, markdown_emph, markdown_strong,
            markdown_horizontal_rule, markdown_list_item, markdown_list_enumeration,
            markdown_image, markdown_image_text, markdown_code_block,
            // Syntax
            syntax_comment, syntax_keyword, syntax_function, syntax_variable,
            syntax_string, syntax_number, syntax_type, syntax_operator,
            syntax_punctuation,
        }
    };
}
pub(crate) use for_each_palette_slot;

macro_rules! define_palette {
    ($($slot:ident),+ $(,)?) => {
        /// Every named color a provider theme defines.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct Palette {
            $(pub $slot: AdaptiveColor,)+
        }

        impl Palette {
            /// Slot names in declaration order, as used in theme files.
            pub const SLOTS: &'static [&'static str] = &[$(stringify!($slot)),+];

            /// A palette with every slot set to `color`.
            pub const fn uniform(color: AdaptiveColor) -> Self {
                Self { $($slot: color,)+ }
            }

            pub fn get(&self, slot: &str) -> Option<AdaptiveColor> {
                match slot {
                    $(stringify!($slot) => Some(self.$slot),)+
                    _ => None,
                }
            }

            /// Returns false when `slot` is not a palette slot.
            pub fn set(&mut self, slot: &str, color: AdaptiveColor) -> bool {
                match slot {
                    $(stringify!($slot) => {
                        self.$slot = color;
                        true
                    })+
                    _ => false,
                }
            }
        }
    };
}

for_each_palette_slot!(define_palette);

impl Default for Palette {
    fn default() -> Self {
        Self::uniform(AdaptiveColor::same(Color::Reset))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypingAnimation {
    #[default]
    Dots,
    Gradient,
    Pulse,
    Wave,
}

impl TypingAnimation {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dots" => Some(Self::Dots),
            "gradient" => Some(Self::Gradient),
            "pulse" => Some(Self::Pulse),
            "wave" => Some(Self::Wave),
            _ => None,
        }
    }
}

/// How the "thinking" indicator looks while a provider is responding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypingIndicator {
    pub text: String,
    pub animation: TypingAnimation,
    pub use_gradient: bool,
}

/// Provider branding carried alongside the palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeDecorations {
    pub logo_ascii: String,
    pub spinner: String,
    pub welcome_message: String,
    pub typing_indicator: TypingIndicator,
}

impl ThemeDecorations {
    /// Spinner glyph for animation tick `tick`, or `None` without a spinner.
    pub fn spinner_frame(&self, tick: usize) -> Option<char> {
        let count = self.spinner.chars().count();
        if count == 0 {
            return None;
        }
        self.spinner.chars().nth(tick % count)
    }

    fn apply(&mut self, spec: &DecorationSpec) {
        if let Some(logo) = &spec.logo {
            self.logo_ascii = logo.clone();
        }
        if let Some(spinner) = &spec.spinner {
            self.spinner = spinner.clone();
        }
        if let Some(welcome) = &spec.welcome {
            self.welcome_message = welcome.clone();
        }
        if let Some(text) = &spec.typing_text {
            self.typing_indicator.text = text.clone();
        }
        if let Some(animation) = &spec.typing_animation {
            match TypingAnimation::parse(animation) {
                Some(parsed) => self.typing_indicator.animation = parsed,
                None => warn!(animation = %animation, "unknown typing animation, keeping previous"),
            }
        }
        if let Some(gradient) = spec.typing_gradient {
            self.typing_indicator.use_gradient = gradient;
        }
    }
}

/// An immutable provider theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub provider_id: String,
    pub display_name: String,
    pub palette: Palette,
    pub decorations: Option<ThemeDecorations>,
}

impl Theme {
    pub fn name(&self) -> String {
        format!("{} Theme", self.display_name)
    }

    /// Build a theme from its declarative spec.
    ///
    /// Slots absent from the spec are taken from `base`, or left as
    /// `Color::Reset` without one. Decorations are inherited only when `base`
    /// belongs to the same provider. Unknown slots and unparsable colors are
    /// logged and skipped.
    pub fn from_spec(spec: &ThemeSpec, base: Option<&Theme>) -> Self {
        let mut palette = base.map(|b| b.palette).unwrap_or_default();

        for (slot, color_spec) in &spec.palette {
            let Some(color) = AdaptiveColor::from_spec(color_spec) else {
                warn!(theme = %spec.id, slot = %slot, "unparsable color, slot left unchanged");
                continue;
            };
            if !palette.set(slot, color) {
                warn!(theme = %spec.id, slot = %slot, "unknown palette slot ignored");
            }
        }

        let inherited = base
            .filter(|b| b.provider_id.eq_ignore_ascii_case(&spec.id))
            .and_then(|b| b.decorations.clone());
        let decorations = match (&spec.decorations, inherited) {
            (Some(overlay), inherited) => {
                let mut decorations = inherited.unwrap_or_default();
                decorations.apply(overlay);
                Some(decorations)
            }
            (None, inherited) => inherited,
        };

        Theme {
            provider_id: spec.id.to_ascii_lowercase(),
            display_name: spec.display_name.clone(),
            palette,
            decorations,
        }
    }
}
