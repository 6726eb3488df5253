use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba, WithAlpha};
use std::str::FromStr;

pub struct ThemeColors {
    pub text: Srgba<f64>,
    pub arc_fallback: Srgba<f64>,
    pub handle_fill: Srgba<f64>,
    pub handle_stroke: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            text: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.1, 0.1, 0.1, 1.0),
                None,
            ),
            arc_fallback: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 1.0),
                None,
            ),
            handle_fill: Srgba::new(1.0, 1.0, 1.0, 1.0),
            handle_stroke: parse_color("#C0C0C0", 1.0).unwrap_or(Srgba::new(0.75, 0.75, 0.75, 1.0)),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

/// Parses `#rrggbb` or a CSS colour name.
pub fn parse_color(value: &str, alpha: f64) -> Option<Srgba<f64>> {
    let value = value.trim();
    let rgb = Srgb::<u8>::from_str(value)
        .ok()
        .or_else(|| palette::named::from_str(&value.to_ascii_lowercase()))?;
    Some(rgb.into_format::<f64>().with_alpha(alpha))
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.ringdial-surface {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
