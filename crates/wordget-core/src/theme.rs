use std::sync::LazyLock;

use regex::Regex;
use wordget_types::{ColorSample, Theme};

static RGB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba?\((\d+),\s*(\d+),\s*(\d+)").expect("static regex is valid")
});

/// Channel spread below which a color counts as gray
const GRAYSCALE_SPREAD: i32 = 30;
/// Bucket width when grouping similar colors
const QUANTIZE_STEP: u8 = 20;

const LIGHT_DEFAULTS: [&str; 3] = ["#667eea", "#764ba2", "#48bb78"];
const DARK_DEFAULTS: [&str; 3] = ["#8b9dc3", "#9d7cb8", "#68d391"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn luminance(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    pub fn is_dark(&self) -> bool {
        self.luminance() < 0.5
    }

    pub fn is_grayscale(&self) -> bool {
        let (r, g, b) = (self.r as i32, self.g as i32, self.b as i32);
        let spread = (r - g).abs().max((g - b).abs()).max((b - r).abs());
        spread < GRAYSCALE_SPREAD
    }

    fn bucket(&self) -> (u8, u8, u8) {
        (
            self.r / QUANTIZE_STEP,
            self.g / QUANTIZE_STEP,
            self.b / QUANTIZE_STEP,
        )
    }

    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Parse the `rgb(...)`/`rgba(...)` strings returned by `getComputedStyle`
pub fn parse_color(value: &str) -> Option<Rgb> {
    let caps = RGB_PATTERN.captures(value)?;
    let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
    Some(Rgb {
        r: channel(1)?,
        g: channel(2)?,
        b: channel(3)?,
    })
}

/// Up to three most frequent non-gray colors, most frequent first
pub fn dominant_colors(colors: &[String]) -> Vec<String> {
    let mut buckets: Vec<((u8, u8, u8), Rgb, usize)> = Vec::new();

    for rgb in colors.iter().filter_map(|c| parse_color(c)) {
        if rgb.is_grayscale() {
            continue;
        }
        let key = rgb.bucket();
        match buckets.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, _, count)) => *count += 1,
            None => buckets.push((key, rgb, 1)),
        }
    }

    // stable: ties keep first-seen order
    buckets.sort_by(|a, b| b.2.cmp(&a.2));
    buckets
        .into_iter()
        .take(3)
        .map(|(_, rgb, _)| rgb.to_css())
        .collect()
}

pub fn analyze_theme(sample: &ColorSample) -> Theme {
    let is_dark = parse_color(&sample.body_bg).is_some_and(|rgb| rgb.is_dark());
    let defaults = if is_dark { DARK_DEFAULTS } else { LIGHT_DEFAULTS };

    let mut dominant = dominant_colors(&sample.colors).into_iter();
    let mut pick = |fallback: &str| dominant.next().unwrap_or_else(|| fallback.to_string());

    Theme {
        is_dark,
        primary: pick(defaults[0]),
        secondary: pick(defaults[1]),
        accent: pick(defaults[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(body_bg: &str, colors: &[&str]) -> ColorSample {
        ColorSample {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            body_bg: body_bg.to_string(),
            body_color: String::new(),
        }
    }

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(Rgb { r: 10, g: 20, b: 30 }));
        assert_eq!(
            parse_color("rgba(255,0,0, 0.5)"),
            Some(Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(parse_color("transparent"), None);
        assert_eq!(parse_color("rgb(300, 0, 0)"), None);
    }

    #[test]
    fn dark_body_without_accents_uses_dark_defaults() {
        let theme = analyze_theme(&sample("rgb(18, 18, 18)", &["rgb(40, 40, 40)"]));
        assert!(theme.is_dark);
        assert_eq!(theme.primary, "#8b9dc3");
        assert_eq!(theme.secondary, "#9d7cb8");
        assert_eq!(theme.accent, "#68d391");
    }

    #[test]
    fn most_frequent_colors_win() {
        let theme = analyze_theme(&sample(
            "rgb(255, 255, 255)",
            &[
                "rgb(200, 30, 30)",
                "rgb(20, 120, 220)",
                "rgb(22, 121, 221)",
                "rgb(240, 240, 240)",
            ],
        ));

        assert!(!theme.is_dark);
        assert_eq!(theme.primary, "rgb(20, 120, 220)");
        assert_eq!(theme.secondary, "rgb(200, 30, 30)");
        assert_eq!(theme.accent, "#48bb78");
    }
}
