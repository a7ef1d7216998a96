use colored::Color;
use once_cell::sync::Lazy;

/// Colors for each kind of text the CLI prints.
pub struct Palette {
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    /// Section headings in help and reports
    pub heading: Color,
    /// Example group titles and the usage line
    pub title: Color,
    /// Command lines and literals
    pub command: Color,
    pub dim: Color,
    pub key: Color,
    pub value: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            success: Color::BrightGreen,
            error: Color::BrightRed,
            warning: Color::TrueColor { r: 230, g: 160, b: 40 },
            info: Color::Cyan,
            heading: Color::TrueColor { r: 90, g: 160, b: 220 },
            title: Color::BrightWhite,
            command: Color::TrueColor { r: 150, g: 200, b: 120 },
            dim: Color::BrightBlack,
            key: Color::Blue,
            value: Color::White,
        }
    }
}

pub static THEME: Lazy<Palette> = Lazy::new(Palette::default);

/// Message prefixes.
pub struct Marks {
    pub ok: &'static str,
    pub fail: &'static str,
    pub warn: &'static str,
    pub note: &'static str,
    pub step: &'static str,
}

pub const MARKS: Marks = Marks {
    ok: "✔",
    fail: "✘",
    warn: "!",
    note: "•",
    step: "›",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_colors_are_distinct() {
        let theme = Palette::default();
        let colors = [theme.success, theme.error, theme.warning, theme.info];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_marks_are_distinct() {
        let marks = [MARKS.ok, MARKS.fail, MARKS.warn, MARKS.note, MARKS.step];
        for (i, a) in marks.iter().enumerate() {
            assert!(!a.is_empty());
            assert!(!marks[i + 1..].contains(a));
        }
    }
}
