use image::Rgba;

use crate::error::CanvasError;

pub const BACKGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pen,
    /// Paints with the background color.
    Eraser,
}

/// Stroke widths offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineWidth {
    Thin,
    #[default]
    Normal,
    Medium,
    Thick,
    VeryThick,
}

impl LineWidth {
    pub const ALL: [LineWidth; 5] = [
        LineWidth::Thin,
        LineWidth::Normal,
        LineWidth::Medium,
        LineWidth::Thick,
        LineWidth::VeryThick,
    ];

    pub fn pixels(self) -> u32 {
        match self {
            LineWidth::Thin => 1,
            LineWidth::Normal => 2,
            LineWidth::Medium => 4,
            LineWidth::Thick => 8,
            LineWidth::VeryThick => 16,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LineWidth::Thin => "Thin",
            LineWidth::Normal => "Normal",
            LineWidth::Medium => "Medium",
            LineWidth::Thick => "Thick",
            LineWidth::VeryThick => "Very Thick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSettings {
    pub tool: Tool,
    pub color: Rgba<u8>,
    pub line_width: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: Rgba([0, 0, 0, 0xff]),
            line_width: LineWidth::default().pixels(),
        }
    }
}

impl ToolSettings {
    /// The color a stroke is rendered with; the eraser draws over with the background.
    pub fn stroke_color(&self, background: Rgba<u8>) -> Rgba<u8> {
        match self.tool {
            Tool::Pen => self.color,
            Tool::Eraser => background,
        }
    }
}

/// Parses `#rgb` or `#rrggbb` into an opaque color.
pub fn parse_hex_color(input: &str) -> Result<Rgba<u8>, CanvasError> {
    let invalid = || CanvasError::InvalidColor(input.to_string());
    let hex = input.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                let value = channel(&digit.to_string())?;
                *slot = value * 17;
            }
            Ok(Rgba([rgb[0], rgb[1], rgb[2], 0xff]))
        }
        6 => Ok(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            0xff,
        ])),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#000000", [0, 0, 0, 255])]
    #[case("#1e90ff", [0x1e, 0x90, 0xff, 255])]
    #[case("#FFF", [255, 255, 255, 255])]
    #[case("#f80", [0xff, 0x88, 0x00, 255])]
    fn parses_hex_colors(#[case] input: &str, #[case] expected: [u8; 4]) {
        assert_eq!(parse_hex_color(input).unwrap(), Rgba(expected));
    }

    #[rstest]
    #[case("000000")]
    #[case("#12345")]
    #[case("#gggggg")]
    #[case("")]
    fn rejects_bad_colors(#[case] input: &str) {
        assert!(matches!(
            parse_hex_color(input),
            Err(CanvasError::InvalidColor(_))
        ));
    }

    #[test]
    fn eraser_strokes_with_background() {
        let settings = ToolSettings {
            tool: Tool::Eraser,
            color: Rgba([10, 20, 30, 255]),
            line_width: 4,
        };
        assert_eq!(settings.stroke_color(BACKGROUND), BACKGROUND);
    }

    #[test]
    fn defaults_match_toolbar() {
        let settings = ToolSettings::default();
        assert_eq!(settings.tool, Tool::Pen);
        assert_eq!(settings.color, Rgba([0, 0, 0, 255]));
        assert_eq!(settings.line_width, 2);
        let widths: Vec<u32> = LineWidth::ALL.iter().map(|w| w.pixels()).collect();
        assert_eq!(widths, vec![1, 2, 4, 8, 16]);
    }
}
