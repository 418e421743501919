//! Static font metrics and printed-page geometry for the export document.
//!
//! Glyph widths are averages in em units (relative to font size). This is an
//! intentional approximation: the print engine that finally typesets the document
//! uses real glyph shapes, but averaged widths are enough to predict line wrapping
//! and the resulting page count within a line or two.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The supported résumé fonts. Anything else falls back to Inter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Default when the selector is empty or unknown.
    #[default]
    Inter,
    OpenSans,
    Roboto,
    /// Narrowest of the set; notably tight word spacing.
    Lato,
}

impl FontFamily {
    /// Resolves the free-form `fontStyle` selector. Case and spacing are ignored.
    pub fn resolve(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "opensans" => FontFamily::OpenSans,
            "roboto" => FontFamily::Roboto,
            "lato" => FontFamily::Lato,
            _ => FontFamily::Inter,
        }
    }

    /// Family name as written in a CSS `font-family` list.
    pub fn css_name(&self) -> &'static str {
        match self {
            FontFamily::Inter => "Inter",
            FontFamily::OpenSans => "Open Sans",
            FontFamily::Roboto => "Roboto",
            FontFamily::Lato => "Lato",
        }
    }

    pub fn metrics(&self) -> &'static FontMetrics {
        match self {
            FontFamily::Inter => &INTER,
            FontFamily::OpenSans => &OPEN_SANS,
            FontFamily::Roboto => &ROBOTO,
            FontFamily::Lato => &LATO,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metric tables
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Mean advance width of a printable character, in em.
    pub average_char_width: f32,
    pub space_width: f32,
}

static INTER: FontMetrics = FontMetrics {
    average_char_width: 0.52,
    space_width: 0.28,
};

static OPEN_SANS: FontMetrics = FontMetrics {
    average_char_width: 0.51,
    space_width: 0.26,
};

static ROBOTO: FontMetrics = FontMetrics {
    average_char_width: 0.48,
    space_width: 0.25,
};

static LATO: FontMetrics = FontMetrics {
    average_char_width: 0.47,
    space_width: 0.19,
};

impl FontMetrics {
    /// Measures the rendered width of a word in em units.
    pub fn measure_word(&self, word: &str) -> f32 {
        word.chars().count() as f32 * self.average_char_width
    }

    /// Number of printed lines `text` occupies when greedily word-wrapped at `width_em`.
    ///
    /// Empty text occupies no lines. A single word wider than the line still counts
    /// as one line (the print engine overflows or hyphenates it). Saturates at
    /// `u16::MAX`.
    pub fn estimated_lines(&self, text: &str, width_em: f32) -> u16 {
        let mut lines = 0u16;
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_w = self.measure_word(word);
            if lines == 0 {
                lines = 1;
                current_width = word_w;
            } else if current_width + self.space_width + word_w > width_em {
                lines = lines.saturating_add(1);
                current_width = word_w;
            } else {
                current_width += self.space_width + word_w;
            }
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    #[default]
    A4,
    Letter,
}

impl Paper {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a4" => Some(Paper::A4),
            "letter" | "us-letter" => Some(Paper::Letter),
            _ => None,
        }
    }

    /// (width, height) in inches.
    pub fn size_in(&self) -> (f32, f32) {
        match self {
            Paper::A4 => (8.27, 11.69),
            Paper::Letter => (8.5, 11.0),
        }
    }

    /// Keyword for the CSS `@page { size: … }` rule.
    pub fn css_size(&self) -> &'static str {
        match self {
            Paper::A4 => "A4",
            Paper::Letter => "letter",
        }
    }
}

/// Physical layout of one printed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageGeometry {
    pub paper: Paper,
    /// Uniform margin on all four sides.
    pub margin_in: f32,
    pub body_font_pt: f32,
    /// Line box height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for PageGeometry {
    /// A4, half-inch margins, 9pt body at 1.4 line height.
    fn default() -> Self {
        PageGeometry {
            paper: Paper::A4,
            margin_in: 0.5,
            body_font_pt: 9.0,
            line_height: 1.4,
        }
    }
}

impl PageGeometry {
    pub fn for_paper(paper: Paper) -> Self {
        PageGeometry {
            paper,
            ..Default::default()
        }
    }

    pub fn text_width_pt(&self) -> f32 {
        let (width, _) = self.paper.size_in();
        (width - 2.0 * self.margin_in) * 72.0
    }

    pub fn usable_height_pt(&self) -> f32 {
        let (_, height) = self.paper.size_in();
        (height - 2.0 * self.margin_in) * 72.0
    }

    /// Usable text width in em units at the body font size.
    pub fn text_width_em(&self) -> f32 {
        self.text_width_pt() / self.body_font_pt
    }

    /// Body-text line slots on a single page.
    pub fn lines_per_page(&self) -> u16 {
        let line_pt = self.body_font_pt * self.line_height;
        (self.usable_height_pt() / line_pt).floor().max(1.0) as u16
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
