//! Content stream for the summary page.
//!
//! [`ContentStreamBuilder`] records text operators and renders them one per line.
//! [`build_content_stream`] lays out the summary: a heading anchored near the top of a letter
//! page, then every following line placed by a relative `Td` move. Nothing measures text; long
//! lines simply run off the right edge.

use crate::escape::escape_pdf_string;
use crate::fonts::StandardFont;
use crate::model::ConfigurationRecord;

/// Heading shown at the top of every summary.
pub const TITLE: &str = "Product Configuration Summary";

/// Heading above the variant list.
pub const VARIANTS_HEADING: &str = "Selected Variants:";

/// Variants listed individually before the remainder is summarized.
pub const MAX_LISTED_VARIANTS: usize = 30;

/// Absolute position of the first baseline.
const TITLE_ANCHOR: (f32, f32) = (50.0, 750.0);

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 11.0;
const SUBHEADING_SIZE: f32 = 12.0;
const LIST_SIZE: f32 = 10.0;

const AFTER_TITLE: f32 = -25.0;
const LINE_GAP: f32 = -18.0;
const SECTION_GAP: f32 = -30.0;
const LIST_GAP: f32 = -20.0;
const LIST_LINE_HEIGHT: f32 = -14.0;

/// A single content stream operator.
#[derive(Clone, Debug, PartialEq)]
pub enum TextOp {
    /// Begin text object (`BT`).
    BeginText,
    /// End text object (`ET`).
    EndText,
    /// Select font and size (`Tf`).
    SetFont(StandardFont, f32),
    /// Move to the start of the next line, offset from the current one (`Td`).
    MoveText(f32, f32),
    /// Show an unescaped string (`Tj`). Escaping happens when the operator is written.
    ShowText(String),
}

impl TextOp {
    fn write_to(&self, out: &mut String) {
        match self {
            Self::BeginText => out.push_str("BT"),
            Self::EndText => out.push_str("ET"),
            Self::SetFont(font, size) => {
                out.push('/');
                out.push_str(font.resource_name());
                out.push(' ');
                out.push_str(&format_number(*size));
                out.push_str(" Tf");
            }
            Self::MoveText(dx, dy) => {
                out.push_str(&format_number(*dx));
                out.push(' ');
                out.push_str(&format_number(*dy));
                out.push_str(" Td");
            }
            Self::ShowText(text) => {
                out.push('(');
                out.push_str(&escape_pdf_string(text));
                out.push_str(") Tj");
            }
        }
    }
}

/// Formats a number the way content streams expect: no exponent, no trailing zeros.
pub fn format_number(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.3}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned()
    }
}

/// Collects text operators and renders them as newline-separated content stream text.
#[derive(Clone, Debug, Default)]
pub struct ContentStreamBuilder {
    ops: Vec<TextOp>,
}

impl ContentStreamBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `BT`.
    pub fn begin_text(&mut self) -> &mut Self {
        self.ops.push(TextOp::BeginText);
        self
    }

    /// Appends `ET`.
    pub fn end_text(&mut self) -> &mut Self {
        self.ops.push(TextOp::EndText);
        self
    }

    /// Appends `Tf` for one of the page fonts.
    pub fn set_font(&mut self, font: StandardFont, size: f32) -> &mut Self {
        self.ops.push(TextOp::SetFont(font, size));
        self
    }

    /// Appends a relative `Td` move.
    pub fn move_text(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.ops.push(TextOp::MoveText(dx, dy));
        self
    }

    /// Appends `Tj` for `text`, which is escaped on output.
    pub fn show_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.ops.push(TextOp::ShowText(text.into()));
        self
    }

    /// Returns the recorded operators.
    pub fn ops(&self) -> &[TextOp] {
        &self.ops
    }

    /// Renders the operators, one per line, without a trailing newline.
    pub fn build(&self) -> String {
        let mut out = String::new();
        for (index, op) in self.ops.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            op.write_to(&mut out);
        }
        out
    }
}

/// Builds the summary page's content stream for `record`.
pub fn build_content_stream(record: &ConfigurationRecord) -> String {
    summary_operators(record).build()
}

/// Lays out the summary page as text operators.
pub fn summary_operators(record: &ConfigurationRecord) -> ContentStreamBuilder {
    let mut stream = ContentStreamBuilder::new();
    stream.begin_text();

    stream
        .set_font(StandardFont::Bold, TITLE_SIZE)
        .move_text(TITLE_ANCHOR.0, TITLE_ANCHOR.1)
        .show_text(TITLE);

    stream
        .move_text(0.0, AFTER_TITLE)
        .set_font(StandardFont::Regular, BODY_SIZE)
        .show_text(format!("Configuration: {}", record.name));

    stream
        .move_text(0.0, LINE_GAP)
        .show_text(format!("Timestamp: {}", record.timestamp));

    stream
        .move_text(0.0, SECTION_GAP)
        .set_font(StandardFont::Bold, SUBHEADING_SIZE)
        .show_text(VARIANTS_HEADING);

    stream
        .move_text(0.0, LIST_GAP)
        .set_font(StandardFont::Regular, LIST_SIZE);

    for line in variant_lines(&record.variants) {
        stream.show_text(line).move_text(0.0, LIST_LINE_HEIGHT);
    }

    stream
        .move_text(0.0, LIST_GAP)
        .set_font(StandardFont::Bold, BODY_SIZE)
        .show_text(format!("Environment: {}", record.environment));

    stream
        .move_text(0.0, LINE_GAP)
        .show_text(format!("Camera: {}", record.camera));

    stream.end_text();
    stream
}

/// Display lines for the variant list: at most [`MAX_LISTED_VARIANTS`] numbered entries in
/// input order, followed by an overflow line when entries were left out.
pub fn variant_lines(variants: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = variants
        .iter()
        .take(MAX_LISTED_VARIANTS)
        .enumerate()
        .map(|(index, variant)| format!("  {}. {}", index + 1, variant))
        .collect();

    if variants.len() > MAX_LISTED_VARIANTS {
        lines.push(format!(
            "  ... and {} more",
            variants.len() - MAX_LISTED_VARIANTS
        ));
    }

    lines
}
