//! Interchangeable document renderers.
//!
//! [`NativeBackend`] is the default and writes the document byte by byte through
//! [`crate::document`]. [`GenpdfBackend`] lays the same summary out with `genpdf` and embedded
//! TrueType fonts; it needs the font files described in [`crate::fonts`] and falls back to the
//! native encoder when they are missing, unless told not to.
//!
//! Both backends produce a single page. Every line is placed as one unwrapped line of text, so a
//! long value runs past the right margin instead of reflowing.

use std::fmt;
use std::str::FromStr;

use genpdf::elements::{Break, Text};
use genpdf::style::Style;
use genpdf::{Element as _, PaperSize, SimplePageDecorator};
use log::{debug, warn};
use thiserror::Error;

use crate::content::{variant_lines, TITLE, VARIANTS_HEADING};
use crate::document::encode_document;
use crate::error::Result;
use crate::fonts;
use crate::model::ConfigurationRecord;

/// Something that turns a configuration record into document bytes.
pub trait DocumentBackend {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Renders `record` into a complete document.
    fn render(&self, record: &ConfigurationRecord) -> Result<Vec<u8>>;
}

/// The in-process encoder. Never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeBackend;

impl DocumentBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn render(&self, record: &ConfigurationRecord) -> Result<Vec<u8>> {
        Ok(encode_document(record))
    }
}

/// Renders the summary through `genpdf`.
///
/// Lines are pushed as single-line [`Text`] elements rather than paragraphs, so genpdf never wraps
/// them. The variant list is capped the same way as the native layout, which keeps the whole
/// summary within one letter page.
#[derive(Clone, Copy, Debug)]
pub struct GenpdfBackend {
    fallback_to_native: bool,
}

impl Default for GenpdfBackend {
    fn default() -> Self {
        Self {
            fallback_to_native: true,
        }
    }
}

impl GenpdfBackend {
    /// Creates a backend that falls back to the native encoder when fonts are missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls the fallback and returns the updated backend.
    pub fn with_native_fallback(mut self, fallback_to_native: bool) -> Self {
        self.fallback_to_native = fallback_to_native;
        self
    }

    fn render_genpdf(
        &self,
        record: &ConfigurationRecord,
    ) -> std::result::Result<Vec<u8>, genpdf::error::Error> {
        let family = fonts::default_font_family()?;
        let mut document = genpdf::Document::new(family);
        document.set_title(TITLE);
        document.set_paper_size(PaperSize::Letter);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(18);
        document.set_page_decorator(decorator);

        let heading = Style::new().bold().with_font_size(16);
        let body = Style::new().with_font_size(11);
        let subheading = Style::new().bold().with_font_size(12);
        let list = Style::new().with_font_size(10);
        let emphasis = Style::new().bold().with_font_size(11);

        document.push(Text::new(TITLE).styled(heading));
        document.push(Break::new(1));
        document.push(Text::new(format!("Configuration: {}", record.name)).styled(body));
        document.push(Text::new(format!("Timestamp: {}", record.timestamp)).styled(body));
        document.push(Break::new(1));
        document.push(Text::new(VARIANTS_HEADING).styled(subheading));
        for line in variant_lines(&record.variants) {
            document.push(Text::new(line).styled(list));
        }
        document.push(Break::new(1));
        document.push(Text::new(format!("Environment: {}", record.environment)).styled(emphasis));
        document.push(Text::new(format!("Camera: {}", record.camera)).styled(emphasis));

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(bytes)
    }
}

impl DocumentBackend for GenpdfBackend {
    fn name(&self) -> &'static str {
        "genpdf"
    }

    fn render(&self, record: &ConfigurationRecord) -> Result<Vec<u8>> {
        match self.render_genpdf(record) {
            Ok(bytes) => {
                debug!("genpdf rendered {} bytes", bytes.len());
                Ok(bytes)
            }
            Err(err) if self.fallback_to_native && fonts::fonts_missing(&err) => {
                warn!("genpdf fonts unavailable ({}); using the native encoder", err);
                NativeBackend.render(record)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Selects which [`DocumentBackend`] renders documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// [`NativeBackend`].
    #[default]
    Native,
    /// [`GenpdfBackend`] with native fallback.
    Genpdf,
}

impl BackendKind {
    /// Instantiates the backend.
    pub fn create(self) -> Box<dyn DocumentBackend> {
        match self {
            Self::Native => Box::new(NativeBackend),
            Self::Genpdf => Box::new(GenpdfBackend::new()),
        }
    }

    /// Lower-case identifier accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Genpdf => "genpdf",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend name that is neither `native` nor `genpdf`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown backend '{0}', expected 'native' or 'genpdf'")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "genpdf" => Ok(Self::Genpdf),
            _ => Err(UnknownBackend(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("native".parse(), Ok(BackendKind::Native));
        assert_eq!(" GenPDF ".parse(), Ok(BackendKind::Genpdf));
        assert_eq!(
            "latex".parse::<BackendKind>(),
            Err(UnknownBackend("latex".to_owned()))
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in [BackendKind::Native, BackendKind::Genpdf] {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
    }

    #[test]
    fn native_backend_matches_encoder() {
        let record = ConfigurationRecord::new("Roadster").with_variant("Paint > Red");
        let bytes = BackendKind::Native.create().render(&record).unwrap();
        assert_eq!(bytes, encode_document(&record));
    }
}
