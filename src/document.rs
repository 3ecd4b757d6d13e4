//! Assembly of the single-page document.
//!
//! The layout never changes: a header, four indirect objects (catalog, page tree, page,
//! content stream), a cross-reference table and a trailer. Objects are appended to one growing
//! buffer and each object's starting offset is recorded right before it is written, so the
//! cross-reference table always describes the bytes that were actually produced.

use log::{debug, warn};

use crate::content::build_content_stream;
use crate::encoding::encode_winansi;
use crate::fonts::StandardFont;
use crate::model::ConfigurationRecord;

/// Header line naming the format version.
pub const HEADER: &str = "%PDF-1.4";

/// Comment following the header with bytes above 127, marking the file as binary.
const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";

/// Object number of the catalog.
pub const CATALOG_ID: u32 = 1;
/// Object number of the page tree.
pub const PAGES_ID: u32 = 2;
/// Object number of the only page.
pub const PAGE_ID: u32 = 3;
/// Object number of the content stream.
pub const CONTENT_ID: u32 = 4;

/// Entries in the cross-reference table, including the free head entry.
pub const XREF_SIZE: u32 = 5;

/// US Letter in points.
pub const MEDIA_BOX: [u32; 4] = [0, 0, 612, 792];

/// A finished document together with the positions recorded while writing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedDocument {
    /// The complete file.
    pub bytes: Vec<u8>,
    /// Byte offset of objects `1..=4`, in object-number order.
    pub object_offsets: Vec<usize>,
    /// Byte offset of the `xref` keyword.
    pub xref_offset: usize,
    /// Value written to the content stream's `/Length`.
    pub stream_length: usize,
    /// Characters that had no WinAnsi byte and were written as `?`.
    pub replaced_chars: usize,
}

/// Appends objects to a buffer while tracking where each one starts.
struct ObjectWriter {
    output: Vec<u8>,
    offsets: Vec<usize>,
    replaced: usize,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut writer = Self {
            output: Vec::new(),
            offsets: Vec::new(),
            replaced: 0,
        };
        writer.write_line(HEADER);
        writer.output.extend_from_slice(BINARY_MARKER);
        writer
    }

    fn write_text(&mut self, text: &str) {
        let encoded = encode_winansi(text);
        self.replaced += encoded.replaced;
        self.output.extend_from_slice(&encoded.bytes);
    }

    fn write_line(&mut self, line: &str) {
        self.write_text(line);
        self.output.push(b'\n');
    }

    fn begin_object(&mut self, id: u32) {
        debug_assert_eq!(
            id as usize,
            self.offsets.len() + 1,
            "objects must be written in number order"
        );
        self.offsets.push(self.output.len());
        self.write_line(&format!("{} 0 obj", id));
    }

    fn end_object(&mut self) {
        self.write_line("endobj");
    }

    fn write_object(&mut self, id: u32, body: &str) {
        self.begin_object(id);
        self.write_line(body);
        self.end_object();
    }

    /// Writes a stream object; `/Length` is the exact size of `payload`.
    fn write_stream_object(&mut self, id: u32, payload: &[u8]) {
        self.begin_object(id);
        self.write_line(&format!("<< /Length {} >>", payload.len()));
        self.write_line("stream");
        self.output.extend_from_slice(payload);
        self.output.push(b'\n');
        self.write_line("endstream");
        self.end_object();
    }

    /// Writes the cross-reference table and trailer and returns the offset of `xref`.
    fn write_xref_and_trailer(&mut self, root: u32) -> usize {
        let xref_offset = self.output.len();
        self.write_line("xref");
        self.write_line(&format!("0 {}", self.offsets.len() + 1));
        // Entries are exactly 20 bytes: the two-character line end is a space plus LF.
        self.write_line("0000000000 65535 f ");
        let entries: Vec<String> = self
            .offsets
            .iter()
            .map(|offset| format!("{:010} 00000 n ", offset))
            .collect();
        for entry in &entries {
            self.write_line(entry);
        }

        self.write_line("trailer");
        self.write_line(&format!(
            "<< /Size {} /Root {} 0 R >>",
            self.offsets.len() + 1,
            root
        ));
        self.write_line("startxref");
        self.write_line(&xref_offset.to_string());
        self.write_line("%%EOF");
        xref_offset
    }
}

fn page_dictionary() -> String {
    let fonts = StandardFont::ALL
        .iter()
        .map(|font| format!("/{} {}", font.resource_name(), font.dictionary()))
        .collect::<Vec<_>>()
        .join("\n");
    let [x0, y0, x1, y1] = MEDIA_BOX;

    format!(
        "<<\n/Type /Page\n/Parent {PAGES_ID} 0 R\n/MediaBox [{x0} {y0} {x1} {y1}]\n\
         /Contents {CONTENT_ID} 0 R\n/Resources <<\n/Font <<\n{fonts}\n>>\n>>\n>>"
    )
}

/// Wraps `content` in the fixed object graph and returns the finished document.
pub fn assemble_document(content: &str) -> EncodedDocument {
    let payload = encode_winansi(content);
    let mut writer = ObjectWriter::new();

    writer.write_object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
    );
    writer.write_object(
        PAGES_ID,
        &format!("<< /Type /Pages /Kids [{} 0 R] /Count 1 >>", PAGE_ID),
    );
    writer.write_object(PAGE_ID, &page_dictionary());
    writer.write_stream_object(CONTENT_ID, &payload.bytes);
    writer.replaced += payload.replaced;

    let xref_offset = writer.write_xref_and_trailer(CATALOG_ID);
    debug_assert_eq!(writer.offsets.len() + 1, XREF_SIZE as usize);

    debug!(
        "assembled document: {} bytes, stream length {}, object offsets {:?}, xref at {}",
        writer.output.len(),
        payload.bytes.len(),
        writer.offsets,
        xref_offset
    );
    if writer.replaced > 0 {
        warn!(
            "{} character(s) have no WinAnsi equivalent and were written as '?'",
            writer.replaced
        );
    }

    EncodedDocument {
        bytes: writer.output,
        object_offsets: writer.offsets,
        xref_offset,
        stream_length: payload.bytes.len(),
        replaced_chars: writer.replaced,
    }
}

/// Renders `record` into the bytes of a one-page document.
pub fn encode_document(record: &ConfigurationRecord) -> Vec<u8> {
    assemble_document(&build_content_stream(record)).bytes
}
