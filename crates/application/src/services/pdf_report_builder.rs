//! PDF report rendering
//!
//! Lays a title, a body and a source line out on US Letter pages and writes
//! the result with lopdf. The body is truncated to a hard character cap,
//! word-wrapped to a fixed width and paginated top to bottom.

use domain::ReportDocument;
use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::{config::PipelineConfig, error::ApplicationError};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const LEFT_MARGIN: f32 = 50.0;
const TOP_Y: f32 = 750.0;
const BOTTOM_MARGIN: f32 = 50.0;

const TITLE_FONT_SIZE: f32 = 14.0;
const TITLE_GAP: f32 = 40.0;
/// Advance between wrapped title lines
const TITLE_LINE_HEIGHT: f32 = 18.0;
const BODY_FONT_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 14.0;
/// Extra space between the last body line and the source line
const SOURCE_GAP: f32 = 14.0;

const FONT_NAME: &str = "F1";

/// Turns a title, a body and a source reference into a report document
#[cfg_attr(test, automock)]
pub trait ReportRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ApplicationError::Rendering`] if the document cannot be written.
    fn build_report(
        &self,
        title: &str,
        body: &str,
        source_ref: &str,
    ) -> Result<ReportDocument, ApplicationError>;
}

/// Builds paginated PDF reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfReportBuilder {
    max_body_chars: usize,
    wrap_width: usize,
}

impl Default for PdfReportBuilder {
    fn default() -> Self {
        Self::new(900, 90)
    }
}

impl PdfReportBuilder {
    /// `wrap_width` is clamped to at least one character
    pub fn new(max_body_chars: usize, wrap_width: usize) -> Self {
        Self {
            max_body_chars,
            wrap_width: wrap_width.max(1),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.max_body_chars, config.wrap_width)
    }

    /// Body lines exactly as they will be laid out
    pub fn layout_body(&self, body: &str) -> Vec<String> {
        wrap_text(truncate_chars(body, self.max_body_chars), self.wrap_width)
    }

    /// Render a report
    ///
    /// The title and the trailing `Source: <source_ref>` line are wrapped at
    /// the same width as the body. The source line may break inside a word.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Rendering`] if the PDF cannot be serialized.
    pub fn build_report(
        &self,
        title: &str,
        body: &str,
        source_ref: &str,
    ) -> Result<ReportDocument, ApplicationError> {
        let body_lines = self.layout_body(body);

        let title_lines = wrap_text(title.trim(), self.wrap_width);
        let source_lines = wrap_hard(&format!("Source: {source_ref}"), self.wrap_width);

        let mut layout = PageLayout::new();
        match title_lines.split_last() {
            Some((last, leading)) => {
                for line in leading {
                    layout.write_line(line, TITLE_FONT_SIZE, TITLE_LINE_HEIGHT);
                }
                layout.write_line(last, TITLE_FONT_SIZE, TITLE_GAP);
            },
            None => layout.write_line("", TITLE_FONT_SIZE, TITLE_GAP),
        }
        for line in &body_lines {
            layout.write_line(line, BODY_FONT_SIZE, LINE_HEIGHT);
        }
        layout.skip(SOURCE_GAP);
        for line in &source_lines {
            layout.write_line(line, BODY_FONT_SIZE, LINE_HEIGHT);
        }
        let pages = layout.finalize();

        let bytes = render_pdf(&pages)?;
        debug!(
            body_lines = body_lines.len(),
            pages = pages.len(),
            size_bytes = bytes.len(),
            "Rendered report"
        );

        Ok(ReportDocument::new(
            bytes,
            ReportDocument::filename_for(title),
            pages.len(),
        ))
    }
}

impl ReportRenderer for PdfReportBuilder {
    fn build_report(
        &self,
        title: &str,
        body: &str,
        source_ref: &str,
    ) -> Result<ReportDocument, ApplicationError> {
        Self::build_report(self, title, body, source_ref)
    }
}

/// Cut `text` after at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Word-wrap `text` into lines of at most `width` characters
///
/// Words are never split. A word longer than `width` gets a line of its own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Like [`wrap_text`], but words longer than `width` are cut into chunks
pub fn wrap_hard(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for line in wrap_text(text, width) {
        if line.chars().count() <= width {
            lines.push(line);
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        lines.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    lines
}

#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    text: String,
    font_size: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PageState {
    WritingPage { cursor_y: f32 },
    PageFull,
}

/// Vertical layout across pages
#[derive(Debug)]
struct PageLayout {
    pages: Vec<Vec<PlacedLine>>,
    current: Vec<PlacedLine>,
    state: PageState,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            state: PageState::WritingPage { cursor_y: TOP_Y },
        }
    }

    /// Place a line at the cursor, then move the cursor down by `advance`
    fn write_line(&mut self, text: &str, font_size: f32, advance: f32) {
        let y = match self.state {
            PageState::WritingPage { cursor_y } => cursor_y,
            PageState::PageFull => self.new_page(),
        };
        self.current.push(PlacedLine {
            text: text.to_string(),
            font_size,
            y,
        });
        self.advance_to(y - advance);
    }

    fn skip(&mut self, gap: f32) {
        if let PageState::WritingPage { cursor_y } = self.state {
            self.advance_to(cursor_y - gap);
        }
    }

    fn advance_to(&mut self, cursor_y: f32) {
        self.state = if cursor_y < BOTTOM_MARGIN {
            PageState::PageFull
        } else {
            PageState::WritingPage { cursor_y }
        };
    }

    fn new_page(&mut self) -> f32 {
        self.pages.push(std::mem::take(&mut self.current));
        self.state = PageState::WritingPage { cursor_y: TOP_Y };
        TOP_Y
    }

    fn finalize(mut self) -> Vec<Vec<PlacedLine>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn render_pdf(pages: &[Vec<PlacedLine>]) -> Result<Vec<u8>, ApplicationError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let mut operations = Vec::with_capacity(lines.len() * 5);
        for line in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![FONT_NAME.into(), line.font_size.into()],
            ));
            operations.push(Operation::new("Td", vec![LEFT_MARGIN.into(), line.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(&line.text))],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { FONT_NAME => font_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len())
        .map_err(|_| ApplicationError::Rendering("too many pages".to_string()))?;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ApplicationError::Rendering(e.to_string()))?;
    Ok(bytes)
}

/// Map text onto WinAnsi bytes for the standard Helvetica font
///
/// Printable ASCII and Latin-1 map directly, typographic punctuation and the
/// euro sign go to their 0x80..0x9F slots, anything else becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => match u8::try_from(u32::from(c)) {
            Ok(b) if (0x20..0x7f).contains(&b) || b >= 0xa0 => b,
            _ => b'?',
        },
    }
}
