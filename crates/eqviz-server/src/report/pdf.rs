//! Minimal PDF 1.4 writer for dataset reports
//!
//! Pages are US letter with the standard Helvetica fonts, so the output needs
//! no embedded font data. Coordinates are PDF points from the bottom left.

use std::fmt::Write as _;
use std::io::Write;

use super::{ReportError, ReportInput, ReportRenderer};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const BOTTOM_MARGIN: f32 = 50.0;

const NAME_X: f32 = 100.0;
const TYPE_X: f32 = 300.0;
const FLOWRATE_X: f32 = 450.0;
const ROW_HEIGHT: f32 = 15.0;

/// Longest cell text before it would run into the next column
const MAX_CELL_CHARS: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Escape text for a PDF literal string in WinAnsi encoding
fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            },
            ' '..='~' => out.push(ch),
            '\u{A0}'..='\u{FF}' => {
                let _ = write!(out, "\\{:03o}", ch as u32);
            },
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

fn fit(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

/// Content streams of a document, one per page
struct Canvas {
    pages: Vec<String>,
    current: String,
}

impl Canvas {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
        }
    }

    fn text(&mut self, font: Font, size: u8, x: f32, y: f32, text: &str) {
        let _ = writeln!(
            self.current,
            "BT /{} {} Tf {:.2} {:.2} Td {} Tj ET",
            font.resource(),
            size,
            x,
            y,
            pdf_string(text)
        );
    }

    fn show_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        self.pages
    }
}

/// Serialize page content streams into a complete PDF file
fn write_document(pages: &[String]) -> Result<Vec<u8>, ReportError> {
    // 1 catalog, 2 page tree, 3-4 fonts, then a page and content object per page
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + 2 * i).collect();

    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + 2 * pages.len());
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).into_bytes());

    for base in ["Helvetica", "Helvetica-Bold"] {
        objects.push(
            format!("<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>", base)
                .into_bytes(),
        );
    }

    for (content, page_id) in pages.iter().zip(&page_ids) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH,
                PAGE_HEIGHT,
                page_id + 1
            )
            .into_bytes(),
        );

        let mut stream = Vec::with_capacity(content.len() + 64);
        write!(stream, "<< /Length {} >>\nstream\n", content.len())?;
        stream.extend_from_slice(content.as_bytes());
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        write!(out, "{} 0 obj\n", index + 1)?;
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1)?;
    for offset in &offsets {
        write!(out, "{:010} 00000 n \n", offset)?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    )?;

    Ok(out)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer;

impl PdfReportRenderer {
    pub fn new() -> Self {
        Self
    }

    fn layout(input: &ReportInput<'_>) -> Vec<String> {
        let mut canvas = Canvas::new();
        let top = PAGE_HEIGHT - 50.0;

        canvas.text(
            Font::Bold,
            16,
            NAME_X,
            top,
            &format!("Analysis Report: {}", input.dataset.file_name),
        );
        canvas.text(
            Font::Regular,
            12,
            NAME_X,
            PAGE_HEIGHT - 80.0,
            &format!(
                "Uploaded At: {}",
                input.dataset.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        );

        let mut y = PAGE_HEIGHT - 120.0;
        canvas.text(
            Font::Regular,
            12,
            NAME_X,
            y,
            &format!("Total Equipment Count: {}", input.total_count),
        );

        y -= 60.0;
        canvas.text(Font::Bold, 12, NAME_X, y, "Equipment Name");
        canvas.text(Font::Bold, 12, TYPE_X, y, "Type");
        canvas.text(Font::Bold, 12, FLOWRATE_X, y, "Flowrate");

        y -= 20.0;
        for record in input.records {
            if y < BOTTOM_MARGIN {
                canvas.show_page();
                y = top;
            }
            canvas.text(Font::Regular, 10, NAME_X, y, &fit(&record.equipment_name));
            canvas.text(Font::Regular, 10, TYPE_X, y, &fit(&record.equipment_type));
            canvas.text(Font::Regular, 10, FLOWRATE_X, y, &format!("{:?}", record.flowrate));
            y -= ROW_HEIGHT;
        }

        canvas.finish()
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError> {
        write_document(&Self::layout(input))
    }
}
