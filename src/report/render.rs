// src/report/render.rs
// Report PDF rendering with lopdf
//
// Content streams are left uncompressed so rendered text stays inspectable.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::path::Path;
use tracing::debug;

use super::layout::{
    BRAND, CONTENT_WIDTH, DARK, Font, GRID, LIGHT_BG, MARGIN_BOTTOM, MARGIN_SIDE, MARGIN_TOP,
    MUTED, PAGE_HEIGHT, PAGE_WIDTH, Rgb, WHITE, encode_win_ansi, text_width, wrap_text,
};
use super::types::{ReportData, Table};
use crate::error::{ChatError, Result};

pub const FOOTER_TEXT: &str = "Generated by EstateOS AI · For informational purposes only";

const TITLE_SIZE: f32 = 20.0;
const TITLE_LEADING: f32 = 24.0;
const BAND_PAD_Y: f32 = 14.0;
const BAND_PAD_X: f32 = 16.0;

const SUBTITLE_SIZE: f32 = 11.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 15.0;
const TABLE_SIZE: f32 = 9.0;
const TABLE_LEADING: f32 = 11.0;
const CELL_PAD_X: f32 = 8.0;
const CELL_PAD_Y: f32 = 6.0;
const FOOTER_SIZE: f32 = 8.0;

/// Property Details columns: 2.5in and 4.5in
const DETAIL_COLUMNS: [f32; 2] = [180.0, 324.0];

/// Render `data` to a PDF at `path`, creating the parent directory if needed
pub fn render_report(path: &Path, data: &ReportData) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ChatError::Render(e.to_string()))?;
    }

    let mut doc = build_document(data)?;
    doc.save(path)
        .map_err(|e| ChatError::Render(format!("{}: {}", path.display(), e)))?;

    debug!(path = %path.display(), "Report written");
    Ok(())
}

/// Lay out the report into an in-memory document
pub fn build_document(data: &ReportData) -> Result<Document> {
    let mut writer = PageWriter::new();

    writer.header_band(data.title_or_default());
    writer.space(7.2);
    writer.centered(data.subtitle_or_default(), Font::Regular, SUBTITLE_SIZE, MUTED);
    writer.space(16.0);
    writer.rule(LIGHT_BG, 1.0);
    writer.space(10.0);

    if let Some(summary) = data.executive_summary() {
        writer.heading("Executive Summary");
        writer.callout(summary);
    }

    if !data.property_details.is_empty() {
        writer.heading("Property Details");
        let widths = column_widths(&data.property_details, Some(&DETAIL_COLUMNS));
        writer.table(&data.property_details, &widths, true);
        writer.space(7.2);
    }

    for section in &data.sections {
        if section.heading.trim().is_empty() && section.body.trim().is_empty() {
            continue;
        }
        if !section.heading.trim().is_empty() {
            writer.heading(&section.heading);
        }
        writer.paragraph(&section.body);
    }

    if !data.key_metrics.is_empty() {
        writer.heading("Key Metrics");
        let widths = column_widths(&data.key_metrics, None);
        writer.table(&data.key_metrics, &widths, false);
        writer.space(7.2);
    }

    if let Some(conclusion) = data.conclusion() {
        writer.heading("Conclusion & Recommendations");
        writer.paragraph(conclusion);
    }

    writer.space(14.4);
    writer.rule(MUTED, 1.0);
    writer.space(4.0);
    writer.centered(FOOTER_TEXT, Font::Regular, FOOTER_SIZE, MUTED);

    writer.finish(data.title_or_default())
}

/// Two-column tables use the fixed detail widths; anything else splits the
/// content width evenly over the header's column count.
fn column_widths(table: &Table, preferred: Option<&[f32; 2]>) -> Vec<f32> {
    let columns = table.column_count().max(1);
    match preferred {
        Some(widths) if columns == widths.len() => widths.to_vec(),
        _ => vec![CONTENT_WIDTH / columns as f32; columns],
    }
}

// ============================================================================
// Page writer
// ============================================================================

/// Accumulates drawing operations page by page, tracking a top-down cursor
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    fn at_page_top(&self) -> bool {
        self.y >= PAGE_HEIGHT - MARGIN_TOP
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN_TOP;
    }

    /// Break the page if `height` does not fit above the bottom margin
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN_BOTTOM && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Lines of `leading` that fit above the bottom margin, leaving `padding`
    fn lines_that_fit(&self, leading: f32, padding: f32) -> usize {
        ((self.y - MARGIN_BOTTOM - padding) / leading).floor().max(0.0) as usize
    }

    /// How many of `remaining` lines to draw on this page. A block that
    /// would fit whole on a fresh page moves there; a taller one fills the
    /// current page and continues on the next.
    fn next_chunk(&mut self, remaining: usize, leading: f32, padding: f32) -> usize {
        let fits = self.lines_that_fit(leading, padding);
        if fits < remaining && !self.at_page_top() {
            let fresh_page = ((PAGE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM - padding) / leading)
                .floor()
                .max(1.0) as usize;
            if fits == 0 || remaining <= fresh_page {
                self.new_page();
                return remaining.min(self.lines_that_fit(leading, padding)).max(1);
            }
        }
        remaining.min(fits).max(1)
    }

    fn space(&mut self, height: f32) {
        if self.y - height < MARGIN_BOTTOM {
            self.new_page();
        } else {
            self.y -= height;
        }
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    fn fill_rect(&mut self, x: f32, bottom: f32, width: f32, height: f32, color: Rgb) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", rgb_operands(color)),
            Operation::new("re", reals(&[x, bottom, width, height])),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn stroke_rect(&mut self, x: f32, bottom: f32, width: f32, height: f32, color: Rgb, line: f32) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", rgb_operands(color)),
            Operation::new("w", reals(&[line])),
            Operation::new("re", reals(&[x, bottom, width, height])),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, line: f32) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", rgb_operands(color)),
            Operation::new("w", reals(&[line])),
            Operation::new("m", reals(&[from.0, from.1])),
            Operation::new("l", reals(&[to.0, to.1])),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn text(&mut self, x: f32, baseline: f32, font: Font, size: f32, color: Rgb, text: &str) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font.resource().as_bytes().to_vec()), Object::Real(size)],
            ),
            Operation::new("rg", rgb_operands(color)),
            Operation::new("Td", reals(&[x, baseline])),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    /// Title on a brand band. A title taller than the page continues on a
    /// new band segment.
    fn header_band(&mut self, title: &str) {
        let lines = wrap_text(title, Font::Bold, TITLE_SIZE, CONTENT_WIDTH - 2.0 * BAND_PAD_X);
        let padding = 2.0 * BAND_PAD_Y;

        let mut start = 0;
        while start < lines.len() {
            let take = self.next_chunk(lines.len() - start, TITLE_LEADING, padding);
            let height = padding + take as f32 * TITLE_LEADING;

            let top = self.y;
            self.fill_rect(MARGIN_SIDE, top - height, CONTENT_WIDTH, height, BRAND);
            for (i, line) in lines[start..start + take].iter().enumerate() {
                let baseline = top - BAND_PAD_Y - TITLE_SIZE - i as f32 * TITLE_LEADING;
                self.text(MARGIN_SIDE + BAND_PAD_X, baseline, Font::Bold, TITLE_SIZE, WHITE, line);
            }
            self.y = top - height;
            start += take;
        }
    }

    fn centered(&mut self, text: &str, font: Font, size: f32, color: Rgb) {
        let leading = size * 1.4;
        for line in wrap_text(text, font, size, CONTENT_WIDTH) {
            self.ensure_space(leading);
            let x = MARGIN_SIDE + (CONTENT_WIDTH - text_width(&line, font, size)).max(0.0) / 2.0;
            self.text(x, self.y - size, font, size, color, &line);
            self.y -= leading;
        }
    }

    fn rule(&mut self, color: Rgb, thickness: f32) {
        self.ensure_space(thickness);
        let y = self.y;
        self.line((MARGIN_SIDE, y), (MARGIN_SIDE + CONTENT_WIDTH, y), color, thickness);
        self.y -= thickness;
    }

    fn heading(&mut self, text: &str) {
        self.space(14.0);
        let leading = HEADING_SIZE * 1.3;
        let lines = wrap_text(text, Font::Bold, HEADING_SIZE, CONTENT_WIDTH);
        // keep a heading together with the first body line
        self.ensure_space(lines.len().min(3) as f32 * leading + BODY_LEADING + 6.0);
        for line in lines {
            self.ensure_space(leading);
            self.text(MARGIN_SIDE, self.y - HEADING_SIZE, Font::Bold, HEADING_SIZE, BRAND, &line);
            self.y -= leading;
        }
        self.y -= 6.0;
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, Font::Regular, BODY_SIZE, CONTENT_WIDTH) {
            self.ensure_space(BODY_LEADING);
            if !line.is_empty() {
                self.text(MARGIN_SIDE, self.y - BODY_SIZE - 2.0, Font::Regular, BODY_SIZE, DARK, &line);
            }
            self.y -= BODY_LEADING;
        }
        self.space(8.0);
    }

    /// Shaded paragraph; shading is drawn per line so it survives page breaks
    fn callout(&mut self, text: &str) {
        const PAD_X: f32 = 10.0;
        const PAD_Y: f32 = 8.0;

        self.ensure_space(PAD_Y + BODY_LEADING);
        self.fill_rect(MARGIN_SIDE, self.y - PAD_Y, CONTENT_WIDTH, PAD_Y, LIGHT_BG);
        self.y -= PAD_Y;

        for line in wrap_text(text, Font::Regular, BODY_SIZE, CONTENT_WIDTH - 2.0 * PAD_X) {
            self.ensure_space(BODY_LEADING);
            self.fill_rect(MARGIN_SIDE, self.y - BODY_LEADING, CONTENT_WIDTH, BODY_LEADING, LIGHT_BG);
            if !line.is_empty() {
                self.text(MARGIN_SIDE + PAD_X, self.y - BODY_SIZE - 2.0, Font::Regular, BODY_SIZE, DARK, &line);
            }
            self.y -= BODY_LEADING;
        }

        self.ensure_space(PAD_Y);
        self.fill_rect(MARGIN_SIDE, self.y - PAD_Y, CONTENT_WIDTH, PAD_Y, LIGHT_BG);
        self.y -= PAD_Y;
        self.space(12.0);
    }

    /// Grid table. The first row is a brand-colored header; body rows
    /// alternate white and light shading. Missing cells render blank and
    /// cells beyond the header's column count are dropped.
    fn table(&mut self, table: &Table, widths: &[f32], emphasize_first_column: bool) {
        for (row_index, row) in table.rows.iter().enumerate() {
            let is_header = row_index == 0;

            let cells: Vec<(Font, Vec<String>)> = widths
                .iter()
                .enumerate()
                .map(|(col, width)| {
                    let font = if is_header || (emphasize_first_column && col == 0) {
                        Font::Bold
                    } else {
                        Font::Regular
                    };
                    let text = row.get(col).map(|c| c.as_str()).unwrap_or("");
                    (font, wrap_text(text, font, TABLE_SIZE, width - 2.0 * CELL_PAD_X))
                })
                .collect();

            let line_count = cells.iter().map(|(_, lines)| lines.len()).max().unwrap_or(1);
            let padding = 2.0 * CELL_PAD_Y;

            // a row taller than the page is split into segments, each with its own cell boxes
            let mut start = 0;
            while start < line_count {
                let take = self.next_chunk(line_count - start, TABLE_LEADING, padding);
                let height = take as f32 * TABLE_LEADING + padding;

                let top = self.y;
                let mut x = MARGIN_SIDE;
                for (col, ((font, lines), width)) in cells.iter().zip(widths).enumerate() {
                    let background = if is_header {
                        BRAND
                    } else if emphasize_first_column && col == 0 {
                        LIGHT_BG
                    } else if row_index % 2 == 0 {
                        LIGHT_BG
                    } else {
                        WHITE
                    };
                    let color = if is_header { WHITE } else { DARK };

                    self.fill_rect(x, top - height, *width, height, background);
                    self.stroke_rect(x, top - height, *width, height, GRID, 0.5);
                    for (i, line) in lines.iter().skip(start).take(take).enumerate() {
                        if line.is_empty() {
                            continue;
                        }
                        let baseline = top - CELL_PAD_Y - TABLE_SIZE - i as f32 * TABLE_LEADING;
                        self.text(x + CELL_PAD_X, baseline, *font, TABLE_SIZE, color, line);
                    }
                    x += width;
                }
                self.y = top - height;
                start += take;
            }
        }
    }

    // ------------------------------------------------------------------
    // Assembly
    // ------------------------------------------------------------------

    fn finish(mut self, title: &str) -> Result<Document> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = add_font(&mut doc, Font::Regular);
        let bold_id = add_font(&mut doc, Font::Bold);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                Font::Regular.resource() => regular_id,
                Font::Bold.resource() => bold_id,
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let bytes = Content { operations }
                .encode()
                .map_err(|e| ChatError::Render(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH as i64),
                Object::Integer(PAGE_HEIGHT as i64),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
            "Producer" => Object::string_literal("EstateOS"),
            "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }
}

fn add_font(doc: &mut Document, font: Font) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| Object::Real(*v)).collect()
}

fn rgb_operands(Rgb(r, g, b): Rgb) -> Vec<Object> {
    reals(&[r, g, b])
}
