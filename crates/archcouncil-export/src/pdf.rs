//! PDF rendering of plain-text reports.
//!
//! Text is set in the built-in Helvetica font with WinAnsi encoding, so no font
//! data is embedded. Characters outside Latin-1 become `?`. Output is a pure
//! function of the input text.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const FONT_SIZE: f32 = 10.0;
const LEADING: f32 = 13.0;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize;
/// Usable line width in glyph units (1/1000 em).
const LINE_UNITS: u32 = ((PAGE_WIDTH - 2.0 * MARGIN) * 1000.0 / FONT_SIZE) as u32;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Render `text` to PDF bytes.
pub fn render(text: &str) -> Vec<u8> {
    let lines = layout(text);
    let pages: Vec<&[Vec<u8>]> = if lines.is_empty() {
        vec![&lines[..]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let font_id = Ref::new(3);
    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new(4 + 2 * i as i32))
        .collect();

    let mut pdf = Pdf::new();
    pdf.set_version(1, 4);
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (lines, page_id) in pages.iter().zip(&page_ids) {
        let content_id = Ref::new(page_id.get() + 1);
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(pages_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        pdf.stream(content_id, &content_stream(lines));
    }

    pdf.finish()
}

fn content_stream(lines: &[Vec<u8>]) -> Vec<u8> {
    let mut content = Content::new();
    content.begin_text();
    content.set_font(FONT_NAME, FONT_SIZE);
    content.next_line(MARGIN, PAGE_HEIGHT - MARGIN - FONT_SIZE);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.next_line(0.0, -LEADING);
        }
        content.show(Str(line));
    }
    content.end_text();
    content.finish().to_vec()
}

/// Split text into wrapped, WinAnsi-encoded output lines.
fn layout(text: &str) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    for raw in text.lines() {
        let line = encode(&raw.replace('\t', "    "));
        out.extend(wrap(&line, LINE_UNITS));
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out
}

/// Latin-1 to WinAnsi bytes. C0 controls become spaces; C1 controls and
/// anything beyond Latin-1 become `?`, since WinAnsi maps 0x80..=0x9F to
/// other glyphs.
fn encode(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| match c as u32 {
            0x00..=0x1F => b' ',
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap by glyph width; words wider than `max` are hard-split.
fn wrap(line: &[u8], max: u32) -> Vec<Vec<u8>> {
    let space = glyph_width(b' ');
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut width = 0;
    for word in line.split(|b| *b == b' ') {
        let word_width: u32 = word.iter().map(|b| glyph_width(*b)).sum();
        if !current.is_empty() && width + space + word_width > max {
            lines.push(std::mem::take(&mut current));
            width = 0;
        }
        if !current.is_empty() {
            current.push(b' ');
            width += space;
        }
        for &b in word {
            let w = glyph_width(b);
            if width + w > max && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }
            current.push(b);
            width += w;
        }
    }
    lines.push(current);
    for l in &mut lines {
        while l.last() == Some(&b' ') {
            l.pop();
        }
    }
    lines
}

/// Helvetica advance widths for printable ASCII, from the standard AFM.
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Width of one WinAnsi byte. Bytes above ASCII are measured as a full em,
/// which is never narrower than the real Helvetica glyph.
fn glyph_width(b: u8) -> u32 {
    match b {
        0x20..=0x7E => u32::from(ASCII_WIDTHS[usize::from(b - 0x20)]),
        _ => 1000,
    }
}
