//! # PDF Layout
//!
//! Lays rendered notice text onto A4 pages using the PDF standard Type1
//! fonts (Helvetica, Helvetica-Bold) and builds the file with `lopdf`.
//!
//! Layout is line-based: `# ` lines are titles, `## ` lines are section
//! headings, everything else is body text wrapped at a fixed column. Runs
//! of blank lines collapse into one. Every page gets a `Page n / N` footer.
//!
//! Standard fonts only cover WinAnsi. Characters outside it are mapped to
//! their closest ASCII letter (Romanian comma-below letters, for example)
//! or replaced with `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use pform_core::CompletedSubmission;

use crate::notice::{NoticeTemplate, NoticeView};
use crate::{DocumentError, DocumentGenerator, RenderContext};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const FOOTER_Y: i64 = 32;

/// Visual style of one laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Title,
    Heading,
    Body,
}

impl Style {
    fn font(self) -> &'static str {
        match self {
            Self::Title | Self::Heading => "F2",
            Self::Body => "F1",
        }
    }

    fn size(self) -> i64 {
        match self {
            Self::Title => 18,
            Self::Heading => 13,
            Self::Body => 11,
        }
    }

    /// Vertical space consumed by the line.
    fn leading(self) -> i64 {
        match self {
            Self::Title => 28,
            Self::Heading => 22,
            Self::Body => 15,
        }
    }

    /// Characters per line before wrapping.
    fn columns(self) -> usize {
        match self {
            Self::Title => 48,
            Self::Heading => 66,
            Self::Body => 88,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    style: Style,
    text: String,
}

/// Split notice text into styled, wrapped lines.
fn layout_lines(text: &str) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    for raw in text.lines() {
        let raw = raw.trim_end();
        let (style, content) = if let Some(rest) = raw.strip_prefix("# ") {
            (Style::Title, rest)
        } else if let Some(rest) = raw.strip_prefix("## ") {
            (Style::Heading, rest)
        } else {
            (Style::Body, raw)
        };

        if content.trim().is_empty() {
            let previous_blank = lines.last().map_or(true, |l| l.text.is_empty());
            if !previous_blank {
                lines.push(Line {
                    style: Style::Body,
                    text: String::new(),
                });
            }
            continue;
        }

        for chunk in wrap(content, style.columns()) {
            lines.push(Line { style, text: chunk });
        }
    }
    while lines.last().is_some_and(|l| l.text.is_empty()) {
        lines.pop();
    }
    lines
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let indent: String = text.chars().take_while(|c| *c == ' ').collect();
    let mut out = Vec::new();
    let mut current = indent.clone();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.trim().is_empty() {
                out.push(std::mem::replace(&mut current, indent.clone()));
            }
            let rest = word.split_off(width);
            out.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = word.chars().count() + usize::from(!current.trim().is_empty());
        if current.chars().count() + needed > width && !current.trim().is_empty() {
            out.push(std::mem::replace(&mut current, indent.clone()));
        }
        if !current.trim().is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

/// Group lines into pages by available vertical space.
fn paginate(lines: Vec<Line>) -> Vec<Vec<Line>> {
    let usable = PAGE_HEIGHT - 2 * MARGIN;
    let mut pages = vec![Vec::new()];
    let mut used = 0;
    for line in lines {
        let leading = line.style.leading();
        if used + leading > usable {
            // Never start a page with a blank line.
            if line.text.is_empty() {
                continue;
            }
            pages.push(Vec::new());
            used = 0;
        }
        used += leading;
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }
    pages
}

/// Encode text for a WinAnsiEncoding font.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u8,
            'ă' | 'ā' => b'a',
            'Ă' | 'Ā' => b'A',
            'ș' | 'ş' => b's',
            'Ș' | 'Ş' => b'S',
            'ț' | 'ţ' => b't',
            'Ț' | 'Ţ' => b'T',
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' | '„' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            'Š' => 0x8a,
            'š' => 0x9a,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

fn text_operations(ops: &mut Vec<Operation>, style: Style, x: i64, y: i64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(style.font().as_bytes().to_vec()), style.size().into()],
    ));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
    ops.push(Operation::new("ET", vec![]));
}

fn page_content(lines: &[Line], page_number: usize, page_count: usize) -> Content {
    let mut operations = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;
    for line in lines {
        y -= line.style.leading();
        if !line.text.is_empty() {
            text_operations(&mut operations, line.style, MARGIN, y, &line.text);
        }
    }
    let footer = format!("Page {page_number} / {page_count}");
    text_operations(
        &mut operations,
        Style::Body,
        PAGE_WIDTH - MARGIN - 60,
        FOOTER_Y,
        &footer,
    );
    Content { operations }
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Build a PDF from notice text.
pub fn encode_pdf(text: &str, title: &str) -> Result<Vec<u8>, DocumentError> {
    let pages = paginate(layout_lines(text));
    let page_count = pages.len();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for (index, lines) in pages.iter().enumerate() {
        let content = page_content(lines, index + 1, page_count);
        let encoded = content
            .encode()
            .map_err(|e| DocumentError::Encoding(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(title)),
        "Producer" => Object::string_literal("pform-document"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| DocumentError::Encoding(e.to_string()))?;
    Ok(bytes)
}

/// [`DocumentGenerator`] producing PDF penalty notices.
#[derive(Debug)]
pub struct PdfGenerator {
    template: NoticeTemplate,
}

impl PdfGenerator {
    /// Generator using the embedded notice template.
    pub fn new() -> Result<Self, DocumentError> {
        Ok(Self {
            template: NoticeTemplate::new()?,
        })
    }

    /// Generator using a caller-supplied template.
    pub fn with_template(template: NoticeTemplate) -> Self {
        Self { template }
    }
}

impl DocumentGenerator for PdfGenerator {
    fn generate(
        &self,
        submission: &CompletedSubmission,
        context: &RenderContext,
    ) -> Result<Vec<u8>, DocumentError> {
        let view = NoticeView::new(submission, context);
        let text = self.template.render(&view)?;
        let title = format!("Penalty notice {}", submission.breach_code());
        let bytes = encode_pdf(&text, &title)?;
        tracing::debug!(
            reference = %context.reference,
            breach = submission.breach_code(),
            size = bytes.len(),
            "generated penalty notice"
        );
        Ok(bytes)
    }
}
