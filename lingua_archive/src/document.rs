//! Transcript layout and PDF rendering.
//!
//! Pages are A4 with a monospaced standard font, so wrapping can be done by
//! character count and no font files are needed.

use lingua_core::Turn;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

pub const PAGE_WIDTH: i64 = 595;
pub const PAGE_HEIGHT: i64 = 842;
pub const MARGIN: i64 = 50;
pub const FONT_SIZE: i64 = 10;
pub const LINE_HEIGHT: i64 = 14;

/// (595 - 2 * 50) / (10 * 0.6): Courier glyphs are 0.6 em wide.
pub const CHARS_PER_LINE: usize = 82;
/// (842 - 2 * 50) / 14
pub const LINES_PER_PAGE: usize = 53;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub header: bool,
}

impl Line {
    fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            header: false,
        }
    }
}

pub type Page = Vec<Line>;

/// Lay the turns out as pages: a `"<timestamp> - <role>:"` header, the
/// wrapped content, then a blank line between turns.
#[must_use]
pub fn layout(turns: &[Turn]) -> Vec<Page> {
    let mut lines = Vec::new();
    for turn in turns {
        lines.push(Line {
            text: format!("{} - {}:", turn.timestamp_iso(), turn.role),
            header: true,
        });
        for paragraph in turn.content.lines() {
            if paragraph.trim().is_empty() {
                lines.push(Line::body(""));
                continue;
            }
            lines.extend(wrap(paragraph, CHARS_PER_LINE).into_iter().map(Line::body));
        }
        lines.push(Line::body(""));
    }

    let mut pages: Vec<Page> = lines
        .chunks(LINES_PER_PAGE)
        .map(<[Line]>::to_vec)
        .collect();
    // A page that would start with the separator line of the previous turn.
    pages.retain(|page| page.iter().any(|line| !line.text.is_empty()));
    pages
}

fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let rest = chars.split_off(width);
            out.push(chars.into_iter().collect());
            chars = rest;
        }

        let used = current.chars().count();
        if used > 0 && used + 1 + chars.len() > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(chars);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Encode for the standard fonts' WinAnsi encoding. Characters outside
/// Latin-1 become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' | '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
            _ => b'?',
        })
        .collect()
}

/// Render laid-out pages into PDF bytes.
pub fn render_pdf(pages: &[Page]) -> anyhow::Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("TL", vec![LINE_HEIGHT.into()]),
            Operation::new(
                "Td",
                vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()],
            ),
        ];
        for line in page {
            if !line.text.is_empty() {
                let font = if line.header { "F2" } else { "F1" };
                operations.push(Operation::new("Tf", vec![font.into(), FONT_SIZE.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_text(&line.text))],
                ));
            }
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = i64::try_from(kids.len())?;
    let media_box: Vec<Object> = vec![
        0_i64.into(),
        0_i64.into(),
        PAGE_WIDTH.into(),
        PAGE_HEIGHT.into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use lingua_core::Role;

    fn turn(id: i64, role: Role, content: &str) -> Turn {
        Turn {
            id,
            timestamp: NaiveDateTime::parse_from_str("2024-05-02 18:30:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn each_turn_gets_header_content_and_gap() {
        let pages = layout(&[
            turn(1, Role::User, "Hello"),
            turn(2, Role::Assistant, "Hi there!"),
        ]);

        assert_eq!(pages.len(), 1);
        let texts: Vec<&str> = pages[0].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "2024-05-02T18:30:00.000000 - user:",
                "Hello",
                "",
                "2024-05-02T18:30:00.000000 - assistant:",
                "Hi there!",
                "",
            ]
        );
        assert!(pages[0][0].header);
        assert!(!pages[0][1].header);
    }

    #[test]
    fn long_content_wraps_within_page_width() {
        let content = "word ".repeat(100);
        let pages = layout(&[turn(1, Role::Assistant, &content)]);

        let body: Vec<&Line> = pages[0].iter().filter(|l| !l.header).collect();
        assert!(body.len() > 2);
        assert!(body.iter().all(|l| l.text.chars().count() <= CHARS_PER_LINE));
    }

    #[test]
    fn long_conversations_paginate() {
        let turns: Vec<Turn> = (1..=40)
            .map(|i| turn(i, Role::User, &format!("message {i}")))
            .collect();
        let pages = layout(&turns);

        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.len() <= LINES_PER_PAGE));
    }

    #[test]
    fn rendered_pdf_has_one_page_object_per_page() {
        let turns: Vec<Turn> = (1..=40)
            .map(|i| turn(i, Role::User, &format!("message {i}")))
            .collect();
        let bytes = render_pdf(&layout(&turns)).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(encode_text("café ☕"), b"caf\xe9 ?".to_vec());
    }
}
