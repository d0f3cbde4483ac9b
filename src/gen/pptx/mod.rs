//! Office Open XML presentation writer.
//!
//! Output is byte-for-byte reproducible: parts are always written in the same order, with fixed timestamps.

pub mod parts;
pub mod shape;

use std::borrow::Cow;

use crate::{
    options::{LayoutOptions, Palette, Theme},
    util::Archive,
};

use self::shape::{
    inches, write_slide, Align, Anchor, Frame, Paragraph, RunStyle, TextBox, SLIDE_HEIGHT,
    SLIDE_WIDTH,
};
use super::{
    layout::{Block, Deck, Slide, TitleCard},
    GenerationError,
};

pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const TITLE_SIZE: u32 = 48;
const SUBTITLE_SIZE: u32 = 24;
const HEADER_SIZE: u32 = 20;
const BODY_SIZE: u32 = 18;
/// Points
const BODY_LINE_SPACING: u32 = 28;

/// Horizontal margin of content slides
const MARGIN: i64 = inches(30);

#[derive(Debug)]
pub struct PptxWriter<'o> {
    options: &'o LayoutOptions,
    theme: Theme,
    palette: Palette,
    title_font: &'o str,
    body_font: &'o str,
    number_font: &'o str,
}

impl<'o> PptxWriter<'o> {
    pub fn new(options: &'o LayoutOptions) -> Self {
        let theme = options.theme();
        Self {
            options,
            theme,
            palette: theme.palette(),
            title_font: options.title_font(),
            body_font: options.body_font(),
            number_font: options.slide_number_font(),
        }
    }

    fn style(&self, font: &'o str, size: u32, bold: bool, color: &'static str) -> RunStyle<'o> {
        RunStyle {
            font,
            size,
            bold,
            color,
        }
    }

    fn title_shapes<'d>(&self, card: &'d TitleCard) -> Vec<TextBox<'d>>
    where
        'o: 'd,
    {
        let frame = |y, height| Frame {
            x: SLIDE_WIDTH / 20,
            y,
            width: SLIDE_WIDTH * 9 / 10,
            height,
        };
        let mut shapes = vec![TextBox {
            name: "Title",
            frame: frame(inches(200), inches(150)),
            align: Align::Center,
            anchor: Anchor::Middle,
            line_spacing: None,
            paragraphs: vec![Paragraph {
                text: Cow::Borrowed(card.title.as_str()),
                style: self.style(self.title_font, TITLE_SIZE, false, self.palette.text),
            }],
        }];
        if let Some(subtitle) = &card.subtitle {
            shapes.push(TextBox {
                name: "Subtitle",
                frame: frame(inches(350), inches(100)),
                align: Align::Center,
                anchor: Anchor::Top,
                line_spacing: None,
                paragraphs: vec![Paragraph {
                    text: Cow::Borrowed(subtitle.as_str()),
                    style: self.style(self.title_font, SUBTITLE_SIZE, false, self.palette.muted),
                }],
            });
        }
        shapes
    }

    fn content_shapes<'d>(&self, slide: &'d Slide) -> Vec<TextBox<'d>>
    where
        'o: 'd,
    {
        let width = SLIDE_WIDTH - 2 * MARGIN;
        let mut shapes = Vec::with_capacity(3);
        if let Some(header) = &slide.header {
            shapes.push(TextBox {
                name: "Header",
                frame: Frame {
                    x: MARGIN,
                    y: inches(30),
                    width,
                    height: inches(50),
                },
                align: Align::Center,
                anchor: Anchor::Middle,
                line_spacing: None,
                paragraphs: vec![Paragraph {
                    text: Cow::Borrowed(header.as_str()),
                    style: self.style(self.title_font, HEADER_SIZE, true, self.palette.text),
                }],
            });
        }

        let heading = self.style(self.body_font, BODY_SIZE, true, self.palette.text);
        let verse = self.style(self.body_font, BODY_SIZE, false, self.palette.text);
        let paragraphs = slide
            .blocks
            .iter()
            .flat_map(|block| {
                let (text, style) = match block {
                    Block::Heading(text) => (text, heading),
                    Block::Verse(text) => (text, verse),
                };
                text.split('\n').map(move |line| Paragraph {
                    text: Cow::Borrowed(line),
                    style,
                })
            })
            .collect();
        shapes.push(TextBox {
            name: "Body",
            frame: Frame {
                x: MARGIN,
                y: inches(100),
                width,
                height: SLIDE_HEIGHT - inches(100) - inches(60),
            },
            align: Align::Left,
            anchor: Anchor::Top,
            line_spacing: Some(BODY_LINE_SPACING),
            paragraphs,
        });

        shapes.push(TextBox {
            name: "Slide Number",
            frame: Frame {
                x: SLIDE_WIDTH - inches(110),
                y: SLIDE_HEIGHT - inches(50),
                width: inches(80),
                height: inches(35),
            },
            align: Align::Right,
            anchor: Anchor::Bottom,
            line_spacing: None,
            paragraphs: vec![Paragraph {
                text: Cow::Owned((slide.index + 1).to_string()),
                style: self.style(
                    self.number_font,
                    self.options.slide_number_font_size,
                    false,
                    self.palette.muted,
                ),
            }],
        });
        shapes
    }

    /// Renders a laid out deck into a complete `.pptx` package
    pub fn write(&self, deck: &Deck) -> Result<Vec<u8>, GenerationError> {
        let mut slides = Vec::with_capacity(deck.slides.len() + 1);
        if let Some(card) = &deck.title {
            slides.push(self.title_shapes(card));
        }
        slides.extend(deck.slides.iter().map(|slide| self.content_shapes(slide)));
        let count = slides.len();

        let mut archive = Archive::new();
        archive.part("[Content_Types].xml", |out| parts::content_types(out, count))?;
        archive.part("_rels/.rels", |out| parts::package_relationships(out))?;
        archive.part("docProps/core.xml", |out| {
            parts::core_properties(out, &deck.document_title())
        })?;
        archive.part("docProps/app.xml", |out| parts::app_properties(out, count))?;
        archive.part("ppt/presentation.xml", |out| parts::presentation(out, count))?;
        archive.part("ppt/_rels/presentation.xml.rels", |out| {
            parts::presentation_relationships(out, count)
        })?;
        archive.part("ppt/slideMasters/slideMaster1.xml", |out| {
            parts::slide_master(out, self.palette)
        })?;
        archive.part("ppt/slideMasters/_rels/slideMaster1.xml.rels", |out| {
            parts::slide_master_relationships(out)
        })?;
        archive.part("ppt/slideLayouts/slideLayout1.xml", |out| parts::slide_layout(out))?;
        archive.part("ppt/slideLayouts/_rels/slideLayout1.xml.rels", |out| {
            parts::slide_layout_relationships(out)
        })?;
        archive.part("ppt/theme/theme1.xml", |out| {
            parts::theme(out, self.theme, self.title_font, self.body_font)
        })?;
        for (i, shapes) in slides.iter().enumerate() {
            let number = i + 1;
            archive.part(&parts::slide_part(number), |out| {
                write_slide(out, self.palette.background, shapes)
            })?;
            archive.part(&parts::slide_relationships_part(number), |out| {
                parts::slide_relationships(out)
            })?;
        }
        log::debug!("wrote {count} slides for '{}'", deck.document_title());
        archive.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;
    use crate::gen::layout::DeckRole;

    fn deck(title: Option<TitleCard>) -> Deck {
        Deck {
            role: DeckRole::Main,
            title,
            slides: vec![
                Slide {
                    index: 0,
                    header: Some("창세기 1장".into()),
                    blocks: vec![Block::Verse("1 태초에 하나님이 천지를 창조하시니라".into())],
                    lines: 1,
                },
                Slide {
                    index: 1,
                    header: None,
                    blocks: vec![
                        Block::Verse("2 땅이 혼돈하고".into()),
                        Block::Heading("창세기 2장".into()),
                        Block::Verse("[개역개정] 1 천지와\n[NIV] 1 Thus the heavens".into()),
                    ],
                    lines: 3,
                },
            ],
        }
    }

    fn read(bytes: &[u8], name: &str) -> String {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("Should be a zip");
        let mut contents = String::new();
        zip.by_name(name)
            .expect("Part should exist")
            .read_to_string(&mut contents)
            .expect("Part should be utf-8");
        contents
    }

    #[test]
    fn package_has_required_parts() {
        // arrange
        let options = LayoutOptions::default();
        let deck = deck(None);

        // act
        let bytes = PptxWriter::new(&options).write(&deck).expect("Should write");

        // assert
        let zip = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).expect("Should be a zip");
        let mut names: Vec<_> = zip.file_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/app.xml",
                "docProps/core.xml",
                "ppt/_rels/presentation.xml.rels",
                "ppt/presentation.xml",
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
                "ppt/slideLayouts/slideLayout1.xml",
                "ppt/slideMasters/_rels/slideMaster1.xml.rels",
                "ppt/slideMasters/slideMaster1.xml",
                "ppt/slides/_rels/slide1.xml.rels",
                "ppt/slides/_rels/slide2.xml.rels",
                "ppt/slides/slide1.xml",
                "ppt/slides/slide2.xml",
                "ppt/theme/theme1.xml",
            ]
        );
    }

    #[test]
    fn content_slides_render_blocks() {
        let options = LayoutOptions::default();

        let bytes = PptxWriter::new(&options).write(&deck(None)).expect("Should write");

        let first = read(&bytes, "ppt/slides/slide1.xml");
        assert!(first.contains(r#"name="Header 2""#));
        assert!(first.contains("<a:t>창세기 1장</a:t>"));
        assert!(first.contains(r#"sz="2000" b="1""#));
        assert!(first.contains("<a:t>1 태초에 하나님이 천지를 창조하시니라</a:t>"));
        assert!(first.contains(r#"<a:srgbClr val="666666"/></a:solidFill><a:latin typeface="Arial"/><a:ea typeface="Arial"/><a:cs typeface="Arial"/></a:rPr><a:t>1</a:t>"#));

        let second = read(&bytes, "ppt/slides/slide2.xml");
        assert!(!second.contains(r#"name="Header"#));
        assert!(second.contains(r#"sz="1800" b="1" dirty="0"><a:solidFill><a:srgbClr val="000000"/></a:solidFill><a:latin typeface="Arial"/><a:ea typeface="Arial"/><a:cs typeface="Arial"/></a:rPr><a:t>창세기 2장</a:t>"#));
        // multi-translation blocks become one paragraph per translation
        assert!(second.contains("<a:t>[개역개정] 1 천지와</a:t></a:r></a:p><a:p>"));
        assert!(second.contains("<a:t>[NIV] 1 Thus the heavens</a:t>"));
        assert!(second.contains("<a:t>2</a:t>"));
    }

    #[test]
    fn title_slide_comes_first() {
        let options = LayoutOptions {
            theme_name: "themeBlue".into(),
            ..Default::default()
        };
        let card = TitleCard {
            title: "주일 예배".into(),
            subtitle: Some("창세기 1-2장".into()),
        };

        let bytes = PptxWriter::new(&options)
            .write(&deck(Some(card)))
            .expect("Should write");

        let title = read(&bytes, "ppt/slides/slide1.xml");
        assert!(title.contains(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="1F3864"/>"#));
        assert!(title.contains(r#"sz="4800""#));
        assert!(title.contains("<a:t>주일 예배</a:t>"));
        assert!(title.contains("<a:t>창세기 1-2장</a:t>"));
        assert!(read(&bytes, "ppt/slides/slide3.xml").contains("<a:t>창세기 2장</a:t>"));
        assert!(read(&bytes, "docProps/app.xml").contains("<Slides>3</Slides>"));
        assert!(read(&bytes, "docProps/core.xml").contains("<dc:title>주일 예배</dc:title>"));
    }

    #[test]
    fn output_is_reproducible() {
        let options = LayoutOptions::default();
        let writer = PptxWriter::new(&options);

        let first = writer.write(&deck(None)).expect("Should write");
        let second = writer.write(&deck(None)).expect("Should write");

        assert_eq!(first, second);
    }
}
