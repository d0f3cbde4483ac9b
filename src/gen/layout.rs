//! Slide breaking.
//!
//! Verse groups are placed on slides under a line budget, one group never being split between slides.
//! Line counts are estimates: monotonic in text length and deterministic, not pixel-exact.

use std::fmt::Display;

use itertools::Itertools;

use crate::{
    data::VerseGroup,
    options::{DisplayPolicy, LayoutOptions, TitleSlide},
};

use super::GenerationError;

/// Characters assumed to fit in one line of slide body
pub const CHARS_PER_LINE: usize = 60;

/// Which deck of the output is being laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckRole {
    /// The only deck of the output
    Main,
    /// One chapter of a split output
    Chapter { book: String, chapter: u32 },
}

impl Display for DeckRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckRole::Main => f.write_str("main"),
            DeckRole::Chapter { book, chapter } => write!(f, "{book} {chapter}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCard {
    pub title: String,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Book/chapter header drawn in the middle of a slide
    Heading(String),
    Verse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slide {
    /// Position among the deck's content slides, from zero
    pub index: usize,
    pub header: Option<String>,
    pub blocks: Vec<Block>,
    /// Estimated lines of verse text on this slide
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub role: DeckRole,
    pub title: Option<TitleCard>,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Name of the document, as shown in its properties
    pub fn document_title(&self) -> String {
        match (&self.title, &self.role) {
            (Some(card), DeckRole::Main) => card.title.clone(),
            (Some(TitleCard { title, subtitle: Some(subtitle) }), DeckRole::Chapter { .. }) => {
                format!("{title} - {subtitle}")
            }
            (_, role @ DeckRole::Chapter { .. }) => role.to_string(),
            (None, DeckRole::Main) => String::from("Bible presentation"),
        }
    }
}

pub fn chapter_title(book: &str, chapter: u32) -> String {
    format!("{book} {chapter}장")
}

/// Text of a verse group as placed on a slide
pub fn verse_block(group: &VerseGroup) -> String {
    match group.translations.as_slice() {
        [single] => format!("{} {}", group.verse_number, single.text),
        many => many
            .iter()
            .map(|verse| {
                format!(
                    "[{}] {} {}",
                    verse.translation_name, group.verse_number, verse.text
                )
            })
            .join("\n"),
    }
}

/// Lines a text is estimated to occupy: explicit line breaks plus wrapping
pub fn estimate_lines(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let explicit = text.matches('\n').count();
    let wrapped = text.chars().count().div_ceil(CHARS_PER_LINE);
    (explicit + wrapped).max(1)
}

/// Running state of one deck's layout
#[derive(Debug, Default)]
struct Context<'groups> {
    slides: Vec<Slide>,
    current: Slide,
    last_book: &'groups str,
    last_chapter: u32,
}

impl<'groups> Context<'groups> {
    fn break_slide(&mut self) {
        let next = Slide {
            index: self.current.index + 1,
            ..Default::default()
        };
        self.slides.push(std::mem::replace(&mut self.current, next));
    }

    fn draw_header(&mut self, header: String, group: &'groups VerseGroup) {
        if self.current.blocks.is_empty() && self.current.header.is_none() {
            self.current.header = Some(header);
        } else {
            self.current.blocks.push(Block::Heading(header));
        }
        self.last_book = &group.book_name;
        self.last_chapter = group.chapter_number;
    }

    fn finish(mut self) -> Vec<Slide> {
        self.slides.push(self.current);
        self.slides
    }
}

#[derive(Debug)]
pub struct SlideLayout<'options> {
    options: &'options LayoutOptions,
}

impl<'options> SlideLayout<'options> {
    pub fn new(options: &'options LayoutOptions) -> Self {
        Self { options }
    }

    /// Leading slide of a deck; only present if the options ask for one
    pub fn title_card(&self, role: &DeckRole) -> Option<TitleCard> {
        let TitleSlide { title, subtitle } = self.options.title_slide.as_ref()?;
        let subtitle = match role {
            DeckRole::Main => subtitle.clone(),
            DeckRole::Chapter { book, chapter } => Some(chapter_title(book, *chapter)),
        };
        Some(TitleCard {
            title: title.clone(),
            subtitle,
        })
    }

    /// Header to draw before `group`, if any
    fn header(
        &self,
        group: &VerseGroup,
        new_slide: bool,
        book_changed: bool,
        chapter_changed: bool,
    ) -> Option<String> {
        if !(new_slide || book_changed || chapter_changed) {
            return None;
        }
        let fires =
            |policy: DisplayPolicy| policy.fires(new_slide, book_changed, chapter_changed);
        let book = fires(self.options.show_book_name_on_slide);
        let chapter = fires(self.options.show_chapter_number_on_slide);
        match (book, chapter) {
            (true, true) => Some(chapter_title(&group.book_name, group.chapter_number)),
            (true, false) => Some(group.book_name.clone()),
            (false, true) => Some(format!("{}장", group.chapter_number)),
            (false, false) => None,
        }
    }

    pub fn layout(&self, groups: &[VerseGroup], role: DeckRole) -> Result<Deck, GenerationError> {
        if groups.is_empty() {
            return Err(GenerationError::EmptyDeck(role));
        }
        let max_lines = self.options.max_lines_per_slide;
        let mut context = Context::default();
        for (i, group) in groups.iter().enumerate() {
            let text = verse_block(group);
            let lines = estimate_lines(&text);

            if max_lines > 0 && context.current.lines + lines > max_lines && context.current.lines > 0
            {
                context.break_slide();
            }

            let new_slide = context.current.lines == 0;
            let book_changed = group.book_name != context.last_book;
            let chapter_changed = group.chapter_number != context.last_chapter;
            if let Some(header) = self.header(group, new_slide, book_changed, chapter_changed) {
                context.draw_header(header, group);
            }

            context.current.blocks.push(Block::Verse(text));
            context.current.lines += lines;

            // budget filled exactly, no need to wait for the next group to overflow
            if max_lines > 0 && context.current.lines >= max_lines && i + 1 < groups.len() {
                context.break_slide();
            }
        }
        let slides = context.finish();
        log::debug!("laid out {role} deck: {} slides", slides.len());
        Ok(Deck {
            title: self.title_card(&role),
            role,
            slides,
        })
    }
}
