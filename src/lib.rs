//! Scripture references in, slide decks out.
//!
//! This crate takes a free-form reference like `"창세기 1:1-5; 요한복음 3:16"`, finds the verse ranges it names,
//! lines up the text of every requested translation verse by verse, and lays the result out into a `.pptx` deck
//! (or a zip of per-chapter decks).
//!
//! # Pipeline
//! - [`parse_reference`] resolves book aliases and chapter/verse notation into [`VerseRange`]s.
//!   Book names are matched against one translation's book list, longest alias first.
//! - Fetching verse text is not done here. Sources are registered in a [`SourceRegistry`] as [`ChapterSource`]s,
//!   keyed by the source identifier each [`Translation`] declares.
//! - [`align_verses`] merges whatever sources returned into [`VerseGroup`]s: one per verse number,
//!   translations in the order they were asked for, no matter what order fetches came back in.
//! - [`generate_presentation`] breaks groups into slides under a line budget and serializes the deck(s).
//!
//! [`render`] strings all of that together for callers holding a registry.
//!
//! Everything here is synchronous and pure, save for the sources themselves.

use itertools::Itertools;

mod align;
mod book_index;
/// This module defines types that are used to represent parsed and fetched data
mod data;
mod gen;
mod options;
mod package;
mod parser;
mod source;

/// This module houses "utility-like" structs and functions.
mod util;

pub use align::{ChapterFetch, FetchedChapter, FetchedRange, VerseAligner};
pub use book_index::BookIndex;
pub use data::{
    Book, BookAlias, FetchedVerse, Translation, TranslationVerse, VerseGroup, VerseRange,
    WHOLE_CHAPTER_END,
};
pub use gen::{
    layout::{Block, Deck, DeckRole, Slide, SlideLayout, TitleCard},
    GenerationError,
};
pub use options::{DisplayPolicy, LayoutOptions, Palette, Theme, TitleSlide, UnknownTheme, AVAILABLE_FONTS};
pub use package::{generate_presentation, Output};
pub use parser::ReferenceParser;
pub use source::{ChapterSource, FetchError, SourceError, SourceRegistry, StaticSource};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not understand any part of '{query}'")]
    NothingParsed { query: String },
    #[error("No verses found for '{query}'")]
    NoVerses { query: String },
    #[error(transparent)]
    Fetch(#[from] SourceError),
    #[error("Failed to generate presentation: {}", .0)]
    Generation(#[from] GenerationError),
}

/// Parses a reference against a book list; unrecognized clauses are dropped
pub fn parse_reference<'books>(books: &'books [Book], reference: &str) -> Vec<VerseRange<'books>> {
    ReferenceParser::new(books).parse(reference)
}

/// Aligns fetched chapters into verse groups, following the order of `translations`
pub fn align_verses(translations: &[Translation], fetched_ranges: &[FetchedRange<'_>]) -> Vec<VerseGroup> {
    VerseAligner::new(translations).align(fetched_ranges)
}

/// Parses `reference`, fetches every range from every translation and generates the output.
///
/// Book names are resolved with the first (primary) translation's book list.
pub fn render(
    reference: &str,
    translations: &[Translation],
    registry: &SourceRegistry,
    options: &LayoutOptions,
) -> Result<Output, Error> {
    let books = translations
        .first()
        .map(|primary| primary.books.as_slice())
        .unwrap_or_default();
    let ranges = parse_reference(books, reference);
    if ranges.is_empty() {
        return Err(Error::NothingParsed {
            query: reference.to_owned(),
        });
    }
    log::info!(
        "'{reference}' resolved to {}",
        ranges.iter().join("; ")
    );

    let fetched = ranges
        .into_iter()
        .map(|range| registry.fetch_range(translations, range))
        .collect::<Result<Vec<_>, _>>()?;
    let groups = align_verses(translations, &fetched);
    if groups.is_empty() {
        return Err(Error::NoVerses {
            query: reference.to_owned(),
        });
    }
    log::info!("aligned {} verses", groups.len());

    Ok(generate_presentation(&groups, options)?)
}
