//! Fetch capabilities, keyed by the source identifier a translation declares.
//!
//! Adding a new Bible source means registering another [`ChapterSource`]; nothing else needs to change.

use std::collections::HashMap;

use crate::{
    align::{ChapterFetch, FetchedChapter, FetchedRange},
    data::{FetchedVerse, Translation, VerseRange},
};

/// Error of a source collaborator, passed through untouched
pub type FetchError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub trait ChapterSource {
    fn fetch_chapter(
        &self,
        translation_identifier: &str,
        book_code: &str,
        chapter: u32,
    ) -> Result<Vec<FetchedVerse>, FetchError>;
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to fetch {book} {chapter} of '{translation}': {source}")]
pub struct SourceError {
    pub translation: String,
    pub book: String,
    pub chapter: u32,
    pub source: FetchError,
}

#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Box<dyn ChapterSource + Send + Sync>>,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source, returning the one previously registered under the same identifier
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        source: impl ChapterSource + Send + Sync + 'static,
    ) -> Option<Box<dyn ChapterSource + Send + Sync>> {
        self.sources.insert(identifier.into(), Box::new(source))
    }

    pub fn get(&self, identifier: &str) -> Option<&(dyn ChapterSource + Send + Sync)> {
        self.sources.get(identifier).map(|source| &**source)
    }

    /// Fetches every chapter of `range` from every translation, in the order given.
    ///
    /// Translations without a registered source, or without the range's book, are skipped.
    /// The walk stops at the first chapter no translation has verses for: chapters of a book are contiguous,
    /// so that is where the book ends. Source errors are returned as they are.
    pub fn fetch_range<'books>(
        &self,
        translations: &[Translation],
        range: VerseRange<'books>,
    ) -> Result<FetchedRange<'books>, SourceError> {
        let mut chapters = Vec::new();
        for (chapter, _) in range.chapters() {
            let mut fetched = Vec::with_capacity(translations.len());
            for translation in translations {
                let Some(source) = self.get(&translation.source) else {
                    log::warn!(
                        "source '{}' of '{}' is not supported, skipping",
                        translation.source,
                        translation.name
                    );
                    continue;
                };
                let Some(book) = translation.book(range.book_name) else {
                    log::warn!(
                        "'{}' has no book '{}', skipping",
                        translation.name,
                        range.book_name
                    );
                    continue;
                };
                log::debug!(
                    "fetching {} {chapter} of '{}' from '{}'",
                    book.abbreviation,
                    translation.identifier,
                    translation.source
                );
                let verses = source
                    .fetch_chapter(&translation.identifier, &book.abbreviation, chapter)
                    .map_err(|source| SourceError {
                        translation: translation.name.clone(),
                        book: book.name.clone(),
                        chapter,
                        source,
                    })?;
                fetched.push(ChapterFetch {
                    translation_id: translation.id.clone(),
                    verses,
                });
            }
            if fetched.iter().all(|fetch| fetch.verses.is_empty()) {
                log::debug!(
                    "no verses in {} {chapter}, not walking past it",
                    range.book_name
                );
                break;
            }
            chapters.push(FetchedChapter {
                chapter,
                translations: fetched,
            });
        }
        Ok(FetchedRange { range, chapters })
    }
}

/// Chapters held in memory, keyed by translation identifier, book code and chapter
///
/// A chapter that was never inserted fetches as empty, same as a source page without verses.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    chapters: HashMap<(String, String, u32), Vec<FetchedVerse>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        translation_identifier: impl Into<String>,
        book_code: impl Into<String>,
        chapter: u32,
        verses: Vec<FetchedVerse>,
    ) {
        self.chapters.insert(
            (translation_identifier.into(), book_code.into(), chapter),
            verses,
        );
    }
}

impl ChapterSource for StaticSource {
    fn fetch_chapter(
        &self,
        translation_identifier: &str,
        book_code: &str,
        chapter: u32,
    ) -> Result<Vec<FetchedVerse>, FetchError> {
        let key = (translation_identifier.to_owned(), book_code.to_owned(), chapter);
        Ok(self.chapters.get(&key).cloned().unwrap_or_default())
    }
}
