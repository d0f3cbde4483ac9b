use std::{fmt::Display, ops::RangeInclusive};

/// Verse number standing for "through the end of the chapter".
///
/// Real chapter lengths are unknown at parse time; fetch results naturally stop at the last verse.
pub const WHOLE_CHAPTER_END: u32 = 200;

/// A book record as stored for one translation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub order: u32,
}

/// Canonical book a lookup alias resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookAlias<'books> {
    pub name: &'books str,
    pub abbreviation: &'books str,
    pub book_id: &'books str,
    pub order: u32,
}

impl<'books> From<&'books Book> for BookAlias<'books> {
    fn from(book: &'books Book) -> Self {
        Self {
            name: &book.name,
            abbreviation: &book.abbreviation,
            book_id: &book.id,
            order: book.order,
        }
    }
}

/// One parsed reference clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VerseRange<'books> {
    pub book_name: &'books str,
    pub book_abbreviation: &'books str,
    pub book_id: &'books str,
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
}

impl<'books> VerseRange<'books> {
    pub fn new(
        book: BookAlias<'books>,
        (start_chapter, start_verse): (u32, u32),
        (end_chapter, end_verse): (u32, u32),
    ) -> Self {
        Self {
            book_name: book.name,
            book_abbreviation: book.abbreviation,
            book_id: book.book_id,
            start_chapter,
            start_verse,
            end_chapter,
            end_verse,
        }
    }

    /// Chapters this range touches, paired with the verse bounds effective in each.
    ///
    /// Interior chapters always span the whole chapter. Malformed ranges (end before start) yield nothing.
    pub fn chapters(&self) -> impl Iterator<Item = (u32, RangeInclusive<u32>)> + '_ {
        (self.start_chapter..=self.end_chapter).map(move |chapter| (chapter, self.verses_in(chapter)))
    }

    /// Verse bounds of this range inside `chapter`
    pub fn verses_in(&self, chapter: u32) -> RangeInclusive<u32> {
        let first = if chapter == self.start_chapter {
            self.start_verse
        } else {
            1
        };
        let last = if chapter == self.end_chapter {
            self.end_verse
        } else {
            WHOLE_CHAPTER_END
        };
        first..=last
    }

    pub fn contains_chapter(&self, chapter: u32) -> bool {
        (self.start_chapter..=self.end_chapter).contains(&chapter)
    }
}

/// Shortest form the reference grammar parses back into the very same range
impl Display for VerseRange<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            book_name: book,
            start_chapter: c1,
            start_verse: v1,
            end_chapter: c2,
            end_verse: v2,
            ..
        } = self;
        let whole_chapters = *v1 == 1 && *v2 == WHOLE_CHAPTER_END;
        match (c1 == c2, whole_chapters) {
            (true, true) => write!(f, "{book} {c1}"),
            (false, true) => write!(f, "{book} {c1}-{c2}"),
            (true, false) if v1 == v2 => write!(f, "{book} {c1}:{v1}"),
            (true, false) => write!(f, "{book} {c1}:{v1}-{v2}"),
            (false, false) => write!(f, "{book} {c1}:{v1}-{c2}:{v2}"),
        }
    }
}

/// Verse as returned by a source, scoped to one translation and chapter
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchedVerse {
    pub number: u32,
    pub text: String,
}

impl FetchedVerse {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// A Bible version selected for generation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Translation {
    pub id: String,
    pub name: String,
    /// Version code understood by the source, e.g. "rvsn"
    pub identifier: String,
    /// Identifier of the source this version is fetched from
    pub source: String,
    pub books: Vec<Book>,
}

impl Translation {
    /// This translation's own record for a canonical book name
    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TranslationVerse {
    pub translation_name: String,
    pub book_name: String,
    pub chapter_number: u32,
    pub verse_number: u32,
    pub text: String,
}

/// One verse number across every requested translation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VerseGroup {
    pub book_name: String,
    pub chapter_number: u32,
    pub verse_number: u32,
    pub translations: Vec<TranslationVerse>,
}

impl VerseGroup {
    pub fn chapter_key(&self) -> (&str, u32) {
        (&self.book_name, self.chapter_number)
    }
}
