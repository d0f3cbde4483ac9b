use std::collections::{BTreeMap, HashMap};

use crate::data::{FetchedVerse, Translation, TranslationVerse, VerseGroup, VerseRange};

/// Verses one translation returned for a chapter
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterFetch {
    pub translation_id: String,
    pub verses: Vec<FetchedVerse>,
}

/// Every translation's fetch result for one chapter, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedChapter {
    pub chapter: u32,
    pub translations: Vec<ChapterFetch>,
}

/// A parsed range together with what was fetched for it
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRange<'books> {
    pub range: VerseRange<'books>,
    pub chapters: Vec<FetchedChapter>,
}

/// Merges per-translation fetch results into verse groups
///
/// Output order never depends on the order fetches arrived in:
/// groups are sorted by verse number, and verses inside a group follow the order of `translations`.
#[derive(Debug)]
pub struct VerseAligner<'t> {
    translations: &'t [Translation],
    positions: HashMap<&'t str, usize>,
}

impl<'t> VerseAligner<'t> {
    pub fn new(translations: &'t [Translation]) -> Self {
        let positions = translations
            .iter()
            .enumerate()
            .map(|(position, translation)| (translation.id.as_str(), position))
            .collect();
        Self {
            translations,
            positions,
        }
    }

    /// Aligns every chapter of every range; ranges keep their order, chapters go ascending
    pub fn align(&self, ranges: &[FetchedRange<'_>]) -> Vec<VerseGroup> {
        let mut groups = Vec::new();
        for FetchedRange { range, chapters } in ranges {
            let mut chapters: Vec<&FetchedChapter> = chapters.iter().collect();
            chapters.sort_by_key(|fetched| fetched.chapter);
            for fetched in chapters {
                if !range.contains_chapter(fetched.chapter) {
                    log::warn!(
                        "chapter {} is outside of '{range}', skipping",
                        fetched.chapter
                    );
                    continue;
                }
                groups.extend(self.align_chapter(range, fetched.chapter, &fetched.translations));
            }
        }
        groups
    }

    /// Aligns a single chapter of `range`
    pub fn align_chapter(
        &self,
        range: &VerseRange<'_>,
        chapter: u32,
        fetched: &[ChapterFetch],
    ) -> Vec<VerseGroup> {
        let bounds = range.verses_in(chapter);
        let mut verses: BTreeMap<u32, Vec<(usize, TranslationVerse)>> = BTreeMap::new();
        for ChapterFetch {
            translation_id,
            verses: fetched_verses,
        } in fetched
        {
            let Some(&position) = self.positions.get(translation_id.as_str()) else {
                log::warn!("unknown translation '{translation_id}', skipping its verses");
                continue;
            };
            let translation = &self.translations[position];
            let Some(book) = translation.book(range.book_name) else {
                log::warn!(
                    "translation '{}' has no book '{}', skipping",
                    translation.name,
                    range.book_name
                );
                continue;
            };
            for verse in fetched_verses
                .iter()
                .filter(|verse| bounds.contains(&verse.number))
            {
                verses.entry(verse.number).or_default().push((
                    position,
                    TranslationVerse {
                        translation_name: translation.name.clone(),
                        book_name: book.name.clone(),
                        chapter_number: chapter,
                        verse_number: verse.number,
                        text: verse.text.clone(),
                    },
                ));
            }
        }
        verses
            .into_iter()
            .map(|(verse_number, mut translations)| {
                translations.sort_by_key(|(position, _)| *position);
                VerseGroup {
                    book_name: range.book_name.to_owned(),
                    chapter_number: chapter,
                    verse_number,
                    translations: translations.into_iter().map(|(_, verse)| verse).collect(),
                }
            })
            .collect()
    }
}
