//! Turns verse groups into the downloadable result: a single deck, or one deck per chapter packed into a zip.

use std::collections::HashMap;

use crate::{
    data::VerseGroup,
    gen::{
        layout::{DeckRole, SlideLayout},
        pptx::{self, PptxWriter},
        GenerationError,
    },
    options::LayoutOptions,
    util::{sanitize_filename, Archive},
};

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

const FALLBACK_PRESENTATION_NAME: &str = "bible_presentation";
const FALLBACK_ARCHIVE_NAME: &str = "bible_chapters";

/// Generated file, ready to be sent or saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub buffer: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Lays out and serializes `groups` into a presentation or a chapter archive, depending on `options`
pub fn generate_presentation(
    groups: &[VerseGroup],
    options: &LayoutOptions,
) -> Result<Output, GenerationError> {
    let packager = Packager::new(options);
    if options.split_chapters_into_files {
        packager.chapters(groups)
    } else {
        packager.single(groups)
    }
}

#[derive(Debug)]
struct Packager<'o> {
    options: &'o LayoutOptions,
    layout: SlideLayout<'o>,
    writer: PptxWriter<'o>,
}

impl<'o> Packager<'o> {
    fn new(options: &'o LayoutOptions) -> Self {
        Self {
            options,
            layout: SlideLayout::new(options),
            writer: PptxWriter::new(options),
        }
    }

    /// Sanitized title, unless there's nothing left of it
    fn title_stem(&self) -> Option<String> {
        let title = &self.options.title_slide.as_ref()?.title;
        let stem = sanitize_filename(title);
        (!stem.is_empty()).then_some(stem)
    }

    fn single(&self, groups: &[VerseGroup]) -> Result<Output, GenerationError> {
        let deck = self.layout.layout(groups, DeckRole::Main)?;
        let stem = self
            .title_stem()
            .unwrap_or_else(|| FALLBACK_PRESENTATION_NAME.to_owned());
        Ok(Output {
            buffer: self.writer.write(&deck)?,
            filename: format!("{stem}.pptx"),
            content_type: pptx::CONTENT_TYPE,
        })
    }

    fn chapters(&self, groups: &[VerseGroup]) -> Result<Output, GenerationError> {
        if groups.is_empty() {
            return Err(GenerationError::EmptyDeck(DeckRole::Main));
        }
        let mut archive = Archive::new();
        let mut names = DeckNames::default();
        for run in groups.chunk_by(|a, b| a.chapter_key() == b.chapter_key()) {
            let (book, chapter) = run[0].chapter_key();
            let role = DeckRole::Chapter {
                book: book.to_owned(),
                chapter,
            };
            let deck = self.layout.layout(run, role)?;
            let name = names.next(&format!("{book} {chapter}"));
            log::debug!("packing {name} with {} slides", deck.slides.len());
            archive.bytes(&name, &self.writer.write(&deck)?)?;
        }
        let stem = self
            .title_stem()
            .map_or_else(|| FALLBACK_ARCHIVE_NAME.to_owned(), |stem| format!("{stem}_chapters"));
        Ok(Output {
            buffer: archive.finish()?,
            filename: format!("{stem}.zip"),
            content_type: ZIP_CONTENT_TYPE,
        })
    }
}

/// Hands out distinct deck file names inside one archive
#[derive(Debug, Default)]
struct DeckNames {
    taken: HashMap<String, usize>,
}

impl DeckNames {
    fn next(&mut self, title: &str) -> String {
        let mut stem = sanitize_filename(title);
        if stem.is_empty() {
            stem = String::from("chapter");
        }
        let seen = self.taken.entry(stem.clone()).or_default();
        *seen += 1;
        match *seen {
            1 => format!("{stem}.pptx"),
            n => format!("{stem}_{n}.pptx"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{data::TranslationVerse, options::TitleSlide};

    fn group(book: &str, chapter: u32, verse: u32) -> VerseGroup {
        VerseGroup {
            book_name: book.into(),
            chapter_number: chapter,
            verse_number: verse,
            translations: vec![TranslationVerse {
                translation_name: "개역개정".into(),
                book_name: book.into(),
                chapter_number: chapter,
                verse_number: verse,
                text: format!("{book} {chapter}:{verse}"),
            }],
        }
    }

    fn entries(output: &Output) -> Vec<String> {
        let zip = zip::ZipArchive::new(Cursor::new(output.buffer.as_slice())).expect("Should be a zip");
        zip.file_names().map(str::to_owned).collect()
    }

    #[test]
    fn single_deck_names() {
        let groups = [group("창세기", 1, 1)];
        let titled = LayoutOptions {
            title_slide: Some(TitleSlide::new("주일 예배 / 창세기")),
            ..Default::default()
        };
        let symbols_only = LayoutOptions {
            title_slide: Some(TitleSlide::new("***")),
            ..Default::default()
        };

        let plain = generate_presentation(&groups, &LayoutOptions::default()).expect("Should generate");
        let titled = generate_presentation(&groups, &titled).expect("Should generate");
        let symbols_only = generate_presentation(&groups, &symbols_only).expect("Should generate");

        assert_eq!(plain.filename, "bible_presentation.pptx");
        assert_eq!(
            plain.content_type,
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        assert_eq!(titled.filename, "주일_예배_창세기.pptx");
        assert_eq!(symbols_only.filename, "bible_presentation.pptx");
        assert!(entries(&plain).contains(&"ppt/presentation.xml".to_owned()));
    }

    #[test]
    fn split_by_chapter_runs() {
        // arrange
        let groups = [
            group("창세기", 1, 31),
            group("창세기", 2, 1),
            group("창세기", 2, 2),
            group("요한복음", 3, 16),
        ];
        let options = LayoutOptions {
            split_chapters_into_files: true,
            title_slide: Some(TitleSlide::new("새벽 기도")),
            ..Default::default()
        };

        // act
        let output = generate_presentation(&groups, &options).expect("Should generate");

        // assert
        assert_eq!(output.filename, "새벽_기도_chapters.zip");
        assert_eq!(output.content_type, "application/zip");
        let mut names = entries(&output);
        names.sort_unstable();
        assert_eq!(names, vec!["요한복음_3.pptx", "창세기_1.pptx", "창세기_2.pptx"]);
    }

    #[test]
    fn repeated_chapter_gets_suffix() {
        let groups = [group("시편", 23, 1), group("시편", 1, 1), group("시편", 23, 6)];
        let options = LayoutOptions {
            split_chapters_into_files: true,
            ..Default::default()
        };

        let output = generate_presentation(&groups, &options).expect("Should generate");

        assert_eq!(output.filename, "bible_chapters.zip");
        let mut names = entries(&output);
        names.sort_unstable();
        assert_eq!(names, vec!["시편_1.pptx", "시편_23.pptx", "시편_23_2.pptx"]);
    }

    #[test]
    fn empty_input_is_reported() {
        for split_chapters_into_files in [false, true] {
            let options = LayoutOptions {
                split_chapters_into_files,
                ..Default::default()
            };

            let result = generate_presentation(&[], &options);

            assert!(matches!(result, Err(GenerationError::EmptyDeck(DeckRole::Main))));
        }
    }
}
