use std::{num::ParseIntError, str::FromStr};

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{anychar, char, digit1, one_of},
    combinator::{map_res, opt},
    error::{context, ContextError, ErrorKind, FromExternalError, ParseError},
    multi::fold_many0,
    sequence::{preceded, tuple},
    IResult, Parser,
};

use crate::{
    book_index::BookIndex,
    data::{Book, BookAlias, VerseRange, WHOLE_CHAPTER_END},
};

// Conventions:
// - parsers consume whitespace in front of themselves, never behind
// - nothing here fails loudly: an `Error` only means "not a reference at this position"

/// Numeric part of everything following the book name
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChapterSpec {
    chapter: u32,
    verse: Option<u32>,
    /// Number after the dash, and the verse following it (if any)
    range: Option<(u32, Option<u32>)>,
}

impl ChapterSpec {
    fn resolve<'books>(self, book: BookAlias<'books>) -> VerseRange<'books> {
        let Self {
            chapter,
            verse,
            range,
        } = self;
        let (start_verse, end) = match (verse, range) {
            (None, None) => (1, (chapter, WHOLE_CHAPTER_END)),
            // "로마서 8-10": the number after the dash is a chapter
            (None, Some((end_chapter, None))) => (1, (end_chapter, WHOLE_CHAPTER_END)),
            (None, Some((end_chapter, Some(end_verse)))) => (1, (end_chapter, end_verse)),
            (Some(verse), None) => (verse, (chapter, verse)),
            // "요한복음 3:16-18": the number after the dash is a verse
            (Some(verse), Some((end_verse, None))) => (verse, (chapter, end_verse)),
            (Some(verse), Some((end_chapter, Some(end_verse)))) => {
                (verse, (end_chapter, end_verse))
            }
        };
        VerseRange::new(book, (chapter, start_verse), end)
    }
}

fn number<
    'source,
    E: ParseError<&'source str> + FromExternalError<&'source str, ParseIntError>,
>(
    input: &'source str,
) -> IResult<&'source str, u32, E> {
    map_res(digit1, u32::from_str)(input)
}

/// Any run of whitespace, including the ideographic and no-break spaces IMEs produce
fn space<'source, E: ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, &'source str, E> {
    take_while(char::is_whitespace)(input)
}

/// Parses chapter/verse delimiter
///
/// Any of ':', '장', '절' or just whitespace; the delimiter itself is optional.
fn delimiter<'source, E: ParseError<&'source str>>(
    input: &'source str,
) -> IResult<&'source str, (), E> {
    tuple((space, opt(one_of(":장절")), space))
        .map(|_| ())
        .parse(input)
}

fn verse_spec<
    'source,
    E: ParseError<&'source str> + FromExternalError<&'source str, ParseIntError>,
>(
    input: &'source str,
) -> IResult<&'source str, u32, E> {
    preceded(delimiter, number)(input)
}

/// Parses range continuation
///
/// - Starts from a dash, possibly preceded by a '장'/'절' marker closing the previous number
/// - The first number is either end chapter or end verse, depending on what came before
fn range_spec<
    'source,
    E: ParseError<&'source str> + ContextError<&'source str> + FromExternalError<&'source str, ParseIntError>,
>(
    input: &'source str,
) -> IResult<&'source str, (u32, Option<u32>), E> {
    context(
        "range",
        preceded(
            tuple((
                space,
                opt(one_of("장절")),
                space,
                char('-'),
                space,
            )),
            tuple((number, opt(verse_spec))),
        ),
    )(input)
}

fn chapter_spec<
    'source,
    E: ParseError<&'source str> + ContextError<&'source str> + FromExternalError<&'source str, ParseIntError>,
>(
    input: &'source str,
) -> IResult<&'source str, ChapterSpec, E> {
    context(
        "chapter",
        preceded(
            space,
            tuple((number, opt(verse_spec), opt(range_spec))),
        ),
    )
    .map(|(chapter, verse, range)| ChapterSpec {
        chapter,
        verse,
        range,
    })
    .parse(input)
}

/// Parses a single reference: book alias followed by chapter specification
///
/// Book aliases are tried longest first; a shorter alias gets its chance if the numbers fail to parse after a longer one.
fn reference<
    'index,
    'books: 'index,
    E: ParseError<&'index str> + ContextError<&'index str> + FromExternalError<&'index str, ParseIntError>,
>(
    index: &'index BookIndex<'books>,
) -> impl Parser<&'index str, VerseRange<'books>, E> {
    move |input: &'index str| {
        for (book, rest) in index.prefixes(input) {
            match chapter_spec::<E>(rest) {
                Ok((rest, spec)) => return Ok((rest, spec.resolve(book))),
                Err(nom::Err::Error(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Tag)))
    }
}

/// Parses all references of a clause, skipping anything that is not one
fn clause<
    'index,
    'books: 'index,
    E: ParseError<&'index str> + ContextError<&'index str> + FromExternalError<&'index str, ParseIntError>,
>(
    index: &'index BookIndex<'books>,
) -> impl Parser<&'index str, Vec<VerseRange<'books>>, E> {
    fold_many0(
        alt((reference(index).map(Some), anychar.map(|_| None))),
        Vec::new,
        |mut found, range| {
            found.extend(range);
            found
        },
    )
}

/// Turns free-form reference strings into verse ranges of one translation's books
#[derive(Debug)]
pub struct ReferenceParser<'books> {
    index: BookIndex<'books>,
}

impl<'books> ReferenceParser<'books> {
    pub fn new(books: &'books [Book]) -> Self {
        Self {
            index: BookIndex::new(books),
        }
    }

    /// Parses every `;`-separated clause of the query.
    ///
    /// Never fails: unrecognized clauses are dropped, so an empty result means nothing was understood.
    pub fn parse(&self, query: &str) -> Vec<VerseRange<'books>> {
        if self.index.is_empty() {
            log::warn!("no book names loaded, cannot parse '{query}'");
            return Vec::new();
        }
        query
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .flat_map(|part| {
                let found = match clause::<nom::error::Error<&str>>(&self.index).parse(part) {
                    Ok((_, found)) => found,
                    Err(err) => {
                        log::warn!("failed to scan query part '{part}': {err}");
                        Vec::new()
                    }
                };
                if found.is_empty() {
                    log::warn!("could not parse query part '{part}'");
                }
                found
            })
            .collect()
    }
}
