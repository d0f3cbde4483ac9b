#![allow(dead_code)]

use bible2ppt::{Book, FetchedVerse, StaticSource, Translation};

pub const BOOKS: &[(&str, &str, &str)] = &[
    ("창세기", "창", "Gen"),
    ("출애굽기", "출", "Exod"),
    ("시편", "시", "Ps"),
    ("요한복음", "요", "John"),
    ("로마서", "롬", "Rom"),
    ("요한일서", "요일", "1John"),
    ("요한이서", "요이", "2John"),
    ("요한삼서", "요삼", "3John"),
];

/// Korean book list, as the primary translation carries it
pub fn korean_books() -> Vec<Book> {
    BOOKS
        .iter()
        .enumerate()
        .map(|(i, (name, abbreviation, _))| Book {
            id: format!("ko-{i}"),
            name: (*name).into(),
            abbreviation: (*abbreviation).into(),
            order: i as u32 + 1,
        })
        .collect()
}

/// Same books, English codes
pub fn english_books() -> Vec<Book> {
    BOOKS
        .iter()
        .enumerate()
        .map(|(i, (name, _, code))| Book {
            id: format!("en-{i}"),
            name: (*name).into(),
            abbreviation: (*code).into(),
            order: i as u32 + 1,
        })
        .collect()
}

pub fn translations() -> Vec<Translation> {
    vec![
        Translation {
            id: "krv".into(),
            name: "개역개정".into(),
            identifier: "rvsn".into(),
            source: "static".into(),
            books: korean_books(),
        },
        Translation {
            id: "niv".into(),
            name: "NIV".into(),
            identifier: "niv".into(),
            source: "static".into(),
            books: english_books(),
        },
    ]
}

/// Genesis 1-2 and John 3, both translations
pub fn library() -> StaticSource {
    let mut source = StaticSource::new();
    let chapter = |prefix: &str, count: u32| -> Vec<FetchedVerse> {
        (1..=count)
            .map(|verse| FetchedVerse::new(verse, format!("{prefix} {verse}절 말씀")))
            .collect()
    };
    source.insert("rvsn", "창", 1, chapter("창세기 1장", 31));
    source.insert("rvsn", "창", 2, chapter("창세기 2장", 25));
    source.insert("rvsn", "요", 3, chapter("요한복음 3장", 36));
    source.insert("niv", "Gen", 1, chapter("Genesis 1", 31));
    source.insert("niv", "Gen", 2, chapter("Genesis 2", 25));
    source.insert("niv", "John", 3, chapter("John 3", 36));
    source
}
