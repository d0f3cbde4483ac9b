use std::collections::{hash_map::Entry, HashMap};

use itertools::Itertools;

use crate::data::{Book, BookAlias};

/// Historical abbreviations for the multi-part epistles, not present in any book list
const EXTRA_ALIASES: &[(&str, &str)] = &[("요1", "요한일서"), ("요2", "요한이서"), ("요3", "요한삼서")];

/// Case-insensitive alias lookup for one translation's books
#[derive(Debug, Default)]
pub struct BookIndex<'books> {
    aliases: HashMap<String, BookAlias<'books>>,
    /// Distinct alias lengths (in chars), longest first
    lengths: Vec<usize>,
}

impl<'books> BookIndex<'books> {
    pub fn new(books: &'books [Book]) -> Self {
        let mut index = Self::default();
        for book in books {
            let alias = BookAlias::from(book);
            index.insert(&book.name, alias);
            index.insert(&book.abbreviation, alias);
            for (extra, _) in EXTRA_ALIASES.iter().filter(|(_, name)| *name == book.name) {
                index.insert(extra, alias);
            }
        }
        index.lengths = index
            .aliases
            .keys()
            .map(|alias| alias.chars().count())
            .unique()
            .sorted_unstable_by(|a, b| b.cmp(a))
            .collect();
        log::debug!(
            "indexed {} aliases for {} books",
            index.aliases.len(),
            books.len()
        );
        index
    }

    fn insert(&mut self, alias: &str, book: BookAlias<'books>) {
        let key = alias.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        match self.aliases.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(book);
            }
            Entry::Occupied(entry) if entry.get().book_id != book.book_id => {
                log::warn!(
                    "alias '{}' of '{}' is already taken by '{}'",
                    entry.key(),
                    book.name,
                    entry.get().name
                );
            }
            Entry::Occupied(_) => {}
        }
    }

    pub fn get(&self, alias: &str) -> Option<BookAlias<'books>> {
        self.aliases.get(&alias.trim().to_lowercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Every alias `input` starts with, longest first, paired with the input past it
    pub fn prefixes<'input>(
        &'input self,
        input: &'input str,
    ) -> impl Iterator<Item = (BookAlias<'books>, &'input str)> + 'input {
        self.lengths.iter().filter_map(move |&length| {
            let (split, _) = input.char_indices().nth(length - 1)?;
            let split = split + input[split..].chars().next()?.len_utf8();
            let (candidate, rest) = input.split_at(split);
            self.aliases
                .get(&candidate.to_lowercase())
                .map(|alias| (*alias, rest))
        })
    }
}
