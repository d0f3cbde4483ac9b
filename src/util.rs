use std::{
    fmt::Display,
    io::{Cursor, Write as _},
};

use once_cell::sync::Lazy;
use regex::Regex;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::gen::{GenerationError, Res};

/// Displays a string with XML special characters escaped.
///
/// Characters XML 1.0 cannot carry at all (most of the C0 controls, U+FFFE and U+FFFF) are dropped.
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'s>(pub &'s str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rest = self.0;
        while let Some(position) = rest.find(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'') || is_forbidden(c)) {
            let (clean, tail) = rest.split_at(position);
            f.write_str(clean)?;
            let mut chars = tail.chars();
            let special = chars.next();
            match special {
                Some('&') => f.write_str("&amp;")?,
                Some('<') => f.write_str("&lt;")?,
                Some('>') => f.write_str("&gt;")?,
                Some('"') => f.write_str("&quot;")?,
                Some('\'') => f.write_str("&apos;")?,
                _ => {}
            }
            rest = chars.as_str();
        }
        f.write_str(rest)
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}') && !matches!(c, '\t' | '\n' | '\r')
}

static UNSAFE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{L}\p{N}_-]+").expect("Should be a valid regex")
});

/// Makes a string usable as a file name stem: runs of anything but letters, digits, `-` and `_` become a single `_`
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_RUN
        .replace_all(name, "_")
        .trim_matches('_')
        .to_owned()
}

/// Adapts an [`std::io::Write`] to [`std::fmt::Write`], keeping the io error that broke the formatting
#[derive(Debug)]
pub struct FmtToIo<W> {
    inner: W,
    error: Option<std::io::Error>,
}

impl<W: std::io::Write> FmtToIo<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }
}

impl<W: std::io::Write> std::fmt::Write for FmtToIo<W> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        if let Err(err) = self.inner.write_all(s.as_bytes()) {
            self.error = Some(err);
            return Err(std::fmt::Error);
        }
        Ok(())
    }
}

/// In-memory zip archive with reproducible entries
pub struct Archive {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive").finish_non_exhaustive()
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}

impl Archive {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(zip::DateTime::default()),
        }
    }

    /// Adds a textual entry, written by `write`
    pub fn part<F>(&mut self, name: &str, write: F) -> Res
    where
        F: FnOnce(&mut dyn std::fmt::Write) -> Res,
    {
        self.zip.start_file(name, self.options)?;
        let mut output = FmtToIo::new(&mut self.zip);
        match write(&mut output) {
            Err(GenerationError::Fmt(err)) => Err(output
                .take_error()
                .map_or(GenerationError::Fmt(err), GenerationError::Io)),
            other => other,
        }
    }

    pub fn bytes(&mut self, name: &str, contents: &[u8]) -> Res {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(contents)?;
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>, GenerationError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    macro_rules! test {
        {$name:ident, $function:expr, $input:expr, $output:expr} => {
            #[test]
            fn $name() {
                // arrange

                // act
                let output = $function($input);

                // assert
                assert_eq!(output, $output);
            }
        };
    }

    test! {sanitize_hangul, sanitize_filename, "요한복음_3장", "요한복음_3장"}
    test! {sanitize_spaces, sanitize_filename, "주일 예배: 창세기", "주일_예배_창세기"}
    test! {sanitize_edges, sanitize_filename, "  /창세기 1장/ ", "창세기_1장"}
    test! {sanitize_keeps_dash, sanitize_filename, "a-b_c", "a-b_c"}
    test! {sanitize_nothing_left, sanitize_filename, "!!!", ""}

    test! {escape_plain, |s| Escaped(s).to_string(), "태초에 하나님이", "태초에 하나님이"}
    test! {escape_markup, |s| Escaped(s).to_string(), "<a href=\"x\">&'</a>", "&lt;a href=&quot;x&quot;&gt;&amp;&apos;&lt;/a&gt;"}
    test! {escape_controls, |s| Escaped(s).to_string(), "a\u{1}b\tc\nd", "ab\tc\nd"}
    test! {escape_noncharacters, |s| Escaped(s).to_string(), "빛\u{fffe}이\u{ffff} 있으라", "빛이 있으라"}

    #[test]
    fn archive_entries() {
        // arrange
        let mut archive = Archive::new();

        // act
        archive
            .part("a.xml", |out| Ok(write!(out, "<a>{}</a>", Escaped("&"))?))
            .expect("Should write");
        archive.bytes("b.bin", &[1, 2, 3]).expect("Should write");
        let bytes = archive.finish().expect("Should finish");

        // assert
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("Should be a zip");
        let names: Vec<_> = zip.file_names().map(str::to_owned).collect();
        assert_eq!(names.len(), 2);
        let mut contents = String::new();
        std::io::Read::read_to_string(&mut zip.by_name("a.xml").expect("Should exist"), &mut contents)
            .expect("Should be utf-8");
        assert_eq!(contents, "<a>&amp;</a>");
    }

    #[test]
    fn archives_are_reproducible() {
        let build = || {
            let mut archive = Archive::new();
            archive
                .part("x.xml", |out| Ok(out.write_str("<x/>")?))
                .expect("Should write");
            archive.finish().expect("Should finish")
        };

        assert_eq!(build(), build());
    }
}
