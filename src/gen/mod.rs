pub mod layout;
pub mod pptx;

use std::fmt::Write;

use itertools::Itertools;

use layout::DeckRole;

#[derive(Debug, derive_more::From, thiserror::Error)]
pub enum GenerationError {
    #[error("{}", .0)]
    Fmt(std::fmt::Error),
    #[error("{}", .0)]
    Io(std::io::Error),
    #[error("{}", .0)]
    Zip(zip::result::ZipError),
    /// Layout was asked for a deck without a single verse
    #[from(ignore)]
    #[error("No verses to lay out for {} deck", .0)]
    EmptyDeck(DeckRole),
}

pub type Res = Result<(), GenerationError>;

/// Writes parts of a document into a textual output, in order
pub trait OutputGenerator<Part: ?Sized, Context> {
    fn write_to<W: Write + ?Sized>(&self, output: &mut W, context: &mut Context, part: &Part) -> Res;

    fn write_parts_to<'part, W, I>(&self, output: &mut W, context: &mut Context, parts: I) -> Res
    where
        W: Write + ?Sized,
        I: IntoIterator<Item = &'part Part>,
        Part: 'part,
    {
        parts
            .into_iter()
            .map(|part| self.write_to(output, context, part))
            .try_collect()
    }
}
