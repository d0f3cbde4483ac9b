//! Command line front-end: renders a reference from a verse library on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bible2ppt::{FetchedVerse, LayoutOptions, SourceRegistry, StaticSource, TitleSlide, Translation};
use clap::Parser;

/// Source identifier the on-disk library is registered under
const LIBRARY_SOURCE: &str = "static";

#[derive(Debug, Parser)]
#[command(name = "bible2ppt")]
#[command(version, about = "Generates presentation slides from Bible references")]
struct Args {
    /// Reference to render, e.g. "창세기 1:1-5; 요한복음 3:16"
    reference: String,

    /// JSON verse library: translations with their books, and chapter texts
    #[arg(long)]
    library: PathBuf,

    /// Translation ids to use, primary first (default: every translation in the library)
    #[arg(long, value_delimiter = ',')]
    versions: Vec<String>,

    /// TOML file with layout options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Title slide text (default: the reference itself)
    #[arg(long)]
    title: Option<String>,

    /// Produce a zip with one deck per chapter
    #[arg(long)]
    split: bool,

    /// Line budget of a slide, 0 for unlimited
    #[arg(long)]
    max_lines: Option<usize>,

    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct Library {
    translations: Vec<Translation>,
    #[serde(default)]
    chapters: Vec<LibraryChapter>,
}

#[derive(Debug, serde::Deserialize)]
struct LibraryChapter {
    /// Translation identifier
    translation: String,
    /// Book code, as in the translation's book abbreviations
    book: String,
    chapter: u32,
    verses: Vec<FetchedVerse>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid library: {}", .0)]
    Library(#[from] serde_json::Error),
    #[error("Invalid options: {}", .0)]
    Options(#[from] toml::de::Error),
    #[error("None of the versions {requested:?} are in the library")]
    NoVersions { requested: Vec<String> },
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

impl Library {
    fn load(path: &Path) -> Result<Self, CliError> {
        let library: Library = serde_json::from_str(&read(path)?)?;
        log::debug!(
            "loaded {} translations and {} chapters from {}",
            library.translations.len(),
            library.chapters.len(),
            path.display()
        );
        Ok(library)
    }

    /// Moves chapter texts into a registry, leaving translation records behind
    fn registry(&mut self) -> SourceRegistry {
        let mut source = StaticSource::new();
        for chapter in self.chapters.drain(..) {
            source.insert(chapter.translation, chapter.book, chapter.chapter, chapter.verses);
        }
        let mut registry = SourceRegistry::new();
        registry.register(LIBRARY_SOURCE, source);
        registry
    }

    /// Requested translations in the requested order; all of them if none were requested
    fn select(&self, versions: &[String]) -> Result<Vec<Translation>, CliError> {
        if versions.is_empty() {
            return Ok(self.translations.clone());
        }
        let selected: Vec<_> = versions
            .iter()
            .filter_map(|id| {
                let found = self.translations.iter().find(|translation| &translation.id == id);
                if found.is_none() {
                    log::warn!("version '{id}' is not in the library, skipping");
                }
                found.cloned()
            })
            .collect();
        if selected.is_empty() {
            return Err(CliError::NoVersions {
                requested: versions.to_vec(),
            });
        }
        Ok(selected)
    }
}

fn layout_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut options = match &args.options {
        Some(path) => toml::from_str(&read(path)?)?,
        None => LayoutOptions::default(),
    };
    if let Some(title) = &args.title {
        let subtitle = options.title_slide.take().and_then(|slide| slide.subtitle);
        options.title_slide = Some(TitleSlide {
            title: title.clone(),
            subtitle,
        });
    }
    if options.title_slide.is_none() {
        options.title_slide = Some(TitleSlide::new(args.reference.as_str()));
    }
    if args.split {
        options.split_chapters_into_files = true;
    }
    if let Some(max_lines) = args.max_lines {
        options.max_lines_per_slide = max_lines;
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut library = Library::load(&args.library)?;
    let registry = library.registry();
    let translations = library.select(&args.versions)?;
    let options = layout_options(&args)?;

    let output = bible2ppt::render(&args.reference, &translations, &registry, &options)?;

    let path = args.output_dir.join(&output.filename);
    fs::write(&path, &output.buffer)?;
    log::info!("wrote {} bytes ({})", output.buffer.len(), output.content_type);
    println!("{}", path.display());
    Ok(())
}
