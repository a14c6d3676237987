use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{Terminator, WriterBuilder};

use crate::domain::{Post, PostKind};
use crate::errors::BackupResult;
use crate::output::images::{ImageRef, ImageStore};
use crate::output::traits::OutputSink;
use crate::text::OutputEncoding;

pub const CSV_HEADERS: [&str; 12] = [
    "Slug",
    "Date (GMT)",
    "Regular Title",
    "Regular Body",
    "Photo Caption",
    "Photo URL",
    "Quote Text",
    "Quote Source",
    "Link Text",
    "Link URL",
    "Link Description",
    "Tags",
];

/// Separator between tags in the last column.
pub const TAG_SEPARATOR: &str = "|";

/// Appends one row per post to a single sheet.
pub struct CsvSink {
    path: PathBuf,
    encoding: OutputEncoding,
    images: ImageStore,
}

impl CsvSink {
    /// Start a fresh sheet at `path`, replacing any earlier one, and write
    /// the header row.
    pub fn create(path: &Path, encoding: OutputEncoding, images: ImageStore) -> BackupResult<Self> {
        let sink = Self {
            path: path.to_path_buf(),
            encoding,
            images,
        };

        sink.write_record(File::create(&sink.path)?, &CSV_HEADERS)?;
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record<S: AsRef<str>>(&self, file: File, cells: &[S]) -> BackupResult<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(file);

        writer.write_record(cells.iter().map(|cell| self.encoding.encode(cell.as_ref())))?;
        writer.flush()?;

        Ok(())
    }
}

impl OutputSink for CsvSink {
    fn write_post(&mut self, post: &Post) -> BackupResult<()> {
        let image = post
            .image_url()
            .map(|url| self.images.retrieve(url))
            .transpose()?;

        let row = csv_row(post, image.as_ref());
        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;

        self.write_record(file, &row)
    }
}

/// The twelve cells for `post`. Columns belonging to other post types stay
/// empty so every row lines up with the header.
pub fn csv_row(post: &Post, image: Option<&ImageRef>) -> [String; 12] {
    let cell = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut row: [String; 12] = Default::default();
    row[0] = post.slug.clone();
    row[1] = post.date.clone();

    match &post.kind {
        PostKind::Regular { title, body } => {
            row[2] = cell(title);
            row[3] = cell(body);
        }
        PostKind::Photo { caption, .. } => {
            row[4] = cell(caption);
            row[5] = image.map(|i| i.relative_path.clone()).unwrap_or_default();
        }
        PostKind::Quote { text, source } => {
            row[6] = cell(text);
            row[7] = cell(source);
        }
        PostKind::Link {
            text,
            url,
            description,
        } => {
            row[8] = cell(text);
            row[9] = cell(url);
            row[10] = cell(description);
        }
        PostKind::Unknown(_) => {}
    }

    row[11] = post.tags.join(TAG_SEPARATOR);
    row
}
