pub mod csv_sink;
pub mod html_sink;
pub mod images;
pub mod traits;

pub use csv_sink::{CsvSink, CSV_HEADERS};
pub use html_sink::HtmlSink;
pub use images::{ImageRef, ImageStatus, ImageStore, IMAGE_FOLDER};
pub use traits::OutputSink;

/// What each post is turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One standalone page per post
    Html,
    /// One row per post in a single sheet
    Csv,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Html => "html",
            OutputMode::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
