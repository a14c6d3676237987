pub mod encoding;
pub mod escape;

pub use encoding::{truncate_encoded, OutputEncoding, MAX_FILENAME_BYTES};
pub use escape::{last_path_segment, unescape};
