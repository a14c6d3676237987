pub mod blog;
pub mod post;

pub use blog::BlogInfo;
pub use post::{Post, PostKind, PHOTO_WIDTH, TAG_ELEMENT};
