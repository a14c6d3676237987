pub mod http;
pub mod traits;
pub mod tumblr;
pub mod xml;

pub use http::HttpFetcher;
pub use traits::Fetcher;
pub use tumblr::{FeedInfo, Pages, PostBatch, TumblrFeed, PAGE_SIZE};
pub use xml::XmlNode;
