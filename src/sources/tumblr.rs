use tracing::debug;
use url::Url;

use crate::domain::{BlogInfo, Post};
use crate::errors::{BackupError, BackupResult};
use crate::sources::traits::Fetcher;
use crate::sources::xml::XmlNode;

/// Most posts the read API hands out per request.
pub const PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedInfo {
    pub total: u64,
    pub blog: Option<BlogInfo>,
}

/// One page of posts, covering offsets `first..=last`.
#[derive(Debug, Clone)]
pub struct PostBatch {
    pub first: u64,
    pub last: u64,
    pub posts: Vec<Post>,
}

/// Reader for the `/api/read` XML endpoint of one blog.
pub struct TumblrFeed {
    endpoint: String,
    fetcher: Box<dyn Fetcher>,
}

impl TumblrFeed {
    pub fn new(endpoint: impl Into<String>, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            endpoint: endpoint.into(),
            fetcher,
        }
    }

    /// Build the request URL for `num` posts starting at `start`.
    fn page_url(&self, num: u64, start: u64) -> BackupResult<String> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[("num", num.to_string()), ("start", start.to_string())],
        )
        .map_err(|e| BackupError::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;

        Ok(url.into())
    }

    fn fetch_document(&self, num: u64, start: u64) -> BackupResult<XmlNode> {
        let url = self.page_url(num, start)?;
        let bytes = self.fetcher.fetch(&url)?;
        XmlNode::parse(&bytes)
    }

    /// Ask for a single post to learn the post count and blog details.
    pub fn discover(&self) -> BackupResult<FeedInfo> {
        let document = self.fetch_document(1, 0)?;

        let posts = document
            .find_descendant("posts")
            .ok_or_else(|| BackupError::MalformedFeed("missing <posts> element".to_string()))?;

        let total = posts
            .attr("total")
            .ok_or_else(|| BackupError::MalformedFeed("<posts> has no total".to_string()))?;
        let total = total.trim().parse::<u64>().map_err(|_| {
            BackupError::MalformedFeed(format!("post total is not a number: {:?}", total))
        })?;

        let blog = document.find_descendant("tumblelog").map(BlogInfo::from_node);

        debug!(total, has_blog_info = blog.is_some(), "discovered feed");
        Ok(FeedInfo { total, blog })
    }

    /// Fetch one page starting at `start`, `PAGE_SIZE` posts wide.
    pub fn fetch_page(&self, start: u64) -> BackupResult<Vec<Post>> {
        let document = self.fetch_document(PAGE_SIZE, start)?;

        let posts = match document.find_descendant("posts") {
            Some(posts) => posts.descendants_named("post"),
            None => document.descendants_named("post"),
        };

        Ok(posts.into_iter().map(Post::from_node).collect())
    }

    /// Lazily walk the feed from `start` until `total` is reached.
    pub fn pages(&self, start: u64, total: u64) -> Pages<'_> {
        Pages {
            feed: self,
            offset: start,
            total,
            failed: false,
        }
    }
}

/// Iterator over the remaining pages of a feed. Stops after the first error.
pub struct Pages<'a> {
    feed: &'a TumblrFeed,
    offset: u64,
    total: u64,
    failed: bool,
}

impl Iterator for Pages<'_> {
    type Item = BackupResult<PostBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.total {
            return None;
        }

        let first = self.offset;
        let last = (first + PAGE_SIZE - 1).min(self.total - 1);
        self.offset += PAGE_SIZE;

        match self.feed.fetch_page(first) {
            Ok(posts) => Some(Ok(PostBatch { first, last, posts })),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
