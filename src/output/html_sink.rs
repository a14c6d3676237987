use std::fs;
use std::path::{Path, PathBuf};

use maud::{html, Markup, PreEscaped, DOCTYPE};
use tracing::debug;

use crate::domain::{BlogInfo, Post, PostKind};
use crate::errors::BackupResult;
use crate::output::images::{ImageRef, ImageStore};
use crate::output::traits::OutputSink;
use crate::text::{truncate_encoded, OutputEncoding, MAX_FILENAME_BYTES};

/// Writes every post to its own `<slug>.html` page.
pub struct HtmlSink {
    folder: PathBuf,
    blog: BlogInfo,
    encoding: OutputEncoding,
    images: ImageStore,
}

impl HtmlSink {
    pub fn new(folder: &Path, blog: BlogInfo, encoding: OutputEncoding, images: ImageStore) -> Self {
        Self {
            folder: folder.to_path_buf(),
            blog,
            encoding,
            images,
        }
    }

    /// Slug cut down to a name the filesystem will accept.
    pub fn file_path(&self, post: &Post) -> PathBuf {
        let name = truncate_encoded(&post.slug, MAX_FILENAME_BYTES, self.encoding);
        self.folder.join(format!("{}.html", name))
    }
}

impl OutputSink for HtmlSink {
    fn write_post(&mut self, post: &Post) -> BackupResult<()> {
        let image = post
            .image_url()
            .map(|url| self.images.retrieve(url))
            .transpose()?;

        let page = render_page(&self.blog, post, image.as_ref(), self.encoding);
        let path = self.file_path(post);

        fs::write(&path, self.encoding.encode(&page.into_string()))?;
        debug!(path = %path.display(), "saved post");

        Ok(())
    }
}

/// A complete standalone page: the blog header, the post date, the post.
pub fn render_page(
    blog: &BlogInfo,
    post: &Post,
    image: Option<&ImageRef>,
    encoding: OutputEncoding,
) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset=(encoding.label());
                title { (blog.title) }
            }
            body {
                h1 { (blog.title) }
                h2 { (PreEscaped(&blog.description)) }
                p { (post.date) }
                (render_post(post, image))
            }
        }
    }
}

/// The per-type part of a page followed by its tag list. Feed content is
/// markup already and goes out untouched.
pub fn render_post(post: &Post, image: Option<&ImageRef>) -> Markup {
    html! {
        @match &post.kind {
            PostKind::Regular { title, body } => {
                @if let Some(title) = title {
                    h3 { (PreEscaped(title)) }
                }
                @if let Some(body) = body {
                    (PreEscaped(body))
                }
            }
            PostKind::Photo { caption, .. } => {
                @if let Some(caption) = caption {
                    (PreEscaped(caption))
                }
                @if let Some(image) = image {
                    img alt=(caption.as_deref().unwrap_or_default()) src=(image.relative_path);
                }
            }
            PostKind::Quote { text, source } => {
                blockquote { (PreEscaped(text.as_deref().unwrap_or_default())) }
                @if let Some(source) = source {
                    p { (PreEscaped(source)) }
                }
            }
            PostKind::Link { text, url, description } => {
                @if url.is_some() || text.is_some() {
                    h3 {
                        @if let Some(url) = url {
                            a href=(url) { (PreEscaped(text.as_deref().unwrap_or_default())) }
                        } @else {
                            (PreEscaped(text.as_deref().unwrap_or_default()))
                        }
                    }
                }
                @if let Some(description) = description {
                    p { (PreEscaped(description)) }
                }
            }
            PostKind::Unknown(_) => {}
        }
        @if !post.tags.is_empty() {
            h4 { "Tagged" }
            ul {
                @for tag in &post.tags {
                    li { (PreEscaped(tag)) }
                }
            }
        }
    }
}
