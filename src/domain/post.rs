use crate::sources::XmlNode;
use crate::text::{last_path_segment, unescape};

/// Element name a post's tags are stored under.
pub const TAG_ELEMENT: &str = "tag";

/// Preferred `max-width` of the `photo-url` variant to archive.
pub const PHOTO_WIDTH: u32 = 1280;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKind {
    Regular {
        title: Option<String>,
        body: Option<String>,
    },
    Photo {
        caption: Option<String>,
        url: Option<String>,
    },
    Quote {
        text: Option<String>,
        source: Option<String>,
    },
    Link {
        text: Option<String>,
        url: Option<String>,
        description: Option<String>,
    },
    /// A post type we do not transcribe; it keeps its slug, date and tags.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: String,
    pub date: String,
    pub tags: Vec<String>,
    pub kind: PostKind,
}

impl Post {
    pub fn new(slug: String, date: String, kind: PostKind) -> Self {
        Self {
            slug,
            date,
            tags: Vec::new(),
            kind,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn from_node(node: &XmlNode) -> Self {
        let kind = match node.attr("type").unwrap_or_default() {
            "regular" => PostKind::Regular {
                title: field(node, "regular-title"),
                body: field(node, "regular-body"),
            },
            "photo" => PostKind::Photo {
                caption: field(node, "photo-caption"),
                url: photo_url(node).map(|u| unescape(u.text()).trim().to_string()),
            },
            "quote" => PostKind::Quote {
                text: field(node, "quote-text"),
                source: field(node, "quote-source"),
            },
            "link" => PostKind::Link {
                text: field(node, "link-text"),
                url: field(node, "link-url"),
                description: field(node, "link-description"),
            },
            other => PostKind::Unknown(other.to_string()),
        };

        let tags = node
            .children_named(TAG_ELEMENT)
            .map(|tag| unescape(tag.text()))
            .collect();

        Post::new(slug(node), node.attr("date-gmt").unwrap_or_default().to_string(), kind)
            .with_tags(tags)
    }

    pub fn type_name(&self) -> &str {
        match &self.kind {
            PostKind::Regular { .. } => "regular",
            PostKind::Photo { .. } => "photo",
            PostKind::Quote { .. } => "quote",
            PostKind::Link { .. } => "link",
            PostKind::Unknown(name) => name,
        }
    }

    /// URL of the image to archive, for photo posts that have one.
    pub fn image_url(&self) -> Option<&str> {
        match &self.kind {
            PostKind::Photo { url, .. } => url.as_deref().filter(|u| !u.is_empty()),
            _ => None,
        }
    }
}

/// Unescaped text of a child element; absent and empty are the same.
fn field(node: &XmlNode, name: &str) -> Option<String> {
    node.find_child(name)
        .map(|child| unescape(child.text()))
        .filter(|s| !s.is_empty())
}

fn slug(node: &XmlNode) -> String {
    let from_url = node
        .attr("url-with-slug")
        .or_else(|| node.attr("url"))
        .map(last_path_segment)
        .filter(|s| !s.is_empty());

    from_url
        .or_else(|| node.attr("id"))
        .unwrap_or_default()
        .to_string()
}

/// The `PHOTO_WIDTH` variant if present, otherwise the widest one listed,
/// otherwise whichever comes first.
fn photo_url(node: &XmlNode) -> Option<&XmlNode> {
    let variants: Vec<&XmlNode> = node.children_named("photo-url").collect();

    variants
        .iter()
        .copied()
        .find(|n| max_width(n) == Some(PHOTO_WIDTH))
        .or_else(|| {
            variants
                .iter()
                .copied()
                .filter(|n| max_width(n).is_some())
                .max_by_key(|n| max_width(n))
        })
        .or_else(|| variants.first().copied())
}

fn max_width(node: &XmlNode) -> Option<u32> {
    node.attr("max-width").and_then(|w| w.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_post(xml: &str) -> Post {
        let root = XmlNode::parse(xml.as_bytes()).unwrap();
        Post::from_node(root.find_child("post").unwrap())
    }

    #[test]
    fn test_regular_post() {
        let post = parse_post(
            r#"<post type="regular" url-with-slug="http://demo.tumblr.com/post/1/hello" date-gmt="2011-03-01 10:00:00 GMT">
                <regular-title>Hello</regular-title>
                <regular-body>&lt;p&gt;World&lt;/p&gt;</regular-body>
                <tag>a</tag><tag>b</tag>
            </post>"#,
        );

        assert_eq!(post.slug, "hello");
        assert_eq!(post.date, "2011-03-01 10:00:00 GMT");
        assert_eq!(post.tags, vec!["a", "b"]);
        assert_eq!(
            post.kind,
            PostKind::Regular {
                title: Some("Hello".to_string()),
                body: Some("<p>World</p>".to_string()),
            }
        );
        assert_eq!(post.type_name(), "regular");
    }

    #[test]
    fn test_empty_fields_are_none() {
        let post = parse_post(r#"<post type="regular" url-with-slug="x/y"><regular-body></regular-body></post>"#);
        assert_eq!(post.kind, PostKind::Regular { title: None, body: None });
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_photo_prefers_1280_variant() {
        let post = parse_post(
            r#"<post type="photo" url-with-slug="x/pic">
                <photo-caption>&lt;p&gt;Sunset&lt;/p&gt;</photo-caption>
                <photo-url max-width="500">http://media.test/500/photo123</photo-url>
                <photo-url max-width="1280">http://media.test/1280/photo123</photo-url>
                <photo-url max-width="75">http://media.test/75/photo123</photo-url>
            </post>"#,
        );

        assert_eq!(post.image_url(), Some("http://media.test/1280/photo123"));
        match post.kind {
            PostKind::Photo { caption, .. } => assert_eq!(caption.as_deref(), Some("<p>Sunset</p>")),
            other => panic!("expected photo, got {:?}", other),
        }
    }

    #[test]
    fn test_photo_falls_back_to_widest_variant() {
        let post = parse_post(
            r#"<post type="photo" url-with-slug="x/pic">
                <photo-url max-width="400">http://media.test/400</photo-url>
                <photo-url max-width="500">http://media.test/500</photo-url>
                <photo-url max-width="100">http://media.test/100</photo-url>
            </post>"#,
        );
        assert_eq!(post.image_url(), Some("http://media.test/500"));
    }

    #[test]
    fn test_photo_without_url() {
        let post = parse_post(r#"<post type="photo" url-with-slug="x/pic"></post>"#);
        assert_eq!(post.image_url(), None);
    }

    #[test]
    fn test_link_post() {
        let post = parse_post(
            r#"<post type="link" url-with-slug="x/l">
                <link-url>http://rust-lang.org/?a=1&amp;b=2</link-url>
            </post>"#,
        );
        assert_eq!(
            post.kind,
            PostKind::Link {
                text: None,
                url: Some("http://rust-lang.org/?a=1&b=2".to_string()),
                description: None,
            }
        );
    }

    #[test]
    fn test_quote_post() {
        let post = parse_post(
            r#"<post type="quote" url-with-slug="x/q">
                <quote-text>To be</quote-text>
                <quote-source>Hamlet</quote-source>
            </post>"#,
        );
        assert_eq!(
            post.kind,
            PostKind::Quote {
                text: Some("To be".to_string()),
                source: Some("Hamlet".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_type_keeps_common_fields() {
        let post = parse_post(
            r#"<post type="video" url-with-slug="http://demo.tumblr.com/post/9/clip" date-gmt="d">
                <tag>film</tag>
            </post>"#,
        );
        assert_eq!(post.kind, PostKind::Unknown("video".to_string()));
        assert_eq!(post.slug, "clip");
        assert_eq!(post.tags, vec!["film"]);
        assert_eq!(post.type_name(), "video");
    }

    #[test]
    fn test_slug_falls_back_to_id() {
        let post = parse_post(r#"<post type="regular" id="42" url="http://demo.tumblr.com/post/42/"></post>"#);
        assert_eq!(post.slug, "42");
    }

    #[test]
    fn test_tags_are_unescaped() {
        let post = parse_post(r#"<post type="regular" url-with-slug="x/t"><tag>R&amp;D</tag></post>"#);
        assert_eq!(post.tags, vec!["R&D"]);
    }
}
