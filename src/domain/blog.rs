use crate::sources::XmlNode;
use crate::text::unescape;

/// Blog-wide details repeated at the top of every saved page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogInfo {
    pub title: String,
    pub description: String,
}

impl BlogInfo {
    pub fn new(title: String, description: String) -> Self {
        Self { title, description }
    }

    /// Read from a `<tumblelog title="...">description</tumblelog>` element.
    pub fn from_node(tumblelog: &XmlNode) -> Self {
        Self {
            title: tumblelog.attr("title").unwrap_or_default().to_string(),
            description: unescape(tumblelog.text()),
        }
    }
}
