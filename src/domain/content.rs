//! # Result Content
//!
//! What a command produces: plain text or a structured embed. Only the transport renders it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Embed(Embed),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Embed {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.fields.is_empty()
            && self.footer.is_none()
    }
}

impl Content {
    /// Nothing worth sending.
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) => text.trim().is_empty(),
            Content::Embed(embed) => embed.is_empty(),
        }
    }

    /// Render as markdown for transports without native embeds.
    pub fn to_markdown(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Embed(embed) => {
                let mut blocks = Vec::new();
                match (&embed.title, &embed.url) {
                    (Some(title), Some(url)) => blocks.push(format!("**[{title}]({url})**")),
                    (Some(title), None) => blocks.push(format!("**{title}**")),
                    _ => {}
                }
                if let Some(description) = &embed.description {
                    blocks.push(description.clone());
                }
                for field in &embed.fields {
                    blocks.push(format!("**{}**\n{}", field.name, field.value));
                }
                if let Some(footer) = &embed.footer {
                    blocks.push(format!("_{footer}_"));
                }
                blocks.join("\n\n")
            }
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Embed> for Content {
    fn from(embed: Embed) -> Self {
        Content::Embed(embed)
    }
}
