use serde::{Deserialize, Serialize};

/// Text decorations carried by a rich text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

impl Annotations {
    pub fn is_plain(&self) -> bool {
        *self == Annotations::default()
    }
}

/// What a rich text run actually contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextKind {
    Text {
        content: String,
        link: Option<String>,
    },
    /// A page, user, date or database mention. Only its rendered text is kept.
    Mention { mention_type: String },
    Equation { expression: String },
}

/// One run of inline text inside a block or property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub kind: RichTextKind,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Creates an undecorated text run.
    pub fn plain_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: RichTextKind::Text {
                content: text.clone(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text,
            href: None,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if let RichTextKind::Text { link, .. } = &mut self.kind {
            *link = Some(url.clone());
        }
        self.href = Some(url);
        self
    }
}

/// Concatenates the plain text of every run, dropping all decoration.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}
