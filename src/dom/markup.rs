use crate::format::Icon;

#[derive(Clone, Debug, PartialEq)]
pub enum Markup {
    Element(El),
    Text(String),
    /// Pre-serialised content emitted verbatim (script bodies).
    Raw(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct El {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) classes: Vec<String>,
    pub(crate) children: Vec<Markup>,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        for c in class.split_whitespace() {
            if !self.classes.iter().any(|existing| existing == c) {
                self.classes.push(c.to_string());
            }
        }
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Markup::Text(text.to_string()));
        self
    }

    pub fn raw(mut self, raw: &str) -> Self {
        self.children.push(Markup::Raw(raw.to_string()));
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, M>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Markup>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

impl From<El> for Markup {
    fn from(el: El) -> Self {
        Markup::Element(el)
    }
}

/// `<i class="fas fa-…"></i>`
pub fn icon(icon: Icon) -> El {
    El::new("i").class("fas").class(icon.css_class())
}
