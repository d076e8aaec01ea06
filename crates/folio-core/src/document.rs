//! The nested portfolio document as edited and displayed

use serde::{Deserialize, Serialize};

/// A single project entry with its ordered tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Project {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
        }
    }

    /// Builder-style: set tags
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// The full portfolio content
///
/// The model has no optional strings: anything missing in the store is
/// surfaced as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Document {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            about: Vec::new(),
            projects: Vec::new(),
        }
    }

    /// Builder-style: set about paragraphs
    #[must_use]
    pub fn with_about<I, S>(mut self, about: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.about = about.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style: set projects
    #[must_use]
    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    /// Map a load result to what readers and editors are shown.
    ///
    /// `None` (nothing persisted yet) becomes the empty document, and an
    /// empty `about` list is replaced by one empty paragraph so the editing
    /// surface always has an entry to type into.
    pub fn presented(loaded: Option<Document>) -> Document {
        let mut document = loaded.unwrap_or_default();
        if document.about.is_empty() {
            document.about.push(String::new());
        }
        document
    }
}

/// A document that passed the validation gate
///
/// Only [`crate::validation`] constructs this type, so holding one is proof
/// that every size and shape constraint was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDocument(Document);

impl ValidDocument {
    pub(crate) fn new_unchecked(document: Document) -> Self {
        Self(document)
    }

    pub fn into_inner(self) -> Document {
        self.0
    }
}

impl AsRef<Document> for ValidDocument {
    fn as_ref(&self) -> &Document {
        &self.0
    }
}

impl std::ops::Deref for ValidDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.0
    }
}
