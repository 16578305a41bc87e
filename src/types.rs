//! Data model shared by the store, the index and the request layer.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One documented API element (hook, function, decorator, ...) of a library version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Slash-segmented path, unique within a library version
    pub path: String,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Raw example text, may embed markup
    #[serde(default, deserialize_with = "null_as_empty")]
    pub example: String,
}

impl ComponentRecord {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind: String::new(),
            description: String::new(),
            example: String::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// Text of a single indexed field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Type => &self.kind,
            Field::Example => &self.example,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Library metadata as listed by the component store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default)]
    pub versions: Vec<String>,
    pub latest_version: String,
}

impl LibraryInfo {
    pub fn new(name: impl Into<String>, latest_version: impl Into<String>) -> Self {
        let latest_version = latest_version.into();
        Self {
            name: name.into(),
            description: None,
            website: None,
            repository: None,
            versions: vec![latest_version.clone()],
            latest_version,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions = versions.into_iter().map(Into::into).collect();
        if !self.versions.contains(&self.latest_version) {
            self.versions.insert(0, self.latest_version.clone());
        }
        self
    }

    /// Whether `version` is a published version of this library.
    pub fn has_version(&self, version: &str) -> bool {
        self.latest_version == version || self.versions.iter().any(|v| v == version)
    }
}

/// Indexed text field of a component record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Description,
    Type,
    Example,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Name, Self::Description, Self::Type, Self::Example];

    /// Relative boost of a match in this field.
    pub const fn weight(self) -> f32 {
        match self {
            Self::Name => 10.0,
            Self::Description => 5.0,
            Self::Type | Self::Example => 1.0,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Type => "type",
            Self::Example => "example",
        }
    }
}

/// Byte offset and byte length of one token occurrence inside a field.
pub type Position = [usize; 2];

/// Matched term -> field -> positions of the occurrences that produced it.
pub type MatchMetadata = BTreeMap<String, BTreeMap<Field, Vec<Position>>>;

/// A ranked match of a query against a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub component: ComponentRecord,
    /// Relevance within the index that produced it, higher is better
    pub score: f32,
    pub matches: MatchMetadata,
    /// Source library, set only on federated results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_version: Option<String>,
}
