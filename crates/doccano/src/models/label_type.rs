//! Label types: the per-project vocabulary of categories, spans and relations.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

/// Which label-type family a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelTypeKind {
    Category,
    Span,
    Relation,
}

impl LabelTypeKind {
    /// `category-type`, `span-type` or `relation-type`.
    pub fn as_str(self) -> &'static str {
        match self {
            LabelTypeKind::Category => "category-type",
            LabelTypeKind::Span => "span-type",
            LabelTypeKind::Relation => "relation-type",
        }
    }

    pub fn list_resource(self, project_id: i64) -> String {
        format!("projects/{project_id}/{}s", self.as_str())
    }

    pub fn item_resource(self, project_id: i64, label_type_id: i64) -> String {
        format!("projects/{project_id}/{}s/{label_type_id}", self.as_str())
    }

    pub fn upload_resource(self, project_id: i64) -> String {
        format!("projects/{project_id}/{}-upload", self.as_str())
    }
}

impl std::fmt::Display for LabelTypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier half of a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixKey {
    #[serde(rename = "ctrl")]
    Ctrl,
    #[serde(rename = "shift")]
    Shift,
    #[serde(rename = "ctrl shift")]
    CtrlShift,
}

impl std::str::FromStr for PrefixKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ctrl" => Ok(PrefixKey::Ctrl),
            "shift" => Ok(PrefixKey::Shift),
            "ctrl shift" => Ok(PrefixKey::CtrlShift),
            other => Err(ValidationError::PrefixKey(other.to_string())),
        }
    }
}

/// Key half of a keyboard shortcut: a digit or a lowercase ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuffixKey(char);

impl SuffixKey {
    pub fn as_char(self) -> char {
        self.0
    }
}

impl TryFrom<char> for SuffixKey {
    type Error = ValidationError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii_digit() || c.is_ascii_lowercase() {
            Ok(SuffixKey(c))
        } else {
            Err(ValidationError::SuffixKey(c.to_string()))
        }
    }
}

impl TryFrom<String> for SuffixKey {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => SuffixKey::try_from(c),
            _ => Err(ValidationError::SuffixKey(s)),
        }
    }
}

impl From<SuffixKey> for String {
    fn from(key: SuffixKey) -> Self {
        key.0.to_string()
    }
}

/// A category, span or relation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub prefix_key: Option<PrefixKey>,
    #[serde(default)]
    pub suffix_key: Option<SuffixKey>,
    #[serde(default = "random_color")]
    pub background_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

/// A random `#rrggbb` colour.
pub fn random_color() -> String {
    let value: u32 = rand::rng().random_range(0..=0x00FF_FFFF);
    format!("#{value:06x}")
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn is_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl LabelType {
    /// A new label type with a random background colour.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let mut label_type = Self {
            id: None,
            text: text.into(),
            prefix_key: None,
            suffix_key: None,
            background_color: random_color(),
            text_color: default_text_color(),
        };
        label_type.normalize()?;
        Ok(label_type)
    }

    #[must_use]
    pub fn shortcut(
        mut self,
        prefix_key: Option<PrefixKey>,
        suffix_key: Option<SuffixKey>,
    ) -> Self {
        self.prefix_key = prefix_key;
        self.suffix_key = suffix_key;
        self
    }

    #[must_use]
    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    #[must_use]
    pub fn text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// True when a prefix or suffix key is set.
    pub fn has_shortcut(&self) -> bool {
        self.prefix_key.is_some() || self.suffix_key.is_some()
    }

    /// Trim the text and check every field.
    pub fn normalize(&mut self) -> Result<(), ValidationError> {
        self.text = self.text.trim().to_string();
        let len = self.text.chars().count();
        if !(1..=100).contains(&len) {
            return Err(ValidationError::Length {
                field: "text",
                min: 1,
                max: 100,
            });
        }
        if self.prefix_key.is_some() && self.suffix_key.is_none() {
            return Err(ValidationError::PrefixWithoutSuffix);
        }
        for color in [&self.background_color, &self.text_color] {
            if !is_color(color) {
                return Err(ValidationError::Color(color.clone()));
            }
        }
        Ok(())
    }
}
