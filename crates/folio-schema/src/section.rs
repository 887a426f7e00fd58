//! Sections: ids, kinds, declared shapes and authored content bags
//!
//! A section bag is an open JSON object. Section kinds sit alongside it:
//! known kinds declare the shape of the fields they understand, and
//! [`SectionKind::Custom`] carries any other section through untouched.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Identifier of a section within a template (e.g. `hero`, `projects`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Create new section id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if id is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Kind of section this id names
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        SectionKind::from_id(&self.0)
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// JSON kind expected for a section field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldShape {
    /// String value
    Text,
    /// Numeric value
    Number,
    /// Boolean value
    Flag,
    /// Array value
    List,
    /// Object value
    Record,
}

impl FieldShape {
    /// Shape of a JSON value (`None` for `null`)
    #[must_use]
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Flag),
            Value::Number(_) => Some(Self::Number),
            Value::String(_) => Some(Self::Text),
            Value::Array(_) => Some(Self::List),
            Value::Object(_) => Some(Self::Record),
        }
    }

    /// Check if value fits this shape; `null` fits every shape
    #[inline]
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        FieldShape::of(value).map_or(true, |found| found == *self)
    }

    /// Lowercase name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Flag => "flag",
            Self::List => "list",
            Self::Record => "record",
        }
    }
}

impl Display for FieldShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const HEADLINE_FIELDS: &[(&str, FieldShape)] = &[
    ("name", FieldShape::Text),
    ("title", FieldShape::Text),
    ("subtitle", FieldShape::Text),
    ("description", FieldShape::Text),
    ("image", FieldShape::Text),
];

const ABOUT_FIELDS: &[(&str, FieldShape)] = &[
    ("description", FieldShape::Text),
    ("bio", FieldShape::Text),
    ("image", FieldShape::Text),
    ("highlights", FieldShape::List),
];

const PROJECT_FIELDS: &[(&str, FieldShape)] = &[("projects", FieldShape::List)];

const SKILL_FIELDS: &[(&str, FieldShape)] = &[("skills", FieldShape::List)];

const TESTIMONIAL_FIELDS: &[(&str, FieldShape)] = &[("testimonials", FieldShape::List)];

const CONTACT_FIELDS: &[(&str, FieldShape)] = &[
    ("email", FieldShape::Text),
    ("phone", FieldShape::Text),
    ("location", FieldShape::Text),
    ("social", FieldShape::Record),
];

/// Kind of a section, keyed by its id
///
/// Known kinds declare the shape of the fields they interpret. Any other id
/// is [`SectionKind::Custom`]: preserved as-is, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Landing block: name, title, description, image
    Hero,
    /// Header variant of the landing block used by some template families
    Header,
    /// Biography block
    About,
    /// List of project records
    Projects,
    /// Project list variant used by some template families
    Work,
    /// Skill list
    Skills,
    /// Quotes from clients or colleagues
    Testimonials,
    /// Contact details
    Contact,
    /// Any section id without a declared shape
    Custom(String),
}

impl SectionKind {
    /// Resolve kind from a section id
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        match id {
            "hero" => Self::Hero,
            "header" => Self::Header,
            "about" => Self::About,
            "projects" => Self::Projects,
            "work" => Self::Work,
            "skills" => Self::Skills,
            "testimonials" => Self::Testimonials,
            "contact" => Self::Contact,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Canonical section id for this kind
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Hero => "hero",
            Self::Header => "header",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Work => "work",
            Self::Skills => "skills",
            Self::Testimonials => "testimonials",
            Self::Contact => "contact",
            Self::Custom(id) => id,
        }
    }

    /// Check if this kind is carried opaquely
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Declared field shapes (empty for custom sections)
    #[must_use]
    pub fn declared_fields(&self) -> &'static [(&'static str, FieldShape)] {
        match self {
            Self::Hero | Self::Header => HEADLINE_FIELDS,
            Self::About => ABOUT_FIELDS,
            Self::Projects | Self::Work => PROJECT_FIELDS,
            Self::Skills => SKILL_FIELDS,
            Self::Testimonials => TESTIMONIAL_FIELDS,
            Self::Contact => CONTACT_FIELDS,
            Self::Custom(_) => &[],
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A field whose value does not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMismatch {
    /// Field name within the section
    pub field: String,
    /// Shape the destination expects
    pub expected: FieldShape,
    /// Shape actually found
    pub found: FieldShape,
}

impl Display for ShapeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (expected {}, found {})", self.field, self.expected, self.found)
    }
}

/// Field shapes a destination section expects
///
/// Built from the kind's declared fields, then overridden by the JSON kind of
/// every non-null field in the destination's default bag: the template's own
/// defaults are the most concrete statement of what it renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedShape {
    fields: BTreeMap<String, FieldShape>,
}

impl ExpectedShape {
    /// Expected shape for a destination section
    #[must_use]
    pub fn for_section(kind: &SectionKind, defaults: Option<&SectionContent>) -> Self {
        let mut fields: BTreeMap<String, FieldShape> = kind
            .declared_fields()
            .iter()
            .map(|(name, shape)| ((*name).to_string(), *shape))
            .collect();

        if let Some(defaults) = defaults {
            for (name, value) in defaults.iter() {
                if let Some(shape) = FieldShape::of(value) {
                    fields.insert(name.clone(), shape);
                }
            }
        }

        Self { fields }
    }

    /// Expected shape of one field, if any
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldShape> {
        self.fields.get(name).copied()
    }

    /// Check if nothing is expected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields of `content` that contradict this shape, in field order
    #[must_use]
    pub fn mismatches(&self, content: &SectionContent) -> Vec<ShapeMismatch> {
        content
            .iter()
            .filter_map(|(name, value)| {
                let expected = self.field(name)?;
                let found = FieldShape::of(value)?;
                (expected != found).then(|| ShapeMismatch {
                    field: name.clone(),
                    expected,
                    found,
                })
            })
            .collect()
    }
}

/// Authored content of one section: an open key/value bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionContent(Map<String, Value>);

impl SectionContent {
    /// Create empty (unauthored) section
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON object
    #[inline]
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Section holding a single field
    #[must_use]
    pub fn with_field(name: impl Into<String>, value: Value) -> Self {
        let mut content = Self::new();
        content.insert(name, value);
        content
    }

    /// Check if section has no fields (present but unauthored)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set field value, returning the previous one
    #[inline]
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Iterate over fields
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying object
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON object value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Shallow merge: every field of `overrides` replaces the field of the
    /// same name in `defaults`; nested values are replaced wholesale
    #[must_use]
    pub fn merged(defaults: &SectionContent, overrides: &SectionContent) -> SectionContent {
        let mut merged = defaults.clone();
        for (field, value) in overrides.iter() {
            merged.0.insert(field.clone(), value.clone());
        }
        merged
    }
}

impl TryFrom<Value> for SectionContent {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(SchemaError::NotAnObject { found: "null" }),
            Value::Bool(_) => Err(SchemaError::NotAnObject { found: "boolean" }),
            Value::Number(_) => Err(SchemaError::NotAnObject { found: "number" }),
            Value::String(_) => Err(SchemaError::NotAnObject { found: "string" }),
            Value::Array(_) => Err(SchemaError::NotAnObject { found: "array" }),
        }
    }
}

impl From<Map<String, Value>> for SectionContent {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
