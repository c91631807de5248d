//! Value kinds for option state fields.
//!
//! Every declared field carries exactly one [`ValueKind`], which fixes both
//! the emitted JSON `"type"` name and any extra schema nodes (`enum`,
//! `items`, `additionalProperties`) the generator writes for it.

use std::fmt;

use strum_macros::{EnumIter, IntoStaticStr};

use crate::record::RecordShape;

/// JSON primitive type names used in emitted `"type"` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl JsonType {
    /// Lower-case name as it appears in schema text.
    pub fn json_name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// Element type of an ordered-collection field.
///
/// Collections hold either plain strings or nested option records; anything
/// else the declaring side could not resolve is carried as [`Unresolved`]
/// and degrades to a bare `array` node with a logged diagnostic.
///
/// [`Unresolved`]: ElementKind::Unresolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Collection of plain strings.
    Str,
    /// Collection of nested option records, emitted as a `$ref`.
    Record(RecordShape),
    /// The element type could not be determined from the declared signature.
    Unresolved,
}

/// Semantic kind of one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain scalar with a fixed JSON primitive type.
    Scalar(JsonType),
    /// Enum field; constants are captured lower-cased in declaration order.
    Enum(Vec<String>),
    /// Ordered collection of [`ElementKind`] elements.
    Collection(ElementKind),
    /// String-keyed map. Values are always described as strings.
    Map,
}

impl ValueKind {
    /// JSON `"type"` name for a property of this kind.
    pub fn json_name(&self) -> &'static str {
        match self {
            ValueKind::Scalar(ty) => ty.json_name(),
            ValueKind::Enum(_) => "string",
            ValueKind::Collection(_) => "array",
            ValueKind::Map => "object",
        }
    }

    /// Capture the constants of an iterable enum, lower-cased, in the order
    /// the enum declares them.
    pub fn enum_of<E>() -> Self
    where
        E: strum::IntoEnumIterator + fmt::Display,
    {
        ValueKind::Enum(E::iter().map(|v| v.to_string().to_lowercase()).collect())
    }
}
