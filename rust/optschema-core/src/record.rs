//! Record shapes: the self-describing interface option state types implement.
//!
//! Instead of runtime introspection, every option record type exposes a
//! static, explicit field list through [`OptionState`]. The generator only
//! ever sees [`RecordShape`] values, so the whole type graph is known at
//! compile time.

use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::kinds::{ElementKind, JsonType, ValueKind};

/// Static shape of one option record type.
///
/// Identity, equality, and hashing are by [`qualified_name`]; the generator
/// relies on qualified names being unique across one run.
///
/// [`qualified_name`]: RecordShape::qualified_name
#[derive(Debug, Clone, Copy)]
pub struct RecordShape {
    /// Fully-qualified type name, unique across the reachable type graph.
    pub qualified_name: &'static str,
    /// Declared fields, in declaration order.
    pub fields: fn() -> Vec<FieldDescriptor>,
}

impl RecordShape {
    pub fn of<T: OptionState>() -> Self {
        RecordShape {
            qualified_name: T::QUALIFIED_NAME,
            fields: T::fields,
        }
    }
}

impl PartialEq for RecordShape {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

impl Eq for RecordShape {}

impl Hash for RecordShape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified_name.hash(state);
    }
}

/// Implemented once per option record type.
pub trait OptionState {
    /// Fully-qualified name, unique across the type graph of one run.
    const QUALIFIED_NAME: &'static str;

    /// Declared fields in declaration order.
    fn fields() -> Vec<FieldDescriptor>;

    fn shape() -> RecordShape
    where
        Self: Sized,
    {
        RecordShape::of::<Self>()
    }
}

/// One declared property of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Property name, unique within its record.
    pub name: String,
    pub kind: ValueKind,
    /// Human-readable description, written into the schema when non-empty.
    pub description: Option<String>,
    /// Ignored fields are omitted from output entirely.
    pub ignore: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind,
            description: None,
            ignore: false,
        }
    }

    pub fn scalar(name: impl Into<String>, ty: JsonType) -> Self {
        Self::new(name, ValueKind::Scalar(ty))
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::scalar(name, JsonType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::scalar(name, JsonType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::scalar(name, JsonType::Boolean)
    }

    /// Enum field whose constants come from a strum-iterable enum.
    pub fn enum_of<E>(name: impl Into<String>) -> Self
    where
        E: strum::IntoEnumIterator + std::fmt::Display,
    {
        Self::new(name, ValueKind::enum_of::<E>())
    }

    /// Ordered collection of strings.
    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Collection(ElementKind::Str))
    }

    /// Ordered collection of nested option records.
    pub fn list_of<T: OptionState>(name: impl Into<String>) -> Self {
        Self::new(
            name,
            ValueKind::Collection(ElementKind::Record(RecordShape::of::<T>())),
        )
    }

    /// Collection whose element type the declaring side failed to resolve.
    pub fn unresolved_list(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Collection(ElementKind::Unresolved))
    }

    /// String-keyed map field.
    pub fn string_map(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Map)
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Validate declared invariants.
    ///
    /// Violations degrade to diagnostics at read time; they never abort a
    /// generation run.
    pub fn check(&self) -> Result<(), ShapeError> {
        if self.name.is_empty() {
            return Err(ShapeError::EmptyFieldName);
        }
        match &self.kind {
            ValueKind::Collection(ElementKind::Unresolved) => Err(ShapeError::UnresolvedElement),
            ValueKind::Enum(constants) if constants.is_empty() => Err(ShapeError::EmptyEnum),
            _ => Ok(()),
        }
    }
}

/// Data-quality findings for one declared field.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    #[error("field name is empty")]
    EmptyFieldName,
    #[error("collection element type is unresolved")]
    UnresolvedElement,
    #[error("enum field declares no constants")]
    EmptyEnum,
}

/// Derive the JSON-pointer-safe definition key for a fully-qualified name.
///
/// Namespace separators (`::`, `.`) and `/` become single underscores, so
/// `app::editor::EditorOptions` keys as `app_editor_EditorOptions`. Distinct
/// qualified names are assumed not to collapse to one key; the assumption is
/// not checked.
pub fn definition_key(qualified_name: &str) -> String {
    let mut key = String::with_capacity(qualified_name.len());
    let mut chars = qualified_name.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' => {
                if chars.peek() == Some(&':') {
                    chars.next();
                }
                key.push('_');
            }
            '.' | '/' => key.push('_'),
            _ => key.push(c),
        }
    }
    key
}
