//! Optschema Generator
//!
//! Turns a graph of self-describing option state types into a deduplicated
//! JSON-Schema definitions document. Nested record types are discovered
//! transitively through a batch worklist and described exactly once, however
//! many fields reference them; references are emitted as `$ref` pointers.
//!
//! ```
//! use optschema_gen::{FieldDescriptor, OptionState, SchemaGenerator};
//!
//! struct TerminalOptions;
//!
//! impl OptionState for TerminalOptions {
//!     const QUALIFIED_NAME: &'static str = "terminal::TerminalOptions";
//!
//!     fn fields() -> Vec<FieldDescriptor> {
//!         vec![
//!             FieldDescriptor::string("shell").with_description("Shell executable"),
//!             FieldDescriptor::boolean("audible_bell"),
//!         ]
//!     }
//! }
//!
//! let mut generator = SchemaGenerator::new();
//! generator.add_record::<TerminalOptions>();
//! let document = generator.render_document();
//! assert!(document.contains("\"terminal_TerminalOptions\""));
//! assert!(generator.diagnostics().is_empty());
//! ```

pub mod diagnostics;
pub mod emitter;
pub mod json;
pub mod reader;
pub mod registry;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use emitter::{emit_properties, properties_fragment, FieldFilter};
pub use registry::{DefinitionSink, GeneratorOptions, SchemaGenerator};

// Core vocabulary, re-exported so downstream callers depend on one crate.
pub use optschema_core::kinds::{ElementKind, JsonType, ValueKind};
pub use optschema_core::record::{
    definition_key, FieldDescriptor, OptionState, RecordShape, ShapeError,
};
