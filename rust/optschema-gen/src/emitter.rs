//! Property-fragment emission for one record type.
//!
//! Writes the `properties` entries of a record's object schema. Nested record
//! collections are never inlined: the emitter requests a `$ref` pointer from
//! the definition registry, which enqueues the referenced type for its own
//! definition pass.

use optschema_core::kinds::{ElementKind, ValueKind};
use optschema_core::record::{FieldDescriptor, RecordShape};

use crate::diagnostics::{codes, Diagnostics};
use crate::json::{escape_into, JsonObjectWriter};
use crate::reader;
use crate::registry::DefinitionSink;

/// Per-field filter predicate, applied on top of the `ignore` attribute.
pub type FieldFilter<'a> = dyn Fn(&str) -> bool + 'a;

/// Emit one property entry per non-ignored, filter-accepted field.
///
/// The only side effects are enqueues into `definitions` and logged
/// diagnostics; the output buffer behind `writer` is the caller's.
pub fn emit_properties(
    record: &str,
    fields: &[FieldDescriptor],
    writer: &mut JsonObjectWriter<'_>,
    mut definitions: Option<&mut DefinitionSink<'_>>,
    filter: Option<&FieldFilter<'_>>,
    diagnostics: &mut Diagnostics,
) {
    for field in fields {
        if field.ignore {
            continue;
        }
        if let Some(filter) = filter {
            if !filter(&field.name) {
                continue;
            }
        }
        writer.object(&field.name, |w| {
            w.string("type", field.kind.json_name());
            if let Some(description) = &field.description {
                if !description.is_empty() {
                    w.raw_string("description", description);
                }
            }
            match &field.kind {
                ValueKind::Enum(constants) => {
                    w.raw_array("enum", |out| {
                        for (i, constant) in constants.iter().enumerate() {
                            if i > 0 {
                                out.push(',');
                            }
                            out.push('"');
                            escape_into(constant, out);
                            out.push('"');
                        }
                    });
                }
                ValueKind::Map => {
                    w.object("additionalProperties", |w| w.string("type", "string"));
                }
                ValueKind::Collection(ElementKind::Str) => {
                    w.object("items", |w| w.string("type", "string"));
                }
                ValueKind::Collection(ElementKind::Record(shape)) => {
                    match definitions.as_deref_mut() {
                        Some(sink) => {
                            let pointer = sink.reference(*shape);
                            w.object("items", |w| w.string("$ref", &pointer));
                        }
                        None => {
                            diagnostics.error(
                                codes::NO_DEFINITIONS,
                                record,
                                Some(&field.name),
                                format!(
                                    "collection of {} needs a definition registry",
                                    shape.qualified_name
                                ),
                            );
                        }
                    }
                }
                // Reported by the reader; the bare array node stands.
                ValueKind::Collection(ElementKind::Unresolved) => {}
                ValueKind::Scalar(_) => {}
            }
        });
    }
}

/// Build a standalone `properties` object fragment for `shape`.
///
/// For callers embedding one record's properties directly rather than through
/// the definition registry; record-collection fields degrade with a logged
/// diagnostic since no registry is available to reference.
pub fn properties_fragment(
    shape: RecordShape,
    filter: Option<&FieldFilter<'_>>,
    diagnostics: &mut Diagnostics,
) -> String {
    let fields = reader::read_fields(shape, diagnostics);
    let mut out = String::new();
    out.push('{');
    let wrote = {
        let mut writer = JsonObjectWriter::new(&mut out, 1);
        emit_properties(
            shape.qualified_name,
            &fields,
            &mut writer,
            None,
            filter,
            diagnostics,
        );
        writer.entries() > 0
    };
    if wrote {
        out.push('\n');
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use optschema_core::record::OptionState;

    struct ServerOptions;

    impl OptionState for ServerOptions {
        const QUALIFIED_NAME: &'static str = "net::ServerOptions";

        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::string("host").with_description("Bind address"),
                FieldDescriptor::integer("port"),
                FieldDescriptor::string_map("headers"),
                FieldDescriptor::string("token").ignored(),
            ]
        }
    }

    struct PoolOptions;

    impl OptionState for PoolOptions {
        const QUALIFIED_NAME: &'static str = "net::PoolOptions";

        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::list_of::<ServerOptions>("servers")]
        }
    }

    #[test]
    fn test_fragment_shapes() {
        let mut diags = Diagnostics::new();
        let fragment = properties_fragment(ServerOptions::shape(), None, &mut diags);
        let value: serde_json::Value = serde_json::from_str(&fragment).unwrap();
        assert_eq!(value["host"]["type"], "string");
        assert_eq!(value["host"]["description"], "Bind address");
        assert_eq!(value["port"]["type"], "integer");
        assert_eq!(value["headers"]["type"], "object");
        assert_eq!(value["headers"]["additionalProperties"]["type"], "string");
        assert!(value.get("token").is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_filter_is_independent_of_ignore() {
        let mut diags = Diagnostics::new();
        let only_port = |name: &str| name == "port";
        let fragment = properties_fragment(ServerOptions::shape(), Some(&only_port), &mut diags);
        let value: serde_json::Value = serde_json::from_str(&fragment).unwrap();
        assert!(value.get("host").is_none());
        assert!(value.get("port").is_some());
        assert!(value.get("token").is_none());
    }

    #[test]
    fn test_record_collection_without_registry_degrades() {
        let mut diags = Diagnostics::new();
        let fragment = properties_fragment(PoolOptions::shape(), None, &mut diags);
        let value: serde_json::Value = serde_json::from_str(&fragment).unwrap();
        assert_eq!(value["servers"]["type"], "array");
        assert!(value["servers"].get("items").is_none());
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code, Some(codes::NO_DEFINITIONS));
        assert_eq!(diag.field.as_deref(), Some("servers"));
    }

    #[test]
    fn test_all_fields_filtered_yields_empty_object() {
        let mut diags = Diagnostics::new();
        let none = |_: &str| false;
        let fragment = properties_fragment(ServerOptions::shape(), Some(&none), &mut diags);
        assert_eq!(fragment, "{}");
    }
}
