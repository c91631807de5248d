//! Field reading and validation for one record shape.

use optschema_core::record::{FieldDescriptor, RecordShape, ShapeError};

use crate::diagnostics::{codes, Diagnostics};

/// Read a record shape's declared fields, in declaration order.
///
/// All surviving fields are reported, including ignored ones; `ignore` is a
/// pass-through attribute consumed by the emitter. A field with an empty name
/// is dropped with an error; other findings are logged and the field is kept
/// so its output can degrade locally instead of failing the run.
pub fn read_fields(shape: RecordShape, diagnostics: &mut Diagnostics) -> Vec<FieldDescriptor> {
    let declared = (shape.fields)();
    let mut fields = Vec::with_capacity(declared.len());
    for field in declared {
        match field.check() {
            Ok(()) => fields.push(field),
            Err(err @ ShapeError::EmptyFieldName) => {
                diagnostics.error(codes::EMPTY_NAME, shape.qualified_name, None, err.to_string());
            }
            Err(err @ ShapeError::UnresolvedElement) => {
                diagnostics.error(
                    codes::SHAPE_RESOLUTION,
                    shape.qualified_name,
                    Some(&field.name),
                    err.to_string(),
                );
                fields.push(field);
            }
            Err(err @ ShapeError::EmptyEnum) => {
                diagnostics.warning(
                    codes::EMPTY_ENUM,
                    shape.qualified_name,
                    Some(&field.name),
                    err.to_string(),
                );
                fields.push(field);
            }
        }
    }
    fields
}
