//! Worklist-driven definition registry.
//!
//! The registry drains an explicit batch worklist instead of recursing
//! through the type graph, so stack depth stays bounded and the fixed point
//! is observable: each drain snapshots the pending set into a batch, sorts it
//! by qualified name, and emits one definition per shape while the emitter
//! refills the queue with newly discovered types. A shape already emitted or
//! already pending is never enqueued twice, which bounds the number of drain
//! iterations by the number of distinct reachable types.

use std::collections::HashSet;

use optschema_core::record::{definition_key, OptionState, RecordShape};

use crate::diagnostics::Diagnostics;
use crate::emitter::{self, FieldFilter};
use crate::json::JsonObjectWriter;
use crate::reader;

/// Options controlling one generator instance.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Document node definitions live under; `$ref` pointers are built as
    /// `#/<definition_node_key>/<key>`. Default: `"definitions"`.
    pub definition_node_key: String,
    /// Indent level definitions are written at. Default: `1`.
    pub indent: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            definition_node_key: "definitions".to_string(),
            indent: 1,
        }
    }
}

/// Record shapes discovered but not yet described.
///
/// `seen` covers pending and emitted shapes both: a type already present in
/// the output buffer is never re-added.
#[derive(Debug, Default)]
pub(crate) struct PendingQueue {
    queued: Vec<RecordShape>,
    seen: HashSet<&'static str>,
}

impl PendingQueue {
    /// Allocate the definition key for `shape`, enqueuing it on first sight.
    ///
    /// Idempotent: repeated calls return the same key without re-enqueuing.
    pub(crate) fn add(&mut self, shape: RecordShape) -> String {
        if self.seen.insert(shape.qualified_name) {
            self.queued.push(shape);
        }
        definition_key(shape.qualified_name)
    }

    /// Snapshot and clear the pending set, sorted by qualified name.
    fn take_batch(&mut self) -> Vec<RecordShape> {
        let mut batch = std::mem::take(&mut self.queued);
        batch.sort_by_key(|shape| shape.qualified_name);
        batch
    }
}

/// Hands out `$ref` pointers during emission, enqueuing newly discovered
/// shapes into the owning registry's pending set.
pub struct DefinitionSink<'a> {
    prefix: &'a str,
    queue: &'a mut PendingQueue,
}

impl DefinitionSink<'_> {
    /// Pointer to `shape`'s definition, enqueuing the shape if unseen.
    pub fn reference(&mut self, shape: RecordShape) -> String {
        format!("{}{}", self.prefix, self.queue.add(shape))
    }
}

/// Deduplicating schema generator for one run.
///
/// Exclusively owns its pending set, output buffer, and diagnostics; runs
/// needing to execute in parallel each use their own instance.
pub struct SchemaGenerator {
    options: GeneratorOptions,
    pointer_prefix: String,
    pending: PendingQueue,
    buf: String,
    entries: usize,
    diagnostics: Diagnostics,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Self {
        let pointer_prefix = format!("#/{}/", options.definition_node_key);
        SchemaGenerator {
            options,
            pointer_prefix,
            pending: PendingQueue::default(),
            buf: String::new(),
            entries: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// `$ref` prefix definitions are addressed under.
    pub fn pointer_prefix(&self) -> &str {
        &self.pointer_prefix
    }

    pub fn definition_node_key(&self) -> &str {
        &self.options.definition_node_key
    }

    /// Request a definition for `T`, returning its key. Idempotent.
    pub fn add_record<T: OptionState>(&mut self) -> String {
        self.add_shape(RecordShape::of::<T>())
    }

    /// Request a definition for `shape`, returning its key. Idempotent.
    pub fn add_shape(&mut self, shape: RecordShape) -> String {
        self.pending.add(shape)
    }

    /// Drain the pending set to its fixed point and return the accumulated
    /// definition entries, ready to embed under the definitions node of a
    /// larger schema document.
    pub fn describe(&mut self) -> &str {
        loop {
            let batch = self.pending.take_batch();
            if batch.is_empty() {
                break;
            }
            for shape in batch {
                self.emit_definition(shape);
            }
        }
        &self.buf
    }

    fn emit_definition(&mut self, shape: RecordShape) {
        let key = definition_key(shape.qualified_name);
        let fields = reader::read_fields(shape, &mut self.diagnostics);
        let mut sink = DefinitionSink {
            prefix: &self.pointer_prefix,
            queue: &mut self.pending,
        };
        let diagnostics = &mut self.diagnostics;
        let mut writer =
            JsonObjectWriter::with_entries(&mut self.buf, self.options.indent, self.entries);
        writer.object(&key, |w| {
            w.string("type", "object");
            w.object("properties", |w| {
                emitter::emit_properties(
                    shape.qualified_name,
                    &fields,
                    w,
                    Some(&mut sink),
                    None,
                    diagnostics,
                );
            });
            w.bool("additionalProperties", false);
        });
        self.entries += 1;
    }

    /// Render the full document: every definition keyed in one JSON object.
    pub fn render_document(&mut self) -> String {
        let body = self.describe();
        if body.is_empty() {
            "{}".to_string()
        } else {
            format!("{{{}\n}}", body)
        }
    }

    /// Parse the rendered document, for callers embedding it as a value.
    ///
    /// Fails only if a caller-supplied description broke JSON syntax, since
    /// descriptions are written verbatim.
    pub fn document_value(&mut self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.render_document())
    }

    /// Build a standalone properties fragment for `shape`, requesting `$ref`
    /// pointers through this generator's pending set.
    ///
    /// Referenced record types become definitions on the next [`describe`]
    /// call.
    ///
    /// [`describe`]: SchemaGenerator::describe
    pub fn properties_fragment(
        &mut self,
        shape: RecordShape,
        filter: Option<&FieldFilter<'_>>,
    ) -> String {
        let fields = reader::read_fields(shape, &mut self.diagnostics);
        let mut out = String::new();
        out.push('{');
        let wrote = {
            let mut sink = DefinitionSink {
                prefix: &self.pointer_prefix,
                queue: &mut self.pending,
            };
            let mut writer = JsonObjectWriter::new(&mut out, 1);
            emitter::emit_properties(
                shape.qualified_name,
                &fields,
                &mut writer,
                Some(&mut sink),
                filter,
                &mut self.diagnostics,
            );
            writer.entries() > 0
        };
        if wrote {
            out.push('\n');
        }
        out.push('}');
        out
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Drain accumulated findings.
    pub fn take_diagnostics(&mut self) -> Vec<crate::diagnostics::Diagnostic> {
        self.diagnostics.take()
    }
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new()
    }
}
