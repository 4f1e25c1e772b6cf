//! Field extraction from request contexts

use super::context::{Context, ContextKey, REQUEST_ID_KEY, TRACE_ID_KEY};
use super::fields::{FieldValue, Fields};

/// Derive string-valued fields from `ctx`.
///
/// The trace and request identifiers come first when present, followed by
/// `keys` in the given order. Keys with no value in `ctx` are skipped, and a
/// configured key equal to one of the built-in keys is not emitted twice.
/// Non-string values are rendered with their display form.
pub fn extract_fields(ctx: &Context, keys: &[ContextKey]) -> Fields {
    let mut fields = Fields::new();

    for key in [TRACE_ID_KEY, REQUEST_ID_KEY]
        .iter()
        .chain(keys.iter().filter(|k| **k != TRACE_ID_KEY && **k != REQUEST_ID_KEY))
    {
        if let Some(value) = ctx.value(key) {
            fields.push(key.name(), FieldValue::String(value.to_display_string()));
        }
    }

    fields
}
