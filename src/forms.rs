//! Form field mutation.

use crate::provider::{DocumentObjects, FormFieldObject};

/// Set the value of the form field with the given fully qualified name.
///
/// A missing field is not an error: the write is simply dropped and the
/// call still reports success, matching the lenient contract of the wire
/// surface.
pub fn set_form_field_value<D: DocumentObjects>(doc: &D, name: &str, value: &str) -> bool {
    match doc.field_by_name(name) {
        Some(mut field) => {
            field.set_value(value);
            true
        }
        None => {
            log::debug!("no form field named {:?}, dropping write", name);
            true
        }
    }
}
