//! The persisted graph vocabulary.
//!
//! These strings are the durable contract with existing data: any store-facing
//! code must use them verbatim.

// ── Property keys ────────────────────────────────────────────────

pub const URI: &str = "uri";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";

// ── Node labels ──────────────────────────────────────────────────

pub const CLASS: &str = "Class";
pub const OBJECT: &str = "Object";
pub const DATATYPE_PROPERTY: &str = "DatatypeProperty";
pub const OBJECT_PROPERTY: &str = "ObjectProperty";

/// Every label the entity mapper understands, in dispatch priority order.
pub const DOMAIN_LABELS: [&str; 4] = [CLASS, OBJECT, DATATYPE_PROPERTY, OBJECT_PROPERTY];

// ── Relationship types ───────────────────────────────────────────

pub const SUBCLASS_OF: &str = "subClassOf";
pub const TYPE_OF: &str = "typeOf";
pub const DOMAIN: &str = "domain";
pub const RANGE: &str = "range";

/// Length of generated uris, in hex characters.
pub const GENERATED_URI_LEN: usize = 16;

/// Whether `key` is one of the properties every mapped entity reserves.
pub fn is_reserved_key(key: &str) -> bool {
    matches!(key, URI | TITLE | DESCRIPTION)
}
