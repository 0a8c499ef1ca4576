//! Centralized bands, codes and thresholds for the runtime-type passes.
//!
//! The compile-time table builders and the runtime decoders must agree on
//! these values byte for byte, so they live in one place.

// =============================================================================
// Type category codes
// =============================================================================

/// One byte per class in the type-category table.
///
/// Values below [`FIRST_MASQUERADE_CLASS_ID`] are the special codes listed
/// here; every other value is the identity of the class a masquerading class
/// reports itself as.
pub mod type_category {
    /// Abstract class: never the run-time class of a value.
    pub const ABSTRACT: u8 = 0;
    /// The universal top class.
    pub const OBJECT: u8 = 1;
    /// Closure representation: the reported type is the closure's function type.
    pub const FUNCTION: u8 = 2;
    /// Record representation: the reported type is built from the field values.
    pub const RECORD: u8 = 3;
    /// Ordinary concrete class reporting its own identity.
    pub const NOT_MASQUERADED: u8 = 4;
}

// =============================================================================
// Masquerade band
// =============================================================================

/// Lowest class identity a masquerading class may report.
///
/// Must sit just above the special category codes so the two ranges never
/// overlap inside a single byte.
pub const FIRST_MASQUERADE_CLASS_ID: u32 = type_category::NOT_MASQUERADED as u32 + 1;

/// Highest class identity a masquerading class may report.
///
/// Classes that other classes masquerade as are declared first by the core
/// library, so a small band is enough and keeps the table byte-sized.
pub const MAX_MASQUERADE_CLASS_ID: u32 = 63;

/// Whether `class_id` may be stored as a masquerade target in the category table.
#[inline]
pub const fn is_masquerade_band(class_id: u32) -> bool {
    class_id >= FIRST_MASQUERADE_CLASS_ID && class_id <= MAX_MASQUERADE_CLASS_ID
}
