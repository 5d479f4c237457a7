//! Capability probe for optional serialization support.

/// Whether spreadsheet (xlsx) serialization was compiled in.
///
/// Pure check, no side effects. Consulted before dispatching to the Excel
/// exporter; the dispatcher substitutes CSV-zip when this reports `false`.
pub fn spreadsheet_available() -> bool {
    cfg!(feature = "xlsx")
}
