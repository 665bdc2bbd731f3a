//! Common types for the shared crate

/// Backend record identifier
pub type Id = i64;

/// A closed enumeration with a wire code and a Vietnamese display label.
///
/// Drives filter dropdowns, status badges and `FromStr` parsing for every
/// model enum.
pub trait Labeled: Sized + Copy + PartialEq + 'static {
    /// Every variant, in display order
    const ALL: &'static [Self];

    /// Wire code as sent by the backend
    fn code(&self) -> &'static str;

    /// Display label
    fn label(&self) -> &'static str;

    /// Look up a variant by wire code, case-insensitively
    fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.code().eq_ignore_ascii_case(code))
    }
}
