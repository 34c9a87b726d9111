//! Constant-time confirm token comparison.

use subtle::ConstantTimeEq;

/// Compare `supplied` against `expected` without leaking where they differ.
///
/// On a length mismatch a comparison of `expected` against itself is still
/// performed so the cost does not reveal the configured token's length.
pub fn tokens_match(expected: &[u8], supplied: &[u8]) -> bool {
    if expected.len() != supplied.len() {
        let _ = std::hint::black_box(expected.ct_eq(expected));
        return false;
    }
    expected.ct_eq(supplied).into()
}
