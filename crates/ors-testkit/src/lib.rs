//! # ors-testkit: Client Test-Suite Helpers
//!
//! Assertions shared by the openrouteservice client's tests.
//!
//! - [`urls`]: URL equivalence that ignores query-parameter order.
//! - [`unicode`]: decoding of backslash escape sequences.
//! - [`format`]: checking request parameters against the
//!   [`ors_params::ors_parameters`] schema.
//!
//! Every helper comes in two flavours: a fallible function returning a
//! structured result, and an `assert_*` wrapper that panics with a
//! diagnosable message at the caller's location.

pub mod format;
pub mod unicode;
pub mod urls;

pub use format::{assert_valid_format, validate_format};
pub use unicode::{decode_unicode_escapes, EscapeError};
pub use urls::{assert_url_equal, url_equivalent, UrlCompareError};
