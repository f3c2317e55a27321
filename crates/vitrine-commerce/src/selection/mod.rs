//! Variant selection and navigation identity.
//!
//! Maps chosen option name/value pairs to the single matching variant,
//! produces the per-value affordance states the option UI needs, and
//! round-trips a selection through the canonical variant URL.

mod selector;
mod url;

pub use selector::{
    first_variant_url, select, select_variant, OptionDisplay, OptionValueState,
    VariantSelection,
};
pub use url::{parse_query, parse_selected_options, variant_url};
