//! Variant selection.

use crate::catalog::{Product, SelectedOption, Variant};
use crate::selection::url::variant_url;

/// Result of resolving a chosen option map against a product.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSelection {
    /// The matched variant, if the selection resolves to exactly one.
    pub variant: Option<Variant>,
    /// Per-option affordance states for rendering.
    pub options: Vec<OptionDisplay>,
}

/// One product option with the state of each of its values.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDisplay {
    /// Option name.
    pub name: String,
    /// Value states, in catalog order.
    pub values: Vec<OptionValueState>,
}

/// State of a single option value relative to the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionValueState {
    /// The value itself.
    pub value: String,
    /// Whether choosing this value resolves to a sellable variant.
    pub is_available: bool,
    /// Whether this value is part of the active selection.
    pub is_active: bool,
    /// URL of the selection with this value swapped in.
    pub to: String,
}

/// Find the variant whose selected-options set exactly matches the
/// chosen map.
///
/// Unrecognized option names are ignored and values are matched
/// case-insensitively. An empty chosen map resolves to the product's
/// default variant. An incomplete or unmatched selection returns
/// `None` rather than guessing.
pub fn select_variant<'a>(
    product: &'a Product,
    chosen: &[SelectedOption],
) -> Option<&'a Variant> {
    let recognized = recognized_options(product, chosen);
    if recognized.is_empty() {
        return product.default_variant();
    }
    find_exact(product, &recognized)
}

/// Resolve a selection and compute the option affordance states.
pub fn select(product: &Product, chosen: &[SelectedOption]) -> VariantSelection {
    let recognized = recognized_options(product, chosen);
    let variant = if recognized.is_empty() {
        product.default_variant()
    } else {
        find_exact(product, &recognized)
    };

    // Affordances pivot around the active selection: the matched
    // variant's options, or the partial chosen map when nothing
    // matched.
    let active: Vec<SelectedOption> = variant
        .map(|v| v.selected_options.clone())
        .unwrap_or(recognized);

    let options = product
        .options
        .iter()
        .map(|def| {
            let values = def
                .values
                .iter()
                .map(|value| {
                    let candidate = with_value(product, &active, &def.name, value);
                    let target = find_exact(product, &candidate);
                    OptionValueState {
                        value: value.clone(),
                        is_available: target.is_some_and(|v| v.available_for_sale),
                        is_active: active.iter().any(|o| {
                            o.name.eq_ignore_ascii_case(&def.name)
                                && o.value.eq_ignore_ascii_case(value)
                        }),
                        to: variant_url(&product.handle, &candidate),
                    }
                })
                .collect();
            OptionDisplay {
                name: def.name.clone(),
                values,
            }
        })
        .collect();

    VariantSelection {
        variant: variant.cloned(),
        options,
    }
}

/// Canonical URL of the product's default variant, used by callers
/// that redirect when a request carries no (or no matching) selection.
pub fn first_variant_url(product: &Product) -> Option<String> {
    product
        .default_variant()
        .map(|v| variant_url(&product.handle, &v.selected_options))
}

/// Filter the chosen map down to recognized option names, keeping the
/// last value per name and canonicalizing names to catalog casing.
fn recognized_options(product: &Product, chosen: &[SelectedOption]) -> Vec<SelectedOption> {
    let mut recognized: Vec<SelectedOption> = Vec::new();
    for opt in chosen {
        let Some(def) = product
            .options
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(&opt.name))
        else {
            continue;
        };
        if let Some(existing) = recognized
            .iter_mut()
            .find(|o| o.name.eq_ignore_ascii_case(&def.name))
        {
            existing.value = opt.value.clone();
        } else {
            recognized.push(SelectedOption::new(def.name.clone(), opt.value.clone()));
        }
    }
    recognized
}

/// Exact set match: every variant option must be chosen and agree,
/// which also means a partial selection never matches.
fn find_exact<'a>(product: &'a Product, chosen: &[SelectedOption]) -> Option<&'a Variant> {
    product.variants.iter().find(|v| {
        v.selected_options.len() == chosen.len()
            && v.selected_options.iter().all(|vo| {
                chosen.iter().any(|co| {
                    co.name.eq_ignore_ascii_case(&vo.name)
                        && co.value.eq_ignore_ascii_case(&vo.value)
                })
            })
    })
}

/// The active selection with one option swapped to `value`, ordered
/// by the product's option definitions.
fn with_value(
    product: &Product,
    active: &[SelectedOption],
    name: &str,
    value: &str,
) -> Vec<SelectedOption> {
    product
        .options
        .iter()
        .filter_map(|def| {
            if def.name.eq_ignore_ascii_case(name) {
                Some(SelectedOption::new(def.name.clone(), value.to_string()))
            } else {
                active
                    .iter()
                    .find(|o| o.name.eq_ignore_ascii_case(&def.name))
                    .map(|o| SelectedOption::new(def.name.clone(), o.value.clone()))
            }
        })
        .collect()
}
