//! Canonical variant URLs.
//!
//! A selection is navigable: `/products/{handle}?Size=Large&Color=Blue`.
//! `parse_selected_options` is the inverse of `variant_url` for any
//! option set containing only recognized names.

use crate::catalog::{ProductOption, SelectedOption};
use std::fmt::Write;

/// Build the canonical path plus query string for a selection.
///
/// Options are emitted in the order given; an empty selection yields
/// the bare product path.
pub fn variant_url(handle: &str, options: &[SelectedOption]) -> String {
    let mut url = format!("/products/{}", handle);
    for (i, opt) in options.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(&encode_component(&opt.name));
        url.push('=');
        url.push_str(&encode_component(&opt.value));
    }
    url
}

/// Decode a query string into ordered name/value pairs.
///
/// Accepts an optional leading `?`. Pairs that fail percent decoding
/// are dropped.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|p| !p.is_empty())
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode_component(name)?, decode_component(value)?))
        })
        .collect()
}

/// Parse a request's query string back into a selected-options map.
///
/// Unrecognized option names are ignored; recognized names are
/// canonicalized to the product definition's casing. A name given
/// more than once keeps its last value.
pub fn parse_selected_options(
    query: &str,
    definitions: &[ProductOption],
) -> Vec<SelectedOption> {
    let mut selected: Vec<SelectedOption> = Vec::new();
    for (name, value) in parse_query(query) {
        let Some(def) = definitions
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(&name))
        else {
            continue;
        };
        if let Some(existing) = selected
            .iter_mut()
            .find(|o| o.name.eq_ignore_ascii_case(&def.name))
        {
            existing.value = value;
        } else {
            selected.push(SelectedOption::new(def.name.clone(), value));
        }
    }
    selected
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{:02X}", b);
        }
    }
    out
}

fn decode_component(s: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(s.len());
    let mut iter = s.bytes();
    while let Some(b) = iter.next() {
        match b {
            b'%' => {
                let hi = hex_digit(iter.next()?)?;
                let lo = hex_digit(iter.next()?)?;
                bytes.push(hi * 16 + lo);
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }
    String::from_utf8(bytes).ok()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
