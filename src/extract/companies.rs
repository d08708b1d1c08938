// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Company-list extraction from the registrar's minified JavaScript bundle.
//!
//! The registrar's status site ships its list of live IPO issues inside a
//! compiled front-end bundle rather than behind a documented endpoint. The
//! embedding style has been observed in two forms across deployments: a
//! single escaped `JSON.parse('[...]')` literal, and many small inline
//! object literals. This module tries both, in order, and degrades to an
//! empty result when neither shape is present — a bundle with no match is
//! a valid "no companies available" outcome, not an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;

/// A single IPO issue extracted from the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEntry {
    /// Registrar-assigned issue code (the bundle's `clientId` field).
    pub code: String,
    /// Human-readable issuer name.
    pub name: String,
}

/// Matches a `JSON.parse('<array>')` call whose array elements carry
/// `clientId` keys. The quotes inside the single-quoted literal may be
/// backslash-escaped, fully or partially, depending on how the bundler
/// emitted the string.
fn escaped_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)JSON\.parse\('(\[.*?\{\\?"clientId\\?".*?\}.*?\])'\)"#)
            .expect("escaped literal regex is valid")
    })
}

/// Cheap existence probe for an array-shaped run of `clientId`/`name`
/// objects. Short-circuits the per-match scan on bundles that cannot
/// possibly contain the list.
fn inline_array_probe_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)\[\{.*?"clientId"\s*:\s*"[^"]+".*?"name"\s*:\s*"[^"]+".*?\}\]"#)
            .expect("inline array probe regex is valid")
    })
}

/// Matches one inline `{"clientId":"...","name":"..."}` object literal,
/// tolerant of whitespace around the colons and the comma.
fn inline_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\s*"clientId"\s*:\s*"([^"]+)"\s*,\s*"name"\s*:\s*"([^"]+)"\s*\}"#)
            .expect("inline object regex is valid")
    })
}

/// Extract the deduplicated list of IPO issues from raw bundle text.
///
/// Pure and infallible: holds no state across calls, performs no I/O, and
/// never panics on malformed input. Strategy order:
///
/// 1. Escaped `JSON.parse('[...]')` literal — de-escape and parse as JSON.
///    A literal that matches the outer shape but fails to parse disqualifies
///    this strategy only; the failure does not escape.
/// 2. Inline object scan — only when strategy 1 produced nothing.
///
/// Whichever strategy produced entries, duplicates by issue code are dropped,
/// keeping the first occurrence in extraction order.
pub fn extract(raw_text: &str) -> Vec<CompanyEntry> {
    let mut entries = extract_escaped_literal(raw_text);
    if entries.is_empty() {
        entries = extract_inline_objects(raw_text);
    }
    dedup_by_code(entries)
}

/// Strategy 1: locate an escaped JSON array literal inside a
/// `JSON.parse('...')` call and parse it.
fn extract_escaped_literal(raw_text: &str) -> Vec<CompanyEntry> {
    let caps = match escaped_literal_re().captures(raw_text) {
        Some(c) => c,
        None => return Vec::new(),
    };
    let literal = caps.get(1).map_or("", |m| m.as_str());

    // The bundler escapes quotes inside the single-quoted literal. Stripping
    // every backslash restores plain JSON; issue codes and names never carry
    // legitimate backslashes.
    let json_text = literal.replace('\\', "");

    let parsed: Value = match serde_json::from_str(&json_text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("escaped-literal candidate is not valid JSON: {e}");
            return Vec::new();
        }
    };

    let items = match parsed.as_array() {
        Some(a) => a,
        None => return Vec::new(),
    };

    let mut entries = Vec::new();
    for item in items {
        let code = item.get("clientId").and_then(Value::as_str).unwrap_or("");
        let name = item.get("name").and_then(Value::as_str).unwrap_or("");
        if !code.is_empty() && !name.is_empty() {
            entries.push(CompanyEntry {
                code: code.to_string(),
                name: name.to_string(),
            });
        }
    }
    entries
}

/// Strategy 2: scan for inline `{"clientId":"...","name":"..."}` object
/// literals, left to right.
fn extract_inline_objects(raw_text: &str) -> Vec<CompanyEntry> {
    if !inline_array_probe_re().is_match(raw_text) {
        return Vec::new();
    }

    inline_object_re()
        .captures_iter(raw_text)
        .map(|caps| CompanyEntry {
            code: caps[1].to_string(),
            name: caps[2].to_string(),
        })
        .collect()
}

/// Keep the first entry seen for each distinct issue code, preserving the
/// relative order of first appearances.
fn dedup_by_code(entries: Vec<CompanyEntry>) -> Vec<CompanyEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.code.clone()))
        .collect()
}
