// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the company-list extraction engine against
//! realistic minified-bundle inputs.

use allot::extract::companies::{extract, CompanyEntry};

fn entry(code: &str, name: &str) -> CompanyEntry {
    CompanyEntry {
        code: code.to_string(),
        name: name.to_string(),
    }
}

/// Build a bundle-like string: minified JS noise around a payload.
fn wrap_in_bundle(payload: &str) -> String {
    let mut bundle = String::new();
    bundle.push_str("!function(e){var t={};function n(r){if(t[r])return t[r].exports;");
    bundle.push_str("var o=t[r]={i:r,l:!1,exports:{}};");
    // Filler to push the payload deep into the text
    for i in 0..200 {
        bundle.push_str(&format!("e[{i}]=function(n){{return n*{i}}};"));
    }
    bundle.push_str(payload);
    bundle.push_str("n.m=e,n.c=t,n.d=function(e,t,r){{}}}([]);");
    bundle
}

#[test]
fn escaped_literal_in_large_bundle() {
    let payload = r#"const a=JSON.parse('[{\"clientId\":\"101\",\"name\":\"Acme Corp\"},{\"clientId\":\"102\",\"name\":\"Beta Ltd\"},{\"clientId\":\"103\",\"name\":\"Gamma Inc\"}]');"#;
    let bundle = wrap_in_bundle(payload);

    let entries = extract(&bundle);
    assert_eq!(
        entries,
        vec![
            entry("101", "Acme Corp"),
            entry("102", "Beta Ltd"),
            entry("103", "Gamma Inc"),
        ]
    );
}

#[test]
fn n_unique_objects_yield_n_entries_in_source_order() {
    let objects: Vec<String> = (0..25)
        .map(|i| format!(r#"{{\"clientId\":\"{i}\",\"name\":\"Issuer {i}\"}}"#))
        .collect();
    let payload = format!("JSON.parse('[{}]')", objects.join(","));
    let bundle = wrap_in_bundle(&payload);

    let entries = extract(&bundle);
    assert_eq!(entries.len(), 25);
    for (i, e) in entries.iter().enumerate() {
        assert_eq!(e.code, i.to_string());
        assert_eq!(e.name, format!("Issuer {i}"));
    }
}

#[test]
fn inline_objects_without_wrapper() {
    let payload = r#"var list=[{"clientId":"201","name":"Delta Foods"},{"clientId":"202","name":"Epsilon Metals"}];"#;
    let bundle = wrap_in_bundle(payload);

    let entries = extract(&bundle);
    assert_eq!(
        entries,
        vec![
            entry("201", "Delta Foods"),
            entry("202", "Epsilon Metals"),
        ]
    );
}

#[test]
fn dedup_first_name_wins_across_inline_duplicates() {
    let payload = r#"[{"clientId":"301","name":"First Name"},{"clientId":"302","name":"Unique"},{"clientId":"301","name":"Second Name"}]"#;
    let bundle = wrap_in_bundle(payload);

    let entries = extract(&bundle);
    assert_eq!(
        entries,
        vec![entry("301", "First Name"), entry("302", "Unique")]
    );
}

#[test]
fn spec_example_escaped_literal() {
    let input = r#"...JSON.parse('[{\"clientId\":\"123\",\"name\":\"Acme Corp\"},{\"clientId\":\"456\",\"name\":\"Beta Ltd\"}]')..."#;
    let entries = extract(input);
    assert_eq!(
        entries,
        vec![entry("123", "Acme Corp"), entry("456", "Beta Ltd")]
    );
}

#[test]
fn spec_example_inline_object() {
    let input = r#"[{"clientId":"789", "name":"Gamma Inc"}]"#;
    assert_eq!(extract(input), vec![entry("789", "Gamma Inc")]);
}

#[test]
fn robustness_against_non_matching_inputs() {
    assert!(extract("").is_empty());
    assert!(extract("random noise with no JSON").is_empty());
    assert!(extract("JSON.parse('not actually valid json')").is_empty());
    // Near-miss shapes
    assert!(extract(r#"{"clientId":"only","noName":true}"#).is_empty());
    assert!(extract(r#"JSON.parse('{}')"#).is_empty());
}

#[test]
fn idempotent_over_identical_input() {
    let bundle = wrap_in_bundle(
        r#"JSON.parse('[{\"clientId\":\"7\",\"name\":\"Stable Industries\"}]')"#,
    );
    let first = extract(&bundle);
    let second = extract(&bundle);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn multi_megabyte_input_with_no_payload() {
    // ~3 MB of plausible minified noise; must return empty without panicking.
    let noise = "var a=1;function b(c){return c+1};".repeat(100_000);
    assert!(extract(&noise).is_empty());
}
