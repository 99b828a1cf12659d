//! Response normalization
//!
//! Turns the model's loosely-formatted text output into a validated
//! `ProjectDetails`: locate the JSON object span, repair common formatting
//! defects, parse, and apply the domain defaulting rules.

use crate::domain::{LaborItem, Material, ProjectDetails, RawEstimate};
use crate::error::{ApiError, ApiResult};

/// Locate the candidate JSON object in the raw model text: everything from
/// the first `{` to the last `}`, inclusive.
pub fn extract_json_span(raw: &str) -> ApiResult<&str> {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start <= end => Ok(&raw[start..=end]),
        _ => Err(ApiError::Extraction(
            "No JSON object found in model response".to_string(),
        )),
    }
}

/// Repair formatting defects models commonly produce: `//` line comments and
/// trailing commas before a closing `}` or `]`. Both repairs are
/// string-aware so content inside JSON string literals is left alone.
pub fn repair_json(candidate: &str) -> String {
    strip_trailing_commas(&strip_line_comments(candidate))
}

fn strip_line_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Drop everything to end of line, keeping the newline.
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse the repaired candidate text. This step deliberately soft-fails:
/// malformed JSON yields `None`, never an error. The caller decides how to
/// surface it.
pub fn parse_candidate(candidate: &str) -> Option<RawEstimate> {
    match serde_json::from_str(candidate) {
        Ok(raw) => Some(raw),
        Err(e) => {
            tracing::warn!(error = %e, "Model output failed to parse as JSON");
            None
        }
    }
}

/// Normalize raw model text into a complete `ProjectDetails`.
pub fn normalize(raw_text: &str) -> ApiResult<ProjectDetails> {
    let candidate = extract_json_span(raw_text)?;
    let repaired = repair_json(candidate);

    let raw = parse_candidate(&repaired).ok_or_else(|| {
        ApiError::Normalization("Model returned malformed JSON".to_string())
    })?;

    let materials: Vec<Material> = raw
        .materials
        .ok_or_else(|| {
            ApiError::Normalization("Model response is missing the materials list".to_string())
        })?
        .into_iter()
        .map(Material::from)
        .collect();

    let labor: Vec<LaborItem> = raw
        .labor
        .ok_or_else(|| {
            ApiError::Normalization("Model response is missing the labor list".to_string())
        })?
        .into_iter()
        .map(LaborItem::from)
        .collect();

    Ok(ProjectDetails {
        project_name: raw.project_name,
        length: raw.length,
        width: raw.width,
        height: raw.height,
        materials,
        labor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn extraction_takes_first_brace_to_last_brace() {
        let raw = "Sure! Here is the estimate: {\"a\": 1} Hope that helps.";
        assert_eq!(extract_json_span(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn extraction_fails_without_braces() {
        let err = extract_json_span("I cannot help with that.").unwrap_err();
        assert!(err.to_string().contains("Extraction failed"));
    }

    #[test]
    fn extraction_fails_on_reversed_braces() {
        assert!(extract_json_span("} nothing here {").is_err());
    }

    #[test]
    fn repair_strips_comments_and_trailing_commas() {
        let repaired = repair_json("{\"a\": 1, // comment\n \"b\": 2,}");
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn repair_leaves_string_contents_alone() {
        let input = r#"{"url": "https://example.com", "note": "a, }"}"#;
        let repaired = repair_json(input);
        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["note"], "a, }");
    }

    #[test]
    fn repair_handles_trailing_comma_before_bracket() {
        let repaired = repair_json(r#"{"items": [1, 2, 3,]}"#);
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&repaired).unwrap(),
            serde_json::json!({"items": [1, 2, 3]})
        );
    }

    #[test]
    fn parse_soft_fails_on_malformed_json() {
        // Unterminated string must not panic or error, just yield nothing.
        assert!(parse_candidate("{\"projectName\": \"Shed").is_none());
    }

    #[test]
    fn normalize_full_response_with_surrounding_prose() {
        let raw = r#"Here you go: {"projectName":"Shed","length":3,"width":2,"height":2.4,"materials":[{"name":"Plywood","unit":"sheet","costPerUnit":25,"quantity":10}],"labor":[{"role":"Carpenter","costPerHour":40,"hours":8}]}"#;
        let details = normalize(raw).unwrap();

        assert_eq!(details.project_name.as_deref(), Some("Shed"));
        assert_eq!(details.length, Some(3.0));
        assert_eq!(details.width, Some(2.0));
        assert_eq!(details.height, Some(2.4));

        assert_eq!(details.materials.len(), 1);
        let material = &details.materials[0];
        assert_eq!(material.name, "Plywood");
        assert_eq!(material.unit, "sheet");
        assert_eq!(material.cost_per_unit, 25.0);
        assert_eq!(material.quantity, Some(10.0));
        assert!(!material.id.is_empty());

        assert_eq!(details.labor.len(), 1);
        let labor = &details.labor[0];
        assert_eq!(labor.role, "Carpenter");
        assert_eq!(labor.cost_per_hour, 40.0);
        assert_eq!(labor.hours, Some(8.0));
        assert!(!labor.id.is_empty());
    }

    #[test]
    fn normalize_generates_distinct_ids_per_entry() {
        let raw = r#"{"materials":[{"quantity":1},{"quantity":2},{"quantity":3}],"labor":[{"hours":1},{"hours":2}]}"#;
        let details = normalize(raw).unwrap();

        let ids: HashSet<&str> = details
            .materials
            .iter()
            .map(|m| m.id.as_str())
            .chain(details.labor.iter().map(|l| l.id.as_str()))
            .collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn normalize_rejects_malformed_json() {
        let err = normalize("{\"projectName\": \"Shed").unwrap_err();
        assert!(err.to_string().contains("Normalization failed"));
    }

    #[test]
    fn normalize_rejects_missing_materials_or_labor() {
        let err = normalize(r#"{"projectName":"Shed","labor":[]}"#).unwrap_err();
        assert!(err.public_message().contains("materials"));

        let err = normalize(r#"{"projectName":"Shed","materials":[]}"#).unwrap_err();
        assert!(err.public_message().contains("labor"));
    }

    #[test]
    fn normalize_keeps_model_supplied_dimensions_optional() {
        let details = normalize(r#"{"materials":[],"labor":[]}"#).unwrap();
        assert_eq!(details.project_name, None);
        assert_eq!(details.length, None);
        assert!(details.materials.is_empty());
    }
}
