//! Description normalization.
//!
//! REST v2 returns issue descriptions as plain strings, REST v3 as Atlassian
//! Document Format trees (`{"type": "doc", "content": [...]}`). Both become
//! plain text here, so the summarizer always receives readable prose.

use serde_json::Value;

/// Node types that end a line of text.
const BLOCK_NODES: &[&str] = &[
    "paragraph",
    "heading",
    "blockquote",
    "codeBlock",
    "listItem",
    "rule",
    "tableRow",
    "panel",
];

/// Converts a description field to plain text. `null` and unknown shapes yield
/// an empty string.
pub fn to_plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Object(_) => {
            let mut out = String::new();
            walk(value, &mut out);
            tidy(&out)
        }
        _ => String::new(),
    }
}

fn walk(node: &Value, out: &mut String) {
    let node_type = node.get("type").and_then(Value::as_str).unwrap_or_default();
    match node_type {
        "text" => {
            if let Some(text) = node.get("text").and_then(Value::as_str) {
                out.push_str(text);
            }
        }
        "hardBreak" => out.push('\n'),
        "mention" | "emoji" => {
            if let Some(text) = node.pointer("/attrs/text").and_then(Value::as_str) {
                out.push_str(text);
            }
        }
        "tableCell" | "tableHeader" => {
            walk_children(node, out);
            out.push(' ');
        }
        _ => {
            if node_type == "listItem" {
                out.push_str("- ");
            }
            walk_children(node, out);
        }
    }
    if BLOCK_NODES.contains(&node_type) && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn walk_children(node: &Value, out: &mut String) {
    if let Some(children) = node.get("content").and_then(Value::as_array) {
        for child in children {
            walk(child, out);
        }
    }
}

/// Trims trailing spaces per line and collapses runs of blank lines.
fn tidy(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().is_some_and(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(to_plain_text(&json!("  Steps to reproduce  ")), "Steps to reproduce");
    }

    #[test]
    fn null_is_empty() {
        assert_eq!(to_plain_text(&Value::Null), "");
    }

    #[test]
    fn document_tree_is_flattened() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Login fails for "},
                    {"type": "mention", "attrs": {"text": "@ops"}},
                    {"type": "hardBreak"},
                    {"type": "text", "text": "after upgrade."}
                ]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "Chrome"}]}
                    ]},
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "Firefox"}]}
                    ]}
                ]}
            ]
        });
        assert_eq!(
            to_plain_text(&doc),
            "Login fails for @ops\nafter upgrade.\n- Chrome\n- Firefox"
        );
    }

    #[test]
    fn empty_document_is_empty() {
        assert_eq!(to_plain_text(&json!({"type": "doc", "content": []})), "");
    }
}
