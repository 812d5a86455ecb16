//! Reading deliverables out of a generated reply.

use pipeline::{Deliverable, SummarizeError, UNKNOWN_FIELD};
use serde::Deserialize;

/// One element of the array the deliverables prompt asks for. Every field is
/// optional; models drop keys freely.
#[derive(Debug, Default, Deserialize)]
struct DeliverableRecord {
    #[serde(default)]
    deliverable_name: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    date_updated: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl DeliverableRecord {
    fn into_deliverable(self) -> Option<Deliverable> {
        let name = self.deliverable_name.filter(|n| !n.trim().is_empty())?;
        Some(Deliverable::new(
            name.trim(),
            self.due_date.as_deref(),
            self.date_updated.as_deref(),
            self.status
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        ))
    }
}

/// Parses the JSON array embedded in `reply`.
///
/// Text around the array (prose, code fences) is ignored: everything from the
/// first `[` to the last `]` is decoded. Elements without a name are dropped.
pub fn parse_reply(reply: &str) -> Result<Vec<Deliverable>, SummarizeError> {
    let json = match (reply.find('['), reply.rfind(']')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => {
            return Err(SummarizeError::Decode {
                message: "reply contains no JSON array".into(),
            })
        }
    };

    let records: Vec<DeliverableRecord> =
        serde_json::from_str(json).map_err(|e| SummarizeError::Decode {
            message: format!("deliverables array: {e}"),
        })?;
    Ok(records
        .into_iter()
        .filter_map(DeliverableRecord::into_deliverable)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::deliverables::NO_DUE_DATE;

    #[test]
    fn array_is_found_inside_prose() {
        let reply = "Here are the deliverables:\n```json\n[\n  {\"deliverable_name\": \"Login page\", \
                     \"due_date\": \"2025-08-15T00:00:00.000+0000\", \"date_updated\": \"2025-07-20\", \
                     \"status\": \"Done\"}\n]\n```\nLet me know if you need more.";
        let rows = parse_reply(reply).unwrap();
        assert_eq!(
            rows,
            vec![Deliverable {
                name: "Login page".into(),
                due_date: "2025-08-15".into(),
                updated: "2025-07-20".into(),
                status: "Done".into(),
            }]
        );
    }

    #[test]
    fn missing_fields_get_fallbacks_and_nameless_rows_are_dropped() {
        let rows = parse_reply(r#"[{"deliverable_name": "Export"}, {"status": "Done"}]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].due_date, NO_DUE_DATE);
        assert_eq!(rows[0].updated, UNKNOWN_FIELD);
        assert_eq!(rows[0].status, UNKNOWN_FIELD);
    }

    #[test]
    fn empty_array_means_none() {
        assert!(parse_reply("[]").unwrap().is_empty());
    }

    #[test]
    fn replies_without_an_array_are_decode_errors() {
        for reply in ["I could not find any deliverables.", "] oops [", "[not json]"] {
            assert!(
                matches!(parse_reply(reply), Err(SummarizeError::Decode { .. })),
                "{reply}"
            );
        }
    }
}
