//! Delivery note rendering
//!
//! Builds the printable hand-over document for an approved request.
//! Rendering is a pure string transform; the client decides what to do
//! with it (print dialog, download, archive).

use serde::{Deserialize, Serialize};

use crate::Day;

/// One line of the delivery table: an item joined to its seedling's
/// species and height range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeliveryLine {
    pub species: String,
    pub height_range: String,
    pub quantity: i64,
}

/// The resolved content of a delivery note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeliveryNote {
    pub partner_name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date"))]
    pub request_date: Day,
    pub note: Option<String>,
    pub lines: Vec<DeliveryLine>,
}

impl DeliveryNote {
    /// Render the note as a printable plain-text document: header,
    /// one line per item, and two signature blocks.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("SEEDLING DELIVERY NOTE\n");
        out.push_str("======================\n\n");
        out.push_str(&format!("Date:    {}\n", self.request_date));
        out.push_str(&format!("Partner: {}\n", self.partner_name));
        if let Some(note) = &self.note {
            if !note.is_empty() {
                out.push_str(&format!("Note:    {}\n", note));
            }
        }
        out.push('\n');
        out.push_str(&format!(
            "{:<30} {:<15} {:>8}\n",
            "Species", "Height (cm)", "Quantity"
        ));
        out.push_str(&format!("{:-<30} {:-<15} {:->8}\n", "", "", ""));
        for line in &self.lines {
            out.push_str(&format!(
                "{:<30} {:<15} {:>8}\n",
                line.species, line.height_range, line.quantity
            ));
        }
        let total: i64 = self.lines.iter().map(|l| l.quantity).sum();
        out.push_str(&format!("{:<46} {:>8}\n", "Total", total));
        out.push('\n');
        out.push_str("Issued by:   ___________________________\n\n");
        out.push_str("Received by: ___________________________\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_note() -> DeliveryNote {
        DeliveryNote {
            partner_name: "Org A".to_string(),
            request_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            note: Some("first delivery".to_string()),
            lines: vec![
                DeliveryLine {
                    species: "teak".to_string(),
                    height_range: "10-15".to_string(),
                    quantity: 30,
                },
                DeliveryLine {
                    species: "yang".to_string(),
                    height_range: "15-20".to_string(),
                    quantity: 12,
                },
            ],
        }
    }

    #[test]
    fn test_render_contains_header_fields() {
        let doc = sample_note().render();
        assert!(doc.contains("Org A"));
        assert!(doc.contains("2024-06-01"));
        assert!(doc.contains("first delivery"));
    }

    #[test]
    fn test_render_one_line_per_item_plus_total() {
        let doc = sample_note().render();
        assert!(doc.contains("teak"));
        assert!(doc.contains("yang"));
        assert!(doc.contains("42"));
    }

    #[test]
    fn test_render_has_two_signature_blocks() {
        let doc = sample_note().render();
        assert_eq!(doc.matches("___________________________").count(), 2);
        assert!(doc.contains("Issued by:"));
        assert!(doc.contains("Received by:"));
    }

    #[test]
    fn test_render_omits_empty_note() {
        let mut note = sample_note();
        note.note = None;
        assert!(!note.render().contains("Note:"));
    }
}
