//! Estimate domain types
//!
//! `ProjectDetails` is the typed estimate record produced by normalizing the
//! model's text output. The `Raw*` types mirror the JSON shape the prompt
//! asks the model to emit; everything on them is optional because the model
//! is not guaranteed to comply.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A structured construction cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Dimensions in meters. Positivity is advisory, not enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub materials: Vec<Material>,
    pub labor: Vec<LaborItem>,
}

/// One material line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub cost_per_unit: f64,
    /// No default: an entry the model returned without a quantity stays
    /// without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    pub description: String,
}

/// One labor line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborItem {
    pub id: String,
    pub role: String,
    pub cost_per_hour: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    pub description: String,
}

// Rendering contract consumed by the frontend; not called on the server path.
#[allow(dead_code)]
impl Material {
    pub fn display_description(&self) -> &str {
        description_or_placeholder(&self.description)
    }
}

#[allow(dead_code)]
impl LaborItem {
    pub fn display_description(&self) -> &str {
        description_or_placeholder(&self.description)
    }
}

#[allow(dead_code)]
fn description_or_placeholder(description: &str) -> &str {
    if description.is_empty() {
        "No description provided"
    } else {
        description
    }
}

/// Format a cost with two decimal places for display, e.g. `$25.00`.
#[allow(dead_code)]
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Collision-resistant random identifier for entries the model returned
/// without one.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Raw parsed shapes (model output before defaulting)
// =============================================================================

/// The object shape requested from the model, parsed leniently.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEstimate {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub materials: Option<Vec<RawMaterial>>,
    #[serde(default)]
    pub labor: Option<Vec<RawLaborItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    /// The requested schema has no `materialId` field, so this is never
    /// populated in practice and every material gets a generated id. Kept as
    /// the id source on purpose.
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLaborItem {
    /// Same situation as `material_id`: never present, always generated.
    #[serde(default)]
    pub labor_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub cost_per_hour: Option<f64>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<RawMaterial> for Material {
    fn from(raw: RawMaterial) -> Self {
        Material {
            id: raw.material_id.unwrap_or_else(generate_id),
            name: raw.name.unwrap_or_else(|| "Material".to_string()),
            unit: raw.unit.unwrap_or_else(|| "unit".to_string()),
            cost_per_unit: raw.cost_per_unit.unwrap_or(0.0),
            quantity: raw.quantity,
            description: raw.description.unwrap_or_default(),
        }
    }
}

impl From<RawLaborItem> for LaborItem {
    fn from(raw: RawLaborItem) -> Self {
        LaborItem {
            id: raw.labor_id.unwrap_or_else(generate_id),
            role: raw.role.unwrap_or_else(|| "Worker".to_string()),
            cost_per_hour: raw.cost_per_hour.unwrap_or(0.0),
            hours: raw.hours,
            description: raw.description.unwrap_or_default(),
        }
    }
}

// =============================================================================
// Request/Response DTOs for API endpoints
// =============================================================================

/// Request to analyze a project description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub project_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn material_defaults_apply_to_missing_fields() {
        let raw: RawMaterial = serde_json::from_str(r#"{"quantity": 5}"#).unwrap();
        let material = Material::from(raw);

        assert_eq!(material.name, "Material");
        assert_eq!(material.unit, "unit");
        assert_eq!(material.cost_per_unit, 0.0);
        assert_eq!(material.quantity, Some(5.0));
        assert_eq!(material.description, "");
        assert!(!material.id.is_empty());
    }

    #[test]
    fn labor_defaults_apply_to_missing_fields() {
        let raw: RawLaborItem = serde_json::from_str(r#"{"hours": 8}"#).unwrap();
        let item = LaborItem::from(raw);

        assert_eq!(item.role, "Worker");
        assert_eq!(item.cost_per_hour, 0.0);
        assert_eq!(item.hours, Some(8.0));
        assert_eq!(item.description, "");
        assert!(!item.id.is_empty());
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..50)
            .map(|_| Material::from(RawMaterial::default()).id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn missing_quantity_stays_missing() {
        let raw: RawMaterial = serde_json::from_str(r#"{"name": "Rebar"}"#).unwrap();
        let material = Material::from(raw);
        assert_eq!(material.quantity, None);
    }

    #[test]
    fn empty_description_renders_placeholder() {
        let material = Material::from(RawMaterial::default());
        assert_eq!(material.display_description(), "No description provided");

        let raw: RawMaterial =
            serde_json::from_str(r#"{"description": "8x4 sheet"}"#).unwrap();
        assert_eq!(Material::from(raw).display_description(), "8x4 sheet");
    }

    #[test]
    fn currency_formats_two_decimal_places() {
        assert_eq!(format_currency(25.0), "$25.00");
        assert_eq!(format_currency(40.5), "$40.50");
        assert_eq!(format_currency(0.0), "$0.00");
    }
}
