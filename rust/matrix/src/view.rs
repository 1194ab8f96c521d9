// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The dense matrix handed to the chessboard renderer.
//!
//! Rows are floors (top of the building first), columns are sections. Every
//! section occupies the same number of cells on every row, padded with empty
//! placeholders. Each node carries a synthetic `key` that is stable across
//! builds of the same document.

use building_map_core::{EntityId, Extra, Unit};
use serde::Serialize;

/// Matrix fields that pass-through unit fields must not shadow.
const PLACED_FIELDS: [&str; 7] = ["type", "key", "pos", "id", "name", "label", "isNameAutoGenerated"];

/// A real unit placed in the matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedUnit {
    pub key: u64,
    /// `[section position, floor position within the section, unit position]`.
    pub pos: [usize; 3],
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Set when the name was filled in by the matrix build.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_name_auto_generated: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PlacedUnit {
    pub(crate) fn new(key: u64, pos: [usize; 3], unit: &Unit) -> Self {
        Self {
            key,
            pos,
            id: unit.id.clone(),
            name: unit.name.clone(),
            label: unit.label.clone(),
            is_name_auto_generated: false,
            extra: unit
                .extra
                .iter()
                .filter(|(field, _)| !PLACED_FIELDS.contains(&field.as_str()))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        }
    }
}

/// One cell of a section row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatrixUnit {
    Unit(PlacedUnit),
    /// Padding up to the section's size.
    Empty { key: u64 },
}

impl MatrixUnit {
    pub fn key(&self) -> u64 {
        match self {
            MatrixUnit::Unit(unit) => unit.key,
            MatrixUnit::Empty { key } => *key,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MatrixUnit::Empty { .. })
    }

    pub fn as_unit(&self) -> Option<&PlacedUnit> {
        match self {
            MatrixUnit::Unit(unit) => Some(unit),
            MatrixUnit::Empty { .. } => None,
        }
    }

    pub fn as_unit_mut(&mut self) -> Option<&mut PlacedUnit> {
        match self {
            MatrixUnit::Unit(unit) => Some(unit),
            MatrixUnit::Empty { .. } => None,
        }
    }
}

/// The cells of one section on one floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSectionRow {
    /// Id of the section.
    pub id: EntityId,
    pub key: u64,
    pub pos: [usize; 1],
    pub units: Vec<MatrixUnit>,
}

/// One floor index across all sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixFloorRow {
    /// Id of the first section's floor at this index.
    pub id: EntityId,
    pub key: u64,
    /// `[section position, floor position]` of that floor.
    pub pos: [usize; 2],
    pub name: String,
    pub index: i32,
    pub sections: Vec<MatrixSectionRow>,
}

/// Column header for one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSectionSummary {
    pub id: EntityId,
    pub key: u64,
    pub name: String,
    /// Widest floor of the section, in units.
    pub size: usize,
    pub pos: [usize; 1],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Matrix {
    pub floors: Vec<MatrixFloorRow>,
    pub sections: Vec<MatrixSectionSummary>,
}

impl Matrix {
    /// Serializes the matrix to a JSON string.
    pub fn to_json(&self) -> building_map_core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Every synthetic key in the matrix, in issue order.
    pub fn keys(&self) -> Vec<u64> {
        let mut keys = Vec::new();
        for floor in &self.floors {
            for section in &floor.sections {
                keys.extend(section.units.iter().map(MatrixUnit::key));
                keys.push(section.key);
            }
            keys.push(floor.key);
        }
        keys.extend(self.sections.iter().map(|section| section.key));
        keys
    }

    /// Iterates over the real units of every row.
    pub fn units(&self) -> impl Iterator<Item = &PlacedUnit> {
        self.floors
            .iter()
            .flat_map(|floor| floor.sections.iter())
            .flat_map(|section| section.units.iter())
            .filter_map(MatrixUnit::as_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cells_serialize_with_type_tag() {
        let mut unit = Unit::new(3).with_name("22");
        unit.extra.insert("unitType".into(), json!("flat"));
        let mut placed = PlacedUnit::new(0, [0, 0, 0], &unit);

        assert_eq!(
            serde_json::to_value(MatrixUnit::Unit(placed.clone())).unwrap(),
            json!({
                "type": "unit",
                "key": 0,
                "pos": [0, 0, 0],
                "id": 3,
                "name": "22",
                "unitType": "flat"
            })
        );

        placed.is_name_auto_generated = true;
        let value = serde_json::to_value(MatrixUnit::Unit(placed)).unwrap();
        assert_eq!(value["isNameAutoGenerated"], json!(true));

        assert_eq!(
            serde_json::to_value(MatrixUnit::Empty { key: 7 }).unwrap(),
            json!({ "type": "empty", "key": 7 })
        );
    }

    #[test]
    fn empty_matrix() {
        let matrix = Matrix::default();
        assert!(matrix.keys().is_empty());
        assert_eq!(matrix.to_json().unwrap(), r#"{"floors":[],"sections":[]}"#);
    }

    #[test]
    fn pass_through_fields_do_not_shadow_matrix_fields() {
        let mut unit = Unit::new(3);
        unit.extra.insert("key".into(), json!("stale"));
        unit.extra.insert("pos".into(), json!([9]));
        unit.extra.insert("isNameAutoGenerated".into(), json!(true));
        unit.extra.insert("preview".into(), json!(false));
        let placed = PlacedUnit::new(4, [0, 1, 2], &unit);

        let text = serde_json::to_string(&MatrixUnit::Unit(placed)).unwrap();
        assert_eq!(text.matches("\"key\"").count(), 1);
        assert_eq!(text.matches("\"pos\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({ "type": "unit", "key": 4, "pos": [0, 1, 2], "id": 3, "preview": false })
        );
    }
}
