// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural validation of building map documents.
//!
//! Validation happens in two layers:
//!
//! - **Parsing** ([`parse_building`], [`parse_section`]) converts a raw JSON
//!   value into the typed model and rejects missing ids, wrong `type` tags,
//!   missing arrays and ill-typed fields.
//! - **Invariant checks** ([`validate`], [`validate_section`],
//!   [`validate_floor`]) run on the typed model and reject duplicate ids, floor
//!   index 0 and floors that are not stored in strictly decreasing order.
//!
//! Both layers stop at the first violation; there is no partial result.
//! Every editing operation in this crate validates through the same
//! functions.

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::error::{NodePath, SchemaViolation};
use crate::model::{Building, EntityId, Extra, Floor, NodeKind, Section, Unit};

type Result<T> = std::result::Result<T, SchemaViolation>;

/// Ids already seen while walking one building. Floor and unit ids must be
/// unique across the whole building, not just within their section.
#[derive(Debug, Default)]
struct SeenIds {
    sections: FxHashSet<EntityId>,
    floors: FxHashSet<EntityId>,
    units: FxHashSet<EntityId>,
}

impl SeenIds {
    fn claim(&mut self, kind: NodeKind, id: &EntityId) -> Result<()> {
        let set = match kind {
            NodeKind::Section => &mut self.sections,
            NodeKind::Floor => &mut self.floors,
            NodeKind::Unit => &mut self.units,
        };
        if set.insert(id.clone()) {
            Ok(())
        } else {
            Err(SchemaViolation::DuplicateId {
                kind,
                id: id.clone(),
            })
        }
    }
}

/// Checks every building-wide invariant.
pub fn validate(building: &Building) -> Result<()> {
    validate_sections(&building.sections)
}

/// Checks a list of sections as if they formed one building.
pub fn validate_sections(sections: &[Section]) -> Result<()> {
    let mut seen = SeenIds::default();
    for section in sections {
        seen.claim(NodeKind::Section, &section.id)?;
        check_section(section, &mut seen)?;
    }
    Ok(())
}

/// Checks a single section: unique floor and unit ids, no floor 0, floors in
/// strictly decreasing index order.
pub fn validate_section(section: &Section) -> Result<()> {
    check_section(section, &mut SeenIds::default())
}

/// Checks a single floor of `section`: nonzero index and unique unit ids.
pub fn validate_floor(section: &Section, floor: &Floor) -> Result<()> {
    check_floor(&section.id, floor, &mut SeenIds::default())
}

/// Checks that no two units of the same `unitType` share a label. Units
/// without a label are not checked.
pub fn validate_unique_labels(building: &Building) -> Result<()> {
    let mut seen = FxHashSet::default();
    for unit in building.units() {
        if let Some(key) = label_key(unit) {
            if !seen.insert(key) {
                return Err(SchemaViolation::DuplicateLabel {
                    label: key.1.to_string(),
                    unit: unit.id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Uniqueness key of a unit's label: its `unitType` and the label itself.
pub(crate) fn label_key(unit: &Unit) -> Option<(Option<&str>, &str)> {
    let label = unit.label.as_deref()?;
    Some((unit.extra.get("unitType").and_then(Value::as_str), label))
}

fn check_section(section: &Section, seen: &mut SeenIds) -> Result<()> {
    let mut previous: Option<i32> = None;
    for floor in &section.floors {
        seen.claim(NodeKind::Floor, &floor.id)?;
        check_floor(&section.id, floor, seen)?;
        if let Some(previous) = previous {
            if floor.index >= previous {
                return Err(SchemaViolation::FloorOrder {
                    section: section.id.clone(),
                    floor: floor.id.clone(),
                    previous,
                    index: floor.index,
                });
            }
        }
        previous = Some(floor.index);
    }
    Ok(())
}

fn check_floor(section_id: &EntityId, floor: &Floor, seen: &mut SeenIds) -> Result<()> {
    if floor.index == 0 {
        return Err(SchemaViolation::ZeroFloorIndex {
            section: section_id.clone(),
            floor: floor.id.clone(),
        });
    }
    for unit in &floor.units {
        seen.claim(NodeKind::Unit, &unit.id)?;
    }
    Ok(())
}

/// Parses a raw JSON document into a validated [`Building`].
///
/// Top-level fields other than `sections` and `type` are kept in
/// [`Building::extra`].
pub fn parse_building(value: &Value) -> Result<Building> {
    let object = value.as_object().ok_or(SchemaViolation::NotAnObject {
        path: NodePath::Document,
    })?;
    let sections = array_field(object, "sections", NodePath::Document)?
        .iter()
        .enumerate()
        .map(|(position, section)| read_section(section, position))
        .collect::<Result<Vec<_>>>()?;

    let building = Building {
        sections,
        extra: extra_fields(object, &["type", "sections"]),
    };
    validate(&building)?;
    tracing::trace!(sections = building.sections.len(), "Parsed building map");
    Ok(building)
}

/// Parses a raw JSON value into a validated standalone [`Section`].
pub fn parse_section(value: &Value) -> Result<Section> {
    let section = read_section(value, 0)?;
    validate_section(&section)?;
    Ok(section)
}

fn read_section(value: &Value, position: usize) -> Result<Section> {
    let path = NodePath::Section { section: position };
    let object = value
        .as_object()
        .ok_or_else(|| SchemaViolation::NotAnObject { path: path.clone() })?;
    let id = read_id(object, &path)?;
    check_tag(object, NodeKind::Section, &id)?;
    let name = optional_string(object, "name", NodeKind::Section, &id)?;
    let floors = array_field(object, "floors", path)?
        .iter()
        .enumerate()
        .map(|(floor, value)| read_floor(value, position, floor))
        .collect::<Result<Vec<_>>>()?;

    Ok(Section {
        id,
        name,
        floors,
        extra: extra_fields(object, &["id", "type", "name", "floors"]),
    })
}

fn read_floor(value: &Value, section: usize, position: usize) -> Result<Floor> {
    let path = NodePath::Floor {
        section,
        floor: position,
    };
    let object = value
        .as_object()
        .ok_or_else(|| SchemaViolation::NotAnObject { path: path.clone() })?;
    let id = read_id(object, &path)?;
    check_tag(object, NodeKind::Floor, &id)?;
    let index = object
        .get("index")
        .and_then(Value::as_i64)
        .and_then(|index| i32::try_from(index).ok())
        .ok_or_else(|| SchemaViolation::InvalidField {
            kind: NodeKind::Floor,
            id: id.clone(),
            field: "index",
        })?;
    let name = optional_string(object, "name", NodeKind::Floor, &id)?;
    let units = array_field(object, "units", path)?
        .iter()
        .enumerate()
        .map(|(unit, value)| read_unit(value, section, position, unit))
        .collect::<Result<Vec<_>>>()?;

    Ok(Floor {
        id,
        index,
        name,
        units,
        extra: extra_fields(object, &["id", "type", "index", "name", "units"]),
    })
}

fn read_unit(value: &Value, section: usize, floor: usize, position: usize) -> Result<Unit> {
    let path = NodePath::Unit {
        section,
        floor,
        unit: position,
    };
    let object = value
        .as_object()
        .ok_or_else(|| SchemaViolation::NotAnObject { path: path.clone() })?;
    let id = read_id(object, &path)?;
    check_tag(object, NodeKind::Unit, &id)?;

    Ok(Unit {
        name: optional_string(object, "name", NodeKind::Unit, &id)?,
        label: optional_string(object, "label", NodeKind::Unit, &id)?,
        extra: extra_fields(object, &["id", "type", "name", "label"]),
        id,
    })
}

fn read_id(object: &Map<String, Value>, path: &NodePath) -> Result<EntityId> {
    match object.get("id") {
        Some(Value::String(id)) => Some(EntityId::Text(id.clone())),
        Some(Value::Number(id)) => id.as_i64().map(EntityId::Number),
        _ => None,
    }
    .ok_or_else(|| SchemaViolation::MissingId { path: path.clone() })
}

/// A missing tag is tolerated (older documents omit it); a different one is not.
fn check_tag(object: &Map<String, Value>, kind: NodeKind, id: &EntityId) -> Result<()> {
    match object.get("type") {
        None => Ok(()),
        Some(Value::String(tag)) if tag == kind.as_str() => Ok(()),
        Some(other) => Err(SchemaViolation::WrongTag {
            kind,
            id: id.clone(),
            found: match other {
                Value::String(tag) => tag.clone(),
                other => other.to_string(),
            },
        }),
    }
}

fn optional_string(
    object: &Map<String, Value>,
    field: &'static str,
    kind: NodeKind,
    id: &EntityId,
) -> Result<Option<String>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(SchemaViolation::InvalidField {
            kind,
            id: id.clone(),
            field,
        }),
    }
}

fn array_field<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
    path: NodePath,
) -> Result<&'a Vec<Value>> {
    object
        .get(field)
        .and_then(Value::as_array)
        .ok_or(SchemaViolation::MissingArray { path, field })
}

fn extra_fields(object: &Map<String, Value>, known: &[&str]) -> Extra {
    object
        .iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
