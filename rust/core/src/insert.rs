// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adding and removing single units while keeping floors in decreasing
//! index order.

use crate::error::{ArgumentError, Result};
use crate::model::{EntityId, Extra, Floor, Section, Unit};
use crate::validation::validate_section;

/// Fields that belong to the unit structure itself and cannot be set
/// through [`NewUnit::extra`].
pub(crate) const RESERVED_FIELDS: [&str; 4] = ["id", "type", "name", "label"];

/// Payload for a unit to insert. The id is always generated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUnit {
    pub name: Option<String>,
    pub label: Option<String>,
    pub extra: Extra,
}

impl NewUnit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    fn into_unit(self, id: EntityId) -> Unit {
        Unit {
            id,
            name: self.name,
            label: self.label,
            extra: self
                .extra
                .into_iter()
                .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
                .collect(),
        }
    }
}

/// Returns a copy of `section` with a new unit on floor `floor_index`, and
/// the new unit's id. The input is left untouched.
///
/// See [`insert_unit_in_place`] for the placement rules.
pub fn insert_unit(section: &Section, floor_index: i32, unit: NewUnit) -> Result<(Section, EntityId)> {
    let mut section = section.clone();
    let id = insert_unit_in_place(&mut section, floor_index, unit)?;
    Ok((section, id))
}

/// Inserts a new unit into `section` in place and returns its id.
///
/// The unit is appended to the floor with `index == floor_index`. When no
/// such floor exists, a floor is created (id `"{unit id}-floor"`) and placed
/// before the first floor with a lower index, or at the end when every
/// floor is higher. The section is validated first and left unchanged if
/// validation fails.
pub fn insert_unit_in_place(section: &mut Section, floor_index: i32, unit: NewUnit) -> Result<EntityId> {
    if floor_index == 0 {
        return Err(ArgumentError::ZeroFloorIndex.into());
    }
    validate_section(section)?;

    let id = EntityId::generate();
    let unit = unit.into_unit(id.clone());

    if let Some(floor) = section
        .floors
        .iter_mut()
        .find(|floor| floor.index == floor_index)
    {
        floor.units.push(unit);
        tracing::debug!(unit = %id, floor = floor_index, "Added unit to existing floor");
        return Ok(id);
    }

    let mut floor = Floor::new(format!("{id}-floor"), floor_index);
    floor.name = Some(floor_index.to_string());
    floor.units.push(unit);

    match section
        .floors
        .iter()
        .position(|existing| existing.index < floor_index)
    {
        Some(position) => section.floors.insert(position, floor),
        None => section.floors.push(floor),
    }
    tracing::debug!(unit = %id, floor = floor_index, "Added unit on a new floor");
    Ok(id)
}

/// Returns a copy of `section` without the unit `unit_id`. A floor left
/// without units is removed as well.
pub fn remove_unit(section: &Section, unit_id: &EntityId) -> Result<Section> {
    validate_section(section)?;

    let (floor_position, unit_position) = section
        .floors
        .iter()
        .enumerate()
        .find_map(|(floor_position, floor)| {
            floor
                .units
                .iter()
                .position(|unit| &unit.id == unit_id)
                .map(|unit_position| (floor_position, unit_position))
        })
        .ok_or_else(|| ArgumentError::UnitNotFound(unit_id.clone()))?;

    let mut section = section.clone();
    let floor = &mut section.floors[floor_position];
    floor.units.remove(unit_position);
    if floor.units.is_empty() {
        section.floors.remove(floor_position);
    }
    tracing::debug!(unit = %unit_id, "Removed unit");
    Ok(section)
}
