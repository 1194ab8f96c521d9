// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edits that span more than one section: removing and copying sections,
//! removing units building-wide and moving units between floors.
//!
//! Every operation leaves the building unchanged when it fails.

use serde_json::Value;

use crate::error::{ArgumentError, Result, SchemaViolation};
use crate::insert::RESERVED_FIELDS;
use crate::model::{numeric_name, Building, EntityId, Extra, Section, Unit};
use crate::validation::{label_key, validate};

/// New placement and content of an existing unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitUpdate {
    /// Id of the target section.
    pub section: EntityId,
    /// Id of the target floor inside `section`.
    pub floor: EntityId,
    /// Becomes both the unit's name and its label.
    pub name: Option<String>,
    /// Merged into the unit's pass-through fields.
    pub extra: Extra,
}

impl Building {
    /// Removes the section `id` and returns it.
    ///
    /// When the removed section has a numeric name, the sections after it
    /// are renamed to continue from that number, so `1, 2, 3` minus `2`
    /// becomes `1, 2`. A numeric `index` field is renumbered the same way.
    pub fn remove_section(&mut self, id: &EntityId) -> Result<Section> {
        let position = self
            .sections
            .iter()
            .position(|section| &section.id == id)
            .ok_or_else(|| ArgumentError::SectionNotFound(id.clone()))?;
        let removed = self.sections.remove(position);
        renumber_sections(&mut self.sections[position..], &removed);

        tracing::debug!(section = %id, renumbered = self.sections.len() - position, "Removed section");
        Ok(removed)
    }

    /// Appends a copy of section `id` and returns the copy's id.
    ///
    /// The copy gets a fresh id, the next free section name and new floor
    /// and unit ids in the generated-section scheme. Its units are labelled
    /// from [`Building::next_unit_number`] upwards, bottom floor first.
    pub fn copy_section(&mut self, id: &EntityId) -> Result<EntityId> {
        let mut copy = self
            .sections
            .iter()
            .find(|section| &section.id == id)
            .cloned()
            .ok_or_else(|| ArgumentError::SectionNotFound(id.clone()))?;

        let copy_id = EntityId::generate();
        copy.id = copy_id.clone();
        copy.name = Some(self.next_section_name());
        if copy.extra.contains_key("index") {
            copy.extra
                .insert("index".into(), Value::from(self.sections.len() + 1));
        }

        let mut number = self.next_unit_number();
        for floor in copy.floors.iter_mut().rev() {
            floor.id = EntityId::Text(format!("{copy_id}-{}", floor.index));
            for (n, unit) in floor.units.iter_mut().enumerate() {
                unit.id = EntityId::Text(format!("{copy_id}-{}-{}", floor.index, n + 1));
                unit.label = Some(number.to_string());
                number = number.saturating_add(1);
            }
        }

        self.add_section(copy)?;
        tracing::debug!(source = %id, section = %copy_id, "Copied section");
        Ok(copy_id)
    }

    /// Removes unit `id` wherever it is and returns it. A floor left
    /// without units is removed, and so is a section left without floors
    /// (see [`Building::remove_section`] for the renaming that follows).
    pub fn remove_unit(&mut self, id: &EntityId) -> Result<Unit> {
        let location = self
            .locate_unit(id)
            .ok_or_else(|| ArgumentError::UnitNotFound(id.clone()))?;

        let section = &mut self.sections[location.section];
        let floor = &mut section.floors[location.floor];
        let unit = floor.units.remove(location.unit);
        if floor.units.is_empty() {
            section.floors.remove(location.floor);
        }
        let emptied = section.floors.is_empty().then(|| section.id.clone());

        if let Some(section_id) = emptied {
            self.remove_section(&section_id)?;
        }
        tracing::debug!(unit = %id, "Removed unit from building");
        Ok(unit)
    }

    /// Renames unit `id` and, when `update` names another floor or section,
    /// moves it to the end of that floor. The unit keeps its id.
    ///
    /// Moving out of a floor or section removes it when it becomes empty,
    /// as [`Building::remove_unit`] does. Fails when the new label is
    /// already used by another unit of the same unit type.
    pub fn update_unit(&mut self, id: &EntityId, update: UnitUpdate) -> Result<()> {
        let location = self
            .locate_unit(id)
            .ok_or_else(|| ArgumentError::UnitNotFound(id.clone()))?;
        self.floor_position(&update.section, &update.floor)?;

        let mut edited = self.clone();
        let current = &edited.sections[location.section];
        let moved = current.id != update.section || current.floors[location.floor].id != update.floor;

        if moved {
            let mut unit = edited.remove_unit(id)?;
            apply_update(&mut unit, update.name, update.extra);
            let (section, floor) = edited.floor_position(&update.section, &update.floor)?;
            edited.sections[section].floors[floor].units.push(unit);
        } else {
            let unit = &mut edited.sections[location.section].floors[location.floor].units[location.unit];
            apply_update(unit, update.name, update.extra);
        }

        check_label_free(&edited, id)?;
        validate(&edited)?;
        *self = edited;
        tracing::debug!(unit = %id, moved, "Updated unit");
        Ok(())
    }

    fn floor_position(&self, section: &EntityId, floor: &EntityId) -> Result<(usize, usize)> {
        let section_position = self
            .sections
            .iter()
            .position(|candidate| &candidate.id == section)
            .ok_or_else(|| ArgumentError::SectionNotFound(section.clone()))?;
        let floor_position = self.sections[section_position]
            .floors
            .iter()
            .position(|candidate| &candidate.id == floor)
            .ok_or_else(|| ArgumentError::FloorNotFound {
                section: section.clone(),
                floor: floor.clone(),
            })?;
        Ok((section_position, floor_position))
    }
}

fn renumber_sections(following: &mut [Section], removed: &Section) {
    if let Some(first) = removed.name.as_deref().and_then(numeric_name) {
        let mut number = first;
        for section in following.iter_mut() {
            section.name = Some(number.to_string());
            number = number.saturating_add(1);
        }
    }
    if let Some(first) = removed.extra.get("index").and_then(Value::as_i64) {
        let mut index = first;
        for section in following.iter_mut() {
            section.extra.insert("index".into(), Value::from(index));
            index = index.saturating_add(1);
        }
    }
}

fn apply_update(unit: &mut Unit, name: Option<String>, extra: Extra) {
    unit.label = name.clone();
    unit.name = name;
    unit.extra.extend(
        extra
            .into_iter()
            .filter(|(field, _)| !RESERVED_FIELDS.contains(&field.as_str())),
    );
}

fn check_label_free(building: &Building, id: &EntityId) -> std::result::Result<(), SchemaViolation> {
    let Some(unit) = building.units().find(|unit| &unit.id == id) else {
        return Ok(());
    };
    let Some(key) = label_key(unit) else {
        return Ok(());
    };
    if building
        .units()
        .any(|other| &other.id != id && label_key(other) == Some(key))
    {
        return Err(SchemaViolation::DuplicateLabel {
            label: key.1.to_string(),
            unit: id.clone(),
        });
    }
    Ok(())
}
