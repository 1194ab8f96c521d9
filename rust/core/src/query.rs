// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only queries over a building: id listings, unit lookup, floor
//! ranges and numbering hints for the next section or unit.

use crate::model::{numeric_name, Building, EntityId, Unit};

/// Array positions of a unit inside a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLocation {
    pub section: usize,
    pub floor: usize,
    pub unit: usize,
}

impl Building {
    pub fn section_ids(&self) -> Vec<&EntityId> {
        self.sections.iter().map(|section| &section.id).collect()
    }

    pub fn floor_ids(&self) -> Vec<&EntityId> {
        self.sections
            .iter()
            .flat_map(|section| section.floors.iter().map(|floor| &floor.id))
            .collect()
    }

    pub fn unit_ids(&self) -> Vec<&EntityId> {
        self.units().map(|unit| &unit.id).collect()
    }

    /// Finds the section, floor and unit positions of a unit.
    pub fn locate_unit(&self, id: &EntityId) -> Option<UnitLocation> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section_position, section)| {
                section
                    .floors
                    .iter()
                    .enumerate()
                    .find_map(|(floor_position, floor)| {
                        floor
                            .units
                            .iter()
                            .position(|unit| &unit.id == id)
                            .map(|unit_position| UnitLocation {
                                section: section_position,
                                floor: floor_position,
                                unit: unit_position,
                            })
                    })
            })
    }

    pub fn unit_at(&self, location: UnitLocation) -> Option<&Unit> {
        self.sections
            .get(location.section)?
            .floors
            .get(location.floor)?
            .units
            .get(location.unit)
    }

    /// Highest floor index in any section.
    pub fn max_floor(&self) -> Option<i32> {
        self.sections.iter().filter_map(|section| section.max_floor()).max()
    }

    /// Lowest floor index in any section.
    pub fn min_floor(&self) -> Option<i32> {
        self.sections.iter().filter_map(|section| section.min_floor()).min()
    }

    /// Every nonzero index between the highest and lowest floor, top first,
    /// whether or not a section has a floor there.
    pub fn possible_floors(&self) -> Vec<i32> {
        match (self.max_floor(), self.min_floor()) {
            (Some(max), Some(min)) => (min..=max).rev().filter(|index| *index != 0).collect(),
            _ => Vec::new(),
        }
    }

    /// One past the highest numeric unit label, or 1 for a building without
    /// numeric labels.
    pub fn next_unit_number(&self) -> i64 {
        self.units()
            .filter_map(|unit| unit.label.as_deref().and_then(numeric_name))
            .fold(0, i64::max)
            + 1
    }

    /// One past the highest numeric section name, or `"1"`.
    pub fn next_section_name(&self) -> String {
        let highest = self
            .sections
            .iter()
            .filter_map(|section| section.name.as_deref().and_then(numeric_name))
            .fold(0, i64::max);
        (highest + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Floor, Section};

    fn building() -> Building {
        let mut first = Section::new("a");
        first.name = Some("1".into());
        let mut top = Floor::new("a3", 3);
        top.units = vec![Unit::new("u1"), Unit::new("u2")];
        let mut bottom = Floor::new("a-2", -2);
        bottom.units = vec![Unit::new("u3")];
        first.floors = vec![top, bottom];

        let mut second = Section::new("b");
        second.name = Some("2".into());
        let mut only = Floor::new("b1", 1);
        only.units = vec![Unit::new("u4")];
        second.floors = vec![only];

        Building::new(vec![first, second])
    }

    #[test]
    fn id_listings() {
        let building = building();
        assert_eq!(building.section_ids(), vec![&EntityId::from("a"), &EntityId::from("b")]);
        assert_eq!(building.floor_ids().len(), 3);
        assert_eq!(
            building.unit_ids(),
            ["u1", "u2", "u3", "u4"].map(EntityId::from).iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn locates_units() {
        let building = building();
        let location = building.locate_unit(&EntityId::from("u3")).unwrap();
        assert_eq!(
            location,
            UnitLocation {
                section: 0,
                floor: 1,
                unit: 0
            }
        );
        assert_eq!(building.unit_at(location).map(|u| &u.id), Some(&EntityId::from("u3")));
        assert_eq!(building.locate_unit(&EntityId::from("missing")), None);
    }

    #[test]
    fn floor_ranges() {
        let building = building();
        assert_eq!(building.max_floor(), Some(3));
        assert_eq!(building.min_floor(), Some(-2));
        assert_eq!(building.possible_floors(), vec![3, 2, 1, -1, -2]);
        assert!(Building::default().possible_floors().is_empty());
    }

    #[test]
    fn numbering_hints() {
        let mut building = building();
        assert_eq!(building.next_unit_number(), 1);
        assert_eq!(building.next_section_name(), "3");

        building.sections[0].floors[0].units[1].label = Some("17".into());
        building.sections[1].floors[0].units[0].label = Some("shop".into());
        assert_eq!(building.next_unit_number(), 18);

        assert_eq!(Building::default().next_section_name(), "1");
    }
}
