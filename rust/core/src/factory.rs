// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation of complete, well-formed sections.

use crate::config::LayoutConfig;
use crate::error::{ArgumentError, Result};
use crate::model::{Building, EntityId, Floor, Section, Unit};
use crate::validation::validate;

/// Parameters for a generated section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSection {
    pub section_name: String,
    /// Lowest floor index, must not be 0.
    pub min_floor: i32,
    /// Highest floor index, must not be 0.
    pub max_floor: i32,
    pub units_per_floor: i32,
}

/// Builds new sections within the configured size limits.
#[derive(Debug, Clone, Default)]
pub struct SectionFactory {
    config: LayoutConfig,
}

impl SectionFactory {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Creates a section with one floor per nonzero index from `max_floor`
    /// down to `min_floor` and `units_per_floor` unnamed units on each.
    ///
    /// Floor ids are `"{section}-{index}"`, unit ids
    /// `"{section}-{index}-{n}"` with `n` counting from 1. A range that
    /// crosses ground level skips index 0, so `-1..=1` produces two floors.
    pub fn create(&self, request: &NewSection) -> std::result::Result<Section, ArgumentError> {
        if request.section_name.trim().is_empty() {
            return Err(ArgumentError::EmptySectionName);
        }
        if request.min_floor == 0 {
            return Err(ArgumentError::ZeroFloorBound("min floor"));
        }
        if request.max_floor == 0 {
            return Err(ArgumentError::ZeroFloorBound("max floor"));
        }
        if request.units_per_floor < 0 {
            return Err(ArgumentError::NegativeUnitsPerFloor(request.units_per_floor));
        }
        if request.min_floor > request.max_floor {
            return Err(ArgumentError::InvertedFloorRange {
                min: request.min_floor,
                max: request.max_floor,
            });
        }

        let floors = floor_count(request.min_floor, request.max_floor);
        if floors > self.config.max_floors {
            return Err(ArgumentError::TooManyFloors {
                floors,
                limit: self.config.max_floors,
            });
        }
        let units = request.units_per_floor as usize;
        if units > self.config.max_units_per_floor {
            return Err(ArgumentError::TooManyUnits {
                units,
                limit: self.config.max_units_per_floor,
            });
        }

        let id = EntityId::generate();
        let mut section = Section::new(id.clone());
        section.name = Some(request.section_name.clone());
        section.floors = floor_indices(request.min_floor, request.max_floor)
            .map(|index| {
                let mut floor = Floor::new(format!("{id}-{index}"), index);
                floor.name = Some(index.to_string());
                floor.units = (1..=units)
                    .map(|n| Unit::new(format!("{id}-{index}-{n}")))
                    .collect();
                floor
            })
            .collect();

        tracing::debug!(
            section = %section.id,
            floors = section.floors.len(),
            units_per_floor = units,
            "Created section"
        );
        Ok(section)
    }
}

/// Creates a section with the default size limits.
pub fn create_section(request: &NewSection) -> std::result::Result<Section, ArgumentError> {
    SectionFactory::default().create(request)
}

impl Building {
    /// Appends `section` and re-validates the building. On failure the
    /// building is left as it was.
    pub fn add_section(&mut self, section: Section) -> Result<()> {
        self.sections.push(section);
        if let Err(violation) = validate(self) {
            self.sections.pop();
            return Err(violation.into());
        }
        Ok(())
    }
}

/// Nonzero indices from `max` down to `min`.
fn floor_indices(min: i32, max: i32) -> impl Iterator<Item = i32> {
    (min..=max).rev().filter(|index| *index != 0)
}

fn floor_count(min: i32, max: i32) -> usize {
    let span = i64::from(max) - i64::from(min) + 1;
    let crosses_ground = min < 0 && max > 0;
    (span - i64::from(crosses_ground)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(min_floor: i32, max_floor: i32, units_per_floor: i32) -> NewSection {
        NewSection {
            section_name: "1".into(),
            min_floor,
            max_floor,
            units_per_floor,
        }
    }

    fn indices(section: &Section) -> Vec<i32> {
        section.floors.iter().map(|floor| floor.index).collect()
    }

    #[test]
    fn two_floors_of_four_units() {
        let section = create_section(&request(1, 2, 4)).unwrap();
        assert_eq!(indices(&section), vec![2, 1]);
        assert_eq!(section.name.as_deref(), Some("1"));

        let id = section.id.to_string();
        let top: Vec<String> = section.floors[0].units.iter().map(|u| u.id.to_string()).collect();
        assert_eq!(
            top,
            (1..=4).map(|n| format!("{id}-2-{n}")).collect::<Vec<_>>()
        );
        let bottom: Vec<String> = section.floors[1].units.iter().map(|u| u.id.to_string()).collect();
        assert_eq!(
            bottom,
            (1..=4).map(|n| format!("{id}-1-{n}")).collect::<Vec<_>>()
        );
        assert!(section.floors.iter().flat_map(|f| &f.units).all(|u| u.name.is_none()));
    }

    #[test]
    fn floor_ids_and_names() {
        let section = create_section(&request(-2, 1, 0)).unwrap();
        assert_eq!(indices(&section), vec![1, -1, -2]);
        let id = section.id.to_string();
        assert_eq!(section.floors[1].id, EntityId::Text(format!("{id}--1")));
        assert_eq!(section.floors[2].name.as_deref(), Some("-2"));
        assert!(section.floors.iter().all(|floor| floor.units.is_empty()));
    }

    #[test]
    fn crossing_ground_skips_zero() {
        let section = create_section(&request(-1, 1, 4)).unwrap();
        assert_eq!(indices(&section), vec![1, -1]);
        assert_eq!(floor_count(-1, 1), 2);
        assert_eq!(floor_count(-3, 5), 8);
    }

    #[test]
    fn single_floor() {
        let section = create_section(&request(1, 1, 4)).unwrap();
        assert_eq!(indices(&section), vec![1]);
        assert_eq!(section.unit_count(), 4);
    }

    #[test]
    fn underground_only() {
        let section = create_section(&request(-3, -1, 1)).unwrap();
        assert_eq!(indices(&section), vec![-1, -2, -3]);
    }

    #[test]
    fn generated_section_is_valid() {
        let section = create_section(&request(-2, 5, 3)).unwrap();
        assert!(crate::validation::validate_section(&section).is_ok());
    }

    #[test]
    fn rejects_bad_arguments() {
        let mut blank = request(1, 2, 1);
        blank.section_name = "  ".into();
        assert_eq!(create_section(&blank), Err(ArgumentError::EmptySectionName));
        assert_eq!(
            create_section(&request(0, 2, 1)),
            Err(ArgumentError::ZeroFloorBound("min floor"))
        );
        assert_eq!(
            create_section(&request(1, 0, 1)),
            Err(ArgumentError::ZeroFloorBound("max floor"))
        );
        assert_eq!(
            create_section(&request(1, 2, -1)),
            Err(ArgumentError::NegativeUnitsPerFloor(-1))
        );
        assert_eq!(
            create_section(&request(3, 2, 1)),
            Err(ArgumentError::InvertedFloorRange { min: 3, max: 2 })
        );
    }

    #[test]
    fn add_section_validates_building() {
        let mut building = Building::default();
        let section = create_section(&request(1, 3, 2)).unwrap();
        building.add_section(section.clone()).unwrap();
        assert_eq!(building.sections.len(), 1);

        let err = building.add_section(section).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Schema(crate::error::SchemaViolation::DuplicateId { .. })
        ));
        assert_eq!(building.sections.len(), 1);
    }

    #[test]
    fn enforces_configured_limits() {
        let factory = SectionFactory::new(LayoutConfig {
            max_floors: 3,
            max_units_per_floor: 2,
            ..LayoutConfig::default()
        });
        assert!(factory.create(&request(-1, 2, 2)).is_ok());
        assert_eq!(
            factory.create(&request(1, 4, 2)),
            Err(ArgumentError::TooManyFloors { floors: 4, limit: 3 })
        );
        assert_eq!(
            factory.create(&request(1, 2, 3)),
            Err(ArgumentError::TooManyUnits { units: 3, limit: 2 })
        );
    }
}
