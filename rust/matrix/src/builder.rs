// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sparse-to-dense conversion of a building into its [`Matrix`].
//!
//! The free functions work on any slice of sections and take the key
//! sequence explicitly; [`MatrixBuilder`] wraps them around a validated
//! [`Building`] and caches the result.

use std::collections::BTreeSet;

use building_map_core::{numeric_name, validate, Building, LayoutConfig, Result, Section};
use rustc_hash::FxHashMap;

use crate::keys::KeySequence;
use crate::view::{Matrix, MatrixFloorRow, MatrixSectionRow, MatrixSectionSummary, MatrixUnit, PlacedUnit};

/// Highest and lowest floor index across all sections, as `(max, min)`.
pub fn compute_extent(sections: &[Section]) -> Option<(i32, i32)> {
    let indices = || sections.iter().flat_map(|section| section.floors.iter().map(|floor| floor.index));
    Some((indices().max()?, indices().min()?))
}

/// Width of each section: the unit count of its widest floor.
pub fn compute_section_sizes(sections: &[Section]) -> Vec<usize> {
    sections.iter().map(Section::max_units_per_floor).collect()
}

/// Array position of every floor index, per section.
struct FloorPositions(Vec<FxHashMap<i32, usize>>);

impl FloorPositions {
    fn new(sections: &[Section]) -> Self {
        Self(
            sections
                .iter()
                .map(|section| {
                    let mut positions = FxHashMap::default();
                    for (f, floor) in section.floors.iter().enumerate() {
                        positions.entry(floor.index).or_insert(f);
                    }
                    positions
                })
                .collect(),
        )
    }

    fn get(&self, section: usize, index: i32) -> Option<usize> {
        self.0.get(section)?.get(&index).copied()
    }
}

/// Builds the row for floor index `target`.
///
/// Every section contributes a row of exactly `sizes[s]` cells, padded with
/// empty placeholders. Keys are drawn unit by unit, then one for each section
/// row, then one for the floor row. The first section that has a floor at
/// `target` names the row. Returns `None` without drawing any key when no
/// section has a floor at `target`.
pub fn build_floor_row(
    sections: &[Section],
    sizes: &[usize],
    target: i32,
    keys: &mut KeySequence,
) -> Option<MatrixFloorRow> {
    floor_row(sections, sizes, &FloorPositions::new(sections), target, keys)
}

fn floor_row(
    sections: &[Section],
    sizes: &[usize],
    positions: &FloorPositions,
    target: i32,
    keys: &mut KeySequence,
) -> Option<MatrixFloorRow> {
    let (owner_section, owner_floor) =
        (0..sections.len()).find_map(|s| positions.get(s, target).map(|f| (s, f)))?;

    let mut rows = Vec::with_capacity(sections.len());
    for (s, section) in sections.iter().enumerate() {
        let size = sizes.get(s).copied().unwrap_or_default();
        let mut units = Vec::with_capacity(size);

        if let Some(f) = positions.get(s, target) {
            for (u, unit) in section.floors[f].units.iter().enumerate() {
                units.push(MatrixUnit::Unit(PlacedUnit::new(keys.next_key(), [s, f, u], unit)));
            }
        }
        while units.len() < size {
            units.push(MatrixUnit::Empty { key: keys.next_key() });
        }

        rows.push(MatrixSectionRow {
            id: section.id.clone(),
            key: keys.next_key(),
            pos: [s],
            units,
        });
    }

    let floor = &sections[owner_section].floors[owner_floor];
    let row = MatrixFloorRow {
        id: floor.id.clone(),
        key: keys.next_key(),
        pos: [owner_section, owner_floor],
        name: floor.display_name(),
        index: target,
        sections: rows,
    };
    tracing::trace!(index = target, floor = %row.id, key = row.key, "Built floor row");
    Some(row)
}

/// Builds the full matrix: floor rows from the top floor down, the unit name
/// fix-up, then one summary per section.
///
/// Only indices that some section owns get a row, so the cost follows the
/// number of distinct floors, not the distance between the extreme indices.
pub fn build_matrix(sections: &[Section], keys: &mut KeySequence) -> Matrix {
    let sizes = compute_section_sizes(sections);
    let positions = FloorPositions::new(sections);
    let indices: BTreeSet<i32> = sections
        .iter()
        .flat_map(|section| section.floors.iter().map(|floor| floor.index))
        .filter(|index| *index != 0)
        .collect();

    let mut floors: Vec<MatrixFloorRow> = indices
        .iter()
        .rev()
        .filter_map(|target| floor_row(sections, &sizes, &positions, *target, keys))
        .collect();

    let generated = fill_missing_names(&mut floors);

    let summaries = sections
        .iter()
        .zip(&sizes)
        .enumerate()
        .map(|(s, (section, size))| MatrixSectionSummary {
            id: section.id.clone(),
            key: keys.next_key(),
            name: section.name.clone().unwrap_or_default(),
            size: *size,
            pos: [s],
        })
        .collect();

    tracing::debug!(
        floors = floors.len(),
        sections = sections.len(),
        generated_names = generated,
        keys = keys.issued(),
        "Built building matrix"
    );

    Matrix {
        floors,
        sections: summaries,
    }
}

/// Names the unnamed units of the above-ground rows, counting upwards from
/// floor 1. Rows are stored top-down, so they are visited in reverse.
/// Underground rows keep their unnamed units as they are.
fn fill_missing_names(floors: &mut [MatrixFloorRow]) -> usize {
    let mut running_max: i64 = 0;
    let mut generated = 0;

    for row in floors.iter_mut().rev().filter(|row| row.index > 0) {
        let cells = row
            .sections
            .iter_mut()
            .flat_map(|section| section.units.iter_mut())
            .filter_map(MatrixUnit::as_unit_mut);

        for unit in cells {
            match unit.name.as_deref().filter(|name| !name.is_empty()) {
                Some(name) => {
                    if let Some(number) = numeric_name(name) {
                        running_max = running_max.max(number);
                    }
                }
                None => {
                    running_max = running_max.saturating_add(1);
                    unit.name = Some(running_max.to_string());
                    unit.is_name_auto_generated = true;
                    generated += 1;
                }
            }
        }
    }
    generated
}

/// A validated building together with its matrix.
///
/// The matrix is computed once at construction. To reflect changes, mutate
/// the document and construct a new builder.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    building: Building,
    matrix: Matrix,
    key_start: u64,
}

impl MatrixBuilder {
    /// Validates `building` and builds its matrix with keys starting at 0.
    pub fn new(building: Building) -> Result<Self> {
        Self::with_config(building, &LayoutConfig::default())
    }

    /// Validates `building` and builds its matrix with keys starting at
    /// `config.key_start`.
    pub fn with_config(building: Building, config: &LayoutConfig) -> Result<Self> {
        validate(&building)?;
        let mut keys = KeySequence::starting_at(config.key_start);
        let matrix = build_matrix(&building.sections, &mut keys);
        Ok(Self {
            building,
            matrix,
            key_start: config.key_start,
        })
    }

    /// Parses and validates a JSON document, then builds its matrix.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(Building::from_json(json)?)
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> Matrix {
        self.matrix
    }

    pub fn compute_extent(&self) -> Option<(i32, i32)> {
        compute_extent(&self.building.sections)
    }

    pub fn compute_section_sizes(&self) -> Vec<usize> {
        compute_section_sizes(&self.building.sections)
    }

    /// Builds a fresh matrix from the same start key. The result equals
    /// [`MatrixBuilder::matrix`].
    pub fn build_matrix(&self) -> Matrix {
        build_matrix(&self.building.sections, &mut KeySequence::starting_at(self.key_start))
    }
}
