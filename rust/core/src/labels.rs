// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sequential display labels for units.

use crate::model::{numeric_name, Building};

/// Returns a copy of `building` where every unit has a `label`.
///
/// Numbering runs through the sections in order without restarting, and
/// through each section's floors from the last stored floor to the first
/// (bottom-up for top-down storage). A named unit is labelled with its name
/// and pushes the counter up to the name's numeric value; an unnamed unit
/// takes the next number. The counter starts at 1.
pub fn assign_labels(building: &Building) -> Building {
    let mut labelled = building.clone();
    let mut counter: i64 = 1;
    let mut generated = 0usize;

    for section in &mut labelled.sections {
        for floor in section.floors.iter_mut().rev() {
            for unit in &mut floor.units {
                match unit.given_name().map(str::to_owned) {
                    Some(name) => {
                        if let Some(number) = numeric_name(&name) {
                            counter = counter.max(number);
                        }
                        unit.label = Some(name);
                    }
                    None => {
                        counter = counter.saturating_add(1);
                        unit.label = Some(counter.to_string());
                        generated += 1;
                    }
                }
            }
        }
    }

    tracing::debug!(generated, last = counter, "Assigned unit labels");
    labelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Floor, Section, Unit};

    fn floor(id: &str, index: i32, names: &[Option<&str>]) -> Floor {
        let mut floor = Floor::new(id, index);
        floor.units = names
            .iter()
            .enumerate()
            .map(|(n, name)| {
                let unit = Unit::new(format!("{id}-{n}"));
                match name {
                    Some(name) => unit.with_name(*name),
                    None => unit,
                }
            })
            .collect();
        floor
    }

    fn labels(building: &Building) -> Vec<Vec<Vec<String>>> {
        building
            .sections
            .iter()
            .map(|section| {
                section
                    .floors
                    .iter()
                    .map(|floor| {
                        floor
                            .units
                            .iter()
                            .map(|unit| unit.label.clone().unwrap_or_default())
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn numbers_bottom_up_from_named_units() {
        let mut section = Section::new("a");
        section.floors = vec![
            floor("a2", 2, &[None, None]),
            floor("a1", 1, &[Some("1"), None]),
        ];
        let building = Building::new(vec![section]);
        let labelled = assign_labels(&building);
        assert_eq!(labels(&labelled), vec![vec![vec!["3", "4"], vec!["1", "2"]]]);
        // input untouched
        assert!(building.units().all(|unit| unit.label.is_none()));
    }

    #[test]
    fn counter_starts_at_one() {
        let mut section = Section::new("a");
        section.floors = vec![floor("a1", 1, &[None, None])];
        let labelled = assign_labels(&Building::new(vec![section]));
        assert_eq!(labels(&labelled), vec![vec![vec!["2", "3"]]]);
    }

    #[test]
    fn numbering_continues_across_sections() {
        let mut first = Section::new("a");
        first.floors = vec![floor("a1", 1, &[Some("10"), None])];
        let mut second = Section::new("b");
        second.floors = vec![floor("b2", 2, &[None]), floor("b-1", -1, &[None])];
        let labelled = assign_labels(&Building::new(vec![first, second]));
        assert_eq!(
            labels(&labelled),
            vec![vec![vec!["10", "11"]], vec![vec!["13"], vec!["12"]]]
        );
    }

    #[test]
    fn non_numeric_and_lower_names_keep_counter() {
        let mut section = Section::new("a");
        section.floors = vec![floor("a1", 1, &[Some("5"), Some("shop"), Some("2"), Some(""), None])];
        let labelled = assign_labels(&Building::new(vec![section]));
        assert_eq!(labels(&labelled), vec![vec![vec!["5", "shop", "2", "6", "7"]]]);
    }

    #[test]
    fn counter_saturates_at_largest_number() {
        let largest = i64::MAX.to_string();
        let mut section = Section::new("a");
        section.floors = vec![floor("a1", 1, &[Some(largest.as_str()), None])];
        let labelled = assign_labels(&Building::new(vec![section]));
        assert_eq!(labels(&labelled), vec![vec![vec![largest.clone(), largest]]]);
    }
}
