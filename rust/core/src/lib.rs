// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Building Map Core
//!
//! The hierarchical building map document and the operations that keep it
//! well-formed.
//!
//! A building is a list of sections (entrances, wings); each section stores
//! its floors top-down by signed, nonzero index (negative = underground);
//! each floor holds its units (apartments, rooms, parking places).
//!
//! ## Overview
//!
//! - **Validation**: unique ids building-wide, no floor 0, strictly
//!   decreasing floor order ([`validation`])
//! - **Section generation**: a complete section from a floor range and a
//!   unit count ([`create_section`])
//! - **Unit insertion**: one unit on an existing or new floor, keeping the
//!   floor order ([`insert_unit`])
//! - **Building edits**: removing and copying sections, removing and moving
//!   units across sections ([`edit`])
//! - **Labels**: sequential display labels across sections ([`assign_labels`])
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use building_map_core::{create_section, insert_unit, Building, NewSection, NewUnit};
//!
//! let section = create_section(&NewSection {
//!     section_name: "1".into(),
//!     min_floor: -1,
//!     max_floor: 9,
//!     units_per_floor: 4,
//! })?;
//! let (section, unit_id) = insert_unit(&section, 10, NewUnit::named("penthouse"))?;
//!
//! let mut building = Building::default();
//! building.add_section(section)?;
//! let json = building.to_json()?;
//! ```

pub mod config;
pub mod edit;
pub mod error;
pub mod factory;
pub mod insert;
pub mod labels;
pub mod model;
pub mod query;
pub mod validation;

pub use config::LayoutConfig;
pub use edit::UnitUpdate;
pub use error::{ArgumentError, Error, NodePath, Result, SchemaViolation};
pub use factory::{create_section, NewSection, SectionFactory};
pub use insert::{insert_unit, insert_unit_in_place, remove_unit, NewUnit};
pub use labels::assign_labels;
pub use model::{numeric_name, Building, EntityId, Extra, Floor, NodeKind, Section, Unit};
pub use query::UnitLocation;
pub use validation::{
    parse_building, parse_section, validate, validate_floor, validate_section, validate_unique_labels,
};
