// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Building Map Matrix
//!
//! Turns a sparse building map (sections → floors → units) into the dense,
//! rectangular view a chessboard renderer draws: one row per floor index from
//! the top of the building down, one column block per section, every block
//! padded to the width of that section's widest floor.
//!
//! ## Overview
//!
//! - **Rows**: one per distinct nonzero floor index ([`build_floor_row`])
//! - **Padding**: `{"type": "empty"}` cells up to the section size
//! - **Keys**: deterministic synthetic keys from a per-build [`KeySequence`]
//! - **Auto-naming**: unnamed units on floors 1 and up get sequential names
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use building_map_matrix::MatrixBuilder;
//!
//! let builder = MatrixBuilder::from_json(&json)?;
//! for row in &builder.matrix().floors {
//!     println!("{}: {} sections", row.name, row.sections.len());
//! }
//! let rendered = builder.matrix().to_json()?;
//! ```

pub mod builder;
pub mod keys;
pub mod view;

pub use builder::{build_floor_row, build_matrix, compute_extent, compute_section_sizes, MatrixBuilder};
pub use keys::KeySequence;
pub use view::{Matrix, MatrixFloorRow, MatrixSectionRow, MatrixSectionSummary, MatrixUnit, PlacedUnit};
