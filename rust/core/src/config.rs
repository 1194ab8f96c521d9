// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout limits, optionally loaded from environment variables.

/// Default upper bound on floors in one generated section.
pub const MAX_FLOORS: usize = 100;

/// Default upper bound on units per floor in one generated section.
pub const MAX_UNITS_PER_FLOOR: usize = 300;

/// Limits and numbering settings shared by the editing and matrix code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Maximum floors a generated section may have.
    pub max_floors: usize,
    /// Maximum units per floor a generated section may have.
    pub max_units_per_floor: usize,
    /// First synthetic key issued by a matrix build.
    pub key_start: u64,
}

impl LayoutConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            max_floors: std::env::var("BUILDING_MAP_MAX_FLOORS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(MAX_FLOORS),
            max_units_per_floor: std::env::var("BUILDING_MAP_MAX_UNITS_PER_FLOOR")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(MAX_UNITS_PER_FLOOR),
            key_start: std::env::var("BUILDING_MAP_KEY_START")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(0),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_floors: MAX_FLOORS,
            max_units_per_floor: MAX_UNITS_PER_FLOOR,
            key_start: 0,
        }
    }
}
