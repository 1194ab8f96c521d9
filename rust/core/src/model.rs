// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The hierarchical building document: sections own floors, floors own units.
//!
//! The document is the persisted wire format, so every node keeps the fields
//! it does not understand in an `extra` map and writes them back unchanged.
//! Nodes serialize with their `type` discriminant (`"section"`, `"floor"`,
//! `"unit"`); deserialization always goes through [`crate::validation`], so a
//! deserialized [`Building`] or [`Section`] is known to be well-formed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::validation;

/// Fields of a node that are carried through without interpretation.
pub type Extra = serde_json::Map<String, Value>;

/// Identifier of a section, floor or unit. The wire format allows both
/// strings and integers; `"1"` and `1` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        EntityId::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<i32> for EntityId {
    fn from(n: i32) -> Self {
        EntityId::Number(i64::from(n))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

/// Discriminant for building map nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Section,
    Floor,
    Unit,
}

impl NodeKind {
    /// Returns the tag as written in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Floor => "floor",
            NodeKind::Unit => "unit",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One apartment, room or parking place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "unit")]
pub struct Unit {
    pub id: EntityId,
    /// Ground-truth identifier, may be absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Derived display string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Unit {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            label: None,
            extra: Extra::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the name when it is present and non-empty.
    pub fn given_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// One storey of a section. Positive indices are above ground, negative
/// indices underground; there is no floor 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "floor")]
pub struct Floor {
    pub id: EntityId,
    pub index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub units: Vec<Unit>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Floor {
    pub fn new(id: impl Into<EntityId>, index: i32) -> Self {
        Self {
            id: id.into(),
            index,
            name: None,
            units: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// The floor name, falling back to the index.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.index.to_string())
    }
}

/// A wing or entrance of the building. Floors are stored top-down.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "section")]
pub struct Section {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub floors: Vec<Floor>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Section {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            floors: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Total number of units over all floors.
    pub fn unit_count(&self) -> usize {
        self.floors.iter().map(|floor| floor.units.len()).sum()
    }

    /// Largest number of units on any single floor; 0 without floors.
    pub fn max_units_per_floor(&self) -> usize {
        self.floors
            .iter()
            .map(|floor| floor.units.len())
            .max()
            .unwrap_or(0)
    }

    pub fn floor(&self, index: i32) -> Option<&Floor> {
        self.floors.iter().find(|floor| floor.index == index)
    }

    pub fn max_floor(&self) -> Option<i32> {
        self.floors.iter().map(|floor| floor.index).max()
    }

    pub fn min_floor(&self) -> Option<i32> {
        self.floors.iter().map(|floor| floor.index).min()
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validation::parse_section(&value).map_err(serde::de::Error::custom)
    }
}

/// The whole building map document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "building")]
pub struct Building {
    pub sections: Vec<Section>,
    /// Top-level fields such as `dv` or `parking`.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Building {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            extra: Extra::new(),
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(validation::parse_building(&value)?)
    }

    /// Serializes the document to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Iterates over every unit in document order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.sections
            .iter()
            .flat_map(|section| section.floors.iter())
            .flat_map(|floor| floor.units.iter())
    }
}

impl<'de> Deserialize<'de> for Building {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        validation::parse_building(&value).map_err(serde::de::Error::custom)
    }
}

/// Numeric value of a unit or section name, if it is a plain base-10 integer.
pub fn numeric_name(name: &str) -> Option<i64> {
    name.trim().parse().ok()
}
