//! Snapshot serialization: full colony state to/from JSON.
//!
//! A snapshot captures everything needed to resume a colony: resources,
//! the node/edge arrays, upgrades and the tick. Derived stats are never
//! stored. Loading is two-phase:
//!   1. Field-level checks over the raw JSON value, collecting EVERY
//!      violation (wrong version, wrong type, out of range, bad enum).
//!   2. Only if that list is empty, decode into typed structs.
//! A snapshot that fails phase 1 is never partially applied.

use crate::{
    graph::{
        numeric_suffix, EdgeStatus, GraphEdge, GraphNode, NodeKind, MAX_FLOW, MAX_ID_SUFFIX, MAX_STRAIN,
        MIN_FLOW, MIN_STRAIN,
    },
    resources::{ResourceKind, ResourcePool},
    state::GameState,
    types::{Millis, Tick},
    upgrades::{GameUpgrades, MAX_MAINTENANCE_REDUCTION},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializedGame {
    pub version:   u32,
    pub timestamp: Millis,
    pub tick:      Tick,
    pub resources: ResourcePool,
    pub nodes:     Vec<GraphNode>,
    pub edges:     Vec<GraphEdge>,
    pub upgrades:  GameUpgrades,
}

impl SerializedGame {
    /// Capture `state` at `tick`. Pure; always succeeds.
    pub fn capture(state: &GameState, tick: Tick, timestamp: Millis) -> Self {
        Self {
            version:   SAVE_VERSION,
            timestamp,
            tick,
            resources: state.resources,
            nodes:     state.nodes.clone(),
            edges:     state.edges.clone(),
            upgrades:  state.upgrades,
        }
    }

    pub fn to_state(&self) -> GameState {
        GameState {
            resources: self.resources,
            nodes:     self.nodes.clone(),
            edges:     self.edges.clone(),
            upgrades:  self.upgrades,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ── Validation errors ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-path-like location, e.g. `nodes[3].kind`.
    pub path:    String,
    pub message: String,
}

/// Every reason a payload was rejected, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} violation(s){}", .violations.len(), describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    fn single(path: &str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation { path: path.to_string(), message: message.into() }],
        }
    }

    /// True if any violation sits at exactly `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("; {}: {}", v.path, v.message))
        .collect()
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Parse snapshot text. Malformed JSON is reported as a violation at `$`.
pub fn parse_str(raw: &str) -> Result<SerializedGame, ValidationError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ValidationError::single("$", format!("not valid JSON: {e}")))?;
    parse_value(&value)
}

/// Validate and decode an already-parsed JSON document.
pub fn parse_value(value: &Value) -> Result<SerializedGame, ValidationError> {
    let mut checker = Checker::default();
    checker.check_root(value);
    if !checker.violations.is_empty() {
        return Err(ValidationError { violations: checker.violations });
    }
    serde_json::from_value(value.clone())
        .map_err(|e| ValidationError::single("$", format!("could not decode snapshot: {e}")))
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(Violation { path: path.to_string(), message: message.into() });
    }

    fn check_root(&mut self, value: &Value) {
        let Some(root) = value.as_object() else {
            self.fail("$", "expected an object");
            return;
        };

        match root.get("version") {
            Some(v) if v.as_u64() == Some(SAVE_VERSION as u64) => {}
            Some(v) => self.fail("version", format!("expected {SAVE_VERSION}, got {v}")),
            None => self.fail("version", "missing"),
        }
        match root.get("timestamp") {
            Some(v) if v.is_i64() || v.is_u64() => {}
            Some(_) => self.fail("timestamp", "expected integer milliseconds"),
            None => self.fail("timestamp", "missing"),
        }
        self.non_negative_int(root, "tick", "tick", u64::MAX);

        match root.get("resources") {
            Some(Value::Object(res)) => self.check_resources(res),
            Some(_) => self.fail("resources", "expected an object"),
            None => self.fail("resources", "missing"),
        }

        let mut node_ids = HashSet::new();
        let mut heart_count = 0;
        match root.get("nodes") {
            Some(Value::Array(nodes)) => {
                for (i, node) in nodes.iter().enumerate() {
                    let path = format!("nodes[{i}]");
                    if let Some((id, is_heart)) = self.check_node(&path, node) {
                        if !node_ids.insert(id.clone()) {
                            self.fail(&format!("{path}.id"), format!("duplicate node id '{id}'"));
                        }
                        if is_heart {
                            heart_count += 1;
                        }
                    }
                }
                if heart_count != 1 {
                    self.fail("nodes", format!("expected exactly one heart node, found {heart_count}"));
                }
            }
            Some(_) => self.fail("nodes", "expected an array"),
            None => self.fail("nodes", "missing"),
        }

        match root.get("edges") {
            Some(Value::Array(edges)) => {
                let mut edge_ids = HashSet::new();
                for (i, edge) in edges.iter().enumerate() {
                    let path = format!("edges[{i}]");
                    if let Some((id, from, to)) = self.check_edge(&path, edge) {
                        if !edge_ids.insert(id.clone()) {
                            self.fail(&format!("{path}.id"), format!("duplicate edge id '{id}'"));
                        }
                        for (field, endpoint) in [("from", from), ("to", to)] {
                            if !node_ids.contains(&endpoint) {
                                self.fail(
                                    &format!("{path}.{field}"),
                                    format!("references unknown node '{endpoint}'"),
                                );
                            }
                        }
                    }
                }
            }
            Some(_) => self.fail("edges", "expected an array"),
            None => self.fail("edges", "missing"),
        }

        match root.get("upgrades") {
            Some(Value::Object(up)) => {
                self.non_negative_int(up, "hyphaeLevel", "upgrades.hyphaeLevel", u32::MAX as u64);
                self.number_in(up, "maintenanceReduction", "upgrades.maintenanceReduction",
                    0.0, MAX_MAINTENANCE_REDUCTION);
                self.non_negative_int(up, "synthesisLevel", "upgrades.synthesisLevel", u32::MAX as u64);
            }
            Some(_) => self.fail("upgrades", "expected an object"),
            None => self.fail("upgrades", "missing"),
        }
    }

    fn check_resources(&mut self, res: &Map<String, Value>) {
        for kind in ResourceKind::ALL {
            let path = format!("resources.{}", kind.name());
            self.number_in(res, kind.name(), &path, 0.0, kind.cap());
        }
    }

    /// Returns `(id, is_heart)` when the id itself was usable.
    fn check_node(&mut self, path: &str, node: &Value) -> Option<(String, bool)> {
        let Some(obj) = node.as_object() else {
            self.fail(path, "expected an object");
            return None;
        };

        let id = self.entity_id(obj, &format!("{path}.id"));
        let kind = match obj.get("kind") {
            Some(Value::String(name)) => match NodeKind::from_name(name) {
                Some(kind) => Some(kind),
                None => {
                    self.fail(&format!("{path}.kind"), format!("unknown node kind '{name}'"));
                    None
                }
            },
            Some(_) => {
                self.fail(&format!("{path}.kind"), "expected a string");
                None
            }
            None => {
                self.fail(&format!("{path}.kind"), "missing");
                None
            }
        };
        self.non_empty_string(obj, "label", &format!("{path}.label"));

        match obj.get("position") {
            Some(Value::Object(pos)) => {
                self.number(pos, "x", &format!("{path}.position.x"));
                self.number(pos, "y", &format!("{path}.position.y"));
            }
            Some(_) => self.fail(&format!("{path}.position"), "expected an object"),
            None => self.fail(&format!("{path}.position"), "missing"),
        }

        self.optional_number(obj, "rate", &format!("{path}.rate"));
        self.optional_number(obj, "capacity", &format!("{path}.capacity"));
        self.non_negative_int(obj, "tier", &format!("{path}.tier"), u32::MAX as u64);
        self.number_in(obj, "integrity", &format!("{path}.integrity"), 0.0, 1.0);

        match obj.get("hazard") {
            None | Some(Value::Null) => {}
            Some(Value::String(h)) if h == "toxic" => {}
            Some(other) => self.fail(&format!("{path}.hazard"), format!("expected \"toxic\" or null, got {other}")),
        }
        self.non_negative_int(obj, "discoveredAt", &format!("{path}.discoveredAt"), u64::MAX);

        match obj.get("focus") {
            None => {}
            Some(Value::String(name)) if ResourceKind::from_name(name).is_some() => {}
            Some(other) => self.fail(&format!("{path}.focus"), format!("unknown resource kind {other}")),
        }

        Some((id?, kind? == NodeKind::Heart))
    }

    /// Returns `(id, from, to)` when all three were usable.
    fn check_edge(&mut self, path: &str, edge: &Value) -> Option<(String, String, String)> {
        let Some(obj) = edge.as_object() else {
            self.fail(path, "expected an object");
            return None;
        };

        let id = self.entity_id(obj, &format!("{path}.id"));
        let from = self.non_empty_string(obj, "from", &format!("{path}.from"));
        let to = self.non_empty_string(obj, "to", &format!("{path}.to"));
        self.number_in(obj, "width", &format!("{path}.width"), 0.0, f64::MAX);
        self.number_in(obj, "strain", &format!("{path}.strain"), MIN_STRAIN, MAX_STRAIN);
        self.number_in(obj, "length", &format!("{path}.length"), 0.0, f64::MAX);
        self.number_in(obj, "flow", &format!("{path}.flow"), MIN_FLOW, MAX_FLOW);

        match obj.get("status") {
            Some(Value::String(name)) if EdgeStatus::from_name(name).is_some() => {}
            Some(other) => self.fail(&format!("{path}.status"), format!("unknown edge status {other}")),
            None => self.fail(&format!("{path}.status"), "missing"),
        }

        Some((id?, from?, to?))
    }

    // ── Field primitives ─────────────────────────────────────────────────

    /// A non-empty id whose numeric suffix leaves room for new ids.
    fn entity_id(&mut self, obj: &Map<String, Value>, path: &str) -> Option<String> {
        let id = self.non_empty_string(obj, "id", path)?;
        if numeric_suffix(&id) > MAX_ID_SUFFIX {
            self.fail(path, format!("id suffix above {MAX_ID_SUFFIX}"));
        }
        Some(id)
    }

    fn non_empty_string(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
        match obj.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::String(_)) => {
                self.fail(path, "must not be empty");
                None
            }
            Some(_) => {
                self.fail(path, "expected a string");
                None
            }
            None => {
                self.fail(path, "missing");
                None
            }
        }
    }

    fn number(&mut self, obj: &Map<String, Value>, key: &str, path: &str) -> Option<f64> {
        match obj.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(_) => {
                self.fail(path, "expected a number");
                None
            }
            None => {
                self.fail(path, "missing");
                None
            }
        }
    }

    fn optional_number(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        match obj.get(key) {
            None | Some(Value::Number(_)) => {}
            Some(_) => self.fail(path, "expected a number when present"),
        }
    }

    fn number_in(&mut self, obj: &Map<String, Value>, key: &str, path: &str, min: f64, max: f64) {
        if let Some(n) = self.number(obj, key, path) {
            if n < min || n > max {
                self.fail(path, format!("{n} outside [{min}, {max}]"));
            }
        }
    }

    fn non_negative_int(&mut self, obj: &Map<String, Value>, key: &str, path: &str, max: u64) {
        match obj.get(key) {
            Some(v) => match v.as_u64() {
                Some(n) if n <= max => {}
                Some(n) => self.fail(path, format!("{n} exceeds {max}")),
                None => self.fail(path, "expected a non-negative integer"),
            },
            None => self.fail(path, "missing"),
        }
    }
}
