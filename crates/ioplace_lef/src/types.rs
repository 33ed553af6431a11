//! Technology data model read from LEF.
//!
//! Lengths are kept in microns as written in the file. Consumers convert
//! them with [`to_dbu`] using the database units of the design they are
//! working on, since a DEF may declare a different resolution than the LEF.

use ioplace_common::Dbu;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Converts a length in microns to database units, rounding to nearest.
pub fn to_dbu(microns: f64, dbu_per_micron: i64) -> Dbu {
    (microns * dbu_per_micron as f64).round() as Dbu
}

/// The kind of a LEF layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LayerType {
    /// A metal layer wires and pins are drawn on.
    Routing,
    /// A via cut layer.
    Cut,
    /// A base (poly/diffusion) layer.
    Masterslice,
    /// The macro overlap layer.
    Overlap,
    /// Any other `TYPE` keyword (implant, well, ...).
    Other,
}

impl LayerType {
    pub(crate) fn from_keyword(kw: &str) -> Self {
        match kw {
            "ROUTING" => LayerType::Routing,
            "CUT" => LayerType::Cut,
            "MASTERSLICE" => LayerType::Masterslice,
            "OVERLAP" => LayerType::Overlap,
            _ => LayerType::Other,
        }
    }
}

/// The preferred routing direction of a layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LayerDirection {
    /// Wires run along X; tracks are spaced along Y.
    Horizontal,
    /// Wires run along Y; tracks are spaced along X.
    Vertical,
}

impl fmt::Display for LayerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerDirection::Horizontal => f.write_str("HORIZONTAL"),
            LayerDirection::Vertical => f.write_str("VERTICAL"),
        }
    }
}

/// A technology layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name, e.g. `metal2`.
    pub name: String,
    /// The `TYPE` of the layer.
    pub layer_type: LayerType,
    /// Preferred direction, for routing layers that declare one.
    pub direction: Option<LayerDirection>,
    /// Track pitch as `(x, y)`; a single-value `PITCH` fills both.
    pub pitch: Option<(f64, f64)>,
    /// Track offset as `(x, y)`; a single-value `OFFSET` fills both.
    pub offset: Option<(f64, f64)>,
    /// Default wire width.
    pub width: Option<f64>,
    /// Minimum same-layer spacing (the first `SPACING` value).
    pub spacing: Option<f64>,
    /// Minimum metal area in square microns.
    pub area: Option<f64>,
}

impl Layer {
    /// Creates a layer with only a name and type.
    pub fn new(name: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            name: name.into(),
            layer_type,
            direction: None,
            pitch: None,
            offset: None,
            width: None,
            spacing: None,
            area: None,
        }
    }

    /// Returns `true` for routing layers.
    pub fn is_routing(&self) -> bool {
        self.layer_type == LayerType::Routing
    }

    /// Returns `true` if the layer prefers horizontal wires.
    pub fn is_horizontal(&self) -> bool {
        self.direction == Some(LayerDirection::Horizontal)
    }

    /// Returns `true` if the layer prefers vertical wires.
    pub fn is_vertical(&self) -> bool {
        self.direction == Some(LayerDirection::Vertical)
    }

    /// The distance between adjacent tracks across the preferred direction.
    pub fn track_pitch(&self) -> Option<f64> {
        let (x, y) = self.pitch?;
        Some(if self.is_horizontal() { y } else { x })
    }

    /// The first-track offset across the preferred direction.
    pub fn track_offset(&self) -> Option<f64> {
        let (x, y) = self.offset?;
        Some(if self.is_horizontal() { y } else { x })
    }
}

/// A library macro, kept only for its footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroDef {
    /// Macro name, e.g. `NAND2_X1`.
    pub name: String,
    /// The `CLASS` keyword, e.g. `CORE`.
    pub class: Option<String>,
    /// Footprint as `(width, height)` in microns.
    pub size: Option<(f64, f64)>,
}

/// An immutable technology description.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Technology {
    /// The `VERSION` statement, if present.
    pub version: Option<String>,
    /// Database units per micron from `UNITS DATABASE MICRONS`.
    pub dbu_per_micron: Option<i64>,
    /// Manufacturing grid in microns.
    pub manufacturing_grid: Option<f64>,
    /// Layers in file order (bottom of the stack first).
    pub layers: Vec<Layer>,
    /// Macros in file order.
    pub macros: Vec<MacroDef>,
    #[serde(skip)]
    layer_index: HashMap<String, usize>,
    #[serde(skip)]
    macro_index: HashMap<String, usize>,
}

impl Technology {
    /// Creates an empty technology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer. A layer with the same name is replaced in place and
    /// `false` is returned.
    pub fn add_layer(&mut self, layer: Layer) -> bool {
        if let Some(&i) = self.layer_index.get(&layer.name) {
            self.layers[i] = layer;
            return false;
        }
        self.layer_index
            .insert(layer.name.clone(), self.layers.len());
        self.layers.push(layer);
        true
    }

    /// Adds a macro, replacing an earlier macro of the same name.
    pub fn add_macro(&mut self, mac: MacroDef) {
        if let Some(&i) = self.macro_index.get(&mac.name) {
            self.macros[i] = mac;
            return;
        }
        self.macro_index.insert(mac.name.clone(), self.macros.len());
        self.macros.push(mac);
    }

    /// Looks a layer up by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layer_index.get(name).map(|&i| &self.layers[i])
    }

    /// Looks a macro up by name.
    pub fn macro_def(&self, name: &str) -> Option<&MacroDef> {
        self.macro_index.get(name).map(|&i| &self.macros[i])
    }

    /// Iterates over the routing layers, bottom first.
    pub fn routing_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.is_routing())
    }

    /// Rebuilds the name indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.layer_index = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name.clone(), i))
            .collect();
        self.macro_index = self
            .macros
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
    }
}
