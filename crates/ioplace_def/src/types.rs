//! Design data model read from and written to DEF.
//!
//! All coordinates are in the design's database units.

use ioplace_common::{Dbu, Orient, Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// DEF assumes 100 database units per micron when `UNITS` is absent.
pub const DEFAULT_DBU_PER_MICRON: i64 = 100;

/// How firmly an object is placed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PlacementStatus {
    /// Placed, free to move.
    Placed,
    /// Fixed by the user; tools must not move it.
    Fixed,
    /// Part of the cover macro; never moved.
    Cover,
}

impl PlacementStatus {
    pub(crate) fn from_keyword(kw: &str) -> Option<Self> {
        match kw {
            "PLACED" => Some(PlacementStatus::Placed),
            "FIXED" => Some(PlacementStatus::Fixed),
            "COVER" => Some(PlacementStatus::Cover),
            _ => None,
        }
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlacementStatus::Placed => "PLACED",
            PlacementStatus::Fixed => "FIXED",
            PlacementStatus::Cover => "COVER",
        })
    }
}

/// A placed location with its status and orientation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Placement {
    /// `PLACED`, `FIXED` or `COVER`.
    pub status: PlacementStatus,
    /// The placement origin.
    pub location: Point,
    /// The placement orientation.
    pub orient: Orient,
}

/// The signal direction of a pin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PinDirection {
    /// Driven from outside the block.
    Input,
    /// Driven by the block.
    Output,
    /// Bidirectional.
    Inout,
    /// Passes straight through the block.
    Feedthru,
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PinDirection::Input => "INPUT",
            PinDirection::Output => "OUTPUT",
            PinDirection::Inout => "INOUT",
            PinDirection::Feedthru => "FEEDTHRU",
        })
    }
}

impl FromStr for PinDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INPUT" => Ok(PinDirection::Input),
            "OUTPUT" => Ok(PinDirection::Output),
            "INOUT" => Ok(PinDirection::Inout),
            "FEEDTHRU" => Ok(PinDirection::Feedthru),
            other => Err(format!("unknown pin direction `{other}`")),
        }
    }
}

/// The `USE` of a pin or net.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SignalUse {
    /// Ordinary logic signal.
    Signal,
    /// Power supply.
    Power,
    /// Ground supply.
    Ground,
    /// Clock.
    Clock,
    /// Tie-off.
    Tieoff,
    /// Analog signal.
    Analog,
    /// Scan chain.
    Scan,
    /// Reset.
    Reset,
}

impl SignalUse {
    /// Returns `true` for power and ground.
    pub fn is_supply(self) -> bool {
        matches!(self, SignalUse::Power | SignalUse::Ground)
    }
}

impl fmt::Display for SignalUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalUse::Signal => "SIGNAL",
            SignalUse::Power => "POWER",
            SignalUse::Ground => "GROUND",
            SignalUse::Clock => "CLOCK",
            SignalUse::Tieoff => "TIEOFF",
            SignalUse::Analog => "ANALOG",
            SignalUse::Scan => "SCAN",
            SignalUse::Reset => "RESET",
        })
    }
}

impl FromStr for SignalUse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SIGNAL" => Ok(SignalUse::Signal),
            "POWER" => Ok(SignalUse::Power),
            "GROUND" => Ok(SignalUse::Ground),
            "CLOCK" => Ok(SignalUse::Clock),
            "TIEOFF" => Ok(SignalUse::Tieoff),
            "ANALOG" => Ok(SignalUse::Analog),
            "SCAN" => Ok(SignalUse::Scan),
            "RESET" => Ok(SignalUse::Reset),
            other => Err(format!("unknown USE `{other}`")),
        }
    }
}

/// A standard-cell row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Row name.
    pub name: String,
    /// Site the row is made of.
    pub site: String,
    /// Origin of the first site.
    pub origin: Point,
    /// Site orientation.
    pub orient: Orient,
    /// `DO numX BY numY STEP stepX stepY`, when present.
    pub repeat: Option<(i64, i64, Dbu, Dbu)>,
}

/// The axis a `TRACKS` or `GCELLGRID` statement steps along.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TrackAxis {
    /// Lines at constant X (vertical tracks).
    X,
    /// Lines at constant Y (horizontal tracks).
    Y,
}

impl fmt::Display for TrackAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrackAxis::X => "X",
            TrackAxis::Y => "Y",
        })
    }
}

/// A `TRACKS` statement: `num` routing tracks starting at `start`, `step` apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracks {
    /// Which coordinate the track positions are.
    pub axis: TrackAxis,
    /// Coordinate of the first track.
    pub start: Dbu,
    /// Number of tracks.
    pub num: i64,
    /// Distance between tracks.
    pub step: Dbu,
    /// Layers the tracks apply to.
    pub layers: Vec<String>,
}

impl Tracks {
    /// Iterates over the track coordinates.
    pub fn positions(&self) -> impl Iterator<Item = Dbu> + '_ {
        (0..self.num.max(0)).map(move |i| self.start + i * self.step)
    }
}

/// A `GCELLGRID` statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcellGrid {
    /// Axis of the grid lines.
    pub axis: TrackAxis,
    /// First grid line.
    pub start: Dbu,
    /// Number of grid lines.
    pub num: i64,
    /// Distance between grid lines.
    pub step: Dbu,
}

/// A component (cell instance).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Instance name.
    pub name: String,
    /// Macro the instance is of.
    pub macro_name: String,
    /// Placement, absent for unplaced instances.
    pub placement: Option<Placement>,
}

/// The physical shape of a placed pin, relative to its placement location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinShape {
    /// Layer the shape is drawn on.
    pub layer: String,
    /// Rectangle relative to the pin location, before orientation.
    pub rect: Rect,
}

/// An I/O pin of the design.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Pin name.
    pub name: String,
    /// Net the pin connects to.
    pub net: Option<String>,
    /// Whether the pin was declared `+ SPECIAL`.
    pub special: bool,
    /// Signal direction.
    pub direction: Option<PinDirection>,
    /// Signal use.
    pub usage: Option<SignalUse>,
    /// Pin geometry, once the pin has a layer.
    pub shape: Option<PinShape>,
    /// Placement, absent for unplaced pins.
    pub placement: Option<Placement>,
}

impl Pin {
    /// Creates an unplaced pin with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            net: None,
            special: false,
            direction: None,
            usage: None,
            shape: None,
            placement: None,
        }
    }

    /// Returns `true` if the pin has both a placement and a shape.
    pub fn is_placed(&self) -> bool {
        self.placement.is_some() && self.shape.is_some()
    }

    /// Returns `true` for power and ground pins.
    pub fn is_supply(&self) -> bool {
        self.usage.is_some_and(SignalUse::is_supply)
    }

    /// The pin shape transformed into die coordinates.
    pub fn absolute_rect(&self) -> Option<Rect> {
        let shape = self.shape.as_ref()?;
        let placement = self.placement.as_ref()?;
        Some(
            placement
                .orient
                .apply_rect(&shape.rect)
                .translate(placement.location),
        )
    }
}

/// One `( component pin )` entry of a net.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetConnection {
    /// Component name, or `PIN` for an I/O pin.
    pub component: String,
    /// Pin name on the component, or the I/O pin name.
    pub pin: String,
}

impl NetConnection {
    /// Returns `true` if this entry refers to an I/O pin of the design.
    pub fn is_io_pin(&self) -> bool {
        self.component == "PIN"
    }
}

/// A net and its connections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// Net name.
    pub name: String,
    /// Connected component and I/O pins, in file order.
    pub connections: Vec<NetConnection>,
    /// Signal use.
    pub usage: Option<SignalUse>,
}

/// A mutable design: the contents of one DEF file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Design {
    /// `VERSION` statement.
    pub version: Option<String>,
    /// `DIVIDERCHAR` statement.
    pub divider_char: Option<String>,
    /// `BUSBITCHARS` statement.
    pub bus_bit_chars: Option<String>,
    /// Design name.
    pub name: String,
    /// `UNITS DISTANCE MICRONS` value.
    pub dbu_per_micron: Option<i64>,
    /// `DIEAREA` points as written: two corners or a polygon.
    pub die_area: Vec<Point>,
    /// Rows in file order.
    pub rows: Vec<Row>,
    /// Track statements in file order.
    pub tracks: Vec<Tracks>,
    /// Gcell grid statements in file order.
    pub gcell_grids: Vec<GcellGrid>,
    /// Components in file order.
    pub components: Vec<Component>,
    /// Pins in file order.
    pub pins: Vec<Pin>,
    /// Nets in file order.
    pub nets: Vec<Net>,
    #[serde(skip)]
    pin_index: HashMap<String, usize>,
    #[serde(skip)]
    component_index: HashMap<String, usize>,
    #[serde(skip)]
    net_index: HashMap<String, usize>,
}

impl Design {
    /// Creates an empty design with the usual header defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: Some("5.8".to_string()),
            divider_char: Some("/".to_string()),
            bus_bit_chars: Some("[]".to_string()),
            name: name.into(),
            dbu_per_micron: None,
            die_area: Vec::new(),
            rows: Vec::new(),
            tracks: Vec::new(),
            gcell_grids: Vec::new(),
            components: Vec::new(),
            pins: Vec::new(),
            nets: Vec::new(),
            pin_index: HashMap::new(),
            component_index: HashMap::new(),
            net_index: HashMap::new(),
        }
    }

    /// Database units per micron, defaulting to [`DEFAULT_DBU_PER_MICRON`].
    pub fn dbu(&self) -> i64 {
        self.dbu_per_micron.unwrap_or(DEFAULT_DBU_PER_MICRON)
    }

    /// Bounding box of the die area.
    pub fn die_rect(&self) -> Option<Rect> {
        Rect::bounding(&self.die_area)
    }

    /// Adds a component; a later component with the same name shadows the earlier one.
    pub fn add_component(&mut self, component: Component) {
        self.component_index
            .insert(component.name.clone(), self.components.len());
        self.components.push(component);
    }

    /// Adds a pin; a later pin with the same name shadows the earlier one.
    pub fn add_pin(&mut self, pin: Pin) {
        self.pin_index.insert(pin.name.clone(), self.pins.len());
        self.pins.push(pin);
    }

    /// Adds a net; a later net with the same name shadows the earlier one.
    pub fn add_net(&mut self, net: Net) {
        self.net_index.insert(net.name.clone(), self.nets.len());
        self.nets.push(net);
    }

    /// Looks a pin up by name.
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pin_index.get(name).map(|&i| &self.pins[i])
    }

    /// Looks a pin up by name for modification.
    pub fn pin_mut(&mut self, name: &str) -> Option<&mut Pin> {
        self.pin_index.get(name).map(|&i| &mut self.pins[i])
    }

    /// Looks a component up by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.component_index.get(name).map(|&i| &self.components[i])
    }

    /// Looks a net up by name.
    pub fn net(&self, name: &str) -> Option<&Net> {
        self.net_index.get(name).map(|&i| &self.nets[i])
    }

    /// Iterates over signal pins that still need a placement.
    pub fn unplaced_pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| !p.is_placed() && !p.is_supply())
    }

    /// Track statements that apply to `layer` along `axis`.
    pub fn tracks_for(&self, layer: &str, axis: TrackAxis) -> impl Iterator<Item = &Tracks> {
        let layer = layer.to_string();
        self.tracks
            .iter()
            .filter(move |t| t.axis == axis && t.layers.iter().any(|l| *l == layer))
    }

    /// Rebuilds the name indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.pin_index = index_by_name(self.pins.iter().map(|p| p.name.as_str()));
        self.component_index = index_by_name(self.components.iter().map(|c| c.name.as_str()));
        self.net_index = index_by_name(self.nets.iter().map(|n| n.name.as_str()));
    }
}

fn index_by_name<'a>(names: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    names.enumerate().map(|(i, n)| (n.to_string(), i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed_pin(name: &str, layer: &str, at: Point, orient: Orient) -> Pin {
        Pin {
            shape: Some(PinShape {
                layer: layer.to_string(),
                rect: Rect::from_coords(-70, 0, 70, 140),
            }),
            placement: Some(Placement {
                status: PlacementStatus::Placed,
                location: at,
                orient,
            }),
            ..Pin::new(name)
        }
    }

    #[test]
    fn die_rect_from_polygon() {
        let mut d = Design::new("top");
        d.die_area = vec![
            Point::new(0, 0),
            Point::new(0, 500),
            Point::new(800, 500),
            Point::new(800, 0),
        ];
        assert_eq!(d.die_rect(), Some(Rect::from_coords(0, 0, 800, 500)));
        assert_eq!(Design::new("empty").die_rect(), None);
    }

    #[test]
    fn dbu_default() {
        let mut d = Design::new("top");
        assert_eq!(d.dbu(), 100);
        d.dbu_per_micron = Some(2000);
        assert_eq!(d.dbu(), 2000);
    }

    #[test]
    fn unplaced_pins_skip_placed_and_supply() {
        let mut d = Design::new("top");
        d.add_pin(Pin::new("a"));
        d.add_pin(placed_pin("b", "metal2", Point::new(100, 0), Orient::N));
        d.add_pin(Pin {
            usage: Some(SignalUse::Power),
            ..Pin::new("VDD")
        });
        let names: Vec<_> = d.unplaced_pins().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn absolute_rect_applies_orient() {
        let pin = placed_pin("p", "metal2", Point::new(500, 1000), Orient::S);
        assert_eq!(
            pin.absolute_rect(),
            Some(Rect::from_coords(430, 860, 570, 1000))
        );
        assert_eq!(Pin::new("q").absolute_rect(), None);
    }

    #[test]
    fn track_positions() {
        let t = Tracks {
            axis: TrackAxis::X,
            start: 95,
            num: 3,
            step: 190,
            layers: vec!["metal2".to_string()],
        };
        assert_eq!(t.positions().collect::<Vec<_>>(), vec![95, 285, 475]);
    }

    #[test]
    fn tracks_for_filters_layer_and_axis() {
        let mut d = Design::new("top");
        d.tracks.push(Tracks {
            axis: TrackAxis::X,
            start: 0,
            num: 2,
            step: 10,
            layers: vec!["metal2".to_string()],
        });
        d.tracks.push(Tracks {
            axis: TrackAxis::Y,
            start: 0,
            num: 2,
            step: 10,
            layers: vec!["metal2".to_string(), "metal3".to_string()],
        });
        assert_eq!(d.tracks_for("metal2", TrackAxis::X).count(), 1);
        assert_eq!(d.tracks_for("metal3", TrackAxis::Y).count(), 1);
        assert_eq!(d.tracks_for("metal3", TrackAxis::X).count(), 0);
    }

    #[test]
    fn direction_and_use_parse() {
        assert_eq!("input".parse::<PinDirection>().unwrap(), PinDirection::Input);
        assert_eq!(PinDirection::Feedthru.to_string(), "FEEDTHRU");
        assert!("SIDEWAYS".parse::<PinDirection>().is_err());
        assert!("GROUND".parse::<SignalUse>().unwrap().is_supply());
        assert!(!SignalUse::Clock.is_supply());
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let mut d = Design::new("top");
        d.add_pin(Pin::new("clk"));
        d.add_net(Net {
            name: "clk".to_string(),
            connections: vec![NetConnection {
                component: "PIN".to_string(),
                pin: "clk".to_string(),
            }],
            usage: None,
        });
        let json = serde_json::to_string(&d).unwrap();
        let mut back: Design = serde_json::from_str(&json).unwrap();
        back.rebuild_indices();
        assert!(back.pin("clk").is_some());
        assert!(back.net("clk").unwrap().connections[0].is_io_pin());
    }
}
