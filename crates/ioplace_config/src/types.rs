//! Configuration types deserialized from `ioplace.toml`.

use ioplace_common::Dbu;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level run configuration parsed from `ioplace.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Input and output files.
    pub design: DesignConfig,
    /// Placement layers and parameters.
    #[serde(default)]
    pub placement: PlacementConfig,
    /// Pin constraints in registration order.
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
}

/// The files a run reads and writes. Relative paths are relative to the
/// directory holding `ioplace.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignConfig {
    /// Technology LEF file.
    pub lef: String,
    /// Input DEF file.
    pub def: String,
    /// DEF file the placed design is written to.
    pub output: String,
    /// Expected output to diff against.
    #[serde(default)]
    pub golden: Option<String>,
}

/// Placement layers and tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlacementConfig {
    /// Horizontal layers, hosting pins on the left and right edges.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub hor_layers: Vec<String>,
    /// Vertical layers, hosting pins on the bottom and top edges.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub ver_layers: Vec<String>,
    /// Randomized rather than wirelength-driven assignment.
    #[serde(default)]
    pub random: bool,
    /// Seed for randomized assignment.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Corner keep-out in database units.
    #[serde(default)]
    pub corner_avoidance: Dbu,
    /// Minimum same-layer pin distance; 0 means one track pitch.
    #[serde(default)]
    pub min_distance: Dbu,
    /// Interpret `min_distance` as a track count.
    #[serde(default)]
    pub min_distance_in_tracks: bool,
    /// Outward pin shape extension in database units.
    #[serde(default)]
    pub pin_extension: Dbu,
}

fn default_seed() -> u64 {
    42
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            hor_layers: Vec::new(),
            ver_layers: Vec::new(),
            random: false,
            seed: default_seed(),
            corner_avoidance: 0,
            min_distance: 0,
            min_distance_in_tracks: false,
            pin_extension: 0,
        }
    }
}

/// One `[[constraints]]` entry: a direction or a list of pin names, and a region.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConstraintEntry {
    /// Pin direction the constraint applies to, e.g. `INPUT`.
    #[serde(default)]
    pub direction: Option<String>,
    /// Pin names the constraint applies to.
    #[serde(default, deserialize_with = "deserialize_opt_string_or_vec")]
    pub pins: Option<Vec<String>>,
    /// Region string, e.g. `top:*` or `left:10-40`.
    pub region: String,
}

impl ConstraintEntry {
    /// Returns `true` if the entry targets named pins rather than a direction.
    pub fn is_pin_list(&self) -> bool {
        self.pins.is_some()
    }

    /// The entry in command-line form: `DIRECTION:REGION` or `NAME,NAME:REGION`.
    pub fn to_arg(&self) -> String {
        match (&self.direction, &self.pins) {
            (Some(dir), _) => format!("{dir}:{}", self.region),
            (None, Some(pins)) => format!("{}:{}", pins.join(","), self.region),
            (None, None) => format!(":{}", self.region),
        }
    }
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `hor_layers = "metal3"` (string) and
/// `hor_layers = ["metal3", "metal5"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.split_whitespace().map(str::to_string).collect())
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

fn deserialize_opt_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_string_or_vec(deserializer).map(Some)
}
