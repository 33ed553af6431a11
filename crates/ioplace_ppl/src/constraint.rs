//! Pin constraints: which pins must go into which boundary region.

use crate::error::PlacementError;
use crate::region::Region;
use ioplace_def::{Pin, PinDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The pins a constraint applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinTarget {
    /// Every pin with this signal direction.
    Direction(PinDirection),
    /// The named pins.
    Names(Vec<String>),
}

/// A rule restricting a set of pins to a boundary region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Pins the rule applies to.
    pub target: PinTarget,
    /// Where those pins must be placed.
    pub region: Region,
}

impl Constraint {
    /// Constrains every pin of direction `direction` to `region`.
    pub fn direction(direction: PinDirection, region: Region) -> Self {
        Self {
            target: PinTarget::Direction(direction),
            region,
        }
    }

    /// Constrains the named pins to `region`.
    pub fn pins<I, S>(names: I, region: Region) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target: PinTarget::Names(names.into_iter().map(Into::into).collect()),
            region,
        }
    }

    /// Parses `DIRECTION:REGION`, e.g. `INPUT:top:*`.
    pub fn parse(text: &str) -> Result<Self, PlacementError> {
        let (direction, region) = split_target(text)?;
        let direction = direction
            .parse::<PinDirection>()
            .map_err(|reason| PlacementError::InvalidConstraint {
                text: text.to_string(),
                reason,
            })?;
        Ok(Self::direction(direction, region.parse()?))
    }

    /// Parses `NAME[,NAME...]:REGION`, e.g. `clk,reset:left:*`.
    pub fn parse_pins(text: &str) -> Result<Self, PlacementError> {
        let (names, region) = split_target(text)?;
        let names: Vec<&str> = names
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(PlacementError::InvalidConstraint {
                text: text.to_string(),
                reason: "no pin names given".to_string(),
            });
        }
        Ok(Self::pins(names, region.parse()?))
    }

    /// Returns `true` if `pin` is one of the pins this constraint applies to.
    pub fn matches(&self, pin: &Pin) -> bool {
        match &self.target {
            PinTarget::Direction(dir) => pin.direction == Some(*dir),
            PinTarget::Names(names) => names.iter().any(|n| *n == pin.name),
        }
    }
}

fn split_target(text: &str) -> Result<(&str, &str), PlacementError> {
    text.split_once(':')
        .filter(|(target, _)| !target.trim().is_empty())
        .map(|(target, region)| (target.trim(), region))
        .ok_or_else(|| PlacementError::InvalidConstraint {
            text: text.to_string(),
            reason: "expected `TARGET:edge:range`".to_string(),
        })
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            PinTarget::Direction(dir) => write!(f, "{dir}:{}", self.region),
            PinTarget::Names(names) => write!(f, "{}:{}", names.join(","), self.region),
        }
    }
}
