//! Boundary regions: an edge of the die plus an interval along it.

use crate::error::PlacementError;
use ioplace_common::{Dbu, Edge, Rect};
use ioplace_lef::to_dbu;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stretch of the die boundary, written `edge:*` or `edge:begin-end`.
///
/// `begin` and `end` are absolute coordinates in microns along the edge's
/// running axis (X for `top`/`bottom`, Y for `left`/`right`).
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Region {
    /// The edge the region lies on.
    pub edge: Edge,
    /// The `(begin, end)` interval in microns, or `None` for the whole edge.
    pub interval: Option<(f64, f64)>,
}

impl Region {
    /// A region covering a whole edge.
    pub fn whole(edge: Edge) -> Self {
        Self {
            edge,
            interval: None,
        }
    }

    /// Resolves the region to a `[begin, end]` range of database units on
    /// `die`, rejecting intervals that leave the edge.
    pub fn span(&self, die: &Rect, dbu_per_micron: i64) -> Result<(Dbu, Dbu), PlacementError> {
        let (lo, hi) = self.edge.span(die);
        let Some((begin, end)) = self.interval else {
            return Ok((lo, hi));
        };
        let (begin, end) = (to_dbu(begin, dbu_per_micron), to_dbu(end, dbu_per_micron));
        if begin < lo || end > hi {
            return Err(PlacementError::InvalidRegion {
                region: self.to_string(),
                reason: format!("interval lies outside the {} edge [{lo}, {hi}]", self.edge),
            });
        }
        Ok((begin, end))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interval {
            None => write!(f, "{}:*", self.edge),
            Some((b, e)) => write!(f, "{}:{b}-{e}", self.edge),
        }
    }
}

impl FromStr for Region {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| PlacementError::InvalidRegion {
            region: s.to_string(),
            reason,
        };
        let (edge, range) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected `edge:*` or `edge:begin-end`".to_string()))?;
        let edge: Edge = edge.trim().parse().map_err(invalid)?;
        let range = range.trim();
        if range == "*" {
            return Ok(Region::whole(edge));
        }
        let (begin, end) = range
            .split_once('-')
            .ok_or_else(|| invalid(format!("expected `*` or `begin-end`, found `{range}`")))?;
        let parse = |text: &str| {
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(format!("`{}` is not a coordinate", text.trim())))
        };
        let (begin, end) = (parse(begin)?, parse(end)?);
        if begin > end {
            return Err(invalid(format!("begin {begin} is past end {end}")));
        }
        Ok(Region {
            edge,
            interval: Some((begin, end)),
        })
    }
}
