//! Integer layout geometry shared by the LEF/DEF readers and the placer.
//!
//! All coordinates are database units ([`Dbu`]), the integer length unit a
//! DEF file declares in its `UNITS DISTANCE MICRONS` statement.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A length or coordinate in database units.
pub type Dbu = i64;

/// A point in database units.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: Dbu,
    /// Y coordinate.
    pub y: Dbu,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: Dbu, y: Dbu) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point.
    pub fn manhattan(self, other: Point) -> Dbu {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Returns this point translated by `(dx, dy)`.
    pub fn offset(self, dx: Dbu, dy: Dbu) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {} {} )", self.x, self.y)
    }
}

/// An axis-aligned rectangle, always stored with `lo <= hi` on both axes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left corner.
    pub lo: Point,
    /// Upper-right corner.
    pub hi: Point,
}

impl Rect {
    /// Creates a rectangle from two opposite corners in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            lo: Point::new(a.x.min(b.x), a.y.min(b.y)),
            hi: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a rectangle from raw corner coordinates.
    pub fn from_coords(x0: Dbu, y0: Dbu, x1: Dbu, y1: Dbu) -> Self {
        Self::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty slice.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut r = Rect::new(first, first);
        for p in &points[1..] {
            r.lo.x = r.lo.x.min(p.x);
            r.lo.y = r.lo.y.min(p.y);
            r.hi.x = r.hi.x.max(p.x);
            r.hi.y = r.hi.y.max(p.y);
        }
        Some(r)
    }

    /// Width along X.
    pub fn width(&self) -> Dbu {
        self.hi.x - self.lo.x
    }

    /// Height along Y.
    pub fn height(&self) -> Dbu {
        self.hi.y - self.lo.y
    }

    /// Center point, rounded toward negative infinity.
    pub fn center(&self) -> Point {
        Point::new(
            (self.lo.x + self.hi.x).div_euclid(2),
            (self.lo.y + self.hi.y).div_euclid(2),
        )
    }

    /// Returns `true` if `p` lies inside or on the border of this rectangle.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.lo.x && p.x <= self.hi.x && p.y >= self.lo.y && p.y <= self.hi.y
    }

    /// Returns `true` if `other` lies entirely inside or on the border of this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.lo) && self.contains(other.hi)
    }

    /// Returns `true` if the two rectangles share any area or border.
    pub fn touches(&self, other: &Rect) -> bool {
        self.lo.x <= other.hi.x
            && other.lo.x <= self.hi.x
            && self.lo.y <= other.hi.y
            && other.lo.y <= self.hi.y
    }

    /// Returns this rectangle translated by the vector `by`.
    pub fn translate(&self, by: Point) -> Rect {
        Rect {
            lo: self.lo.offset(by.x, by.y),
            hi: self.hi.offset(by.x, by.y),
        }
    }
}

/// A DEF placement orientation.
///
/// `N`, `W`, `S`, `E` are counter-clockwise rotations by 0, 90, 180 and 270
/// degrees. The flipped variants mirror about the Y axis first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Orient {
    /// No rotation.
    #[default]
    N,
    /// Rotated 90 degrees counter-clockwise.
    W,
    /// Rotated 180 degrees.
    S,
    /// Rotated 270 degrees counter-clockwise.
    E,
    /// Mirrored about the Y axis.
    FN,
    /// Mirrored, then rotated 90 degrees.
    FW,
    /// Mirrored, then rotated 180 degrees (mirror about the X axis).
    FS,
    /// Mirrored, then rotated 270 degrees.
    FE,
}

impl Orient {
    /// Applies the orientation to a point relative to the origin.
    pub fn apply(self, p: Point) -> Point {
        let Point { x, y } = p;
        match self {
            Orient::N => Point::new(x, y),
            Orient::W => Point::new(-y, x),
            Orient::S => Point::new(-x, -y),
            Orient::E => Point::new(y, -x),
            Orient::FN => Point::new(-x, y),
            Orient::FW => Point::new(-y, -x),
            Orient::FS => Point::new(x, -y),
            Orient::FE => Point::new(y, x),
        }
    }

    /// Applies the orientation to a rectangle relative to the origin.
    pub fn apply_rect(self, r: &Rect) -> Rect {
        Rect::new(self.apply(r.lo), self.apply(r.hi))
    }

    /// Returns `true` if the orientation swaps the X and Y extents.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orient::W | Orient::E | Orient::FW | Orient::FE)
    }

    /// The DEF keyword for this orientation.
    pub fn as_str(self) -> &'static str {
        match self {
            Orient::N => "N",
            Orient::W => "W",
            Orient::S => "S",
            Orient::E => "E",
            Orient::FN => "FN",
            Orient::FW => "FW",
            Orient::FS => "FS",
            Orient::FE => "FE",
        }
    }
}

impl fmt::Display for Orient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" | "R0" => Ok(Orient::N),
            "W" | "R90" => Ok(Orient::W),
            "S" | "R180" => Ok(Orient::S),
            "E" | "R270" => Ok(Orient::E),
            "FN" | "MY" => Ok(Orient::FN),
            "FW" | "MX90" => Ok(Orient::FW),
            "FS" | "MX" => Ok(Orient::FS),
            "FE" | "MY90" => Ok(Orient::FE),
            other => Err(format!("unknown orientation `{other}`")),
        }
    }
}

/// One of the four edges of a rectangular die boundary.
///
/// The declaration order is the counter-clockwise walk starting at the
/// lower-left corner, which is also the order slots are enumerated in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// The lower edge, walked left to right.
    Bottom,
    /// The right edge, walked bottom to top.
    Right,
    /// The upper edge, walked right to left.
    Top,
    /// The left edge, walked top to bottom.
    Left,
}

impl Edge {
    /// All edges in counter-clockwise order.
    pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Right, Edge::Top, Edge::Left];

    /// Returns `true` for edges that run along X (bottom and top).
    ///
    /// Pins on these edges are vertical wires and go on vertical layers.
    pub fn runs_along_x(self) -> bool {
        matches!(self, Edge::Bottom | Edge::Top)
    }

    /// The orientation a pin shape takes so that it points into the die.
    pub fn pin_orient(self) -> Orient {
        match self {
            Edge::Bottom => Orient::N,
            Edge::Top => Orient::S,
            Edge::Left => Orient::E,
            Edge::Right => Orient::W,
        }
    }

    /// The coordinate range this edge spans along its running axis.
    pub fn span(self, die: &Rect) -> (Dbu, Dbu) {
        if self.runs_along_x() {
            (die.lo.x, die.hi.x)
        } else {
            (die.lo.y, die.hi.y)
        }
    }

    /// The point on this edge at running coordinate `pos`.
    pub fn point_at(self, die: &Rect, pos: Dbu) -> Point {
        match self {
            Edge::Bottom => Point::new(pos, die.lo.y),
            Edge::Top => Point::new(pos, die.hi.y),
            Edge::Left => Point::new(die.lo.x, pos),
            Edge::Right => Point::new(die.hi.x, pos),
        }
    }

    /// Determines which edge `p` lies on, if any. Corners resolve to the
    /// first edge in counter-clockwise order.
    pub fn of_point(die: &Rect, p: Point) -> Option<Edge> {
        if !die.contains(p) {
            return None;
        }
        Edge::ALL.into_iter().find(|e| match e {
            Edge::Bottom => p.y == die.lo.y,
            Edge::Right => p.x == die.hi.x,
            Edge::Top => p.y == die.hi.y,
            Edge::Left => p.x == die.lo.x,
        })
    }

    /// The lowercase name used in region strings (`top`, `bottom`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Bottom => "bottom",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Left => "left",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bottom" => Ok(Edge::Bottom),
            "right" => Ok(Edge::Right),
            "top" => Ok(Edge::Top),
            "left" => Ok(Edge::Left),
            other => Err(format!("unknown edge `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_normalizes_corners() {
        let r = Rect::from_coords(10, 20, 0, 5);
        assert_eq!(r.lo, Point::new(0, 5));
        assert_eq!(r.hi, Point::new(10, 20));
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 15);
    }

    #[test]
    fn bounding_box_of_points() {
        let pts = [Point::new(3, 9), Point::new(-1, 4), Point::new(7, 0)];
        let r = Rect::bounding(&pts).unwrap();
        assert_eq!(r, Rect::from_coords(-1, 0, 7, 9));
        assert!(Rect::bounding(&[]).is_none());
    }

    #[test]
    fn center_rounds_down() {
        assert_eq!(Rect::from_coords(0, 0, 5, 5).center(), Point::new(2, 2));
        assert_eq!(Rect::from_coords(-5, -5, 0, 0).center(), Point::new(-3, -3));
    }

    #[test]
    fn pin_shapes_point_into_die() {
        // Local pin rectangle: 140 wide, 280 deep, anchored on the boundary.
        let local = Rect::from_coords(-70, 0, 70, 280);
        assert_eq!(
            Edge::Bottom.pin_orient().apply_rect(&local),
            Rect::from_coords(-70, 0, 70, 280)
        );
        assert_eq!(
            Edge::Top.pin_orient().apply_rect(&local),
            Rect::from_coords(-70, -280, 70, 0)
        );
        assert_eq!(
            Edge::Left.pin_orient().apply_rect(&local),
            Rect::from_coords(0, -70, 280, 70)
        );
        assert_eq!(
            Edge::Right.pin_orient().apply_rect(&local),
            Rect::from_coords(-280, -70, 0, 70)
        );
    }

    #[test]
    fn orient_parse_and_display() {
        for o in [
            Orient::N,
            Orient::W,
            Orient::S,
            Orient::E,
            Orient::FN,
            Orient::FW,
            Orient::FS,
            Orient::FE,
        ] {
            assert_eq!(o.as_str().parse::<Orient>().unwrap(), o);
        }
        assert_eq!("R90".parse::<Orient>().unwrap(), Orient::W);
        assert!("NE".parse::<Orient>().is_err());
    }

    #[test]
    fn swaps_axes_for_quarter_turns() {
        assert!(Orient::E.swaps_axes());
        assert!(Orient::FW.swaps_axes());
        assert!(!Orient::S.swaps_axes());
        assert!(!Orient::FN.swaps_axes());
    }

    #[test]
    fn edge_of_point() {
        let die = Rect::from_coords(0, 0, 1000, 500);
        assert_eq!(Edge::of_point(&die, Point::new(300, 0)), Some(Edge::Bottom));
        assert_eq!(Edge::of_point(&die, Point::new(1000, 20)), Some(Edge::Right));
        assert_eq!(Edge::of_point(&die, Point::new(40, 500)), Some(Edge::Top));
        assert_eq!(Edge::of_point(&die, Point::new(0, 250)), Some(Edge::Left));
        assert_eq!(Edge::of_point(&die, Point::new(0, 0)), Some(Edge::Bottom));
        assert_eq!(Edge::of_point(&die, Point::new(10, 10)), None);
        assert_eq!(Edge::of_point(&die, Point::new(-10, 0)), None);
    }

    #[test]
    fn edge_point_at_and_span() {
        let die = Rect::from_coords(100, 200, 900, 800);
        assert_eq!(Edge::Top.point_at(&die, 450), Point::new(450, 800));
        assert_eq!(Edge::Left.point_at(&die, 300), Point::new(100, 300));
        assert_eq!(Edge::Bottom.span(&die), (100, 900));
        assert_eq!(Edge::Right.span(&die), (200, 800));
    }

    #[test]
    fn edge_parse_case_insensitive() {
        assert_eq!("TOP".parse::<Edge>().unwrap(), Edge::Top);
        assert_eq!("left".parse::<Edge>().unwrap(), Edge::Left);
        assert!("north".parse::<Edge>().is_err());
    }

    #[test]
    fn edge_serde_lowercase() {
        let json = serde_json::to_string(&Edge::Bottom).unwrap();
        assert_eq!(json, "\"bottom\"");
    }
}
