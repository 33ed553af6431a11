//! Wirelength cost of putting a pin in a slot.
//!
//! A pin's net is summarized by its anchor: the bounding box of the centers
//! of the placed components on the net. The cost of a slot is the
//! half-perimeter of that box grown to include the slot.

use ioplace_common::{Dbu, Point, Rect};
use ioplace_def::{Component, Design};
use ioplace_lef::{to_dbu, Technology};

/// Center of a placed component's footprint, or its origin when the macro
/// size is unknown.
pub(crate) fn component_center(component: &Component, tech: &Technology, dbu: i64) -> Option<Point> {
    let placement = component.placement.as_ref()?;
    let Some((w, h)) = tech.macro_def(&component.macro_name).and_then(|m| m.size) else {
        return Some(placement.location);
    };
    let (w, h) = (to_dbu(w, dbu), to_dbu(h, dbu));
    let (w, h) = if placement.orient.swaps_axes() { (h, w) } else { (w, h) };
    Some(placement.location.offset(w / 2, h / 2))
}

/// The anchor box of the net `pin` connects to, if it reaches any placed
/// component.
pub(crate) fn pin_anchor(design: &Design, tech: &Technology, pin: &str) -> Option<Rect> {
    let net = design.pin(pin)?.net.as_deref().and_then(|n| design.net(n))?;
    let dbu = design.dbu();
    let centers: Vec<Point> = net
        .connections
        .iter()
        .filter(|c| !c.is_io_pin())
        .filter_map(|c| design.component(&c.component))
        .filter_map(|c| component_center(c, tech, dbu))
        .collect();
    Rect::bounding(&centers)
}

/// Half-perimeter wirelength of `anchor` extended to `p`. Zero without an anchor.
pub(crate) fn hpwl(anchor: Option<&Rect>, p: Point) -> Dbu {
    let Some(r) = anchor else {
        return 0;
    };
    let (x0, x1) = (r.lo.x.min(p.x), r.hi.x.max(p.x));
    let (y0, y1) = (r.lo.y.min(p.y), r.hi.y.max(p.y));
    (x1 - x0) + (y1 - y0)
}
