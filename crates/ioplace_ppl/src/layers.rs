//! Placement layers resolved against the technology and the design's tracks.

use crate::error::PlacementError;
use crate::params::PlacerParams;
use ioplace_common::{Dbu, Edge, Rect};
use ioplace_def::{Design, TrackAxis};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ioplace_lef::{to_dbu, Layer, Technology};

const ORIENTATION_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Placement, 1);

/// A routing layer pins may be placed on, with everything in database units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PinLayer {
    pub name: String,
    /// Vertical layers serve the bottom and top edges.
    pub vertical: bool,
    pub width: Dbu,
    /// Length of the pin shape into the die, not counting the extension.
    pub depth: Dbu,
    /// Same-layer pin spacing along an edge, at least one track pitch by
    /// default and never below width plus the layer's `SPACING`.
    pub min_distance: Dbu,
    /// Track coordinates across the layer's direction, ascending.
    pub tracks: Vec<Dbu>,
}

impl PinLayer {
    /// Returns `true` if the layer can host pins on `edge`.
    pub fn serves(&self, edge: Edge) -> bool {
        edge.runs_along_x() == self.vertical
    }

    /// The pin rectangle relative to its location, in the `N` orientation:
    /// centered on the track, pointing into the die along +Y.
    pub fn local_rect(&self, extension: Dbu) -> Rect {
        let half = self.width / 2;
        Rect::from_coords(-half, -extension, self.width - half, self.depth)
    }
}

/// Resolves the horizontal and vertical layer lists into [`PinLayer`]s,
/// vertical layers first.
pub(crate) fn resolve_layers(
    tech: &Technology,
    design: &Design,
    die: &Rect,
    hor_layers: &[String],
    ver_layers: &[String],
    params: &PlacerParams,
    sink: &DiagnosticSink,
) -> Result<Vec<PinLayer>, PlacementError> {
    if hor_layers.is_empty() && ver_layers.is_empty() {
        return Err(PlacementError::NoLayers);
    }
    let requested = ver_layers
        .iter()
        .map(|n| (n, true))
        .chain(hor_layers.iter().map(|n| (n, false)));

    let mut layers: Vec<PinLayer> = Vec::new();
    for (name, vertical) in requested {
        if layers.iter().any(|l| l.name == *name && l.vertical == vertical) {
            continue;
        }
        let layer = tech
            .layer(name)
            .ok_or_else(|| PlacementError::UnknownLayer(name.clone()))?;
        if !layer.is_routing() {
            return Err(PlacementError::NotRoutingLayer(name.clone()));
        }
        if (vertical && layer.is_horizontal()) || (!vertical && layer.is_vertical()) {
            let (preferred, given) = if vertical {
                ("horizontal", "vertical")
            } else {
                ("vertical", "horizontal")
            };
            sink.emit(
                Diagnostic::warning(
                    ORIENTATION_MISMATCH,
                    format!(
                        "layer `{name}` prefers {preferred} routing but was given as a {given} placement layer"
                    ),
                )
                .with_help(format!("pins on `{name}` still go on the {given} layer edges")),
            );
        }
        layers.push(pin_layer(layer, vertical, design, die, params)?);
    }
    Ok(layers)
}

fn pin_layer(
    layer: &Layer,
    vertical: bool,
    design: &Design,
    die: &Rect,
    params: &PlacerParams,
) -> Result<PinLayer, PlacementError> {
    let dbu = design.dbu();
    let incomplete = |property| PlacementError::IncompleteLayer {
        layer: layer.name.clone(),
        property,
    };

    let width = layer
        .width
        .map(|w| to_dbu(w, dbu))
        .filter(|&w| w > 0)
        .ok_or_else(|| incomplete("WIDTH"))?;
    let min_area = layer.area.unwrap_or(0.0) * (dbu * dbu) as f64;
    let depth = width.max((min_area / width as f64).ceil() as Dbu);

    let axis = if vertical { TrackAxis::X } else { TrackAxis::Y };
    let mut tracks: Vec<Dbu> = Vec::new();
    let mut pitch: Option<Dbu> = None;
    for t in design.tracks_for(&layer.name, axis) {
        tracks.extend(t.positions());
        if t.step > 0 {
            pitch = Some(pitch.map_or(t.step, |p| p.min(t.step)));
        }
    }

    let lef_pitch = layer.track_pitch().map(|p| to_dbu(p, dbu)).filter(|&p| p > 0);
    if tracks.is_empty() {
        let step = lef_pitch.ok_or_else(|| incomplete("PITCH"))?;
        let offset = to_dbu(layer.track_offset().unwrap_or(0.0), dbu);
        let (lo, hi) = if vertical {
            (die.lo.x, die.hi.x)
        } else {
            (die.lo.y, die.hi.y)
        };
        let mut pos = lo + offset;
        while pos <= hi {
            tracks.push(pos);
            pos += step;
        }
        pitch = Some(step);
    }
    tracks.sort_unstable();
    tracks.dedup();
    let pitch = pitch.or(lef_pitch).ok_or_else(|| incomplete("PITCH"))?;
    let spacing = layer.spacing.map_or(0, |s| to_dbu(s, dbu));

    Ok(PinLayer {
        name: layer.name.clone(),
        vertical,
        width,
        depth,
        min_distance: params.min_distance_for(pitch).max(width + spacing),
        tracks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{design, tech};
    use ioplace_lef::LayerType;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn resolve(
        tech: &Technology,
        design: &Design,
        hor: &[&str],
        ver: &[&str],
    ) -> (Result<Vec<PinLayer>, PlacementError>, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let die = design.die_rect().unwrap();
        let result = resolve_layers(
            tech,
            design,
            &die,
            &names(hor),
            &names(ver),
            &PlacerParams::default(),
            &sink,
        );
        (result, sink)
    }

    #[test]
    fn uses_design_tracks() {
        let (layers, sink) = resolve(&tech(), &design(2, 2), &["metal3"], &["metal2"]);
        let layers = layers.unwrap();
        assert!(!sink.has_errors() && sink.warning_count() == 0);
        assert_eq!(layers.len(), 2);
        let m2 = &layers[0];
        assert!(m2.vertical);
        assert!(m2.serves(Edge::Bottom) && m2.serves(Edge::Top));
        assert_eq!(m2.width, 70);
        assert_eq!(m2.min_distance, 200);
        assert_eq!(m2.tracks.len(), 50);
        assert_eq!(m2.tracks[0], 100);
        assert!(!layers[1].vertical);
        assert!(layers[1].serves(Edge::Left));
    }

    #[test]
    fn depth_covers_min_area() {
        // metal2 carries AREA 0.01 um^2 at 1000 DBU/um: 10000 / 70 -> 143.
        let (layers, _) = resolve(&tech(), &design(1, 1), &[], &["metal2"]);
        let layers = layers.unwrap();
        let m2 = &layers[0];
        assert_eq!(m2.depth, 143);
        assert_eq!(m2.local_rect(0), Rect::from_coords(-35, 0, 35, 143));
        assert_eq!(m2.local_rect(20), Rect::from_coords(-35, -20, 35, 143));
    }

    #[test]
    fn falls_back_to_lef_pitch() {
        let mut d = design(1, 1);
        d.tracks.clear();
        let (layers, _) = resolve(&tech(), &d, &["metal3"], &[]);
        let layers = layers.unwrap();
        let m3 = &layers[0];
        // OFFSET 0.1, PITCH 0.2 on a 10um die.
        assert_eq!(m3.tracks.first(), Some(&100));
        assert_eq!(m3.tracks.last(), Some(&9900));
        assert_eq!(m3.min_distance, 200);
    }

    #[test]
    fn spacing_rule_floors_min_distance() {
        let mut t = tech();
        let metal2 = t.layer("metal2").unwrap().clone();
        t.add_layer(Layer {
            spacing: Some(0.07),
            ..metal2
        });
        let mut d = design(1, 1);
        d.tracks[0].step = 100;
        d.tracks[0].num = 100;
        let (layers, _) = resolve(&t, &d, &[], &["metal2"]);
        assert_eq!(layers.unwrap()[0].min_distance, 140);

        let params = PlacerParams {
            min_distance: Some(50),
            ..PlacerParams::default()
        };
        let sink = DiagnosticSink::new();
        let die = d.die_rect().unwrap();
        let layers =
            resolve_layers(&t, &d, &die, &[], &names(&["metal2"]), &params, &sink).unwrap();
        assert_eq!(layers[0].min_distance, 140);
    }

    #[test]
    fn wrong_orientation_warns() {
        let (layers, sink) = resolve(&tech(), &design(1, 1), &["metal2"], &[]);
        assert!(layers.is_ok());
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, ORIENTATION_MISMATCH);
        assert!(diags[0].message.contains("prefers vertical"));
    }

    #[test]
    fn errors() {
        let d = design(1, 1);
        assert!(matches!(
            resolve(&tech(), &d, &[], &[]).0,
            Err(PlacementError::NoLayers)
        ));
        assert!(matches!(
            resolve(&tech(), &d, &["metal9"], &[]).0,
            Err(PlacementError::UnknownLayer(n)) if n == "metal9"
        ));
        assert!(matches!(
            resolve(&tech(), &d, &["via1"], &[]).0,
            Err(PlacementError::NotRoutingLayer(_))
        ));

        let mut t = tech();
        t.add_layer(Layer {
            direction: Some(ioplace_lef::LayerDirection::Vertical),
            pitch: Some((0.2, 0.2)),
            ..Layer::new("metal4", LayerType::Routing)
        });
        assert!(matches!(
            resolve(&t, &d, &[], &["metal4"]).0,
            Err(PlacementError::IncompleteLayer { property: "WIDTH", .. })
        ));
    }
}
