//! Small technology and design shared by the unit tests.

use ioplace_common::{Orient, Point};
use ioplace_def::{
    Component, Design, Net, NetConnection, Pin, PinDirection, Placement, PlacementStatus,
    SignalUse, TrackAxis, Tracks,
};
use ioplace_lef::{Layer, LayerDirection, LayerType, MacroDef, Technology};

fn routing(name: &str, direction: LayerDirection) -> Layer {
    Layer {
        direction: Some(direction),
        pitch: Some((0.2, 0.2)),
        offset: Some((0.1, 0.1)),
        width: Some(0.07),
        ..Layer::new(name, LayerType::Routing)
    }
}

/// Two routing layers at 0.2um pitch, 0.07um wide.
pub(crate) fn tech() -> Technology {
    let mut tech = Technology::new();
    tech.dbu_per_micron = Some(1000);
    tech.add_layer(routing("metal1", LayerDirection::Horizontal));
    tech.add_layer(Layer::new("via1", LayerType::Cut));
    tech.add_layer(Layer {
        area: Some(0.01),
        ..routing("metal2", LayerDirection::Vertical)
    });
    tech.add_layer(routing("metal3", LayerDirection::Horizontal));
    tech.add_macro(MacroDef {
        name: "INV_X1".to_string(),
        class: Some("CORE".to_string()),
        size: Some((0.4, 1.0)),
    });
    tech
}

fn connection(component: &str, pin: &str) -> NetConnection {
    NetConnection {
        component: component.to_string(),
        pin: pin.to_string(),
    }
}

fn cell(name: &str, x: i64, y: i64) -> Component {
    Component {
        name: name.to_string(),
        macro_name: "INV_X1".to_string(),
        placement: Some(Placement {
            status: PlacementStatus::Placed,
            location: Point::new(x, y),
            orient: Orient::N,
        }),
    }
}

/// A 10um x 10um die with 50 tracks per layer, `inputs` input pins wired to
/// `u1` near the lower left and `outputs` output pins wired to `u2` near the
/// upper right, plus an unplaced power pin.
pub(crate) fn design(inputs: usize, outputs: usize) -> Design {
    let mut d = Design::new("tiny");
    d.dbu_per_micron = Some(1000);
    d.die_area = vec![Point::new(0, 0), Point::new(10000, 10000)];
    d.tracks.push(Tracks {
        axis: TrackAxis::X,
        start: 100,
        num: 50,
        step: 200,
        layers: vec!["metal2".to_string()],
    });
    d.tracks.push(Tracks {
        axis: TrackAxis::Y,
        start: 100,
        num: 50,
        step: 200,
        layers: vec!["metal3".to_string()],
    });
    d.add_component(cell("u1", 2000, 2000));
    d.add_component(cell("u2", 8000, 7000));

    let mut add = |name: String, dir: PinDirection, cell: &str, cell_pin: &str| {
        d.add_pin(Pin {
            net: Some(name.clone()),
            direction: Some(dir),
            usage: Some(SignalUse::Signal),
            ..Pin::new(name.clone())
        });
        d.add_net(Net {
            name: name.clone(),
            connections: vec![connection("PIN", &name), connection(cell, cell_pin)],
            usage: None,
        });
    };
    for i in 0..inputs {
        add(format!("in{i}"), PinDirection::Input, "u1", "A");
    }
    for i in 0..outputs {
        add(format!("out{i}"), PinDirection::Output, "u2", "ZN");
    }

    d.add_pin(Pin {
        net: Some("VDD".to_string()),
        special: true,
        direction: Some(PinDirection::Inout),
        usage: Some(SignalUse::Power),
        ..Pin::new("VDD")
    });
    d
}
