//! DEF writer.
//!
//! Output is deterministic: sections and their entries are written in the
//! order they are stored in the [`Design`], so reading a file and writing it
//! back preserves the order of everything that was kept.

use crate::error::DefError;
use crate::types::{Component, Design, Net, Pin, Placement};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `design` as DEF text.
pub fn write_def(design: &Design, out: &mut impl Write) -> io::Result<()> {
    if let Some(version) = &design.version {
        writeln!(out, "VERSION {version} ;")?;
    }
    if let Some(divider) = &design.divider_char {
        writeln!(out, "DIVIDERCHAR \"{divider}\" ;")?;
    }
    if let Some(busbit) = &design.bus_bit_chars {
        writeln!(out, "BUSBITCHARS \"{busbit}\" ;")?;
    }
    writeln!(out, "DESIGN {} ;", design.name)?;
    if let Some(dbu) = design.dbu_per_micron {
        writeln!(out, "UNITS DISTANCE MICRONS {dbu} ;")?;
    }
    if !design.die_area.is_empty() {
        write!(out, "DIEAREA")?;
        for p in &design.die_area {
            write!(out, " {p}")?;
        }
        writeln!(out, " ;")?;
    }

    if !design.rows.is_empty() {
        writeln!(out)?;
    }
    for row in &design.rows {
        write!(
            out,
            "ROW {} {} {} {} {}",
            row.name, row.site, row.origin.x, row.origin.y, row.orient
        )?;
        if let Some((nx, ny, sx, sy)) = row.repeat {
            write!(out, " DO {nx} BY {ny} STEP {sx} {sy}")?;
        }
        writeln!(out, " ;")?;
    }

    if !design.tracks.is_empty() {
        writeln!(out)?;
    }
    for t in &design.tracks {
        write!(out, "TRACKS {} {} DO {} STEP {}", t.axis, t.start, t.num, t.step)?;
        if !t.layers.is_empty() {
            write!(out, " LAYER {}", t.layers.join(" "))?;
        }
        writeln!(out, " ;")?;
    }

    if !design.gcell_grids.is_empty() {
        writeln!(out)?;
    }
    for g in &design.gcell_grids {
        writeln!(
            out,
            "GCELLGRID {} {} DO {} STEP {} ;",
            g.axis, g.start, g.num, g.step
        )?;
    }

    if !design.components.is_empty() {
        writeln!(out)?;
        writeln!(out, "COMPONENTS {} ;", design.components.len())?;
        for c in &design.components {
            write_component(c, out)?;
        }
        writeln!(out, "END COMPONENTS")?;
    }

    if !design.pins.is_empty() {
        writeln!(out)?;
        writeln!(out, "PINS {} ;", design.pins.len())?;
        for p in &design.pins {
            write_pin(p, out)?;
        }
        writeln!(out, "END PINS")?;
    }

    if !design.nets.is_empty() {
        writeln!(out)?;
        writeln!(out, "NETS {} ;", design.nets.len())?;
        for n in &design.nets {
            write_net(n, out)?;
        }
        writeln!(out, "END NETS")?;
    }

    writeln!(out)?;
    writeln!(out, "END DESIGN")
}

fn placement_text(p: &Placement) -> String {
    format!("{} {} {}", p.status, p.location, p.orient)
}

fn write_component(c: &Component, out: &mut impl Write) -> io::Result<()> {
    write!(out, "    - {} {}", c.name, c.macro_name)?;
    if let Some(p) = &c.placement {
        write!(out, " + {}", placement_text(p))?;
    }
    writeln!(out, " ;")
}

fn write_pin(pin: &Pin, out: &mut impl Write) -> io::Result<()> {
    write!(out, "    - {}", pin.name)?;
    if let Some(net) = &pin.net {
        write!(out, " + NET {net}")?;
    }
    if pin.special {
        write!(out, " + SPECIAL")?;
    }
    if let Some(dir) = pin.direction {
        write!(out, " + DIRECTION {dir}")?;
    }
    if let Some(usage) = pin.usage {
        write!(out, " + USE {usage}")?;
    }
    match (&pin.shape, &pin.placement) {
        (Some(shape), placement) => {
            writeln!(out)?;
            writeln!(out, "      + PORT")?;
            write!(
                out,
                "        + LAYER {} {} {}",
                shape.layer, shape.rect.lo, shape.rect.hi
            )?;
            if let Some(p) = placement {
                writeln!(out)?;
                write!(out, "        + {}", placement_text(p))?;
            }
        }
        (None, Some(p)) => write!(out, " + {}", placement_text(p))?,
        (None, None) => {}
    }
    writeln!(out, " ;")
}

fn write_net(net: &Net, out: &mut impl Write) -> io::Result<()> {
    write!(out, "    - {}", net.name)?;
    for c in &net.connections {
        write!(out, " ( {} {} )", c.component, c.pin)?;
    }
    if let Some(usage) = net.usage {
        write!(out, " + USE {usage}")?;
    }
    writeln!(out, " ;")
}

impl Design {
    /// Writes the design to `path`, creating parent directories as needed.
    pub fn write_to_file(&self, path: &Path) -> Result<(), DefError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DefError::io(parent, e))?;
        }
        let file = fs::File::create(path).map_err(|e| DefError::io(path, e))?;
        let mut out = BufWriter::new(file);
        write_def(self, &mut out)
            .and_then(|()| out.flush())
            .map_err(|e| DefError::io(path, e))
    }

    /// Renders the design as a DEF string.
    pub fn to_def_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = write_def(self, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
