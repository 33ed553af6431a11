//! DEF statement reader.
//!
//! Header statements and the `COMPONENTS`, `PINS` and `NETS` sections are
//! read into a [`Design`]. Other sections are skipped with a warning. Net
//! routing is not kept; a warning is emitted once if any is dropped.

use crate::error::DefError;
use crate::types::{
    Component, Design, GcellGrid, Net, NetConnection, Pin, PinShape, Placement, PlacementStatus,
    Row, SignalUse, TrackAxis, Tracks,
};
use ioplace_common::{Orient, Point, Rect, TokenError, TokenStream};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use std::path::Path;

const SKIPPED_SECTION: DiagnosticCode = DiagnosticCode::new(Category::Def, 1);
const COUNT_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Def, 2);
const ROUTING_DROPPED: DiagnosticCode = DiagnosticCode::new(Category::Def, 3);
const EXTRA_PORT: DiagnosticCode = DiagnosticCode::new(Category::Def, 4);
const UNKNOWN_STATEMENT: DiagnosticCode = DiagnosticCode::new(Category::Def, 5);

/// Reads and parses a DEF file from disk.
pub fn read_def(path: &Path, sink: &DiagnosticSink) -> Result<Design, DefError> {
    let source = std::fs::read_to_string(path).map_err(|e| DefError::io(path, e))?;
    parse_def(&source, path, sink)
}

/// Parses DEF text. `path` is only used for error and diagnostic locations.
pub fn parse_def(source: &str, path: &Path, sink: &DiagnosticSink) -> Result<Design, DefError> {
    let mut reader = DefReader {
        ts: TokenStream::new(source),
        path,
        sink,
        design: Design::new(""),
        saw_design: false,
        routing_dropped: false,
    };
    reader.design.version = None;
    reader.design.divider_char = None;
    reader.design.bus_bit_chars = None;
    reader.read_all().map_err(|e| DefError::syntax(path, e))?;
    if !reader.saw_design {
        return Err(DefError::MissingDesignName(path.to_path_buf()));
    }
    Ok(reader.design)
}

struct DefReader<'a> {
    ts: TokenStream,
    path: &'a Path,
    sink: &'a DiagnosticSink,
    design: Design,
    saw_design: bool,
    routing_dropped: bool,
}

impl<'a> DefReader<'a> {
    fn location(&self, line: u32, col: u32) -> Location {
        Location::new(self.path, line, col)
    }

    fn read_all(&mut self) -> Result<(), TokenError> {
        while !self.ts.is_eof() {
            let tok = self.ts.next_token()?;
            match tok.text.as_str() {
                "VERSION" => self.design.version = Some(self.read_value()?),
                "DIVIDERCHAR" => self.design.divider_char = Some(self.read_value()?),
                "BUSBITCHARS" => self.design.bus_bit_chars = Some(self.read_value()?),
                "DESIGN" => {
                    self.design.name = self.read_value()?;
                    self.saw_design = true;
                }
                "UNITS" => {
                    self.ts.expect("DISTANCE")?;
                    self.ts.expect("MICRONS")?;
                    self.design.dbu_per_micron = Some(self.ts.next_int()?);
                    self.ts.expect(";")?;
                }
                "DIEAREA" => {
                    let mut points = Vec::new();
                    while !self.ts.eat(";") {
                        points.push(self.read_point()?);
                    }
                    self.design.die_area = points;
                }
                "ROW" => self.read_row()?,
                "TRACKS" => self.read_tracks()?,
                "GCELLGRID" => self.read_gcell_grid()?,
                "COMPONENTS" => self.read_section("COMPONENTS", Self::read_component)?,
                "PINS" => self.read_section("PINS", Self::read_pin)?,
                "NETS" => self.read_section("NETS", Self::read_net)?,
                "PROPERTYDEFINITIONS" => self.ts.skip_block("PROPERTYDEFINITIONS")?,
                "VIAS" | "SPECIALNETS" | "BLOCKAGES" | "REGIONS" | "GROUPS" | "FILLS"
                | "STYLES" | "SCANCHAINS" | "NONDEFAULTRULES" | "PINPROPERTIES" => {
                    self.sink.emit(
                        Diagnostic::warning(
                            SKIPPED_SECTION,
                            format!("{} section is not supported and was skipped", tok.text),
                        )
                        .at(self.location(tok.line, tok.col))
                        .with_note("it will not appear in the written design"),
                    );
                    self.ts.skip_block(&tok.text)?;
                }
                "HISTORY" | "TECHNOLOGY" => self.ts.skip_statement()?,
                "END" => {
                    self.ts.expect("DESIGN")?;
                    break;
                }
                other => {
                    self.sink.emit(
                        Diagnostic::warning(
                            UNKNOWN_STATEMENT,
                            format!("unrecognized DEF statement `{other}` skipped"),
                        )
                        .at(self.location(tok.line, tok.col)),
                    );
                    self.ts.skip_statement()?;
                }
            }
        }
        Ok(())
    }

    /// Reads `value ;`.
    fn read_value(&mut self) -> Result<String, TokenError> {
        let value = self.ts.next_word()?;
        self.ts.expect(";")?;
        Ok(value)
    }

    /// Reads `( x y )`.
    fn read_point(&mut self) -> Result<Point, TokenError> {
        self.ts.expect("(")?;
        let x = self.ts.next_int()?;
        let y = self.ts.next_int()?;
        self.ts.expect(")")?;
        Ok(Point::new(x, y))
    }

    fn read_orient(&mut self) -> Result<Orient, TokenError> {
        let err = self.ts.error("expected an orientation");
        let word = self.ts.next_word()?;
        word.parse().map_err(|msg: String| TokenError {
            message: msg,
            ..err
        })
    }

    fn read_axis(&mut self) -> Result<TrackAxis, TokenError> {
        match self.ts.next_word()?.as_str() {
            "X" => Ok(TrackAxis::X),
            "Y" => Ok(TrackAxis::Y),
            other => Err(self.ts.error(format!("expected `X` or `Y`, found `{other}`"))),
        }
    }

    fn read_row(&mut self) -> Result<(), TokenError> {
        let name = self.ts.next_word()?;
        let site = self.ts.next_word()?;
        let x = self.ts.next_int()?;
        let y = self.ts.next_int()?;
        let orient = self.read_orient()?;
        let mut repeat = None;
        if self.ts.eat("DO") {
            let num_x = self.ts.next_int()?;
            self.ts.expect("BY")?;
            let num_y = self.ts.next_int()?;
            let (mut step_x, mut step_y) = (0, 0);
            if self.ts.eat("STEP") {
                step_x = self.ts.next_int()?;
                step_y = self.ts.next_int()?;
            }
            repeat = Some((num_x, num_y, step_x, step_y));
        }
        self.ts.skip_statement()?;
        self.design.rows.push(Row {
            name,
            site,
            origin: Point::new(x, y),
            orient,
            repeat,
        });
        Ok(())
    }

    fn read_tracks(&mut self) -> Result<(), TokenError> {
        let axis = self.read_axis()?;
        let start = self.ts.next_int()?;
        self.ts.expect("DO")?;
        let num = self.ts.next_int()?;
        self.ts.expect("STEP")?;
        let step = self.ts.next_int()?;
        let mut layers = Vec::new();
        loop {
            let tok = self.ts.next_token()?;
            if tok.is(";") {
                break;
            }
            if tok.is("LAYER") {
                while !self.ts.peek_is(";") && !self.ts.peek_is("MASK") {
                    layers.push(self.ts.next_word()?);
                }
            }
        }
        self.design.tracks.push(Tracks {
            axis,
            start,
            num,
            step,
            layers,
        });
        Ok(())
    }

    fn read_gcell_grid(&mut self) -> Result<(), TokenError> {
        let axis = self.read_axis()?;
        let start = self.ts.next_int()?;
        self.ts.expect("DO")?;
        let num = self.ts.next_int()?;
        self.ts.expect("STEP")?;
        let step = self.ts.next_int()?;
        self.ts.expect(";")?;
        self.design.gcell_grids.push(GcellGrid {
            axis,
            start,
            num,
            step,
        });
        Ok(())
    }

    /// Reads `NAME n ; - item ... ; ... END NAME`, calling `item` once per `-`.
    fn read_section(
        &mut self,
        name: &str,
        item: fn(&mut Self) -> Result<(), TokenError>,
    ) -> Result<(), TokenError> {
        let (line, col) = self.ts.position();
        let declared = self.ts.next_int()?;
        self.ts.expect(";")?;
        let mut count = 0i64;
        loop {
            if self.ts.eat("END") {
                self.ts.expect(name)?;
                break;
            }
            self.ts.expect("-")?;
            item(self)?;
            count += 1;
        }
        if count != declared {
            self.sink.emit(
                Diagnostic::warning(
                    COUNT_MISMATCH,
                    format!("{name} declares {declared} entries but contains {count}"),
                )
                .at(self.location(line, col)),
            );
        }
        Ok(())
    }

    /// Skips the arguments of an unrecognized `+` option.
    fn skip_option(&mut self) -> Result<(), TokenError> {
        while !self.ts.peek_is("+") && !self.ts.peek_is(";") {
            self.ts.next_token()?;
        }
        Ok(())
    }

    /// Reads `STATUS ( x y ) orient` after the status keyword.
    fn read_placement(&mut self, status: PlacementStatus) -> Result<Placement, TokenError> {
        let location = self.read_point()?;
        let orient = self.read_orient()?;
        Ok(Placement {
            status,
            location,
            orient,
        })
    }

    fn read_component(&mut self) -> Result<(), TokenError> {
        let name = self.ts.next_word()?;
        let macro_name = self.ts.next_word()?;
        let mut placement = None;
        while !self.ts.eat(";") {
            self.ts.expect("+")?;
            let option = self.ts.next_word()?;
            match PlacementStatus::from_keyword(&option) {
                Some(status) => placement = Some(self.read_placement(status)?),
                None => self.skip_option()?,
            }
        }
        self.design.add_component(Component {
            name,
            macro_name,
            placement,
        });
        Ok(())
    }

    fn read_pin(&mut self) -> Result<(), TokenError> {
        let name_tok = self.ts.next_token()?;
        let mut pin = Pin::new(name_tok.text.clone());
        let mut ports = 0;
        while !self.ts.eat(";") {
            self.ts.expect("+")?;
            let option = self.ts.next_token()?;
            match option.text.as_str() {
                "NET" => pin.net = Some(self.ts.next_word()?),
                "SPECIAL" => pin.special = true,
                "DIRECTION" => {
                    let err = self.ts.error("bad pin direction");
                    let word = self.ts.next_word()?;
                    pin.direction = Some(word.parse().map_err(|msg: String| TokenError {
                        message: msg,
                        ..err
                    })?);
                }
                "USE" => {
                    let err = self.ts.error("bad pin use");
                    let word = self.ts.next_word()?;
                    pin.usage = Some(word.parse().map_err(|msg: String| TokenError {
                        message: msg,
                        ..err
                    })?);
                }
                "PORT" => ports += 1,
                "LAYER" => {
                    let layer = self.ts.next_word()?;
                    while !self.ts.peek_is("(") {
                        // MASK n, SPACING n, DESIGNRULEWIDTH n
                        self.ts.next_token()?;
                    }
                    let a = self.read_point()?;
                    let b = self.read_point()?;
                    if pin.shape.is_none() && ports <= 1 {
                        pin.shape = Some(PinShape {
                            layer,
                            rect: Rect::new(a, b),
                        });
                    }
                }
                kw => match PlacementStatus::from_keyword(kw) {
                    Some(status) => {
                        let placement = self.read_placement(status)?;
                        if ports <= 1 {
                            pin.placement = Some(placement);
                        }
                    }
                    None => self.skip_option()?,
                },
            }
        }
        if ports > 1 {
            self.sink.emit(
                Diagnostic::warning(
                    EXTRA_PORT,
                    format!("pin `{}` has {ports} ports; only the first is kept", pin.name),
                )
                .at(self.location(name_tok.line, name_tok.col)),
            );
        }
        self.design.add_pin(pin);
        Ok(())
    }

    fn read_net(&mut self) -> Result<(), TokenError> {
        let name_tok = self.ts.next_token()?;
        let mut net = Net {
            name: name_tok.text.clone(),
            connections: Vec::new(),
            usage: None,
        };
        loop {
            if self.ts.eat(";") {
                break;
            }
            if self.ts.eat("(") {
                let component = self.ts.next_word()?;
                let pin = self.ts.next_word()?;
                while !self.ts.eat(")") {
                    self.ts.next_token()?;
                }
                net.connections.push(NetConnection { component, pin });
                continue;
            }
            self.ts.expect("+")?;
            let option = self.ts.next_word()?;
            match option.as_str() {
                "USE" => {
                    let err = self.ts.error("bad net use");
                    let word = self.ts.next_word()?;
                    net.usage = Some(word.parse::<SignalUse>().map_err(|msg| TokenError {
                        message: msg,
                        ..err
                    })?);
                }
                "ROUTED" | "FIXED" | "COVER" | "NOSHIELD" => {
                    if !self.routing_dropped {
                        self.routing_dropped = true;
                        self.sink.emit(
                            Diagnostic::warning(
                                ROUTING_DROPPED,
                                format!("routing of net `{}` is not kept", net.name),
                            )
                            .at(self.location(name_tok.line, name_tok.col))
                            .with_note("later nets with routing are not reported again"),
                        );
                    }
                    self.skip_option()?;
                }
                _ => self.skip_option()?,
            }
        }
        self.design.add_net(net);
        Ok(())
    }
}
