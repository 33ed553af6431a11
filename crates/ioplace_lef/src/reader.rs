//! LEF statement reader.
//!
//! The reader walks the token stream one top-level statement at a time.
//! Blocks it has no use for (`VIA`, `VIARULE`, `SITE`, `NONDEFAULTRULE`,
//! `PROPERTYDEFINITIONS`, macro `PIN`/`OBS`) are skipped as a whole.
//! Unrecognized top-level statements are reported as warnings and skipped.

use crate::error::LefError;
use crate::types::{Layer, LayerDirection, LayerType, MacroDef, Technology};
use ioplace_common::{TokenError, TokenStream};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use std::path::Path;

const UNKNOWN_STATEMENT: DiagnosticCode = DiagnosticCode::new(Category::Lef, 1);
const DUPLICATE_LAYER: DiagnosticCode = DiagnosticCode::new(Category::Lef, 2);
const MISSING_DIRECTION: DiagnosticCode = DiagnosticCode::new(Category::Lef, 3);
const MISSING_PITCH: DiagnosticCode = DiagnosticCode::new(Category::Lef, 4);

/// Reads and parses a LEF file from disk.
pub fn read_lef(path: &Path, sink: &DiagnosticSink) -> Result<Technology, LefError> {
    let source = std::fs::read_to_string(path).map_err(|source| LefError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_lef(&source, path, sink)
}

/// Parses LEF text. `path` is only used for error and diagnostic locations.
pub fn parse_lef(source: &str, path: &Path, sink: &DiagnosticSink) -> Result<Technology, LefError> {
    let mut reader = LefReader {
        ts: TokenStream::new(source),
        path,
        sink,
        tech: Technology::new(),
    };
    reader.read_all().map_err(|e| LefError::syntax(path, e))?;
    reader.check_layers();
    Ok(reader.tech)
}

struct LefReader<'a> {
    ts: TokenStream,
    path: &'a Path,
    sink: &'a DiagnosticSink,
    tech: Technology,
}

impl<'a> LefReader<'a> {
    fn location(&self, line: u32, col: u32) -> Location {
        Location::new(self.path, line, col)
    }

    fn read_all(&mut self) -> Result<(), TokenError> {
        while !self.ts.is_eof() {
            let tok = self.ts.next_token()?;
            match tok.text.as_str() {
                "VERSION" => {
                    self.tech.version = Some(self.ts.next_word()?);
                    self.ts.expect(";")?;
                }
                "MANUFACTURINGGRID" => {
                    self.tech.manufacturing_grid = Some(self.ts.next_real()?);
                    self.ts.expect(";")?;
                }
                "UNITS" => self.read_units()?,
                "LAYER" => self.read_layer(tok.line, tok.col)?,
                "MACRO" => self.read_macro()?,
                "VIA" | "VIARULE" | "SITE" | "NONDEFAULTRULE" => {
                    let name = self.ts.next_word()?;
                    self.ts.skip_block(&name)?;
                }
                "PROPERTYDEFINITIONS" | "SPACING" => self.ts.skip_block(&tok.text)?,
                "BUSBITCHARS" | "DIVIDERCHAR" | "NAMESCASESENSITIVE" | "NOWIREEXTENSIONATPIN"
                | "USEMINSPACING" | "CLEARANCEMEASURE" | "MAXVIASTACK" | "FIXEDMASK" => {
                    self.ts.skip_statement()?;
                }
                "END" => {
                    if self.ts.eat("LIBRARY") {
                        break;
                    }
                    return Err(self.ts.error("unexpected `END`"));
                }
                other => {
                    self.sink.emit(
                        Diagnostic::warning(
                            UNKNOWN_STATEMENT,
                            format!("unrecognized LEF statement `{other}` skipped"),
                        )
                        .at(self.location(tok.line, tok.col)),
                    );
                    self.ts.skip_statement()?;
                }
            }
        }
        Ok(())
    }

    fn read_units(&mut self) -> Result<(), TokenError> {
        loop {
            if self.ts.eat("END") {
                return self.ts.expect("UNITS");
            }
            if self.ts.eat("DATABASE") {
                self.ts.expect("MICRONS")?;
                self.tech.dbu_per_micron = Some(self.ts.next_int()?);
                self.ts.expect(";")?;
            } else {
                self.ts.skip_statement()?;
            }
        }
    }

    fn read_layer(&mut self, line: u32, col: u32) -> Result<(), TokenError> {
        let name = self.ts.next_word()?;
        let mut layer = Layer::new(name.clone(), LayerType::Other);

        loop {
            let tok = self.ts.next_token()?;
            match tok.text.as_str() {
                "END" => {
                    let end_name = self.ts.next_word()?;
                    if end_name != name {
                        return Err(TokenError {
                            line: tok.line,
                            col: tok.col,
                            message: format!(
                                "layer `{name}` closed by `END {end_name}`"
                            ),
                        });
                    }
                    break;
                }
                "TYPE" => {
                    layer.layer_type = LayerType::from_keyword(&self.ts.next_word()?);
                    self.ts.skip_statement()?;
                }
                "DIRECTION" => {
                    layer.direction = match self.ts.next_word()?.as_str() {
                        "HORIZONTAL" => Some(LayerDirection::Horizontal),
                        "VERTICAL" => Some(LayerDirection::Vertical),
                        _ => None,
                    };
                    self.ts.skip_statement()?;
                }
                "PITCH" => layer.pitch = Some(self.read_xy()?),
                "OFFSET" => layer.offset = Some(self.read_xy()?),
                "WIDTH" => {
                    layer.width = Some(self.ts.next_real()?);
                    self.ts.skip_statement()?;
                }
                "SPACING" => {
                    let value = self.ts.next_real()?;
                    layer.spacing.get_or_insert(value);
                    self.ts.skip_statement()?;
                }
                "AREA" => {
                    layer.area = Some(self.ts.next_real()?);
                    self.ts.skip_statement()?;
                }
                _ => self.ts.skip_statement()?,
            }
        }

        if !self.tech.add_layer(layer) {
            self.sink.emit(
                Diagnostic::warning(
                    DUPLICATE_LAYER,
                    format!("layer `{name}` is defined more than once"),
                )
                .at(self.location(line, col))
                .with_note("the later definition replaces the earlier one"),
            );
        }
        Ok(())
    }

    /// Reads `a [b] ;`, filling `b` with `a` when it is absent.
    fn read_xy(&mut self) -> Result<(f64, f64), TokenError> {
        let a = self.ts.next_real()?;
        let b = if self.ts.peek_is_number() {
            self.ts.next_real()?
        } else {
            a
        };
        self.ts.expect(";")?;
        Ok((a, b))
    }

    fn read_macro(&mut self) -> Result<(), TokenError> {
        let name = self.ts.next_word()?;
        let mut mac = MacroDef {
            name: name.clone(),
            class: None,
            size: None,
        };

        loop {
            let tok = self.ts.next_token()?;
            match tok.text.as_str() {
                "END" => {
                    if self.ts.eat(&name) {
                        break;
                    }
                    return Err(self.ts.error(format!("expected `END {name}`")));
                }
                "CLASS" => {
                    mac.class = Some(self.ts.next_word()?);
                    self.ts.skip_statement()?;
                }
                "SIZE" => {
                    let w = self.ts.next_real()?;
                    self.ts.expect("BY")?;
                    let h = self.ts.next_real()?;
                    self.ts.expect(";")?;
                    mac.size = Some((w, h));
                }
                "PIN" => {
                    let pin = self.ts.next_word()?;
                    self.ts.skip_block(&pin)?;
                }
                "OBS" => while !self.ts.next_token()?.is("END") {},
                _ => self.ts.skip_statement()?,
            }
        }

        self.tech.add_macro(mac);
        Ok(())
    }

    fn check_layers(&self) {
        for layer in self.tech.routing_layers() {
            if layer.direction.is_none() {
                self.sink.emit(
                    Diagnostic::warning(
                        MISSING_DIRECTION,
                        format!("routing layer `{}` has no DIRECTION", layer.name),
                    )
                    .with_note("it cannot host pins until a direction is known"),
                );
            }
            if layer.pitch.is_none() {
                self.sink.emit(
                    Diagnostic::warning(
                        MISSING_PITCH,
                        format!("routing layer `{}` has no PITCH", layer.name),
                    )
                    .with_help("declare TRACKS for it in the design instead"),
                );
            }
        }
    }
}
