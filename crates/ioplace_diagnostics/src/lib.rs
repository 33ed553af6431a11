//! Diagnostic creation, severity management, and rendering.
//!
//! Readers and the placer report recoverable problems as structured
//! [`Diagnostic`]s into a [`DiagnosticSink`] and keep going. The CLI drains
//! the sink at the end of a command and renders it with a
//! [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use location::Location;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
