//! Modeling and validation of Modelica `external` clauses.
//!
//! An `external` clause binds a Modelica function to a subprogram implemented
//! in a foreign language ("C", "C89", "FORTRAN 77"), together with its call
//! signature, argument bindings, and build-directive annotations such as
//! `Library` and `Include`. This crate consumes already-parsed syntax
//! fragments from the grammar layer and produces validated, immutable domain
//! objects plus an ordered list of diagnostics. It performs no I/O and holds
//! no shared mutable state, so independent clauses may be processed in
//! parallel by the surrounding tool.

use std::sync::Once;

pub mod ir;
pub mod reporting;
pub mod unparse;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::init();
    });
}
