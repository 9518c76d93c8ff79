//! gridref_engine - Spreadsheet address and formula-reference engine.

pub mod engine;
