//! Command-line front end for `phontab_core`: fetches the kana
//! dictionaries, compiles tables to binary files and emits source literals.

pub mod commands;
pub mod kana_source;
pub mod logging;
