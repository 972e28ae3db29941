//! The emitter (C4–C7): turns a frozen [`crate::registry::Registry`]
//! into Go source text. Each submodule owns one layer of spec §4:
//! [`concrete`] walks one struct's fields (C4), [`interface`] walks one
//! interface's implementor set (C5), [`top_level`] emits the handful of
//! functions that span every registered type (C6), [`runtime_text`] is
//! the fixed C7 prologue every emitted file depends on, and [`writer`]
//! is the indentation-aware accumulator the other four write through.

pub mod concrete;
pub mod interface;
pub mod runtime_text;
pub mod top_level;
pub mod writer;
