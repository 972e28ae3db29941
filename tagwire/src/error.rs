//! The generator-fatal error taxonomy of spec §7 (first half). Every
//! variant here aborts generation; none are recoverable mid-catalogue,
//! matching the single-threaded, no-cancellation resource model of
//! spec §5.
//!
//! `thiserror` is used here (rather than the teacher's hand-rolled
//! `ReadError` in `cilium::schema::errors`) because this crate's error
//! surface spans two independent taxonomies (this one, plus
//! [`crate::runtime::DecodeError`]) and benefits from the derive the
//! rest of the pack already reaches for (see
//! `examples/FuelLabs-fuel-vm/fuel-storage/Cargo.toml`,
//! `fuel-compression/Cargo.toml`).

use crate::reflect::Kind;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
	#[error("field `{field}` on `{owner}` uses unsupported kind {kind:?}")]
	UnsupportedKind { owner: &'static str, field: &'static str, kind: Kind },

	#[error("field `{field}` on `{owner}` refers to `{type_name}`, which is neither registered nor a leaf type")]
	UnregisteredType { owner: &'static str, field: &'static str, type_name: &'static str },

	#[error("magic number collision: `{existing}` and `{incoming}` both hash to {magic}")]
	MagicCollision { existing: String, incoming: String, magic: u32 },

	#[error("`{owner}` declares {count} fields, exceeding the field-number ceiling of {max}", max = crate::wire::MAX_FIELD_NUMBER)]
	FieldNumberOverflow { owner: &'static str, count: usize },

	#[error("interface `{alias}` has no registered implementors")]
	MissingImplementors { alias: String },

	#[error("alias `{alias}` is registered more than once")]
	DuplicateAlias { alias: String },

	#[error("array field `{field}` on `{owner}` has non-byte element kind {element_kind:?}; only byte arrays are supported")]
	UnsupportedArrayElement { owner: &'static str, field: &'static str, element_kind: Kind },

	#[error("field `{field}` on `{owner}` is a slice of slices of non-byte elements, which is not supported")]
	UnsupportedNestedSlice { owner: &'static str, field: &'static str },
}

pub type GenResult<T> = Result<T, GenError>;
