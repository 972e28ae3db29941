//! The Encoding Classifier (C3, spec §4.3): decides, for one field's
//! declared shape, which of the wire-format strategies applies.
//!
//! This is the same decision a reader gets from
//! `examples/original_source/proto.go` `dumpField`'s `reflect.Kind`
//! switch, just returning a typed plan the emitter consumes instead of
//! printing a `.proto` line.

use crate::error::{GenError, GenResult};
use crate::reflect::{Kind, TypeShape};
use crate::registry::Registry;

/// An integer kind encoded as a plain (non-zigzag for unsigned,
/// zigzag for signed) varint payload (spec §4.3 "Primitive varint").
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VarintKind {
	Bool,
	Int32,
	Int64,
	Uint32,
	Uint64,
}

/// What a single field, or a single element of a repeated field,
/// resolves to.
#[derive(Debug, Clone)]
pub enum ElementPlan {
	Varint(VarintKind),
	Fixed8 { signed: bool },
	Fixed16 { signed: bool },
	Bytes,
	NestedMessage { alias: String },
	Leaf { short_name: String },
	Interface { alias: String },
}

/// The classification of one struct field (spec §4.3).
#[derive(Debug, Clone)]
pub enum FieldPlan {
	/// A synchronization primitive: no code is emitted for this field
	/// at all (spec §4.3 "Skip", §9 "Sync primitives skipped").
	Skip,
	Scalar(ElementPlan),
	/// `Slice<non-byte>`: one tagged element emitted per item (spec
	/// §4.3 "Slice of non-byte").
	Repeated(ElementPlan),
	/// `*T`/`Box<T>`: handled exactly like the pointee, with a fresh
	/// zero value materialized on decode (spec §4.3
	/// "Pointer-to-struct").
	Pointer(Box<FieldPlan>),
}

fn classify_scalar_kind(kind: Kind) -> Option<ElementPlan> {
	match kind {
		Kind::Bool => Some(ElementPlan::Varint(VarintKind::Bool)),
		Kind::Int32 => Some(ElementPlan::Varint(VarintKind::Int32)),
		Kind::Int64 => Some(ElementPlan::Varint(VarintKind::Int64)),
		Kind::Uint32 => Some(ElementPlan::Varint(VarintKind::Uint32)),
		Kind::Uint64 => Some(ElementPlan::Varint(VarintKind::Uint64)),
		Kind::Int8 => Some(ElementPlan::Fixed8 { signed: true }),
		Kind::Uint8 => Some(ElementPlan::Fixed8 { signed: false }),
		Kind::Int16 => Some(ElementPlan::Fixed16 { signed: true }),
		Kind::Uint16 => Some(ElementPlan::Fixed16 { signed: false }),
		Kind::String => Some(ElementPlan::Bytes),
		_ => None,
	}
}

/// Classifies a struct-kinded (or interface-kinded) shape that is
/// *not* itself a primitive: looks it up in the registry as a leaf,
/// a registered concrete, or a registered interface.
fn classify_aggregate(owner: &'static str, field: &'static str, shape: &TypeShape, registry: &Registry) -> GenResult<ElementPlan> {
	match shape {
		TypeShape::Struct { canonical_name, .. } => {
			if let Some(short_name) = registry.leaf_short_name(canonical_name) {
				return Ok(ElementPlan::Leaf { short_name: short_name.to_string() });
			}
			match registry.alias_for_struct_path(canonical_name) {
				Some(alias) => Ok(ElementPlan::NestedMessage { alias: alias.to_string() }),
				None => Err(GenError::UnregisteredType { owner, field, type_name: canonical_name }),
			}
		}
		TypeShape::Interface { canonical_name } => match registry.alias_for_interface_path(canonical_name) {
			Some(alias) => Ok(ElementPlan::Interface { alias: alias.to_string() }),
			None => Err(GenError::UnregisteredType { owner, field, type_name: canonical_name }),
		},
		TypeShape::Pointer { element } => classify_aggregate(owner, field, element, registry),
		_ => match classify_scalar_kind(shape.kind()) {
			Some(plan) => Ok(plan),
			None => Err(GenError::UnsupportedKind { owner, field, kind: shape.kind() }),
		},
	}
}

/// Classifies one struct field's declared shape into a [`FieldPlan`]
/// (spec §4.3).
pub fn classify(owner: &'static str, field: &'static str, shape: &TypeShape, registry: &Registry) -> GenResult<FieldPlan> {
	match shape {
		TypeShape::Float32 | TypeShape::Float64 => Err(GenError::UnsupportedKind { owner, field, kind: shape.kind() }),

		TypeShape::Sync { .. } => Ok(FieldPlan::Skip),

		TypeShape::Array { element, .. } => match element.kind() {
			Kind::Uint8 => Ok(FieldPlan::Scalar(ElementPlan::Bytes)),
			other => Err(GenError::UnsupportedArrayElement { owner, field, element_kind: other }),
		},

		TypeShape::Slice { element } => match &**element {
			// `[]byte`: a single length-delimited payload, not a
			// repeated field (spec §4.3 "String / bytes / byte-array").
			_ if element.kind() == Kind::Uint8 => Ok(FieldPlan::Scalar(ElementPlan::Bytes)),

			// `[][]byte`: repeated, each element itself a byte slice
			// (spec §4.3 "Arrays of non-byte element types are
			// rejected. Slices-of-slices are rejected except when the
			// inner slice is a byte slice").
			TypeShape::Slice { element: inner } if inner.kind() == Kind::Uint8 => Ok(FieldPlan::Repeated(ElementPlan::Bytes)),
			TypeShape::Slice { .. } => Err(GenError::UnsupportedNestedSlice { owner, field }),
			TypeShape::Array { element: inner, .. } if inner.kind() == Kind::Uint8 => Ok(FieldPlan::Repeated(ElementPlan::Bytes)),
			TypeShape::Array { .. } => Err(GenError::UnsupportedNestedSlice { owner, field }),

			_ => classify_aggregate(owner, field, element, registry).map(FieldPlan::Repeated),
		},

		TypeShape::Pointer { element } => classify(owner, field, element, registry).map(|inner| FieldPlan::Pointer(Box::new(inner))),

		TypeShape::Struct { .. } | TypeShape::Interface { .. } => classify_aggregate(owner, field, shape, registry).map(FieldPlan::Scalar),

		_ => match classify_scalar_kind(shape.kind()) {
			Some(plan) => Ok(FieldPlan::Scalar(plan)),
			None => Err(GenError::UnsupportedKind { owner, field, kind: shape.kind() }),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reflect::Reflect;
	use crate::registry::RegistryBuilder;

	struct Leafy;
	impl Reflect for Leafy {
		fn canonical_name() -> &'static str {
			"demo.Leafy"
		}
		fn type_shape() -> TypeShape {
			TypeShape::Struct { canonical_name: "demo.Leafy", fields: vec![] }
		}
	}

	struct Inner;
	impl Reflect for Inner {
		fn canonical_name() -> &'static str {
			"demo.Inner"
		}
		fn type_shape() -> TypeShape {
			TypeShape::Struct { canonical_name: "demo.Inner", fields: vec![] }
		}
	}

	fn registry() -> Registry {
		let mut builder = RegistryBuilder::new();
		builder.register::<Inner>("Inner", "demo.Inner").unwrap();
		builder.leaf_type::<Leafy>("Leafy");
		builder.build().unwrap()
	}

	#[test]
	fn floats_are_rejected() {
		let registry = registry();
		let err = classify("Owner", "x", &TypeShape::Float64, &registry).unwrap_err();
		assert!(matches!(err, GenError::UnsupportedKind { .. }));
	}

	#[test]
	fn byte_slice_is_scalar_bytes() {
		let registry = registry();
		let plan = classify("Owner", "x", &Vec::<u8>::type_shape(), &registry).unwrap();
		assert!(matches!(plan, FieldPlan::Scalar(ElementPlan::Bytes)));
	}

	#[test]
	fn byte_array_is_scalar_bytes() {
		let registry = registry();
		let plan = classify("Owner", "x", &<[u8; 4]>::type_shape(), &registry).unwrap();
		assert!(matches!(plan, FieldPlan::Scalar(ElementPlan::Bytes)));
	}

	#[test]
	fn non_byte_array_is_rejected() {
		let registry = registry();
		let err = classify("Owner", "x", &<[u32; 4]>::type_shape(), &registry).unwrap_err();
		assert!(matches!(err, GenError::UnsupportedArrayElement { .. }));
	}

	#[test]
	fn slice_of_byte_slices_is_repeated_bytes() {
		let registry = registry();
		let plan = classify("Owner", "x", &Vec::<Vec<u8>>::type_shape(), &registry).unwrap();
		assert!(matches!(plan, FieldPlan::Repeated(ElementPlan::Bytes)));
	}

	#[test]
	fn slice_of_slice_of_non_byte_is_rejected() {
		let registry = registry();
		let err = classify("Owner", "x", &Vec::<Vec<u32>>::type_shape(), &registry).unwrap_err();
		assert!(matches!(err, GenError::UnsupportedNestedSlice { .. }));
	}

	#[test]
	fn slice_of_uint32_is_repeated_varint() {
		let registry = registry();
		let plan = classify("Owner", "x", &Vec::<u32>::type_shape(), &registry).unwrap();
		assert!(matches!(plan, FieldPlan::Repeated(ElementPlan::Varint(VarintKind::Uint32))));
	}

	#[test]
	fn registered_struct_is_nested_message() {
		let registry = registry();
		let plan = classify("Owner", "x", &Inner::type_shape(), &registry).unwrap();
		assert!(matches!(plan, FieldPlan::Scalar(ElementPlan::NestedMessage { .. })));
	}

	#[test]
	fn leaf_struct_does_not_recurse() {
		let registry = registry();
		let plan = classify("Owner", "x", &Leafy::type_shape(), &registry).unwrap();
		assert!(matches!(plan, FieldPlan::Scalar(ElementPlan::Leaf { .. })));
	}

	#[test]
	fn unregistered_struct_is_an_error() {
		struct Stray;
		impl Reflect for Stray {
			fn canonical_name() -> &'static str {
				"demo.Stray"
			}
			fn type_shape() -> TypeShape {
				TypeShape::Struct { canonical_name: "demo.Stray", fields: vec![] }
			}
		}
		let registry = registry();
		let err = classify("Owner", "x", &Stray::type_shape(), &registry).unwrap_err();
		assert!(matches!(err, GenError::UnregisteredType { .. }));
	}

	#[test]
	fn pointer_to_struct_classifies_as_pointer_to_the_inner_plan() {
		let registry = registry();
		let plan = classify("Owner", "x", &Box::<Inner>::type_shape(), &registry).unwrap();
		match plan {
			FieldPlan::Pointer(inner) => assert!(matches!(*inner, FieldPlan::Scalar(ElementPlan::NestedMessage { .. }))),
			_ => panic!("expected pointer"),
		}
	}
}
