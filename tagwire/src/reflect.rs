//! Declarative type shapes standing in for the runtime reflection the
//! original generator drew on (spec §9, "Reflection"). Rust has no
//! `reflect.TypeOf` equivalent, so a type opts into the catalogue by
//! implementing [`Reflect`], either by hand or via `#[derive(Reflect)]`
//! (`tagwire-derive`).
//!
//! The shapes mirror the `reflect.Kind` switch the original `codon`
//! walks (`examples/original_source/codon.go:38-135`,
//! `examples/original_source/proto.go` `dumpField`) closely enough that
//! [`crate::classify::classify`] can make the same decisions spec §4.3
//! describes, just against a typed enum instead of a string-keyed kind.

use std::marker::PhantomData;

/// The atomic kind of a type, used only for quick dispatch; the full
/// shape (element type, field list) lives in [`TypeShape`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
	Bool,
	Int8,
	Int16,
	Int32,
	Int64,
	Uint8,
	Uint16,
	Uint32,
	Uint64,
	Float32,
	Float64,
	String,
	Slice,
	Array,
	Struct,
	Pointer,
	Interface,
	/// A synchronization primitive (e.g. a mutex): silently skipped
	/// during encode/decode/rand/deepcopy per spec §9 "Sync primitives
	/// skipped".
	Sync,
}

/// The declarative schema fed to the registry in place of runtime
/// reflection (spec §4.1): kind, element type for slice/array/pointer,
/// field list for struct.
#[derive(Debug, Clone)]
pub enum TypeShape {
	Bool,
	Int8,
	Int16,
	Int32,
	Int64,
	Uint8,
	Uint16,
	Uint32,
	Uint64,
	Float32,
	Float64,
	String,
	Slice { element: Box<TypeShape> },
	Array { element: Box<TypeShape>, len: usize },
	Struct { canonical_name: &'static str, fields: Vec<FieldShape> },
	Pointer { element: Box<TypeShape> },
	Interface { canonical_name: &'static str },
	Sync { canonical_name: &'static str },
}

/// One field of a [`TypeShape::Struct`], in declaration order — field
/// number is `index + 1` per spec §4.3.
#[derive(Debug, Clone)]
pub struct FieldShape {
	pub name: &'static str,
	pub shape: TypeShape,
}

impl TypeShape {
	pub fn kind(&self) -> Kind {
		match self {
			TypeShape::Bool => Kind::Bool,
			TypeShape::Int8 => Kind::Int8,
			TypeShape::Int16 => Kind::Int16,
			TypeShape::Int32 => Kind::Int32,
			TypeShape::Int64 => Kind::Int64,
			TypeShape::Uint8 => Kind::Uint8,
			TypeShape::Uint16 => Kind::Uint16,
			TypeShape::Uint32 => Kind::Uint32,
			TypeShape::Uint64 => Kind::Uint64,
			TypeShape::Float32 => Kind::Float32,
			TypeShape::Float64 => Kind::Float64,
			TypeShape::String => Kind::String,
			TypeShape::Slice { .. } => Kind::Slice,
			TypeShape::Array { .. } => Kind::Array,
			TypeShape::Struct { .. } => Kind::Struct,
			TypeShape::Pointer { .. } => Kind::Pointer,
			TypeShape::Interface { .. } => Kind::Interface,
			TypeShape::Sync { .. } => Kind::Sync,
		}
	}

	/// The element shape of a slice/array/pointer, used by the
	/// classifier to recognise byte-slice and byte-array payloads.
	pub fn element(&self) -> Option<&TypeShape> {
		match self {
			TypeShape::Slice { element } => Some(element),
			TypeShape::Array { element, .. } => Some(element),
			TypeShape::Pointer { element } => Some(element),
			_ => None,
		}
	}
}

/// A type that can describe its own shape to the registry. Implemented
/// for the primitive kinds below, recursively for `Vec<T>`/`[T; N]`/
/// `Box<T>`, and by `#[derive(Reflect)]` for user structs.
pub trait Reflect {
	/// `package-path + "." + simple-name`, per the GLOSSARY's
	/// "Canonical name". Anonymous/primitive types return `""`.
	fn canonical_name() -> &'static str;
	fn type_shape() -> TypeShape;
}

macro_rules! impl_reflect_primitive {
	($ty:ty, $shape:ident) => {
		impl Reflect for $ty {
			fn canonical_name() -> &'static str {
				""
			}
			fn type_shape() -> TypeShape {
				TypeShape::$shape
			}
		}
	};
}

impl_reflect_primitive!(bool, Bool);
impl_reflect_primitive!(i8, Int8);
impl_reflect_primitive!(i16, Int16);
impl_reflect_primitive!(i32, Int32);
impl_reflect_primitive!(i64, Int64);
impl_reflect_primitive!(u8, Uint8);
impl_reflect_primitive!(u16, Uint16);
impl_reflect_primitive!(u32, Uint32);
impl_reflect_primitive!(u64, Uint64);
impl_reflect_primitive!(f32, Float32);
impl_reflect_primitive!(f64, Float64);
impl_reflect_primitive!(String, String);

impl<T: Reflect> Reflect for Vec<T> {
	fn canonical_name() -> &'static str {
		""
	}
	fn type_shape() -> TypeShape {
		TypeShape::Slice { element: Box::new(T::type_shape()) }
	}
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
	fn canonical_name() -> &'static str {
		""
	}
	fn type_shape() -> TypeShape {
		TypeShape::Array { element: Box::new(T::type_shape()), len: N }
	}
}

impl<T: Reflect> Reflect for Box<T> {
	fn canonical_name() -> &'static str {
		T::canonical_name()
	}
	fn type_shape() -> TypeShape {
		TypeShape::Pointer { element: Box::new(T::type_shape()) }
	}
}

/// A zero-sized marker identifying one registered interface, used to
/// tag a struct field as interface-typed without needing a trait object
/// at the type-shape level (spec §9: "model each interface as a tagged
/// union"; here the union's *discriminant* is this marker, the actual
/// variants live in the registry's implementor list).
pub trait InterfaceMarker {
	fn canonical_name() -> &'static str;
}

/// Wraps an [`InterfaceMarker`] so it can appear as a struct field type
/// and be picked up by `#[derive(Reflect)]` like any other field.
pub struct Ifc<I: InterfaceMarker>(PhantomData<I>);

impl<I: InterfaceMarker> Reflect for Ifc<I> {
	fn canonical_name() -> &'static str {
		I::canonical_name()
	}
	fn type_shape() -> TypeShape {
		TypeShape::Interface { canonical_name: I::canonical_name() }
	}
}

/// `std::sync::Mutex<T>` is treated as a synchronization primitive and
/// silently skipped during encode/decode/rand/deepcopy (spec §9).
impl<T> Reflect for std::sync::Mutex<T> {
	fn canonical_name() -> &'static str {
		"std::sync::Mutex"
	}
	fn type_shape() -> TypeShape {
		TypeShape::Sync { canonical_name: "std::sync::Mutex" }
	}
}

impl<T> Reflect for std::sync::RwLock<T> {
	fn canonical_name() -> &'static str {
		"std::sync::RwLock"
	}
	fn type_shape() -> TypeShape {
		TypeShape::Sync { canonical_name: "std::sync::RwLock" }
	}
}
