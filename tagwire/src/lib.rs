//! `tagwire`: a binary-codec source generator. Given a catalogue of
//! concrete (struct) and interface types, it emits Go source text
//! implementing a protobuf-compatible, tag-based length-delimited wire
//! format: four synchronized routines per concrete type
//! (`Encode`/`Decode`/`Rand`/`DeepCopy`), the same four per interface
//! (dispatching on a magic number), and a handful of functions spanning
//! the whole registered set (`EncodeAny`, `DecodeAny`,
//! `AssignIfcPtrFromStruct`, `GetSupportList`, ...).
//!
//! ```no_run
//! use tagwire::prelude::*;
//!
//! #[derive(Reflect)]
//! struct Ping {
//!     seq: u32,
//!     note: String,
//! }
//!
//! let mut catalogue = CatalogueBuilder::new();
//! catalogue.register::<Ping>("Ping", "demo.Ping");
//!
//! let source = Generator::new("codec").generate(catalogue).unwrap();
//! assert!(source.contains("func EncodePing"));
//! ```

pub mod catalogue;
pub mod classify;
pub mod emit;
pub mod error;
pub mod generator;
pub mod rand_src;
pub mod reflect;
pub mod registry;
pub mod runtime;
pub mod wire;

pub use tagwire_derive::Reflect;

/// The small set of types most callers need to build a catalogue and
/// run the generator, re-exported for a single `use tagwire::prelude::*`.
pub mod prelude {
	pub use crate::catalogue::CatalogueBuilder;
	pub use crate::error::{GenError, GenResult};
	pub use crate::generator::Generator;
	pub use crate::reflect::{Ifc, InterfaceMarker, Reflect};
	pub use tagwire_derive::Reflect;
}
