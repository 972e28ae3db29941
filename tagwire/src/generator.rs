//! Top-level orchestration (spec §2 "Control flow"): drives a built
//! [`Registry`] through C4 (concretes), C5 (interfaces) and C6 (the
//! global dispatch layer), then concatenates the result with the C7
//! runtime prologue into one emitted file.
//!
//! This is the Rust counterpart of `GenerateCodecFile`
//! (`examples/original_source/codon.go:168-243`): that function also
//! walks structs then interfaces then appends the fixed header and
//! support-list footer, in the same order this module does.

use crate::catalogue::CatalogueBuilder;
use crate::emit::runtime_text::RUNTIME_GO;
use crate::emit::writer::CodeWriter;
use crate::emit::{concrete, interface, top_level};
use crate::error::GenResult;
use crate::registry::Registry;

/// Drives one code-generation run end to end. Holds nothing but the
/// target package name — the registry and catalogue extras it consumes
/// are supplied per call to [`Generator::generate`], matching the
/// single-invocation, no-persisted-state resource model of spec §5.
pub struct Generator {
	package: String,
}

impl Generator {
	pub fn new(package: impl Into<String>) -> Self {
		Self { package: package.into() }
	}

	/// Builds `catalogue`, then emits the full file: package header,
	/// standard + extra imports, the C7 runtime block, any
	/// caller-supplied extra logic, every concrete's four routines (in
	/// catalogue order, spec §4.4 "the entry list as supplied"), every
	/// interface's four routines, then the C6 global dispatch layer.
	#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(package = %self.package)))]
	pub fn generate(&self, catalogue: CatalogueBuilder) -> GenResult<String> {
		let (registry, extras) = catalogue.build()?;
		self.emit_all(&registry, &extras.imports, &extras.logic)
	}

	/// Emits directly from an already-built [`Registry`], for callers
	/// that assembled one outside a [`CatalogueBuilder`] (e.g. this
	/// crate's own tests, which build a `Registry` by hand to isolate
	/// one emission step at a time).
	#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(package = %self.package)))]
	pub fn emit_all(&self, registry: &Registry, extra_imports: &[&str], extra_logic: &[String]) -> GenResult<String> {
		let mut w = CodeWriter::new();
		self.emit_header(&mut w, extra_imports, extra_logic);

		for alias in registry.struct_aliases().collect::<Vec<_>>() {
			let entry = registry.struct_entry(alias).expect("alias came from struct_aliases()");
			#[cfg(feature = "tracing")]
			tracing::debug!(alias, "emitting concrete type");
			w.line(concrete::emit_struct(entry, registry)?);
			w.blank();
		}

		for alias in registry.interface_aliases().collect::<Vec<_>>() {
			let entry = registry.interface_entry(alias).expect("alias came from interface_aliases()");
			#[cfg(feature = "tracing")]
			tracing::debug!(alias, "emitting interface dispatch");
			w.line(interface::emit_interface(entry, registry)?);
			w.blank();
		}

		w.line(top_level::emit_top_level(registry));
		Ok(w.finish())
	}

	fn emit_header(&self, w: &mut CodeWriter, extra_imports: &[&str], extra_logic: &[String]) {
		w.line(format!("package {}", self.package));
		w.blank();
		w.block("import", |w| {
			w.line("\"errors\"");
			w.line("\"fmt\"");
			for import in extra_imports {
				w.line(format!("\"{import}\""));
			}
		});
		w.blank();
		w.line(RUNTIME_GO);
		for logic in extra_logic {
			w.line(logic);
			w.blank();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reflect::{FieldShape, Reflect, TypeShape};

	struct A;
	impl Reflect for A {
		fn canonical_name() -> &'static str {
			"demo.A"
		}
		fn type_shape() -> TypeShape {
			TypeShape::Struct { canonical_name: "demo.A", fields: vec![FieldShape { name: "X", shape: TypeShape::Uint32 }] }
		}
	}

	struct B;
	impl Reflect for B {
		fn canonical_name() -> &'static str {
			"demo.B"
		}
		fn type_shape() -> TypeShape {
			TypeShape::Struct { canonical_name: "demo.B", fields: vec![] }
		}
	}

	struct IfcMarker;
	impl crate::reflect::InterfaceMarker for IfcMarker {
		fn canonical_name() -> &'static str {
			"demo.Ifc"
		}
	}

	fn catalogue() -> CatalogueBuilder {
		let mut c = CatalogueBuilder::new();
		c.register::<A>("A", "demo.A");
		c.register::<B>("B", "demo.B");
		c.register_interface::<IfcMarker>("Ifc", "demo.Ifc", vec!["A", "B"]);
		c
	}

	#[test]
	fn generate_emits_package_header_runtime_and_every_routine() {
		let gen = Generator::new("codec");
		let text = gen.generate(catalogue()).unwrap();
		assert!(text.starts_with("package codec\n"));
		assert!(text.contains("import ("));
		assert!(text.contains("type RandSrc interface"));
		assert!(text.contains("func EncodeA(w *[]byte, v A) {"));
		assert!(text.contains("func EncodeB(w *[]byte, v B) {"));
		assert!(text.contains("func EncodeIfc(w *[]byte, v Ifc) {"));
		assert!(text.contains("func EncodeAny("));
		assert!(text.contains("func GetSupportList("));
	}

	#[test]
	fn generate_splices_extra_imports_and_logic() {
		let mut c = catalogue();
		c.extra_import("encoding/binary");
		c.extra_logic("// hand-written helper");
		let gen = Generator::new("codec");
		let text = gen.generate(c).unwrap();
		assert!(text.contains("\"encoding/binary\""));
		assert!(text.contains("// hand-written helper"));
	}

	/// Spec §8 property 5 ("Deterministic emission"): running the
	/// generator twice on the same catalogue produces byte-identical
	/// output. Built fresh each time since `CatalogueBuilder` is
	/// consumed by `generate`.
	#[test]
	fn generate_is_deterministic_across_runs() {
		let gen = Generator::new("codec");
		let first = gen.generate(catalogue()).unwrap();
		let second = gen.generate(catalogue()).unwrap();
		assert_eq!(first, second);
	}
}
