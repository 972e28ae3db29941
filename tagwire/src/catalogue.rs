//! The generator's input surface (spec §6 "Catalogue input"): the
//! ordered list of concrete types and interfaces to emit codecs for,
//! plus the leaf-type and ignore-impl escape hatches.
//!
//! Modeled on the teacher's accumulate-then-freeze builder
//! (`cilium::structured::resolver::DefaultAssemblyResolver::new`
//! gathers candidate assemblies, then later calls resolve them once);
//! here `CatalogueBuilder` accumulates entries and `build()` hands them
//! to [`crate::registry::RegistryBuilder`] to validate and freeze.

use crate::error::GenResult;
use crate::reflect::{InterfaceMarker, Reflect};
use crate::registry::{Registry, RegistryBuilder};

/// One accumulation step recorded by [`CatalogueBuilder`], replayed
/// against a [`RegistryBuilder`] in the order it was recorded so that
/// struct aliases win ties over later-registered ones (spec §4.5
/// "Emission order").
enum Entry {
	Struct { alias: &'static str, name: &'static str, register: fn(&mut RegistryBuilder, &'static str, &'static str) -> GenResult<()> },
	Interface { alias: &'static str, name: &'static str, implementors: Vec<&'static str>, register: fn(&mut RegistryBuilder, &'static str, &'static str, Vec<&'static str>) -> GenResult<()> },
	Leaf { short_name: &'static str, register: fn(&mut RegistryBuilder, &'static str) },
	IgnoreImpl { struct_alias: &'static str, interface_alias: &'static str },
	ExtraImport { path: &'static str },
	ExtraLogic { text: String },
}

/// Accumulates the catalogue of types a single generated file should
/// cover. Build one, register every concrete type and interface it
/// needs, then call [`CatalogueBuilder::build`].
#[derive(Default)]
pub struct CatalogueBuilder {
	entries: Vec<Entry>,
}

impl CatalogueBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a concrete struct type under `alias` (its identifier
	/// in the generated Go, spec §3 "Alias"), recording `name` (its
	/// canonical name) for magic-number derivation.
	pub fn register<T: Reflect>(&mut self, alias: &'static str, name: &'static str) -> &mut Self {
		self.entries.push(Entry::Struct {
			alias,
			name,
			register: |builder, alias, name| builder.register::<T>(alias, name).map(|_| ()),
		});
		self
	}

	/// Registers an interface under `alias`, with the aliases of every
	/// concrete type that implements it (spec §4.6 "Interface
	/// implementors are supplied by the caller, not discovered").
	pub fn register_interface<I: InterfaceMarker>(&mut self, alias: &'static str, name: &'static str, implementors: Vec<&'static str>) -> &mut Self {
		self.entries.push(Entry::Interface {
			alias,
			name,
			implementors,
			register: |builder, alias, name, implementors| builder.register_interface::<I>(alias, name, implementors).map(|_| ()),
		});
		self
	}

	/// Declares `T` a leaf type: its codec is assumed to already exist
	/// (hand-written or emitted elsewhere) and fields of this type are
	/// encoded via a plain call to it rather than recursive emission
	/// (spec §4.3 "Leaf types").
	pub fn leaf_type<T: Reflect>(&mut self, short_name: &'static str) -> &mut Self {
		self.entries.push(Entry::Leaf { short_name, register: |builder, short_name| { builder.leaf_type::<T>(short_name); } });
		self
	}

	/// Suppresses emission of the assignment from `struct_alias` into
	/// `interface_alias`'s `AssignIfcPtrFromStruct` dispatch (spec §4.6
	/// "Ignored implementations").
	pub fn ignore_impl(&mut self, struct_alias: &'static str, interface_alias: &'static str) -> &mut Self {
		self.entries.push(Entry::IgnoreImpl { struct_alias, interface_alias });
		self
	}

	/// An extra `import` line the generated file should carry (spec §6
	/// "Extra imports"), e.g. for a leaf type's defining package.
	pub fn extra_import(&mut self, path: &'static str) -> &mut Self {
		self.entries.push(Entry::ExtraImport { path });
		self
	}

	/// A verbatim block of Go source appended to the generated file
	/// (spec §6 "Extra logic"), e.g. hand-written helpers the emitted
	/// code calls into.
	pub fn extra_logic(&mut self, text: impl Into<String>) -> &mut Self {
		self.entries.push(Entry::ExtraLogic { text: text.into() });
		self
	}

	/// Replays every accumulated entry against a fresh
	/// [`RegistryBuilder`] and freezes it, returning the built
	/// [`Registry`] plus the extra imports/logic blocks to splice into
	/// the emitted file.
	pub fn build(self) -> GenResult<(Registry, CatalogueExtras)> {
		let mut builder = RegistryBuilder::new();
		let mut extras = CatalogueExtras::default();
		let mut ignored = Vec::new();

		for entry in self.entries {
			match entry {
				Entry::Struct { alias, name, register } => register(&mut builder, alias, name)?,
				Entry::Interface { alias, name, implementors, register } => register(&mut builder, alias, name, implementors)?,
				Entry::Leaf { short_name, register } => register(&mut builder, short_name),
				Entry::IgnoreImpl { struct_alias, interface_alias } => ignored.push((struct_alias, interface_alias)),
				Entry::ExtraImport { path } => extras.imports.push(path),
				Entry::ExtraLogic { text } => extras.logic.push(text),
			}
		}

		for (struct_alias, interface_alias) in ignored {
			builder.ignore_impl(struct_alias, interface_alias);
		}

		let registry = builder.build()?;
		Ok((registry, extras))
	}
}

/// Catalogue content that isn't part of the type registry proper but
/// still needs splicing into the generated file (spec §6).
#[derive(Default)]
pub struct CatalogueExtras {
	pub imports: Vec<&'static str>,
	pub logic: Vec<String>,
}
