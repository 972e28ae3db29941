//! The type-graph registry (C2, spec §3/§4.2): the set of registered
//! concretes and interfaces, their magic numbers, and the
//! interface→implementor relation.
//!
//! Lifecycle follows spec §3 exactly: a [`RegistryBuilder`] accumulates
//! entries, `.build()` runs `analyzeImplementors` and freezes the result
//! into an immutable [`Registry`] that never changes again for the rest
//! of the run — the same accumulate-then-query shape as
//! `cilium::structured::resolver::DefaultAssemblyResolver::new`, which
//! gathers paths before any lookup is answered.

use fxhash::FxHashMap;
use sha2::{Digest, Sha256};

use crate::error::{GenError, GenResult};
use crate::reflect::{Reflect, TypeShape};
use crate::wire::{MAX_MAGIC, MIN_MAGIC};

/// One registered concrete type (spec §3 "Entry").
#[derive(Debug, Clone)]
pub struct StructEntry {
	pub alias: String,
	pub name: String,
	pub canonical_name: &'static str,
	pub fields: Vec<crate::reflect::FieldShape>,
}

/// One registered interface type (spec §3 "Entry", interface variant).
#[derive(Debug, Clone)]
pub struct InterfaceEntry {
	pub alias: String,
	pub name: String,
	pub canonical_name: &'static str,
	/// Implementor struct aliases, in registration order, deduplicated
	/// by path (spec Invariant 6).
	pub implementors: Vec<String>,
}

/// `sha256(alias || name)`, low 8 bytes as a little-endian integer,
/// projected into `[MIN_MAGIC, MAX_MAGIC]` (spec §4.2).
fn magic_number(alias: &str, name: &str) -> u32 {
	let mut hasher = Sha256::new();
	hasher.update(alias.as_bytes());
	hasher.update(name.as_bytes());
	let digest = hasher.finalize();
	let mut low8 = [0u8; 8];
	low8.copy_from_slice(&digest[..8]);
	let raw = u64::from_le_bytes(low8);
	let span = (MAX_MAGIC - MIN_MAGIC) as u64;
	(raw % span) as u32 + MIN_MAGIC
}

#[derive(Default)]
pub struct RegistryBuilder {
	structs: FxHashMap<String, StructEntry>,
	struct_order: Vec<String>,
	struct_path_to_alias: FxHashMap<&'static str, String>,
	ifcs: FxHashMap<String, InterfaceEntry>,
	ifc_order: Vec<String>,
	ifc_path_to_alias: FxHashMap<&'static str, String>,
	magic: FxHashMap<String, u32>,
	magic_to_alias: FxHashMap<u32, String>,
	leaf_types: FxHashMap<&'static str, String>,
	ignore_impl: FxHashMap<String, String>,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks `T` as a leaf type: the classifier will not recurse into
	/// its fields, and the emitted code will call a user-supplied
	/// `Encode<short_name>`/`Decode<short_name>` pair instead (spec §3
	/// "leaf_types").
	pub fn leaf_type<T: Reflect>(&mut self, short_name: impl Into<String>) -> &mut Self {
		self.leaf_types.insert(T::canonical_name(), short_name.into());
		self
	}

	/// Suppresses `struct_alias` from `Rand<ifc_alias>`'s implementor
	/// selection, while it remains a legal encode/decode target (spec §3
	/// "ignore_impl").
	pub fn ignore_impl(&mut self, struct_alias: impl Into<String>, ifc_alias: impl Into<String>) -> &mut Self {
		self.ignore_impl.insert(struct_alias.into(), ifc_alias.into());
		self
	}

	/// Registers a concrete type under `alias`, using `name` (rather
	/// than `T::canonical_name()`) for magic-number derivation — the
	/// original generator hashes the caller-supplied `name`, not a
	/// freshly reflected path, so an entry's magic number is stable
	/// even if the Rust type is later renamed.
	pub fn register<T: Reflect>(&mut self, alias: impl Into<String>, name: impl Into<String>) -> GenResult<&mut Self> {
		let alias = alias.into();
		let name = name.into();
		let shape = T::type_shape();
		let TypeShape::Struct { canonical_name, fields } = shape else {
			panic!("`{alias}` does not reflect a struct shape; register interfaces with `register_interface`");
		};

		if self.structs.contains_key(&alias) || self.ifcs.contains_key(&alias) {
			return Err(GenError::DuplicateAlias { alias });
		}

		let magic = magic_number(&alias, &name);
		if let Some(existing) = self.magic_to_alias.get(&magic) {
			return Err(GenError::MagicCollision { existing: existing.clone(), incoming: alias, magic });
		}

		if fields.len() as u32 > crate::wire::MAX_FIELD_NUMBER {
			return Err(GenError::FieldNumberOverflow { owner: canonical_name, count: fields.len() });
		}

		self.magic.insert(alias.clone(), magic);
		self.magic_to_alias.insert(magic, alias.clone());
		self.struct_path_to_alias.insert(canonical_name, alias.clone());
		self.struct_order.push(alias.clone());
		self.structs.insert(alias.clone(), StructEntry { alias, name, canonical_name, fields });
		Ok(self)
	}

	/// Registers an interface under `alias`. `implementors` lists the
	/// aliases of structs already registered with [`Self::register`]
	/// that satisfy this interface — the Rust-side stand-in for the Go
	/// `structType.Implements(ifcType)` probe (spec §4.2
	/// `analyzeImplementors`), since trait implementation is a
	/// compile-time fact the caller already knows, not something this
	/// crate can discover by inspecting a value at runtime.
	pub fn register_interface<I: crate::reflect::InterfaceMarker>(
		&mut self,
		alias: impl Into<String>,
		name: impl Into<String>,
		implementors: impl IntoIterator<Item = impl Into<String>>,
	) -> GenResult<&mut Self> {
		let alias = alias.into();
		let name = name.into();
		let canonical_name = I::canonical_name();

		if self.structs.contains_key(&alias) || self.ifcs.contains_key(&alias) {
			return Err(GenError::DuplicateAlias { alias });
		}

		let mut seen = FxHashMap::default();
		let mut ordered = Vec::new();
		for implementor in implementors {
			let implementor = implementor.into();
			if seen.insert(implementor.clone(), ()).is_none() {
				ordered.push(implementor);
			}
		}
		if ordered.is_empty() {
			return Err(GenError::MissingImplementors { alias });
		}

		self.ifc_path_to_alias.insert(canonical_name, alias.clone());
		self.ifc_order.push(alias.clone());
		self.ifcs.insert(alias.clone(), InterfaceEntry { alias, name, canonical_name, implementors: ordered });
		Ok(self)
	}

	/// Runs `analyzeImplementors` (spec §4.2): validates that every
	/// declared implementor alias actually refers to a registered
	/// struct, then freezes the registry. Iteration order over the
	/// registration maps is normalized here — emission walks
	/// `struct_order`/`ifc_order` (insertion order) directly and sorts
	/// lexicographically wherever spec §4.4 "Emission determinism"
	/// requires it, so the output is byte-reproducible across runs.
	pub fn build(self) -> GenResult<Registry> {
		for ifc in self.ifcs.values() {
			for implementor in &ifc.implementors {
				if !self.structs.contains_key(implementor) {
					return Err(GenError::UnregisteredType {
						owner: ifc.canonical_name,
						field: "<implementor>",
						type_name: "",
					});
				}
			}
		}

		Ok(Registry {
			structs: self.structs,
			struct_order: self.struct_order,
			struct_path_to_alias: self.struct_path_to_alias,
			ifcs: self.ifcs,
			ifc_order: self.ifc_order,
			ifc_path_to_alias: self.ifc_path_to_alias,
			magic: self.magic,
			leaf_types: self.leaf_types,
			ignore_impl: self.ignore_impl,
		})
	}
}

/// The frozen result of a [`RegistryBuilder`]: process-scoped for a
/// single generation run, never mutated again (spec §3 "Lifecycle").
pub struct Registry {
	pub(crate) structs: FxHashMap<String, StructEntry>,
	pub(crate) struct_order: Vec<String>,
	pub(crate) struct_path_to_alias: FxHashMap<&'static str, String>,
	pub(crate) ifcs: FxHashMap<String, InterfaceEntry>,
	pub(crate) ifc_order: Vec<String>,
	pub(crate) ifc_path_to_alias: FxHashMap<&'static str, String>,
	pub(crate) magic: FxHashMap<String, u32>,
	pub(crate) leaf_types: FxHashMap<&'static str, String>,
	pub(crate) ignore_impl: FxHashMap<String, String>,
}

impl Registry {
	pub fn struct_entry(&self, alias: &str) -> Option<&StructEntry> {
		self.structs.get(alias)
	}

	pub fn interface_entry(&self, alias: &str) -> Option<&InterfaceEntry> {
		self.ifcs.get(alias)
	}

	pub fn magic_of(&self, alias: &str) -> Option<u32> {
		self.magic.get(alias).copied()
	}

	pub fn alias_for_struct_path(&self, canonical_name: &str) -> Option<&str> {
		self.struct_path_to_alias.get(canonical_name).map(String::as_str)
	}

	pub fn alias_for_interface_path(&self, canonical_name: &str) -> Option<&str> {
		self.ifc_path_to_alias.get(canonical_name).map(String::as_str)
	}

	pub fn leaf_short_name(&self, canonical_name: &str) -> Option<&str> {
		self.leaf_types.get(canonical_name).map(String::as_str)
	}

	pub fn is_ignored(&self, struct_alias: &str, ifc_alias: &str) -> bool {
		self.ignore_impl.get(struct_alias).map(String::as_str) == Some(ifc_alias)
	}

	/// Struct aliases in registration order (used when emission must
	/// follow "the entry list as supplied", spec §4.4).
	pub fn struct_aliases(&self) -> impl Iterator<Item = &str> {
		self.struct_order.iter().map(String::as_str)
	}

	pub fn interface_aliases(&self) -> impl Iterator<Item = &str> {
		self.ifc_order.iter().map(String::as_str)
	}

	/// All struct aliases, sorted lexicographically — spec §4.4's
	/// "Across hashmaps ... output is sorted lexicographically by alias
	/// or path before emission".
	pub fn sorted_struct_aliases(&self) -> Vec<&str> {
		let mut aliases: Vec<&str> = self.struct_order.iter().map(String::as_str).collect();
		aliases.sort_unstable();
		aliases
	}

	/// Every registered canonical path (struct and interface), sorted —
	/// feeds `GetSupportList` (spec §4.6 item 9).
	pub fn sorted_support_list(&self) -> Vec<&str> {
		let mut paths: Vec<&str> = self
			.structs
			.values()
			.map(|s| s.canonical_name)
			.chain(self.ifcs.values().map(|i| i.canonical_name))
			.collect();
		paths.sort_unstable();
		paths
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct A;
	impl Reflect for A {
		fn canonical_name() -> &'static str {
			"demo.A"
		}
		fn type_shape() -> TypeShape {
			TypeShape::Struct { canonical_name: "demo.A", fields: vec![] }
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

	#[test]
	fn magic_numbers_are_stable_and_in_range() {
		let m1 = magic_number("a", "demo.A");
		let m2 = magic_number("a", "demo.A");
		assert_eq!(m1, m2);
		assert!((MIN_MAGIC..=MAX_MAGIC).contains(&m1));
	}

	#[test]
	fn magic_collision_is_fatal() {
		// `alias || name` is what gets hashed, so two different splits
		// that concatenate to the same bytes ("ab"+"c" == "a"+"bc")
		// force an identical magic number without colliding on alias.
		let mut builder = RegistryBuilder::new();
		builder.register::<A>("ab", "c").unwrap();
		let err = builder.register::<B>("a", "bc").unwrap_err();
		assert!(matches!(err, GenError::MagicCollision { .. }));
	}

	#[test]
	fn duplicate_alias_is_rejected() {
		let mut builder = RegistryBuilder::new();
		builder.register::<A>("a", "demo.A").unwrap();
		let err = builder.register::<B>("a", "demo.B").unwrap_err();
		assert!(matches!(err, GenError::DuplicateAlias { .. }));
	}

	#[test]
	fn build_sorts_struct_aliases_for_deterministic_emission() {
		let mut builder = RegistryBuilder::new();
		builder.register::<B>("zeta", "demo.B").unwrap();
		builder.register::<A>("alpha", "demo.A").unwrap();
		let registry = builder.build().unwrap();
		assert_eq!(registry.sorted_struct_aliases(), vec!["alpha", "zeta"]);
		assert_eq!(registry.struct_aliases().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
	}
}
