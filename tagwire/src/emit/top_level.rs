//! [C6] Top-level emitter: the handful of functions that operate over
//! *every* registered type at once rather than one entry at a time —
//! `EncodeAny`/`DecodeAny` (spec §4.6), `getMagicNum`/`getMagicNumOfVar`,
//! `AssignIfcPtrFromStruct`, `RandAny`/`DeepCopyAny`, and
//! `GetSupportList`.
//!
//! Grounded in `generateIfcEncodeFunc`/`generateIfcDecodeFunc` (used
//! here for the *universal*, not per-interface, dispatch — see
//! `crate::emit::interface` for the scoped variant),
//! `generateMagicBytesFunc`, `generateIfcRandFunc`/
//! `generateIfcDeepCopyFunc`, and `generateSupportListFunc`
//! (`examples/original_source/codon.go:276-421,423-495`).

use crate::emit::writer::CodeWriter;
use crate::registry::Registry;

/// `EncodeAny`/`DecodeAny`: a single magic-tagged envelope switch over
/// every registered struct, independent of which interface (if any)
/// the value is destined for. Used when a slot's static type is
/// `interface{}` rather than one specific registered interface.
fn emit_encode_any(w: &mut CodeWriter, registry: &Registry) {
	w.block("func EncodeAny(w *[]byte, v interface{})", |w| {
		w.block("switch v := v.(type)", |w| {
			for alias in registry.sorted_struct_aliases() {
				let magic = registry.magic_of(alias).expect("sorted_struct_aliases only returns registered aliases");
				w.case(alias, |w| {
					w.line("tmp := make([]byte, 0, 64)");
					w.line(format!("Encode{alias}(&tmp, v)"));
					w.line(format!("codonEncodeByteSlice({magic}, w, tmp)"));
				});
				w.case(format!("*{alias}"), |w| {
					w.line("tmp := make([]byte, 0, 64)");
					w.line(format!("Encode{alias}(&tmp, *v)"));
					w.line(format!("codonEncodeByteSlice({magic}, w, tmp)"));
				});
			}
			w.default_branch(|w| {
				w.line("panic(fmt.Sprintf(\"tagwire: %T is not a registered type\", v))");
			});
		});
	});
}

fn emit_decode_any(w: &mut CodeWriter, registry: &Registry) {
	w.block("func DecodeAny(bz []byte) (v interface{}, total int, err error)", |w| {
		w.line("rawTag, tagN, err := codonDecodeUvarint(bz)");
		w.line("if err != nil { return nil, 0, err }");
		w.line("body, bodyN, err := codonGetByteSlice(bz[tagN:])");
		w.line("if err != nil { return nil, 0, err }");
		w.block("switch int(rawTag >> 3)", |w| {
			for alias in registry.sorted_struct_aliases() {
				let magic = registry.magic_of(alias).expect("sorted_struct_aliases only returns registered aliases");
				w.case(magic.to_string(), |w| {
					w.line(format!("inner, _, err := Decode{alias}(body)"));
					w.line("if err != nil { return nil, 0, err }");
					w.line("return inner, tagN + bodyN, nil");
				});
			}
			w.default_branch(|w| {
				w.line("return nil, 0, fmt.Errorf(\"tagwire: unknown magic number %d\", rawTag>>3)");
			});
		});
		w.line("return v, total, nil");
	});
}

/// `getMagicNum`/`getMagicNumOfVar`: the magic-number lookup by alias
/// and by a live value's dynamic type, ported from
/// `generateMagicBytesFunc`'s pair of accessors, adapted from a
/// 4-byte array return to a single `uint32` (spec §9, format-variant
/// decision). An unknown alias is a generator/registry invariant
/// violation, not a recoverable condition, so both panic rather than
/// report `ok=false`.
fn emit_magic_accessors(w: &mut CodeWriter, registry: &Registry) {
	w.block("func getMagicNum(alias string) uint32", |w| {
		w.block("switch alias", |w| {
			for alias in registry.sorted_struct_aliases() {
				let magic = registry.magic_of(alias).expect("sorted_struct_aliases only returns registered aliases");
				w.case(format!("\"{alias}\""), |w| {
					w.line(format!("return {magic}"));
				});
			}
			w.default_branch(|w| {
				w.line("panic(fmt.Sprintf(\"tagwire: %q is not a registered alias\", alias))");
			});
		});
	});
	w.blank();
	w.block("func getMagicNumOfVar(v interface{}) uint32", |w| {
		w.block("switch v.(type)", |w| {
			for alias in registry.sorted_struct_aliases() {
				let magic = registry.magic_of(alias).expect("sorted_struct_aliases only returns registered aliases");
				w.case(format!("*{alias}, {alias}"), |w| {
					w.line(format!("return {magic}"));
				});
			}
			w.default_branch(|w| {
				w.line("panic(fmt.Sprintf(\"tagwire: %T is not a registered type\", v))");
			});
		});
	});
}

/// `AssignIfcPtrFromStruct`: for every legal (interface, implementor)
/// pair not suppressed by `ignore_impl`, assigns a `*interface{}` slot
/// from a concrete value — the tag-based variant's counterpart to a
/// reflective `reflect.Value.Set`, new relative to the fixed-prefix
/// variant (spec §9).
fn emit_assign_ifc_ptr(w: &mut CodeWriter, registry: &Registry) {
	w.block("func AssignIfcPtrFromStruct(ifcPtr interface{}, structV interface{})", |w| {
		w.block("switch ptr := ifcPtr.(type)", |w| {
			for ifc_alias in registry.interface_aliases() {
				let entry = registry.interface_entry(ifc_alias).expect("interface_aliases only returns registered aliases");
				w.case(format!("*{ifc_alias}"), |w| {
					w.block("switch v := structV.(type)", |w| {
						for implementor in &entry.implementors {
							if registry.is_ignored(implementor, ifc_alias) {
								continue;
							}
							w.case(implementor.as_str(), |w| {
								w.line("*ptr = v");
							});
						}
						w.default_branch(|w| {
							w.line(format!("panic(fmt.Sprintf(\"tagwire: %T does not implement {ifc_alias}\", structV))"));
						});
					});
				});
			}
			w.default_branch(|w| {
				w.line("panic(\"tagwire: AssignIfcPtrFromStruct called with a non-interface pointer\")");
			});
		});
	});
}

fn emit_rand_any(w: &mut CodeWriter, registry: &Registry) {
	let aliases = registry.sorted_struct_aliases();
	w.block("func RandAny(r RandSrc) interface{}", |w| {
		w.block(format!("switch r.GetUint32() % {}", aliases.len()), |w| {
			for (i, alias) in aliases.iter().enumerate() {
				w.case(i.to_string(), |w| {
					w.line(format!("return Rand{alias}(r)"));
				});
			}
			w.default_branch(|w| {
				w.line(format!("return Rand{}(r)", aliases.first().copied().unwrap_or("struct{}{}")));
			});
		});
	});
}

fn emit_deep_copy_any(w: &mut CodeWriter, registry: &Registry) {
	w.block("func DeepCopyAny(v interface{}) interface{}", |w| {
		w.block("switch v := v.(type)", |w| {
			for alias in registry.sorted_struct_aliases() {
				w.case(alias, |w| {
					w.line(format!("return DeepCopy{alias}(v)"));
				});
				w.case(format!("*{alias}"), |w| {
					w.line(format!("cp := DeepCopy{alias}(*v)"));
					w.line("return &cp");
				});
			}
			w.default_branch(|w| {
				w.line("return v");
			});
		});
	});
}

/// `GetSupportList`: every registered canonical path, sorted — lets a
/// host program assert a catalogue covers the types it expects,
/// ported from `generateSupportListFunc`.
fn emit_support_list(w: &mut CodeWriter, registry: &Registry) {
	w.block("func GetSupportList() []string", |w| {
		w.line("return []string{");
		for path in registry.sorted_support_list() {
			w.line(format!("\t\"{path}\","));
		}
		w.line("}");
	});
}

/// Emits every top-level function in the order spec §4.6 lists them.
pub fn emit_top_level(registry: &Registry) -> String {
	let mut w = CodeWriter::new();
	emit_encode_any(&mut w, registry);
	w.blank();
	emit_decode_any(&mut w, registry);
	w.blank();
	emit_magic_accessors(&mut w, registry);
	w.blank();
	emit_assign_ifc_ptr(&mut w, registry);
	w.blank();
	emit_rand_any(&mut w, registry);
	w.blank();
	emit_deep_copy_any(&mut w, registry);
	w.blank();
	emit_support_list(&mut w, registry);
	w.finish()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reflect::{Reflect, TypeShape};
	use crate::registry::RegistryBuilder;

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

	struct IfcMarker;
	impl crate::reflect::InterfaceMarker for IfcMarker {
		fn canonical_name() -> &'static str {
			"demo.Ifc"
		}
	}

	fn registry() -> Registry {
		let mut builder = RegistryBuilder::new();
		builder.register::<A>("A", "demo.A").unwrap();
		builder.register::<B>("B", "demo.B").unwrap();
		builder.register_interface::<IfcMarker>("Ifc", "demo.Ifc", vec!["A", "B"]).unwrap();
		builder.build().unwrap()
	}

	#[test]
	fn emits_every_top_level_function() {
		let text = emit_top_level(&registry());
		for symbol in [
			"func EncodeAny(",
			"func DecodeAny(",
			"func getMagicNum(",
			"func getMagicNumOfVar(",
			"func AssignIfcPtrFromStruct(",
			"func RandAny(",
			"func DeepCopyAny(",
			"func GetSupportList(",
		] {
			assert!(text.contains(symbol), "missing {symbol}");
		}
	}

	#[test]
	fn support_list_is_sorted_and_covers_every_registration() {
		let text = emit_top_level(&registry());
		assert!(text.contains("\"demo.A\""));
		assert!(text.contains("\"demo.B\""));
		assert!(text.contains("\"demo.Ifc\""));
	}

	#[test]
	fn assign_ifc_ptr_covers_every_implementor() {
		let text = emit_top_level(&registry());
		assert!(text.contains("case *Ifc:"));
		assert!(text.contains("case A:"));
		assert!(text.contains("case B:"));
	}

	#[test]
	fn encode_any_also_switches_over_pointer_receivers() {
		let text = emit_top_level(&registry());
		assert!(text.contains("case *A:"));
		assert!(text.contains("case *B:"));
		assert!(text.contains("EncodeA(&tmp, *v)"));
	}

	#[test]
	fn magic_accessors_match_both_value_and_pointer_kinds_and_panic_on_unknown() {
		let text = emit_top_level(&registry());
		assert!(text.contains("func getMagicNum(alias string) uint32"));
		assert!(text.contains("func getMagicNumOfVar(v interface{}) uint32"));
		assert!(text.contains("case *A, A:"));
		assert!(text.contains("case *B, B:"));
		assert!(text.contains("panic(fmt.Sprintf(\"tagwire: %q is not a registered alias\", alias))"));
		assert!(text.contains("panic(fmt.Sprintf(\"tagwire: %T is not a registered type\", v))"));
	}

	#[test]
	fn deep_copy_any_also_switches_over_pointer_receivers() {
		let text = emit_top_level(&registry());
		assert!(text.contains("case *A:"));
		assert!(text.contains("cp := DeepCopyA(*v)"));
		assert!(text.contains("return &cp"));
	}
}
