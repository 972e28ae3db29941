//! [C4] Per-concrete emitter: for one registered struct, produces the
//! four synchronized Go routines spec §4.4/§4.5 requires —
//! `Encode<Alias>`, `Decode<Alias>`, `Rand<Alias>`, `DeepCopy<Alias>` —
//! by walking the struct's fields through [`crate::classify::classify`]
//! exactly as `generateStructFunc` walks a `reflect.Type`'s fields in
//! `examples/original_source/codon.go:496-572`, just replacing its flat
//! `lines = append(lines, ...)` accumulator with [`CodeWriter`].

use crate::classify::{classify, ElementPlan, FieldPlan, VarintKind};
use crate::emit::writer::CodeWriter;
use crate::error::GenResult;
use crate::reflect::{Kind, TypeShape};
use crate::registry::{Registry, StructEntry};
use crate::wire::{MAX_SLICE_LENGTH, MAX_STRING_LENGTH};

struct Field<'a> {
	name: &'a str,
	shape: &'a TypeShape,
	plan: FieldPlan,
}

/// Emits all four routines for `entry`, in the order spec §4.4 lists
/// them (Encode, Decode, Rand, DeepCopy).
pub fn emit_struct(entry: &StructEntry, registry: &Registry) -> GenResult<String> {
	let mut fields = Vec::with_capacity(entry.fields.len());
	for field in &entry.fields {
		let plan = classify(entry.canonical_name, field.name, &field.shape, registry)?;
		fields.push(Field { name: field.name, shape: &field.shape, plan });
	}

	let mut w = CodeWriter::new();
	emit_encode(&mut w, &entry.alias, &fields);
	w.blank();
	emit_decode(&mut w, &entry.alias, &fields, registry);
	w.blank();
	emit_rand(&mut w, &entry.alias, &fields, registry);
	w.blank();
	emit_deep_copy(&mut w, &entry.alias, &fields, registry);
	Ok(w.finish())
}

fn bytes_expr_for_encode(shape: &TypeShape, expr: &str) -> (&'static str, String) {
	match shape.kind() {
		Kind::String => ("codonEncodeString", expr.to_string()),
		Kind::Slice => ("codonEncodeByteSlice", expr.to_string()),
		Kind::Array => ("codonEncodeByteSlice", format!("{expr}[:]")),
		other => unreachable!("ElementPlan::Bytes paired with non-bytes shape {other:?}"),
	}
}

fn emit_encode_element(w: &mut CodeWriter, field_num: usize, expr: &str, shape: &TypeShape, element: &ElementPlan, tmp_id: usize) {
	match element {
		ElementPlan::Varint(VarintKind::Bool) => {
			w.line(format!("codonEncodeBool({field_num}, w, {expr})"));
		}
		ElementPlan::Varint(VarintKind::Int32) => {
			w.line(format!("codonEncodeVarint({field_num}, w, int64({expr}))"));
		}
		ElementPlan::Varint(VarintKind::Int64) => {
			w.line(format!("codonEncodeVarint({field_num}, w, {expr})"));
		}
		ElementPlan::Varint(VarintKind::Uint32) => {
			w.line(format!("codonEncodeUvarintField({field_num}, w, uint64({expr}))"));
		}
		ElementPlan::Varint(VarintKind::Uint64) => {
			w.line(format!("codonEncodeUvarintField({field_num}, w, {expr})"));
		}
		ElementPlan::Fixed8 { signed: true } => {
			w.line(format!("codonEncodeInt8({field_num}, w, {expr})"));
		}
		ElementPlan::Fixed8 { signed: false } => {
			w.line(format!("codonEncodeUint8({field_num}, w, {expr})"));
		}
		ElementPlan::Fixed16 { signed: true } => {
			w.line(format!("codonEncodeInt16({field_num}, w, {expr})"));
		}
		ElementPlan::Fixed16 { signed: false } => {
			w.line(format!("codonEncodeUint16({field_num}, w, {expr})"));
		}
		ElementPlan::Bytes => {
			let (func, arg) = bytes_expr_for_encode(shape, expr);
			w.line(format!("{func}({field_num}, w, {arg})"));
		}
		ElementPlan::NestedMessage { alias } => {
			let tmp = format!("tmp{tmp_id}");
			w.line(format!("{tmp} := make([]byte, 0, 64)"));
			w.line(format!("Encode{alias}(&{tmp}, {expr})"));
			w.line(format!("codonEncodeByteSlice({field_num}, w, {tmp})"));
		}
		ElementPlan::Leaf { short_name } => {
			let tmp = format!("tmp{tmp_id}");
			w.line(format!("{tmp} := make([]byte, 0, 64)"));
			w.line(format!("Encode{short_name}(&{tmp}, {expr})"));
			w.line(format!("codonEncodeByteSlice({field_num}, w, {tmp})"));
		}
		ElementPlan::Interface { alias } => {
			let tmp = format!("tmp{tmp_id}");
			w.line(format!("{tmp} := make([]byte, 0, 64)"));
			w.line(format!("Encode{alias}(&{tmp}, {expr})"));
			w.line(format!("codonEncodeByteSlice({field_num}, w, {tmp})"));
		}
	}
}

fn emit_encode_field(w: &mut CodeWriter, field_num: usize, expr: &str, shape: &TypeShape, plan: &FieldPlan, tmp_id: usize) {
	match plan {
		FieldPlan::Skip => {}
		FieldPlan::Scalar(element) => emit_encode_element(w, field_num, expr, shape, element, tmp_id),
		FieldPlan::Repeated(element) => {
			let TypeShape::Slice { element: inner_shape } = shape else {
				unreachable!("Repeated plan paired with non-slice shape");
			};
			w.block(format!("for _, e := range {expr}"), |w| {
				emit_encode_element(w, field_num, "e", inner_shape, element, tmp_id);
			});
		}
		FieldPlan::Pointer(inner_plan) => {
			let TypeShape::Pointer { element: inner_shape } = shape else {
				unreachable!("Pointer plan paired with non-pointer shape");
			};
			w.block(format!("if {expr} != nil"), |w| {
				emit_encode_field(w, field_num, &format!("(*{expr})"), inner_shape, inner_plan, tmp_id);
			});
		}
	}
}

fn emit_encode(w: &mut CodeWriter, alias: &str, fields: &[Field]) {
	w.block(format!("func Encode{alias}(w *[]byte, v {alias})"), |w| {
		for (i, field) in fields.iter().enumerate() {
			let field_num = i + 1;
			emit_encode_field(w, field_num, &format!("v.{}", field.name), field.shape, &field.plan, field_num);
		}
	});
}

fn go_elem_type(shape: &TypeShape, element: &ElementPlan) -> String {
	match element {
		ElementPlan::Varint(VarintKind::Bool) => "bool".to_string(),
		ElementPlan::Varint(VarintKind::Int32) => "int32".to_string(),
		ElementPlan::Varint(VarintKind::Int64) => "int64".to_string(),
		ElementPlan::Varint(VarintKind::Uint32) => "uint32".to_string(),
		ElementPlan::Varint(VarintKind::Uint64) => "uint64".to_string(),
		ElementPlan::Fixed8 { signed: true } => "int8".to_string(),
		ElementPlan::Fixed8 { signed: false } => "uint8".to_string(),
		ElementPlan::Fixed16 { signed: true } => "int16".to_string(),
		ElementPlan::Fixed16 { signed: false } => "uint16".to_string(),
		ElementPlan::Bytes => match shape.kind() {
			Kind::String => "string".to_string(),
			_ => "[]byte".to_string(),
		},
		ElementPlan::NestedMessage { alias } | ElementPlan::Interface { alias } => alias.clone(),
		ElementPlan::Leaf { short_name } => short_name.clone(),
	}
}

fn emit_decode_element(w: &mut CodeWriter, expr: &str, shape: &TypeShape, element: &ElementPlan, tmp_id: usize) {
	let tmp = format!("x{tmp_id}");
	match element {
		ElementPlan::Varint(VarintKind::Bool) => {
			w.line(format!("{tmp}, n, err := codonDecodeInt64(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = {tmp} != 0"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Varint(VarintKind::Int32) => {
			w.line(format!("{tmp}, n, err := codonDecodeInt64(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = int32({tmp})"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Varint(VarintKind::Int64) => {
			w.line(format!("{tmp}, n, err := codonDecodeInt64(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = {tmp}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Varint(VarintKind::Uint32) => {
			w.line(format!("{tmp}, n, err := codonDecodeUvarint(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = uint32({tmp})"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Varint(VarintKind::Uint64) => {
			w.line(format!("{tmp}, n, err := codonDecodeUvarint(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = {tmp}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Fixed8 { signed: true } => {
			w.line(format!("{tmp}, n, err := codonDecodeInt8(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = {tmp}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Fixed8 { signed: false } => {
			w.line(format!("{tmp}, n, err := codonDecodeUint8(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = {tmp}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Fixed16 { signed: true } => {
			w.line(format!("{tmp}, n, err := codonDecodeInt16(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = {tmp}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Fixed16 { signed: false } => {
			w.line(format!("{tmp}, n, err := codonDecodeUint16(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("{expr} = {tmp}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Bytes => match shape.kind() {
			Kind::String => {
				w.line(format!("{tmp}, n, err := codonGetString(bz)"));
				w.line("if err != nil { return v, 0, err }");
				w.line(format!("{expr} = {tmp}"));
				w.line("bz = bz[n:]; total += n");
			}
			Kind::Array => {
				w.line(format!("{tmp}, n, err := codonGetByteSlice(bz)"));
				w.line("if err != nil { return v, 0, err }");
				w.line(format!("copy({expr}[:], {tmp})"));
				w.line("bz = bz[n:]; total += n");
			}
			_ => {
				w.line(format!("{tmp}, n, err := codonGetByteSlice(bz)"));
				w.line("if err != nil { return v, 0, err }");
				w.line(format!("{expr} = append([]byte(nil), {tmp}...)"));
				w.line("bz = bz[n:]; total += n");
			}
		},
		ElementPlan::NestedMessage { alias } => {
			w.line(format!("{tmp}, n, err := codonGetByteSlice(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("nested{tmp_id}, consumed{tmp_id}, err := Decode{alias}({tmp})"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("if consumed{tmp_id} != len({tmp}) {{ return v, 0, fmt.Errorf(\"tagwire: nested body declared %d bytes but decoding consumed %d\", len({tmp}), consumed{tmp_id}) }}"));
			w.line(format!("{expr} = nested{tmp_id}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Leaf { short_name } => {
			w.line(format!("{tmp}, n, err := codonGetByteSlice(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("nested{tmp_id}, consumed{tmp_id}, err := Decode{short_name}({tmp})"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("if consumed{tmp_id} != len({tmp}) {{ return v, 0, fmt.Errorf(\"tagwire: nested body declared %d bytes but decoding consumed %d\", len({tmp}), consumed{tmp_id}) }}"));
			w.line(format!("{expr} = nested{tmp_id}"));
			w.line("bz = bz[n:]; total += n");
		}
		ElementPlan::Interface { alias } => {
			w.line(format!("{tmp}, n, err := codonGetByteSlice(bz)"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("decoded{tmp_id}, consumed{tmp_id}, err := Decode{alias}({tmp})"));
			w.line("if err != nil { return v, 0, err }");
			w.line(format!("if consumed{tmp_id} != len({tmp}) {{ return v, 0, fmt.Errorf(\"tagwire: nested body declared %d bytes but decoding consumed %d\", len({tmp}), consumed{tmp_id}) }}"));
			w.line(format!("{expr} = decoded{tmp_id}"));
			w.line("bz = bz[n:]; total += n");
		}
	}
}

fn emit_decode_field(w: &mut CodeWriter, expr: &str, shape: &TypeShape, plan: &FieldPlan, tmp_id: usize, registry: &Registry) {
	match plan {
		FieldPlan::Skip => {}
		FieldPlan::Scalar(element) => emit_decode_element(w, expr, shape, element, tmp_id),
		FieldPlan::Repeated(element) => {
			let TypeShape::Slice { element: inner_shape } = shape else {
				unreachable!("Repeated plan paired with non-slice shape");
			};
			let elem_ty = go_elem_type(inner_shape, element);
			w.line(format!("var elem{tmp_id} {elem_ty}"));
			emit_decode_element(w, &format!("elem{tmp_id}"), inner_shape, element, tmp_id);
			w.line(format!("{expr} = append({expr}, elem{tmp_id})"));
		}
		FieldPlan::Pointer(inner_plan) => {
			let TypeShape::Pointer { element: inner_shape } = shape else {
				unreachable!("Pointer plan paired with non-pointer shape");
			};
			let inner_expr = format!("(*{expr})");
			w.line(format!("{expr} = new({})", go_pointee_type(inner_shape, inner_plan, registry)));
			emit_decode_field(w, &inner_expr, inner_shape, inner_plan, tmp_id, registry);
		}
	}
}

fn go_pointee_type(shape: &TypeShape, plan: &FieldPlan, registry: &Registry) -> String {
	match plan {
		FieldPlan::Scalar(element) => go_elem_type(shape, element),
		FieldPlan::Pointer(inner) => {
			let TypeShape::Pointer { element } = shape else { unreachable!() };
			go_pointee_type(element, inner, registry)
		}
		_ => "interface{}".to_string(),
	}
}

fn emit_decode(w: &mut CodeWriter, alias: &str, fields: &[Field], registry: &Registry) {
	w.block(format!("func Decode{alias}(bz []byte) (v {alias}, total int, err error)"), |w| {
		w.block("for len(bz) > 0", |w| {
			w.line("fieldNum, _, n, err := codonDecodeTag(bz)");
			w.line("if err != nil { return v, 0, err }");
			w.line("bz = bz[n:]; total += n");
			w.block("switch fieldNum", |w| {
				for (i, field) in fields.iter().enumerate() {
					let field_num = i + 1;
					if matches!(field.plan, FieldPlan::Skip) {
						continue;
					}
					w.case(field_num.to_string(), |w| {
						let expr = format!("v.{}", field.name);
						emit_decode_field(w, &expr, field.shape, &field.plan, field_num, registry);
					});
				}
				w.default_branch(|w| {
					w.line("return v, 0, fmt.Errorf(\"tagwire: unknown field number %d\", fieldNum)");
				});
			});
		});
		w.line("return v, total, nil");
	});
}

fn rand_expr_for_element(element: &ElementPlan, shape: &TypeShape) -> String {
	match element {
		ElementPlan::Varint(VarintKind::Bool) => "r.GetBool()".to_string(),
		ElementPlan::Varint(VarintKind::Int32) => "r.GetInt32()".to_string(),
		ElementPlan::Varint(VarintKind::Int64) => "r.GetInt64()".to_string(),
		ElementPlan::Varint(VarintKind::Uint32) => "r.GetUint32()".to_string(),
		ElementPlan::Varint(VarintKind::Uint64) => "r.GetUint64()".to_string(),
		ElementPlan::Fixed8 { signed: true } => "r.GetInt8()".to_string(),
		ElementPlan::Fixed8 { signed: false } => "r.GetUint8()".to_string(),
		ElementPlan::Fixed16 { signed: true } => "r.GetInt16()".to_string(),
		ElementPlan::Fixed16 { signed: false } => "r.GetUint16()".to_string(),
		ElementPlan::Bytes => match shape.kind() {
			Kind::String => format!("r.GetString(int(1 + r.GetUint()%{}))", MAX_STRING_LENGTH - 1),
			_ => format!("r.GetBytes(int(1 + r.GetUint()%{}))", MAX_SLICE_LENGTH - 1),
		},
		ElementPlan::NestedMessage { alias } => format!("Rand{alias}(r)"),
		ElementPlan::Leaf { short_name } => format!("Rand{short_name}(r)"),
		ElementPlan::Interface { alias } => format!("Rand{alias}(r)"),
	}
}

fn emit_rand_field(w: &mut CodeWriter, expr: &str, shape: &TypeShape, plan: &FieldPlan, tmp_id: usize, registry: &Registry) {
	match plan {
		FieldPlan::Skip => {}
		FieldPlan::Scalar(element) => match element {
			ElementPlan::Bytes if shape.kind() == Kind::Array => {
				w.line(format!("copy({expr}[:], r.GetBytes(len({expr})))"));
			}
			_ => {
				w.line(format!("{expr} = {}", rand_expr_for_element(element, shape)));
			}
		},
		FieldPlan::Repeated(element) => {
			let TypeShape::Slice { element: inner_shape } = shape else {
				unreachable!("Repeated plan paired with non-slice shape");
			};
			let elem_ty = go_elem_type(inner_shape, element);
			let count = format!("count{tmp_id}");
			w.line(format!("{count} := int(1 + r.GetUint()%{})", MAX_SLICE_LENGTH - 1));
			w.line(format!("{expr} = make([]{elem_ty}, 0, {count})"));
			w.block(format!("for i := 0; i < {count}; i++"), |w| {
				w.line(format!("{expr} = append({expr}, {})", rand_expr_for_element(element, inner_shape)));
			});
		}
		FieldPlan::Pointer(inner_plan) => {
			let TypeShape::Pointer { element: inner_shape } = shape else {
				unreachable!("Pointer plan paired with non-pointer shape");
			};
			w.line(format!("{expr} = new({})", go_pointee_type(inner_shape, inner_plan, registry)));
			emit_rand_field(w, &format!("(*{expr})"), inner_shape, inner_plan, tmp_id, registry);
		}
	}
}

fn emit_rand(w: &mut CodeWriter, alias: &str, fields: &[Field], registry: &Registry) {
	w.block(format!("func Rand{alias}(r RandSrc) {alias}"), |w| {
		w.line(format!("var v {alias}"));
		for (i, field) in fields.iter().enumerate() {
			let field_num = i + 1;
			let expr = format!("v.{}", field.name);
			emit_rand_field(w, &expr, field.shape, &field.plan, field_num, registry);
		}
		w.line("return v");
	});
}

/// `dst` and `src` are separate expressions (`out.Field` / `v.Field`)
/// since deep-copy must never alias the source's backing arrays.
fn emit_deep_copy_field(w: &mut CodeWriter, dst: &str, src: &str, shape: &TypeShape, plan: &FieldPlan, tmp_id: usize, registry: &Registry) {
	match plan {
		FieldPlan::Skip => {}
		FieldPlan::Scalar(element) => match element {
			ElementPlan::Bytes if matches!(shape.kind(), Kind::Slice) => {
				w.line(format!("{dst} = append([]byte(nil), {src}...)"));
			}
			ElementPlan::Interface { alias } => {
				w.line(format!("{dst} = DeepCopy{alias}({src})"));
			}
			ElementPlan::NestedMessage { alias } => {
				w.line(format!("{dst} = DeepCopy{alias}({src})"));
			}
			ElementPlan::Leaf { short_name } => {
				w.line(format!("{dst} = DeepCopy{short_name}({src})"));
			}
			_ => {}
		},
		FieldPlan::Repeated(element) => {
			let TypeShape::Slice { element: inner_shape } = shape else {
				unreachable!("Repeated plan paired with non-slice shape");
			};
			let elem_ty = go_elem_type(inner_shape, element);
			let i = format!("i{tmp_id}");
			w.line(format!("{dst} = make([]{elem_ty}, len({src}))"));
			match element {
				ElementPlan::Interface { alias } => {
					w.block(format!("for {i} := range {src}"), |w| {
						w.line(format!("{dst}[{i}] = DeepCopy{alias}({src}[{i}])"));
					});
				}
				ElementPlan::NestedMessage { alias } => {
					w.block(format!("for {i} := range {src}"), |w| {
						w.line(format!("{dst}[{i}] = DeepCopy{alias}({src}[{i}])"));
					});
				}
				ElementPlan::Leaf { short_name } => {
					w.block(format!("for {i} := range {src}"), |w| {
						w.line(format!("{dst}[{i}] = DeepCopy{short_name}({src}[{i}])"));
					});
				}
				ElementPlan::Bytes => {
					w.block(format!("for {i} := range {src}"), |w| {
						w.line(format!("{dst}[{i}] = append([]byte(nil), {src}[{i}]...)"));
					});
				}
				_ => w.line(format!("copy({dst}, {src})")),
			}
		}
		FieldPlan::Pointer(inner_plan) => {
			let TypeShape::Pointer { element: inner_shape } = shape else {
				unreachable!("Pointer plan paired with non-pointer shape");
			};
			w.block(format!("if {src} != nil"), |w| {
				w.line(format!("{dst} = new({})", go_pointee_type(inner_shape, inner_plan, registry)));
				emit_deep_copy_field(w, &format!("(*{dst})"), &format!("(*{src})"), inner_shape, inner_plan, tmp_id, registry);
			});
		}
	}
}

fn emit_deep_copy(w: &mut CodeWriter, alias: &str, fields: &[Field], registry: &Registry) {
	w.block(format!("func DeepCopy{alias}(v {alias}) {alias}"), |w| {
		w.line("out := v");
		for (i, field) in fields.iter().enumerate() {
			let field_num = i + 1;
			let dst = format!("out.{}", field.name);
			let src = format!("v.{}", field.name);
			emit_deep_copy_field(w, &dst, &src, field.shape, &field.plan, field_num, registry);
		}
		w.line("return out");
	});
}
