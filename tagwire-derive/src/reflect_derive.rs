use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field};

/// Builds a `Reflect::type_shape()` body by walking the struct's fields
/// in declaration order, exactly as `TableDerive::derive` walks a
/// `DeriveInput`'s fields to decide how to read each one
/// (`cilium-derive/src/table.rs`) — here each field recurses into its
/// own `Reflect::type_shape()` instead of emitting a stream read.
pub fn derive(tokens: proc_macro::TokenStream) -> TokenStream {
	let DeriveInput { ident, data, generics, .. } = syn::parse(tokens).unwrap();

	if !generics.params.is_empty() {
		panic!("`#[derive(Reflect)]` does not support generic types");
	}

	let data = match data {
		Data::Struct(data) => data,
		Data::Enum(_) => panic!("`#[derive(Reflect)]` does not support enums; model an interface via `Catalogue::interface` and `Ifc<_>` fields instead"),
		Data::Union(_) => panic!("`#[derive(Reflect)]` does not support unions"),
	};

	let fields = data.fields.iter().enumerate().map(|(i, Field { ident: field_ident, ty, .. })| {
		let name = match field_ident {
			Some(ident) => ident.to_string(),
			None => i.to_string(),
		};
		quote! {
			tagwire::reflect::FieldShape {
				name: #name,
				shape: <#ty as tagwire::reflect::Reflect>::type_shape(),
			}
		}
	});

	let canonical_name = format!("{}", ident);
	let type_name = ident;

	quote! {
		impl tagwire::reflect::Reflect for #type_name {
			fn canonical_name() -> &'static str {
				concat!(module_path!(), ".", #canonical_name)
			}

			fn type_shape() -> tagwire::reflect::TypeShape {
				tagwire::reflect::TypeShape::Struct {
					canonical_name: <Self as tagwire::reflect::Reflect>::canonical_name(),
					fields: vec![#(#fields),*],
				}
			}
		}
	}
}
