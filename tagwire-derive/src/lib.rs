mod reflect_derive;

use proc_macro::TokenStream;

#[proc_macro_derive(Reflect)]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	reflect_derive::derive(input).into()
}
