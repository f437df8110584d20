use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub fn expand(input: ItemStruct) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let derives_debug = input.attrs.iter().filter(|attr| attr.path().is_ident("derive")).any(|attr| {
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.segments.last().is_some_and(|seg| seg.ident == "Debug") {
                found = true;
            }
            Ok(())
        });
        found
    });
    let debug = if derives_debug { quote! {} } else { quote! { #[derive(Debug)] } };

    quote! {
        #debug
        #input

        #[automatically_derived]
        impl #impl_generics ::modkit_kernel::domain::registry::Component for #ident #ty_generics #where_clause {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::sync::Arc<dyn ::std::any::Any + Send + Sync> {
                self
            }
        }
    }
}
