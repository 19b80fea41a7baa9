use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{DataStruct, DeriveInput, Fields};

/// Generate implementation of `FromRow` trait.
pub fn from_row(
    DeriveInput {
        ident,
        data,
        generics,
        ..
    }: DeriveInput,
) -> TokenStream {
    let syn::Data::Struct(struct_data) = data else {
        panic!("Cannot derive FromRow for {ident}; it can only be derived for structs");
    };

    let decodings = impl_decodings(&struct_data);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote::quote! {
        impl #impl_generics ::typed_cql::prelude::FromRow for #ident #ty_generics #where_clause {
            fn from_row(
                row: &::typed_cql::prelude::Row,
            ) -> Result<Self, ::typed_cql::prelude::DeserializationError> {
                Ok(Self {
                    #decodings
                })
            }
        }
    }
    .into()
}

/// Generate one `field: row.column("field")?` initializer per named field.
fn impl_decodings(struct_data: &DataStruct) -> TokenStream2 {
    let Fields::Named(fields) = &struct_data.fields else {
        panic!("Cannot derive FromRow for structs with unnamed fields");
    };

    let items = fields.named.iter().map(|field| {
        let field_name = field.ident.as_ref().expect("named field");
        let column = field_name.to_string();

        quote::quote! {
            #field_name: row.column(#column)?
        }
    });

    quote::quote! { #(#items),* }
}
