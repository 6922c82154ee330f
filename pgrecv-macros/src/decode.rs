use proc_macro::TokenStream;
use quote::quote;
use syn::*;

pub fn decode(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput { attrs: _, vis: _, ident, mut generics, data } = input;

    let (inner, access) = match data {
        Data::Struct(st) => match st.fields {
            Fields::Unnamed(FieldsUnnamed { unnamed, .. }) => {
                if unnamed.len() != 1 {
                    error!("only one field struct is supported")
                }
                let field = unnamed.into_iter().next().expect("one field");
                (field.ty, quote! { 0 })
            }
            Fields::Named(FieldsNamed { named, .. }) => {
                if named.len() != 1 {
                    error!("only one field struct is supported")
                }
                let field = named.into_iter().next().expect("one field");
                let name = field.ident;
                (field.ty, quote! { #name })
            },
            Fields::Unit => error!("unit struct have nothing to decode"),
        },
        Data::Enum(_) => error!("enum is not yet supported"),
        Data::Union(_) => error!("union is not supported"),
    };

    for ty in generics.type_params_mut() {
        ty.bounds.push(syn::parse_quote!(::pgrecv::DecodeInto));
    }

    let name = ident.to_string();
    let (g1, g2, g3) = generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #g1 ::pgrecv::PgType for #ident #g2 #g3 {
            const NAME: &'static str = #name;

            const NULLABLE: bool = <#inner as ::pgrecv::PgType>::NULLABLE;

            fn accepts(oids: &::pgrecv::OidMap, oid: ::pgrecv::Oid) -> bool {
                <#inner as ::pgrecv::PgType>::accepts(oids, oid)
            }

            fn accepts_array(oids: &::pgrecv::OidMap, oid: ::pgrecv::Oid) -> bool {
                <#inner as ::pgrecv::PgType>::accepts_array(oids, oid)
            }
        }

        #[automatically_derived]
        impl #g1 ::pgrecv::DecodeInto for #ident #g2 #g3 {
            const SIZE: ::core::option::Option<usize> = <#inner as ::pgrecv::DecodeInto>::SIZE;

            fn recv_into(
                &mut self,
                buf: &mut ::pgrecv::Cursor<'_>,
                len: usize,
                oids: &::pgrecv::OidMap,
            ) -> ::core::result::Result<(), ::pgrecv::DecodeError> {
                ::pgrecv::DecodeInto::recv_into(&mut self.#access, buf, len, oids)
            }

            fn recv_null(&mut self) -> ::core::result::Result<(), ::pgrecv::DecodeError> {
                ::pgrecv::DecodeInto::recv_null(&mut self.#access)
            }
        }
    }.into())
}
