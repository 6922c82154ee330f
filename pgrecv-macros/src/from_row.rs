use proc_macro::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, *};

pub fn from_row(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput { attrs: _, vis: _, ident, mut generics, data } = input;
    let Data::Struct(data) = data else {
        error!("only struct are currently supported")
    };

    let body = match data.fields {
        Fields::Named(FieldsNamed { named, .. }) => {
            let fields = named
                .iter()
                .map(|field| {
                    let id = field.ident.as_ref().expect("named field");
                    let column = column_name(field)?.unwrap_or_else(|| id.unraw().to_string());
                    Ok(quote! { (#column, &mut self.#id as &mut dyn ::pgrecv::row::RecvValue), })
                })
                .collect::<Result<Vec<_>>>()?;
            quote! {
                ::pgrecv::row::recv_named(row, oids, <Self as ::pgrecv::row::FromRow>::type_name, &mut [#(#fields)*])
            }
        }
        Fields::Unnamed(FieldsUnnamed { unnamed, .. }) => {
            let fields = (0..unnamed.len())
                .map(Index::from)
                .map(|i| quote! { &mut self.#i as &mut dyn ::pgrecv::row::RecvValue, });
            quote! {
                ::pgrecv::row::recv_positional(row, oids, <Self as ::pgrecv::row::FromRow>::type_name, &mut [#(#fields)*])
            }
        }
        Fields::Unit => quote! {
            ::pgrecv::row::recv_positional(row, oids, <Self as ::pgrecv::row::FromRow>::type_name, &mut [])
        },
    };

    for ty in generics.type_params_mut() {
        ty.bounds.push(parse_quote!(::pgrecv::DecodeInto));
    }

    let name = ident.to_string();
    let (g1, g2, g3) = generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #g1 ::pgrecv::row::FromRow for #ident #g2 #g3 {
            const NAME: &'static str = #name;

            fn recv_row(
                &mut self,
                row: &::pgrecv::row::WireRow<'_>,
                oids: &::pgrecv::postgres::OidMap,
            ) -> ::core::result::Result<(), ::pgrecv::DecodeError> {
                #body
            }
        }
    }.into())
}

/// `#[row(rename = "column")]`
fn column_name(field: &Field) -> Result<Option<String>> {
    let mut rename = None;
    for attr in field.attrs.iter().filter(|e| e.path().is_ident("row")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                rename = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("possible value are: `rename = \"column\"`"))
            }
        })?;
    }
    Ok(rename)
}
