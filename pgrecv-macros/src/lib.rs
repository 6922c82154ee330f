use proc_macro::TokenStream;
use syn::DeriveInput;

macro_rules! error {
    ($($tt:tt)*) => {
        return Err(syn::Error::new(proc_macro::Span::call_site().into(), format!($($tt)*)))
    };
}

mod from_row;
mod decode;

/// Derive `FromRow`.
///
/// Named struct fields are matched against columns by name, use
/// `#[row(rename = "column")]` when they differ. Tuple struct fields are
/// matched by position.
#[proc_macro_derive(FromRow, attributes(row))]
pub fn from_row(input: TokenStream) -> TokenStream {
    match from_row::from_row(syn::parse_macro_input!(input as DeriveInput)) {
        Ok(ok) => ok,
        Err(err) => err.into_compile_error().into(),
    }
}

/// Derive `PgType` and `DecodeInto` for single field struct, delegating to
/// the inner field.
#[proc_macro_derive(Decode)]
pub fn decode(input: TokenStream) -> TokenStream {
    match decode::decode(syn::parse_macro_input!(input as DeriveInput)) {
        Ok(ok) => ok,
        Err(err) => err.into_compile_error().into(),
    }
}
