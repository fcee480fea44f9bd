#![doc = include_str!("../README.md")]

extern crate proc_macro;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, Ident, Index, parse_macro_input};

fn codec_impl(
    name: &Ident,
    generics: &syn::Generics,
    size_body: TokenStream2,
    pack_body: TokenStream2,
    unpack_body: TokenStream2,
) -> TokenStream2 {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    quote! {
        impl #impl_generics nfspry_types::xdr::Pack for #name #ty_generics
        #where_clause {
            fn packed_size(&self) -> usize {
                #size_body
            }

            fn pack(&self, out: &mut impl std::io::Write) -> nfspry_types::xdr::Result<usize> {
                use nfspry_types::xdr::Pack;
                #pack_body
            }
        }
        impl #impl_generics nfspry_types::xdr::Unpack for #name #ty_generics
        #where_clause {
            fn unpack(input: &mut impl std::io::Read) -> nfspry_types::xdr::Result<(Self, usize)> {
                use nfspry_types::xdr::Unpack;
                #unpack_body
            }
        }
    }
}

fn struct_impl(name: &Ident, generics: &syn::Generics, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let idents: Vec<Ident> = named
                .named
                .iter()
                .map(|f| f.ident.clone().expect("named field has an identifier"))
                .collect();
            let size_fields = idents.iter();
            let pack_fields = idents.iter();
            let unpack_fields = idents.iter();
            let construct_fields = idents.iter();

            let size_body = quote! {
                let mut total = 0;
                #(total += nfspry_types::xdr::Pack::packed_size(&self.#size_fields);)*
                total
            };
            let pack_body = quote! {
                let mut written = 0;
                #(written += self.#pack_fields.pack(out)?;)*
                Ok(written)
            };
            let unpack_body = quote! {
                let mut read = 0;
                #(
                    let (#unpack_fields, n) = nfspry_types::xdr::Unpack::unpack(input)?;
                    read += n;
                )*
                Ok((Self { #(#construct_fields,)* }, read))
            };
            codec_impl(name, generics, size_body, pack_body, unpack_body)
        }
        Fields::Unnamed(unnamed) => {
            let indices: Vec<Index> = (0..unnamed.unnamed.len()).map(Index::from).collect();
            let vars: Vec<Ident> = (0..unnamed.unnamed.len())
                .map(|i| Ident::new(&format!("field_{i}"), proc_macro2::Span::call_site()))
                .collect();
            let size_fields = indices.iter();
            let pack_fields = indices.iter();
            let unpack_fields = vars.iter();
            let construct_fields = vars.iter();

            let size_body = quote! {
                let mut total = 0;
                #(total += nfspry_types::xdr::Pack::packed_size(&self.#size_fields);)*
                total
            };
            let pack_body = quote! {
                let mut written = 0;
                #(written += self.#pack_fields.pack(out)?;)*
                Ok(written)
            };
            let unpack_body = quote! {
                let mut read = 0;
                #(
                    let (#unpack_fields, n) = nfspry_types::xdr::Unpack::unpack(input)?;
                    read += n;
                )*
                Ok((Self(#(#construct_fields),*), read))
            };
            codec_impl(name, generics, size_body, pack_body, unpack_body)
        }
        Fields::Unit => codec_impl(
            name,
            generics,
            quote! { 0 },
            quote! { Ok(0) },
            quote! { Ok((Self, 0)) },
        ),
    }
}

fn enum_impl(name: &Ident, generics: &syn::Generics, data: &DataEnum) -> TokenStream2 {
    for variant in &data.variants {
        assert!(
            matches!(variant.fields, Fields::Unit),
            "XdrCodec enums must have unit variants only; implement unions by hand"
        );
    }

    let pack_variants = data.variants.iter().map(|v| {
        let ident = &v.ident;
        quote! { Self::#ident => (*self as u32).pack(out), }
    });
    let unpack_variants = data.variants.iter().map(|v| {
        let ident = &v.ident;
        quote! { x if x == Self::#ident as u32 => Ok(Self::#ident), }
    });

    let size_body = quote! { 4 };
    let pack_body = quote! {
        match self {
            #(#pack_variants)*
        }
    };
    let unpack_body = quote! {
        let (tag, read) = u32::unpack(input)?;
        let value = match tag {
            #(#unpack_variants)*
            _ => Err(nfspry_types::xdr::Error::InvalidEnumValue(tag)),
        }?;
        Ok((value, read))
    };
    codec_impl(name, generics, size_body, pack_body, unpack_body)
}

/// Implements the `Pack` and `Unpack` XDR traits.
///
/// Structs pack their fields in declaration order. Enums must consist of
/// unit variants with explicit `u32` discriminants and pack as a single
/// XDR enum word.
#[proc_macro_derive(XdrCodec)]
pub fn derive_xdr_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = &input.generics;

    let expanded = match &input.data {
        Data::Struct(data) => struct_impl(name, generics, &data.fields),
        Data::Enum(data) => enum_impl(name, generics, data),
        Data::Union(_) => panic!("XdrCodec can only be derived for structs and enums"),
    };

    expanded.into()
}
