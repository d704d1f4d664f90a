use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, ItemStruct, LitStr};

use crate::attrs::{doc_text, field_docs, require_named_fields, SchemaArgs};

pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match SchemaArgs::parse(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let item_struct = parse_macro_input!(item as ItemStruct);
    if let Err(err) = require_named_fields(&item_struct) {
        return err.to_compile_error().into();
    }

    let ident = &item_struct.ident;
    let type_name = LitStr::new(&ident.to_string(), Span::call_site());
    let schema_name = args.name.unwrap_or_else(|| type_name.clone());

    let description = args
        .description
        .or_else(|| doc_text(&item_struct.attrs).map(|text| LitStr::new(&text, Span::call_site())));
    let description = match description {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };

    let docs = field_docs(&item_struct).into_iter().map(|(field, doc)| {
        let field = LitStr::new(&field, Span::call_site());
        let doc = LitStr::new(&doc, Span::call_site());
        quote! { (#field, #doc) }
    });

    let expanded = quote! {
        #item_struct

        impl trip_planner_rs::schemas::CompletionSchema for #ident {
            fn schema() -> &'static trip_planner_rs::schemas::SchemaHandle {
                static HANDLE: std::sync::OnceLock<trip_planner_rs::schemas::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    trip_planner_rs::schemas::apply_doc_comments(
                        &mut root,
                        #schema_name,
                        #description,
                        &[#(#docs),*],
                    );
                    trip_planner_rs::schemas::SchemaHandle::from_root_schema(
                        #schema_name,
                        #type_name,
                        root,
                    )
                })
            }
        }
    };

    expanded.into()
}
