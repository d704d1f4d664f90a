use syn::{
    parse::Parser, punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Fields,
    ItemStruct, Lit, LitStr, MetaNameValue, Token,
};

/// Arguments accepted by `#[completion_schema(...)]`.
#[derive(Default)]
pub struct SchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

impl SchemaArgs {
    pub fn parse(attr: proc_macro::TokenStream) -> syn::Result<Self> {
        let mut args = SchemaArgs::default();
        if attr.is_empty() {
            return Ok(args);
        }

        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse(attr)?;
        for pair in pairs {
            let key = pair
                .path
                .get_ident()
                .ok_or_else(|| syn::Error::new_spanned(&pair.path, "expected `name` or `description`"))?
                .clone();

            let value = match &pair.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(value),
                    ..
                }) => value.clone(),
                other => {
                    return Err(syn::Error::new_spanned(other, "expected a string literal"));
                }
            };

            let slot = match key.to_string().as_str() {
                "name" => &mut args.name,
                "description" => &mut args.description,
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown argument `{other}`"),
                    ))
                }
            };

            if slot.replace(value).is_some() {
                return Err(syn::Error::new(key.span(), format!("`{key}` given twice")));
            }
        }

        Ok(args)
    }
}

pub fn require_named_fields(item: &ItemStruct) -> syn::Result<()> {
    if !matches!(item.fields, Fields::Named(_)) {
        return Err(syn::Error::new(
            item.struct_token.span(),
            "`#[completion_schema]` needs a struct with named fields",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "`#[completion_schema]` does not support generic structs",
        ));
    }
    Ok(())
}

/// Joined `///` text of an item, if any.
pub fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(MetaNameValue {
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(text),
                        ..
                    }),
                ..
            }) => Some(text.value().trim().to_string()),
            _ => None,
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// `(field name, doc text)` for every documented field.
///
/// Field names are reported the way serde will see them when the struct is
/// annotated with `#[serde(rename_all = "camelCase")]`, and an explicit
/// `#[serde(rename = "...")]` on a field wins.
pub fn field_docs(item: &ItemStruct) -> Vec<(String, String)> {
    let Fields::Named(fields) = &item.fields else {
        return Vec::new();
    };
    let camel = has_camel_case(&item.attrs);

    fields
        .named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            let doc = doc_text(&field.attrs)?;
            let name = serde_rename(&field.attrs).unwrap_or_else(|| {
                let raw = ident.to_string();
                if camel {
                    to_camel_case(&raw)
                } else {
                    raw
                }
            });
            Some((name, doc))
        })
        .collect()
}

fn serde_attr_pairs(attrs: &[Attribute]) -> Vec<MetaNameValue> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Meta, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .filter_map(|meta| match meta {
            syn::Meta::NameValue(pair) => Some(pair),
            _ => None,
        })
        .collect()
}

fn string_value(pair: &MetaNameValue, key: &str) -> Option<String> {
    if !pair.path.is_ident(key) {
        return None;
    }
    match &pair.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) => Some(text.value()),
        _ => None,
    }
}

fn has_camel_case(attrs: &[Attribute]) -> bool {
    serde_attr_pairs(attrs)
        .iter()
        .any(|pair| string_value(pair, "rename_all").as_deref() == Some("camelCase"))
}

fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    serde_attr_pairs(attrs)
        .iter()
        .find_map(|pair| string_value(pair, "rename"))
}

fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
