/*!
Procedural macros for apidoc schema descriptions.

`#[derive(Describe)]` implements `apidoc_schema::Describe` for structs and
enums. Field tags come from `#[describe(key = "value")]` attributes, with
`#[serde(...)]` attributes filling in the `json` tag when none is given.
*/

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DataEnum, DeriveInput, Expr, ExprLit,
    Fields, Generics, Lit, LitStr, Meta, MetaNameValue, Token,
};

/// Derive macro implementing `Describe` for structs and enums
#[proc_macro_derive(Describe, attributes(describe, serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    generate_describe_impl(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Generate the `Describe` implementation (and `EnumValues` for unit enums)
fn generate_describe_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let ident = &input.ident;
    let container = ContainerAttrs::parse(&input.attrs)?;
    let serde = SerdeAttrs::parse(&input.attrs);
    let type_name = type_name_tokens(input, &container);
    let module_path = match &container.module {
        Some(module) => quote! { #module },
        None => quote! { ::core::module_path!() },
    };

    let generics = add_describe_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let (body, extra) = match &input.data {
        Data::Struct(data_struct) => (
            generate_struct_body(&data_struct.fields, &type_name, &module_path, &serde)?,
            None,
        ),
        Data::Enum(data_enum) => generate_enum_body(input, data_enum, &type_name, &module_path, &serde),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Describe cannot be derived for union types",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::apidoc_schema::Describe for #ident #ty_generics #where_clause {
            fn describe() -> ::apidoc_schema::TypeDescriptor {
                #body
            }
        }

        #extra
    })
}

/// Type name expression, generic-aware unless overridden
fn type_name_tokens(input: &DeriveInput, container: &ContainerAttrs) -> TokenStream2 {
    if let Some(name) = &container.name {
        return quote! { #name };
    }

    let base = input.ident.unraw().to_string();
    let params: Vec<_> = input.generics.type_params().map(|param| &param.ident).collect();
    if params.is_empty() {
        quote! { #base }
    } else {
        quote! {
            ::apidoc_schema::generic_type_name(
                #base,
                &[#(::core::any::type_name::<#params>()),*],
            )
        }
    }
}

fn add_describe_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::apidoc_schema::Describe));
    }
    generics
}

fn generate_struct_body(
    fields: &Fields,
    type_name: &TokenStream2,
    module_path: &TokenStream2,
    serde: &SerdeAttrs,
) -> Result<TokenStream2, syn::Error> {
    match fields {
        Fields::Named(named_fields) => {
            let mut descriptors = Vec::new();
            for field in &named_fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let field_name = ident.unraw().to_string();
                let field_type = &field.ty;

                let mut tags = FieldTags::parse(&field.attrs)?;
                if !tags.has("json") {
                    if let Some(json) = json_tag_from_serde(&field_name, &field.attrs, serde) {
                        tags.push("json", json);
                    }
                }
                let with_tags = tags.entries.iter().map(|(key, value)| {
                    quote! { .with_tag(#key, #value) }
                });

                descriptors.push(quote! {
                    ::apidoc_schema::FieldDescriptor::new(
                        #field_name,
                        <#field_type as ::apidoc_schema::Describe>::describe,
                    )
                    #(#with_tags)*
                });
            }

            Ok(quote! {
                ::apidoc_schema::TypeDescriptor::structure(
                    #type_name,
                    #module_path,
                    ::std::vec![#(#descriptors),*],
                )
            })
        }
        Fields::Unnamed(unnamed_fields) if unnamed_fields.unnamed.len() == 1 => {
            // Newtype: the inner shape under the outer name
            let inner = &unnamed_fields.unnamed[0].ty;
            Ok(quote! {
                <#inner as ::apidoc_schema::Describe>::describe().named(#type_name, #module_path)
            })
        }
        Fields::Unnamed(unnamed_fields) => {
            let len = unnamed_fields.unnamed.len();
            Ok(quote! {
                ::apidoc_schema::TypeDescriptor::array(
                    ::apidoc_schema::TypeDescriptor::interface(),
                    #len,
                )
                .named(#type_name, #module_path)
            })
        }
        Fields::Unit => Ok(quote! {
            ::apidoc_schema::TypeDescriptor::structure(#type_name, #module_path, ::std::vec::Vec::new())
        }),
    }
}

fn generate_enum_body(
    input: &DeriveInput,
    data_enum: &DataEnum,
    type_name: &TokenStream2,
    module_path: &TokenStream2,
    serde: &SerdeAttrs,
) -> (TokenStream2, Option<TokenStream2>) {
    let unit_only = !data_enum.variants.is_empty()
        && data_enum
            .variants
            .iter()
            .all(|variant| matches!(variant.fields, Fields::Unit));

    if !unit_only {
        let body = quote! {
            ::apidoc_schema::TypeDescriptor::interface().named(#type_name, #module_path)
        };
        return (body, None);
    }

    let values: Vec<String> = data_enum
        .variants
        .iter()
        .filter_map(|variant| {
            let variant_serde = SerdeAttrs::parse(&variant.attrs);
            if variant_serde.skip {
                return None;
            }
            let name = variant.ident.unraw().to_string();
            Some(variant_serde.rename.unwrap_or_else(|| match &serde.rename_all {
                Some(rule) => rename_variant(&name, rule),
                None => name,
            }))
        })
        .collect();

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let enum_values = quote! {
        impl #impl_generics ::apidoc_schema::EnumValues for #ident #ty_generics #where_clause {
            fn enum_values() -> ::std::vec::Vec<::apidoc_schema::serde_json::Value> {
                ::std::vec![
                    #(::apidoc_schema::serde_json::Value::String(::std::string::String::from(#values))),*
                ]
            }
        }
    };

    let body = quote! {
        ::apidoc_schema::TypeDescriptor::string()
            .named(#type_name, #module_path)
            .with_enum_values(<Self as ::apidoc_schema::EnumValues>::enum_values())
    };
    (body, Some(enum_values))
}

/// `#[describe(name = "...", module = "...")]` on the type
#[derive(Default)]
struct ContainerAttrs {
    name: Option<LitStr>,
    module: Option<LitStr>,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> Result<Self, syn::Error> {
        let mut container = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("describe")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    container.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("module") {
                    container.module = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `name` or `module`"))
                }
            })?;
        }
        Ok(container)
    }
}

/// `#[describe(key = "value", ...)]` on a field, in declaration order
#[derive(Default)]
struct FieldTags {
    entries: Vec<(String, String)>,
}

impl FieldTags {
    fn parse(attrs: &[Attribute]) -> Result<Self, syn::Error> {
        let mut tags = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("describe")) {
            attr.parse_nested_meta(|meta| {
                let key = meta
                    .path
                    .get_ident()
                    .map(|ident| ident.unraw().to_string())
                    .ok_or_else(|| meta.error("expected a tag name"))?;
                let value: LitStr = meta.value()?.parse()?;
                tags.push(&key, value.value());
                Ok(())
            })?;
        }
        Ok(tags)
    }

    fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    fn push(&mut self, key: &str, value: String) {
        self.entries.retain(|(k, _)| k != key);
        self.entries.push((key.to_string(), value));
    }
}

/// The subset of `#[serde(...)]` that affects serialized names
#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    rename_all: Option<String>,
    skip: bool,
    skip_serializing_if: bool,
}

impl SerdeAttrs {
    /// Serde validates its own attributes, so anything unrecognized is ignored
    fn parse(attrs: &[Attribute]) -> Self {
        let mut serde = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            let Ok(items) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            else {
                continue;
            };
            for item in &items {
                serde.apply(item);
            }
        }
        serde
    }

    fn apply(&mut self, item: &Meta) {
        let path = item.path();
        if path.is_ident("rename") {
            if let Some(name) = serialized_value(item) {
                self.rename = Some(name);
            }
        } else if path.is_ident("rename_all") {
            if let Some(rule) = serialized_value(item) {
                self.rename_all = Some(rule);
            }
        } else if path.is_ident("skip") || path.is_ident("skip_serializing") {
            self.skip = true;
        } else if path.is_ident("skip_serializing_if") {
            self.skip_serializing_if = true;
        }
    }
}

/// The serialize-side string of `key = "..."` or `key(serialize = "...")`
fn serialized_value(item: &Meta) -> Option<String> {
    match item {
        Meta::NameValue(name_value) => string_literal(&name_value.value),
        Meta::List(list) => list
            .parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)
            .ok()?
            .iter()
            .find(|name_value| name_value.path.is_ident("serialize"))
            .and_then(|name_value| string_literal(&name_value.value)),
        Meta::Path(_) => None,
    }
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Some(value.value()),
        _ => None,
    }
}

/// Build a `json` tag from serde attributes, if they say anything
fn json_tag_from_serde(field_name: &str, attrs: &[Attribute], container: &SerdeAttrs) -> Option<String> {
    let serde = SerdeAttrs::parse(attrs);
    if serde.skip {
        return Some("-".to_string());
    }

    let mut tag = serde
        .rename
        .or_else(|| container.rename_all.as_deref().map(|rule| rename_field(field_name, rule)))
        .unwrap_or_default();
    if serde.skip_serializing_if {
        tag.push_str(",omitempty");
    }
    (!tag.is_empty()).then_some(tag)
}

/// Apply a serde `rename_all` rule to a PascalCase variant name
fn rename_variant(variant: &str, rule: &str) -> String {
    match rule {
        "lowercase" => variant.to_ascii_lowercase(),
        "UPPERCASE" => variant.to_ascii_uppercase(),
        "PascalCase" => variant.to_string(),
        "camelCase" => {
            let mut chars = variant.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
        "snake_case" => snake_case(variant),
        "SCREAMING_SNAKE_CASE" => snake_case(variant).to_ascii_uppercase(),
        "kebab-case" => snake_case(variant).replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => snake_case(variant).to_ascii_uppercase().replace('_', "-"),
        _ => variant.to_string(),
    }
}

/// Apply a serde `rename_all` rule to a snake_case field name
fn rename_field(field: &str, rule: &str) -> String {
    match rule {
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => pascal_case(field),
        "camelCase" => {
            let pascal = pascal_case(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_ascii_uppercase().replace('_', "-"),
        _ => field.to_string(),
    }
}

fn snake_case(pascal: &str) -> String {
    let mut snake = String::new();
    for (i, ch) in pascal.char_indices() {
        if i > 0 && ch.is_uppercase() {
            snake.push('_');
        }
        snake.push(ch.to_ascii_lowercase());
    }
    snake
}

fn pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
