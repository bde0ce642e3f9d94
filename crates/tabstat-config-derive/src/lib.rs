//! `#[derive(Config)]` for tabstat configuration sections.
//!
//! Every named field carries `#[config(default = ..)]` and may add
//! `min = ..`, `max = ..` and `hot_updated`. The derive emits `Default`
//! and an implementation of `tabstat_config::Config`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Field, Fields, Ident, Type};

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Flag,
    Integer,
}

struct FieldSpec {
    ident: Ident,
    key: String,
    ty: Type,
    kind: FieldKind,
    default: Expr,
    min: Option<Expr>,
    max: Option<Expr>,
    hot_updated: bool,
}

fn last_segment_is(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(tp) => tp.path.segments.last().is_some_and(|s| s.ident == name),
        _ => false,
    }
}

fn parse_field(field: &Field) -> syn::Result<FieldSpec> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new(field.span(), "Config fields must be named"))?;

    let mut default = None;
    let mut min = None;
    let mut max = None;
    let mut hot_updated = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("config")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("hot_updated") {
                hot_updated = true;
            } else if meta.path.is_ident("default") {
                default = Some(meta.value()?.parse::<Expr>()?);
            } else if meta.path.is_ident("min") {
                min = Some(meta.value()?.parse::<Expr>()?);
            } else if meta.path.is_ident("max") {
                max = Some(meta.value()?.parse::<Expr>()?);
            } else {
                return Err(meta.error("unknown config attribute"));
            }
            Ok(())
        })?;
    }

    let default = default.ok_or_else(|| {
        syn::Error::new(ident.span(), format!("field `{ident}` needs #[config(default = ..)]"))
    })?;

    let kind = if last_segment_is(&field.ty, "String") {
        FieldKind::Text
    } else if last_segment_is(&field.ty, "bool") {
        FieldKind::Flag
    } else {
        FieldKind::Integer
    };
    if kind != FieldKind::Integer && (min.is_some() || max.is_some()) {
        return Err(syn::Error::new(ident.span(), "min/max only apply to integer fields"));
    }

    Ok(FieldSpec {
        key: ident.to_string(),
        ident,
        ty: field.ty.clone(),
        kind,
        default,
        min,
        max,
        hot_updated,
    })
}

fn default_init(spec: &FieldSpec) -> TokenStream2 {
    let FieldSpec { ident, default, .. } = spec;
    match spec.kind {
        FieldKind::Text => quote! { #ident: ::std::string::String::from(#default), },
        _ => quote! { #ident: #default, },
    }
}

fn read_field(spec: &FieldSpec) -> TokenStream2 {
    let FieldSpec { ident, key, ty, .. } = spec;
    let convert = match spec.kind {
        FieldKind::Text => quote! {
            v.as_str()
                .map(::std::string::String::from)
                .ok_or_else(|| ::tabstat_config::ConfigError::TypeMismatch {
                    field: #key.into(),
                    expected: "string".into(),
                })?
        },
        FieldKind::Flag => quote! {
            v.as_bool().ok_or_else(|| ::tabstat_config::ConfigError::TypeMismatch {
                field: #key.into(),
                expected: "bool".into(),
            })?
        },
        FieldKind::Integer => quote! {{
            let n = v.as_integer().ok_or_else(|| ::tabstat_config::ConfigError::TypeMismatch {
                field: #key.into(),
                expected: "integer".into(),
            })?;
            <#ty as ::std::convert::TryFrom<i64>>::try_from(n).map_err(|_| {
                ::tabstat_config::ConfigError::OutOfRange {
                    field: #key.into(),
                    value: n.to_string(),
                    min: Some(<#ty>::MIN.to_string()),
                    max: Some(<#ty>::MAX.to_string()),
                }
            })?
        }},
    };
    quote! {
        if let Some(v) = value.get(#key) {
            cfg.#ident = #convert;
        }
    }
}

fn render_field(spec: &FieldSpec) -> TokenStream2 {
    let FieldSpec { ident, key, .. } = spec;
    match spec.kind {
        FieldKind::Text => quote! {
            out.push_str(&format!(
                "{} = {}\n",
                #key,
                ::toml::Value::String(self.#ident.clone())
            ));
        },
        _ => quote! {
            out.push_str(&format!("{} = {}\n", #key, self.#ident));
        },
    }
}

fn check_range(spec: &FieldSpec) -> TokenStream2 {
    let FieldSpec { ident, key, .. } = spec;
    let bound = |e: &Option<Expr>| match e {
        Some(e) => quote! { Some((#e).to_string()) },
        None => quote! { None },
    };
    let (min_str, max_str) = (bound(&spec.min), bound(&spec.max));
    let below = spec.min.as_ref().map(|e| quote! { (self.#ident as i128) < (#e as i128) });
    let above = spec.max.as_ref().map(|e| quote! { (self.#ident as i128) > (#e as i128) });
    let Some(out_of_range) = below.into_iter().chain(above).reduce(|a, b| quote! { #a || #b })
    else {
        return quote! {};
    };
    quote! {
        if #out_of_range {
            return Err(::tabstat_config::ConfigError::OutOfRange {
                field: #key.into(),
                value: self.#ident.to_string(),
                min: #min_str,
                max: #max_str,
            });
        }
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(ds) => match &ds.fields {
            Fields::Named(named) => &named.named,
            _ => return Err(syn::Error::new(name.span(), "Config needs named fields")),
        },
        _ => return Err(syn::Error::new(name.span(), "Config can only be derived for structs")),
    };
    let specs = fields.iter().map(parse_field).collect::<syn::Result<Vec<_>>>()?;

    let defaults = specs.iter().map(default_init);
    let reads = specs.iter().map(read_field);
    let renders = specs.iter().map(render_field);
    let checks = specs.iter().map(check_range);
    let hot = specs.iter().filter(|s| s.hot_updated).map(|s| {
        let ident = &s.ident;
        quote! { self.#ident = other.#ident.clone(); }
    });

    Ok(quote! {
        impl #impl_generics ::std::default::Default for #name #ty_generics #where_clause {
            fn default() -> Self {
                Self { #(#defaults)* }
            }
        }

        impl #impl_generics ::tabstat_config::Config for #name #ty_generics #where_clause {
            fn from_toml(value: &::toml::Value) -> ::std::result::Result<Self, ::tabstat_config::ConfigError> {
                let mut cfg = <Self as ::std::default::Default>::default();
                #(#reads)*
                Ok(cfg)
            }

            fn hot_update(&mut self, other: &Self) {
                #(#hot)*
            }

            fn render(&self) -> ::std::string::String {
                let mut out = ::std::string::String::new();
                #(#renders)*
                out
            }

            fn validate(&self) -> ::std::result::Result<(), ::tabstat_config::ConfigError> {
                #(#checks)*
                Ok(())
            }
        }
    })
}

#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
