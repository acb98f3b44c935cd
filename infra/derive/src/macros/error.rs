use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, FieldsNamed, Ident, LitInt, Type, Variant};

struct ErrorVariant {
    ident: Ident,
    source: Option<(Ident, Type)>,
    has_context: bool,
    code: Option<u16>,
    cfg_attrs: Vec<Attribute>,
}

pub fn expand(mut input: DeriveInput) -> TokenStream {
    let name = input.ident.clone();
    let ext_trait = format_ident!("{}Ext", name);

    let Data::Enum(data) = &mut input.data else {
        return syn::Error::new_spanned(&name, "cflux_error can only be applied to enums")
            .to_compile_error();
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &mut data.variants {
        match parse_variant(variant) {
            Ok(parsed) => variants.push(parsed),
            Err(err) => return err.to_compile_error(),
        }
    }
    if let Err(err) = check_variants(&name, &variants) {
        return err.to_compile_error();
    }

    let derives = missing_derives(&input.attrs);
    let context_impl = context_trait(&name, &ext_trait, &variants);
    let from_impls = variants.iter().filter_map(|v| source_impls(&name, &ext_trait, v));
    let internal_impls = internal_impls(&name, &variants);
    let code_impl = code_impl(&name, &variants);

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_impl
        #(#from_impls)*
        #internal_impls
        #code_impl

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn parse_variant(variant: &mut Variant) -> syn::Result<ErrorVariant> {
    let code = take_code(&mut variant.attrs)?;

    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "cflux_error requires named fields for source/context handling",
        ));
    };

    let has_context = context_field(fields)?;
    let source = fields
        .named
        .iter()
        .find(|field| {
            field.ident.as_ref().is_some_and(|ident| ident == "source")
                || has_attr(&field.attrs, "source")
                || has_attr(&field.attrs, "from")
        })
        .and_then(|field| field.ident.clone().map(|ident| (ident, field.ty.clone())));

    let cfg_attrs =
        variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect();

    Ok(ErrorVariant { ident: variant.ident.clone(), source, has_context, code, cfg_attrs })
}

/// Removes the `#[code(N)]` attribute so it never reaches `thiserror`.
fn take_code(attrs: &mut Vec<Attribute>) -> syn::Result<Option<u16>> {
    let Some(position) = attrs.iter().position(|attr| attr.path().is_ident("code")) else {
        return Ok(None);
    };
    let attr = attrs.remove(position);
    if has_attr(attrs, "code") {
        return Err(syn::Error::new_spanned(&attr, "duplicate #[code] attribute"));
    }

    let literal: LitInt = attr.parse_args()?;
    literal.base10_parse::<u16>().map(Some)
}

fn context_field(fields: &FieldsNamed) -> syn::Result<bool> {
    let Some(field) =
        fields.named.iter().find(|field| field.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(false);
    };

    if is_context_type(&field.ty) {
        Ok(true)
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>"))
    }
}

fn check_variants(name: &Ident, variants: &[ErrorVariant]) -> syn::Result<()> {
    if let Some(v) = variants.iter().find(|v| v.source.is_some() && !v.has_context) {
        return Err(syn::Error::new_spanned(
            &v.ident,
            "cflux_error requires `context: Option<Cow<'static, str>>` for variants with a source",
        ));
    }

    let coded = variants.iter().filter(|v| v.code.is_some()).count();
    if coded != 0 && coded != variants.len() {
        return Err(syn::Error::new_spanned(
            name,
            "#[code] must be present on every variant or on none",
        ));
    }

    let mut seen = FxHashSet::default();
    for v in variants {
        if let Some(code) = v.code {
            if !seen.insert(code) {
                return Err(syn::Error::new_spanned(
                    &v.ident,
                    format!("error code {code} is used by more than one variant"),
                ));
            }
        }
    }

    Ok(())
}

fn missing_derives(attrs: &[Attribute]) -> TokenStream {
    let mut derived = FxHashSet::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                derived.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    let mut tokens = Vec::new();
    if !derived.contains("Debug") {
        tokens.push(quote! { Debug });
    }
    if !derived.contains("Error") {
        tokens.push(quote! { ::thiserror::Error });
    }

    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn context_trait(name: &Ident, ext_trait: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg_attrs = &v.cfg_attrs;
        let ident = &v.ident;
        quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
    });

    quote! {
        pub trait #ext_trait<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #( #arms )*
                        _ => {}
                    }
                    e
                })
            }
        }
    }
}

fn source_impls(name: &Ident, ext_trait: &Ident, v: &ErrorVariant) -> Option<TokenStream> {
    if v.ident == "Internal" {
        return None;
    }
    let (field, ty) = v.source.as_ref()?;
    let ident = &v.ident;
    let cfg_attrs = &v.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
        }

        #(#cfg_attrs)*
        impl<T> #ext_trait<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_impls(name: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == "Internal") else {
        return quote!();
    };
    let cfg_attrs = &internal.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn code_impl(name: &Ident, variants: &[ErrorVariant]) -> TokenStream {
    if variants.is_empty() || variants.iter().any(|v| v.code.is_none()) {
        return quote!();
    }

    let arms = variants.iter().filter_map(|v| {
        let code = v.code?;
        let ident = &v.ident;
        let cfg_attrs = &v.cfg_attrs;
        Some(quote! { #(#cfg_attrs)* Self::#ident { .. } => #code, })
    });

    quote! {
        #[automatically_derived]
        impl #name {
            /// Stable numeric code of this error kind.
            #[must_use]
            pub const fn code(&self) -> u16 {
                match self {
                    #( #arms )*
                }
            }
        }
    }
}

fn has_attr(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn is_context_type(ty: &Type) -> bool {
    let Some(inner) = single_generic(ty, "Option") else {
        return false;
    };
    let Type::Path(path) = inner else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    if segment.ident != "Cow" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    let is_static = matches!(args.next(), Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let is_str = matches!(
        args.next(),
        Some(syn::GenericArgument::Type(Type::Path(p)))
            if p.path.segments.last().is_some_and(|s| s.ident == "str")
    );

    is_static && is_str
}

fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
