//! `#[derive(Injectable)]` 实现

use crate::utils::{
    lifetime_tokens, namespace_tokens, registration_fn_name, type_param_names, validate_type_name,
};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, LitStr, Meta, Result};

/// `#[injectable(...)]` 参数
#[derive(Default)]
struct InjectableArgs {
    implements: Vec<LitStr>,
    base: Option<LitStr>,
    namespace: Option<LitStr>,
    is_abstract: bool,
    internal: bool,
    attributes: Vec<LitStr>,
}

/// `#[service_descriptor(...)]` 参数
struct MarkerArgs {
    contract: Option<LitStr>,
    lifetime: TokenStream,
}

impl InjectableArgs {
    fn parse_into(&mut self, attr: &Attribute) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("implements") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_type_name(&lit)?;
                self.implements.push(lit);
            } else if meta.path.is_ident("base") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_type_name(&lit)?;
                if self.base.is_some() {
                    return Err(meta.error("只能声明一个 base"));
                }
                self.base = Some(lit);
            } else if meta.path.is_ident("namespace") {
                self.namespace = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("is_abstract") {
                self.is_abstract = true;
            } else if meta.path.is_ident("internal") {
                self.internal = true;
            } else if meta.path.is_ident("attribute") {
                self.attributes.push(meta.value()?.parse()?);
            } else {
                return Err(meta.error(
                    "未知的 injectable 参数，可选: implements, base, namespace, is_abstract, internal, attribute",
                ));
            }
            Ok(())
        })
    }
}

impl MarkerArgs {
    fn parse(attr: &Attribute) -> Result<Self> {
        let mut contract: Option<LitStr> = None;
        let mut lifetime = quote! { ::infrastructure_common::Lifetime::Transient };
        if matches!(attr.meta, Meta::Path(_)) {
            return Ok(Self { contract, lifetime });
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("contract") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_type_name(&lit)?;
                contract = Some(lit);
            } else if meta.path.is_ident("lifetime") {
                let lit: LitStr = meta.value()?.parse()?;
                lifetime = lifetime_tokens(&lit)?;
            } else {
                return Err(meta.error("未知的 service_descriptor 参数，可选: contract, lifetime"));
            }
            Ok(())
        })?;
        Ok(Self { contract, lifetime })
    }

    fn to_tokens(&self) -> TokenStream {
        let lifetime = &self.lifetime;
        match &self.contract {
            Some(contract) => quote! {
                .try_with_marker(::core::option::Option::Some(#contract), #lifetime)?
            },
            None => quote! {
                .try_with_marker(::core::option::Option::None, #lifetime)?
            },
        }
    }
}

/// 展开 `#[derive(Injectable)]`
pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Union(data) = &input.data {
        return Err(syn::Error::new(
            data.union_token.span,
            "Injectable 只支持 struct 和 enum",
        ));
    }

    let mut args = InjectableArgs::default();
    let mut markers = Vec::new();
    for attr in &input.attrs {
        if attr.path().is_ident("injectable") {
            args.parse_into(attr)?;
        } else if attr.path().is_ident("service_descriptor") {
            markers.push(MarkerArgs::parse(attr)?);
        }
    }

    let ident = &input.ident;
    let name = ident.to_string();
    let register_fn = registration_fn_name("injectable", ident);
    let namespace = namespace_tokens(args.namespace.as_ref());
    let generic_params = type_param_names(&input.generics);
    let implements = &args.implements;
    let attributes = &args.attributes;
    let base = args.base.as_ref().map(|base| quote! { .try_extends(#base)? });
    let is_abstract = args.is_abstract.then(|| quote! { .as_abstract() });
    let internal = args.internal.then(|| quote! { .internal() });
    let markers = markers.iter().map(MarkerArgs::to_tokens);

    Ok(quote! {
        #[::ctor::ctor]
        fn #register_fn() {
            fn describe() -> ::core::result::Result<
                ::infrastructure_common::TypeDescriptor,
                ::infrastructure_common::ParseError,
            > {
                let descriptor = ::infrastructure_common::TypeDescriptor::class(#namespace, #name)
                    #(.with_generic_param(#generic_params))*
                    #is_abstract
                    #internal
                    #(.with_attribute(#attributes))*
                    .declared_at(::core::file!(), ::core::line!())
                    #(.try_implements(#implements)?)*
                    #base
                    #(#markers)*;
                ::core::result::Result::Ok(descriptor)
            }

            match describe() {
                ::core::result::Result::Ok(descriptor) => {
                    ::infrastructure_common::register_type_descriptor(descriptor)
                }
                ::core::result::Result::Err(e) => {
                    ::std::eprintln!("类型描述符注册失败 {}: {}", #name, e)
                }
            }
        }
    })
}
