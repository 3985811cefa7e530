//! `#[service_contract]` 实现

use crate::utils::{namespace_tokens, path_to_type_name, registration_fn_name, type_param_names};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{ItemTrait, LitStr, Result, TraitBoundModifier, TypeParamBound};

/// `#[service_contract(...)]` 参数
#[derive(Default)]
pub struct ContractArgs {
    pub namespace: Option<LitStr>,
}

impl ContractArgs {
    pub fn parse_meta(&mut self, meta: syn::meta::ParseNestedMeta) -> Result<()> {
        if meta.path.is_ident("namespace") {
            self.namespace = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("未知的 service_contract 参数，可选: namespace"))
        }
    }
}

/// 展开 `#[service_contract]`，原样保留 trait 定义
pub fn expand(args: &ContractArgs, item: &ItemTrait) -> Result<TokenStream> {
    let ident = &item.ident;
    let name = ident.to_string();
    let register_fn = registration_fn_name("contract", ident);
    let namespace = namespace_tokens(args.namespace.as_ref());
    let generic_params = type_param_names(&item.generics);

    let supertraits: Vec<String> = item
        .supertraits
        .iter()
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(bound) if matches!(bound.modifier, TraitBoundModifier::None) => {
                Some(path_to_type_name(&bound.path))
            }
            _ => None,
        })
        .collect();

    Ok(quote! {
        #item

        #[::ctor::ctor]
        fn #register_fn() {
            fn describe() -> ::core::result::Result<
                ::infrastructure_common::TypeDescriptor,
                ::infrastructure_common::ParseError,
            > {
                let descriptor =
                    ::infrastructure_common::TypeDescriptor::interface(#namespace, #name)
                    #(.with_generic_param(#generic_params))*
                    .declared_at(::core::file!(), ::core::line!())
                    #(.try_implements(#supertraits)?)*;
                ::core::result::Result::Ok(descriptor)
            }

            match describe() {
                ::core::result::Result::Ok(descriptor) => {
                    ::infrastructure_common::register_type_descriptor(descriptor)
                }
                ::core::result::Result::Err(e) => {
                    ::std::eprintln!("服务契约注册失败 {}: {}", #name, e)
                }
            }
        }
    })
}
