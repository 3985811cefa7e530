//! 宏工具函数

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{GenericParam, Generics, Ident, LitStr, Path, Result};

/// 驼峰名称转蛇形名称
pub fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let previous_lower =
                index > 0 && !chars[index - 1].is_uppercase() && chars[index - 1] != '_';
            let next_lower = chars.get(index + 1).is_some_and(|c| c.is_lowercase());
            let previous_upper = index > 0 && chars[index - 1].is_uppercase();
            if previous_lower || (previous_upper && next_lower) {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}

/// 生成注册函数名称
pub fn registration_fn_name(prefix: &str, ident: &Ident) -> Ident {
    Ident::new(
        &format!("__register_{}_{}", prefix, to_snake_case(&ident.to_string())),
        Span::call_site(),
    )
}

/// 校验类型名称能被解析为 Rust 类型
pub fn validate_type_name(lit: &LitStr) -> Result<()> {
    let text = lit.value();
    syn::parse_str::<syn::Type>(&text)
        .map(|_| ())
        .map_err(|e| syn::Error::new(lit.span(), format!("无效的类型名称 `{text}`: {e}")))
}

/// 生命周期名称转换为 `Lifetime` 变体
pub fn lifetime_tokens(lit: &LitStr) -> Result<TokenStream> {
    match lit.value().trim().to_ascii_lowercase().as_str() {
        "transient" => Ok(quote! { ::infrastructure_common::Lifetime::Transient }),
        "scoped" => Ok(quote! { ::infrastructure_common::Lifetime::Scoped }),
        "singleton" => Ok(quote! { ::infrastructure_common::Lifetime::Singleton }),
        other => Err(syn::Error::new(
            lit.span(),
            format!("未知的生命周期 `{other}`，可选值: transient, scoped, singleton"),
        )),
    }
}

/// 类型泛型参数名称（忽略生命周期和常量参数）
pub fn type_param_names(generics: &Generics) -> Vec<String> {
    generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(type_param) => Some(type_param.ident.to_string()),
            _ => None,
        })
        .collect()
}

/// 命名空间表达式，默认为调用处的模块路径
pub fn namespace_tokens(namespace: Option<&LitStr>) -> TokenStream {
    match namespace {
        Some(lit) => quote! { #lit },
        None => quote! { ::core::module_path!() },
    }
}

/// 路径转换为类型名称文本
pub fn path_to_type_name(path: &Path) -> String {
    quote! { #path }.to_string().replace(' ', "")
}
