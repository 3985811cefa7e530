//! # Service Macros
//!
//! 在编译期生成类型描述符，并在程序启动前注册到全局类型目录，
//! 使 `Assembly::of::<T>()` 能看到 crate 中声明的服务类型。
//!
//! 生成的代码引用 `::ctor` 和 `::infrastructure_common`，使用这些宏的 crate
//! 需要直接依赖这两个 crate。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use service_macros::{service_contract, Injectable};
//!
//! #[service_contract]
//! pub trait IOrderService {}
//!
//! #[derive(Injectable)]
//! #[injectable(implements = "IOrderService")]
//! #[service_descriptor(contract = "IOrderService", lifetime = "scoped")]
//! pub struct OrderService;
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemTrait};

mod contract;
mod injectable;
mod utils;

/// 可注入类型派生宏
///
/// 把 struct / enum 注册为类描述符，命名空间默认为声明处的模块路径。
///
/// # 参数
///
/// `#[injectable(...)]`：
/// - `implements = "IFoo<T>"` - 实现的接口，可重复
/// - `base = "Base<String>"` - 基类型
/// - `namespace = "a::b"` - 覆盖命名空间
/// - `is_abstract` - 抽象类型，不参与扫描
/// - `internal` - 非公开类型
/// - `attribute = "Name"` - 普通属性标注，可重复
///
/// `#[service_descriptor(contract = "IFoo", lifetime = "scoped")]`：服务注册标注，可重复；
/// 省略 `contract` 时注册为自身、实现的接口和基类型。
#[proc_macro_derive(Injectable, attributes(injectable, service_descriptor))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::expand(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 服务契约宏
///
/// 把 trait 注册为接口描述符，父 trait 记录为继承的接口。
///
/// # 示例
///
/// ```rust,ignore
/// #[service_contract(namespace = "app::contracts")]
/// pub trait IUserRepository: IRepository<User> {}
/// ```
#[proc_macro_attribute]
pub fn service_contract(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut contract_args = contract::ContractArgs::default();
    let parser = syn::meta::parser(|meta| contract_args.parse_meta(meta));
    parse_macro_input!(args with parser);

    let item = parse_macro_input!(input as ItemTrait);
    contract::expand(&contract_args, &item)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
