//! # Dependency Injection Abstractions
//!
//! 服务扫描注册抽象层，定义类型来源、过滤、契约选择和注册表的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeSource`] - 类型来源接口
//! - [`TypeHierarchy`] - 类型层次结构接口
//! - [`TypeFilter`] - 类型过滤接口
//! - [`ContractSelector`] - 服务契约选择接口
//! - [`ServiceRegistry`] - 服务注册表接口

pub mod filter;
pub mod hierarchy;
pub mod registry;
pub mod scanner;
pub mod selector;

pub use filter::*;
pub use hierarchy::*;
pub use registry::*;
pub use scanner::*;
pub use selector::*;
