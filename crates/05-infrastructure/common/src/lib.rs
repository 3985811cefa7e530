//! # Infrastructure Common
//!
//! 这个 crate 提供了服务扫描注册所需的公共类型定义。
//!
//! ## 核心类型
//!
//! - [`TypeRef`] - 类型引用，支持泛型实参和开放泛型定义
//! - [`TypeDescriptor`] - 候选类型的元数据描述符
//! - [`ServiceMarker`] - 声明式服务注册标注
//! - [`Lifetime`] - 服务生命周期
//!
//! ## 设计原则
//!
//! - 类型元数据显式提供，不依赖运行时反射
//! - 描述符构建后不可变
//! - 约定优于配置

pub mod catalog;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use catalog::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
