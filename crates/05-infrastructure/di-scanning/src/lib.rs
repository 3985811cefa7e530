//! # 约定式服务扫描注册
//!
//! 枚举程序集中的类型，按条件过滤，并把匹配的类注册为选定的服务契约：
//!
//! ```text
//! 类型来源 -> 类过滤 -> 契约选择 -> 生命周期 -> 服务集合
//! 类型来源 -> 标注选择 -> 服务集合
//! ```
//!
//! ## 核心组件
//!
//! - [`Assembly`] - 程序集（类型来源）
//! - [`ImplementationTypeFilter`] - 实现类型过滤器
//! - [`ServiceTypeSelection`] / [`AttributeSelector`] - 服务契约选择
//! - [`TypeScan`] - 流式扫描配置
//! - [`ServiceCollection`] / [`ServiceProvider`] - 服务注册表
//! - [`ScanProfile`] - 基于配置文件的扫描
//!
//! ## 示例
//!
//! ```
//! use di_scanning::{Assembly, ServiceCollection, TypeScan};
//! use infrastructure_common::{TypeDescriptor, TypeRef};
//!
//! let assembly = Assembly::new("demo")
//!     .with_type(TypeDescriptor::interface("demo", "IClock"))
//!     .with_type(TypeDescriptor::class("demo", "Clock").implements(TypeRef::new("demo", "IClock")));
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .scan(
//!         TypeScan::from_assembly(assembly)
//!             .add_classes()
//!             .as_implemented_interfaces()
//!             .with_singleton_lifetime(),
//!     )
//!     .unwrap();
//! assert_eq!(services.len(), 1);
//! ```

pub mod assembly;
pub mod attributes;
pub mod collection;
pub mod filter;
pub mod hierarchy;
pub mod profile;
pub mod scan;
pub mod selector;

pub use assembly::Assembly;
pub use attributes::AttributeSelector;
pub use collection::{ServiceCollection, ServiceProvider};
pub use filter::{ImplementationTypeFilter, TypePredicate};
pub use hierarchy::TypeIndex;
pub use profile::{RegistrationKind, ScanDefinition, ScanProfile, SelectionKind, ENV_PREFIX};
pub use scan::{
    CompletedScan, ImplementationTypeSelector, LifetimeSelector, ScanPlan, ServiceTypeSelector,
    TypeScan,
};
pub use selector::{InterfacePredicate, MatchingPredicate, ServiceTypeSelection, ServiceTypesFn};
