//! 流式扫描配置
//!
//! 类型状态构建器依次确定类型来源、过滤条件、服务契约和生命周期：
//!
//! ```text
//! TypeScan::from_assembly(..)        -> ImplementationTypeSelector
//!     .add_classes_where(..)         -> ServiceTypeSelector
//!     .as_implemented_interfaces()   -> LifetimeSelector
//!     .with_scoped_lifetime()        -> CompletedScan
//! ```
//!
//! 每个阶段都可以转换为 [`ScanPlan`]，交给
//! [`ServiceCollection::scan`](crate::ServiceCollection::scan) 执行。

use crate::assembly::Assembly;
use crate::filter::ImplementationTypeFilter;
use crate::hierarchy::TypeIndex;
use crate::selector::{MatchingPredicate, ServiceTypeSelection};
use di_abstractions::{
    filter_types, ContractSelector, RegistrationStrategy, ServiceDescriptor, ServiceRegistry,
    TypeSource,
};
use infrastructure_common::{Lifetime, ScanResult, TypeDescriptor, TypeRef};
use std::sync::Arc;
use tracing::{info, trace};

/// 扫描来源：候选类型及用于层次结构查询的索引
#[derive(Debug, Clone)]
struct SourceTypes {
    name: String,
    candidates: Vec<TypeDescriptor>,
    index: TypeIndex,
}

impl SourceTypes {
    fn new(name: String, candidates: Vec<TypeDescriptor>) -> Self {
        let index = TypeIndex::new(candidates.iter().cloned());
        Self {
            name,
            candidates,
            index,
        }
    }
}

#[derive(Debug, Clone)]
struct ScanStep {
    source: Arc<SourceTypes>,
    filter: ImplementationTypeFilter,
    selection: ServiceTypeSelection,
    lifetime: Lifetime,
    strategy: RegistrationStrategy,
}

impl ScanStep {
    fn execute(&self, registry: &mut dyn ServiceRegistry) -> ScanResult<usize> {
        let hierarchy = &self.source.index;
        let classes = filter_types(&self.source.candidates, &self.filter, hierarchy);

        let mut added = 0;
        for class in &classes {
            for selected in self.selection.select(class, hierarchy)? {
                let descriptor = ServiceDescriptor {
                    service_type: selected.service_type,
                    implementation: selected.implementation,
                    lifetime: selected.lifetime.unwrap_or(self.lifetime),
                };
                trace!("扫描得到注册: {}", descriptor);
                if registry.register(descriptor, self.strategy)? {
                    added += 1;
                }
            }
        }

        info!(
            "扫描 {} 完成: 匹配类型 {} 个, 新增注册 {} 个 ({:?})",
            self.source.name,
            classes.len(),
            added,
            self.selection
        );
        Ok(added)
    }
}

/// 扫描计划
///
/// 按顺序执行的扫描步骤，本身不持有注册表。
#[derive(Debug, Clone, Default)]
pub struct ScanPlan {
    steps: Vec<ScanStep>,
}

impl ScanPlan {
    /// 追加另一个计划的全部步骤
    pub fn then(mut self, other: impl Into<ScanPlan>) -> Self {
        self.steps.extend(other.into().steps);
        self
    }

    /// 步骤个数
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 在注册表上执行，返回新增的注册数
    pub fn execute(&self, registry: &mut dyn ServiceRegistry) -> ScanResult<usize> {
        let mut added = 0;
        for step in &self.steps {
            added += step.execute(registry)?;
        }
        Ok(added)
    }
}

/// 扫描入口
pub struct TypeScan;

impl TypeScan {
    /// 扫描程序集
    pub fn from_assembly(assembly: Assembly) -> ImplementationTypeSelector {
        ImplementationTypeSelector::start(ScanPlan::default(), assembly)
    }

    /// 扫描定义类型 `T` 的程序集
    pub fn from_assembly_of<T: ?Sized>() -> ImplementationTypeSelector {
        Self::from_assembly(Assembly::of::<T>())
    }

    /// 扫描多个程序集，类型层次结构跨程序集解析
    pub fn from_assemblies(
        assemblies: impl IntoIterator<Item = Assembly>,
    ) -> ImplementationTypeSelector {
        ImplementationTypeSelector::start_many(ScanPlan::default(), assemblies)
    }

    /// 扫描一组显式给出的类型
    pub fn from_types(
        types: impl IntoIterator<Item = TypeDescriptor>,
    ) -> ImplementationTypeSelector {
        Self::from_assembly(Assembly::new("<types>").with_types(types))
    }

    /// 扫描任意类型来源
    pub fn from_source(source: &dyn TypeSource) -> ImplementationTypeSelector {
        Self::from_assembly(Assembly::new(source.name()).with_types(source.types()))
    }
}

/// 已选定类型来源，等待添加类
#[derive(Debug, Clone)]
pub struct ImplementationTypeSelector {
    plan: ScanPlan,
    source: Arc<SourceTypes>,
}

impl ImplementationTypeSelector {
    fn start(plan: ScanPlan, assembly: Assembly) -> Self {
        let name = assembly.name().to_string();
        Self {
            plan,
            source: Arc::new(SourceTypes::new(name, assembly.into_types())),
        }
    }

    fn start_many(plan: ScanPlan, assemblies: impl IntoIterator<Item = Assembly>) -> Self {
        let mut names: Vec<String> = Vec::new();
        let mut candidates: Vec<TypeDescriptor> = Vec::new();
        for assembly in assemblies {
            names.push(assembly.name().to_string());
            candidates.extend(assembly.into_types());
        }
        Self {
            plan,
            source: Arc::new(SourceTypes::new(names.join(", "), candidates)),
        }
    }

    /// 引用程序集：只参与类型层次结构查询，不产生候选类型
    pub fn with_reference(mut self, assembly: Assembly) -> Self {
        Arc::make_mut(&mut self.source)
            .index
            .extend(assembly.into_types());
        self
    }

    /// 添加全部公开的非抽象类
    pub fn add_classes(self) -> ServiceTypeSelector {
        self.add_classes_where(|filter| filter)
    }

    /// 按过滤条件添加类
    pub fn add_classes_where<F>(self, configure: F) -> ServiceTypeSelector
    where
        F: FnOnce(ImplementationTypeFilter) -> ImplementationTypeFilter,
    {
        ServiceTypeSelector {
            plan: self.plan,
            source: self.source,
            filter: configure(ImplementationTypeFilter::new()),
            strategy: RegistrationStrategy::default(),
        }
    }
}

/// 已选定类，等待确定服务契约
#[derive(Debug, Clone)]
pub struct ServiceTypeSelector {
    plan: ScanPlan,
    source: Arc<SourceTypes>,
    filter: ImplementationTypeFilter,
    strategy: RegistrationStrategy,
}

impl ServiceTypeSelector {
    /// 设置注册策略
    pub fn using_registration_strategy(mut self, strategy: RegistrationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn select(self, selection: ServiceTypeSelection) -> LifetimeSelector {
        LifetimeSelector {
            plan: self.plan,
            source: self.source,
            filter: self.filter,
            selection,
            strategy: self.strategy,
        }
    }

    /// 注册为自身
    pub fn as_self(self) -> LifetimeSelector {
        self.select(ServiceTypeSelection::AsSelf)
    }

    /// 注册为指定服务类型
    pub fn as_contract(self, contract: TypeRef) -> LifetimeSelector {
        self.as_contracts([contract])
    }

    /// 注册为 Rust 类型 `T`
    pub fn as_contract_type<T: ?Sized>(self) -> LifetimeSelector {
        self.as_contract(TypeRef::of::<T>())
    }

    /// 注册为多个指定服务类型
    pub fn as_contracts(self, contracts: impl IntoIterator<Item = TypeRef>) -> LifetimeSelector {
        self.select(ServiceTypeSelection::Contracts(contracts.into_iter().collect()))
    }

    /// 注册为实现的全部接口
    pub fn as_implemented_interfaces(self) -> LifetimeSelector {
        self.select(ServiceTypeSelection::ImplementedInterfaces(None))
    }

    /// 注册为满足条件的实现接口
    pub fn as_implemented_interfaces_where<F>(self, predicate: F) -> LifetimeSelector
    where
        F: Fn(&TypeRef) -> bool + Send + Sync + 'static,
    {
        self.select(ServiceTypeSelection::ImplementedInterfaces(Some(Arc::new(predicate))))
    }

    /// 注册为名为 `I{类名}` 的接口
    pub fn as_matching_interface(self) -> LifetimeSelector {
        self.select(ServiceTypeSelection::MatchingInterface(None))
    }

    /// 注册为名为 `I{类名}` 且满足附加条件的接口
    pub fn as_matching_interface_where<F>(self, predicate: F) -> LifetimeSelector
    where
        F: Fn(&TypeDescriptor, &TypeRef) -> bool + Send + Sync + 'static,
    {
        let predicate: MatchingPredicate = Arc::new(predicate);
        self.select(ServiceTypeSelection::MatchingInterface(Some(predicate)))
    }

    /// 注册为自身，并把实现的接口转发到自身
    pub fn as_self_with_interfaces(self) -> LifetimeSelector {
        self.select(ServiceTypeSelection::SelfWithInterfaces)
    }

    /// 由调用方计算服务类型
    pub fn as_selected<F>(self, select: F) -> LifetimeSelector
    where
        F: Fn(&TypeDescriptor) -> Vec<TypeRef> + Send + Sync + 'static,
    {
        self.select(ServiceTypeSelection::Selected(Arc::new(select)))
    }

    /// 按服务注册标注注册，生命周期取自标注
    pub fn using_attributes(self) -> CompletedScan {
        self.select(ServiceTypeSelection::Attributes)
            .with_lifetime(Lifetime::default())
    }
}

/// 已确定服务契约，等待确定生命周期
#[derive(Debug, Clone)]
pub struct LifetimeSelector {
    plan: ScanPlan,
    source: Arc<SourceTypes>,
    filter: ImplementationTypeFilter,
    selection: ServiceTypeSelection,
    strategy: RegistrationStrategy,
}

impl LifetimeSelector {
    /// 设置生命周期
    pub fn with_lifetime(self, lifetime: Lifetime) -> CompletedScan {
        let mut plan = self.plan;
        plan.steps.push(ScanStep {
            source: Arc::clone(&self.source),
            filter: self.filter,
            selection: self.selection,
            lifetime,
            strategy: self.strategy,
        });
        CompletedScan {
            plan,
            source: self.source,
        }
    }

    pub fn with_transient_lifetime(self) -> CompletedScan {
        self.with_lifetime(Lifetime::Transient)
    }

    pub fn with_scoped_lifetime(self) -> CompletedScan {
        self.with_lifetime(Lifetime::Scoped)
    }

    pub fn with_singleton_lifetime(self) -> CompletedScan {
        self.with_lifetime(Lifetime::Singleton)
    }
}

/// 已完成一个扫描步骤，可以继续添加类或切换来源
#[derive(Debug, Clone)]
pub struct CompletedScan {
    plan: ScanPlan,
    source: Arc<SourceTypes>,
}

impl CompletedScan {
    /// 在同一来源上添加全部公开的非抽象类
    pub fn add_classes(self) -> ServiceTypeSelector {
        self.same_source().add_classes()
    }

    /// 在同一来源上按过滤条件添加类
    pub fn add_classes_where<F>(self, configure: F) -> ServiceTypeSelector
    where
        F: FnOnce(ImplementationTypeFilter) -> ImplementationTypeFilter,
    {
        self.same_source().add_classes_where(configure)
    }

    fn same_source(self) -> ImplementationTypeSelector {
        ImplementationTypeSelector {
            plan: self.plan,
            source: self.source,
        }
    }

    /// 切换到另一个程序集
    pub fn from_assembly(self, assembly: Assembly) -> ImplementationTypeSelector {
        ImplementationTypeSelector::start(self.plan, assembly)
    }

    /// 切换到定义类型 `T` 的程序集
    pub fn from_assembly_of<T: ?Sized>(self) -> ImplementationTypeSelector {
        self.from_assembly(Assembly::of::<T>())
    }

    /// 切换到多个程序集
    pub fn from_assemblies(
        self,
        assemblies: impl IntoIterator<Item = Assembly>,
    ) -> ImplementationTypeSelector {
        ImplementationTypeSelector::start_many(self.plan, assemblies)
    }

    /// 切换到一组显式给出的类型
    pub fn from_types(
        self,
        types: impl IntoIterator<Item = TypeDescriptor>,
    ) -> ImplementationTypeSelector {
        self.from_assembly(Assembly::new("<types>").with_types(types))
    }
}

impl From<ImplementationTypeSelector> for ScanPlan {
    fn from(selector: ImplementationTypeSelector) -> Self {
        selector.plan
    }
}

impl From<ServiceTypeSelector> for ScanPlan {
    fn from(selector: ServiceTypeSelector) -> Self {
        selector.as_self().into()
    }
}

impl From<LifetimeSelector> for ScanPlan {
    fn from(selector: LifetimeSelector) -> Self {
        selector.with_transient_lifetime().into()
    }
}

impl From<CompletedScan> for ScanPlan {
    fn from(scan: CompletedScan) -> Self {
        scan.plan
    }
}
