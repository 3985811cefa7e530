//! 服务契约选择策略

use crate::attributes::AttributeSelector;
use di_abstractions::{ContractSelector, SelectedService, TypeHierarchy};
use infrastructure_common::{ScanError, ScanResult, TypeDescriptor, TypeRef};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 接口过滤条件
pub type InterfacePredicate = Arc<dyn Fn(&TypeRef) -> bool + Send + Sync>;

/// 匹配接口的附加条件，参数为 (类, 接口)
pub type MatchingPredicate = Arc<dyn Fn(&TypeDescriptor, &TypeRef) -> bool + Send + Sync>;

/// 由调用方计算服务类型
pub type ServiceTypesFn = Arc<dyn Fn(&TypeDescriptor) -> Vec<TypeRef> + Send + Sync>;

/// 服务契约选择策略
#[derive(Clone, Default)]
pub enum ServiceTypeSelection {
    /// 注册为自身
    #[default]
    AsSelf,
    /// 注册为指定的服务类型
    Contracts(Vec<TypeRef>),
    /// 注册为实现的全部接口
    ImplementedInterfaces(Option<InterfacePredicate>),
    /// 注册为名为 `I{类名}` 的接口
    MatchingInterface(Option<MatchingPredicate>),
    /// 注册为自身，并把实现的接口转发到自身
    SelfWithInterfaces,
    /// 由调用方计算服务类型
    Selected(ServiceTypesFn),
    /// 按类型上的服务注册标注
    Attributes,
}

impl fmt::Debug for ServiceTypeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceTypeSelection::AsSelf => f.write_str("AsSelf"),
            ServiceTypeSelection::Contracts(contracts) => {
                f.debug_tuple("Contracts").field(contracts).finish()
            }
            ServiceTypeSelection::ImplementedInterfaces(predicate) => f
                .debug_tuple("ImplementedInterfaces")
                .field(&predicate.is_some())
                .finish(),
            ServiceTypeSelection::MatchingInterface(predicate) => f
                .debug_tuple("MatchingInterface")
                .field(&predicate.is_some())
                .finish(),
            ServiceTypeSelection::SelfWithInterfaces => f.write_str("SelfWithInterfaces"),
            ServiceTypeSelection::Selected(_) => f.write_str("Selected(..)"),
            ServiceTypeSelection::Attributes => f.write_str("Attributes"),
        }
    }
}

/// 可作为服务类型的接口（排除内置标记 trait）
pub(crate) fn service_interfaces(
    class: &TypeDescriptor,
    hierarchy: &dyn TypeHierarchy,
) -> Vec<TypeRef> {
    hierarchy
        .implemented_interfaces(class)
        .into_iter()
        .filter(|interface| !interface.is_builtin())
        .collect()
}

/// 确定显式服务类型
///
/// 开放泛型定义按类实际实现的封闭类型注册；类不能赋值给服务类型时报错。
pub(crate) fn resolve_contract(
    class: &TypeDescriptor,
    contract: &TypeRef,
    hierarchy: &dyn TypeHierarchy,
) -> ScanResult<TypeRef> {
    match hierarchy.matching_ancestor(class, contract) {
        Some(found) if contract.is_definition() => Ok(found),
        Some(_) => Ok(contract.clone()),
        None => Err(ScanError::NotAssignable {
            implementation: class.to_string(),
            service_type: contract.to_string(),
        }),
    }
}

impl ServiceTypeSelection {
    fn select_contracts(
        class: &TypeDescriptor,
        contracts: &[TypeRef],
        hierarchy: &dyn TypeHierarchy,
    ) -> ScanResult<Vec<SelectedService>> {
        let implementation = class.type_ref();
        let mut selected: Vec<SelectedService> = Vec::with_capacity(contracts.len());
        for contract in contracts {
            let service_type = resolve_contract(class, contract, hierarchy)?;
            if selected.iter().any(|s| s.service_type == service_type) {
                continue;
            }
            selected.push(SelectedService::of_type(service_type, implementation.clone()));
        }
        Ok(selected)
    }
}

impl ContractSelector for ServiceTypeSelection {
    fn select(
        &self,
        class: &TypeDescriptor,
        hierarchy: &dyn TypeHierarchy,
    ) -> ScanResult<Vec<SelectedService>> {
        if class.is_open_generic() {
            debug!("跳过开放泛型实现: {}", class);
            return Ok(Vec::new());
        }

        let implementation = class.type_ref();
        let selected = match self {
            ServiceTypeSelection::AsSelf => {
                vec![SelectedService::of_type(implementation.clone(), implementation)]
            }
            ServiceTypeSelection::Contracts(contracts) => {
                Self::select_contracts(class, contracts, hierarchy)?
            }
            ServiceTypeSelection::ImplementedInterfaces(predicate) => {
                service_interfaces(class, hierarchy)
                    .into_iter()
                    .filter(|interface| predicate.as_ref().map_or(true, |p| p(interface)))
                    .map(|interface| SelectedService::of_type(interface, implementation.clone()))
                    .collect()
            }
            ServiceTypeSelection::MatchingInterface(predicate) => {
                let expected = format!("I{}", class.name);
                service_interfaces(class, hierarchy)
                    .into_iter()
                    .filter(|interface| interface.name == expected)
                    .filter(|interface| predicate.as_ref().map_or(true, |p| p(class, interface)))
                    .map(|interface| SelectedService::of_type(interface, implementation.clone()))
                    .collect()
            }
            ServiceTypeSelection::SelfWithInterfaces => {
                let mut selected =
                    vec![SelectedService::of_type(implementation.clone(), implementation.clone())];
                selected.extend(service_interfaces(class, hierarchy).into_iter().map(
                    |interface| SelectedService::forwarded(interface, implementation.clone()),
                ));
                selected
            }
            ServiceTypeSelection::Selected(select) => {
                Self::select_contracts(class, &select(class), hierarchy)?
            }
            ServiceTypeSelection::Attributes => {
                return AttributeSelector.select(class, hierarchy);
            }
        };

        if selected.is_empty() {
            debug!("类型 {} 没有选出任何服务类型", class);
        }
        Ok(selected)
    }
}
