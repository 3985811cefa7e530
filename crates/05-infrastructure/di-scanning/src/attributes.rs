//! 基于服务注册标注的契约选择

use crate::selector::{resolve_contract, service_interfaces};
use di_abstractions::{ContractSelector, SelectedService, TypeHierarchy};
use infrastructure_common::{ScanError, ScanResult, TypeDescriptor, TypeRef};
use tracing::debug;

/// 标注选择器
///
/// 每个 [`ServiceMarker`](infrastructure_common::ServiceMarker) 产生独立的注册，
/// 生命周期取自标注本身。没有指定契约的标注注册为自身、实现的接口和基类型。
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeSelector;

impl AttributeSelector {
    fn default_service_types(
        class: &TypeDescriptor,
        hierarchy: &dyn TypeHierarchy,
    ) -> Vec<TypeRef> {
        std::iter::once(class.type_ref())
            .chain(service_interfaces(class, hierarchy))
            .chain(
                hierarchy
                    .base_types(class)
                    .into_iter()
                    .filter(|base| !base.is_builtin()),
            )
            .collect()
    }
}

impl ContractSelector for AttributeSelector {
    fn select(
        &self,
        class: &TypeDescriptor,
        hierarchy: &dyn TypeHierarchy,
    ) -> ScanResult<Vec<SelectedService>> {
        if class.markers.is_empty() {
            debug!("类型 {} 没有服务注册标注", class);
            return Ok(Vec::new());
        }
        if class.is_open_generic() {
            debug!("跳过开放泛型实现: {}", class);
            return Ok(Vec::new());
        }

        let implementation = class.type_ref();
        let mut selected: Vec<SelectedService> = Vec::new();
        for marker in &class.markers {
            let service_types = match &marker.contract {
                Some(contract) => vec![resolve_contract(class, contract, hierarchy)?],
                None => Self::default_service_types(class, hierarchy),
            };

            for service_type in service_types {
                if selected.iter().any(|s| s.service_type == service_type) {
                    return Err(ScanError::DuplicateMarker {
                        implementation: implementation.to_string(),
                        service_type: service_type.to_string(),
                    });
                }
                selected.push(
                    SelectedService::of_type(service_type, implementation.clone())
                        .with_lifetime(marker.lifetime),
                );
            }
        }
        Ok(selected)
    }
}
