//! 服务契约选择抽象接口

use crate::hierarchy::TypeHierarchy;
use crate::registry::Implementation;
use infrastructure_common::{Lifetime, ScanResult, TypeDescriptor, TypeRef};

/// 选出的服务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedService {
    /// 服务类型
    pub service_type: TypeRef,
    /// 实现
    pub implementation: Implementation,
    /// 选择器自带的生命周期（属性标注），为空时使用当前步骤的生命周期
    pub lifetime: Option<Lifetime>,
}

impl SelectedService {
    /// 以类型本身作为实现
    pub fn of_type(service_type: TypeRef, implementation: TypeRef) -> Self {
        Self {
            service_type,
            implementation: Implementation::Type(implementation),
            lifetime: None,
        }
    }

    /// 转发到已注册的实现
    pub fn forwarded(service_type: TypeRef, implementation: TypeRef) -> Self {
        Self {
            service_type,
            implementation: Implementation::Forwarded(implementation),
            lifetime: None,
        }
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }
}

/// 服务契约选择器 trait
///
/// 为每个匹配的类确定零个或多个服务类型，不直接写入注册表。
pub trait ContractSelector: Send + Sync {
    /// 选择服务类型
    fn select(
        &self,
        class: &TypeDescriptor,
        hierarchy: &dyn TypeHierarchy,
    ) -> ScanResult<Vec<SelectedService>>;
}
