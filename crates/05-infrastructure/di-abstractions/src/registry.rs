//! 服务注册表抽象接口

use infrastructure_common::{Lifetime, RegistrationError, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务实现
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Implementation {
    /// 直接由实现类型提供
    Type(TypeRef),
    /// 转发到该实现类型自身的注册
    Forwarded(TypeRef),
}

impl Implementation {
    /// 实现类型
    pub fn type_ref(&self) -> &TypeRef {
        match self {
            Implementation::Type(type_ref) | Implementation::Forwarded(type_ref) => type_ref,
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::Type(type_ref) => type_ref.fmt(f),
            Implementation::Forwarded(type_ref) => write!(f, "=> {type_ref}"),
        }
    }
}

/// 服务描述符
///
/// 即一条注册记录 (服务类型, 实现类型, 生命周期)，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// 服务类型
    pub service_type: TypeRef,
    /// 实现
    pub implementation: Implementation,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl ServiceDescriptor {
    /// 创建服务描述符
    pub fn new(service_type: TypeRef, implementation_type: TypeRef, lifetime: Lifetime) -> Self {
        Self {
            service_type,
            implementation: Implementation::Type(implementation_type),
            lifetime,
        }
    }

    /// 创建瞬时服务描述符
    pub fn transient(service_type: TypeRef, implementation_type: TypeRef) -> Self {
        Self::new(service_type, implementation_type, Lifetime::Transient)
    }

    /// 创建作用域服务描述符
    pub fn scoped(service_type: TypeRef, implementation_type: TypeRef) -> Self {
        Self::new(service_type, implementation_type, Lifetime::Scoped)
    }

    /// 创建单例服务描述符
    pub fn singleton(service_type: TypeRef, implementation_type: TypeRef) -> Self {
        Self::new(service_type, implementation_type, Lifetime::Singleton)
    }

    /// 实现类型
    pub fn implementation_type(&self) -> &TypeRef {
        self.implementation.type_ref()
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.service_type, self.implementation, self.lifetime
        )
    }
}

/// 替换行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementBehavior {
    /// 替换相同服务类型的注册
    #[default]
    ServiceType,
    /// 替换相同实现类型的注册
    ImplementationType,
    /// 两者之一相同即替换
    All,
}

impl ReplacementBehavior {
    /// 已有注册是否应被新注册替换
    pub fn replaces(&self, existing: &ServiceDescriptor, incoming: &ServiceDescriptor) -> bool {
        let same_service = existing.service_type == incoming.service_type;
        let same_implementation = existing.implementation_type() == incoming.implementation_type();
        match self {
            ReplacementBehavior::ServiceType => same_service,
            ReplacementBehavior::ImplementationType => same_implementation,
            ReplacementBehavior::All => same_service || same_implementation,
        }
    }
}

/// 注册策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStrategy {
    /// 直接追加，不去重
    #[default]
    Append,
    /// 服务类型已注册时跳过
    Skip,
    /// 移除匹配的已有注册后追加
    Replace(ReplacementBehavior),
    /// 服务类型已注册时报错
    Throw,
}

/// 服务注册表 trait
///
/// 注册表保持提交顺序，按服务类型查询时返回的注册与提交顺序一致。
pub trait ServiceRegistry {
    /// 按策略注册服务，返回是否实际追加
    fn register(
        &mut self,
        descriptor: ServiceDescriptor,
        strategy: RegistrationStrategy,
    ) -> Result<bool, RegistrationError>;

    /// 全部服务描述符
    fn descriptors(&self) -> &[ServiceDescriptor];

    /// 指定服务类型的全部注册
    fn descriptors_for(&self, service_type: &TypeRef) -> Vec<&ServiceDescriptor> {
        self.descriptors()
            .iter()
            .filter(|descriptor| &descriptor.service_type == service_type)
            .collect()
    }

    /// 服务类型是否已注册
    fn is_registered(&self, service_type: &TypeRef) -> bool {
        self.descriptors()
            .iter()
            .any(|descriptor| &descriptor.service_type == service_type)
    }
}
