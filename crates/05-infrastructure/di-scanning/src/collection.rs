//! 服务集合与服务提供者

use crate::scan::ScanPlan;
use di_abstractions::{RegistrationStrategy, ServiceDescriptor, ServiceRegistry};
use infrastructure_common::{BuildError, BuildResult, RegistrationError, ScanResult, TypeRef};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// 服务集合
///
/// 按提交顺序保存服务描述符，不做去重，除非注册时指定了其他策略。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加服务描述符
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        debug!("添加服务: {}", descriptor);
        self.descriptors.push(descriptor);
        self
    }

    /// 服务类型尚未注册时追加，返回是否追加
    pub fn try_add(&mut self, descriptor: ServiceDescriptor) -> bool {
        if self.contains(&descriptor.service_type) {
            debug!("服务类型已注册，跳过: {}", descriptor);
            return false;
        }
        self.add(descriptor);
        true
    }

    /// 服务类型是否已注册
    pub fn contains(&self, service_type: &TypeRef) -> bool {
        self.is_registered(service_type)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.descriptors.iter()
    }

    /// 执行扫描计划，返回新增的注册数
    ///
    /// 扫描要么全部生效，要么在出错时保持集合不变。
    pub fn scan(&mut self, plan: impl Into<ScanPlan>) -> ScanResult<usize> {
        let plan = plan.into();
        let mut staged = self.clone();
        let added = plan.execute(&mut staged)?;
        *self = staged;
        Ok(added)
    }

    /// 构建服务提供者
    ///
    /// 开放泛型只能通过手工添加进入集合，构建时才会报错。
    pub fn build_service_provider(&self) -> BuildResult<ServiceProvider> {
        for descriptor in &self.descriptors {
            let implementation = descriptor.implementation_type();
            if implementation.is_open() {
                return Err(BuildError::OpenGenericImplementation {
                    service_type: descriptor.service_type.to_string(),
                    implementation: implementation.to_string(),
                });
            }
            if descriptor.service_type.is_open() {
                return Err(BuildError::OpenGenericServiceType {
                    service_type: descriptor.service_type.to_string(),
                    implementation: implementation.to_string(),
                });
            }
        }

        let provider = ServiceProvider::new(self.descriptors.clone());
        info!(
            "服务提供者构建完成: {} 个注册, {} 个服务类型",
            provider.len(),
            provider.service_types().len()
        );
        Ok(provider)
    }
}

impl ServiceRegistry for ServiceCollection {
    fn register(
        &mut self,
        descriptor: ServiceDescriptor,
        strategy: RegistrationStrategy,
    ) -> Result<bool, RegistrationError> {
        match strategy {
            RegistrationStrategy::Append => {
                self.add(descriptor);
                Ok(true)
            }
            RegistrationStrategy::Skip => Ok(self.try_add(descriptor)),
            RegistrationStrategy::Replace(behavior) => {
                let before = self.descriptors.len();
                self.descriptors
                    .retain(|existing| !behavior.replaces(existing, &descriptor));
                let removed = before - self.descriptors.len();
                if removed > 0 {
                    warn!("替换 {} 个已有注册: {}", removed, descriptor);
                }
                self.add(descriptor);
                Ok(true)
            }
            RegistrationStrategy::Throw => {
                if self.contains(&descriptor.service_type) {
                    return Err(RegistrationError::Duplicate {
                        service_type: descriptor.service_type.to_string(),
                    });
                }
                self.add(descriptor);
                Ok(true)
            }
        }
    }

    fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<ServiceDescriptor> for ServiceCollection {
    fn extend<T: IntoIterator<Item = ServiceDescriptor>>(&mut self, iter: T) {
        for descriptor in iter {
            self.add(descriptor);
        }
    }
}

/// 服务提供者
///
/// 只按服务类型索引注册，不创建实例。
#[derive(Debug, Clone, Default)]
pub struct ServiceProvider {
    descriptors: Vec<ServiceDescriptor>,
    by_service_type: HashMap<TypeRef, Vec<usize>>,
    service_types: Vec<TypeRef>,
}

impl ServiceProvider {
    fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        let mut by_service_type: HashMap<TypeRef, Vec<usize>> = HashMap::new();
        let mut service_types = Vec::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            let entries = by_service_type
                .entry(descriptor.service_type.clone())
                .or_default();
            if entries.is_empty() {
                service_types.push(descriptor.service_type.clone());
            }
            entries.push(position);
        }
        Self {
            descriptors,
            by_service_type,
            service_types,
        }
    }

    /// 指定服务类型的生效注册（最后一次注册）
    pub fn get(&self, service_type: &TypeRef) -> Option<&ServiceDescriptor> {
        self.by_service_type
            .get(service_type)
            .and_then(|positions| positions.last())
            .map(|&position| &self.descriptors[position])
    }

    /// 指定服务类型的全部注册，按注册顺序
    pub fn get_all(&self, service_type: &TypeRef) -> Vec<&ServiceDescriptor> {
        self.by_service_type
            .get(service_type)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &self.descriptors[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 全部服务类型，按首次注册顺序
    pub fn service_types(&self) -> &[TypeRef] {
        &self.service_types
    }

    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
