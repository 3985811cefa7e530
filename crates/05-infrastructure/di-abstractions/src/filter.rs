//! 类型过滤抽象接口

use crate::hierarchy::TypeHierarchy;
use infrastructure_common::TypeDescriptor;

/// 类型过滤器 trait
///
/// 纯函数，不产生副作用。多个过滤器按逻辑与组合。
pub trait TypeFilter: Send + Sync {
    /// 候选类型是否满足条件
    fn matches(&self, candidate: &TypeDescriptor, hierarchy: &dyn TypeHierarchy) -> bool;
}

impl<F> TypeFilter for F
where
    F: Fn(&TypeDescriptor, &dyn TypeHierarchy) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &TypeDescriptor, hierarchy: &dyn TypeHierarchy) -> bool {
        self(candidate, hierarchy)
    }
}

/// 按顺序过滤候选类型，保持输入顺序
pub fn filter_types<'a>(
    candidates: impl IntoIterator<Item = &'a TypeDescriptor>,
    filter: &dyn TypeFilter,
    hierarchy: &dyn TypeHierarchy,
) -> Vec<&'a TypeDescriptor> {
    candidates
        .into_iter()
        .filter(|candidate| filter.matches(candidate, hierarchy))
        .collect()
}
