//! 实现类型过滤器
//!
//! 所有条件按逻辑与组合，`assignable_to_any` 在单个条件内部按逻辑或匹配。

use di_abstractions::{TypeFilter, TypeHierarchy};
use infrastructure_common::{TypeDescriptor, TypeRef};
use std::fmt;
use std::sync::Arc;

/// 自定义过滤条件
pub type TypePredicate = Arc<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>;

#[derive(Clone)]
enum Condition {
    AssignableTo(TypeRef),
    AssignableToAny(Vec<TypeRef>),
    WithAttribute(String),
    WithoutAttribute(String),
    InNamespaces(Vec<String>),
    InExactNamespaces(Vec<String>),
    NotInNamespaces(Vec<String>),
    Custom(TypePredicate),
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::AssignableTo(target) => f.debug_tuple("AssignableTo").field(target).finish(),
            Condition::AssignableToAny(targets) => {
                f.debug_tuple("AssignableToAny").field(targets).finish()
            }
            Condition::WithAttribute(name) => f.debug_tuple("WithAttribute").field(name).finish(),
            Condition::WithoutAttribute(name) => {
                f.debug_tuple("WithoutAttribute").field(name).finish()
            }
            Condition::InNamespaces(names) => f.debug_tuple("InNamespaces").field(names).finish(),
            Condition::InExactNamespaces(names) => {
                f.debug_tuple("InExactNamespaces").field(names).finish()
            }
            Condition::NotInNamespaces(names) => {
                f.debug_tuple("NotInNamespaces").field(names).finish()
            }
            Condition::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// 命名空间相同或位于其下
fn is_in_namespace(namespace: &str, parent: &str) -> bool {
    namespace == parent
        || namespace
            .strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// 候选类型对目标类型的可赋值判断
///
/// 目标为开放泛型定义时，自身带未解析泛型参数的候选类型不参与匹配。
fn assignable(candidate: &TypeDescriptor, target: &TypeRef, hierarchy: &dyn TypeHierarchy) -> bool {
    if target.is_definition() && candidate.is_open_generic() {
        return false;
    }
    hierarchy.is_assignable_to(candidate, target)
}

impl Condition {
    fn matches(&self, candidate: &TypeDescriptor, hierarchy: &dyn TypeHierarchy) -> bool {
        match self {
            Condition::AssignableTo(target) => assignable(candidate, target, hierarchy),
            Condition::AssignableToAny(targets) => targets
                .iter()
                .any(|target| assignable(candidate, target, hierarchy)),
            Condition::WithAttribute(name) => candidate.has_attribute(name),
            Condition::WithoutAttribute(name) => !candidate.has_attribute(name),
            Condition::InNamespaces(names) => names
                .iter()
                .any(|name| is_in_namespace(&candidate.namespace, name)),
            Condition::InExactNamespaces(names) => {
                names.iter().any(|name| candidate.namespace == *name)
            }
            Condition::NotInNamespaces(names) => !names
                .iter()
                .any(|name| is_in_namespace(&candidate.namespace, name)),
            Condition::Custom(predicate) => predicate(candidate),
        }
    }
}

/// 实现类型过滤器
///
/// 只考虑非抽象类；默认还要求类型公开。
#[derive(Debug, Clone, Default)]
pub struct ImplementationTypeFilter {
    conditions: Vec<Condition>,
    include_non_public: bool,
}

impl ImplementationTypeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同时考虑非公开类型
    pub fn include_non_public(mut self) -> Self {
        self.include_non_public = true;
        self
    }

    /// 可以赋值给指定类型（接口、类或开放泛型定义）
    pub fn assignable_to(mut self, target: TypeRef) -> Self {
        self.conditions.push(Condition::AssignableTo(target));
        self
    }

    /// 可以赋值给 Rust 类型 `T`
    pub fn assignable_to_type<T: ?Sized>(self) -> Self {
        self.assignable_to(TypeRef::of::<T>())
    }

    /// 可以赋值给任意一个指定类型
    pub fn assignable_to_any(mut self, targets: impl IntoIterator<Item = TypeRef>) -> Self {
        self.conditions
            .push(Condition::AssignableToAny(targets.into_iter().collect()));
        self
    }

    /// 带有指定属性
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.conditions.push(Condition::WithAttribute(attribute.into()));
        self
    }

    /// 不带指定属性
    pub fn without_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.conditions.push(Condition::WithoutAttribute(attribute.into()));
        self
    }

    /// 位于指定命名空间或其子命名空间
    pub fn in_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition::InNamespaces(
            namespaces.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// 与指定类型位于同一命名空间或其子命名空间
    pub fn in_namespace_of(self, descriptor: &TypeDescriptor) -> Self {
        self.in_namespaces([descriptor.namespace.clone()])
    }

    /// 恰好位于指定命名空间
    pub fn in_exact_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition::InExactNamespaces(
            namespaces.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// 恰好位于指定类型的命名空间
    pub fn in_exact_namespace_of(self, descriptor: &TypeDescriptor) -> Self {
        self.in_exact_namespaces([descriptor.namespace.clone()])
    }

    /// 不在指定命名空间及其子命名空间
    pub fn not_in_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(Condition::NotInNamespaces(
            namespaces.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// 不在指定类型的命名空间及其子命名空间
    pub fn not_in_namespace_of(self, descriptor: &TypeDescriptor) -> Self {
        self.not_in_namespaces([descriptor.namespace.clone()])
    }

    /// 自定义条件
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.conditions.push(Condition::Custom(Arc::new(predicate)));
        self
    }

    /// 条件个数
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn is_candidate(&self, descriptor: &TypeDescriptor) -> bool {
        descriptor.is_class()
            && !descriptor.is_abstract
            && (self.include_non_public || descriptor.is_public())
    }
}

impl TypeFilter for ImplementationTypeFilter {
    fn matches(&self, candidate: &TypeDescriptor, hierarchy: &dyn TypeHierarchy) -> bool {
        self.is_candidate(candidate)
            && self
                .conditions
                .iter()
                .all(|condition| condition.matches(candidate, hierarchy))
    }
}
