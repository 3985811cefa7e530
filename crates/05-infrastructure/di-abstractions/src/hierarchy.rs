//! 类型层次结构抽象接口

use infrastructure_common::{TypeDescriptor, TypeRef};

/// 类型层次结构 trait
///
/// 负责基类链和接口继承的展开，泛型实参沿继承链替换。
pub trait TypeHierarchy {
    /// 按泛型定义查找描述符
    fn find(&self, type_ref: &TypeRef) -> Option<&TypeDescriptor>;

    /// 基类链，由近及远
    fn base_types(&self, descriptor: &TypeDescriptor) -> Vec<TypeRef>;

    /// 实现的全部接口，包括经由基类和接口继承得到的接口，按声明顺序去重
    fn implemented_interfaces(&self, descriptor: &TypeDescriptor) -> Vec<TypeRef>;

    /// 查找与目标匹配的自身、基类或接口
    ///
    /// 目标为开放泛型定义时比较泛型定义，否则要求完全相等。
    fn matching_ancestor(&self, descriptor: &TypeDescriptor, target: &TypeRef) -> Option<TypeRef> {
        let matches = |candidate: &TypeRef| {
            if target.is_definition() {
                candidate.same_definition(target)
            } else {
                candidate == target
            }
        };

        std::iter::once(descriptor.type_ref())
            .chain(self.base_types(descriptor))
            .chain(self.implemented_interfaces(descriptor))
            .find(|candidate| matches(candidate))
    }

    /// 是否可以赋值给目标类型
    fn is_assignable_to(&self, descriptor: &TypeDescriptor, target: &TypeRef) -> bool {
        self.matching_ancestor(descriptor, target).is_some()
    }
}
