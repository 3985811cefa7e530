//! 类型来源抽象接口
//!
//! 提供扫描单元（程序集）内类型的枚举能力

use infrastructure_common::{TypeDescriptor, TypeRef};

/// 类型来源 trait
///
/// 一个类型来源对应一个编译单元，按声明顺序返回其中定义的全部类型。
pub trait TypeSource: Send + Sync {
    /// 来源名称（crate 名称）
    fn name(&self) -> &str;

    /// 枚举全部类型
    fn types(&self) -> Vec<TypeDescriptor>;

    /// 按类型引用查找描述符（只比较泛型定义）
    fn find_ref(&self, type_ref: &TypeRef) -> Option<TypeDescriptor> {
        self.types()
            .into_iter()
            .find(|descriptor| descriptor.type_ref().same_definition(type_ref))
    }
}

/// 扫描目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// 按 crate 名称从全局类型目录读取
    Crate(String),
    /// 包含指定类型的 crate
    CrateOf(TypeRef),
}

impl ScanTarget {
    /// 获取扫描目标对应的 crate 名称
    pub fn crate_name(&self) -> &str {
        match self {
            ScanTarget::Crate(name) => name,
            ScanTarget::CrateOf(type_ref) => {
                infrastructure_common::crate_name_of(&type_ref.namespace)
            }
        }
    }
}
