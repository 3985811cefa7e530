//! 程序集（类型来源）实现
//!
//! 一个程序集对应一个 crate，保存按声明顺序排列的类型描述符。
//! 描述符可以手工添加，也可以从全局类型目录读取。

use di_abstractions::{ScanTarget, TypeSource};
use infrastructure_common::{
    crate_name_of, registered_types, ScanError, ScanResult, TypeDescriptor, TypeRef,
};

/// 程序集
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    name: String,
    types: Vec<TypeDescriptor>,
}

impl Assembly {
    /// 创建空程序集
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// 定义类型 `T` 的程序集，内容来自全局类型目录
    pub fn of<T: ?Sized>() -> Self {
        let type_ref = TypeRef::of::<T>();
        Self::named(crate_name_of(&type_ref.namespace))
    }

    /// 按 crate 名称从全局类型目录读取程序集
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let types = registered_types(&name);
        Self { name, types }
    }

    /// 按扫描目标读取程序集
    pub fn from_target(target: &ScanTarget) -> Self {
        Self::named(target.crate_name())
    }

    /// 添加类型（构建器方式）
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.add_type(descriptor);
        self
    }

    /// 批量添加类型
    pub fn with_types(mut self, descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.types.extend(descriptors);
        self
    }

    /// 添加类型
    pub fn add_type(&mut self, descriptor: TypeDescriptor) {
        self.types.push(descriptor);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 全部类型，按声明顺序
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// 取出全部类型
    pub fn into_types(self) -> Vec<TypeDescriptor> {
        self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// 按简短名称查找类型，重名时返回第一个
    pub fn find(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|descriptor| descriptor.name == name)
    }

    /// 按泛型定义查找类型
    pub fn find_type(&self, type_ref: &TypeRef) -> Option<&TypeDescriptor> {
        self.types
            .iter()
            .find(|descriptor| descriptor.type_ref().same_definition(type_ref))
    }

    /// 按简短名称获取接口的类型引用，泛型接口返回开放泛型定义
    pub fn contract(&self, name: &str) -> Option<TypeRef> {
        self.types
            .iter()
            .find(|descriptor| descriptor.is_interface() && descriptor.name == name)
            .map(|descriptor| descriptor.type_ref().definition())
            .or_else(|| {
                self.find(name)
                    .map(|descriptor| descriptor.type_ref().definition())
            })
    }

    /// 解析配置中的类型名称
    ///
    /// 带路径的名称相对于 crate 根解析。不带路径的名称（包括泛型实参中的）
    /// 在 crate 根找不到时，按简短名称和泛型参数个数在整个程序集中查找，要求唯一。
    pub fn resolve_type_name(&self, text: &str) -> ScanResult<TypeRef> {
        TypeRef::parse_with(&self.name, text, &[], |name, arity| self.locate(text, name, arity))
    }

    fn locate(&self, text: &str, name: &str, arity: usize) -> ScanResult<String> {
        if self
            .find_type(&TypeRef::open_definition(self.name.as_str(), name, arity))
            .is_some()
        {
            return Ok(self.name.clone());
        }

        let candidates: Vec<&TypeDescriptor> = self
            .types
            .iter()
            .filter(|descriptor| {
                descriptor.name == name && descriptor.generic_params.len() == arity
            })
            .collect();

        match candidates.as_slice() {
            [single] => Ok(single.namespace.clone()),
            [] => Err(ScanError::TypeNotFound {
                name: text.to_string(),
                assembly: self.name.clone(),
            }),
            many => Err(ScanError::AmbiguousTypeName {
                name: text.to_string(),
                assembly: self.name.clone(),
                candidates: many.iter().map(|descriptor| descriptor.full_name()).collect(),
            }),
        }
    }
}

impl TypeSource for Assembly {
    fn name(&self) -> &str {
        &self.name
    }

    fn types(&self) -> Vec<TypeDescriptor> {
        self.types.clone()
    }

    fn find_ref(&self, type_ref: &TypeRef) -> Option<TypeDescriptor> {
        self.find_type(type_ref).cloned()
    }
}
