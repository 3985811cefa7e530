//! 类型层次结构索引

use di_abstractions::TypeHierarchy;
use infrastructure_common::{TypeArg, TypeDescriptor, TypeRef};
use std::collections::{HashMap, VecDeque};

/// 基类链的最大深度，超过即视为循环声明
const MAX_BASE_DEPTH: usize = 64;

/// 接口继承展开的最大深度，防止自引用泛型接口无限展开
const MAX_INTERFACE_DEPTH: usize = 64;

type DefinitionKey = (String, String, usize);

fn definition_key(type_ref: &TypeRef) -> DefinitionKey {
    (type_ref.namespace.clone(), type_ref.name.clone(), type_ref.arity())
}

/// 类型层次结构索引
///
/// 按泛型定义索引一组描述符，沿基类链展开接口时替换泛型实参。
/// 同一泛型定义出现多次时以第一次出现为准。
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    types: Vec<TypeDescriptor>,
    by_definition: HashMap<DefinitionKey, usize>,
}

impl TypeIndex {
    pub fn new(types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut index = Self::default();
        index.extend(types);
        index
    }

    /// 追加描述符
    pub fn extend(&mut self, types: impl IntoIterator<Item = TypeDescriptor>) {
        for descriptor in types {
            let key = definition_key(&descriptor.type_ref());
            if self.by_definition.contains_key(&key) {
                continue;
            }
            self.by_definition.insert(key, self.types.len());
            self.types.push(descriptor);
        }
    }

    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// 描述符泛型参数到引用实参的绑定
fn bindings(descriptor: &TypeDescriptor, type_ref: &TypeRef) -> HashMap<String, TypeArg> {
    if descriptor.generic_params.len() != type_ref.args.len() {
        return HashMap::new();
    }
    descriptor
        .generic_params
        .iter()
        .cloned()
        .zip(type_ref.args.iter().cloned())
        .collect()
}

impl TypeHierarchy for TypeIndex {
    fn find(&self, type_ref: &TypeRef) -> Option<&TypeDescriptor> {
        self.by_definition
            .get(&definition_key(type_ref))
            .map(|&position| &self.types[position])
    }

    fn base_types(&self, descriptor: &TypeDescriptor) -> Vec<TypeRef> {
        let mut chain: Vec<TypeRef> = Vec::new();
        let mut current = descriptor.base.clone();

        while let Some(base) = current {
            if chain.contains(&base) || chain.len() >= MAX_BASE_DEPTH {
                break;
            }
            current = self.find(&base).and_then(|base_descriptor| {
                base_descriptor
                    .base
                    .as_ref()
                    .map(|next| next.substitute(&bindings(base_descriptor, &base)))
            });
            chain.push(base);
        }
        chain
    }

    fn implemented_interfaces(&self, descriptor: &TypeDescriptor) -> Vec<TypeRef> {
        let mut pending: VecDeque<(TypeRef, usize)> =
            descriptor.interfaces.iter().map(|interface| (interface.clone(), 0)).collect();
        for base in self.base_types(descriptor) {
            if let Some(base_descriptor) = self.find(&base) {
                let bound = bindings(base_descriptor, &base);
                pending.extend(
                    base_descriptor
                        .interfaces
                        .iter()
                        .map(|interface| (interface.substitute(&bound), 0)),
                );
            }
        }

        let mut interfaces: Vec<TypeRef> = Vec::new();
        while let Some((interface, depth)) = pending.pop_front() {
            if interfaces.contains(&interface) {
                continue;
            }
            if depth < MAX_INTERFACE_DEPTH {
                if let Some(declared) = self.find(&interface).filter(|d| d.is_interface()) {
                    let bound = bindings(declared, &interface);
                    pending.extend(
                        declared
                            .interfaces
                            .iter()
                            .map(|parent| (parent.substitute(&bound), depth + 1)),
                    );
                }
            }
            interfaces.push(interface);
        }
        interfaces
    }
}
