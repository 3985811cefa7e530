//! 全局类型目录
//!
//! `service-macros` 生成的注册函数在程序启动前把类型描述符写入这里，
//! 扫描时按 crate 名称（即程序集）读取。

use crate::metadata::TypeDescriptor;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::trace;

/// 全局类型目录
static GLOBAL_TYPE_CATALOG: Lazy<RwLock<Vec<TypeDescriptor>>> =
    Lazy::new(|| RwLock::new(Vec::new()));

/// 注册类型描述符
pub fn register_type_descriptor(descriptor: TypeDescriptor) {
    trace!("注册类型描述符: {}", descriptor);
    GLOBAL_TYPE_CATALOG.write().push(descriptor);
}

/// 获取指定 crate 中注册的全部类型，按声明位置排序
///
/// 同一文件内按行号排序；没有位置信息的描述符保持注册顺序并排在最后。
pub fn registered_types(crate_name: &str) -> Vec<TypeDescriptor> {
    let mut types: Vec<TypeDescriptor> = GLOBAL_TYPE_CATALOG
        .read()
        .iter()
        .filter(|descriptor| descriptor.crate_name() == crate_name)
        .cloned()
        .collect();

    types.sort_by(|a, b| match (&a.location, &b.location) {
        (Some(left), Some(right)) => left.cmp(right),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    types
}

/// 获取所有注册过类型的 crate 名称
pub fn registered_crates() -> Vec<String> {
    let mut crates: Vec<String> = GLOBAL_TYPE_CATALOG
        .read()
        .iter()
        .map(|descriptor| descriptor.crate_name().to_string())
        .collect();
    crates.sort();
    crates.dedup();
    crates
}
