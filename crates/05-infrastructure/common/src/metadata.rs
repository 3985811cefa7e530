//! 类型元数据定义
//!
//! Rust 没有运行时反射，这里的类型描述符就是扫描管道能看到的全部类型信息。
//! 描述符可以手工构建，也可以由 `service-macros` 在编译期生成并注册。

use crate::errors::{ParseError, ParseResult};
use crate::lifecycle::Lifetime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 视为内置类型的名称，解析时不附加命名空间
const BUILTIN_NAMES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
    "f32", "f64", "bool", "char", "str", "String", "Vec", "Option", "Result", "Box", "Rc",
    "Arc", "HashMap", "HashSet", "BTreeMap", "BTreeSet", "Send", "Sync", "Sized", "Unpin",
    "Copy", "Clone", "Debug", "Display", "Default", "PartialEq", "Eq", "Hash", "PartialOrd",
    "Ord", "Drop", "Any",
];

/// 标准库根模块，这些路径下的类型统一归入内置命名空间
const STD_ROOTS: &[&str] = &["std", "core", "alloc"];

/// 泛型实参
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeArg {
    /// 已确定的类型
    Type(TypeRef),
    /// 未解析的泛型参数
    Param(String),
}

impl TypeArg {
    /// 是否包含未解析的泛型参数
    pub fn is_open(&self) -> bool {
        match self {
            TypeArg::Type(type_ref) => type_ref.is_open(),
            TypeArg::Param(_) => true,
        }
    }

    fn substitute(&self, bindings: &HashMap<String, TypeArg>) -> TypeArg {
        match self {
            TypeArg::Type(type_ref) => TypeArg::Type(type_ref.substitute(bindings)),
            TypeArg::Param(name) => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| TypeArg::Param(name.clone())),
        }
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Type(type_ref) => type_ref.fmt(f),
            TypeArg::Param(name) => f.write_str(name),
        }
    }
}

/// 类型引用
///
/// 命名空间为空表示内置类型（基本类型和标准库类型）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// 命名空间（模块路径）
    pub namespace: String,
    /// 简短类型名称
    pub name: String,
    /// 泛型实参
    pub args: Vec<TypeArg>,
}

impl TypeRef {
    /// 创建非泛型类型引用
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// 创建开放泛型定义，参数按位置命名为 `T0`、`T1` ...
    pub fn open_definition(
        namespace: impl Into<String>,
        name: impl Into<String>,
        arity: usize,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            args: (0..arity).map(|i| TypeArg::Param(format!("T{i}"))).collect(),
        }
    }

    /// 添加已确定的泛型实参
    pub fn with_arg(mut self, arg: TypeRef) -> Self {
        self.args.push(TypeArg::Type(arg));
        self
    }

    /// 添加未解析的泛型参数
    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        self.args.push(TypeArg::Param(name.into()));
        self
    }

    /// 从 Rust 类型获取类型引用
    ///
    /// 基于 [`std::any::type_name`]，trait object 会去掉 `dyn` 前缀和附加约束。
    pub fn of<T: ?Sized>() -> Self {
        Self::from_type_name(std::any::type_name::<T>())
    }

    /// 从完整类型名称创建类型引用
    pub fn from_type_name(full_name: &str) -> Self {
        let cleaned = strip_trait_object_bounds(full_name.trim());
        Self::parse_in("", &cleaned, &[]).unwrap_or_else(|_| Self::new("", cleaned))
    }

    /// 在指定命名空间下解析类型名称
    ///
    /// 支持 `Name`、`a::b::Name`、`crate::x::Name`、`super::Name` 以及泛型实参，
    /// 例如 `IQueryHandler<T, i32>`。与 `generic_params` 同名的实参解析为泛型参数，
    /// `_` 解析为匿名泛型参数，因此 `IQueryHandler<_, _>` 表示开放泛型定义。
    pub fn parse_in(namespace: &str, text: &str, generic_params: &[String]) -> ParseResult<Self> {
        Self::parse_with(namespace, text, generic_params, |_, _| Ok(namespace.to_string()))
    }

    /// 解析类型名称，不带路径的非内置名称由 `locate` 决定命名空间
    ///
    /// `locate` 接收简短名称和泛型实参个数，泛型实参中的名称同样经过它。
    /// 带路径的名称按 [`TypeRef::parse_in`] 的规则相对 `namespace` 解析。
    pub fn parse_with<E, F>(
        namespace: &str,
        text: &str,
        generic_params: &[String],
        mut locate: F,
    ) -> Result<Self, E>
    where
        E: From<ParseError>,
        F: FnMut(&str, usize) -> Result<String, E>,
    {
        let tokens = tokenize(text)?;
        let mut parser = RawPathParser {
            text,
            tokens: &tokens,
            position: 0,
        };
        let raw = parser.parse_path()?;
        if parser.position != tokens.len() {
            return Err(ParseError::invalid_type_name(text, "类型名称后存在多余内容").into());
        }

        match raw.resolve(text, namespace, generic_params, 0, &mut locate)? {
            TypeArg::Type(type_ref) => Ok(type_ref),
            TypeArg::Param(name) => Err(ParseError::invalid_type_name(
                text,
                format!("泛型参数 {name} 不能作为独立类型"),
            )
            .into()),
        }
    }

    /// 是否为泛型类型
    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// 泛型参数个数
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// 是否包含未解析的泛型参数
    pub fn is_open(&self) -> bool {
        self.args.iter().any(TypeArg::is_open)
    }

    /// 是否为开放泛型定义（所有实参都是泛型参数）
    pub fn is_definition(&self) -> bool {
        self.is_generic() && self.args.iter().all(|arg| matches!(arg, TypeArg::Param(_)))
    }

    /// 获取对应的开放泛型定义
    pub fn definition(&self) -> TypeRef {
        Self::open_definition(self.namespace.clone(), self.name.clone(), self.arity())
    }

    /// 是否与另一个类型引用具有相同的泛型定义
    pub fn same_definition(&self, other: &TypeRef) -> bool {
        self.namespace == other.namespace
            && self.name == other.name
            && self.arity() == other.arity()
    }

    /// 是否为内置类型
    pub fn is_builtin(&self) -> bool {
        self.namespace.is_empty()
    }

    /// 完整名称（不含泛型实参）
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }

    /// 用绑定替换泛型参数
    pub fn substitute(&self, bindings: &HashMap<String, TypeArg>) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            args: self.args.iter().map(|arg| arg.substitute(bindings)).collect(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                arg.fmt(f)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// 去掉各层 trait object 的 `dyn ` 前缀和 `+ Bound` 附加约束
///
/// `Box<dyn a::IFoo + Send>` 变为 `Box<a::IFoo>`。
fn strip_trait_object_bounds(type_name: &str) -> String {
    let mut result = String::with_capacity(type_name.len());
    let mut depth = 0usize;
    let mut skip_at: Option<usize> = None;
    let mut previous: Option<char> = None;

    let mut rest = type_name;
    while let Some(c) = rest.chars().next() {
        if skip_at.is_none() {
            if rest.starts_with(" + ") {
                skip_at = Some(depth);
            } else if rest.starts_with("dyn ")
                && previous.map_or(true, |p| matches!(p, '<' | ',' | ' ' | '('))
            {
                rest = &rest[4..];
                continue;
            }
        }

        match c {
            '<' => depth += 1,
            '>' => {
                if skip_at == Some(depth) {
                    skip_at = None;
                }
                depth = depth.saturating_sub(1);
            }
            ',' if skip_at == Some(depth) => skip_at = None,
            _ => {}
        }

        if skip_at.is_none() {
            result.push(c);
            previous = Some(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    result
}

/// 获取命名空间所属的 crate 名称
pub fn crate_name_of(namespace: &str) -> &str {
    namespace.split("::").next().unwrap_or(namespace)
}

/// 是否为内置类型名称
pub fn is_builtin_name(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    PathSep,
    Open,
    Close,
    Comma,
}

fn tokenize(text: &str) -> ParseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '<' => {
                chars.next();
                tokens.push(Token::Open);
            }
            '>' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            ':' => {
                chars.next();
                if chars.next() != Some(':') {
                    return Err(ParseError::invalid_type_name(text, "路径分隔符必须是 `::`"));
                }
                tokens.push(Token::PathSep);
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => {
                return Err(ParseError::invalid_type_name(
                    text,
                    format!("不支持的字符 `{other}`"),
                ));
            }
        }
    }

    if tokens.is_empty() {
        return Err(ParseError::invalid_type_name(text, "类型名称为空"));
    }
    Ok(tokens)
}

/// 未解析命名空间的路径
#[derive(Debug)]
struct RawPath {
    segments: Vec<String>,
    args: Vec<RawPath>,
}

impl RawPath {
    fn resolve<E: From<ParseError>>(
        &self,
        text: &str,
        namespace: &str,
        generic_params: &[String],
        position: usize,
        locate: &mut dyn FnMut(&str, usize) -> Result<String, E>,
    ) -> Result<TypeArg, E> {
        let (name, qualifier) = self
            .segments
            .split_last()
            .ok_or_else(|| ParseError::invalid_type_name(text, "缺少类型名称"))?;

        if qualifier.is_empty() && self.args.is_empty() {
            if name == "_" {
                return Ok(TypeArg::Param(format!("T{position}")));
            }
            if generic_params.iter().any(|param| param == name) {
                return Ok(TypeArg::Param(name.clone()));
            }
        }

        let resolved_namespace = if qualifier.is_empty() && !is_builtin_name(name) {
            locate(name.as_str(), self.args.len())?
        } else {
            resolve_namespace(text, namespace, qualifier, name)?
        };
        let args = self
            .args
            .iter()
            .enumerate()
            .map(|(index, arg)| arg.resolve(text, namespace, generic_params, index, &mut *locate))
            .collect::<Result<Vec<_>, E>>()?;

        Ok(TypeArg::Type(TypeRef {
            namespace: resolved_namespace,
            name: name.clone(),
            args,
        }))
    }
}

fn resolve_namespace(
    text: &str,
    namespace: &str,
    qualifier: &[String],
    name: &str,
) -> ParseResult<String> {
    let Some((first, rest)) = qualifier.split_first() else {
        return Ok(if is_builtin_name(name) {
            String::new()
        } else {
            namespace.to_string()
        });
    };

    if STD_ROOTS.contains(&first.as_str()) {
        return Ok(String::new());
    }

    let mut base: Vec<String> = match first.as_str() {
        "crate" => vec![crate_name_of(namespace).to_string()],
        "self" | "super" => namespace
            .split("::")
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        _ => vec![first.clone()],
    };

    let mut remaining = rest;
    if first == "super" {
        base.pop();
        while let Some((segment, tail)) = remaining.split_first() {
            if segment != "super" {
                break;
            }
            base.pop();
            remaining = tail;
        }
        if base.is_empty() {
            return Err(ParseError::invalid_type_name(text, "`super` 超出了 crate 根模块"));
        }
    }

    base.extend(remaining.iter().cloned());
    Ok(base.join("::"))
}

struct RawPathParser<'a> {
    text: &'a str,
    tokens: &'a [Token],
    position: usize,
}

impl RawPathParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next_ident(&mut self) -> ParseResult<String> {
        match self.tokens.get(self.position) {
            Some(Token::Ident(ident)) => {
                self.position += 1;
                Ok(ident.clone())
            }
            _ => Err(ParseError::invalid_type_name(self.text, "期望标识符")),
        }
    }

    fn parse_path(&mut self) -> ParseResult<RawPath> {
        let mut segments = vec![self.next_ident()?];
        while self.peek() == Some(&Token::PathSep) {
            self.position += 1;
            segments.push(self.next_ident()?);
        }

        let mut args = Vec::new();
        if self.peek() == Some(&Token::Open) {
            self.position += 1;
            loop {
                if self.peek() == Some(&Token::Close) {
                    break;
                }
                args.push(self.parse_path()?);
                if self.peek() == Some(&Token::Comma) {
                    self.position += 1;
                } else {
                    break;
                }
            }
            if self.peek() != Some(&Token::Close) {
                return Err(ParseError::invalid_type_name(self.text, "泛型实参缺少 `>`"));
            }
            self.position += 1;
            if args.is_empty() {
                return Err(ParseError::invalid_type_name(self.text, "泛型实参列表为空"));
            }
        }

        Ok(RawPath { segments, args })
    }
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// 可实例化的类型（struct / enum）
    Class,
    /// 服务契约（trait）
    Interface,
}

/// 类型可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

/// 类型声明位置
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

/// 服务注册标注
///
/// 一个类型可以携带多个标注，每个标注产生一条独立的注册。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMarker {
    /// 服务契约，为空时注册为自身及其实现的接口和基类型
    pub contract: Option<TypeRef>,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl ServiceMarker {
    /// 创建指定契约的标注
    pub fn new(contract: TypeRef) -> Self {
        Self {
            contract: Some(contract),
            lifetime: Lifetime::default(),
        }
    }

    /// 创建不指定契约的标注
    pub fn for_self() -> Self {
        Self {
            contract: None,
            lifetime: Lifetime::default(),
        }
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }
}

/// 类型描述符
///
/// 对应扫描中的候选类型，构建完成后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// 简短类型名称
    pub name: String,
    /// 命名空间（模块路径）
    pub namespace: String,
    /// 类型种类
    pub kind: TypeKind,
    /// 是否为抽象类型
    pub is_abstract: bool,
    /// 可见性
    pub visibility: Visibility,
    /// 未解析的泛型参数
    pub generic_params: Vec<String>,
    /// 直接实现的接口；接口类型上表示继承的接口
    pub interfaces: Vec<TypeRef>,
    /// 基类型
    pub base: Option<TypeRef>,
    /// 普通属性标注
    pub attributes: Vec<String>,
    /// 服务注册标注
    pub markers: Vec<ServiceMarker>,
    /// 声明位置
    pub location: Option<SourceLocation>,
}

impl TypeDescriptor {
    fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            is_abstract: false,
            visibility: Visibility::Public,
            generic_params: Vec::new(),
            interfaces: Vec::new(),
            base: None,
            attributes: Vec::new(),
            markers: Vec::new(),
            location: None,
        }
    }

    /// 创建类描述符
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Class)
    }

    /// 创建接口描述符
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Interface)
    }

    /// 添加泛型参数
    pub fn with_generic_param(mut self, name: impl Into<String>) -> Self {
        self.generic_params.push(name.into());
        self
    }

    /// 批量添加泛型参数
    pub fn with_generic_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generic_params.extend(names.into_iter().map(Into::into));
        self
    }

    /// 添加实现的接口
    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// 按名称添加实现的接口，名称相对于本类型的命名空间解析
    pub fn try_implements(self, text: &str) -> ParseResult<Self> {
        let interface = self.resolve_name(text)?;
        Ok(self.implements(interface))
    }

    /// 设置基类型
    pub fn extends(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    /// 按名称设置基类型
    pub fn try_extends(self, text: &str) -> ParseResult<Self> {
        let base = self.resolve_name(text)?;
        Ok(self.extends(base))
    }

    /// 标记为抽象类型
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// 标记为非公开类型
    pub fn internal(mut self) -> Self {
        self.visibility = Visibility::Internal;
        self
    }

    /// 添加属性标注
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// 添加服务注册标注
    pub fn with_marker(mut self, marker: ServiceMarker) -> Self {
        self.markers.push(marker);
        self
    }

    /// 按名称添加服务注册标注
    pub fn try_with_marker(self, contract: Option<&str>, lifetime: Lifetime) -> ParseResult<Self> {
        let marker = match contract {
            Some(text) => ServiceMarker::new(self.resolve_name(text)?),
            None => ServiceMarker::for_self(),
        };
        Ok(self.with_marker(marker.with_lifetime(lifetime)))
    }

    /// 设置声明位置
    pub fn declared_at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line,
        });
        self
    }

    /// 相对于本类型解析类型名称
    pub fn resolve_name(&self, text: &str) -> ParseResult<TypeRef> {
        TypeRef::parse_in(&self.namespace, text, &self.generic_params)
    }

    /// 本类型的类型引用，带泛型参数时为开放泛型
    pub fn type_ref(&self) -> TypeRef {
        TypeRef {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            args: self
                .generic_params
                .iter()
                .map(|param| TypeArg::Param(param.clone()))
                .collect(),
        }
    }

    /// 完整名称
    pub fn full_name(&self) -> String {
        self.type_ref().full_name()
    }

    /// 是否为开放泛型类型
    pub fn is_open_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }

    /// 是否为类
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// 是否为接口
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 是否为公开类型
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// 是否带有指定属性
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    /// 所属 crate 名称
    pub fn crate_name(&self) -> &str {
        crate_name_of(&self.namespace)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.type_ref().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_unqualified_name_uses_namespace() {
        let type_ref = TypeRef::parse_in("app::services", "ITransientService", &[]).unwrap();
        assert_eq!(type_ref, TypeRef::new("app::services", "ITransientService"));
    }

    #[test]
    fn test_parse_builtin_names_have_no_namespace() {
        let type_ref = TypeRef::parse_in("app", "IQueryHandler<String, i32>", &[]).unwrap();
        assert_eq!(
            type_ref,
            TypeRef::new("app", "IQueryHandler")
                .with_arg(TypeRef::new("", "String"))
                .with_arg(TypeRef::new("", "i32"))
        );
        assert!(!type_ref.is_open());
    }

    #[test]
    fn test_parse_generic_params_and_placeholders() {
        let partially_open =
            TypeRef::parse_in("app", "IQueryHandler<T, i32>", &params(&["T"])).unwrap();
        assert!(partially_open.is_open());
        assert!(!partially_open.is_definition());

        let definition = TypeRef::parse_in("app", "IQueryHandler<_, _>", &[]).unwrap();
        assert!(definition.is_definition());
        assert_eq!(definition, TypeRef::open_definition("app", "IQueryHandler", 2));
    }

    #[test]
    fn test_parse_crate_self_and_super_paths() {
        let ns = "app::services::query";
        assert_eq!(
            TypeRef::parse_in(ns, "crate::contracts::IFoo", &[]).unwrap().namespace,
            "app::contracts"
        );
        assert_eq!(TypeRef::parse_in(ns, "self::IFoo", &[]).unwrap().namespace, ns);
        assert_eq!(
            TypeRef::parse_in(ns, "super::IFoo", &[]).unwrap().namespace,
            "app::services"
        );
        assert_eq!(
            TypeRef::parse_in(ns, "super::super::IFoo", &[]).unwrap().namespace,
            "app"
        );
        assert!(TypeRef::parse_in("app", "super::IFoo", &[]).is_err());
        assert_eq!(
            TypeRef::parse_in(ns, "std::fmt::Debug", &[]).unwrap(),
            TypeRef::new("", "Debug")
        );
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert!(TypeRef::parse_in("app", "", &[]).is_err());
        assert!(TypeRef::parse_in("app", "IFoo<", &[]).is_err());
        assert!(TypeRef::parse_in("app", "IFoo<>", &[]).is_err());
        assert!(TypeRef::parse_in("app", "a:b", &[]).is_err());
        assert!(TypeRef::parse_in("app", "&IFoo", &[]).is_err());
        assert!(TypeRef::parse_in("app", "T", &params(&["T"])).is_err());
    }

    trait SampleContract {}

    #[test]
    fn test_type_ref_of_trait_object() {
        let type_ref = TypeRef::of::<dyn SampleContract>();
        assert_eq!(type_ref.name, "SampleContract");
        assert_eq!(type_ref.namespace, module_path!());
        assert_eq!(TypeRef::of::<String>(), TypeRef::new("", "String"));
        assert_eq!(
            TypeRef::of::<Vec<u8>>(),
            TypeRef::new("", "Vec").with_arg(TypeRef::new("", "u8"))
        );
    }

    #[test]
    fn test_from_type_name_strips_nested_trait_object_bounds() {
        assert_eq!(
            TypeRef::from_type_name("alloc::boxed::Box<dyn a::IFoo + Send>"),
            TypeRef::new("", "Box").with_arg(TypeRef::new("a", "IFoo"))
        );
        assert_eq!(
            TypeRef::from_type_name("dyn a::IFoo + core::marker::Send + core::marker::Sync"),
            TypeRef::new("a", "IFoo")
        );
        assert_eq!(
            TypeRef::from_type_name("a::Pair<alloc::boxed::Box<dyn a::IFoo + Send>, dyn a::IBar>"),
            TypeRef::new("a", "Pair")
                .with_arg(TypeRef::new("", "Box").with_arg(TypeRef::new("a", "IFoo")))
                .with_arg(TypeRef::new("a", "IBar"))
        );
        assert_eq!(TypeRef::of::<Box<dyn SampleContract + Send>>().args.len(), 1);
    }

    #[test]
    fn test_display_and_definition() {
        let type_ref = TypeRef::new("app", "IQueryHandler")
            .with_arg(TypeRef::new("", "String"))
            .with_param("T");
        assert_eq!(type_ref.to_string(), "app::IQueryHandler<String, T>");
        assert_eq!(type_ref.definition().to_string(), "app::IQueryHandler<T0, T1>");
        assert!(type_ref.same_definition(&type_ref.definition()));
    }

    #[test]
    fn test_substitute_binds_params() {
        let open = TypeRef::new("app", "IQueryHandler")
            .with_param("T")
            .with_arg(TypeRef::new("", "i32"));
        let mut bindings = HashMap::new();
        bindings.insert("T".to_string(), TypeArg::Type(TypeRef::new("", "String")));
        let closed = open.substitute(&bindings);
        assert!(!closed.is_open());
        assert_eq!(closed.to_string(), "app::IQueryHandler<String, i32>");
    }

    #[test]
    fn test_descriptor_builders() {
        let descriptor = TypeDescriptor::class("app", "BaseQueryHandler")
            .with_generic_param("T")
            .try_implements("IQueryHandler<T, i32>")
            .unwrap()
            .try_with_marker(Some("IAudit"), Lifetime::Scoped)
            .unwrap()
            .as_abstract()
            .declared_at("src/lib.rs", 10);

        assert!(descriptor.is_open_generic());
        assert!(descriptor.is_abstract);
        assert_eq!(descriptor.type_ref().to_string(), "app::BaseQueryHandler<T>");
        assert!(descriptor.interfaces[0].is_open());
        assert_eq!(descriptor.markers[0].lifetime, Lifetime::Scoped);
        assert_eq!(descriptor.markers[0].contract, Some(TypeRef::new("app", "IAudit")));
        assert_eq!(descriptor.crate_name(), "app");
    }
}
