//! 错误类型定义

use thiserror::Error;

/// 解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("类型名称无效: {text}, 原因: {reason}")]
    InvalidTypeName { text: String, reason: String },

    #[error("未知的生命周期: {value}")]
    UnknownLifetime { value: String },
}

impl ParseError {
    /// 创建类型名称错误
    pub fn invalid_type_name(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTypeName {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// 服务注册错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("服务类型已注册: {service_type}")]
    Duplicate { service_type: String },
}

/// 扫描错误类型
///
/// 只覆盖输入本身不合法的情况。找不到匹配接口、没有标注、开放泛型实现
/// 这类情况按策略静默跳过，不会产生错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("类型 {implementation} 不能赋值给 {service_type}")]
    NotAssignable {
        implementation: String,
        service_type: String,
    },

    #[error("类型 {implementation} 存在多个相同服务类型的标注: {service_type}")]
    DuplicateMarker {
        implementation: String,
        service_type: String,
    },

    #[error("程序集不存在: {name}")]
    AssemblyNotFound { name: String },

    #[error("类型不存在: {name}, 程序集: {assembly}")]
    TypeNotFound { name: String, assembly: String },

    #[error("类型名称存在歧义: {name}, 程序集: {assembly}, 候选: {candidates:?}")]
    AmbiguousTypeName {
        name: String,
        assembly: String,
        candidates: Vec<String>,
    },

    #[error("类型名称解析失败: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("服务注册失败: {source}")]
    Registration {
        #[from]
        source: RegistrationError,
    },
}

/// 容器构建错误类型
///
/// 构建阶段才暴露的延迟错误，扫描管道本身不会产生这类注册。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("开放泛型实现无法构建: {service_type} -> {implementation}")]
    OpenGenericImplementation {
        service_type: String,
        implementation: String,
    },

    #[error("开放泛型服务类型需要开放泛型实现: {service_type} -> {implementation}")]
    OpenGenericServiceType {
        service_type: String,
        implementation: String,
    },
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置加载失败: {source}")]
    Load {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置值无效: {key}, 原因: {message}")]
    InvalidValue { key: String, message: String },

    #[error("扫描配置执行失败: {source}")]
    Scan {
        #[from]
        source: ScanError,
    },

    #[error("容器验证失败: {source}")]
    Validation {
        #[from]
        source: BuildError,
    },
}

impl ConfigError {
    /// 包装底层加载错误
    pub fn load(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Load {
            source: Box::new(source),
        }
    }

    /// 创建配置值错误
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type ParseResult<T> = Result<T, ParseError>;
pub type ScanResult<T> = Result<T, ScanError>;
pub type BuildResult<T> = Result<T, BuildError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
