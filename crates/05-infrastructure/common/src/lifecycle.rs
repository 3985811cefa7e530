//! 服务生命周期

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 服务生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 瞬时模式 - 每次请求都创建新实例
    #[default]
    Transient,
    /// 作用域模式 - 在同一作用域内共享实例
    Scoped,
    /// 单例模式 - 整个应用生命周期内只创建一个实例
    Singleton,
}

impl Lifetime {
    /// 生命周期名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Transient => "transient",
            Lifetime::Scoped => "scoped",
            Lifetime::Singleton => "singleton",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifetime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transient" => Ok(Lifetime::Transient),
            "scoped" => Ok(Lifetime::Scoped),
            "singleton" => Ok(Lifetime::Singleton),
            _ => Err(ParseError::UnknownLifetime {
                value: s.to_string(),
            }),
        }
    }
}
