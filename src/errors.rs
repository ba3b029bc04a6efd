use std::fmt;
use thiserror::Error;

/// 注入错误
///
/// 均为“软”错误：作为普通返回值沿调用链传播。
/// 调用方误用（例如把具体类型当作接口）不会走到这里，而是直接 panic。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectError {
    /// 整条解析链上都没有可用的绑定
    NotFound {
        ty: String,
        context: String,
    },
    /// 同一作用域内有多个绑定满足请求的接口
    Ambiguous {
        ty: String,
        scope: String,
        candidates: Vec<String>,
    },
    /// 显式键下绑定的值与请求的类型不一致
    TypeMismatch {
        expected: String,
        actual: String,
        context: String,
    },
}

impl InjectError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, InjectError::NotFound { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, InjectError::Ambiguous { .. })
    }

    /// 出错的类型名
    pub fn type_name(&self) -> &str {
        match self {
            InjectError::NotFound { ty, .. } | InjectError::Ambiguous { ty, .. } => ty,
            InjectError::TypeMismatch { expected, .. } => expected,
        }
    }
}

impl fmt::Display for InjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectError::NotFound { ty, context } => {
                write!(f, "Value not found for type '{}'", ty)?;
                if !context.is_empty() {
                    write!(f, " ({})", context)?;
                }
                Ok(())
            }
            InjectError::Ambiguous {
                ty,
                scope,
                candidates,
            } => {
                write!(
                    f,
                    "Ambiguous implementation of '{}' in injector '{}': {}",
                    ty,
                    scope,
                    candidates.join(", ")
                )
            }
            InjectError::TypeMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Type mismatch: expected '{}', found '{}' ({})",
                    expected, actual, context
                )
            }
        }
    }
}

impl std::error::Error for InjectError {}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, InjectError>;
