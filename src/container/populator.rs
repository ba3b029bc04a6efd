//! 结构体字段注入
//!
//! 每种结构体只构建一次 `StructShape`（字段名、字段类型、是否带注入标记、赋值函数），
//! `apply` 的开销与字段数成正比。通常通过 `injectable!` 宏声明：
//!
//! ```
//! use inject::{injectable, Injector};
//!
//! #[derive(Default)]
//! struct Handler {
//!     greeting: String,
//!     retries: u32,
//! }
//!
//! injectable!(Handler {
//!     #[inject] greeting: String,
//!     retries: u32,
//! });
//!
//! let injector = Injector::new();
//! injector.map("hi".to_string());
//! let mut handler = Handler::default();
//! injector.apply(&mut handler).unwrap();
//! assert_eq!(handler.greeting, "hi");
//! assert_eq!(handler.retries, 0);
//! ```

use super::injector::Injector;
use super::type_key::TypeKey;
use super::value::Value;
use crate::errors::InjectError;
use log::{debug, trace};

/// 字段赋值函数：值类型不符时返回 `false`
pub type Assign<S> = fn(&mut S, &Value) -> bool;

/// 单个字段的描述
pub struct FieldDescriptor<S> {
    pub name: &'static str,
    pub key: TypeKey,
    /// 是否带注入标记
    pub injectable: bool,
    /// `None` 表示字段不可赋值，即使带标记也会被跳过
    pub assign: Option<Assign<S>>,
}

impl<S> FieldDescriptor<S> {
    /// 带注入标记、可赋值的字段
    pub fn injected(name: &'static str, key: TypeKey, assign: Assign<S>) -> Self {
        Self {
            name,
            key,
            injectable: true,
            assign: Some(assign),
        }
    }

    /// 没有注入标记的字段
    pub fn plain(name: &'static str, key: TypeKey) -> Self {
        Self {
            name,
            key,
            injectable: false,
            assign: None,
        }
    }

    /// 带标记但无法从外部赋值的字段
    pub fn sealed(name: &'static str, key: TypeKey) -> Self {
        Self {
            name,
            key,
            injectable: true,
            assign: None,
        }
    }
}

/// 结构体形态：按声明顺序排列的字段描述
pub struct StructShape<S> {
    name: &'static str,
    fields: Vec<FieldDescriptor<S>>,
}

impl<S> StructShape<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor<S>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor<S>] {
        &self.fields
    }

    /// 带注入标记的字段
    pub fn injectable_fields(&self) -> impl Iterator<Item = &FieldDescriptor<S>> {
        self.fields.iter().filter(|field| field.injectable)
    }
}

/// 可被 `Injector::apply` 填充的结构体
pub trait Injectable: Sized + 'static {
    fn shape() -> &'static StructShape<Self>;
}

impl Injector {
    /// 按声明顺序填充 `target` 中带注入标记的字段
    ///
    /// 遇到第一个无法解析的字段立即返回错误；之前已赋值的字段保持修改后的状态。
    pub fn apply<S: Injectable>(&self, target: &mut S) -> Result<(), InjectError> {
        let shape = S::shape();
        if self.config().trace_resolution {
            debug!("[{}] apply {}", self.name(), shape.name());
        }

        for field in shape.injectable_fields() {
            let Some(assign) = field.assign else {
                trace!("skipping sealed field {}.{}", shape.name(), field.name);
                continue;
            };

            let context = || format!("field '{}' of {}", field.name, shape.name());
            let value = self.get(&field.key)?.ok_or_else(|| InjectError::NotFound {
                ty: field.key.name().to_string(),
                context: context(),
            })?;

            if !assign(target, &value) {
                return Err(InjectError::TypeMismatch {
                    expected: field.key.name().to_string(),
                    actual: value.type_name().to_string(),
                    context: context(),
                });
            }
        }

        Ok(())
    }
}

/// 为已有结构体实现 `Injectable`
///
/// 列出全部字段，带 `#[inject]` 的字段会被 `apply` 填充，字段类型须实现 `Clone`。
#[macro_export]
macro_rules! injectable {
    ($owner:ident { $( $(#[$tag:ident])? $field:ident : $ty:ty ),* $(,)? }) => {
        impl $crate::Injectable for $owner {
            fn shape() -> &'static $crate::StructShape<Self> {
                $crate::__private::lazy_static! {
                    static ref SHAPE: $crate::StructShape<$owner> = $crate::StructShape::new(stringify!($owner))
                        $( .field($crate::__injectable_field!($owner; $field: $ty; $($tag)?)) )*;
                }
                &*SHAPE
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __injectable_field {
    ($owner:ident; $field:ident : $ty:ty; inject) => {
        $crate::FieldDescriptor::injected(
            stringify!($field),
            $crate::TypeKey::of::<$ty>(),
            |target: &mut $owner, value: &$crate::Value| match value.downcast::<$ty>() {
                Some(resolved) => {
                    target.$field = resolved;
                    true
                }
                None => false,
            },
        )
    };
    ($owner:ident; $field:ident : $ty:ty; ) => {
        $crate::FieldDescriptor::plain(stringify!($field), $crate::TypeKey::of::<$ty>())
    };
}
