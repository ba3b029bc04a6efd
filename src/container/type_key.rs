//! 类型键 - 绑定表的索引
//!
//! `TypeKey` 是对 `TypeId` 的包装，额外携带可读名称和类型形态：
//! - `Concrete`：普通的具体类型
//! - `Interface`：接口形态（`dyn Trait`），键的 id 为其句柄 `Arc<dyn Trait>` 的 `TypeId`
//! - `Pointer`：指向另一个形态的指针，仅用作 `interface_of` 的样本

use super::capability::{self, Interface};
use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 类型形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 具体类型
    Concrete,
    /// 接口（能力集合）
    Interface,
    /// 指针层，指向 `elem`
    Pointer,
}

/// 规范化的类型标识
#[derive(Clone)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
    elem: Option<Box<TypeKey>>,
}

impl TypeKey {
    /// 具体类型 `T` 的键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind: TypeKind::Concrete,
            elem: None,
        }
    }

    /// 接口 `I` 的键
    ///
    /// 与 `TypeKey::of::<Arc<I>>()` 相等，因此以 `Arc<dyn Trait>` 声明的参数或字段
    /// 请求的正是这个键。
    pub fn interface<I: ?Sized + Interface>() -> Self {
        Self {
            id: TypeId::of::<Arc<I>>(),
            name: type_name::<I>(),
            kind: TypeKind::Interface,
            elem: None,
        }
    }

    /// 指向 `elem` 的指针形态
    pub fn pointer_to(elem: TypeKey) -> Self {
        Self {
            id: elem.id,
            name: elem.name,
            kind: TypeKind::Pointer,
            elem: Some(Box::new(elem)),
        }
    }

    /// 在当前键外再包一层指针
    pub fn pointer(self) -> Self {
        Self::pointer_to(self)
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// 指针指向的形态；非指针返回 `None`
    pub fn elem(&self) -> Option<&TypeKey> {
        self.elem.as_deref()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_pointer(&self) -> bool {
        self.kind == TypeKind::Pointer
    }

    fn into_interface(mut self) -> Self {
        self.kind = TypeKind::Interface;
        self
    }
}

// 相等性只看 TypeId 与指针层级：同一个 `Arc<dyn Trait>` 无论以接口还是具体形态构造都指向同一绑定
impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.is_pointer() == other.is_pointer() && self.elem == other.elem
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.is_pointer().hash(state);
        if let Some(elem) = &self.elem {
            elem.hash(state);
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.elem {
            Some(elem) => write!(f, "*{}", elem),
            None => f.write_str(self.name),
        }
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({:?}: {})", self.kind, self)
    }
}

/// 从指针（或指针的指针）样本中取出接口形态的键
///
/// 样本解开所有指针层后必须是接口，否则视为调用方的编程错误并直接 panic。
pub fn interface_of(sample: &TypeKey) -> TypeKey {
    let mut shape = sample;
    while let Some(elem) = shape.elem() {
        shape = elem;
    }

    if !shape.is_interface() && !capability::is_interface_handle(shape.id()) {
        panic!(
            "inject: expected a pointer to an interface shape, found '{}' ({:?})",
            sample,
            shape.kind()
        );
    }

    shape.clone().into_interface()
}
