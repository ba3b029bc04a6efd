//! 类型擦除的绑定值

use super::capability::Interface;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 容器中保存的值
///
/// 内部是 `Arc<dyn Any + Send + Sync>`，克隆只增加引用计数，
/// 同一个值可以被多个容器共享。
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// 包装一个值，存储类型为 `T`
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// 复用已有的 `Arc<T>` 分配，存储类型仍为 `T`
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
        }
    }

    /// 包装一个接口句柄，存储类型为 `Arc<I>`
    pub fn interface<I: ?Sized + Interface>(value: Arc<I>) -> Self {
        Self::new(value)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 存储值的运行时类型
    pub fn stored_type_id(&self) -> TypeId {
        Any::type_id(&*self.inner)
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// 克隆出存储的值
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    /// 共享存储值的分配，仅当存储类型恰好为 `T` 时成功
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast::<T>().ok()
    }

    /// 两个值是否指向同一分配
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("type", &self.type_name).finish()
    }
}
