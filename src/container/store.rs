//! 绑定表
//!
//! 每个容器私有的一张 `TypeKey -> Value` 映射，同一键只保留最后一次写入。

use super::type_key::TypeKey;
use super::value::Value;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct BindingStore {
    bindings: HashMap<TypeKey, Value>,
}

impl BindingStore {
    /// 写入绑定，返回被覆盖的旧值
    pub(crate) fn insert(&mut self, key: TypeKey, value: Value) -> Option<Value> {
        self.bindings.insert(key, value)
    }

    pub(crate) fn get(&self, key: &TypeKey) -> Option<&Value> {
        self.bindings.get(key)
    }

    pub(crate) fn contains(&self, key: &TypeKey) -> bool {
        self.bindings.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.bindings.keys()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&TypeKey, &Value)> {
        self.bindings.iter()
    }
}
