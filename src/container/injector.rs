//! 注入容器
//!
//! 解析顺序：本地精确匹配 -> 本地接口扫描 -> 父容器（递归同一过程）。

use super::capability::{self, Interface, Scan};
use super::stats::{InjectorStats, Outcome, StatsCounters};
use super::store::BindingStore;
use super::type_key::{interface_of, TypeKey};
use super::value::Value;
use crate::config::InjectorConfig;
use crate::errors::InjectError;
use log::{debug, warn};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 依赖注入容器
///
/// 注册方法都接收 `&self` 并返回 `&Self`，便于链式调用。内部锁只是为了
/// 支撑这种 API：约定仍是“先注册、后解析”，注册与解析交错时不保证顺序。
pub struct Injector {
    config: InjectorConfig,
    bindings: RwLock<BindingStore>,
    parent: RwLock<Option<Arc<Injector>>>,
    stats: StatsCounters,
}

impl Injector {
    /// 创建空容器
    pub fn new() -> Self {
        Self::with_config(InjectorConfig::default())
    }

    pub fn with_config(config: InjectorConfig) -> Self {
        Self {
            config,
            bindings: RwLock::new(BindingStore::default()),
            parent: RwLock::new(None),
            stats: StatsCounters::default(),
        }
    }

    /// 创建以 `parent` 为父容器的子容器
    pub fn child_of(parent: Arc<Injector>) -> Self {
        let child = Self::with_config(InjectorConfig::named(format!("{}/child", parent.name())));
        child.set_parent(parent);
        child
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// 以值自身的类型为键绑定
    pub fn map<T: Any + Send + Sync>(&self, value: T) -> &Self {
        self.set(TypeKey::of::<T>(), Value::new(value))
    }

    /// 以接口形态为键绑定
    ///
    /// `interface_shape` 可以是接口键，或指向接口的一到多层指针。
    ///
    /// # Panics
    ///
    /// 解开指针后不是接口时 panic。
    pub fn map_to(&self, value: Value, interface_shape: &TypeKey) -> &Self {
        self.set(interface_of(interface_shape), value)
    }

    /// `map_to` 的类型化版本，接口形态在编译期确定
    pub fn map_interface<I: ?Sized + Interface>(&self, value: Arc<I>) -> &Self {
        let key = capability::declare_interface::<I>();
        self.set(key, Value::interface(value))
    }

    /// 在任意键下绑定，已有绑定被静默覆盖
    pub fn set(&self, key: TypeKey, value: Value) -> &Self {
        if self.config.trace_resolution {
            debug!("[{}] bind {} <- {}", self.name(), key, value.type_name());
        }
        self.bindings.write().insert(key, value);
        self
    }

    /// 仅查本容器的精确绑定
    pub fn get_local(&self, key: &TypeKey) -> Option<Value> {
        self.bindings.read().get(key).cloned()
    }

    /// 完整解析
    ///
    /// `Ok(None)` 表示整条链都没有找到；任一作用域的接口歧义在之后没有
    /// 唯一命中时以 `Err` 返回（取最后遇到的那一个）。
    pub fn get(&self, key: &TypeKey) -> Result<Option<Value>, InjectError> {
        self.record_lookup();

        let local_ambiguity = {
            let bindings = self.bindings.read();

            if let Some(value) = bindings.get(key) {
                self.trace(key, "local");
                self.record(Outcome::LocalHit);
                return Ok(Some(value.clone()));
            }

            if capability::is_interface_request(key) {
                match capability::scan(bindings.iter(), key) {
                    Scan::Unique { from, value } => {
                        self.trace(key, &format!("implemented by {}", from));
                        self.record(Outcome::InterfaceHit);
                        return Ok(Some(value));
                    }
                    Scan::Ambiguous(candidates) => {
                        let ty = capability::interface_name(key);
                        warn!(
                            "[{}] ambiguous implementation of {}: {}",
                            self.name(),
                            ty,
                            candidates.join(", ")
                        );
                        Some(InjectError::Ambiguous {
                            ty: ty.to_string(),
                            scope: self.name().to_string(),
                            candidates,
                        })
                    }
                    Scan::Miss => None,
                }
            } else {
                None
            }
        };

        let parent = self.parent.read().clone();
        if let Some(parent) = parent {
            match parent.get(key) {
                Ok(Some(value)) => {
                    self.trace(key, &format!("parent '{}'", parent.name()));
                    self.record(Outcome::ParentHit);
                    return Ok(Some(value));
                }
                Ok(None) => {}
                Err(err) => {
                    self.record(Outcome::Ambiguous);
                    return Err(err);
                }
            }
        }

        match local_ambiguity {
            Some(err) => {
                self.record(Outcome::Ambiguous);
                Err(err)
            }
            None => {
                self.trace(key, "not found");
                self.record(Outcome::Miss);
                Ok(None)
            }
        }
    }

    /// 按类型解析并取出值
    pub fn resolve<T: Any + Clone>(&self) -> Result<T, InjectError> {
        self.resolve_as::<T>(|| format!("resolve in injector '{}'", self.name()))
    }

    /// 解析 `T`，失败时用 `context` 描述请求方
    pub(crate) fn resolve_as<T: Any + Clone>(
        &self,
        context: impl Fn() -> String,
    ) -> Result<T, InjectError> {
        let key = TypeKey::of::<T>();
        let value = self.get(&key)?.ok_or_else(|| InjectError::NotFound {
            ty: key.name().to_string(),
            context: context(),
        })?;

        value.downcast::<T>().ok_or_else(|| InjectError::TypeMismatch {
            expected: key.name().to_string(),
            actual: value.type_name().to_string(),
            context: context(),
        })
    }

    /// 设置父容器，替换已有的父容器
    pub fn set_parent(&self, parent: Arc<Injector>) {
        debug!("[{}] parent set to '{}'", self.name(), parent.name());
        *self.parent.write() = Some(parent);
    }

    pub fn parent(&self) -> Option<Arc<Injector>> {
        self.parent.read().clone()
    }

    /// 本容器是否有该键的精确绑定
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.bindings.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 本容器的所有键
    pub fn keys(&self) -> Vec<TypeKey> {
        self.bindings.read().keys().cloned().collect()
    }

    pub fn stats(&self) -> InjectorStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    fn record_lookup(&self) {
        if self.config.collect_stats {
            self.stats.record_lookup();
        }
    }

    fn record(&self, outcome: Outcome) {
        if self.config.collect_stats {
            self.stats.record(outcome);
        }
    }

    fn trace(&self, key: &TypeKey, how: &str) {
        if self.config.trace_resolution {
            debug!("[{}] resolve {}: {}", self.name(), key, how);
        }
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("name", &self.config.name)
            .field("bindings", &self.len())
            .field("parent", &self.parent.read().as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}
