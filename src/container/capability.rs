//! 接口解析器
//!
//! Rust 没有运行时的“某类型是否实现某 trait”查询，这里改用显式登记：
//! 每条实现事实记录（具体类型, 接口）以及一个向上转型函数。
//! 登记表是进程级的，与类型本身一样全局可见。

use super::type_key::TypeKey;
use super::value::Value;
use dashmap::DashMap;
use lazy_static::lazy_static;
use log::trace;
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

/// 接口标记
///
/// 为 `dyn Trait` 实现该 trait 即声明它可以作为接口被注入：
///
/// ```
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
/// impl inject::Interface for dyn Clock {}
/// ```
pub trait Interface: Send + Sync + 'static {}

impl Interface for dyn fmt::Display + Send + Sync {}
impl Interface for dyn fmt::Debug + Send + Sync {}

type Upcast = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

#[derive(Clone)]
struct Implementation {
    upcast: Upcast,
}

lazy_static! {
    /// (存储键, 接口句柄) -> 向上转型
    static ref IMPLEMENTATIONS: DashMap<(TypeId, TypeId), Implementation> = DashMap::new();
    /// 已声明的接口句柄
    static ref INTERFACES: DashMap<TypeId, &'static str> = DashMap::new();
}

/// 声明接口 `I`，返回它的键
pub fn declare_interface<I: ?Sized + Interface>() -> TypeKey {
    let key = TypeKey::interface::<I>();
    INTERFACES.entry(key.id()).or_insert(key.name());
    key
}

/// 登记 `T` 实现了接口 `I`
///
/// 同时覆盖两种存储形态：以 `T` 本身绑定的值，以及以 `Arc<T>` 绑定的值。
/// 重复登记同一对类型会覆盖之前的转型函数。
pub fn register_implementation<T, I>(upcast: fn(Arc<T>) -> Arc<I>)
where
    T: Send + Sync + 'static,
    I: ?Sized + Interface,
{
    let interface = declare_interface::<I>();

    let owned: Upcast = Arc::new(move |value: &Value| {
        value
            .downcast_arc::<T>()
            .map(|concrete| Value::interface(upcast(concrete)))
    });
    let shared: Upcast = Arc::new(move |value: &Value| {
        value
            .downcast::<Arc<T>>()
            .map(|concrete| Value::interface(upcast(concrete)))
    });

    IMPLEMENTATIONS.insert((TypeId::of::<T>(), interface.id()), Implementation { upcast: owned });
    IMPLEMENTATIONS.insert((TypeId::of::<Arc<T>>(), interface.id()), Implementation { upcast: shared });

    trace!("registered implementation {} => {}", type_name::<T>(), interface);
}

/// `concrete` 键下的值是否满足接口 `interface`
pub fn implements(concrete: &TypeKey, interface: &TypeKey) -> bool {
    IMPLEMENTATIONS.contains_key(&(concrete.id(), interface.id()))
}

/// 该 id 是否为已声明的接口句柄
pub fn is_interface_handle(id: TypeId) -> bool {
    INTERFACES.contains_key(&id)
}

/// 接口请求的统一名称
///
/// `TypeKey::interface::<dyn I>()` 与 `TypeKey::of::<Arc<dyn I>>()` 都得到 `dyn I` 的名称。
pub fn interface_name(key: &TypeKey) -> &'static str {
    INTERFACES
        .get(&key.id())
        .map(|entry| *entry.value())
        .unwrap_or_else(|| key.name())
}

/// 请求是否需要进行接口扫描
pub(crate) fn is_interface_request(key: &TypeKey) -> bool {
    key.is_interface() || is_interface_handle(key.id())
}

fn upcast(concrete: &TypeKey, interface: &TypeKey, value: &Value) -> Option<Value> {
    // 先取出转型函数再调用，避免持有分片锁
    let cast = IMPLEMENTATIONS
        .get(&(concrete.id(), interface.id()))
        .map(|entry| entry.upcast.clone())?;
    cast(value)
}

/// 一次本地扫描的结果
#[derive(Debug)]
pub(crate) enum Scan {
    Miss,
    Unique { from: TypeKey, value: Value },
    Ambiguous(Vec<String>),
}

/// 在给定绑定中寻找满足 `interface` 的值
pub(crate) fn scan<'a, I>(bindings: I, interface: &TypeKey) -> Scan
where
    I: IntoIterator<Item = (&'a TypeKey, &'a Value)>,
{
    let mut matches: Vec<(TypeKey, Value)> = bindings
        .into_iter()
        .filter_map(|(key, value)| upcast(key, interface, value).map(|cast| (key.clone(), cast)))
        .collect();

    match matches.len() {
        0 => Scan::Miss,
        1 => {
            let (from, value) = matches.remove(0);
            Scan::Unique { from, value }
        }
        _ => {
            let mut candidates: Vec<String> = matches.iter().map(|(key, _)| key.to_string()).collect();
            candidates.sort();
            Scan::Ambiguous(candidates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Meter: Send + Sync {
        fn reading(&self) -> u32;
    }
    impl Interface for dyn Meter {}

    struct Water(u32);
    impl Meter for Water {
        fn reading(&self) -> u32 {
            self.0
        }
    }

    struct Power(u32);
    impl Meter for Power {
        fn reading(&self) -> u32 {
            self.0 * 10
        }
    }

    fn register() {
        register_implementation::<Water, dyn Meter>(|value: Arc<Water>| -> Arc<dyn Meter> { value });
        register_implementation::<Power, dyn Meter>(|value: Arc<Power>| -> Arc<dyn Meter> { value });
    }

    #[test]
    fn test_registration_covers_both_storage_forms() {
        register();
        let meter = TypeKey::interface::<dyn Meter>();

        assert!(implements(&TypeKey::of::<Water>(), &meter));
        assert!(implements(&TypeKey::of::<Arc<Water>>(), &meter));
        assert!(!implements(&TypeKey::of::<String>(), &meter));
        assert!(is_interface_handle(meter.id()));
        assert!(is_interface_request(&TypeKey::of::<Arc<dyn Meter>>()));
    }

    #[test]
    fn test_interface_name_ignores_request_form() {
        register();
        let declared = interface_name(&TypeKey::interface::<dyn Meter>());
        let handle = interface_name(&TypeKey::of::<Arc<dyn Meter>>());

        assert_eq!(declared, handle);
        assert_eq!(declared, type_name::<dyn Meter>());
        assert_eq!(interface_name(&TypeKey::of::<u8>()), "u8");
    }

    #[test]
    fn test_scan_unique_match_upcasts() {
        register();
        let key = TypeKey::of::<Arc<Water>>();
        let value = Value::new(Arc::new(Water(7)));
        let other_key = TypeKey::of::<u8>();
        let other = Value::new(3u8);

        match scan(vec![(&key, &value), (&other_key, &other)], &TypeKey::interface::<dyn Meter>()) {
            Scan::Unique { from, value } => {
                assert_eq!(from, key);
                let meter = value.downcast::<Arc<dyn Meter>>().unwrap();
                assert_eq!(meter.reading(), 7);
            }
            other => panic!("unexpected scan result: {:?}", other),
        }
    }

    #[test]
    fn test_scan_reports_every_candidate_when_ambiguous() {
        register();
        let water_key = TypeKey::of::<Water>();
        let water = Value::new(Water(1));
        let power_key = TypeKey::of::<Power>();
        let power = Value::new(Power(2));

        match scan(
            vec![(&water_key, &water), (&power_key, &power)],
            &TypeKey::interface::<dyn Meter>(),
        ) {
            Scan::Ambiguous(candidates) => {
                assert_eq!(candidates.len(), 2);
                assert!(candidates.iter().any(|c| c.ends_with("Water")));
                assert!(candidates.iter().any(|c| c.ends_with("Power")));
            }
            other => panic!("unexpected scan result: {:?}", other),
        }
    }

    #[test]
    fn test_scan_skips_values_that_fail_to_cast() {
        register();
        // 键声称是 Water，但值实际是别的类型
        let key = TypeKey::of::<Water>();
        let value = Value::new("not a meter");

        assert!(matches!(
            scan(vec![(&key, &value)], &TypeKey::interface::<dyn Meter>()),
            Scan::Miss
        ));
    }
}
