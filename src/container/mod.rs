//! 依赖注入容器
//!
//! 以类型为键保存值，并据此调用函数、填充结构体字段。
//! 精确类型找不到时，对接口请求扫描本地绑定，再交给父容器。

pub mod capability;
pub mod conduit;
pub mod injector;
pub mod invoker;
pub mod populator;
pub mod stats;
mod store;
pub mod type_key;
pub mod value;

pub use capability::{declare_interface, implements, interface_name, register_implementation, Interface};
pub use conduit::{Conduit, Direction, Inlet, Outlet};
pub use injector::Injector;
pub use invoker::{parameters_of, Invocable};
pub use populator::{FieldDescriptor, Injectable, StructShape};
pub use stats::InjectorStats;
pub use type_key::{interface_of, TypeKey, TypeKind};
pub use value::Value;

/// 声明接口：`interface!(Clock, Store);`
#[macro_export]
macro_rules! interface {
    ($($name:ident),+ $(,)?) => {
        $( impl $crate::Interface for dyn $name {} )+
    };
}

/// 登记实现事实：`implements!(SystemClock => dyn Clock, dyn fmt::Display + Send + Sync);`
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($iface:ty),+ $(,)?) => {
        $(
            $crate::register_implementation::<$concrete, $iface>(
                |value: ::std::sync::Arc<$concrete>| -> ::std::sync::Arc<$iface> { value },
            );
        )+
    };
}
