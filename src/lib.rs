//! 运行时依赖注入容器
//!
//! 以类型为键注册值，然后让容器为函数提供参数（`invoke`）、为结构体填充
//! 带 `#[inject]` 标记的字段（`apply`）。请求接口时会扫描本地绑定寻找唯一实现，
//! 本地找不到再交给父容器。

pub mod config;
pub mod container;
pub mod errors;
pub mod logging;

// Re-export commonly used items for convenience
pub use config::{ConfigLoader, InjectorConfig};
pub use container::{
    declare_interface, implements, interface_of, parameters_of, register_implementation, Conduit,
    Direction, FieldDescriptor, Inlet, Injectable, Injector, InjectorStats, Interface, Invocable,
    Outlet, StructShape, TypeKey, TypeKind, Value,
};
pub use errors::{ConfigError, InjectError};

#[doc(hidden)]
pub mod __private {
    pub use lazy_static::lazy_static;
}
