//! 函数调用注入
//!
//! `Invocable<Args>` 为参数个数 0..=10 的所有 `FnOnce` 实现。
//! 所有参数先解析完，再调用函数；任一参数失败时函数不会被调用。

use super::injector::Injector;
use super::type_key::TypeKey;
use crate::errors::InjectError;
use log::debug;
use std::any::{type_name, Any};

/// 可由容器提供参数并调用的函数
pub trait Invocable<Args> {
    type Output;

    /// 按声明顺序列出参数的键
    fn parameters() -> Vec<TypeKey>;

    /// 解析全部参数后调用
    fn invoke_with(self, injector: &Injector) -> Result<Self::Output, InjectError>;
}

macro_rules! impl_invocable {
    ($($arg:ident => $index:tt),*) => {
        impl<Func, Out, $($arg,)*> Invocable<($($arg,)*)> for Func
        where
            Func: FnOnce($($arg),*) -> Out,
            $($arg: Any + Clone,)*
        {
            type Output = Out;

            fn parameters() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn invoke_with(self, injector: &Injector) -> Result<Out, InjectError> {
                $(
                    let $arg = injector.resolve_as::<$arg>(|| {
                        format!("parameter #{} of {}", $index, type_name::<Func>())
                    })?;
                )*
                Ok(self($($arg),*))
            }
        }
    };
}

impl_invocable!();
impl_invocable!(A0 => 0);
impl_invocable!(A0 => 0, A1 => 1);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2, A3 => 3);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7, A8 => 8);
impl_invocable!(A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7, A8 => 8, A9 => 9);

/// 函数请求的参数键
pub fn parameters_of<F, Args>(_function: &F) -> Vec<TypeKey>
where
    F: Invocable<Args>,
{
    F::parameters()
}

impl Injector {
    /// 从容器解析 `function` 的每个参数并同步调用，原样返回其返回值
    ///
    /// 多个返回值以元组表示。
    pub fn invoke<F, Args>(&self, function: F) -> Result<F::Output, InjectError>
    where
        F: Invocable<Args>,
    {
        if self.config().trace_resolution {
            debug!(
                "[{}] invoke {} with {} parameter(s)",
                self.name(),
                type_name::<F>(),
                F::parameters().len()
            );
        }
        function.invoke_with(self)
    }
}
