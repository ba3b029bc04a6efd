//! 带方向的通道
//!
//! `Conduit<T>` 是双向通道，`Outlet<T>` 只能发送，`Inlet<T>` 只能接收。
//! 三者是不同的类型，因此以其中一种绑定的值不会满足另外两种的请求。

use super::type_key::TypeKey;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

/// 通道方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Both,
    Send,
    Recv,
}

/// 双向通道
pub struct Conduit<T> {
    tx: UnboundedSender<T>,
    rx: Arc<Mutex<UnboundedReceiver<T>>>,
}

impl<T> Conduit<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        self.tx.send(value)
    }

    /// 所有发送端都已关闭且队列为空时返回 `None`
    pub async fn recv(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }

    /// 只能发送的一端
    pub fn outlet(&self) -> Outlet<T> {
        Outlet { tx: self.tx.clone() }
    }

    /// 只能接收的一端
    pub fn inlet(&self) -> Inlet<T> {
        Inlet { rx: self.rx.clone() }
    }
}

impl<T> Default for Conduit<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Conduit<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

/// 只发送
pub struct Outlet<T> {
    tx: UnboundedSender<T>,
}

impl<T> Outlet<T> {
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        self.tx.send(value)
    }
}

impl<T> Clone for Outlet<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

/// 只接收
pub struct Inlet<T> {
    rx: Arc<Mutex<UnboundedReceiver<T>>>,
}

impl<T> Inlet<T> {
    pub async fn recv(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}

impl<T> Clone for Inlet<T> {
    fn clone(&self) -> Self {
        Self { rx: self.rx.clone() }
    }
}

impl TypeKey {
    /// 元素类型为 `T`、方向为 `direction` 的通道键
    pub fn conduit<T: Send + 'static>(direction: Direction) -> TypeKey {
        match direction {
            Direction::Both => TypeKey::of::<Conduit<T>>(),
            Direction::Send => TypeKey::of::<Outlet<T>>(),
            Direction::Recv => TypeKey::of::<Inlet<T>>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::injector::Injector;
    use crate::container::value::Value;

    #[test]
    fn test_directions_are_distinct_keys() {
        let both = TypeKey::conduit::<String>(Direction::Both);
        let send = TypeKey::conduit::<String>(Direction::Send);
        let recv = TypeKey::conduit::<String>(Direction::Recv);

        assert_ne!(both, send);
        assert_ne!(both, recv);
        assert_ne!(send, recv);
        assert_eq!(send, TypeKey::of::<Outlet<String>>());
    }

    #[test]
    fn test_send_only_does_not_satisfy_bidirectional() {
        let conduit = Conduit::<u32>::new();
        let injector = Injector::new();
        injector.set(TypeKey::conduit::<u32>(Direction::Send), Value::new(conduit.outlet()));

        assert!(injector.get(&TypeKey::conduit::<u32>(Direction::Send)).unwrap().is_some());
        assert!(injector.get(&TypeKey::conduit::<u32>(Direction::Both)).unwrap().is_none());
        assert!(injector.get(&TypeKey::conduit::<u32>(Direction::Recv)).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_outlet_feeds_inlet() {
        let conduit = Conduit::new();
        let outlet = conduit.outlet();
        let inlet = conduit.inlet();

        outlet.send("ping".to_string()).unwrap();
        conduit.send("pong".to_string()).unwrap();

        assert_eq!(inlet.recv().await.as_deref(), Some("ping"));
        assert_eq!(conduit.recv().await.as_deref(), Some("pong"));
    }
}
