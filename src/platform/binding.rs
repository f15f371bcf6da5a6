//! Process-wide default network binding

use tokio::sync::watch;

use crate::core::types::NetworkRef;

/// The network the process's default traffic is bound to
///
/// A single value with last-writer-wins semantics. Cloning yields another
/// handle onto the same binding, so every subsystem observes the same value.
#[derive(Debug, Clone)]
pub struct DefaultNetworkBinding {
    tx: watch::Sender<Option<NetworkRef>>,
}

impl DefaultNetworkBinding {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Overwrite the binding unconditionally
    pub fn set(&self, network: Option<NetworkRef>) {
        self.tx.send_replace(network);
    }

    pub fn current(&self) -> Option<NetworkRef> {
        *self.tx.borrow()
    }

    /// Watch the binding for changes
    pub fn subscribe(&self) -> watch::Receiver<Option<NetworkRef>> {
        self.tx.subscribe()
    }
}

impl Default for DefaultNetworkBinding {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_last_writer_wins() {
        let binding = DefaultNetworkBinding::new();
        let other = binding.clone();
        assert_eq!(binding.current(), None);

        binding.set(Some(NetworkRef::new(1)));
        other.set(Some(NetworkRef::new(2)));
        assert_eq!(binding.current(), Some(NetworkRef::new(2)));

        binding.set(None);
        assert_eq!(other.current(), None);
    }

    #[tokio::test]
    async fn test_binding_subscribers_see_changes() {
        let binding = DefaultNetworkBinding::new();
        let mut rx = binding.subscribe();

        binding.set(Some(NetworkRef::new(3)));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(NetworkRef::new(3)));
    }
}
