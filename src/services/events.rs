// src/services/events.rs

use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Mudança na tabela de vendas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum SaleEvent {
    Created(i64),
    Updated(i64),
    Deleted(i64),
}

/// Feed de mudanças. Quem quer reagir (stream do dashboard) se inscreve;
/// o motor de agregação não conhece o feed.
#[derive(Clone)]
pub struct SaleEvents {
    sender: broadcast::Sender<SaleEvent>,
}

impl Default for SaleEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SaleEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: SaleEvent) {
        // Sem inscritos não é erro
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::debug!(?event, receivers, "evento de venda publicado");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaleEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let events = SaleEvents::new();
        events.publish(SaleEvent::Created(1));
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let events = SaleEvents::new();
        let mut rx = events.subscribe();

        events.publish(SaleEvent::Created(1));
        events.publish(SaleEvent::Deleted(1));

        assert_eq!(rx.recv().await.unwrap(), SaleEvent::Created(1));
        assert_eq!(rx.recv().await.unwrap(), SaleEvent::Deleted(1));
    }
}
