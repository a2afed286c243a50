use crate::application::ServerMessage;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{Notice, PaymentCompletion, PaymentDetails, PaymentMethodDescriptor};
use crate::ports::{NotificationPort, PaymentRequestPort};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// 浏览器会话适配器：把端口调用转换为下行 WebSocket 消息
#[derive(Clone)]
pub struct BrowserSession {
    session_id: Uuid,
    outbound: mpsc::Sender<ServerMessage>,
}

impl BrowserSession {
    pub fn new(session_id: Uuid, outbound: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            session_id,
            outbound,
        }
    }

    async fn push(&self, message: ServerMessage) -> DomainResult<()> {
        debug!(session_id = %self.session_id, ?message, "Pushing message to browser");
        self.outbound
            .send(message)
            .await
            .map_err(|_| DomainError::SessionClosed)
    }
}

#[async_trait]
impl PaymentRequestPort for BrowserSession {
    async fn query_is_supported(&self) -> DomainResult<()> {
        self.push(ServerMessage::QuerySupport).await
    }

    async fn install(
        &self,
        methods: &[PaymentMethodDescriptor],
        details: &PaymentDetails,
    ) -> DomainResult<()> {
        self.push(ServerMessage::InstallPaymentRequest {
            methods: methods.to_vec(),
            details: details.clone(),
        })
        .await
    }

    async fn complete(&self, response_id: &str, result: PaymentCompletion) -> DomainResult<()> {
        self.push(ServerMessage::CompletePayment {
            response_id: response_id.to_string(),
            result,
        })
        .await
    }
}

#[async_trait]
impl NotificationPort for BrowserSession {
    async fn show(&self, notice: Notice) -> DomainResult<()> {
        self.push(ServerMessage::from(notice)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoticePosition;
    use std::time::Duration;

    #[tokio::test]
    async fn test_port_calls_become_server_messages() {
        let (tx, mut rx) = mpsc::channel(4);
        let session = BrowserSession::new(Uuid::new_v4(), tx);

        session.query_is_supported().await.unwrap();
        session
            .complete("req-1", PaymentCompletion::Success)
            .await
            .unwrap();
        session
            .show(Notice::new("hi", Duration::from_millis(9000), NoticePosition::Middle))
            .await
            .unwrap();

        assert!(matches!(rx.recv().await, Some(ServerMessage::QuerySupport)));
        assert!(matches!(
            rx.recv().await,
            Some(ServerMessage::CompletePayment {
                ref response_id,
                result: PaymentCompletion::Success,
            }) if response_id == "req-1"
        ));
        assert!(matches!(
            rx.recv().await,
            Some(ServerMessage::ShowNotification { duration_ms: 9000, .. })
        ));
    }

    #[tokio::test]
    async fn test_closed_session() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let session = BrowserSession::new(Uuid::new_v4(), tx);

        assert!(matches!(
            session.query_is_supported().await,
            Err(DomainError::SessionClosed)
        ));
    }
}
