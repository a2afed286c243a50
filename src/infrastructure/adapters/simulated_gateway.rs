use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::PaymentResponseEvent;
use crate::ports::PaymentGatewayPort;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// 模拟支付网关：固定延迟后返回，不发起真实网络请求
///
/// 服务关闭信号会中断等待并返回 `GatewayInterrupted`。
#[derive(Clone)]
pub struct SimulatedGateway {
    delay: Duration,
    shutdown: watch::Receiver<bool>,
}

impl SimulatedGateway {
    pub fn new(delay: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self { delay, shutdown }
    }
}

#[async_trait]
impl PaymentGatewayPort for SimulatedGateway {
    async fn process(&self, response: &PaymentResponseEvent) -> DomainResult<()> {
        let mut shutdown = self.shutdown.clone();
        if *shutdown.borrow_and_update() {
            return Err(DomainError::GatewayInterrupted(
                "server is shutting down".to_string(),
            ));
        }

        debug!(
            response_id = %response.response_id,
            delay_ms = self.delay.as_millis() as u64,
            "Simulating gateway round trip"
        );

        let sleep = tokio::time::sleep(self.delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                changed = shutdown.changed() => match changed {
                    Ok(()) if *shutdown.borrow_and_update() => {
                        return Err(DomainError::GatewayInterrupted(
                            "server shut down during gateway round trip".to_string(),
                        ));
                    }
                    Ok(()) => continue,
                    // 关闭信号发送端已释放，只能等待延迟结束
                    Err(_) => {
                        (&mut sleep).await;
                        return Ok(());
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::Instant;

    fn event() -> PaymentResponseEvent {
        PaymentResponseEvent::new("req-1", json!({ "details": { "cardNumber": "4242" } }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_after_delay() {
        let (_tx, rx) = watch::channel(false);
        let gateway = SimulatedGateway::new(Duration::from_millis(9000), rx);

        let started = Instant::now();
        gateway.process(&event()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(9000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupted_by_shutdown() {
        let (tx, rx) = watch::channel(false);
        let gateway = SimulatedGateway::new(Duration::from_millis(9000), rx);

        let started = Instant::now();
        let task = tokio::spawn(async move { gateway.process(&event()).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(DomainError::GatewayInterrupted(_))));
        assert!(started.elapsed() < Duration::from_millis(9000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refuses_after_shutdown() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let gateway = SimulatedGateway::new(Duration::from_millis(9000), rx);

        assert!(matches!(
            gateway.process(&event()).await,
            Err(DomainError::GatewayInterrupted(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_shutdown_sender_still_waits() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let gateway = SimulatedGateway::new(Duration::from_millis(9000), rx);

        let started = Instant::now();
        gateway.process(&event()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(9000));
    }
}
