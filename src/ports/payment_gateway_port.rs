use crate::domain::errors::DomainResult;
use crate::domain::PaymentResponseEvent;
use async_trait::async_trait;

/// 支付网关端口接口
#[async_trait]
pub trait PaymentGatewayPort: Send + Sync + 'static {
    /// 提交支付响应，网关处理完毕后返回
    async fn process(&self, response: &PaymentResponseEvent) -> DomainResult<()>;
}
