use crate::domain::errors::DomainResult;
use crate::domain::Notice;
use async_trait::async_trait;

/// 通知端口接口
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// 显示通知（不等待用户关闭）
    async fn show(&self, notice: Notice) -> DomainResult<()>;
}
