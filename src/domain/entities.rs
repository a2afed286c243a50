use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::CardEnding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 支付尝试状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// 已收到支付响应
    Received,
    /// 网关处理中
    Processing,
    /// 支付成功
    Succeeded,
    /// 支付失败
    Failed,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptState::Received => write!(f, "received"),
            AttemptState::Processing => write!(f, "processing"),
            AttemptState::Succeeded => write!(f, "succeeded"),
            AttemptState::Failed => write!(f, "failed"),
        }
    }
}

/// 单次支付尝试（一次点击对应一次）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAttempt {
    /// 尝试ID（内部）
    pub id: Uuid,

    /// 浏览器端的支付响应ID
    pub response_id: String,

    /// 当前状态
    pub state: AttemptState,

    /// 卡号末四位（成功后设置）
    pub card_ending: Option<CardEnding>,

    /// 收到响应的时间
    pub received_at: DateTime<Utc>,

    /// 结束时间
    pub finished_at: Option<DateTime<Utc>>,
}

impl PaymentAttempt {
    pub fn new(response_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            response_id: response_id.into(),
            state: AttemptState::Received,
            card_ending: None,
            received_at: Utc::now(),
            finished_at: None,
        }
    }

    /// 更新为网关处理中
    pub fn mark_as_processing(&mut self) -> DomainResult<()> {
        if self.state != AttemptState::Received {
            return Err(DomainError::InvalidState {
                expected: AttemptState::Received.to_string(),
                actual: self.state.to_string(),
            });
        }

        self.state = AttemptState::Processing;
        Ok(())
    }

    /// 标记为支付成功
    pub fn mark_as_succeeded(&mut self, card_ending: CardEnding) -> DomainResult<()> {
        if self.state != AttemptState::Processing {
            return Err(DomainError::InvalidState {
                expected: AttemptState::Processing.to_string(),
                actual: self.state.to_string(),
            });
        }

        self.state = AttemptState::Succeeded;
        self.card_ending = Some(card_ending);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// 标记为支付失败
    pub fn mark_as_failed(&mut self) -> DomainResult<()> {
        if self.is_finished() {
            return Err(DomainError::InvalidState {
                expected: "received or processing".to_string(),
                actual: self.state.to_string(),
            });
        }

        self.state = AttemptState::Failed;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, AttemptState::Succeeded | AttemptState::Failed)
    }
}
