use crate::application::FlowSettings;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::NoticePosition;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// 服务配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 监听地址
    pub host: String,

    /// 监听端口
    pub port: u16,

    /// 模拟网关延迟
    pub gateway_delay: Duration,

    /// 通知显示时长
    pub notice_duration: Duration,

    /// 每个会话 UI 邮箱容量
    pub mailbox_capacity: usize,

    /// 每个会话下行消息队列容量
    pub outbound_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> DomainResult<Arc<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok()).map(Arc::new)
    }

    fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "SERVER_PORT", 3000)?,
            gateway_delay: Duration::from_millis(parse_var(
                &lookup,
                "PAYMENT_GATEWAY_DELAY_MS",
                9000,
            )?),
            notice_duration: Duration::from_millis(parse_var(
                &lookup,
                "NOTIFICATION_DURATION_MS",
                9000,
            )?),
            mailbox_capacity: parse_var(&lookup, "UI_MAILBOX_CAPACITY", 32)?,
            outbound_capacity: parse_var(&lookup, "SESSION_OUTBOUND_CAPACITY", 32)?,
        };

        if config.mailbox_capacity == 0 {
            return Err(DomainError::ConfigurationError(
                "UI_MAILBOX_CAPACITY must be greater than 0".to_string(),
            ));
        }
        if config.outbound_capacity == 0 {
            return Err(DomainError::ConfigurationError(
                "SESSION_OUTBOUND_CAPACITY must be greater than 0".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            notice_duration: self.notice_duration,
            notice_position: NoticePosition::Middle,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> DomainResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            DomainError::ConfigurationError(format!("{} has invalid value {:?}: {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
