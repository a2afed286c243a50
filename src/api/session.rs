use crate::api::AppState;
use crate::application::{
    ClientMessage, PaymentFlowController, ServerMessage, UiCommand, UiEventLoop,
};
use crate::infrastructure::{BrowserSession, SimulatedGateway};
use axum::extract::ws::{Message, WebSocket};
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

/// 运行一个视图会话，直到 WebSocket 关闭
pub async fn run(socket: WebSocket, state: AppState) {
    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("session", %session_id);
    let (sink, stream) = socket.split();
    serve(sink, stream, state, session_id).instrument(span).await
}

async fn serve<S, R, E>(mut sink: S, mut stream: R, state: AppState, session_id: Uuid)
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin + Send,
    E: Display + Send,
{
    info!("View session attached");

    let (outbound_tx, mut outbound_rx) =
        mpsc::channel::<ServerMessage>(state.config.outbound_capacity);

    // 下行：依次写入浏览器
    let writer = tokio::spawn(
        async move {
            while let Some(message) = outbound_rx.recv().await {
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        error!(error = %e, "Failed to serialize server message");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(text)).await {
                    debug!(error = %e, "WebSocket write failed, stopping writer");
                    break;
                }
            }
            let _ = sink.close().await;
        }
        .in_current_span(),
    );

    let browser = Arc::new(BrowserSession::new(session_id, outbound_tx));
    let gateway = Arc::new(SimulatedGateway::new(
        state.config.gateway_delay,
        state.shutdown.clone(),
    ));
    let (ui_loop, ui) = UiEventLoop::channel(state.config.mailbox_capacity);
    let controller = PaymentFlowController::new(
        browser.clone(),
        browser,
        gateway,
        ui.clone(),
        state.config.flow_settings(),
    );
    let ui_task = tokio::spawn(ui_loop.run(controller).in_current_span());

    // 上行：浏览器事件投递到 UI 邮箱
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "WebSocket read failed");
                break;
            }
        };

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => {
                if ui.submit(UiCommand::from(message)).await.is_err() {
                    warn!("UI loop stopped unexpectedly");
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Dropping malformed client message"),
        }
    }

    let _ = ui.submit(UiCommand::Detach).await;
    drop(ui);
    if let Err(e) = ui_task.await {
        error!(error = %e, "UI loop task failed");
    }
    if let Err(e) = writer.await {
        error!(error = %e, "Writer task failed");
    }

    info!("View session detached");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::payment_flow::{PROCESSING_MESSAGE, UNSUPPORTED_MESSAGE};
    use crate::infrastructure::AppConfig;
    use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
    use serde_json::{json, Value};
    use std::io;
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::task::JoinHandle;

    const GATEWAY_DELAY: Duration = Duration::from_millis(9000);

    type ClientFrames = UnboundedSender<Result<Message, io::Error>>;

    struct Browser {
        frames: ClientFrames,
        inbox: UnboundedReceiver<Message>,
        session: JoinHandle<()>,
        _shutdown: watch::Sender<bool>,
    }

    fn connect() -> Browser {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let state = AppState {
            config: Arc::new(AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                gateway_delay: GATEWAY_DELAY,
                notice_duration: Duration::from_millis(9000),
                mailbox_capacity: 8,
                outbound_capacity: 8,
            }),
            shutdown: shutdown_rx,
        };

        let (frames, server_stream) = unbounded();
        let (server_sink, inbox) = unbounded();
        let session = tokio::spawn(serve(server_sink, server_stream, state, Uuid::new_v4()));

        Browser {
            frames,
            inbox,
            session,
            _shutdown: shutdown,
        }
    }

    impl Browser {
        fn send_text(&self, text: &str) {
            self.frames
                .unbounded_send(Ok(Message::Text(text.to_string())))
                .unwrap();
        }

        fn send_json(&self, value: Value) {
            self.send_text(&value.to_string());
        }

        async fn next_json(&mut self) -> Value {
            match self.inbox.next().await {
                Some(Message::Text(text)) => serde_json::from_str(&text).unwrap(),
                other => panic!("expected text frame, got {:?}", other),
            }
        }

        /// 等待会话结束，返回剩余的下行消息
        async fn finish(mut self) -> Vec<Value> {
            self.session.await.unwrap();

            let mut rest = Vec::new();
            while let Some(frame) = self.inbox.next().await {
                if let Message::Text(text) = frame {
                    rest.push(serde_json::from_str(&text).unwrap());
                }
            }
            rest
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_and_binary_frames_are_skipped() {
        let mut browser = connect();
        assert_eq!(browser.next_json().await["type"], "query_support");

        browser.send_text("not json at all");
        browser.send_json(json!({ "type": "self_destruct" }));
        browser
            .frames
            .unbounded_send(Ok(Message::Binary(vec![1, 2, 3])))
            .unwrap();
        browser.send_json(json!({ "type": "support_result", "supported": true }));

        let install = browser.next_json().await;
        assert_eq!(install["type"], "install_payment_request");
        assert_eq!(install["methods"][0]["supportedMethods"], "basic-card");

        browser.frames.close_channel();
        assert!(browser.finish().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_socket_close_mid_delay_detaches_without_completion() {
        let mut browser = connect();
        assert_eq!(browser.next_json().await["type"], "query_support");
        browser.send_json(json!({ "type": "support_result", "supported": true }));
        assert_eq!(browser.next_json().await["type"], "install_payment_request");

        browser.send_json(json!({
            "type": "payment_response",
            "response_id": "req-1",
            "data": { "details": { "cardNumber": "4242424242424242" } }
        }));
        let notice = browser.next_json().await;
        assert_eq!(notice["type"], "show_notification");
        assert_eq!(notice["message"], PROCESSING_MESSAGE);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        browser.frames.close_channel();

        let rest = browser.finish().await;
        tokio::time::sleep(GATEWAY_DELAY * 2).await;

        assert!(rest.iter().all(|message| message["type"] != "complete_payment"));
        assert!(rest.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_frame_ends_session() {
        let mut browser = connect();
        assert_eq!(browser.next_json().await["type"], "query_support");

        browser
            .frames
            .unbounded_send(Ok(Message::Close(None)))
            .unwrap();
        // 关闭后的帧不再处理
        browser.send_json(json!({ "type": "support_result", "supported": true }));

        assert!(browser.finish().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_error_ends_session() {
        let mut browser = connect();
        assert_eq!(browser.next_json().await["type"], "query_support");
        browser.send_json(json!({ "type": "support_result", "supported": false }));
        browser.send_json(json!({ "type": "button_click" }));
        let notice = browser.next_json().await;
        assert_eq!(notice["message"], UNSUPPORTED_MESSAGE);

        browser
            .frames
            .unbounded_send(Err(io::Error::other("connection reset")))
            .unwrap();

        assert!(browser.finish().await.is_empty());
    }
}
