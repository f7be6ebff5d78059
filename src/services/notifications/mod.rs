//! 评审通知钩子
//!
//! final 评审产生后在进程内广播，通知投递由订阅方负责。发布永不阻塞请求，
//! 没有订阅者也不算错误。

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::models::evaluations::entities::{Evaluation, EvaluationScope};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationFinalized {
    pub evaluation_id: i64,
    pub event_id: i64,
    pub scope: EvaluationScope,
    pub team_id: Option<i64>,
    pub submission_id: Option<i64>,
}

impl EvaluationFinalized {
    pub fn from_evaluation(evaluation: &Evaluation, team_id: Option<i64>) -> Self {
        Self {
            evaluation_id: evaluation.id,
            event_id: evaluation.event_id,
            scope: evaluation.target.scope(),
            team_id: team_id.or(evaluation.target.team_id()),
            submission_id: evaluation.target.submission_id(),
        }
    }
}

#[derive(Clone)]
pub struct EvaluationNotifier {
    sender: broadcast::Sender<EvaluationFinalized>,
}

impl Default for EvaluationNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EvaluationNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EvaluationFinalized> {
        self.sender.subscribe()
    }

    /// 发布消息，返回收到消息的订阅者数量
    pub fn publish(&self, message: EvaluationFinalized) -> usize {
        match self.sender.send(message) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(message)) => {
                debug!(
                    "No subscribers for finalized evaluation {}",
                    message.evaluation_id
                );
                0
            }
        }
    }

    /// 启动一个只写日志的订阅者
    pub fn spawn_log_subscriber(&self) -> tokio::task::JoinHandle<()> {
        let mut receiver = self.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(message) => info!(
                        "Evaluation {} finalized (event {}, scope {}, team {:?}, submission {:?})",
                        message.evaluation_id,
                        message.event_id,
                        message.scope,
                        message.team_id,
                        message.submission_id
                    ),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Notification log subscriber lagged, {} messages skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64) -> EvaluationFinalized {
        EvaluationFinalized {
            evaluation_id: id,
            event_id: 1,
            scope: EvaluationScope::Submission,
            team_id: Some(2),
            submission_id: Some(3),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let notifier = EvaluationNotifier::new(4);
        assert_eq!(notifier.publish(message(1)), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_message() {
        let notifier = EvaluationNotifier::default();
        let mut rx = notifier.subscribe();
        assert_eq!(notifier.publish(message(9)), 1);
        assert_eq!(rx.recv().await.unwrap(), message(9));
    }
}
