//! 异步加载的取消标记
//!
//! 页面卸载后到达的响应不应再写入状态。组件持有一个 `CancelToken`，
//! 卸载时调用 `cancel()`；每个异步任务在写入前检查 `is_cancelled()`。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// 未取消时返回值本身
    pub fn guard<T>(&self, value: T) -> Option<T> {
        (!self.is_cancelled()).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let task_copy = token.clone();
        assert_eq!(task_copy.guard(1), Some(1));

        token.cancel();
        assert!(task_copy.is_cancelled());
        assert_eq!(task_copy.guard(1), None);
    }

    #[tokio::test]
    async fn test_late_response_is_discarded() {
        let token = CancelToken::new();
        let task_token = token.clone();
        let (tx, rx) = tokio::sync::oneshot::channel::<&str>();

        let task = tokio::spawn(async move {
            let response = rx.await.unwrap_or_default();
            task_token.guard(response.to_string())
        });

        token.cancel();
        tx.send("late").unwrap();
        assert_eq!(task.await.unwrap(), None);
    }
}
