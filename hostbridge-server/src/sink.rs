use hostbridge_core::WebSink;
use tokio::sync::broadcast;
use tracing::trace;

/// Fans every script out to all connected web views.
///
/// Scripts pushed while nobody listens are dropped.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<String>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn subscribers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl WebSink for BroadcastSink {
    fn execute_script(&self, script: &str) {
        match self.tx.send(script.to_string()) {
            Ok(receivers) => trace!(receivers, "script broadcast"),
            Err(_) => trace!("no web view connected; script dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out() {
        let sink = BroadcastSink::new(8);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();
        assert_eq!(sink.subscribers(), 2);

        sink.execute_script("Adaptive.handleXResult(1, null)");

        assert_eq!(first.recv().await.unwrap(), "Adaptive.handleXResult(1, null)");
        assert_eq!(second.recv().await.unwrap(), "Adaptive.handleXResult(1, null)");
    }

    #[test]
    fn test_no_subscribers_is_silent() {
        let sink = BroadcastSink::new(0);
        sink.execute_script("Adaptive.noop(1)");
        assert_eq!(sink.subscribers(), 0);
    }
}
