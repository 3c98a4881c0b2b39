use tokio::task::JoinHandle;

/// Owns a spawned task and aborts it when dropped.
///
/// Replacing a guard (`*slot = Some(TaskGuard::new(..))`) therefore cancels
/// the previous task.
#[derive(Debug)]
pub struct TaskGuard {
    handle: JoinHandle<()>,
}

impl TaskGuard {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::new(tokio::spawn(future))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
