use tokio::task::JoinHandle;

/// Handle to a background loop; the task is aborted when this is dropped
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl TaskHandle {
    pub(crate) fn new(name: &'static str, task: JoinHandle<()>) -> Self {
        Self { name, task }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(self) {
        tracing::debug!(task = self.name, "Stopping background task");
        drop(self);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
