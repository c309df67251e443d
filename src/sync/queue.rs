//! sync::queue
//!
//! The owning-thread task queue.
//!
//! Tree mutation is only safe on the thread that owns the widget. Fetches
//! finish on the async runtime and post their rebuild here as a closure;
//! the owner drains the [`TreeInbox`] and runs each closure against its
//! widget. The queue is single-consumer and FIFO.

use tokio::sync::mpsc;

use crate::tree::TreeWidget;

/// A unit of work for the widget owner.
pub type TreeTask = Box<dyn FnOnce(&mut dyn TreeWidget) + Send + 'static>;

/// Create a connected queue / inbox pair.
pub fn tree_queue() -> (TreeQueue, TreeInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TreeQueue { tx }, TreeInbox { rx })
}

/// Sending half, cloned into every synchronizer.
#[derive(Debug, Clone)]
pub struct TreeQueue {
    tx: mpsc::UnboundedSender<TreeTask>,
}

impl TreeQueue {
    /// Post a task. Returns `false` if the owner is gone.
    pub fn post(&self, task: TreeTask) -> bool {
        self.tx.send(task).is_ok()
    }
}

/// Receiving half, held by the widget owner.
#[derive(Debug)]
pub struct TreeInbox {
    rx: mpsc::UnboundedReceiver<TreeTask>,
}

impl TreeInbox {
    /// Take the next task if one is ready.
    pub fn try_next(&mut self) -> Option<TreeTask> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next task. `None` once every queue is dropped.
    pub async fn next(&mut self) -> Option<TreeTask> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RootKind;
    use crate::tree::{NodeSpec, TreeModel};

    #[test]
    fn tasks_run_in_post_order() {
        let (queue, mut inbox) = tree_queue();
        let mut tree = TreeModel::new();
        let root = tree.create_root(RootKind::Stashes);

        for label in ["first", "second"] {
            assert!(queue.post(Box::new(move |tree: &mut dyn TreeWidget| {
                tree.append_child(root, NodeSpec::new(label, label)).unwrap();
            })));
        }

        while let Some(task) = inbox.try_next() {
            task(&mut tree);
        }
        assert_eq!(tree.labels(root), vec!["first", "second"]);
    }

    #[test]
    fn post_fails_once_inbox_dropped() {
        let (queue, inbox) = tree_queue();
        drop(inbox);
        assert!(!queue.post(Box::new(|_: &mut dyn TreeWidget| {})));
    }
}
