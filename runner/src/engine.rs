//! Entry point for executing a whole descriptor tree.

use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info, instrument};

use crate::core::collector::panic_message;
use crate::core::descriptor::Descriptor;
use crate::core::executor::NodeExecutor;
use crate::core::listener::{ExecutionListener, ListenerPanic};
use crate::core::tracker::ExecutionTracker;

/// Executes descriptor trees, reporting exclusively through a listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionEngine;

impl ExecutionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Execute `root` and its subtree with `root_context`.
    ///
    /// Every call gets a fresh [`ExecutionTracker`], so running the same tree twice
    /// executes it twice. A panic raised by `listener` is resumed here with its
    /// original payload.
    #[instrument(skip_all, fields(root = %root.id()))]
    pub fn execute<C: Clone>(
        &self,
        root: &Descriptor<C>,
        root_context: &C,
        listener: &mut dyn ExecutionListener<C>,
    ) {
        let mut tracker = ExecutionTracker::new();
        info!(declared = root.count(), "starting execution");
        let run = panic::catch_unwind(AssertUnwindSafe(|| {
            NodeExecutor::new(root).execute(root_context, &mut tracker, &mut *listener);
        }));
        if let Err(payload) = run {
            match payload.downcast::<ListenerPanic>() {
                Ok(listener_panic) => {
                    error!(
                        panic = %panic_message(listener_panic.0.as_ref()),
                        "listener panicked, aborting run"
                    );
                    panic::resume_unwind(listener_panic.0);
                }
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        info!(executed = tracker.len(), "execution finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::ExecutionOutcome;
    use crate::test_support::{Event, RecordingListener};

    /// Panics when `target` starts; remembers every finished id.
    struct PanicOnStart {
        target: &'static str,
        finished: Vec<String>,
    }

    impl<C: Clone> ExecutionListener<C> for PanicOnStart {
        fn execution_started(&mut self, descriptor: &Descriptor<C>) {
            if descriptor.id().as_str() == self.target {
                panic!("listener broke");
            }
        }

        fn execution_finished(&mut self, descriptor: &Descriptor<C>, _outcome: &ExecutionOutcome) {
            self.finished.push(descriptor.id().to_string());
        }
    }

    #[test]
    fn each_call_uses_a_fresh_tracker() {
        let root: Descriptor<()> = Descriptor::new("root", "Root");
        let engine = ExecutionEngine::new();
        let mut listener = RecordingListener::new();

        engine.execute(&root, &(), &mut listener);
        engine.execute(&root, &(), &mut listener);

        assert_eq!(
            listener.events(),
            [
                Event::Started("root".to_string()),
                Event::succeeded("root"),
                Event::Started("root".to_string()),
                Event::succeeded("root"),
            ]
        );
    }

    #[test]
    fn listener_panic_aborts_the_run_instead_of_failing_a_node() {
        let root: Descriptor<()> = Descriptor::new("root", "Root")
            .with_child(Descriptor::new("child", "Child"))
            .with_child(Descriptor::new("sibling", "Sibling"));
        let mut listener = PanicOnStart {
            target: "child",
            finished: Vec::new(),
        };

        let payload = panic::catch_unwind(AssertUnwindSafe(|| {
            ExecutionEngine::new().execute(&root, &(), &mut listener);
        }))
        .expect_err("listener panic escapes");

        assert_eq!(payload.downcast_ref::<&str>(), Some(&"listener broke"));
        assert!(listener.finished.is_empty());
    }
}
