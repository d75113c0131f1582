//! Next-tick task queue standing in for the host's animation-frame
//! callback.

use std::cell::RefCell;
use std::collections::VecDeque;

type Task = Box<dyn FnOnce()>;

/// FIFO of deferred closures, drained once per host frame.
///
/// A task scheduled while a frame is running lands in the following frame,
/// matching animation-frame semantics: the local viewport update and render
/// always complete before a deferred cross-viewport sync runs.
#[derive(Default)]
pub struct TickQueue {
    pending: RefCell<VecDeque<Task>>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.pending.borrow_mut().push_back(Box::new(task));
    }

    /// Runs every task that was pending when the frame started.
    pub fn run_tick(&self) {
        let frame: Vec<Task> = self.pending.borrow_mut().drain(..).collect();
        for task in frame {
            task();
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn pending_tasks(&self) -> usize {
        self.pending.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_tasks_run_in_order() {
        let queue = TickQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = Rc::clone(&log);
            queue.schedule(move || log.borrow_mut().push(i));
        }
        queue.run_tick();
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_schedule_during_tick_defers_to_next_frame() {
        let queue = Rc::new(TickQueue::new());
        let ran = Rc::new(Cell::new(false));

        let inner_queue = Rc::clone(&queue);
        let inner_ran = Rc::clone(&ran);
        queue.schedule(move || {
            let ran = Rc::clone(&inner_ran);
            inner_queue.schedule(move || ran.set(true));
        });

        queue.run_tick();
        assert!(!ran.get(), "rescheduled task must not run in the same frame");
        assert_eq!(queue.pending_tasks(), 1);

        queue.run_tick();
        assert!(ran.get());
    }
}
