use std::cell::RefCell;

use crate::CellId;


thread_local! {
    static RECOMPUTING: RefCell<Vec<CellId>> = const { RefCell::new(Vec::new()) };
}

/// How many times one derived cell may be recomputing at once on the call stack.
///
/// A write-back from an observer re-enters the recompute of the cell it observes.
/// Such a chain usually settles after a few rounds; one that reaches this depth does not.
pub const MAX_RECOMPUTE_REENTRY: usize = 100;

/// Marks a derived cell as recomputing for the lifetime of the guard.
pub(crate) struct RecomputeGuard {
    id: CellId,
}

impl RecomputeGuard {
    pub fn enter(id: CellId) -> Self {
        let reentry = RECOMPUTING.with(|stack| {
            let mut stack = stack.borrow_mut();
            let reentry = stack.iter().filter(|&&x| x == id).count();
            if reentry < MAX_RECOMPUTE_REENTRY {
                stack.push(id);
            }
            reentry
        });
        if reentry >= MAX_RECOMPUTE_REENTRY {
            tracing::error!(cell = %id, reentry, "cyclic dependency");
            panic!("detect cyclic dependency: {id} re-entered {reentry} times without settling");
        }
        if reentry > 0 {
            tracing::debug!(cell = %id, reentry, "recompute re-entered");
        }
        Self { id }
    }
}
impl Drop for RecomputeGuard {
    fn drop(&mut self) {
        RECOMPUTING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(index) = stack.iter().rposition(|&x| x == self.id) {
                stack.remove(index);
            }
        });
    }
}

/// Returns the number of derived cell recomputes in progress on this thread.
pub fn recompute_depth() -> usize {
    RECOMPUTING.with(|stack| stack.borrow().len())
}
