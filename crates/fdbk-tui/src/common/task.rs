#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Network operations that run at most once at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    SignIn,
    Register,
    SignOut,
    FeedbackLoad,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in `TuiState`, mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Marks `id` active as soon as the reducer emits the effect, so a second
    /// trigger in the same frame is refused before `TaskStarted` arrives.
    pub fn reserve(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub sign_in: TaskState,
    pub register: TaskState,
    pub sign_out: TaskState,
    pub feedback_load: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::SignIn => &self.sign_in,
            TaskKind::Register => &self.register,
            TaskKind::SignOut => &self.sign_out,
            TaskKind::FeedbackLoad => &self.feedback_load,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::SignIn => &mut self.sign_in,
            TaskKind::Register => &mut self.register,
            TaskKind::SignOut => &mut self.sign_out,
            TaskKind::FeedbackLoad => &mut self.feedback_load,
        }
    }

    /// Reserves a fresh task id for `kind`, or `None` if one is already running.
    pub fn try_begin(&mut self, seq: &mut TaskSeq, kind: TaskKind) -> Option<TaskId> {
        let state = self.state_mut(kind);
        if state.is_running() {
            return None;
        }
        let id = seq.next_id();
        state.reserve(id);
        Some(id)
    }

    pub fn is_any_running(&self) -> bool {
        self.sign_in.is_running()
            || self.register.is_running()
            || self.sign_out.is_running()
            || self.feedback_load.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_begin_is_single_flight() {
        let mut seq = TaskSeq::default();
        let mut tasks = Tasks::default();

        let first = tasks.try_begin(&mut seq, TaskKind::FeedbackLoad);
        assert_eq!(first, Some(TaskId(0)));
        assert_eq!(tasks.try_begin(&mut seq, TaskKind::FeedbackLoad), None);

        // Other kinds are independent.
        assert_eq!(tasks.try_begin(&mut seq, TaskKind::SignIn), Some(TaskId(1)));
        assert!(tasks.is_any_running());
    }

    #[test]
    fn test_finish_only_for_active_id() {
        let mut state = TaskState::default();
        state.reserve(TaskId(3));

        assert!(!state.finish_if_active(TaskId(2)));
        assert!(state.is_running());
        assert!(state.finish_if_active(TaskId(3)));
        assert!(!state.is_running());
    }
}
