//! Task priority test fixtures.
//!
//! The score of a [`TaskSolution`] is the sum of its assigned priorities,
//! which makes the score of any single change easy to predict in tests.
//!
//! ```
//! use stepforge_test::task::{calculate_priority_sum, Task, TaskSolution};
//! use stepforge_core::SimpleScore;
//!
//! let solution = TaskSolution::new(vec![Task::with_priority(-2), Task::unassigned()]);
//! assert_eq!(calculate_priority_sum(&solution), SimpleScore::of(-2));
//! ```

use stepforge_core::{PlanningSolution, SimpleScore};

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub priority: Option<i64>,
}

impl Task {
    pub fn with_priority(priority: i64) -> Self {
        Self {
            priority: Some(priority),
        }
    }

    pub fn unassigned() -> Self {
        Self { priority: None }
    }
}

#[derive(Clone, Debug)]
pub struct TaskSolution {
    pub tasks: Vec<Task>,
    pub score: Option<SimpleScore>,
}

impl TaskSolution {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, score: None }
    }

    pub fn with_priorities(priorities: &[i64]) -> Self {
        Self::new(priorities.iter().map(|&p| Task::with_priority(p)).collect())
    }

    pub fn priorities(&self) -> Vec<Option<i64>> {
        self.tasks.iter().map(|t| t.priority).collect()
    }
}

impl PlanningSolution for TaskSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

pub fn task_count(s: &TaskSolution) -> usize {
    s.tasks.len()
}

pub fn get_priority(s: &TaskSolution, idx: usize) -> Option<i64> {
    s.tasks.get(idx).and_then(|t| t.priority)
}

pub fn set_priority(s: &mut TaskSolution, idx: usize, v: Option<i64>) {
    if let Some(task) = s.tasks.get_mut(idx) {
        task.priority = v;
    }
}

pub fn calculate_priority_sum(s: &TaskSolution) -> SimpleScore {
    SimpleScore::of(s.tasks.iter().filter_map(|t| t.priority).sum())
}
