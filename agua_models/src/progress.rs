use std::fmt;

/// Today's count measured against the daily goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    pub count: u32,
    pub goal: u32,
}

impl DailyProgress {
    pub fn new(count: u32, goal: u32) -> Self {
        Self { count, goal }
    }

    pub fn remaining(&self) -> u32 {
        self.goal.saturating_sub(self.count)
    }

    pub fn is_reached(&self) -> bool {
        self.goal > 0 && self.count >= self.goal
    }
}

impl fmt::Display for DailyProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.count, self.goal)
    }
}
