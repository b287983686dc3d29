//! Final score summary shown when a quiz is completed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeTier {
    Excellent,
    Good,
    KeepStudying,
}

impl GradeTier {
    /// 70% and up is excellent, 50% and up is good.
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 70.0 {
            GradeTier::Excellent
        } else if pct >= 50.0 {
            GradeTier::Good
        } else {
            GradeTier::KeepStudying
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GradeTier::Excellent => "Excellent! Quiz complete!",
            GradeTier::Good => "Good job! Quiz complete!",
            GradeTier::KeepStudying => "Quiz complete. Keep studying!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
}

impl Summary {
    pub fn new(score: usize, total: usize) -> Self {
        Self { score, total }
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.score as f64) * 100.0 / (self.total as f64)
        }
    }

    /// Percentage rounded to a whole number for display.
    pub fn rounded_percentage(&self) -> u32 {
        self.percentage().round() as u32
    }

    pub fn tier(&self) -> GradeTier {
        GradeTier::from_percentage(self.percentage())
    }

    pub fn message(&self) -> String {
        format!(
            "You got {} of {} questions right ({}%).",
            self.score,
            self.total,
            self.rounded_percentage()
        )
    }
}
