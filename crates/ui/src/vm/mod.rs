mod feedback_vm;
mod trainer_vm;

pub use feedback_vm::{FeedbackItemVm, FeedbackVm, TestRowVm, map_feedback};
pub use trainer_vm::{ExerciseVm, TrainerIntent, TrainerSnapshot, TrainerUpdate, TrainerVm};
