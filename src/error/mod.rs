mod app_error;
mod constraint_map;

pub use app_error::{AppError, AppResult, ValidationKind};
pub use constraint_map::ConstraintMessageMap;
