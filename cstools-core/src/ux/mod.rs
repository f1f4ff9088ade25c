//! Terminal output shared by the tools.

mod board;
mod layout;
mod task;

pub use board::{TaskBoard, TaskGuard};
pub use layout::{default_layout, fit_to_terminal, table_layout, Layout, DEFAULT_WIDTH};
pub use task::{TaskStatus, WorkTask};
