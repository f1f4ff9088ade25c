use comfy_table::presets::UTF8_HORIZONTAL_ONLY;
use comfy_table::{
    Cell, CellAlignment, ColumnConstraint, ContentArrangement, Table, Width,
};

use super::WorkTask;

pub const DEFAULT_WIDTH: u16 = 150;

const STATUS_WIDTH: u16 = 10;
const STARTED_WIDTH: u16 = 14;
const DURATION_WIDTH: u16 = 16;

/// Renders the whole task list into one frame.
pub type Layout = Box<dyn Fn(&[WorkTask]) -> String>;

/// Status, Started At, Duration (s) and Task columns in a table of `width` characters.
pub fn table_layout(width: u16) -> Layout {
    Box::new(move |tasks| render_table(tasks, width))
}

pub fn default_layout() -> Layout {
    table_layout(DEFAULT_WIDTH)
}

/// `width`, narrowed to the current terminal so live frames never wrap.
pub fn fit_to_terminal(width: u16) -> u16 {
    clamp_width(width, crossterm::terminal::size().ok().map(|(columns, _)| columns))
}

fn clamp_width(width: u16, columns: Option<u16>) -> u16 {
    match columns {
        Some(columns) if columns > 0 => width.min(columns),
        _ => width,
    }
}

fn render_table(tasks: &[WorkTask], width: u16) -> String {
    let task_width = width
        .saturating_sub(STATUS_WIDTH + STARTED_WIDTH + DURATION_WIDTH)
        .max(10);

    let mut table = Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width)
        .set_header(vec![
            Cell::new("Status"),
            Cell::new("Started At"),
            Cell::new("Duration (s)"),
            Cell::new("Task"),
        ])
        .set_constraints(vec![
            ColumnConstraint::Absolute(Width::Fixed(STATUS_WIDTH)),
            ColumnConstraint::Absolute(Width::Fixed(STARTED_WIDTH)),
            ColumnConstraint::Absolute(Width::Fixed(DURATION_WIDTH)),
            ColumnConstraint::UpperBoundary(Width::Fixed(task_width)),
        ]);

    for task in tasks {
        table.add_row(task.values().map(Cell::new));
    }

    let alignments = [
        CellAlignment::Center,
        CellAlignment::Center,
        CellAlignment::Right,
        CellAlignment::Left,
    ];
    for (index, alignment) in alignments.into_iter().enumerate() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(alignment);
        }
    }

    table.to_string()
}
