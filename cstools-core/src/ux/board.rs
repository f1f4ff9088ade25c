use crossterm::cursor::MoveUp;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::future::Future;
use std::io::{IsTerminal, Write};
use tracing::{debug, warn};

use super::layout::{default_layout, Layout};
use super::WorkTask;
use crate::error::{CsToolsError, CsToolsResult};

/// A live-updating table of named tasks.
///
/// Rows render in registration order. Every state change redraws the whole
/// board: in live mode the previous frame is erased first, otherwise frames
/// are appended one after another.
pub struct TaskBoard {
    tasks: RefCell<Vec<WorkTask>>,
    layout: Layout,
    output: RefCell<Box<dyn Write>>,
    live: bool,
    drawn_lines: Cell<u16>,
}

impl TaskBoard {
    /// Build a board from `(name, description)` pairs, drawing to stdout.
    pub fn new<I, N, D>(pairs: I) -> CsToolsResult<Self>
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<String>,
    {
        Self::from_tasks(
            pairs
                .into_iter()
                .map(|(name, description)| WorkTask::new(name, description))
                .collect(),
        )
    }

    pub fn from_tasks(tasks: Vec<WorkTask>) -> CsToolsResult<Self> {
        let mut names = HashSet::new();
        for task in &tasks {
            if !names.insert(task.name().to_string()) {
                return Err(CsToolsError::invalid_argument(format!(
                    "duplicate task name '{}'",
                    task.name()
                )));
            }
        }

        let stdout = std::io::stdout();
        let live = stdout.is_terminal();

        Ok(Self {
            tasks: RefCell::new(tasks),
            layout: default_layout(),
            output: RefCell::new(Box::new(stdout)),
            live,
            drawn_lines: Cell::new(0),
        })
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Draw to `output` instead of stdout; `live` redraws in place.
    pub fn with_output(mut self, output: Box<dyn Write>, live: bool) -> Self {
        self.output = RefCell::new(output);
        self.live = live;
        self
    }

    /// Disable in-place redraws, e.g. when stdout is piped.
    pub fn live(mut self, live: bool) -> Self {
        self.live = self.live && live;
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// A snapshot of the task called `name`.
    pub fn task(&self, name: &str) -> CsToolsResult<WorkTask> {
        let index = self.index_of(name)?;
        Ok(self.tasks.borrow()[index].clone())
    }

    fn index_of(&self, name: &str) -> CsToolsResult<usize> {
        self.tasks
            .borrow()
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| CsToolsError::TaskNotFound(name.to_string()))
    }

    /// Mark `name` as skipped; its status glyph stays blank from now on.
    pub fn skip(&self, name: &str) -> CsToolsResult<()> {
        let index = self.index_of(name)?;
        self.tasks.borrow_mut()[index].skip();
        debug!(task = name, "Skipped task");
        self.refresh()
    }

    /// Start `name`; the returned guard finishes it.
    ///
    /// Call [`TaskGuard::complete`] on success. A guard dropped without it,
    /// through an early return or a panic, marks the task failed.
    pub fn enter_task(&self, name: &str) -> CsToolsResult<TaskGuard<'_>> {
        let index = self.index_of(name)?;
        self.tasks.borrow_mut()[index].start();
        debug!(task = name, "Started task");
        self.refresh()?;

        Ok(TaskGuard {
            board: self,
            index,
            finished: false,
        })
    }

    /// Run `body` as task `name`, returning its result unchanged.
    pub fn run<T, E, F>(&self, name: &str, body: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<CsToolsError>,
    {
        let guard = self.enter_task(name)?;
        let result = body();
        if result.is_ok() {
            guard.complete();
        }
        result
    }

    /// Async counterpart of [`TaskBoard::run`].
    pub async fn run_async<T, E, Fut>(&self, name: &str, body: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: From<CsToolsError>,
    {
        let guard = self.enter_task(name)?;
        let result = body.await;
        if result.is_ok() {
            guard.complete();
        }
        result
    }

    /// Render the current frame without drawing it.
    pub fn render(&self) -> String {
        let tasks = self.tasks.borrow();
        (self.layout)(tasks.as_slice())
    }

    /// Redraw the board.
    pub fn refresh(&self) -> CsToolsResult<()> {
        let frame = self.render();
        let mut output = self.output.borrow_mut();

        if self.live && self.drawn_lines.get() > 0 {
            output.queue(MoveUp(self.drawn_lines.get()))?;
            output.queue(Clear(ClearType::FromCursorDown))?;
        }

        writeln!(output, "{}", frame)?;
        output.flush()?;

        let lines = frame.lines().count() + 1;
        self.drawn_lines
            .set(u16::try_from(lines).unwrap_or(u16::MAX));
        Ok(())
    }

    fn finish(&self, index: usize, success: bool) {
        let name = {
            let mut tasks = self.tasks.borrow_mut();
            tasks[index].stop(success);
            tasks[index].name().to_string()
        };
        debug!(task = %name, success, "Finished task");

        if let Err(e) = self.refresh() {
            warn!("Failed to redraw task board: {}", e);
        }
    }
}

/// Finishes a started task when it goes out of scope.
#[must_use = "dropping the guard immediately marks the task as failed"]
pub struct TaskGuard<'a> {
    board: &'a TaskBoard,
    index: usize,
    finished: bool,
}

impl TaskGuard<'_> {
    pub fn complete(mut self) {
        self.finished = true;
        self.board.finish(self.index, true);
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.board.finish(self.index, false);
        }
    }
}
