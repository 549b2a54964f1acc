use std::{cell::RefCell, rc::Rc};

use log::{error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    step::{Step, StepExecution},
};

/// Type alias for job execution results.
///
/// A `JobResult` is a `Result` that contains either:
/// - A successful `JobExecution` with the accumulated step results
/// - A `BatchError` indicating what went wrong
pub type JobResult<T> = Result<T, BatchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Status of a job prior to its execution.
    Starting,
    /// Status of a job that is running.
    Started,
    /// The job has successfully completed its execution.
    Completed,
    /// The job has failed during its execution.
    Failed,
}

/// Accumulated state of one job run.
///
/// A `JobExecution` owns the ordered list of [`StepExecution`] results,
/// appended as each step completes, plus the overall [`BatchStatus`]. It is a
/// cheap handle (`Rc` inside): clones observe the same run. That is the
/// cross-step interface — a later step's writer callback holds a clone created
/// before the job ran and reads an earlier step's final counts through it.
///
/// The engine is single-threaded (steps run strictly in sequence), so a
/// completed result is never observed mid-mutation.
#[derive(Debug, Clone, Default)]
pub struct JobExecution {
    state: Rc<RefCell<JobExecutionState>>,
}

#[derive(Debug)]
struct JobExecutionState {
    status: BatchStatus,
    step_executions: Vec<StepExecution>,
}

impl Default for JobExecutionState {
    fn default() -> Self {
        Self {
            status: BatchStatus::Starting,
            step_executions: Vec::new(),
        }
    }
}

impl JobExecution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> BatchStatus {
        self.state.borrow().status
    }

    /// Returns the step results accumulated so far, in execution order.
    pub fn step_executions(&self) -> Vec<StepExecution> {
        self.state.borrow().step_executions.clone()
    }

    /// Looks up the execution record of a step by name.
    pub fn step_execution(&self, step_name: &str) -> Option<StepExecution> {
        self.state
            .borrow()
            .step_executions
            .iter()
            .find(|step_execution| step_execution.name == step_name)
            .cloned()
    }

    /// Returns the final read count of the named step.
    ///
    /// # Returns
    /// - `Ok(count)` when the step has already run
    /// - `Err(BatchError::Configuration)` when no step of that name has
    ///   completed — a cross-step reference to a step that does not exist, or
    ///   that is scheduled after the caller
    pub fn read_count(&self, step_name: &str) -> Result<usize, BatchError> {
        self.step_execution(step_name)
            .map(|step_execution| step_execution.read_count)
            .ok_or_else(|| {
                BatchError::Configuration(format!(
                    "no completed step execution named '{}'",
                    step_name
                ))
            })
    }

    fn add_step_execution(&self, step_execution: StepExecution) {
        self.state
            .borrow_mut()
            .step_executions
            .push(step_execution);
    }

    fn set_status(&self, status: BatchStatus) {
        self.state.borrow_mut().status = status;
    }
}

/// Represents a job that can be executed.
///
/// A job is a container for a sequence of steps executed in order. The job is
/// responsible for orchestrating the steps and reporting the overall result.
pub trait Job {
    /// Runs the job and returns the accumulated execution.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when every step ran to completion
    /// - `Err(BatchError::Step)` naming the first step that failed
    fn run(&self) -> JobResult<JobExecution>;
}

/// An ordered sequence of steps sharing one [`JobExecution`].
///
/// # Lifecycle
///
/// A job instance is created through the [`JobBuilder`] and executed by
/// calling [`Job::run`]. Steps run strictly sequentially; the first failure
/// stops the job, leaving the results accumulated so far inspectable through
/// the execution handle.
pub struct JobInstance<'a> {
    /// Unique identifier for this job instance
    id: Uuid,
    /// Human-readable name for the job
    name: String,
    /// Collection of steps that make up this job, in execution order
    steps: Vec<&'a dyn Step>,
    execution: JobExecution,
}

impl JobInstance<'_> {
    /// Returns a handle onto this job's execution.
    pub fn execution(&self) -> JobExecution {
        self.execution.clone()
    }
}

impl Job for JobInstance<'_> {
    fn run(&self) -> JobResult<JobExecution> {
        info!("Start of job: {}, id: {}", self.name, self.id);

        self.execution.set_status(BatchStatus::Started);

        for step in &self.steps {
            let mut step_execution = StepExecution::new(step.name());
            let result = step.execute(&mut step_execution);

            // The record is appended even on failure, so the counts
            // accumulated before the abort stay inspectable.
            let step_name = step_execution.name.clone();
            self.execution.add_step_execution(step_execution);

            if let Err(cause) = result {
                error!("Step {} failed: {}", step_name, cause);
                self.execution.set_status(BatchStatus::Failed);
                return Err(BatchError::Step(step_name));
            }
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        self.execution.set_status(BatchStatus::Completed);

        Ok(self.execution.clone())
    }
}

/// Builder for creating a job instance.
///
/// # Example
///
/// ```rust,no_run,compile_fail
/// use chunk_batch_rs::core::job::JobBuilder;
///
/// let job = JobBuilder::new()
///     .name("import-records".to_string())
///     .start(&read_step)
///     .next(&report_step)
///     .build();
/// ```
#[derive(Default)]
pub struct JobBuilder<'a> {
    /// Optional name for the job (generated randomly if not specified)
    name: Option<String>,
    /// Collection of steps to be executed, in order
    steps: Vec<&'a dyn Step>,
    /// Optional caller-owned execution accumulator
    execution: Option<JobExecution>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
            execution: None,
        }
    }

    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Shares a caller-owned execution accumulator with the job.
    ///
    /// Use this when writer callbacks need to read earlier steps' results:
    /// create the `JobExecution` first, hand clones to the callbacks, then
    /// register the same handle here.
    pub fn execution(mut self, execution: &JobExecution) -> JobBuilder<'a> {
        self.execution = Some(execution.clone());
        self
    }

    /// Sets the first step of the job.
    ///
    /// Semantically identical to `next()` but reads better for the initial
    /// step.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Adds a step to the job. Steps are executed in the order they are added.
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
            execution: self.execution.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use std::cell::RefCell;

    use crate::core::{
        item::{ItemProcessor, ItemProcessorResult, ItemWriter},
        step::{ChunkOrientedStep, StepBuilder, StepStatus},
    };
    use crate::item::vec::vec_reader::VecItemReader;

    use super::*;

    #[derive(Default)]
    struct RecordingWriter {
        lines: RefCell<Vec<String>>,
    }

    impl ItemWriter<String> for RecordingWriter {
        fn write(&self, items: &[String]) -> Result<(), BatchError> {
            self.lines.borrow_mut().extend(items.iter().cloned());
            Ok(())
        }
    }

    struct ToStringProcessor;

    impl ItemProcessor<i32, String> for ToStringProcessor {
        fn process(&self, item: &i32) -> ItemProcessorResult<String> {
            Ok(Some(item.to_string()))
        }
    }

    #[test]
    fn completed_job_exposes_every_step_execution() -> Result<()> {
        let execution = JobExecution::new();

        let reader1 = VecItemReader::new(vec![1, 2, 3]);
        let processor1 = ToStringProcessor;
        let writer1 = RecordingWriter::default();
        let step1: ChunkOrientedStep<i32, String> = StepBuilder::new("count-up")
            .chunk(2)
            .reader(&reader1)
            .processor(&processor1)
            .writer(&writer1)
            .build();

        let reader2 = VecItemReader::new(vec!["a".to_string()]);
        let writer2 = RecordingWriter::default();
        let step2: ChunkOrientedStep<String, String> = StepBuilder::new("letters")
            .chunk(2)
            .reader(&reader2)
            .writer(&writer2)
            .build();

        let job = JobBuilder::new()
            .name("two-steps".to_string())
            .execution(&execution)
            .start(&step1)
            .next(&step2)
            .build();

        let result = job.run()?;

        assert_eq!(result.status(), BatchStatus::Completed);
        assert_eq!(execution.status(), BatchStatus::Completed);
        assert_eq!(execution.step_executions().len(), 2);
        assert_eq!(execution.read_count("count-up")?, 3);
        assert_eq!(execution.read_count("letters")?, 1);

        Ok(())
    }

    #[test]
    fn unknown_step_name_is_a_configuration_error() {
        let execution = JobExecution::new();
        let result = execution.read_count("no-such-step");
        assert!(matches!(result, Err(BatchError::Configuration(_))));
    }

    struct FailingReader;

    impl crate::core::item::ItemReader<i32> for FailingReader {
        fn read(&self) -> Result<Option<i32>, BatchError> {
            Err(BatchError::ItemReader("unreadable".to_string()))
        }
    }

    #[test]
    fn first_failure_stops_remaining_steps() {
        let execution = JobExecution::new();

        let reader1 = FailingReader;
        let processor1 = ToStringProcessor;
        let writer1 = RecordingWriter::default();
        let step1: ChunkOrientedStep<i32, String> = StepBuilder::new("broken")
            .chunk(2)
            .reader(&reader1)
            .processor(&processor1)
            .writer(&writer1)
            .build();

        let reader2 = VecItemReader::new(vec!["never".to_string()]);
        let writer2 = RecordingWriter::default();
        let step2: ChunkOrientedStep<String, String> = StepBuilder::new("skipped")
            .chunk(2)
            .reader(&reader2)
            .writer(&writer2)
            .build();

        let job = JobBuilder::new()
            .execution(&execution)
            .start(&step1)
            .next(&step2)
            .build();

        let result = job.run();

        assert!(matches!(result, Err(BatchError::Step(name)) if name == "broken"));
        assert_eq!(execution.status(), BatchStatus::Failed);
        assert_eq!(execution.step_executions().len(), 1);
        assert_eq!(
            execution.step_execution("broken").unwrap().status,
            StepStatus::ReadError
        );
        assert!(execution.step_execution("skipped").is_none());
        assert!(writer2.lines.borrow().is_empty());
    }
}
