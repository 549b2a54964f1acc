use std::time::{Duration, Instant};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::BatchError;

use super::item::{
    ItemProcessor, ItemReadListener, ItemReader, ItemWriteListener, ItemWriter,
    PassThroughProcessor,
};

/// Outcome of filling one chunk from the reader.
#[derive(Debug, PartialEq, Eq)]
pub enum ChunkStatus {
    /// The chunk reached the commit interval.
    Full,
    /// The reader signalled the end of the source.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Status of a step prior to and during its execution.
    Starting,
    /// The step ran to completion.
    Success,
    /// The step was aborted by a reader failure.
    ReadError,
    /// The step was aborted by a processor failure.
    ProcessorError,
    /// The step was aborted by a writer failure.
    WriteError,
    /// The step was aborted by a failing listener hook.
    ListenerError,
}

/// Execution record of a single step.
///
/// Mutated by the executing step, appended to the owning [`JobExecution`]
/// when the step returns, and read-only from then on. Later steps observe
/// earlier steps only through these records.
///
/// [`JobExecution`]: crate::core::job::JobExecution
#[derive(Debug, Clone)]
pub struct StepExecution {
    /// Unique identifier for this step execution
    pub id: Uuid,
    /// Human-readable name for the step
    pub name: String,
    /// Current status of the step execution
    pub status: StepStatus,
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Number of items pulled from the reader, end-of-source excluded
    pub read_count: usize,
    /// Number of items handed to the writer
    pub write_count: usize,
    /// Number of items dropped by the processor
    pub filter_count: usize,
}

impl StepExecution {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: StepStatus::Starting,
            start_time: Instant::now(),
            end_time: Instant::now(),
            duration: Duration::ZERO,
            read_count: 0,
            write_count: 0,
            filter_count: 0,
        }
    }
}

pub trait Step {
    /// Executes the step, recording counts and status into `step_execution`.
    ///
    /// # Returns
    /// - `Ok(())` when the step ran to completion
    /// - `Err(BatchError)` when the step was aborted
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError>;

    fn name(&self) -> &str;
}

/// A step that drives the chunk loop: read one item at a time, process it,
/// accumulate the results, and hand full chunks to the writer.
pub struct ChunkOrientedStep<'a, I, O> {
    name: String,
    /// Component responsible for reading items from the source
    reader: &'a dyn ItemReader<I>,
    /// Component responsible for processing items
    processor: &'a dyn ItemProcessor<I, O>,
    /// Component responsible for writing chunks to the destination
    writer: &'a dyn ItemWriter<O>,
    read_listeners: Vec<&'a dyn ItemReadListener<I>>,
    write_listeners: Vec<&'a dyn ItemWriteListener<O>>,
    /// Number of items to accumulate before a chunk is written (commit interval)
    chunk_size: usize,
}

impl<I, O> Step for ChunkOrientedStep<'_, I, O> {
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let start_time = Instant::now();
        step_execution.status = StepStatus::Starting;

        info!(
            "Start of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        let result = self.run_chunk_loop(step_execution);

        if result.is_ok() {
            step_execution.status = StepStatus::Success;
        }

        step_execution.start_time = start_time;
        step_execution.end_time = Instant::now();
        step_execution.duration = start_time.elapsed();

        info!(
            "End of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<I, O> ChunkOrientedStep<'_, I, O> {
    /// Runs the step from header to footer.
    ///
    /// The footer hook (`writer.close()`) is only reached when every chunk was
    /// read, processed and written: any earlier abort returns before it.
    fn run_chunk_loop(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        if let Err(error) = self.writer.open() {
            warn!("Error opening writer: {}", error);
            step_execution.status = StepStatus::WriteError;
            return Err(error);
        }

        loop {
            let (items, chunk_status) = self.read_chunk(step_execution)?;

            if !items.is_empty() {
                self.write_chunk(step_execution, &items)?;
            }

            if chunk_status == ChunkStatus::Finished {
                break;
            }
        }

        if let Err(error) = self.writer.close() {
            warn!("Error closing writer: {}", error);
            step_execution.status = StepStatus::WriteError;
            return Err(error);
        }

        Ok(())
    }

    /// Reads and processes items until the chunk is full or the source is
    /// exhausted.
    ///
    /// Filtered items (`Ok(None)` from the processor) never occupy a chunk
    /// slot: the commit interval counts items that will actually be written.
    ///
    /// # Returns
    /// - `Ok((chunk, ChunkStatus::Full))`: the chunk reached `chunk_size` items
    /// - `Ok((chunk, ChunkStatus::Finished))`: end of source, `chunk` holds the
    ///   remaining items (possibly none)
    /// - `Err(BatchError)`: a reader, processor or listener failure
    fn read_chunk(
        &self,
        step_execution: &mut StepExecution,
    ) -> Result<(Vec<O>, ChunkStatus), BatchError> {
        debug!("Start reading chunk");

        let mut chunk: Vec<O> = Vec::with_capacity(self.chunk_size);

        loop {
            self.notify_before_read(step_execution)?;

            match self.reader.read() {
                Ok(Some(item)) => {
                    self.notify_after_read(step_execution, &item)?;
                    step_execution.read_count += 1;

                    match self.processor.process(&item) {
                        Ok(Some(processed_item)) => {
                            chunk.push(processed_item);

                            if chunk.len() >= self.chunk_size {
                                debug!("End reading chunk: full");
                                return Ok((chunk, ChunkStatus::Full));
                            }
                        }
                        Ok(None) => {
                            debug!("Item filtered");
                            step_execution.filter_count += 1;
                        }
                        Err(error) => {
                            warn!("Error processing item: {}", error);
                            step_execution.status = StepStatus::ProcessorError;
                            return Err(error);
                        }
                    }
                }
                Ok(None) => {
                    debug!("End reading chunk: finished");
                    return Ok((chunk, ChunkStatus::Finished));
                }
                Err(error) => {
                    warn!("Error reading item: {}", error);
                    for listener in &self.read_listeners {
                        listener.on_read_error(&error);
                    }
                    step_execution.status = StepStatus::ReadError;
                    return Err(error);
                }
            }
        }
    }

    /// Hands one chunk to the writer and flushes it.
    fn write_chunk(
        &self,
        step_execution: &mut StepExecution,
        items: &[O],
    ) -> Result<(), BatchError> {
        debug!("Writing chunk of {} items", items.len());

        self.notify_before_write(step_execution, items)?;

        match self.writer.write(items).and_then(|()| self.writer.flush()) {
            Ok(()) => {
                step_execution.write_count += items.len();
                self.notify_after_write(step_execution, items)?;
                debug!("End writing chunk");
                Ok(())
            }
            Err(error) => {
                warn!("Error writing items: {}", error);
                for listener in &self.write_listeners {
                    listener.on_write_error(&error, items);
                }
                step_execution.status = StepStatus::WriteError;
                Err(error)
            }
        }
    }

    fn notify_before_read(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        for listener in &self.read_listeners {
            if let Err(error) = listener.before_read() {
                step_execution.status = StepStatus::ListenerError;
                return Err(BatchError::ItemListener(error.to_string()));
            }
        }
        Ok(())
    }

    fn notify_after_read(
        &self,
        step_execution: &mut StepExecution,
        item: &I,
    ) -> Result<(), BatchError> {
        for listener in &self.read_listeners {
            if let Err(error) = listener.after_read(item) {
                step_execution.status = StepStatus::ListenerError;
                return Err(BatchError::ItemListener(error.to_string()));
            }
        }
        Ok(())
    }

    fn notify_before_write(
        &self,
        step_execution: &mut StepExecution,
        items: &[O],
    ) -> Result<(), BatchError> {
        for listener in &self.write_listeners {
            if let Err(error) = listener.before_write(items) {
                step_execution.status = StepStatus::ListenerError;
                return Err(BatchError::ItemListener(error.to_string()));
            }
        }
        Ok(())
    }

    fn notify_after_write(
        &self,
        step_execution: &mut StepExecution,
        items: &[O],
    ) -> Result<(), BatchError> {
        for listener in &self.write_listeners {
            if let Err(error) = listener.after_write(items) {
                step_execution.status = StepStatus::ListenerError;
                return Err(BatchError::ItemListener(error.to_string()));
            }
        }
        Ok(())
    }
}

pub struct ChunkOrientedStepBuilder<'a, I, O> {
    name: String,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    read_listeners: Vec<&'a dyn ItemReadListener<I>>,
    write_listeners: Vec<&'a dyn ItemWriteListener<O>>,
    chunk_size: usize,
}

impl<'a, I, O> ChunkOrientedStepBuilder<'a, I, O> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reader: None,
            processor: None,
            writer: None,
            read_listeners: Vec::new(),
            write_listeners: Vec::new(),
            chunk_size: 10,
        }
    }

    pub fn reader(mut self, reader: &'a dyn ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a dyn ItemProcessor<I, O>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a dyn ItemWriter<O>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn read_listener(mut self, listener: &'a dyn ItemReadListener<I>) -> Self {
        self.read_listeners.push(listener);
        self
    }

    pub fn write_listener(mut self, listener: &'a dyn ItemWriteListener<O>) -> Self {
        self.write_listeners.push(listener);
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn build(self) -> ChunkOrientedStep<'a, I, O>
    where
        PassThroughProcessor: ItemProcessor<I, O>,
    {
        let default_processor = &PassThroughProcessor;
        ChunkOrientedStep {
            name: self.name,
            reader: self.reader.expect("Reader is required for building a step"),
            processor: self.processor.unwrap_or(default_processor),
            writer: self.writer.expect("Writer is required for building a step"),
            read_listeners: self.read_listeners,
            write_listeners: self.write_listeners,
            chunk_size: self.chunk_size,
        }
    }
}

pub struct StepBuilder {
    name: String,
}

impl StepBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Turns the builder into a chunk-oriented one with the given commit
    /// interval.
    pub fn chunk<'a, I, O>(self, chunk_size: usize) -> ChunkOrientedStepBuilder<'a, I, O> {
        ChunkOrientedStepBuilder::new(&self.name).chunk_size(chunk_size)
    }
}
