use chunk_batch_rs::{
    core::{
        item::{
            ItemProcessor, ItemProcessorResult, ItemReadListener, ItemWriteListener,
        },
        job::{Job, JobBuilder, JobExecution},
        step::{ChunkOrientedStep, StepBuilder},
    },
    error::BatchError,
    item::flat_file::flat_file_writer::FlatFileItemWriterBuilder,
    item::vec::vec_reader::VecItemReader,
};
use std::{cell::Cell, env::temp_dir, rc::Rc};

#[derive(Default)]
struct EvenOnlyProcessor {}

/// Keeps even numbers, filters the rest out of the chunk.
impl ItemProcessor<i32, String> for EvenOnlyProcessor {
    fn process(&self, item: &i32) -> ItemProcessorResult<String> {
        if item % 2 == 0 {
            Ok(Some(item.to_string()))
        } else {
            Ok(None)
        }
    }
}

/// Listener feeding the step's own counts to the footer callback: by the time
/// the footer is written, reading has completed and the counts are final.
#[derive(Default)]
struct CountingListener {
    reads: Rc<Cell<usize>>,
    writes: Rc<Cell<usize>>,
}

impl ItemReadListener<i32> for CountingListener {
    fn after_read(&self, _item: &i32) -> Result<(), BatchError> {
        self.reads.set(self.reads.get() + 1);
        Ok(())
    }
}

impl ItemWriteListener<String> for CountingListener {
    fn after_write(&self, items: &[String]) -> Result<(), BatchError> {
        self.writes.set(self.writes.get() + items.len());
        Ok(())
    }
}

fn main() -> Result<(), BatchError> {
    env_logger::init();

    let reader = VecItemReader::new((1..=10).collect());

    let processor = EvenOnlyProcessor::default();

    let listener = CountingListener::default();
    let reads = listener.reads.clone();
    let writes = listener.writes.clone();
    let writer = FlatFileItemWriterBuilder::new()
        .footer_callback(move || Ok(format!("kept {} of {} records", writes.get(), reads.get())))
        .from_path(temp_dir().join("evens.txt"))?;

    let step: ChunkOrientedStep<i32, String> = StepBuilder::new("keep-evens")
        .chunk(3)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .read_listener(&listener)
        .write_listener(&listener)
        .build();

    let execution = JobExecution::new();
    let job = JobBuilder::new().execution(&execution).start(&step).build();
    job.run()?;

    let step_execution = execution.step_execution("keep-evens").unwrap();
    assert_eq!(step_execution.read_count, 10);
    assert_eq!(step_execution.write_count, 5);
    assert_eq!(step_execution.filter_count, 5);

    Ok(())
}
