use std::{cell::RefCell, fs};

use anyhow::Result;

use chunk_batch_rs::{
    core::{
        item::{ItemProcessor, ItemProcessorResult, ItemWriteListener},
        job::{BatchStatus, Job, JobBuilder, JobExecution},
        step::{ChunkOrientedStep, StepBuilder, StepStatus},
    },
    error::BatchError,
    item::flat_file::flat_file_reader::FlatFileItemReaderBuilder,
    item::flat_file::flat_file_writer::FlatFileItemWriterBuilder,
    item::vec::vec_reader::VecItemReader,
};

#[derive(Default)]
struct ToStringProcessor {}

impl ItemProcessor<i32, String> for ToStringProcessor {
    fn process(&self, item: &i32) -> ItemProcessorResult<String> {
        Ok(Some(item.to_string()))
    }
}

/// Write listener recording the size of every chunk handed to the writer.
#[derive(Default)]
struct ChunkSizeListener {
    sizes: RefCell<Vec<usize>>,
}

impl ItemWriteListener<String> for ChunkSizeListener {
    fn before_write(&self, items: &[String]) -> Result<(), BatchError> {
        self.sizes.borrow_mut().push(items.len());
        Ok(())
    }
}

#[test]
fn three_items_below_commit_interval_make_one_chunk() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let temp_dir = tempfile::tempdir()?;
    let output = temp_dir.path().join("numbers.txt");

    let reader = VecItemReader::new(vec![1, 2, 3]);
    let processor = ToStringProcessor::default();
    let writer = FlatFileItemWriterBuilder::new().from_path(&output)?;
    let listener = ChunkSizeListener::default();

    let step: ChunkOrientedStep<i32, String> = StepBuilder::new("to-string")
        .chunk(1000)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .write_listener(&listener)
        .build();

    let execution = JobExecution::new();
    let job = JobBuilder::new().execution(&execution).start(&step).build();
    job.run()?;

    let step_execution = execution.step_execution("to-string").unwrap();
    assert_eq!(step_execution.status, StepStatus::Success);
    assert_eq!(step_execution.read_count, 3);
    assert_eq!(step_execution.write_count, 3);
    assert_eq!(*listener.sizes.borrow(), vec![3]);

    let file_content = fs::read_to_string(&output)?;
    assert_eq!(file_content, "1\n2\n3\n");

    Ok(())
}

#[test]
fn five_items_at_interval_two_make_three_chunks() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let output = temp_dir.path().join("numbers.txt");

    let reader = VecItemReader::new(vec![1, 2, 3, 4, 5]);
    let processor = ToStringProcessor::default();
    let writer = FlatFileItemWriterBuilder::new().from_path(&output)?;
    let listener = ChunkSizeListener::default();

    let step: ChunkOrientedStep<i32, String> = StepBuilder::new("to-string")
        .chunk(2)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .write_listener(&listener)
        .build();

    let execution = JobExecution::new();
    let job = JobBuilder::new().execution(&execution).start(&step).build();
    job.run()?;

    assert_eq!(*listener.sizes.borrow(), vec![2, 2, 1]);

    let step_execution = execution.step_execution("to-string").unwrap();
    assert_eq!(step_execution.read_count, 5);
    assert_eq!(step_execution.write_count, 5);

    let file_content = fs::read_to_string(&output)?;
    assert_eq!(file_content, "1\n2\n3\n4\n5\n");

    Ok(())
}

#[test]
fn empty_source_still_emits_header_and_footer() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let output = temp_dir.path().join("empty.txt");

    let reader = VecItemReader::new(Vec::<i32>::new());
    let processor = ToStringProcessor::default();
    let writer = FlatFileItemWriterBuilder::new()
        .header_callback(|| Ok("this is a header.".to_string()))
        .footer_callback(|| Ok("this is a footer.".to_string()))
        .from_path(&output)?;
    let listener = ChunkSizeListener::default();

    let step: ChunkOrientedStep<i32, String> = StepBuilder::new("nothing-to-do")
        .chunk(10)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .write_listener(&listener)
        .build();

    let execution = JobExecution::new();
    let job = JobBuilder::new().execution(&execution).start(&step).build();
    job.run()?;

    assert_eq!(execution.status(), BatchStatus::Completed);
    assert!(listener.sizes.borrow().is_empty());

    let step_execution = execution.step_execution("nothing-to-do").unwrap();
    assert_eq!(step_execution.read_count, 0);
    assert_eq!(step_execution.write_count, 0);

    let file_content = fs::read_to_string(&output)?;
    assert_eq!(file_content, "this is a header.\nthis is a footer.\n");

    Ok(())
}

#[test]
fn flat_file_round_trip_preserves_records() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("input.txt");
    let output = temp_dir.path().join("output.txt");

    fs::write(&input, "un\ndeux\ntrois\nquatre\n")?;

    let reader = FlatFileItemReaderBuilder::new().from_path(&input)?;
    let writer = FlatFileItemWriterBuilder::new().from_path(&output)?;

    let step: ChunkOrientedStep<String, String> = StepBuilder::new("copy")
        .chunk(3)
        .reader(&reader)
        .writer(&writer)
        .build();

    let execution = JobExecution::new();
    let job = JobBuilder::new().execution(&execution).start(&step).build();
    job.run()?;

    let step_execution = execution.step_execution("copy").unwrap();
    assert_eq!(step_execution.read_count, 4);
    assert_eq!(step_execution.write_count, 4);

    assert_eq!(fs::read_to_string(&output)?, fs::read_to_string(&input)?);

    Ok(())
}
