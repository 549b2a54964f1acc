use chunk_batch_rs::{
    core::{
        item::{ItemProcessor, ItemProcessorResult},
        job::{Job, JobBuilder, JobExecution},
        step::{ChunkOrientedStep, StepBuilder},
    },
    error::BatchError,
    item::flat_file::flat_file_reader::FlatFileItemReaderBuilder,
    item::flat_file::flat_file_writer::FlatFileItemWriterBuilder,
    item::logger::{LoggerReadListener, LoggerWriteListener},
    item::vec::vec_reader::VecItemReader,
};
use log::info;
use std::env::temp_dir;

#[derive(Default)]
struct ToStringProcessor {}

impl ItemProcessor<i32, String> for ToStringProcessor {
    fn process(&self, item: &i32) -> ItemProcessorResult<String> {
        info!("process {}", item);
        Ok(Some(item.to_string()))
    }
}

/// Two-step job: step1 reads an in-memory list and writes a data-only file;
/// step2 reads that file back and writes the final file, framed by a header
/// reporting step1's read count and a fixed footer.
fn main() -> Result<(), BatchError> {
    env_logger::init();

    let data_only = temp_dir().join("sample.txt.data-only");
    let final_output = temp_dir().join("sample.txt");

    let execution = JobExecution::new();

    let reader1 = VecItemReader::new(vec![1, 2, 3]);
    let processor1 = ToStringProcessor::default();
    let writer1 = FlatFileItemWriterBuilder::new().from_path(&data_only)?;
    let read_listener1 = LoggerReadListener::default();
    let write_listener1 = LoggerWriteListener::default();

    let step1: ChunkOrientedStep<i32, String> = StepBuilder::new("sampleStep1")
        .chunk(1000) // set commit interval
        .reader(&reader1)
        .processor(&processor1)
        .writer(&writer1)
        .read_listener(&read_listener1)
        .write_listener(&write_listener1)
        .build();

    let reader2 = FlatFileItemReaderBuilder::new().from_path(&data_only)?;
    let handle = execution.clone();
    let writer2 = FlatFileItemWriterBuilder::new()
        .header_callback(move || {
            let count = handle.read_count("sampleStep1")?;
            Ok(format!("this is a header. count:{}", count))
        })
        .footer_callback(|| Ok("this is a footer.".to_string()))
        .from_path(&final_output)?;

    let step2: ChunkOrientedStep<String, String> = StepBuilder::new("sampleStep2")
        .chunk(1000)
        .reader(&reader2)
        .writer(&writer2) // pass-through: no explicit processor
        .build();

    let job = JobBuilder::new()
        .name("sampleJob".to_string())
        .execution(&execution)
        .start(&step1)
        .next(&step2)
        .build();

    job.run()?;

    info!("final file written to {}", final_output.display());

    Ok(())
}
