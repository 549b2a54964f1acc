#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 <div align="center">
   <h1>Chunk-Batch for Rust</h1>
   <h3>A lightweight chunk-oriented batch processing engine</h3>
 </div>

 # Chunk-Batch for Rust

 **Chunk-Batch for Rust** is a small engine for chunk-oriented batch jobs: it
 reads a sequence of records, transforms each one, buffers the results into
 fixed-size chunks and flushes every chunk atomically to a sink, keeping
 per-step statistics along the way. Steps are chained into jobs, and a later
 step's output can report on an earlier step's results (for instance a footer
 carrying the previous step's read count).

 ## Core Concepts

 Understanding these core components will help you get started:

 - **Job:** Represents the entire batch process. A `Job` is composed of one or more `Step`s.
 - **Step:** An independent, sequential phase of a batch job. A chunk-oriented
   `Step` reads data one item at a time, processes it, and writes it out in chunks.
 - **ItemReader:** An abstraction that represents the retrieval of input for a `Step`, one item at a time.
 - **ItemProcessor:** An abstraction that represents the business logic of processing an item.
   A processor may also *filter* an item, dropping it from the output.
 - **ItemWriter:** An abstraction that represents the output of a `Step`, one chunk of items
   at a time, with optional header and footer hooks framing the whole step.
 - **Listeners:** Observers notified around every read and write, for pluggable
   instrumentation.
 - **JobExecution:** The accumulated results of a run — one `StepExecution`
   (status and counts) per step, readable by later steps' configuration.

 ## Features

The crate is modular, allowing you to enable only the features you need:

| **Feature**   | **Description**                                                  |
|---------------|------------------------------------------------------------------|
| flat-file     | Enables the line-oriented flat-file `ItemReader` and `ItemWriter` |
| logger        | Enables a logger `ItemWriter` and logging listeners, useful for debugging |
| full          | Enables all available features                                   |

 ## Getting Started
 Make sure you activated the suitable features crate on Cargo.toml:

```toml
[dependencies]
chunk-batch-rs = { version = "<version>", features = ["<full|flat-file|logger>"] }
```

Then, on your main.rs:

```rust
# use chunk_batch_rs::{
#     core::{
#         item::{ItemProcessor, ItemProcessorResult},
#         job::{BatchStatus, Job, JobBuilder, JobExecution},
#         step::{ChunkOrientedStep, StepBuilder},
#     },
#     error::BatchError,
#     item::flat_file::flat_file_writer::FlatFileItemWriterBuilder,
#     item::vec::vec_reader::VecItemReader,
# };
# use std::env::temp_dir;
# #[derive(Default)]
# struct ToStringProcessor {}
# impl ItemProcessor<i32, String> for ToStringProcessor {
#     fn process(&self, item: &i32) -> ItemProcessorResult<String> {
#         Ok(Some(item.to_string()))
#     }
# }

fn main() -> Result<(), BatchError> {
    let reader = VecItemReader::new(vec![1, 2, 3]);

    let processor = ToStringProcessor::default();

    let writer = FlatFileItemWriterBuilder::new()
        .footer_callback(|| Ok("this is a footer.".to_string()))
        .from_path(temp_dir().join("numbers.txt"))?;

    let step: ChunkOrientedStep<i32, String> = StepBuilder::new("to-string")
        .chunk(2) // set commit interval
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build();

    let execution = JobExecution::new();
    let job = JobBuilder::new().execution(&execution).start(&step).build();
    let result = job.run();

    assert!(result.is_ok());
    assert_eq!(execution.status(), BatchStatus::Completed);
    assert_eq!(execution.read_count("to-string")?, 3);

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of item readers / writers (for example: flat-file reader and writer)
pub mod item;
