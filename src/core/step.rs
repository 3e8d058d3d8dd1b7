use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, info};
use uuid::Uuid;

use crate::BatchError;

use super::item::{ItemProcessor, ItemReader, ItemWriter};

#[derive(Debug, PartialEq)]
pub enum ChunkStatus {
    Finished,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Starting,
    Success,
    ReadError,
    ProcessorError,
    WriteError,
}

/// Execution details of one step run.
#[derive(Debug)]
pub struct StepExecution {
    /// Unique identifier for this step instance
    pub id: Uuid,
    /// Human-readable name for the step
    pub name: String,
    /// Final status of the step execution
    pub status: StepStatus,
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Number of items successfully read
    pub read_count: usize,
    /// Number of items successfully processed
    pub process_count: usize,
    /// Number of items successfully written
    pub write_count: usize,
}

/// A step that reads items one by one, processes them and hands them to the
/// writer in chunks.
///
/// There is no skip policy: the first reader, processor or writer error stops
/// the step and is returned to the caller, who owns the unit of work.
pub struct ChunkOrientedStep<'a, I, O> {
    id: Uuid,
    name: String,
    reader: &'a dyn ItemReader<I>,
    processor: &'a dyn ItemProcessor<I, O>,
    writer: &'a dyn ItemWriter<O>,
    /// Number of items handed to the writer at once
    chunk_size: usize,
    read_count: Cell<usize>,
    process_count: Cell<usize>,
    write_count: Cell<usize>,
}

impl<I, O> ChunkOrientedStep<'_, I, O> {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn execute(&self) -> Result<StepExecution, BatchError> {
        let start_time = Instant::now();

        info!("Start of step: {}, id: {}", self.name, self.id);

        self.writer.open()?;

        let status = self.run_chunks();

        // The writer is closed even when a chunk failed
        let close_result = self.writer.close();

        let status = match (status, close_result) {
            (Ok(()), Ok(())) => StepStatus::Success,
            (Ok(()), Err(err)) => {
                error!("Step {} could not close its writer: {}", self.name, err);
                return Err(err.in_step(&self.name));
            }
            (Err((status, err)), _) => {
                error!("Step {} stopped with {:?}: {}", self.name, status, err);
                return Err(err.in_step(&self.name));
            }
        };

        info!(
            "End of step: {}, id: {}, read: {}, written: {}",
            self.name,
            self.id,
            self.read_count.get(),
            self.write_count.get()
        );

        Ok(StepExecution {
            id: self.id,
            name: self.name.clone(),
            status,
            start_time,
            end_time: Instant::now(),
            duration: start_time.elapsed(),
            read_count: self.read_count.get(),
            process_count: self.process_count.get(),
            write_count: self.write_count.get(),
        })
    }

    fn run_chunks(&self) -> Result<(), (StepStatus, BatchError)> {
        let mut read_items: Vec<I> = Vec::with_capacity(self.chunk_size);

        loop {
            let chunk_status = self
                .read_chunk(&mut read_items)
                .map_err(|err| (StepStatus::ReadError, err))?;

            let processed_items = self
                .process_chunk(&read_items)
                .map_err(|err| (StepStatus::ProcessorError, err))?;

            self.write_chunk(&processed_items)
                .map_err(|err| (StepStatus::WriteError, err))?;

            if chunk_status == ChunkStatus::Finished {
                return Ok(());
            }
        }
    }

    fn read_chunk(&self, read_items: &mut Vec<I>) -> Result<ChunkStatus, BatchError> {
        debug!("Start reading chunk");
        read_items.clear();

        loop {
            match self.reader.read()? {
                Some(item) => {
                    read_items.push(item);
                    self.read_count.set(self.read_count.get() + 1);

                    if read_items.len() == self.chunk_size {
                        debug!("End reading chunk: FULL");
                        return Ok(ChunkStatus::Full);
                    }
                }
                None => {
                    debug!("End reading chunk: FINISHED");
                    return Ok(ChunkStatus::Finished);
                }
            }
        }
    }

    fn process_chunk(&self, read_items: &[I]) -> Result<Vec<O>, BatchError> {
        debug!("Start processing chunk");

        let mut processed_items = Vec::with_capacity(read_items.len());
        for item in read_items {
            processed_items.push(self.processor.process(item)?);
            self.process_count.set(self.process_count.get() + 1);
        }

        debug!("End processing chunk");
        Ok(processed_items)
    }

    fn write_chunk(&self, processed_items: &[O]) -> Result<(), BatchError> {
        if processed_items.is_empty() {
            return Ok(());
        }

        debug!("Start writing chunk");
        self.writer.write(processed_items)?;
        self.writer.flush()?;
        self.write_count
            .set(self.write_count.get() + processed_items.len());
        debug!("End writing chunk");

        Ok(())
    }
}

pub struct StepBuilder<'a, I, O> {
    name: String,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    chunk_size: usize,
}

impl<'a, I, O> StepBuilder<'a, I, O> {
    pub fn new(name: &str) -> StepBuilder<'a, I, O> {
        Self {
            name: name.to_string(),
            reader: None,
            processor: None,
            writer: None,
            chunk_size: 1,
        }
    }

    pub fn reader(mut self, reader: &'a dyn ItemReader<I>) -> StepBuilder<'a, I, O> {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a dyn ItemProcessor<I, O>) -> StepBuilder<'a, I, O> {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a dyn ItemWriter<O>) -> StepBuilder<'a, I, O> {
        self.writer = Some(writer);
        self
    }

    /// Sets the commit interval. A size of zero is treated as one.
    pub fn chunk(mut self, chunk_size: usize) -> StepBuilder<'a, I, O> {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn build(self) -> Result<ChunkOrientedStep<'a, I, O>, BatchError> {
        let missing = |part: &str| {
            BatchError::Configuration(format!("step {} has no {}", self.name, part))
        };

        Ok(ChunkOrientedStep {
            id: Uuid::new_v4(),
            reader: self.reader.ok_or_else(|| missing("reader"))?,
            processor: self.processor.ok_or_else(|| missing("processor"))?,
            writer: self.writer.ok_or_else(|| missing("writer"))?,
            name: self.name,
            chunk_size: self.chunk_size,
            read_count: Cell::new(0),
            process_count: Cell::new(0),
            write_count: Cell::new(0),
        })
    }
}
