//! Pipeline driver: reader -> transform pool -> single writer pool.
//!
//! The two directions differ only in the [`StageConfig`] they run with:
//!
//! | | compress | decompress |
//! | --- | --- | --- |
//! | reader | fixed-size slices | frame headers |
//! | transform | `ByteCodec::compress` | `ByteCodec::decompress` |
//! | writer queue | FIFO | priority by position |
//! | write gate | always | `position == write cursor` |
//! | serializer | frame | raw payload |

use std::fmt;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use log::{debug, info, trace};

use crate::compression::{ByteCodec, GzipCodec};
use crate::constants::DEFAULT_BLOCK_SIZE;
use crate::stream::block::Block;
use crate::stream::framing::{write_frame, FrameHeader};
use crate::stream::io::{FrameReader, SlicingReader};
use crate::stream::memory_gate::{MemoryGate, MemoryGateConfig};
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::queue::QueueDiscipline;
use crate::stream::worker_pool::{ActionError, FailurePolicy, PoolOptions, WorkerPool, WorkerPoolError};
use crate::telemetry::{PipelineCounters, Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Compress => f.write_str("compress"),
            Direction::Decompress => f.write_str("decompress"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderKind {
    Slicing { block_size: usize },
    Frames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Encode,
    Decode,
}

/// Eligibility rule for the writer's head item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteGate {
    /// Any head may be written; frames carry their own position.
    Always,
    /// Only the block whose position equals the write cursor.
    InOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSerializer {
    /// `position ‖ length ‖ payload`
    Frame,
    /// Payload bytes only.
    Raw,
}

/// Everything that distinguishes one pipeline direction from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    pub direction: Direction,
    pub reader: ReaderKind,
    pub transform: TransformKind,
    pub writer_queue: QueueDiscipline,
    pub write_gate: WriteGate,
    pub serializer: BlockSerializer,
}

impl StageConfig {
    /// Frames may land out of order: each one carries its position.
    pub fn compress(block_size: usize) -> Self {
        Self {
            direction: Direction::Compress,
            reader: ReaderKind::Slicing { block_size },
            transform: TransformKind::Encode,
            writer_queue: QueueDiscipline::Fifo,
            write_gate: WriteGate::Always,
            serializer: BlockSerializer::Frame,
        }
    }

    /// Out-of-order completions are parked in the priority queue until the
    /// write cursor reaches them.
    pub fn decompress() -> Self {
        Self {
            direction: Direction::Decompress,
            reader: ReaderKind::Frames,
            transform: TransformKind::Decode,
            writer_queue: QueueDiscipline::Priority,
            write_gate: WriteGate::InOrder,
            serializer: BlockSerializer::Raw,
        }
    }
}

/// Run-wide knobs shared by both directions.
#[derive(Clone)]
pub struct PipelineConfig {
    pub block_size: usize,
    pub codec: Arc<dyn ByteCodec>,
    pub parallelism: ParallelismProfile,
    pub memory: MemoryGateConfig,
    pub failure_policy: FailurePolicy,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn ByteCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_parallelism(mut self, parallelism: ParallelismProfile) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_memory_gate(mut self, memory: MemoryGateConfig) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            codec: Arc::new(GzipCodec::default()),
            parallelism: ParallelismProfile::dynamic(),
            memory: MemoryGateConfig::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("block_size", &self.block_size)
            .field("codec", &self.codec.name())
            .field("parallelism", &self.parallelism)
            .field("memory", &self.memory)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

/// Single-threaded writer stage.
///
/// `sink` stays shared so the caller can flush or inspect it once the pool
/// has been shut down.
pub fn build_writer_pool<W>(
    stage: &StageConfig,
    sink: Arc<Mutex<W>>,
    counters: Arc<PipelineCounters>,
    failure_policy: FailurePolicy,
) -> Result<WorkerPool<Block>, WorkerPoolError>
where
    W: Write + Send + 'static,
{
    let cursor = Arc::new(AtomicU32::new(0));
    let gate = stage.write_gate;
    let serializer = stage.serializer;

    let predicate = {
        let cursor = Arc::clone(&cursor);
        move |head: &Block| match gate {
            WriteGate::Always => true,
            WriteGate::InOrder => head.position() == cursor.load(Ordering::Acquire),
        }
    };

    let action = move |block: Block| -> Result<(), ActionError> {
        let started = Instant::now();
        let written = {
            let mut out = sink.lock().unwrap_or_else(PoisonError::into_inner);
            match serializer {
                BlockSerializer::Frame => write_frame(&mut *out, &block)?,
                BlockSerializer::Raw => {
                    out.write_all(block.payload()).map_err(StreamError::from)?;
                    block.len()
                }
            }
        };
        if gate == WriteGate::InOrder {
            cursor.fetch_add(1, Ordering::AcqRel);
        }
        trace!("wrote block {} ({} bytes)", block.position(), written);
        counters.add_written(written);
        counters.add_stage_time(Stage::Write, started.elapsed());
        Ok(())
    };

    let options = PoolOptions::named("blockzip-writer").with_failure_policy(failure_policy);
    WorkerPool::spawn(options, 1, stage.writer_queue.build(), predicate, action)
}

fn build_transform_pool(
    stage: &StageConfig,
    config: &PipelineConfig,
    writer: &WorkerPool<Block>,
    gate: MemoryGate,
    counters: Arc<PipelineCounters>,
) -> Result<WorkerPool<Block>, WorkerPoolError> {
    let codec = Arc::clone(&config.codec);
    let transform = stage.transform;
    let next = writer.submitter();

    let action = move |mut block: Block| -> Result<(), ActionError> {
        let started = Instant::now();
        let out = match transform {
            TransformKind::Encode => codec.compress(block.payload()),
            TransformKind::Decode => codec.decompress(block.payload()),
        }
        .map_err(StreamError::from)?;
        trace!("block {}: {} -> {} bytes", block.position(), block.len(), out.len());
        block.replace_payload(out);
        counters.add_stage_time(Stage::Transform, started.elapsed());

        counters.add_memory_stalls(gate.admit()?);
        next.submit(block).map_err(StreamError::from)?;
        Ok(())
    };

    let options = PoolOptions::named("blockzip-transform").with_failure_policy(config.failure_policy);
    WorkerPool::spawn(
        options,
        config.parallelism.worker_count(),
        QueueDiscipline::Fifo.build(),
        |_: &Block| true,
        action,
    )
}

enum BlockSource<R> {
    Slicing(SlicingReader<R>),
    Frames(FrameReader<R>),
}

impl<R: Read> BlockSource<R> {
    fn open(reader: R, kind: ReaderKind) -> Result<Self, StreamError> {
        Ok(match kind {
            ReaderKind::Slicing { block_size } => Self::Slicing(SlicingReader::new(reader, block_size)?),
            ReaderKind::Frames => Self::Frames(FrameReader::new(reader)),
        })
    }

    /// Input bytes a block accounts for beyond its payload.
    fn overhead(&self) -> usize {
        match self {
            Self::Slicing(_) => 0,
            Self::Frames(_) => FrameHeader::LEN,
        }
    }
}

impl<R: Read> Iterator for BlockSource<R> {
    type Item = Result<Block, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Slicing(r) => r.next(),
            Self::Frames(r) => r.next(),
        }
    }
}

/// Producer loop on the calling thread. Stops early once a pool has failed.
fn feed<R: Read>(
    mut source: BlockSource<R>,
    transform: &WorkerPool<Block>,
    writer: &WorkerPool<Block>,
    gate: &MemoryGate,
    counters: &PipelineCounters,
) -> Result<(), StreamError> {
    let overhead = source.overhead();
    loop {
        if transform.has_failed() || writer.has_failed() {
            debug!("a stage failed, reader stops early");
            return Ok(());
        }

        let started = Instant::now();
        let Some(block) = source.next().transpose()? else {
            return Ok(());
        };
        counters.add_stage_time(Stage::Read, started.elapsed());
        counters.add_read(block.len() + overhead);

        counters.add_memory_stalls(gate.admit()?);
        transform.submit(block)?;
    }
}

/// Run one direction end to end.
///
/// Both pools are always shut down, whatever failed. When several stages
/// failed the reader's error wins, then the transform stage's, then the writer's.
pub fn run_pipeline<R, W>(
    reader: R,
    writer: W,
    stage: &StageConfig,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write + Send + 'static,
{
    let mut timer = TelemetryTimer::new();
    let counters = Arc::new(PipelineCounters::new());
    let sink = Arc::new(Mutex::new(writer));
    let gate = MemoryGate::new(config.memory.clone());

    let source = BlockSource::open(reader, stage.reader)?;
    info!(
        "{} started: {} transform workers, codec {}",
        stage.direction,
        config.parallelism.worker_count(),
        config.codec.name()
    );

    let writer_pool = build_writer_pool(stage, Arc::clone(&sink), Arc::clone(&counters), config.failure_policy)?;
    let transform_pool = build_transform_pool(stage, config, &writer_pool, gate.clone(), Arc::clone(&counters))?;

    let read_result = feed(source, &transform_pool, &writer_pool, &gate, &counters);
    let transform_result = transform_pool.shutdown();
    let writer_result = writer_pool.shutdown();

    read_result?;
    transform_result?;
    writer_result?;

    sink.lock().unwrap_or_else(PoisonError::into_inner).flush()?;
    timer.finish();

    let snapshot = TelemetrySnapshot::from(&counters, &timer);
    info!(
        "{} finished: {} blocks, {} -> {} bytes in {:?}",
        stage.direction, snapshot.blocks_written, snapshot.bytes_in, snapshot.bytes_out, snapshot.elapsed
    );
    Ok(snapshot)
}
