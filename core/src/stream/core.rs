//! Stable public entry points.

use std::io::Cursor;

use crate::stream::io::{open_input, open_output, validate_block_size, InputSource, OutputSink, SharedBufferWriter};
use crate::stream::pipeline::{run_pipeline, PipelineConfig, StageConfig};
use crate::telemetry::TelemetrySnapshot;
use crate::types::StreamError;

/// Slice `input` into blocks, compress them in parallel and write one frame per block.
pub fn compress_stream(
    input: InputSource,
    output: OutputSink,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    validate_block_size(config.block_size)?;
    let reader = open_input(input)?;
    let writer = open_output(output)?;
    run_pipeline(reader, writer, &StageConfig::compress(config.block_size), config)
}

/// Parse frames from `input`, decompress them in parallel and write the
/// payloads back in position order.
pub fn decompress_stream(
    input: InputSource,
    output: OutputSink,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    let reader = open_input(input)?;
    let writer = open_output(output)?;
    run_pipeline(reader, writer, &StageConfig::decompress(), config)
}

pub fn compress_bytes(data: &[u8], config: &PipelineConfig) -> Result<Vec<u8>, StreamError> {
    let writer = SharedBufferWriter::new();
    let captured = writer.clone();
    run_pipeline(Cursor::new(data), writer, &StageConfig::compress(config.block_size), config)?;
    Ok(captured.contents())
}

pub fn decompress_bytes(data: &[u8], config: &PipelineConfig) -> Result<Vec<u8>, StreamError> {
    let writer = SharedBufferWriter::new();
    let captured = writer.clone();
    run_pipeline(Cursor::new(data), writer, &StageConfig::decompress(), config)?;
    Ok(captured.contents())
}
