// Public entry points over the normalized input/output abstractions.

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use blockzip_core::prelude::*;
    use blockzip_core::stream::io::{open_input, open_output};
    use blockzip_core::stream::SharedBufferWriter;
    use std::io::Read;

    fn config() -> PipelineConfig {
        PipelineConfig::new()
            .with_block_size(256)
            .with_parallelism(ParallelismProfile::fixed(2).unwrap())
            .with_memory_gate(MemoryGateConfig::unbounded())
    }

    #[test]
    fn memory_input_and_writer_sink() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 13) as u8).collect();
        let packed = SharedBufferWriter::new();
        let stats = compress_stream(
            InputSource::Memory(data.clone()),
            OutputSink::Writer(Box::new(packed.clone())),
            &config(),
        )
        .unwrap();
        assert_eq!(stats.blocks_read, 20);

        let restored = SharedBufferWriter::new();
        decompress_stream(
            InputSource::Reader(Box::new(Cursor::new(packed.contents()))),
            OutputSink::Writer(Box::new(restored.clone())),
            &config(),
        )
        .unwrap();
        assert_eq!(restored.contents(), data);
    }

    #[test]
    fn memory_sink_captures_frames() {
        let packed = SharedBufferWriter::new();
        let cfg = config().with_block_size(4);
        let stats = compress_stream(
            InputSource::Memory(b"abcdefgh".to_vec()),
            OutputSink::Memory(packed.clone()),
            &cfg,
        )
        .unwrap();
        assert_eq!(stats.blocks_written, 2);
        assert_eq!(packed.contents().len() as u64, stats.bytes_out);

        let restored = SharedBufferWriter::new();
        decompress_stream(
            InputSource::Memory(packed.contents()),
            OutputSink::Memory(restored.clone()),
            &cfg,
        )
        .unwrap();
        assert_eq!(restored.contents(), b"abcdefgh");
    }

    #[test]
    fn open_output_memory_writes_into_buffer() {
        let buf = SharedBufferWriter::new();
        let mut w = open_output(OutputSink::Memory(buf.clone())).unwrap();
        w.write_all(b"xyz").unwrap();
        assert_eq!(buf.contents(), b"xyz");
    }

    #[test]
    fn open_input_reads_memory() {
        let mut r = open_input(InputSource::Memory(vec![1, 2, 3])).unwrap();
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("blockzip-core-does-not-exist.bin");
        let sink = OutputSink::Memory(SharedBufferWriter::new());
        let err = compress_stream(InputSource::File(path), sink, &config()).unwrap_err();
        assert!(matches!(err, StreamError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn zero_block_size_rejected_before_io() {
        let cfg = config().with_block_size(0);
        let sink = OutputSink::Memory(SharedBufferWriter::new());
        let err = compress_stream(InputSource::Memory(vec![1]), sink, &cfg).unwrap_err();
        assert!(matches!(err, StreamError::InvalidArgument(_)));
    }
}
