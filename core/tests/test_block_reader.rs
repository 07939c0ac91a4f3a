// Block readers: fixed-size slicing and frame parsing.

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use blockzip_core::stream::framing::{encode_frame, encode_i32_be, FrameError};
    use blockzip_core::stream::io::{read_exact_or_eof, FrameReader, SlicingReader};
    use blockzip_core::stream::Block;
    use blockzip_core::types::StreamError;
    use proptest::prelude::*;

    /// Hands out at most one byte per `read` call.
    struct Trickle<R>(R);

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(1);
            self.0.read(&mut buf[..n])
        }
    }

    fn slice(data: &[u8], block_size: usize) -> Vec<Block> {
        SlicingReader::new(Cursor::new(data.to_vec()), block_size)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

// # 1. Slicing reader

    #[test]
    fn slices_example_into_pairs() {
        let blocks = slice(&[56, 34, 90, 1, 34, 253, 98], 2);

        let payloads: Vec<&[u8]> = blocks.iter().map(|b| b.payload().as_ref()).collect();
        assert_eq!(payloads, vec![&[56u8, 34][..], &[90u8, 1][..], &[34u8, 253][..], &[98u8][..]]);
        let positions: Vec<u32> = blocks.iter().map(Block::position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_source_yields_no_blocks() {
        assert!(slice(&[], 4).is_empty());
    }

    #[test]
    fn zero_block_size_is_invalid() {
        let res = SlicingReader::new(Cursor::new(Vec::new()), 0);
        assert!(matches!(res, Err(StreamError::InvalidArgument(_))));
    }

    #[test]
    fn short_reads_still_fill_blocks() {
        let data: Vec<u8> = (0..10).collect();
        let blocks: Vec<Block> = SlicingReader::new(Trickle(Cursor::new(data)), 4)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let lens: Vec<usize> = blocks.iter().map(Block::len).collect();
        assert_eq!(lens, vec![4, 4, 2]);
    }

    #[test]
    fn read_exact_or_eof_truncates_at_end() {
        let mut r = Cursor::new(vec![1, 2, 3]);
        assert_eq!(read_exact_or_eof(&mut r, 2).unwrap().as_ref(), &[1, 2]);
        assert_eq!(read_exact_or_eof(&mut r, 2).unwrap().as_ref(), &[3]);
        assert!(read_exact_or_eof(&mut r, 2).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn slicing_covers_input_exactly(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            block_size in 1usize..300,
        ) {
            let blocks = slice(&data, block_size);

            prop_assert_eq!(blocks.len(), data.len().div_ceil(block_size));
            for (i, b) in blocks.iter().enumerate() {
                prop_assert_eq!(b.position() as usize, i);
            }
            if let Some(last) = blocks.last() {
                let expected = match data.len() % block_size {
                    0 => block_size,
                    rem => rem,
                };
                prop_assert_eq!(last.len(), expected);
            }
            let joined: Vec<u8> = blocks.iter().flat_map(|b| b.payload().iter().copied()).collect();
            prop_assert_eq!(joined, data);
        }
    }

// # 2. Frame reader

    fn frames(blocks: &[Block]) -> Vec<u8> {
        blocks.iter().flat_map(|b| encode_frame(b).unwrap()).collect()
    }

    #[test]
    fn frames_come_back_in_physical_order() {
        let wire = frames(&[Block::new(1, b"bb".to_vec()), Block::new(0, b"a".to_vec())]);
        let blocks: Vec<Block> = FrameReader::new(Cursor::new(wire))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].position(), 1);
        assert_eq!(blocks[0].payload().as_ref(), b"bb");
        assert_eq!(blocks[1].position(), 0);
        assert_eq!(blocks[1].payload().as_ref(), b"a");
    }

    #[test]
    fn zero_length_header_ends_the_stream() {
        let mut wire = frames(&[Block::new(0, b"a".to_vec())]);
        wire.extend_from_slice(&encode_i32_be(1));
        wire.extend_from_slice(&encode_i32_be(0));
        wire.extend_from_slice(&frames(&[Block::new(2, b"ignored".to_vec())]));

        let mut reader = FrameReader::new(Cursor::new(wire));
        assert_eq!(reader.next().unwrap().unwrap().position(), 0);
        assert!(reader.next().is_none());
        assert_eq!(reader.frames_read(), 1);
    }

    #[test]
    fn partial_header_is_end_of_stream() {
        let mut wire = frames(&[Block::new(0, b"a".to_vec())]);
        wire.extend_from_slice(&[0, 0, 0]);

        let blocks: Vec<Block> = FrameReader::new(Cursor::new(wire))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn negative_position_is_rejected() {
        let mut wire = Vec::new();
        wire.extend_from_slice(&encode_i32_be(-3));
        wire.extend_from_slice(&encode_i32_be(1));
        wire.push(0);

        let mut reader = FrameReader::new(Cursor::new(wire));
        assert!(matches!(
            reader.next(),
            Some(Err(StreamError::Frame(FrameError::NegativePosition(-3))))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut wire = Vec::new();
        wire.extend_from_slice(&encode_i32_be(0));
        wire.extend_from_slice(&encode_i32_be(10));
        wire.extend_from_slice(b"short");

        let mut reader = FrameReader::new(Cursor::new(wire));
        assert!(matches!(
            reader.next(),
            Some(Err(StreamError::Frame(FrameError::Truncated { position: 0, expected: 10, actual: 5 })))
        ));
    }
}
