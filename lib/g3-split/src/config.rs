/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

const DEFAULT_CHUNK_LINE_MAX_SIZE: usize = 16 * 1024; // 16KB
const MINIMAL_CHUNK_LINE_MAX_SIZE: usize = 64;
const DEFAULT_READ_BUFFER_SIZE: usize = 16 * 1024; // 16KB
const MINIMAL_READ_BUFFER_SIZE: usize = 256; // 256B

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    pub fn decode_u32(self, buf: [u8; 4]) -> u32 {
        match self {
            ByteOrder::BigEndian => u32::from_be_bytes(buf),
            ByteOrder::LittleEndian => u32::from_le_bytes(buf),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SplitConfig {
    chunk_line_max_size: usize,
    stream_prefix_order: ByteOrder,
    read_buffer_size: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            chunk_line_max_size: DEFAULT_CHUNK_LINE_MAX_SIZE,
            stream_prefix_order: ByteOrder::BigEndian,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl SplitConfig {
    pub fn set_chunk_line_max_size(&mut self, size: usize) {
        self.chunk_line_max_size = size.max(MINIMAL_CHUNK_LINE_MAX_SIZE);
    }

    /// Max size of a http chunk size line, line break excluded.
    #[inline]
    pub fn chunk_line_max_size(&self) -> usize {
        self.chunk_line_max_size
    }

    pub fn set_stream_prefix_order(&mut self, order: ByteOrder) {
        self.stream_prefix_order = order;
    }

    #[inline]
    pub fn stream_prefix_order(&self) -> ByteOrder {
        self.stream_prefix_order
    }

    pub fn set_read_buffer_size(&mut self, size: usize) {
        self.read_buffer_size = size.max(MINIMAL_READ_BUFFER_SIZE);
    }

    #[inline]
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp() {
        let mut config = SplitConfig::default();
        assert_eq!(config.chunk_line_max_size(), 16384);

        config.set_chunk_line_max_size(1);
        assert_eq!(config.chunk_line_max_size(), MINIMAL_CHUNK_LINE_MAX_SIZE);

        config.set_read_buffer_size(0);
        assert_eq!(config.read_buffer_size(), MINIMAL_READ_BUFFER_SIZE);
    }

    #[test]
    fn prefix_order() {
        let buf = [0x00, 0x00, 0x01, 0x02];
        assert_eq!(ByteOrder::BigEndian.decode_u32(buf), 0x0102);
        assert_eq!(ByteOrder::LittleEndian.decode_u32(buf), 0x0201_0000);
    }
}
