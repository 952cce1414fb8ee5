/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("missing chunk size")]
    MissingChunkSize,
    #[error("chunk size exceeds 0x1fffffffffffff")]
    ChunkSizeTooLarge,
    #[error("chunk size line too long (> {0})")]
    ChunkLineTooLong(usize),
    #[error("invalid chunk end line")]
    InvalidChunkEnd,
    #[error("insufficient data: expected {expected} bytes, received {received}")]
    InsufficientData { expected: u64, received: u64 },
}

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("size exceeded {0} bytes")]
    LimitExceeded(usize),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("previous pull was abandoned before completion")]
    Interrupted,
    #[error(transparent)]
    Upstream(#[from] io::Error),
}

impl SplitError {
    /// Whether the splitter has been terminated because of this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SplitError::LimitExceeded(_) | SplitError::InvalidArgument(_)
        )
    }
}
