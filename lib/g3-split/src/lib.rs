/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Split an asynchronous stream of byte chunks into lines, fixed size
//! blocks, delimited segments, or decoded chunked payloads.

mod config;
pub use config::{ByteOrder, SplitConfig};

mod error;
pub use error::{ProtocolError, SplitError};

mod debug;
pub use debug::{SPLIT_DEBUG_LOG_LEVEL, SPLIT_DEBUG_LOG_TARGET};

mod source;
pub use source::{ChunkSource, ReaderSource, StreamSource};

mod splitter;
pub use splitter::Splitter;

mod cursor;
pub use cursor::{
    ChunkedHttpBodyCursor, ChunkedHttpBodyState, ChunkedStreamCursor, ChunkedStreamState, Cursor,
    CursorState, LineCursor, LineState, NeedleCursor, NeedleState, SizeCursor, SizeState,
    SplitCursor, into_stream,
};
