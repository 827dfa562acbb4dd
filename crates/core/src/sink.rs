//! Destinations for streamed downloads
//!
//! A sink receives an object body chunk by chunk. Any write failure aborts
//! the transfer that feeds it.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// Accepts a chunk of bytes at a time, and may fail
#[async_trait]
pub trait ByteSink: Send {
    /// Validity probe, called before any request is issued
    fn check(&self) -> Result<()> {
        Ok(())
    }

    /// Write one chunk
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()>;

    /// Called once after the last chunk
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl ByteSink for Vec<u8> {
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.extend_from_slice(chunk);
        Ok(())
    }
}

/// Adapts any tokio writer (file, socket, stdout) into a sink
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> ByteSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.writer.write_all(chunk).await?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }
}
