//! Chunked transfer helpers
//!
//! Uploads and downloads move object bodies in bounded chunks so memory use
//! does not depend on object size.

use bytes::Bytes;
use futures::Stream;
use swift_core::{ByteSink, Error, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Upload chunk size: 64 KiB
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Stream exactly `len` bytes from `reader` in `CHUNK_SIZE` pieces
///
/// Each chunk is read with a single `read_exact` of `min(remaining,
/// CHUNK_SIZE)` bytes, so no read is issued past the declared length.
pub fn chunk_stream<R>(reader: R, len: u64) -> impl Stream<Item = std::io::Result<Bytes>> + Send
where
    R: AsyncRead + Unpin + Send + 'static,
{
    futures::stream::try_unfold((reader, len), |(mut reader, remaining)| async move {
        if remaining == 0 {
            return Ok::<_, std::io::Error>(None);
        }

        let size = remaining.min(CHUNK_SIZE as u64) as usize;
        let mut buf = vec![0u8; size];
        reader.read_exact(&mut buf).await?;

        Ok(Some((Bytes::from(buf), (reader, remaining - size as u64))))
    })
}

/// Forward a response body to `sink` as it arrives, returning bytes written
///
/// The first failing write aborts the transfer.
pub(crate) async fn pump_response(
    mut response: reqwest::Response,
    sink: &mut dyn ByteSink,
) -> Result<u64> {
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read response: {e}")))?
    {
        sink.write_chunk(&chunk).await?;
        written += chunk.len() as u64;
    }

    sink.finish().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    struct CountingReader<R> {
        inner: R,
        reads: Arc<AtomicUsize>,
    }

    impl<R: AsyncRead + Unpin> AsyncRead for CountingReader<R> {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Pin::new(&mut self.inner).poll_read(cx, buf)
        }
    }

    fn counting(data: Vec<u8>) -> (CountingReader<std::io::Cursor<Vec<u8>>>, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let reader = CountingReader {
            inner: std::io::Cursor::new(data),
            reads: reads.clone(),
        };
        (reader, reads)
    }

    #[tokio::test]
    async fn test_chunk_stream_uses_64k_chunks() {
        let data: Vec<u8> = (0..150_000u32).map(|i| (i % 251) as u8).collect();
        let (reader, reads) = counting(data.clone());

        let chunks: Vec<Bytes> = chunk_stream(reader, data.len() as u64)
            .try_collect()
            .await
            .unwrap();

        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![65_536, 65_536, 18_928]);
        assert_eq!(reads.load(Ordering::SeqCst), 3);
        assert_eq!(chunks.concat(), data);
    }

    #[tokio::test]
    async fn test_chunk_stream_empty_reads_nothing() {
        let (reader, reads) = counting(Vec::new());
        let chunks: Vec<Bytes> = chunk_stream(reader, 0).try_collect().await.unwrap();
        assert!(chunks.is_empty());
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chunk_stream_exact_multiple() {
        let (reader, reads) = counting(vec![7u8; CHUNK_SIZE * 2]);
        let chunks: Vec<Bytes> = chunk_stream(reader, (CHUNK_SIZE * 2) as u64)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_chunk_stream_truncated_source_fails() {
        let (reader, _reads) = counting(vec![1u8; 10]);
        let result: std::io::Result<Vec<Bytes>> = chunk_stream(reader, 100).try_collect().await;
        assert_eq!(
            result.unwrap_err().kind(),
            std::io::ErrorKind::UnexpectedEof
        );
    }
}
