use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::event::EventSink;
use crate::receiver::StreamDecoder;

/// Feed everything `reader` produces into `decoder` until end of stream.
///
/// Reads in chunks of [`DecoderConfig::read_chunk_size`](crate::DecoderConfig)
/// bytes and hands each chunk to [`StreamDecoder::receive_into`] as it
/// arrives, so events reach `sink` while the transport is still open.
/// Returns the total number of bytes read.
///
/// A frame still incomplete at end of stream stays buffered in the
/// decoder; the caller decides whether to keep or [`reset`] it.
///
/// # Errors
///
/// Propagates the first read error. The decoder is reset before
/// returning so bytes from a broken connection are never spliced onto
/// the next one.
///
/// [`reset`]: StreamDecoder::reset
pub async fn drain<R, S>(
  reader: &mut R,
  decoder: &mut StreamDecoder,
  sink: &mut S,
) -> io::Result<u64>
where
  R: AsyncRead + Unpin,
  S: EventSink + ?Sized,
{
  let mut chunk = vec![0u8; decoder.config().read_chunk_size.max(1)];
  let mut total = 0u64;

  loop {
    let n = match reader.read(&mut chunk).await {
      Ok(n) => n,
      Err(err) => {
        tracing::warn!(error = %err, read = total, "transport read failed");
        decoder.reset();
        return Err(err);
      }
    };
    if n == 0 {
      tracing::debug!(
        read = total,
        pending = decoder.buffered_len(),
        "end of stream"
      );
      return Ok(total);
    }
    total += n as u64;
    decoder.receive_into(&chunk[..n], sink);
  }
}
