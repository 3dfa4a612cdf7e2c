// ## 📂 File: `src/framing/io.rs`
// ## Exact-length reads over a live byte stream

use std::io::{self, Read, Write};

use crate::constants::{CHUNK_SIZE, DIGEST_BUF_SIZE};
use crate::framing::types::FramingError;

/// Move exactly `total` bytes from `r` into `sink`, crediting `initial` first.
///
/// `initial` holds bytes that were already read off the stream (e.g. the tail
/// of the chunk that contained the plain-mode delimiter); at most `total` of
/// them are written. Reads loop on partial results and stop at `total` or at
/// EOF, whichever comes first.
///
/// Returns the number of bytes written. A value below `total` means the peer
/// closed early; the caller decides how to report that.
pub fn recv_exact_into<R, W>(
    r: &mut R,
    sink: &mut W,
    total: u64,
    initial: &[u8],
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut written: u64 = 0;

    if !initial.is_empty() {
        let take = (initial.len() as u64).min(total) as usize;
        sink.write_all(&initial[..take])?;
        written += take as u64;
    }

    let mut buf = vec![0u8; CHUNK_SIZE];
    while written < total {
        let want = (total - written).min(CHUNK_SIZE as u64) as usize;
        let n = match r.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sink.write_all(&buf[..n])?;
        written += n as u64;
    }

    Ok(written)
}

/// Read exactly `n` bytes into memory or fail with `ConnectionClosed`.
pub fn read_exact_or_closed<R: Read + ?Sized>(r: &mut R, n: u64) -> Result<Vec<u8>, FramingError> {
    // A hostile length must not translate into one huge up-front allocation.
    let mut out = Vec::with_capacity(n.min(DIGEST_BUF_SIZE as u64) as usize);

    let got = recv_exact_into(r, &mut out, n, &[])?;
    if got != n {
        return Err(FramingError::ConnectionClosed { expected: n, received: got });
    }
    Ok(out)
}
