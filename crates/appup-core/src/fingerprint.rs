//! Chunked content fingerprint matching the multipart ETag a CDN assigns to
//! an object uploaded in 5 MiB parts: `md5(md5(part_0) || md5(part_1) || ...)`
//! rendered as lowercase hex, followed by `-<part count>`.
//!
//! Computing it locally lets us compare a cached artifact with the remote
//! one using nothing but a HEAD request.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{InstallError, Result};

/// Part size used by the remote host for multipart uploads.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Fingerprint of an empty file: zero chunks, MD5 of the empty concatenation.
pub const EMPTY_FINGERPRINT: &str = "d41d8cd98f00b204e9800998ecf8427e-0";

/// Compute the fingerprint of the file at `path`.
pub fn compute_fingerprint(path: &Path) -> Result<String> {
    let f = File::open(path).map_err(|e| InstallError::io(path, e))?;
    fingerprint_reader(f).map_err(|e| InstallError::io(path, e))
}

/// Fingerprint any byte stream. Chunks are read and hashed one at a time.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut digests: Vec<u8> = Vec::new();
    let mut chunks: u64 = 0;
    loop {
        let n = fill_chunk(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        digests.extend_from_slice(&Md5::digest(&buf[..n]));
        chunks += 1;
        if n < CHUNK_SIZE {
            break;
        }
    }
    let outer = Md5::digest(&digests);
    Ok(format!("{}-{}", hex::encode(outer), chunks))
}

/// Read until `buf` is full or EOF; returns bytes read.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
