// SPDX-License-Identifier: Apache-2.0

//! Byte sources for the lexer.

/// Trait for input sources that can provide data to the lexer.
pub trait Reader {
    /// The error type returned by read operations
    type Error: core::error::Error + Send + Sync + 'static;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// Adapts any [`std::io::Read`] into a [`Reader`].
///
/// Reads interrupted by a signal are retried; every other I/O error is
/// handed to the caller untouched.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader for IoReader<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::io;

    struct FlakyRead {
        interrupted: bool,
    }

    impl io::Read for FlakyRead {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            buf[0] = b'7';
            Ok(1)
        }
    }

    #[test]
    fn test_io_reader_reads_cursor() {
        let mut reader = IoReader::new(io::Cursor::new(b"[1]".to_vec()));
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"[1]");
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_io_reader_retries_interrupted() {
        let mut reader = IoReader::new(FlakyRead { interrupted: false });
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'7');
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut inner = IoReader::new(io::Cursor::new(b"ab".to_vec()));
        let mut buf = [0u8; 1];
        assert_eq!(Reader::read(&mut &mut inner, &mut buf).unwrap(), 1);
        assert_eq!(inner.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'b');
    }
}
