//! Input/output stream binding.
//!
//! The service does not open its streams until it is run. A [`StreamSource`]
//! hands them over; [`Stdio`] is the one used in production.

use std::io::{self, Read, Write};

use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// Something that can provide the service's input and output streams.
pub trait StreamSource {
    /// Stream the service reads request frames from.
    type Reader: Read;
    /// Stream the service writes response frames to.
    type Writer: Write;

    /// Opens both streams.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StreamBind`] naming the stream that could not
    /// be opened.
    fn bind(&mut self) -> ServiceResult<(Self::Reader, Self::Writer)>;
}

/// The process's standard input and output.
///
/// On unix the descriptors are duplicated into owned files so writes bypass
/// the line-buffered `Stdout`. The Rust runtime reopens a descriptor the
/// parent closed on `/dev/null` before `main` runs; such a stream is refused
/// at bind time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdio;

#[cfg(unix)]
impl StreamSource for Stdio {
    type Reader = std::fs::File;
    type Writer = std::fs::File;

    fn bind(&mut self) -> ServiceResult<(Self::Reader, Self::Writer)> {
        use std::os::fd::AsFd;

        debug!("Binding stdin and stdout");
        let input = bind_descriptor("stdin", io::stdin().as_fd())?;
        let output = bind_descriptor("stdout", io::stdout().as_fd())?;
        debug!("Streams stdin and stdout bound");

        Ok((input, output))
    }
}

/// Duplicates `fd` into an owned file, refusing one that points at `/dev/null`.
#[cfg(unix)]
fn bind_descriptor(
    stream: &'static str,
    fd: std::os::fd::BorrowedFd<'_>,
) -> ServiceResult<std::fs::File> {
    use std::os::unix::fs::MetadataExt;

    let file = std::fs::File::from(
        fd.try_clone_to_owned()
            .map_err(|e| ServiceError::stream_bind(stream, e))?,
    );
    let metadata = file
        .metadata()
        .map_err(|e| ServiceError::stream_bind(stream, e))?;

    // Without a /dev/null to compare against, nothing can have been reopened on it.
    if let Ok(null) = std::fs::metadata("/dev/null") {
        if metadata.dev() == null.dev() && metadata.ino() == null.ino() {
            return Err(ServiceError::stream_bind(
                stream,
                io::Error::new(
                    io::ErrorKind::NotConnected,
                    "descriptor is closed or redirected to /dev/null",
                ),
            ));
        }
    }

    Ok(file)
}

#[cfg(not(unix))]
impl StreamSource for Stdio {
    type Reader = io::Stdin;
    type Writer = io::Stdout;

    fn bind(&mut self) -> ServiceResult<(Self::Reader, Self::Writer)> {
        debug!("Binding stdin and stdout");
        Ok((io::stdin(), io::stdout()))
    }
}

/// Streams that are already open, handed over on the first bind.
///
/// Binding a second time fails because the streams have been given away.
#[derive(Debug)]
pub struct Preopened<R, W> {
    streams: Option<(R, W)>,
}

impl<R: Read, W: Write> Preopened<R, W> {
    /// Wraps an open reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            streams: Some((reader, writer)),
        }
    }
}

impl<R: Read, W: Write> StreamSource for Preopened<R, W> {
    type Reader = R;
    type Writer = W;

    fn bind(&mut self) -> ServiceResult<(R, W)> {
        self.streams.take().ok_or_else(|| {
            ServiceError::stream_bind(
                "stdin",
                io::Error::new(io::ErrorKind::NotConnected, "streams already consumed"),
            )
        })
    }
}
