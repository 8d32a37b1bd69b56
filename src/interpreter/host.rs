use std::{
    cell::RefCell,
    fmt,
    io::{self, Write},
    rc::Rc,
};

/// The outside world as seen by a running program.
///
/// A host supplies the sink that `print` and `println` write to and the
/// argument list returned by `args()`. The command-line binary uses standard
/// output and its trailing arguments; tests and embedders use an
/// [`OutputBuffer`].
pub struct Host {
    out:  Box<dyn Write>,
    args: Vec<String>,
}

impl Host {
    /// Creates a host writing to `out` and exposing `args` to the program.
    #[must_use]
    pub fn new(out: impl Write + 'static, args: Vec<String>) -> Self {
        Self { out: Box::new(out),
               args }
    }

    /// A host writing to the process's standard output.
    #[must_use]
    pub fn stdout(args: Vec<String>) -> Self {
        Self::new(io::stdout(), args)
    }

    /// Writes program output.
    ///
    /// # Errors
    /// Propagates any failure of the underlying sink.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    /// Flushes buffered program output.
    ///
    /// # Errors
    /// Propagates any failure of the underlying sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// The program arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").field("args", &self.args).finish_non_exhaustive()
    }
}

/// A shared in-memory output sink.
///
/// Clones share the same buffer, so one clone can be handed to a [`Host`]
/// while another is kept to read what the program printed.
///
/// # Example
/// ```
/// use phlite::interpreter::host::{Host, OutputBuffer};
///
/// let buffer = OutputBuffer::new();
/// let mut host = Host::new(buffer.clone(), Vec::new());
///
/// host.write(b"hello").unwrap();
/// assert_eq!(buffer.contents(), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded as UTF-8 (lossily).
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
