//! Secret Channel
//!
//! Hands a child process a secret through an anonymous pipe exposed as a
//! file-descriptor pseudo-path (`/dev/fd/<n>` on POSIX). The secret never
//! appears in argv or in an on-disk file. Not every platform supports opening
//! a descriptor by number, so support is probed at run time rather than
//! assumed: [`piping_supported`] writes a timestamp-derived probe string into
//! a pipe and only reports true if the exact bytes come back through the
//! pseudo-path.
//!
//! # Descriptor lifetime
//! The write end is always fully written and closed before any handoff, so
//! the child sees EOF without coordination. The read end's lifetime is handed
//! to the child: [`SecretPipe::handoff_fd`] duplicates it with `dup(2)`
//! because the descriptors `std::io::pipe` creates are close-on-exec and
//! would vanish before the replacement image could open them. The duplicate
//! is reclaimed by process exit; the leak is bounded to one short-lived
//! descriptor per invocation.

#[cfg(unix)]
use std::io::Write;

use crate::error::{DbPromptError, Result};

#[cfg(unix)]
use std::os::raw::c_int;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

// The pack carries no libc dependency; declare the one call we need.
#[cfg(unix)]
extern "C" {
    fn dup(fd: c_int) -> c_int;
}

/// The per-platform "open a file descriptor by number" pseudo-path
#[must_use]
pub fn fd_path(fd: i32) -> String {
    format!("/dev/fd/{fd}")
}

/// Outcome of one probe round trip
#[cfg(unix)]
#[derive(Debug)]
enum ProbeOutcome {
    Match,
    Mismatch { wrote: String, read: String },
}

/// Probe whether this host can read an open descriptor back through its
/// pseudo-path
///
/// Returns true only on a byte-for-byte round trip. Any I/O error during the
/// probe, or a byte mismatch, yields false; both pipe ends are closed before
/// returning. With `verbose`, the failure reason goes to stderr.
#[cfg(unix)]
#[must_use]
pub fn piping_supported(verbose: bool) -> bool {
    match probe_via(fd_path) {
        Ok(ProbeOutcome::Match) => true,
        Ok(ProbeOutcome::Mismatch { wrote, read }) => {
            if verbose {
                eprintln!(
                    "Wrote >>{wrote}<<, but read back >>{read}<<. \
                     Piping to /dev/fd/## is not supported"
                );
            }
            false
        }
        Err(err) => {
            if verbose {
                eprintln!("Pipe test failed with {err}");
            }
            false
        }
    }
}

/// No `/dev/fd` on this platform; callers fall back to inline arguments.
#[cfg(not(unix))]
#[must_use]
pub fn piping_supported(_verbose: bool) -> bool {
    false
}

#[cfg(unix)]
fn probe_via(path_for: impl Fn(i32) -> String) -> std::io::Result<ProbeOutcome> {
    let (reader, mut writer) = std::io::pipe()?;
    let probe = probe_string();
    writer.write_all(probe.as_bytes())?;
    drop(writer); // reader must see EOF before the read-back

    let read_back = std::fs::read_to_string(path_for(reader.as_raw_fd()))?;
    if read_back == probe {
        Ok(ProbeOutcome::Match)
    } else {
        Ok(ProbeOutcome::Mismatch { wrote: probe, read: read_back })
    }
}

/// Timestamp-derived probe payload, unique enough per invocation
#[cfg(unix)]
fn probe_string() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("fd-probe-{}.{:09}", now.as_secs(), now.subsec_nanos())
}

/// An anonymous pipe pre-loaded with a secret payload
///
/// The write end is closed by the time `load` returns; only the read end
/// remains, waiting to be inherited by the replacement process image.
#[cfg(unix)]
#[derive(Debug)]
pub struct SecretPipe {
    reader: std::io::PipeReader,
}

#[cfg(unix)]
impl SecretPipe {
    /// Create a fresh pipe, write the payload, and close the write end
    pub fn load(payload: &str) -> Result<Self> {
        let (reader, mut writer) = std::io::pipe().map_err(DbPromptError::PipeError)?;
        writer.write_all(payload.as_bytes()).map_err(DbPromptError::PipeError)?;
        drop(writer);
        Ok(Self { reader })
    }

    /// Raw descriptor of the read end
    #[must_use]
    pub fn raw_fd(&self) -> i32 {
        self.reader.as_raw_fd()
    }

    /// Duplicate the read end into a descriptor that survives exec
    ///
    /// Fails with `BadFileDescriptor` naming the offending value when the
    /// read end is not a valid non-negative integer handle, and with
    /// `PipeError` carrying the OS error when the duplication itself fails.
    pub fn handoff_fd(&self) -> Result<i32> {
        let fd = self.reader.as_raw_fd();
        if fd < 0 {
            return Err(DbPromptError::BadFileDescriptor(i64::from(fd)));
        }
        inherit_fd(fd).map_err(DbPromptError::PipeError)
    }

    /// Pseudo-path the child should open to read the payload
    pub fn handoff_path(&self) -> Result<String> {
        Ok(fd_path(self.handoff_fd()?))
    }
}

/// Duplicate a descriptor, preserving errno on failure
#[cfg(unix)]
fn inherit_fd(fd: c_int) -> std::io::Result<c_int> {
    let inherited = unsafe { dup(fd) };
    if inherited < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(inherited)
}

/// Stub so the pipe path compiles on platforms without `/dev/fd`;
/// unreachable in practice because [`piping_supported`] reports false there.
#[cfg(not(unix))]
#[derive(Debug)]
pub struct SecretPipe;

#[cfg(not(unix))]
impl SecretPipe {
    pub fn load(_payload: &str) -> Result<Self> {
        Err(DbPromptError::PipeError(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "fd pipe handoff requires a unix platform",
        )))
    }

    pub fn handoff_path(&self) -> Result<String> {
        Err(DbPromptError::PipeError(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "fd pipe handoff requires a unix platform",
        )))
    }
}
