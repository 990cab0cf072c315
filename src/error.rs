// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Chirp8

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Chirp8.
#[derive(Debug, Error)]
pub enum Error {
    /// Tried to read or write memory outside `0x000..=0xfff`
    #[error("address {addr:04x} is outside of memory")]
    OutOfBounds {
        /// The offending address
        addr: usize,
    },
    /// The program doesn't fit between `0x200` and the end of memory
    #[error("program is {len} bytes, but only {max} bytes are available")]
    ProgramTooLarge {
        /// Length of the rejected program
        len: usize,
        /// Size of program space
        max: usize,
    },
    /// A call would nest subroutines deeper than the stack allows
    #[error("stack overflow: call at {addr:03x}")]
    StackOverflow {
        /// Address of the offending call
        addr: u16,
    },
    /// Returned from a subroutine with nothing on the stack
    #[error("stack underflow: return at {addr:03x}")]
    StackUnderflow {
        /// Address of the offending return
        addr: u16,
    },
    /// Represents an unimplemented operation
    #[error("opcode {word:04x} at {addr:03x} not recognized")]
    UnknownOpcode {
        /// The offending word
        word: u16,
        /// Where the word was fetched from
        addr: u16,
    },
    /// Tried to convert string into mode, but it did not match.
    #[error("no suitable conversion of \"{mode}\" into Mode")]
    InvalidMode {
        /// The string which failed to become a mode
        mode: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether execution can continue after this error.
    ///
    /// Unknown opcodes are skipped; everything else stops the machine.
    /// # Examples
    /// ```rust
    /// # use chirp8::error::Error;
    /// assert!(Error::UnknownOpcode { word: 0xffff, addr: 0x200 }.is_recoverable());
    /// assert!(!Error::StackUnderflow { addr: 0x200 }.is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnknownOpcode { .. })
    }
}
