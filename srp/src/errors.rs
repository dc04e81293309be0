//! Error types.

use core::{error, fmt};

/// SRP authentication error.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// A received value is outside its legal range.
    IllegalParameter {
        /// Parameter name
        name: &'static str,
    },
    /// The scrambling parameter hashed to zero. The handshake must be
    /// restarted from scratch, never retried with a substitute value.
    DegenerateScramble,
    /// A peer's proof failed the constant-time comparison.
    BadRecordMac {
        /// Which peer's proof is invalid
        peer: &'static str,
    },
    /// The password KDF rejected its parameters or inputs.
    KdfFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalParameter { name } => {
                write!(f, "illegal_parameter: bad '{name}' value")
            }
            Self::DegenerateScramble => {
                write!(f, "degenerate_scramble: scrambling parameter hashed to zero")
            }
            Self::BadRecordMac { peer } => {
                write!(f, "bad_record_mac: incorrect '{peer}' proof")
            }
            Self::KdfFailure => write!(f, "kdf_failure: private key derivation failed"),
        }
    }
}

impl error::Error for Error {}

/// Result type
pub type Result<T> = core::result::Result<T, Error>;
