//! Exit code constants for litdaily.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure, or nothing stored for a date |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 70 | `GENERATION_FAILED` | Content generation failed terminally |
//! | 74 | `STORE_FAILURE` | The content store could not be read or written |

/// Exit codes matching the documented exit code table.
///
/// Use the named constants, or [`as_i32()`](Self::as_i32) to get the numeric
/// value for `std::process::exit()`.
///
/// ```rust
/// use litdaily_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::GENERATION_FAILED, ExitCode::from_i32(70));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments, config, or missing credentials
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Generation failed - terminal upstream error or retries exhausted
    pub const GENERATION_FAILED: ExitCode = ExitCode(70);

    /// Store failure - the content store could not be read or written
    pub const STORE_FAILURE: ExitCode = ExitCode(74);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values_are_stable() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::GENERATION_FAILED.as_i32(), 70);
        assert_eq!(ExitCode::STORE_FAILURE.as_i32(), 74);
    }

    #[test]
    fn test_round_trip_through_i32() {
        let code: ExitCode = 74.into();
        assert_eq!(code, ExitCode::STORE_FAILURE);
        let raw: i32 = ExitCode::CLI_ARGS.into();
        assert_eq!(raw, 2);
    }
}
