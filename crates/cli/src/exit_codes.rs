//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (everything reconciled)          |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, columns)      |
//! | 3-9     | recon            | Reconciliation-specific codes            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed; for `run`, nothing left pending.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, columns that cannot be resolved.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Recon (3-9)
// =============================================================================

/// Run finished but bank and/or sales records remain pending.
pub const EXIT_RECON_PENDING: u8 = 3;

/// Config file unreadable, unparsable, or failed validation.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 4;

/// An input ledger could not be read or decoded.
pub const EXIT_RECON_INPUT: u8 = 5;

/// Output (report file or stdout) could not be written.
pub const EXIT_RECON_OUTPUT: u8 = 6;
