//! Rule registry compilation for promptscrub.
//!
//! This module is responsible for compiling redaction rules into the ordered,
//! immutable registry the redactor runs over. Precedence ordering and token
//! inertness are enforced here, at construction time, so that nothing can fail
//! once text is being processed.

pub mod compiler;
