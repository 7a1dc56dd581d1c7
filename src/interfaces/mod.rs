//! Entry points that drive the saga from outside: CSV replay files.

pub mod csv;
pub mod replay;
