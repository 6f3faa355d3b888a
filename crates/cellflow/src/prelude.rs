//! Prelude module - common imports for cellflow users
//!
//! ```rust
//! use cellflow::prelude::*;
//! ```

pub use crate::{
    CellContent,
    CellHandle,
    // Error types
    Error,
    FormulaErrorKind,
    Position,
    Result,
    // Main types
    Sheet,
    Size,
    Value,
};
