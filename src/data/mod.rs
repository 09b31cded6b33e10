//! Data layer: matrix model, loading, and label selection.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Matrix
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Matrix   │  Array2<f64>, row / column labels
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  visible row / column names → indices
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;

pub use model::Matrix;
