//! Rendering and export of search results.
//!
//! # Submodules
//!
//! - [`table`]: sortable fixed-width text table of items
//! - [`chart`]: vertical text bar chart of the per-year tally
//! - [`markdown`]: full report as Markdown, plus the file writer
//! - [`json`]: full report as JSON
//! - [`indexes`]: `index.md` listing every Markdown report
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── educacao.json
//!
//! markdown_output_dir/
//! ├── 2025-05-06_educacao.md
//! └── index.md
//! ```

pub mod chart;
pub mod indexes;
pub mod json;
pub mod markdown;
pub mod table;
