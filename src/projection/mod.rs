//! Read-only projections of a session's grids: the analysis prompts sent to
//! the text-generation model, and the table descriptors consumed by the PDF
//! renderer. Both are pure functions of a grid snapshot.

pub mod prompt;
pub mod table;

pub use prompt::{build_evolution_prompt, build_session_prompt, NOT_ENOUGH_SESSIONS_PREFIX};
pub use table::{project_session_tables, AppendixRow, SectionBlock, SessionTables, TableBlock};
