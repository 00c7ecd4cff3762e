//! geminic - write git commit messages with an LLM.
//!
//! geminic reads the staged diff, asks Gemini or any OpenAI-compatible model
//! for a conventional commit message, and lets you commit, regenerate, edit,
//! or cancel.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface
//! - [`commit`]: Commit types and rendering
//! - [`config`]: Configuration management
//! - [`git`]: Git operations
//! - [`llm`]: Provider abstraction and backends
//! - [`prompt`]: Prompt construction
//! - [`session`]: The interactive commit workflow
//! - [`thinking`]: Chain-of-thought extraction
//! - [`ui`]: User interaction prompts
//!
//! # Quick Start
//!
//! ```bash
//! geminic config
//! git add .
//! geminic -c "optional hint"
//! ```

pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod prompt;
pub mod session;
pub mod thinking;
pub mod ui;
