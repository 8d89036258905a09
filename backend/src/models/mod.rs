//! # Models
//!
//! Data structures shared by the custody client, the directory services and
//! the CLI output.
//!
//! ## Organization
//!
//! - `custody.rs` - Bodies returned by the remote custody API
//! - `directory.rs` - The flattened address index built from those bodies
//! - `responses.rs` - JSON documents printed by the CLI
//!
//! ## Serialization
//!
//! All models use Serde. Field names are camelCase on the wire, matching the
//! custody API.

pub mod custody;
pub mod directory;
pub mod responses;

pub use custody::*;
pub use directory::*;
pub use responses::*;
