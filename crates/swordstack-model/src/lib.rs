//! Model types for the SwordStack deposit engine.
//!
//! Value objects exchanged between the engine and repository managers
//! ([`Deposit`], [`DepositReceipt`], [`Statement`], [`MediaResource`],
//! [`AuthCredentials`]), the Atom entry fragment they carry, the classified
//! operation variants, and the error taxonomy.

pub mod accept;
pub mod credentials;
pub mod deposit;
pub mod entry;
pub mod error;
pub mod media;
pub mod operation;
pub mod receipt;
pub mod statement;
pub mod uri;

pub use accept::{AcceptHeaders, MediaRange};
pub use credentials::AuthCredentials;
pub use deposit::Deposit;
pub use entry::{AtomEntry, Content, EntryElement, Extension, Generator, Link};
pub use error::{AuthFailure, EngineError, ServerFault, SwordError, SwordErrorCode, SwordResult};
pub use media::MediaResource;
pub use operation::{ContainerOperation, MediaResourceOperation, Representation, Retrieval};
pub use receipt::{DepositReceipt, OriginalDeposit, ResolvedReceipt};
pub use statement::Statement;
