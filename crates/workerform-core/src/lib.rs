pub mod bundle;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod id;
pub mod model;

pub use bundle::{ContentKind, LoadedBundle, LoadedModule, ModuleFile, classify, digest, load, scan};
pub use canonical::{canonical_json, canonicalize};
pub use digest::{bundle_digest, file_digest};
pub use error::{CoreError, Result};
pub use id::generate_id;
pub use model::{Binding, BindingKind, normalize_bindings, validate_bindings};
