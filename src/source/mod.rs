// Reloadable source descriptors and engine-facing string handles
//
// This module provides the long-lived ticket for an external source file
// (the descriptor) and the lazily-materializable string handle built from
// it, together with the backing seam the embedding implements to supply
// and release the payload bytes.

pub mod descriptor;
pub mod reloadable_string;

pub use descriptor::ReloadableSourceDescriptor;
pub use reloadable_string::{ReloadableString, SourceBacking, MAX_STRING_LENGTH};
