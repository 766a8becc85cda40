// Source file loading
//
// This module provides the file-reading front end of the pipeline and the
// default reload backing: read a script file into a payload, resolve its
// encoding, and wire descriptor plus backing into a reloadable string.

pub mod file_reader;
pub mod source_loader;

pub use file_reader::{RawFilePayload, read_file, read_file_from_url};
pub use source_loader::{
    FileBacking, create_reloadable_source_from_file, create_reloadable_source_from_url,
};
