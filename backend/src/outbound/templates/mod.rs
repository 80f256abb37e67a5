//! Filesystem-backed template store adapter.

mod fs_store;

pub use fs_store::FsTemplateStore;
