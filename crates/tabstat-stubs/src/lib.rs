//! Client-side RPC stub traits for services the stat daemon talks to.
//!
//! Each stub trait defines the async interface for calling a remote service.
//! Concrete network-backed implementations belong to the transport layer;
//! this crate also provides mock implementations for tests and demos.

pub mod meta_stub;

pub use meta_stub::{IMetaServiceStub, MockMetaServiceStub};
