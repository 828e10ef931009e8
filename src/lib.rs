#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]
#![deny(unused_must_use)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod blueprint;
pub mod cache;
pub mod config;
pub mod error;
pub mod global;
pub mod instance;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod substitute;
pub mod type_key;

pub use blueprint::{Arguments, Blueprint, BlueprintDescriptor, Dependency};
pub use cache::{Assignment, AutoWiredCache, Registration};
pub use config::CacheConfig;
pub use instance::Instance;
pub use provider::ProviderCache;
pub use substitute::Substitute;
pub use type_key::TypeKey;

#[cfg(feature = "macros")]
pub use autowire_macros::Blueprint;
