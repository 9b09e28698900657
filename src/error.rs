//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `mixdown` library. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes
//! of the flattening engine, providing clear and descriptive error
//! messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that
//!   can occur while resolving a builder. Each variant corresponds to a
//!   specific type of error and includes contextual information to aid
//!   in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`,
//!   used throughout the library to simplify function signatures.
//!
//! Every error is fatal for the builder being flattened: there is no
//! retry and no partial result. Flattening either fully succeeds or the
//! caller must abort configuration generation for that builder.

use thiserror::Error;

/// Main error type for mixdown operations
#[derive(Error, Debug)]
pub enum Error {
    /// A builder referenced a mixin name absent from the mixin table.
    ///
    /// May include a "did you mean" suggestion and the list of defined
    /// mixin names.
    #[error("Mixin not found: {name}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    MixinNotFound {
        name: String,
        /// Optional hint naming similar or available mixins
        hint: Option<String>,
    },

    /// A mixin chain re-entered a mixin that is already being resolved.
    #[error("Cycle detected in mixin references: {cycle}")]
    MixinCycle { cycle: String },

    /// A dimension entry parsed as neither `key:value` nor
    /// `expiration:key:value`.
    #[error("Invalid dimension entry '{entry}': {message}")]
    InvalidDimension { entry: String, message: String },

    /// A recipe property entry was malformed or its JSON body failed to
    /// decode.
    #[error("Invalid recipe property '{entry}': {message}")]
    InvalidProperty { entry: String, message: String },

    /// A builder that still references mixins reached the merger.
    #[error("Builder '{builder}' still references mixins: {mixins}")]
    UnresolvedMixins { builder: String, mixins: String },

    /// An error occurred while re-encoding recipe property values.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
