// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! A missing handler is never an error: dispatch reports `false` instead.
//! Errors are reserved for caller mistakes ([`DispatchError::ArityMismatch`])
//! and for handlers that fail while running ([`DispatchError::Invocation`]).

use alloc::borrow::Cow;
use alloc::boxed::Box;

use thiserror::Error;

/// Error raised by a handler body.
pub type HandlerError = Box<dyn core::error::Error + Send + Sync>;

/// Failure surfaced by a dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatcher was called with the wrong number of arguments.
    #[error("`{name}` takes {expected} argument(s), {actual} supplied")]
    ArityMismatch {
        /// Dispatcher method name.
        name: Cow<'static, str>,
        /// Declared arity.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },
    /// The resolved handler returned an error.
    #[error("handler for `{name}` failed")]
    Invocation {
        /// Dispatcher method name.
        name: Cow<'static, str>,
        /// The handler's own error.
        #[source]
        source: HandlerError,
    },
}

/// Failure reading an argument inside a handler.
///
/// Converts into [`HandlerError`], so handlers can use `?` on argument reads.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    /// Fewer arguments were passed than the handler reads.
    #[error("argument {index} is missing ({len} supplied)")]
    Missing {
        /// Requested position.
        index: usize,
        /// Number of arguments available.
        len: usize,
    },
    /// The argument cannot be viewed as the requested type.
    #[error("argument {index} is `{actual}`, not `{expected}`")]
    Type {
        /// Requested position.
        index: usize,
        /// Requested type name.
        expected: &'static str,
        /// Runtime type name of the argument.
        actual: &'static str,
    },
}
