//! Setting handlers for different configuration patterns.

pub mod boolean;
pub mod simple;
pub mod string;
pub mod timeout;

pub use boolean::*;
pub use simple::*;
pub use string::*;
pub use timeout::*;
