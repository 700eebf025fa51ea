//! Startup checks over a dashboard definition, run before anything is built.
//!
//! Every rule runs and every failure is collected, so one pass reports the
//! whole list instead of the first problem.

pub use self::validator::Validator;

mod validator;
mod rules {
    pub mod selections;
    pub mod styles;
}
