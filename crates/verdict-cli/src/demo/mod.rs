//! Code under test for the bundled suites
//!
//! Small, deliberately plain subjects: arithmetic, text and collection
//! helpers, a user registry, an observable counter, a JSON client with a
//! scripted transport and an in-memory storage area.

pub mod arrays;
pub mod counter;
pub mod http;
pub mod math;
pub mod storage;
pub mod strings;
pub mod users;
