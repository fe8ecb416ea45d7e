//! Tool Agent - a chat backend that lets a language model call tools.
//!
//! A message goes to a function-calling model together with the schemas of
//! the registered tools (calculator, weather, web search). Requested tool
//! calls run concurrently through the executor, which applies timeouts,
//! retries and caching and turns every outcome into a uniform result. The
//! results go back to the model until it answers or the round cap is hit.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
