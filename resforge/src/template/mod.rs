//! Template rendering and the stub repository
//!
//! [`TemplateRenderer`] is the substitution engine; [`StubRepository`] serves
//! the named templates each generator renders, from an override directory
//! first and the embedded set otherwise.

pub mod renderer;
pub mod stubs;

pub use renderer::TemplateRenderer;
pub use stubs::StubRepository;
