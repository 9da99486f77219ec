//! Rendering adapter. Reads a `&WizardSession`, never mutates it.

mod components;
mod view;

pub use view::{ViewContext, render};
