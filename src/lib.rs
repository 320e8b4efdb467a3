//! # notebook-www
//!
//! A read-only HTTP front end for a notebook: a tree of wiki pages with file
//! attachments, served as browsable web pages.
//!
//! ## Features
//!
//! - **Pages and indexes**: wiki markup rendered to HTML through a template
//! - **Attachments**: files next to a page served with their content type
//! - **Templates**: a built-in template or an HTML file with its own resources
//! - **Authentication**: optional HTTP Basic authentication
//!
//! ## Architecture
//!
//! - [`store`] - Document store trait and the filesystem notebook
//! - [`template`] - Template trait, built-in and file templates, wiki markup
//! - [`server`] - Request dispatch and the axum transport
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use notebook_www::{FsNotebook, Request, WwwInterface, load_template};
//!
//! let notebook = FsNotebook::open("/path/to/notebook").unwrap();
//! let template = load_template("Default").unwrap();
//! let interface = WwwInterface::new(notebook, template);
//!
//! let response = interface.handle(&Request::get("/Home.html"));
//! println!("{}", response.status());
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod template;

// Re-export commonly used types
pub use config::Config;
pub use error::{DispatchError, StoreError, TemplateError};
pub use server::{
    build_response, classify, create_router, AppState, AuthError, BasicAuth, Credentials,
    Outcome, Request, ResourceRef, Response, RouterConfig, WwwInterface,
};
pub use store::{DocumentStore, FsNotebook, PageContent, PagePath};
pub use template::{load_template, BuiltinTemplate, FileTemplate, Template};
