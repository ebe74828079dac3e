//! Acquisition: HTTP fetching, the exam site's paper list, console capture,
//! and page metadata extraction.

pub mod console;
pub mod http_client;
pub mod page_meta;
pub mod paper_list;
