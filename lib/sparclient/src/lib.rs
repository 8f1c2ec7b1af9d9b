#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod client;
mod config;
mod error;
mod format;
mod fuseki;
mod http;

pub use crate::client::TriplestoreClient;
pub use crate::config::TriplestoreConfig;
pub use crate::error::ClientError;
pub use crate::format::GraphFormat;
pub use crate::fuseki::HttpTriplestore;
pub use sparesults::QuerySolution;
