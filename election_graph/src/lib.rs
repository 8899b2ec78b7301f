mod binding;
mod builder;
mod context;
mod convert;
mod details;
mod error;
mod loaders;
pub mod manual;
mod model;
mod rcv;
mod registry;
mod status;

#[cfg(test)]
mod test_data;

pub use crate::binding::{
    expect_list, Conversion, Draft, EntityLoader, FieldBinding, FieldSite, RawRecord, Source,
};
pub use crate::builder::{build_graph, link_ballot_items};
pub use crate::context::{Dependency, LoadContext, PublishedTables};
pub use crate::convert::*;
pub use crate::details::parse_contest_results;
pub use crate::error::{LoadError, LoadResult};
pub use crate::loaders::{load_contest, ContestDraft};
pub use crate::model::*;
pub use crate::rcv::{CandidateRound, RcvResults};
pub use crate::registry::{IdRegistry, Identified, Indexing};
pub use crate::status::apply_contest_status;
