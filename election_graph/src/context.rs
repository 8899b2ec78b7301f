use log::info;

use crate::binding::FieldSite;
use crate::error::*;
use crate::model::*;
use crate::registry::*;

/// The registries a field binding may depend on.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Dependency {
    ResultStatTypes,
    VotingGroups,
    ResultStyles,
    Areas,
}

impl Dependency {
    pub fn name(&self) -> &'static str {
        match self {
            Dependency::ResultStatTypes => "result_stat_types_by_id",
            Dependency::VotingGroups => "voting_groups_by_id",
            Dependency::ResultStyles => "result_styles_by_id",
            Dependency::Areas => "areas_by_id",
        }
    }
}

/// The registries published so far during one load.
///
/// Slots are filled once, in the order fixed by the graph builder, and are
/// never replaced. A context is created for a single load and consumed when
/// the graph is assembled.
#[derive(Debug, Default)]
pub struct LoadContext {
    result_stat_types: Option<IdRegistry<ResultStatType>>,
    voting_groups: Option<IdRegistry<VotingGroup>>,
    result_styles: Option<IdRegistry<ResultStyle>>,
    areas: Option<IdRegistry<Area>>,
}

/// The published registries, taken out of a finished context.
#[derive(Debug)]
pub struct PublishedTables {
    pub result_stat_types: IdRegistry<ResultStatType>,
    pub voting_groups: IdRegistry<VotingGroup>,
    pub result_styles: IdRegistry<ResultStyle>,
    pub areas: IdRegistry<Area>,
}

fn publish<T>(
    slot: &mut Option<IdRegistry<T>>,
    reg: IdRegistry<T>,
    dep: Dependency,
) -> LoadResult<()> {
    if slot.is_some() {
        return AlreadyPublishedSnafu { name: dep.name() }.fail();
    }
    info!("LoadContext: publishing {} ({} entries)", dep.name(), reg.len());
    *slot = Some(reg);
    Ok(())
}

fn require<'a, T>(
    slot: &'a Option<IdRegistry<T>>,
    dep: Dependency,
    site: &FieldSite<'_>,
) -> LoadResult<&'a IdRegistry<T>> {
    slot.as_ref().ok_or_else(|| site.missing_dependency(dep))
}

impl LoadContext {
    pub fn new() -> LoadContext {
        LoadContext::default()
    }

    pub fn has(&self, dep: Dependency) -> bool {
        match dep {
            Dependency::ResultStatTypes => self.result_stat_types.is_some(),
            Dependency::VotingGroups => self.voting_groups.is_some(),
            Dependency::ResultStyles => self.result_styles.is_some(),
            Dependency::Areas => self.areas.is_some(),
        }
    }

    pub fn publish_result_stat_types(&mut self, reg: IdRegistry<ResultStatType>) -> LoadResult<()> {
        publish(&mut self.result_stat_types, reg, Dependency::ResultStatTypes)
    }

    pub fn publish_voting_groups(&mut self, reg: IdRegistry<VotingGroup>) -> LoadResult<()> {
        publish(&mut self.voting_groups, reg, Dependency::VotingGroups)
    }

    pub fn publish_result_styles(&mut self, reg: IdRegistry<ResultStyle>) -> LoadResult<()> {
        publish(&mut self.result_styles, reg, Dependency::ResultStyles)
    }

    pub fn publish_areas(&mut self, reg: IdRegistry<Area>) -> LoadResult<()> {
        publish(&mut self.areas, reg, Dependency::Areas)
    }

    // The accessors take the site of the requesting binding so that a
    // missing registry is reported against the record that needed it.

    pub fn result_stat_types(&self, site: &FieldSite<'_>) -> LoadResult<&IdRegistry<ResultStatType>> {
        require(&self.result_stat_types, Dependency::ResultStatTypes, site)
    }

    pub fn voting_groups(&self, site: &FieldSite<'_>) -> LoadResult<&IdRegistry<VotingGroup>> {
        require(&self.voting_groups, Dependency::VotingGroups, site)
    }

    pub fn result_styles(&self, site: &FieldSite<'_>) -> LoadResult<&IdRegistry<ResultStyle>> {
        require(&self.result_styles, Dependency::ResultStyles, site)
    }

    pub fn areas(&self, site: &FieldSite<'_>) -> LoadResult<&IdRegistry<Area>> {
        require(&self.areas, Dependency::Areas, site)
    }

    /// Consumes the context once every stage has run.
    pub fn into_tables(self) -> LoadResult<PublishedTables> {
        let missing = |dep: Dependency| LoadError::MissingDependency {
            entity: "ElectionGraph",
            id: None,
            attr: dep.name(),
            dependency: dep.name(),
        };
        Ok(PublishedTables {
            result_stat_types: self
                .result_stat_types
                .ok_or_else(|| missing(Dependency::ResultStatTypes))?,
            voting_groups: self
                .voting_groups
                .ok_or_else(|| missing(Dependency::VotingGroups))?,
            result_styles: self
                .result_styles
                .ok_or_else(|| missing(Dependency::ResultStyles))?,
            areas: self.areas.ok_or_else(|| missing(Dependency::Areas))?,
        })
    }
}
