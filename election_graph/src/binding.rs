//! The binding engine: turns one raw record into one entity.
//!
//! An [`EntityLoader`] is an ordered table of [`FieldBinding`]s. Loading a
//! record first reads its id, then runs every binding in order. A binding
//! removes its key from the record, converts the value with one of the shared
//! converters and hands the typed value to a setter on the entity draft.
//! Once all the bindings have run, the record must be empty.

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::context::*;
use crate::convert::*;
use crate::error::*;
use crate::registry::*;

/// One input record, consumed key by key.
#[derive(PartialEq, Debug, Clone)]
pub struct RawRecord {
    entity: &'static str,
    fields: JSMap<String, JSValue>,
}

impl RawRecord {
    pub fn new(entity: &'static str, fields: JSMap<String, JSValue>) -> RawRecord {
        RawRecord { entity, fields }
    }

    /// Wraps a JSON value, which must be an object.
    pub fn from_value(entity: &'static str, value: JSValue) -> LoadResult<RawRecord> {
        match value {
            JSValue::Object(fields) => Ok(RawRecord { entity, fields }),
            x => Err(LoadError::InvalidValueFormat {
                entity,
                id: None,
                attr: "(record)",
                raw: x.to_string(),
                source: ConvertError::WrongType {
                    expected: "an object",
                },
            }),
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Removes a key. A null value counts as absent.
    pub fn take(&mut self, key: &str) -> Option<JSValue> {
        match self.fields.remove(key) {
            Some(JSValue::Null) | None => None,
            Some(x) => Some(x),
        }
    }

    pub fn leftover_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fields.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn ensure_consumed(&self, id: Option<&str>) -> LoadResult<()> {
        if self.fields.is_empty() {
            return Ok(());
        }
        let keys = self.leftover_keys();
        let raw = keys
            .iter()
            .map(|k| {
                let v = self.fields.get(k).map(|v| v.to_string()).unwrap_or_default();
                shorten(&v)
            })
            .collect();
        Err(LoadError::UnrecognizedField {
            entity: self.entity,
            id: id.map(|x| x.to_string()),
            keys,
            raw,
        })
    }
}

const MAX_RAW_CHARS: usize = 40;

fn shorten(raw: &str) -> String {
    if raw.chars().count() <= MAX_RAW_CHARS {
        raw.to_string()
    } else {
        let head: String = raw.chars().take(MAX_RAW_CHARS).collect();
        format!("{}...", head)
    }
}

/// Where a value is being loaded: used to build error messages.
#[derive(Debug, Clone, Copy)]
pub struct FieldSite<'a> {
    pub entity: &'static str,
    pub id: Option<&'a str>,
    pub attr: &'static str,
}

impl FieldSite<'_> {
    fn owned_id(&self) -> Option<String> {
        self.id.map(|x| x.to_string())
    }

    pub fn invalid(&self, raw: &JSValue, source: ConvertError) -> LoadError {
        LoadError::InvalidValueFormat {
            entity: self.entity,
            id: self.owned_id(),
            attr: self.attr,
            raw: raw.to_string(),
            source,
        }
    }

    pub fn dangling(&self, missing: &str) -> LoadError {
        LoadError::DanglingReference {
            entity: self.entity,
            id: self.owned_id(),
            attr: self.attr,
            missing: missing.to_string(),
        }
    }

    pub fn missing_dependency(&self, dep: Dependency) -> LoadError {
        LoadError::MissingDependency {
            entity: self.entity,
            id: self.owned_id(),
            attr: self.attr,
            dependency: dep.name(),
        }
    }

    pub fn missing(&self) -> LoadError {
        LoadError::MissingRequiredField {
            entity: self.entity,
            id: self.owned_id(),
            attr: self.attr,
        }
    }
}

/// Where the value of a binding comes from.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Source {
    /// A key of the record. Nothing is set when the key is absent.
    Key(&'static str),
    /// No input: the binding derives its value from the draft and the
    /// context, and always runs.
    Derived,
}

pub type CustomLoad<D> =
    fn(&mut D, Option<JSValue>, &LoadContext, &FieldSite<'_>) -> LoadResult<()>;

/// The converter of a binding, together with the setter receiving the
/// converted value.
pub enum Conversion<D> {
    /// Translatable text, kept as is.
    Text(fn(&mut D, JSValue)),
    AsIs(fn(&mut D, JSValue)),
    Id(fn(&mut D, String)),
    Ids(fn(&mut D, Vec<String>)),
    Int(fn(&mut D, Option<i64>)),
    Bool(fn(&mut D, Option<bool>)),
    Date(fn(&mut D, NaiveDate)),
    DateTime(fn(&mut D, NaiveDateTime)),
    /// Anything that needs the context, such as resolving references.
    Custom(CustomLoad<D>),
}

pub struct FieldBinding<D> {
    pub attr: &'static str,
    pub source: Source,
    pub depends_on: &'static [Dependency],
    pub conversion: Conversion<D>,
}

/// A binding reading the key of the same name.
pub const fn field<D>(attr: &'static str, conversion: Conversion<D>) -> FieldBinding<D> {
    FieldBinding {
        attr,
        source: Source::Key(attr),
        depends_on: &[],
        conversion,
    }
}

/// A binding reading a key with a different name.
pub const fn keyed<D>(
    attr: &'static str,
    key: &'static str,
    conversion: Conversion<D>,
) -> FieldBinding<D> {
    FieldBinding {
        attr,
        source: Source::Key(key),
        depends_on: &[],
        conversion,
    }
}

pub const fn with_deps<D>(
    attr: &'static str,
    source: Source,
    depends_on: &'static [Dependency],
    load: CustomLoad<D>,
) -> FieldBinding<D> {
    FieldBinding {
        attr,
        source,
        depends_on,
        conversion: Conversion::Custom(load),
    }
}

impl<D> FieldBinding<D> {
    pub fn apply(
        &self,
        draft: &mut D,
        record: &mut RawRecord,
        ctx: &LoadContext,
        id: Option<&str>,
    ) -> LoadResult<()> {
        let site = FieldSite {
            entity: record.entity(),
            id,
            attr: self.attr,
        };
        // Checked before touching the record: a missing registry means that
        // the stages ran out of order, whatever this record contains.
        for dep in self.depends_on.iter() {
            if !ctx.has(*dep) {
                return Err(site.missing_dependency(*dep));
            }
        }
        let value = match self.source {
            Source::Key(key) => match record.take(key) {
                Some(v) => Some(v),
                None => return Ok(()),
            },
            Source::Derived => None,
        };
        debug!(
            "FieldBinding::apply: {} {:?}: {} <- {:?}",
            site.entity, id, self.attr, value
        );
        let v = match (&self.conversion, value) {
            (Conversion::Custom(load), v) => return load(draft, v, ctx, &site),
            (_, None) => return Ok(()),
            (_, Some(v)) => v,
        };
        match &self.conversion {
            Conversion::Text(set) | Conversion::AsIs(set) => set(draft, v),
            Conversion::Id(set) => set(draft, parse_id(&v).map_err(|e| site.invalid(&v, e))?),
            Conversion::Ids(set) => set(draft, parse_ids(&v).map_err(|e| site.invalid(&v, e))?),
            Conversion::Int(set) => set(draft, parse_int(&v).map_err(|e| site.invalid(&v, e))?),
            Conversion::Bool(set) => set(draft, parse_bool(&v).map_err(|e| site.invalid(&v, e))?),
            Conversion::Date(set) => set(draft, parse_date(&v).map_err(|e| site.invalid(&v, e))?),
            Conversion::DateTime(set) => {
                set(draft, parse_date_time(&v).map_err(|e| site.invalid(&v, e))?)
            }
            Conversion::Custom(_) => {}
        }
        Ok(())
    }
}

/// An entity under construction.
///
/// The loader creates the draft from the id and the parameters supplied by
/// the caller, runs the bindings on it and only hands out the result of
/// [`Draft::finish`].
pub trait Draft: Sized {
    /// Values injected by the caller, such as the owning contest.
    type Params;
    type Entity;
    const ENTITY: &'static str;

    fn start(id: Option<String>, params: Self::Params) -> Self;

    fn finish(self) -> LoadResult<Self::Entity>;
}

pub struct EntityLoader<D: 'static> {
    /// The key holding the id. The election root has none.
    pub id_key: Option<&'static str>,
    pub fields: &'static [FieldBinding<D>],
    /// Runs once all the bindings have been applied.
    pub finalize: Option<fn(&mut D) -> LoadResult<()>>,
}

impl<D: Draft + 'static> EntityLoader<D> {
    pub fn load(
        &self,
        value: JSValue,
        params: D::Params,
        ctx: &LoadContext,
    ) -> LoadResult<D::Entity> {
        let mut record = RawRecord::from_value(D::ENTITY, value)?;
        let id = self.identify(&mut record)?;
        debug!("EntityLoader::load: {} {:?}", D::ENTITY, id);
        let mut draft = D::start(id.clone(), params);
        for binding in self.fields.iter() {
            binding.apply(&mut draft, &mut record, ctx, id.as_deref())?;
        }
        record.ensure_consumed(id.as_deref())?;
        if let Some(finalize) = self.finalize {
            finalize(&mut draft)?;
        }
        draft.finish()
    }

    fn identify(&self, record: &mut RawRecord) -> LoadResult<Option<String>> {
        let key = match self.id_key {
            Some(k) => k,
            None => return Ok(None),
        };
        let site = FieldSite {
            entity: D::ENTITY,
            id: None,
            attr: "id",
        };
        let raw = record.take(key).ok_or_else(|| site.missing())?;
        let id = parse_id(&raw).map_err(|e| site.invalid(&raw, e))?;
        Ok(Some(id))
    }

    /// Loads a list of records into a registry.
    pub fn load_all(
        &self,
        values: Vec<JSValue>,
        params: D::Params,
        indexing: Indexing,
        ctx: &LoadContext,
    ) -> LoadResult<IdRegistry<D::Entity>>
    where
        D::Params: Clone,
        D::Entity: Identified,
    {
        let mut entities: Vec<D::Entity> = Vec::with_capacity(values.len());
        for value in values {
            entities.push(self.load(value, params.clone(), ctx)?);
        }
        IdRegistry::build(entities, indexing)
    }
}

/// Reads a list of records. An absent list is empty.
pub fn expect_list(value: Option<JSValue>, site: &FieldSite<'_>) -> LoadResult<Vec<JSValue>> {
    match value {
        None => Ok(Vec::new()),
        Some(JSValue::Array(elts)) => Ok(elts),
        Some(x) => Err(site.invalid(
            &x,
            ConvertError::WrongType {
                expected: "a list of records",
            },
        )),
    }
}
