//! # Responders
//!
//! [`Responders`] is the double keyed registry at the heart of the crate. It maps
//!
//! * `(query key, cell key)` to the [`Responder`] performing that query for that
//!   kind of cell, and
//! * `(calculator base key, cell key, tags)` to a calculator implementing that base.
//!
//! Registering the same pair twice replaces the earlier entry, so a crate set up later
//! can override a default.
//!
//! ## Fallback
//!
//! When no responder is registered for the exact pair, the cell kind's ancestor chain
//! is searched against the query key (most specific ancestor first), then each of the
//! query's ancestors is tried against the cell key and its ancestors in turn. A
//! responder registered for `vtkDGCell` therefore answers for every DG shape that has
//! no responder of its own.
//!
//! A miss is an ordinary outcome reported as [`Dispatch::NotApplicable`]. It does not
//! allocate.

use crate::prelude::*;

use rustc_hash::FxHashMap;
use std::iter;

/// outcome of [`Responders::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// a responder was found and ran; carries its verdict
    Responded(bool),
    /// nothing is registered for this query and cell kind or any of their ancestors
    NotApplicable,
    /// the query or the cell reports an invalid type key. Nothing was invoked.
    Invalid,
}

impl Dispatch {
    pub fn is_success(&self) -> bool {
        matches!(self, Dispatch::Responded(true))
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Dispatch::Responded(_))
    }
}

#[derive(Debug, thiserror::Error, From)]
pub enum RegistrationError {
    #[error("{0}")]
    InvalidKey(InvalidKey),
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "cannot register a {what} for an invalid {role} key (other key: `{other}`)")]
pub struct InvalidKey {
    what: &'static str,
    role: &'static str,
    other: TypeKey,
}

struct CalculatorEntry {
    tags: TagSet,
    // holds an `Arc<B>` for the base `B` this entry was registered under
    calculator: Arc<dyn Any + Send + Sync>,
    serial: u64,
}

#[derive(Default)]
pub struct Responders {
    responders: FxHashMap<(TypeKey, TypeKey), Arc<dyn Responder>>,
    calculators: FxHashMap<(TypeKey, TypeKey), Vec<CalculatorEntry>>,
    serial: u64,
}

impl Responders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `responder` to answer `Q` for cells of kind `C`.
    ///
    /// Either side may be an abstract kind (such as `vtkDGCell`) that is only ever
    /// reached through the fallback search.
    pub fn register_query_responder<C, Q, R>(
        &mut self,
        responder: R,
    ) -> Result<(), RegistrationError>
    where
        C: Named + ?Sized,
        Q: Named + ?Sized,
        R: Responder + 'static,
    {
        self.register_responder(Q::KEY, C::KEY, Arc::new(responder))
    }

    /// Register a responder under explicit keys. Last registration wins.
    pub fn register_responder(
        &mut self,
        query: TypeKey,
        cell: TypeKey,
        responder: Arc<dyn Responder>,
    ) -> Result<(), RegistrationError> {
        if !query.is_valid() {
            tracing::warn!(cell = %cell, "rejected responder with an invalid query key");
            return Err(InvalidKey::new("responder", "query", cell).into());
        }
        if !cell.is_valid() {
            tracing::warn!(query = %query, "rejected responder with an invalid cell key");
            return Err(InvalidKey::new("responder", "cell", query).into());
        }

        if self.responders.insert((query, cell), responder).is_some() {
            tracing::debug!(query = %query, cell = %cell, "replaced responder");
        } else {
            tracing::debug!(query = %query, cell = %cell, "registered responder");
        }

        Ok(())
    }

    /// the responder registered for exactly this pair, without fallback
    pub fn responder(&self, query: TypeKey, cell: TypeKey) -> Option<&Arc<dyn Responder>> {
        self.responders.get(&(query, cell))
    }

    /// Find the best responder for a query and cell kind, returning the pair of keys it
    /// was registered under.
    pub fn find_responder(
        &self,
        query: TypeKey,
        query_ancestors: &[TypeKey],
        cell: TypeKey,
        cell_ancestors: &[TypeKey],
    ) -> Option<((TypeKey, TypeKey), &Arc<dyn Responder>)> {
        for q in iter::once(query).chain(query_ancestors.iter().copied()) {
            for c in iter::once(cell).chain(cell_ancestors.iter().copied()) {
                if let Some(responder) = self.responders.get(&(q, c)) {
                    return Some(((q, c), responder));
                }
            }
        }
        None
    }

    /// Find and invoke the responder for `query` on `cell`.
    pub fn dispatch(
        &self,
        query: &mut dyn Query,
        cell: &dyn CellMetadata,
        grid: &CellGrid,
    ) -> Dispatch {
        let query_key = query.type_key();
        let cell_key = cell.type_key();

        if !query_key.is_valid() || !cell_key.is_valid() {
            return Dispatch::Invalid;
        }

        let found = self.find_responder(
            query_key,
            query.ancestor_keys(),
            cell_key,
            cell.ancestor_keys(),
        );

        match found {
            Some(((q, c), responder)) => {
                tracing::trace!(
                    query = %query_key,
                    cell = %cell_key,
                    matched_query = %q,
                    matched_cell = %c,
                    "dispatching"
                );
                Dispatch::Responded(responder.evaluate(query, cell, grid, self))
            }
            None => {
                tracing::trace!(query = %query_key, cell = %cell_key, "no responder");
                Dispatch::NotApplicable
            }
        }
    }

    /// Register a calculator implementing the base `B` for cells of kind `C`.
    ///
    /// It will answer attributes whose tags contain every tag in `tags`. Registering
    /// the same base, cell kind and tag set again replaces the calculator.
    pub fn register_calculator<C, B>(
        &mut self,
        tags: TagSet,
        calculator: Arc<B>,
    ) -> Result<(), RegistrationError>
    where
        C: Named + ?Sized,
        B: Named + ?Sized + Send + Sync + 'static,
    {
        self.register_calculator_for::<B>(C::KEY, tags, calculator)
    }

    /// [`register_calculator`](Self::register_calculator) with an explicit cell key
    pub fn register_calculator_for<B>(
        &mut self,
        cell: TypeKey,
        tags: TagSet,
        calculator: Arc<B>,
    ) -> Result<(), RegistrationError>
    where
        B: Named + ?Sized + Send + Sync + 'static,
    {
        if !B::KEY.is_valid() {
            tracing::warn!(cell = %cell, "rejected calculator with an invalid base key");
            return Err(InvalidKey::new("calculator", "base", cell).into());
        }
        if !cell.is_valid() {
            tracing::warn!(base = %B::KEY, "rejected calculator with an invalid cell key");
            return Err(InvalidKey::new("calculator", "cell", B::KEY).into());
        }

        self.serial += 1;
        let entry = CalculatorEntry {
            tags,
            calculator: Arc::new(calculator),
            serial: self.serial,
        };

        let entries = self.calculators.entry((B::KEY, cell)).or_default();

        match entries.iter_mut().find(|existing| existing.tags == entry.tags) {
            Some(existing) => {
                tracing::debug!(base = %B::KEY, %cell, tags = %entry.tags, "replaced calculator");
                *existing = entry;
            }
            None => {
                tracing::debug!(base = %B::KEY, %cell, tags = %entry.tags, "registered calculator");
                entries.push(entry);
            }
        }

        Ok(())
    }

    /// Find the calculator of base `B` for `cell` that can handle `attribute`.
    pub fn find_calculator<B>(
        &self,
        cell: &dyn CellMetadata,
        attribute: &CellAttribute,
    ) -> Option<Arc<B>>
    where
        B: Named + ?Sized + Send + Sync + 'static,
    {
        let (key, ancestors) = (cell.type_key(), cell.ancestor_keys());
        let found = self.find_calculator_entry(B::KEY, key, ancestors, attribute.tags())?;

        match found.downcast_ref::<Arc<B>>() {
            Some(calculator) => Some(Arc::clone(calculator)),
            None => {
                tracing::warn!(
                    base = %B::KEY,
                    cell = %cell.type_key(),
                    "calculator registered under this base has a different type"
                );
                None
            }
        }
    }

    /// Untyped calculator lookup.
    ///
    /// An entry matches when its tags are a subset of `tags`. Among the matches for the
    /// most specific cell key that has any, the entry with the most tags wins, and the
    /// most recent registration breaks ties.
    pub fn find_calculator_entry(
        &self,
        base: TypeKey,
        cell: TypeKey,
        cell_ancestors: &[TypeKey],
        tags: &TagSet,
    ) -> Option<&Arc<dyn Any + Send + Sync>> {
        for c in iter::once(cell).chain(cell_ancestors.iter().copied()) {
            let best = self
                .calculators
                .get(&(base, c))
                .and_then(|entries| {
                    entries
                        .iter()
                        .filter(|entry| entry.tags.is_subset(tags))
                        .max_by_key(|entry| (entry.tags.len(), entry.serial))
                });

            if let Some(entry) = best {
                return Some(&entry.calculator);
            }
        }
        None
    }

    /// number of registered responders
    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    pub fn number_of_calculators(&self) -> usize {
        self.calculators.values().map(Vec::len).sum()
    }

    /// drop every responder and calculator; meant for shutdown and test isolation
    pub fn clear(&mut self) {
        self.responders.clear();
        self.calculators.clear();
    }
}

impl std::fmt::Debug for Responders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pairs: Vec<_> = self.responders.keys().collect();
        pairs.sort();

        f.debug_struct("Responders")
            .field("responders", &pairs)
            .field("calculators", &self.number_of_calculators())
            .finish()
    }
}

/// Wrap a closure as a responder, letting the compiler infer its argument types.
pub fn responder_fn<F>(f: F) -> Arc<dyn Responder>
where
    F: Fn(&mut dyn Query, &dyn CellMetadata, &CellGrid, &Responders) -> bool,
    F: Send + Sync + 'static,
{
    Arc::new(f)
}
