//! Typed CRUD over a durable slot.
//!
//! A [`Repository`] holds the current snapshot of one collection and writes
//! the whole collection back through the [`Store`] on every successful
//! mutation, so the durable state never lags the in-memory state once a call
//! returns.

use chrono::{Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Initiative, InitiativeDraft, RootCauseDraft, RootCauseRecord};
use crate::seed;
use crate::storage::Store;

/// Owner assigned to new records when none is given.
pub const DEFAULT_OWNER: &str = "Current User";

/// Source of "today" for record timestamps.
pub type Clock = fn() -> NaiveDate;

/// The local calendar date.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// An entity kind that a [`Repository`] can manage.
pub trait Record: std::fmt::Debug + Clone + Serialize + DeserializeOwned {
    /// Partial form used for create and update.
    type Draft;

    /// Human-readable kind, used in errors and logs.
    const KIND: &'static str;

    /// Durable slot holding the collection.
    const SLOT: &'static str;

    /// The record's unique id.
    fn id(&self) -> &str;

    /// Build a new record from a draft.
    fn build(id: String, today: NaiveDate, draft: Self::Draft, owner: &str) -> Self;

    /// Overwrite the fields the draft provides.
    fn merge(&mut self, draft: Self::Draft);

    /// Check required fields and invariants.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first problem found.
    fn validate(&self) -> Result<()>;

    /// Creation day.
    fn date_created(&self) -> NaiveDate;

    /// Stamp the last-modified day.
    fn set_date_modified(&mut self, day: NaiveDate);

    /// Sample collection used when seeding an absent slot.
    fn samples() -> Vec<Self>;
}

impl Record for Initiative {
    type Draft = InitiativeDraft;
    const KIND: &'static str = "initiative";
    const SLOT: &'static str = "kaizen-initiatives";

    fn id(&self) -> &str {
        &self.id
    }

    fn build(id: String, today: NaiveDate, draft: InitiativeDraft, owner: &str) -> Self {
        Self::from_draft(id, today, draft, owner)
    }

    fn merge(&mut self, draft: InitiativeDraft) {
        Initiative::merge(self, draft);
    }

    fn validate(&self) -> Result<()> {
        Initiative::validate(self)
    }

    fn date_created(&self) -> NaiveDate {
        self.date_created
    }

    fn set_date_modified(&mut self, day: NaiveDate) {
        self.date_modified = day;
    }

    fn samples() -> Vec<Self> {
        seed::initiatives()
    }
}

impl Record for RootCauseRecord {
    type Draft = RootCauseDraft;
    const KIND: &'static str = "root cause analysis";
    const SLOT: &'static str = "root-cause-analysis-records";

    fn id(&self) -> &str {
        &self.id
    }

    fn build(id: String, today: NaiveDate, draft: RootCauseDraft, owner: &str) -> Self {
        Self::from_draft(id, today, draft, owner)
    }

    fn merge(&mut self, draft: RootCauseDraft) {
        RootCauseRecord::merge(self, draft);
    }

    fn validate(&self) -> Result<()> {
        RootCauseRecord::validate(self)
    }

    fn date_created(&self) -> NaiveDate {
        self.date_created
    }

    fn set_date_modified(&mut self, day: NaiveDate) {
        self.date_modified = day;
    }

    fn samples() -> Vec<Self> {
        seed::root_causes()
    }
}

/// Issues ids from a microsecond creation timestamp.
///
/// Ids are strictly increasing within one generator and skip any value the
/// caller reports as taken.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Next id not rejected by `taken`.
    pub fn next_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
        let mut candidate = Utc::now().timestamp_micros().max(self.last.saturating_add(1));
        while taken(&candidate.to_string()) {
            candidate = candidate.saturating_add(1);
        }
        self.last = candidate;
        candidate.to_string()
    }
}

/// CRUD access to one collection of `T`.
#[derive(Debug)]
pub struct Repository<'s, T: Record> {
    store: &'s Store,
    records: Vec<T>,
    owner: String,
    clock: Clock,
    ids: IdGenerator,
}

impl<'s, T: Record> Repository<'s, T> {
    /// Load the collection without seeding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if the stored slot is unreadable.
    pub fn open(store: &'s Store) -> Result<Self> {
        let records = store.load(T::SLOT)?;
        Ok(Self::with_records(store, records))
    }

    /// Load the collection, seeding sample data if the slot has never existed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if the stored slot is unreadable.
    pub fn open_seeded(store: &'s Store) -> Result<Self> {
        let records = store.seed_if_empty(T::SLOT, T::samples)?;
        Ok(Self::with_records(store, records))
    }

    /// Load the collection, falling back to an empty one if it is corrupted.
    ///
    /// The corruption error is handed back so the caller can show it; the
    /// stored slot is left untouched until the next successful mutation.
    ///
    /// # Errors
    ///
    /// Returns any error other than [`Error::Corruption`].
    pub fn recover(store: &'s Store, seed: bool) -> Result<(Self, Option<Error>)> {
        let loaded = if seed {
            Self::open_seeded(store)
        } else {
            Self::open(store)
        };

        match loaded {
            Ok(repo) => Ok((repo, None)),
            Err(err) if err.is_corruption() => {
                warn!(slot = T::SLOT, error = %err, "Treating corrupted collection as empty");
                Ok((Self::with_records(store, Vec::new()), Some(err)))
            }
            Err(err) => Err(err),
        }
    }

    fn with_records(store: &'s Store, records: Vec<T>) -> Self {
        debug!(slot = T::SLOT, records = records.len(), "Loaded collection");
        Self {
            store,
            records,
            owner: DEFAULT_OWNER.to_string(),
            clock: local_today,
            ids: IdGenerator::default(),
        }
    }

    /// Use `owner` for records created without one.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Use `clock` as the source of today's date.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the source of today's date.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Today's date according to the repository clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Default owner for new records.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The current collection in storage order.
    #[must_use]
    pub fn list(&self) -> &[T] {
        &self.records
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Create a record from `draft` and append it to the collection.
    ///
    /// # Errors
    ///
    /// Returns a validation error if required fields are missing or an
    /// invariant fails (nothing is written), or a storage error.
    pub fn create(&mut self, draft: T::Draft) -> Result<T> {
        let records = &self.records;
        let id = self.ids.next_id(|id| records.iter().any(|r| r.id() == id));
        let record = T::build(id, self.today(), draft, &self.owner);
        record.validate()?;

        let mut next = self.records.clone();
        next.push(record.clone());
        self.commit(next)?;

        info!(kind = T::KIND, id = record.id(), "Created record");
        Ok(record)
    }

    /// Merge `draft` over the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, a validation error if
    /// the merged record breaks an invariant, or a storage error.
    pub fn update(&mut self, id: &str, draft: T::Draft) -> Result<T> {
        self.update_with(id, |record| {
            record.merge(draft);
            Ok(())
        })
    }

    /// Apply `change` to the record with `id`, then validate, stamp and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, whatever `change`
    /// returns, a validation error, or a storage error. Nothing is written
    /// unless every step succeeds.
    pub fn update_with<F>(&mut self, id: &str, change: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let index = self.position(id)?;
        let mut record = self.records[index].clone();

        change(&mut record)?;
        record.validate()?;
        let today = self.today().max(record.date_created());
        record.set_date_modified(today);

        let mut next = self.records.clone();
        next[index] = record.clone();
        self.commit(next)?;

        info!(kind = T::KIND, id, "Updated record");
        Ok(record)
    }

    /// Permanently remove the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or a storage error.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let index = self.position(id)?;
        let mut next = self.records.clone();
        next.remove(index);
        self.commit(next)?;

        info!(kind = T::KIND, id, "Deleted record");
        Ok(())
    }

    /// Drop the whole collection, including its durable slot.
    ///
    /// Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn reset(&mut self) -> Result<usize> {
        self.store.remove(T::SLOT)?;
        let removed = self.records.len();
        self.records.clear();
        info!(slot = T::SLOT, removed, "Reset collection");
        Ok(removed)
    }

    /// Count the records stored for this kind without opening a repository.
    ///
    /// Returns `None` when the collection has never been stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] when the stored collection does not
    /// decode as `T`, or a database error.
    pub fn stored_count(store: &Store) -> Result<Option<usize>> {
        if !store.contains(T::SLOT)? {
            return Ok(None);
        }
        Ok(Some(store.load::<T>(T::SLOT)?.len()))
    }

    /// Mint an id not rejected by `taken`, from this repository's generator.
    pub(crate) fn mint_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
        self.ids.next_id(taken)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    fn commit(&mut self, next: Vec<T>) -> Result<()> {
        self.store.save(T::SLOT, &next)?;
        self.records = next;
        Ok(())
    }
}
