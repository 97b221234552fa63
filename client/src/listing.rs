//! Generic controller for paginated entity lists
//!
//! Pages are accumulated locally; search and sort run over everything
//! fetched so far. Filters go to the server and reset the collection.
//!
//! Every fetch carries the controller's generation. Starting a page-0 fetch
//! or changing filters bumps the generation, so replies to superseded
//! requests are dropped in [`EntityListController::apply`].

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    project, Language, ListFilter, Page, Searchable, SortKey, SortOrder, Sortable,
};

use crate::error::ClientResult;
use crate::notify::{Notification, Notifier};

/// Server-side paginated collection
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Searchable + Sortable + Clone + Send + Sync + 'static;
    type Filter: ListFilter + 'static;

    /// Collection name for logs
    fn collection(&self) -> &'static str;

    async fn fetch_page(&self, page: u32, filters: &Self::Filter) -> ClientResult<Page<Self::Item>>;
}

/// An issued page request
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket<F> {
    pub generation: u64,
    pub page: u32,
    pub filters: F,
}

impl<F: ListFilter> FetchTicket<F> {
    pub async fn execute<S>(&self, source: &S) -> ClientResult<Page<S::Item>>
    where
        S: PageSource<Filter = F> + ?Sized,
    {
        source.fetch_page(self.page, &self.filters).await
    }
}

/// What happened to a page reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Superseded by a newer request and dropped
    Stale,
    /// Fetch failed; a notification was sent and state kept
    Failed,
    /// Nothing was requested
    Skipped,
}

type SortState<S> = Option<(<<S as PageSource>::Item as Sortable>::Key, SortOrder)>;

pub struct EntityListController<S: PageSource> {
    source: Arc<S>,
    notifier: Arc<dyn Notifier>,
    language: Language,
    items: Vec<S::Item>,
    filters: S::Filter,
    page: u32,
    has_next: bool,
    total_elements: u64,
    loaded: bool,
    generation: u64,
    epoch: u64,
    search: String,
    sort: SortState<S>,
}

impl<S: PageSource> EntityListController<S> {
    pub fn new(source: S, notifier: Arc<dyn Notifier>, language: Language) -> Self {
        Self::with_filters(source, notifier, language, S::Filter::default())
    }

    pub fn with_filters(
        source: S,
        notifier: Arc<dyn Notifier>,
        language: Language,
        filters: S::Filter,
    ) -> Self {
        Self {
            source: Arc::new(source),
            notifier,
            language,
            items: Vec::new(),
            filters,
            page: 0,
            has_next: false,
            total_elements: 0,
            loaded: false,
            generation: 0,
            epoch: 0,
            search: String::new(),
            sort: None,
        }
    }

    pub fn source(&self) -> Arc<S> {
        Arc::clone(&self.source)
    }

    /// Everything fetched so far, in server order
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn filters(&self) -> &S::Filter {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of page-0 replies applied so far
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortState<S> {
        self.sort
    }

    /// Issue a request for `page`. Page 0 supersedes all in-flight requests.
    pub fn begin_fetch(&mut self, page: u32) -> FetchTicket<S::Filter> {
        if page == 0 {
            self.generation += 1;
        }
        FetchTicket {
            generation: self.generation,
            page,
            filters: self.filters.clone(),
        }
    }

    /// Fold a reply into the collection
    pub fn apply(
        &mut self,
        ticket: FetchTicket<S::Filter>,
        result: ClientResult<Page<S::Item>>,
    ) -> ApplyOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Dropping stale {} page {} (generation {} < {})",
                self.source.collection(),
                ticket.page,
                ticket.generation,
                self.generation
            );
            return ApplyOutcome::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to load {} page {}: {}", self.source.collection(), ticket.page, e);
                self.notifier.notify(Notification::from_error(&e, self.language));
                return ApplyOutcome::Failed;
            }
        };

        if ticket.page == 0 {
            self.items = page.content;
            self.epoch += 1;
        } else if self.loaded && ticket.page == self.page + 1 {
            self.items.extend(page.content);
        } else {
            // a second reply for a page already appended
            return ApplyOutcome::Stale;
        }

        self.page = ticket.page;
        self.has_next = page.has_next;
        self.total_elements = page.total_elements;
        self.loaded = true;
        ApplyOutcome::Applied
    }

    /// Fetch and apply one page
    pub async fn fetch(&mut self, page: u32) -> ApplyOutcome {
        let ticket = self.begin_fetch(page);
        let result = ticket.execute(self.source.as_ref()).await;
        self.apply(ticket, result)
    }

    /// Reload from page 0, replacing the collection when the reply arrives
    pub async fn refresh(&mut self) -> ApplyOutcome {
        self.fetch(0).await
    }

    /// Request the next page if the server reported one
    pub fn begin_load_more(&mut self) -> Option<FetchTicket<S::Filter>> {
        if !self.loaded || !self.has_next {
            return None;
        }
        Some(self.begin_fetch(self.page + 1))
    }

    pub async fn load_more(&mut self) -> ApplyOutcome {
        let Some(ticket) = self.begin_load_more() else {
            return ApplyOutcome::Skipped;
        };
        let result = ticket.execute(self.source.as_ref()).await;
        self.apply(ticket, result)
    }

    /// Swap the filter set. The collection is discarded immediately.
    pub fn begin_filter_change(&mut self, filters: S::Filter) -> Option<FetchTicket<S::Filter>> {
        if filters == self.filters {
            return None;
        }
        self.filters = filters;
        self.items.clear();
        self.page = 0;
        self.has_next = false;
        self.total_elements = 0;
        self.loaded = false;
        Some(self.begin_fetch(0))
    }

    pub async fn set_filters(&mut self, filters: S::Filter) -> ApplyOutcome {
        let Some(ticket) = self.begin_filter_change(filters) else {
            return ApplyOutcome::Skipped;
        };
        let result = ticket.execute(self.source.as_ref()).await;
        self.apply(ticket, result)
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn set_sort(&mut self, key: <S::Item as Sortable>::Key, order: SortOrder) {
        self.sort = Some((key, order));
    }

    /// Same key flips the direction, a new key starts ascending
    pub fn toggle_sort(&mut self, key: <S::Item as Sortable>::Key) {
        self.sort = match self.sort {
            Some((current, order)) if current == key => Some((key, order.toggle())),
            _ => Some((key, SortOrder::Asc)),
        };
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Sort options for the panel, labelled in the controller's language
    pub fn sort_options(&self) -> Vec<(&'static str, &'static str)> {
        <S::Item as Sortable>::Key::all()
            .iter()
            .map(|key| (key.value(), key.label(self.language)))
            .collect()
    }

    /// Searched and sorted projection of the collection
    pub fn view(&self) -> Vec<S::Item> {
        project(&self.items, &self.search, self.sort)
    }
}
